//! Schema reference resolution
//!
//! Several model types reference each other in ways that are not strictly
//! leaf-to-root (a document holds a `Publication` and a list of `Triple`s,
//! the narrowed document references the narrowed triple). The registry
//! binds those forward references once, after the whole type set is known.
//!
//! `resolve_forward_refs` must run once per process before any instance is
//! constructed; every constructor checks the registry and fails fast with
//! [`TalismanError::UnresolvedReference`] otherwise. Re-invoking the
//! resolution is a no-op.

use std::collections::HashMap;

use once_cell::sync::OnceCell;

use crate::{Result, TalismanError};

/// Declared model types and the type names each one forward-references.
const SCHEMA: &[(&str, &[&str])] = &[
    ("NamedEntity", &[]),
    ("Protein", &["NamedEntity"]),
    ("Gene", &["NamedEntity"]),
    ("RelationshipType", &["NamedEntity"]),
    ("ProteinToGenePredicate", &["NamedEntity"]),
    ("CompoundExpression", &[]),
    ("Triple", &["CompoundExpression"]),
    ("ProteinToGeneRelationship", &["Triple"]),
    ("TextWithTriples", &["Publication", "Triple"]),
    (
        "GeneProInteractionDocument",
        &["TextWithTriples", "Publication", "ProteinToGeneRelationship"],
    ),
    ("Publication", &[]),
    ("ExtractionResult", &["NamedEntity"]),
    ("AnnotatorResult", &[]),
];

/// Finalized view of the model type set.
#[derive(Debug)]
pub struct SchemaRegistry {
    types: HashMap<&'static str, &'static [&'static str]>,
}

impl SchemaRegistry {
    fn build() -> Result<Self> {
        let types: HashMap<_, _> = SCHEMA.iter().copied().collect();

        // Every forward reference must bind to a declared type.
        for (_, refs) in SCHEMA {
            for reference in *refs {
                if !types.contains_key(reference) {
                    return Err(TalismanError::UnresolvedReference(reference));
                }
            }
        }

        Ok(Self { types })
    }

    /// Check whether a type name is part of the finalized schema.
    pub fn contains(&self, type_name: &str) -> bool {
        self.types.contains_key(type_name)
    }

    /// Forward references declared by a type.
    pub fn references(&self, type_name: &str) -> &[&'static str] {
        self.types.get(type_name).copied().unwrap_or(&[])
    }
}

static REGISTRY: OnceCell<SchemaRegistry> = OnceCell::new();

/// Resolve all forward type references.
///
/// Idempotent: the first call builds and verifies the registry, later
/// calls return the same finalized schema.
pub fn resolve_forward_refs() -> Result<&'static SchemaRegistry> {
    REGISTRY.get_or_try_init(SchemaRegistry::build)
}

/// Whether reference resolution has completed in this process.
pub fn is_resolved() -> bool {
    REGISTRY.get().is_some()
}

/// Guard called by every model constructor.
pub(crate) fn ensure_resolved(type_name: &'static str) -> Result<()> {
    match REGISTRY.get() {
        Some(registry) if registry.contains(type_name) => Ok(()),
        _ => Err(TalismanError::UnresolvedReference(type_name)),
    }
}

// ============================================================================
// Tests
// ============================================================================
