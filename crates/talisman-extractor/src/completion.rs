//! Raw completion parsing
//!
//! Model completions arrive as key/value lines ("subject: TP53"). The
//! parser feeds each pair through the model's by-name assignment, so a key
//! outside the declared field set surfaces as a schema violation instead of
//! being silently dropped, and wrong-shaped values fail the same way they
//! would at construction.

use serde_json::json;

use talisman_core::{AssignFields, Result, Triple, TripleKind};

/// Parse key/value completion output into a protein-to-gene relationship.
///
/// Lines without a `:` separator and empty values are ignored; keys are
/// normalized to snake_case ("subject qualifier" -> `subject_qualifier`).
pub fn parse_triple(raw: &str) -> Result<Triple> {
    let mut triple = Triple::new(TripleKind::ProteinToGeneRelationship)?;

    for line in raw.lines() {
        let Some((key, value)) = line.split_once(':') else {
            continue;
        };

        let key = key.trim().to_lowercase().replace(' ', "_");
        let value = value.trim();
        if key.is_empty() || value.is_empty() {
            continue;
        }

        triple.assign(&key, json!(value))?;
    }

    Ok(triple)
}

// ============================================================================
// Tests
// ============================================================================
