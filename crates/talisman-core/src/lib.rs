//! Talisman Core - Domain models for knowledge extracted from text
//!
//! This crate defines the validated object graph shared by the talisman
//! pipeline:
//! - Named entities (proteins, genes, relationship vocabulary)
//! - Triples and typed documents bundling publications with triples
//! - Extraction and annotation result envelopes
//! - Schema reference resolution performed once at startup
//! - Common error types
//! - Configuration management
//!
//! Every model type enforces the same policy: no unknown fields, per-field
//! type checks on every assignment, and whole-object validation at
//! construction and after each mutation.

pub mod config;
pub mod model;
pub mod schema;

pub use config::{AppConfig, ConfigError, ExtractionConfig, LoggingConfig};
pub use model::{
    AnnotatorResult, AssignFields, DocumentKind, EntityKind, ExtractedObject, ExtractionResult,
    NamedEntity, NullDataOptions, Publication, TextWithTriples, Triple, TripleKind, Validate,
};
pub use schema::resolve_forward_refs;

use thiserror::Error;

// ============================================================================
// Error Types
// ============================================================================

/// Core error types for talisman model operations.
///
/// None of these are recoverable inside the model layer: callers are
/// expected to skip or report the offending record, never to coerce or
/// default around a failed validation.
#[derive(Error, Debug)]
pub enum TalismanError {
    /// A field outside the declared set was supplied.
    #[error("unknown field `{field}` on {type_name}")]
    SchemaViolation {
        type_name: &'static str,
        field: String,
    },

    /// A field was assigned a value of the wrong type, or a narrowed
    /// sequence received an element of the wrong subtype.
    #[error("type mismatch for {type_name}.{field}: expected {expected}")]
    TypeMismatch {
        type_name: &'static str,
        field: &'static str,
        expected: &'static str,
    },

    /// A required field was absent on a subtype that demands it.
    #[error("missing required field `{field}` on {type_name}")]
    MissingRequiredField {
        type_name: &'static str,
        field: &'static str,
    },

    /// An instance was constructed before `schema::resolve_forward_refs`
    /// completed, or the schema contains a dangling type reference.
    #[error("unresolved reference to type `{0}`: call resolve_forward_refs() first")]
    UnresolvedReference(&'static str),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, TalismanError>;
