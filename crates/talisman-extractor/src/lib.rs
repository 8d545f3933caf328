//! Talisman Extractor - Reference knowledge extraction pipeline
//!
//! Implements rule-based Named Entity Recognition (NER) and Relation
//! Extraction (RE) over protein/gene text, plus the assembly step that
//! folds recognized mentions into the core model
//! (`GeneProInteractionDocument`, `ExtractionResult`, `AnnotatorResult`).

use serde::Serialize;

use talisman_core::{EntityKind, Result};

/// A text span recognized as an entity mention.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Mention {
    /// Surface form as it appears in the text.
    pub text: String,
    /// Entity kind assigned by the recognizer.
    pub kind: EntityKind,
    /// Ontology identifier, if the span was grounded against the lexicon.
    pub id: Option<String>,
    /// Canonical label for the grounded identifier.
    pub canonical: Option<String>,
    pub start: usize,
    pub end: usize,
    pub confidence: f32,
}

/// A directed relation between two mentions.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RelationMention {
    pub subject: Mention,
    pub predicate: String,
    pub object: Mention,
    /// Statement-level qualifier, e.g. "NOT" when negation was detected.
    pub qualifier: Option<String>,
    pub confidence: f32,
}

/// Trait for entity extractors
pub trait EntityExtractor: Send + Sync {
    fn extract(&self, text: &str) -> Result<Vec<Mention>>;
}

/// Trait for relation extractors
pub trait RelationExtractor: Send + Sync {
    fn extract(&self, text: &str, mentions: &[Mention]) -> Result<Vec<RelationMention>>;
}

pub mod completion;
pub mod loader;
pub mod ner;
pub mod relation;

pub use loader::ExtractionPipeline;
pub use ner::{ProteinGeneLexicon, RuleBasedNer};
pub use relation::RuleBasedRelationExtractor;
