//! Model loader
//!
//! Converts recognized mentions and relations into core model values and
//! assembles the enclosing `ExtractionResult`. Ungrounded mentions receive
//! `AUTO:` placeholder identifiers so that typed entities always satisfy
//! their required-id invariant.

use tracing::debug;

use crate::{EntityExtractor, Mention, RelationExtractor, RelationMention};
use crate::{RuleBasedNer, RuleBasedRelationExtractor};
use talisman_core::{
    AnnotatorResult, DocumentKind, ExtractedObject, ExtractionConfig, ExtractionResult,
    NamedEntity, Publication, Result, TextWithTriples, Triple, TripleKind,
};

// ============================================================================
// Conversion utilities
// ============================================================================

/// Placeholder identifier for a span the lexicon could not ground.
fn auto_id(text: &str) -> String {
    format!("AUTO:{}", text.replace(' ', "%20"))
}

/// Convert a mention to a typed named entity.
pub fn mention_to_entity(mention: &Mention) -> Result<NamedEntity> {
    let id = mention
        .id
        .clone()
        .unwrap_or_else(|| auto_id(&mention.text));
    let label = mention
        .canonical
        .clone()
        .unwrap_or_else(|| mention.text.clone());

    NamedEntity::new(mention.kind, Some(id), Some(label))
}

/// Convert a relation mention to a protein-to-gene relationship triple.
pub fn relation_to_triple(relation: &RelationMention) -> Result<Triple> {
    let mut triple = Triple::new(TripleKind::ProteinToGeneRelationship)?
        .with_subject(relation.subject.text.clone())
        .with_predicate(relation.predicate.clone())
        .with_object(relation.object.text.clone());
    triple.qualifier = relation.qualifier.clone();
    Ok(triple)
}

/// Produce annotation records for grounded mentions.
pub fn annotate_mentions(mentions: &[Mention]) -> Result<Vec<AnnotatorResult>> {
    let mut annotations = Vec::new();
    for mention in mentions {
        if let (Some(id), Some(canonical)) = (&mention.id, &mention.canonical) {
            annotations.push(AnnotatorResult::grounded(&mention.text, id, canonical)?);
        }
    }
    Ok(annotations)
}

// ============================================================================
// Extraction Pipeline
// ============================================================================

/// End-to-end rule-based pipeline producing extraction results.
pub struct ExtractionPipeline {
    ner: RuleBasedNer,
    relations: RuleBasedRelationExtractor,
}

impl ExtractionPipeline {
    /// Create a pipeline with default settings.
    pub fn new() -> Self {
        Self {
            ner: RuleBasedNer::new(),
            relations: RuleBasedRelationExtractor::new(),
        }
    }

    /// Create a pipeline tuned by the application config.
    pub fn with_config(config: &ExtractionConfig) -> Self {
        Self {
            ner: RuleBasedNer::new().with_min_confidence(config.min_confidence),
            relations: RuleBasedRelationExtractor::with_config(config),
        }
    }

    /// Access the underlying recognizer.
    pub fn ner(&self) -> &RuleBasedNer {
        &self.ner
    }

    /// Extract a gene/protein interaction document from the input text.
    pub fn run(
        &self,
        input_id: Option<&str>,
        input_title: Option<&str>,
        text: &str,
    ) -> Result<ExtractionResult> {
        let mentions = self.ner.extract(text)?;
        let relations = self.relations.extract(text, &mentions)?;
        debug!(
            mentions = mentions.len(),
            relations = relations.len(),
            "rule-based extraction finished"
        );

        let mut publication = Publication::new()?.with_abstract(text);
        if let Some(id) = input_id {
            publication.id = Some(id.to_string());
        }
        if let Some(title) = input_title {
            publication.title = Some(title.to_string());
            publication.combined_text = Some(format!("{title}\n\n{text}"));
        } else {
            publication.combined_text = Some(text.to_string());
        }

        let mut doc = TextWithTriples::new(DocumentKind::GeneProInteractionDocument)?
            .with_publication(publication);
        for relation in &relations {
            doc.push_triple(relation_to_triple(relation)?)?;
        }

        // One entity per identifier, first occurrence wins the slot.
        let mut entities: Vec<NamedEntity> = Vec::new();
        for mention in &mentions {
            let entity = mention_to_entity(mention)?;
            if !entities.iter().any(|e| e.id() == entity.id()) {
                entities.push(entity);
            }
        }

        let mut result = ExtractionResult::new()?
            .with_input_text(text)
            .with_extracted_object(ExtractedObject::Document(doc))
            .with_named_entities(entities);
        result.input_id = input_id.map(str::to_string);
        result.input_title = input_title.map(str::to_string);
        Ok(result)
    }

    /// Ground recognized spans, producing annotation records.
    pub fn annotate(&self, text: &str) -> Result<Vec<AnnotatorResult>> {
        let mentions = self.ner.extract(text)?;
        annotate_mentions(&mentions)
    }
}

impl Default for ExtractionPipeline {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use talisman_core::{resolve_forward_refs, EntityKind};

    #[test]
    fn test_mention_to_entity_grounded() {
        resolve_forward_refs().unwrap();

        let mention = Mention {
            text: "TP53".to_string(),
            kind: EntityKind::Gene,
            id: Some("HGNC:11998".to_string()),
            canonical: Some("TP53".to_string()),
            start: 0,
            end: 4,
            confidence: 0.95,
        };

        let entity = mention_to_entity(&mention).unwrap();
        assert_eq!(entity.kind(), EntityKind::Gene);
        assert_eq!(entity.id(), Some("HGNC:11998"));
    }

    #[test]
    fn test_mention_to_entity_auto_id() {
        resolve_forward_refs().unwrap();

        let mention = Mention {
            text: "Rad51 protein".to_string(),
            kind: EntityKind::Protein,
            id: None,
            canonical: None,
            start: 0,
            end: 13,
            confidence: 0.7,
        };

        let entity = mention_to_entity(&mention).unwrap();
        assert_eq!(entity.id(), Some("AUTO:Rad51%20protein"));
        assert_eq!(entity.label(), Some("Rad51 protein"));
    }

    #[test]
    fn test_pipeline_produces_interaction_document() {
        resolve_forward_refs().unwrap();

        let pipeline = ExtractionPipeline::new();
        let result = pipeline
            .run(Some("doc-1"), Some("TP53 review"), "TP53 regulates MDM2")
            .unwrap();

        assert_eq!(result.input_id.as_deref(), Some("doc-1"));

        let doc = match result.extracted_object.as_ref().unwrap() {
            ExtractedObject::Document(doc) => doc,
            other => panic!("expected document, got {other:?}"),
        };
        assert_eq!(doc.kind(), DocumentKind::GeneProInteractionDocument);
        assert_eq!(doc.triples().len(), 1);
        assert_eq!(doc.triples()[0].subject.as_deref(), Some("TP53"));
        assert_eq!(doc.triples()[0].predicate.as_deref(), Some("regulates"));
        assert_eq!(doc.triples()[0].object.as_deref(), Some("MDM2"));

        let publication = doc.publication.as_ref().unwrap();
        assert_eq!(publication.id.as_deref(), Some("doc-1"));
        assert_eq!(
            publication.combined_text.as_deref(),
            Some("TP53 review\n\nTP53 regulates MDM2")
        );

        // Both grounded mentions surface as typed entities.
        assert!(result
            .named_entities
            .iter()
            .any(|e| e.id() == Some("HGNC:11998")));
        assert!(result
            .named_entities
            .iter()
            .any(|e| e.id() == Some("HGNC:6973")));
    }

    #[test]
    fn test_pipeline_annotations() {
        resolve_forward_refs().unwrap();

        let pipeline = ExtractionPipeline::new();
        let annotations = pipeline.annotate("TP53 and KRAS4B were studied").unwrap();

        // Only the grounded span is annotated.
        assert_eq!(annotations.len(), 1);
        assert_eq!(annotations[0].subject_text.as_deref(), Some("TP53"));
        assert_eq!(annotations[0].object_id.as_deref(), Some("HGNC:11998"));
    }

    #[test]
    fn test_pipeline_without_matches_is_empty_but_valid() {
        resolve_forward_refs().unwrap();

        let pipeline = ExtractionPipeline::new();
        let result = pipeline.run(None, None, "nothing of note here").unwrap();

        let doc = match result.extracted_object.as_ref().unwrap() {
            ExtractedObject::Document(doc) => doc,
            other => panic!("expected document, got {other:?}"),
        };
        assert!(doc.triples().is_empty());
        assert!(result.named_entities.is_empty());
    }
}
