//! Serialization boundary tests: lossless round trips, subtype identity on
//! the wire, and unknown-key rejection consistent with construction.

use serde_json::json;
use talisman_core::{
    resolve_forward_refs, DocumentKind, EntityKind, ExtractedObject, ExtractionResult,
    NamedEntity, Publication, TextWithTriples, Triple, TripleKind,
};

fn sample_result() -> ExtractionResult {
    resolve_forward_refs().unwrap();

    let publication = Publication::new()
        .unwrap()
        .with_id("PMID:1")
        .with_title("T")
        .with_abstract("A");

    let t1 = Triple::new(TripleKind::ProteinToGeneRelationship)
        .unwrap()
        .with_subject("TP53")
        .with_predicate("regulates")
        .with_object("MDM2");
    let t2 = Triple::new(TripleKind::ProteinToGeneRelationship)
        .unwrap()
        .with_subject("BRCA1")
        .with_predicate("represses")
        .with_object("CCND1")
        .with_qualifier("NOT");

    let doc = TextWithTriples::new(DocumentKind::GeneProInteractionDocument)
        .unwrap()
        .with_publication(publication)
        .with_triples(vec![t1, t2])
        .unwrap();

    ExtractionResult::new()
        .unwrap()
        .with_input_id("doc-1")
        .with_input_text("TP53 regulates MDM2. BRCA1 does not repress CCND1.")
        .with_extracted_object(ExtractedObject::Document(doc))
        .with_named_entities(vec![
            NamedEntity::protein("PR:P04637").unwrap().with_label("TP53"),
            NamedEntity::gene("HGNC:6973").unwrap().with_label("MDM2"),
        ])
}

#[test]
fn extraction_result_round_trips_losslessly() {
    let original = sample_result();

    let serialized = serde_json::to_string_pretty(&original).unwrap();
    let restored: ExtractionResult = serde_json::from_str(&serialized).unwrap();

    assert_eq!(restored, original);
}

#[test]
fn subtype_identity_survives_the_wire() {
    let original = sample_result();
    let serialized = serde_json::to_string(&original).unwrap();
    let restored: ExtractionResult = serde_json::from_str(&serialized).unwrap();

    // A deserialized Protein must remain a Protein, not degrade to the base.
    assert_eq!(restored.named_entities[0].kind(), EntityKind::Protein);
    assert_eq!(restored.named_entities[1].kind(), EntityKind::Gene);

    match restored.extracted_object.as_ref().unwrap() {
        ExtractedObject::Document(doc) => {
            assert_eq!(doc.kind(), DocumentKind::GeneProInteractionDocument);
            for triple in doc.triples() {
                assert_eq!(triple.kind(), TripleKind::ProteinToGeneRelationship);
            }
        }
        other => panic!("expected document, got {other:?}"),
    }
}

#[test]
fn unknown_keys_are_rejected_on_deserialization() {
    resolve_forward_refs().unwrap();

    let parsed: Result<NamedEntity, _> =
        serde_json::from_value(json!({"id": "HGNC:11998", "species": "human"}));
    assert!(parsed.is_err());

    let parsed: Result<Triple, _> =
        serde_json::from_value(json!({"subject": "TP53", "confidence": 0.9}));
    assert!(parsed.is_err());

    let parsed: Result<ExtractionResult, _> =
        serde_json::from_value(json!({"input_id": "doc-1", "model": "gpt-4"}));
    assert!(parsed.is_err());
}

#[test]
fn entity_without_tag_deserializes_as_base() {
    resolve_forward_refs().unwrap();

    let entity: NamedEntity = serde_json::from_value(json!({"label": "anything"})).unwrap();
    assert_eq!(entity.kind(), EntityKind::NamedEntity);
    assert!(entity.id().is_none());
}

#[test]
fn tagged_entity_without_id_is_rejected() {
    resolve_forward_refs().unwrap();

    let parsed: Result<NamedEntity, _> =
        serde_json::from_value(json!({"@type": "Protein", "label": "p53"}));
    assert!(parsed.is_err());
}

#[test]
fn narrowed_document_rejects_base_triple_on_the_wire() {
    resolve_forward_refs().unwrap();

    let parsed: Result<TextWithTriples, _> = serde_json::from_value(json!({
        "@type": "GeneProInteractionDocument",
        "triples": [{"@type": "Triple", "subject": "TP53"}],
    }));
    assert!(parsed.is_err());
}

#[test]
fn publication_uses_abstract_as_wire_key() {
    resolve_forward_refs().unwrap();

    let publication = Publication::new().unwrap().with_abstract("A");
    let value = serde_json::to_value(&publication).unwrap();
    assert_eq!(value, json!({"abstract": "A"}));

    let restored: Publication = serde_json::from_value(value).unwrap();
    assert_eq!(restored.abstract_text.as_deref(), Some("A"));
}

#[test]
fn unrecognized_extracted_object_falls_back_to_opaque() {
    resolve_forward_refs().unwrap();

    let result: ExtractionResult = serde_json::from_value(json!({
        "extracted_object": {"chemical": "caffeine", "dose": "high"},
    }))
    .unwrap();

    match result.extracted_object.unwrap() {
        ExtractedObject::Opaque(value) => {
            assert_eq!(value["chemical"], json!("caffeine"));
        }
        other => panic!("expected opaque value, got {other:?}"),
    }
}

#[test]
fn empty_sequences_serialize_explicitly() {
    resolve_forward_refs().unwrap();

    let result = ExtractionResult::new().unwrap();
    let value = serde_json::to_value(&result).unwrap();
    assert_eq!(value["named_entities"], json!([]));

    let doc = TextWithTriples::new(DocumentKind::TextWithTriples).unwrap();
    let value = serde_json::to_value(&doc).unwrap();
    assert_eq!(value["triples"], json!([]));
}
