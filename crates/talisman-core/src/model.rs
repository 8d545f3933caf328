//! Talisman data model
//!
//! A closed object graph for knowledge extracted from free text: named
//! entities, typed relationship triples, and documents that pair a
//! publication with extracted triples, wrapped in extraction/annotation
//! result envelopes.
//!
//! Every type applies one uniform validation policy:
//! - unknown fields are rejected (construction, by-name assignment, and
//!   deserialization),
//! - each field is type-checked on every assignment, not only at creation,
//! - subtype invariants (required ids, narrowed triple lists) are re-checked
//!   after each mutation.
//!
//! Subtype identity is carried by explicit kind tags (`@type` on the wire)
//! rather than an inheritance chain, so a deserialized `Protein` stays a
//! `Protein`.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::schema::ensure_resolved;
use crate::{Result, TalismanError};

// ============================================================================
// Sentinel Values
// ============================================================================

/// Controlled vocabulary standing in for a missing free-text value.
///
/// Distinguishes "inapplicable" from "not mentioned" from "unspecified":
/// a field holding one of these sentinels is populated, and therefore
/// distinguishable on read from an absent field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NullDataOptions {
    #[serde(rename = "UNSPECIFIED_METHOD_OF_ADMINISTRATION")]
    UnspecifiedMethodOfAdministration,
    #[serde(rename = "NOT_APPLICABLE")]
    NotApplicable,
    #[serde(rename = "NOT_MENTIONED")]
    NotMentioned,
}

impl NullDataOptions {
    /// Get the wire representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::UnspecifiedMethodOfAdministration => "UNSPECIFIED_METHOD_OF_ADMINISTRATION",
            Self::NotApplicable => "NOT_APPLICABLE",
            Self::NotMentioned => "NOT_MENTIONED",
        }
    }

    /// Get from string
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "UNSPECIFIED_METHOD_OF_ADMINISTRATION" => Some(Self::UnspecifiedMethodOfAdministration),
            "NOT_APPLICABLE" => Some(Self::NotApplicable),
            "NOT_MENTIONED" => Some(Self::NotMentioned),
            _ => None,
        }
    }
}

impl std::fmt::Display for NullDataOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// Validation Policy
// ============================================================================

/// Whole-object validation applied uniformly to every model type.
pub trait Validate {
    /// Canonical schema name of the concrete (sub)type.
    fn type_name(&self) -> &'static str;

    /// Check all invariants of the current state.
    fn validate(&self) -> Result<()>;
}

/// By-name field assignment used when applying raw model output.
///
/// An unknown field name yields [`TalismanError::SchemaViolation`]; a value
/// of the wrong shape yields [`TalismanError::TypeMismatch`]. Failed
/// assignments leave the object unchanged.
pub trait AssignFields: Validate {
    fn assign(&mut self, field: &str, value: Value) -> Result<()>;
}

/// Convert a JSON value into an optional string field.
fn opt_string_value(
    type_name: &'static str,
    field: &'static str,
    value: Value,
) -> Result<Option<String>> {
    match value {
        Value::Null => Ok(None),
        Value::String(s) => Ok(Some(s)),
        _ => Err(TalismanError::TypeMismatch {
            type_name,
            field,
            expected: "string",
        }),
    }
}

// ============================================================================
// Named Entities
// ============================================================================

/// Concrete kinds of named entity.
///
/// Every kind except the base `NamedEntity` requires an `id`: the subtypes
/// tighten the base's optional identifier into a mandatory one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    #[default]
    NamedEntity,
    Protein,
    Gene,
    RelationshipType,
    ProteinToGenePredicate,
}

impl EntityKind {
    /// Get the string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NamedEntity => "NamedEntity",
            Self::Protein => "Protein",
            Self::Gene => "Gene",
            Self::RelationshipType => "RelationshipType",
            Self::ProteinToGenePredicate => "ProteinToGenePredicate",
        }
    }

    /// Whether this kind requires a non-null `id`.
    pub fn requires_id(&self) -> bool {
        !matches!(self, Self::NamedEntity)
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An identified thing extracted from text.
///
/// `id` is semantically an identifier in an external namespace or ontology
/// (e.g. a CURIE like `HGNC:11998`); `label` is the display name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawNamedEntity", into = "RawNamedEntity")]
pub struct NamedEntity {
    kind: EntityKind,
    id: Option<String>,
    label: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawNamedEntity {
    #[serde(rename = "@type", default)]
    kind: EntityKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    label: Option<String>,
}

impl TryFrom<RawNamedEntity> for NamedEntity {
    type Error = TalismanError;

    fn try_from(raw: RawNamedEntity) -> Result<Self> {
        Self::new(raw.kind, raw.id, raw.label)
    }
}

impl From<NamedEntity> for RawNamedEntity {
    fn from(entity: NamedEntity) -> Self {
        Self {
            kind: entity.kind,
            id: entity.id,
            label: entity.label,
        }
    }
}

impl NamedEntity {
    /// Create a new entity of the given kind.
    pub fn new(kind: EntityKind, id: Option<String>, label: Option<String>) -> Result<Self> {
        ensure_resolved(kind.as_str())?;
        let entity = Self { kind, id, label };
        entity.validate()?;
        Ok(entity)
    }

    /// Create a base entity with an optional identifier.
    pub fn base() -> Result<Self> {
        Self::new(EntityKind::NamedEntity, None, None)
    }

    /// Create a protein entity (id required).
    pub fn protein(id: impl Into<String>) -> Result<Self> {
        Self::new(EntityKind::Protein, Some(id.into()), None)
    }

    /// Create a gene entity (id required).
    pub fn gene(id: impl Into<String>) -> Result<Self> {
        Self::new(EntityKind::Gene, Some(id.into()), None)
    }

    /// Create a relationship-type entity (id required).
    pub fn relationship_type(id: impl Into<String>) -> Result<Self> {
        Self::new(EntityKind::RelationshipType, Some(id.into()), None)
    }

    /// Create a protein-to-gene predicate entity (id required).
    pub fn protein_to_gene_predicate(id: impl Into<String>) -> Result<Self> {
        Self::new(EntityKind::ProteinToGenePredicate, Some(id.into()), None)
    }

    /// Set the display label
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn kind(&self) -> EntityKind {
        self.kind
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// Replace the identifier, re-checking kind-dependent requiredness.
    pub fn set_id(&mut self, id: Option<String>) -> Result<()> {
        if id.is_none() && self.kind.requires_id() {
            return Err(TalismanError::MissingRequiredField {
                type_name: self.kind.as_str(),
                field: "id",
            });
        }
        self.id = id;
        Ok(())
    }

    /// Replace the label.
    pub fn set_label(&mut self, label: Option<String>) {
        self.label = label;
    }
}

impl Validate for NamedEntity {
    fn type_name(&self) -> &'static str {
        self.kind.as_str()
    }

    fn validate(&self) -> Result<()> {
        if self.id.is_none() && self.kind.requires_id() {
            return Err(TalismanError::MissingRequiredField {
                type_name: self.kind.as_str(),
                field: "id",
            });
        }
        Ok(())
    }
}

impl AssignFields for NamedEntity {
    fn assign(&mut self, field: &str, value: Value) -> Result<()> {
        match field {
            "id" => {
                let id = opt_string_value(self.type_name(), "id", value)?;
                self.set_id(id)
            }
            "label" => {
                let label = opt_string_value(self.type_name(), "label", value)?;
                self.set_label(label);
                Ok(())
            }
            _ => Err(TalismanError::SchemaViolation {
                type_name: self.type_name(),
                field: field.to_string(),
            }),
        }
    }
}

// ============================================================================
// Triples (Compound Expressions)
// ============================================================================

/// Concrete kinds of compound expression.
///
/// `Triple` is the generic relational statement; narrowed kinds constrain
/// which documents may carry the statement.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TripleKind {
    #[default]
    Triple,
    ProteinToGeneRelationship,
}

impl TripleKind {
    /// Get the string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Triple => "Triple",
            Self::ProteinToGeneRelationship => "ProteinToGeneRelationship",
        }
    }
}

impl std::fmt::Display for TripleKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One extracted relational statement.
///
/// The statement is meaningful when `subject`, `predicate`, and `object`
/// are populated together; the model does not enforce that structurally.
/// For `ProteinToGeneRelationship` the subject names a protein and the
/// object names a gene. That narrowing is advisory (documentation-level):
/// the model does not cross-check the slot texts against an entity list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawTriple", into = "RawTriple")]
pub struct Triple {
    kind: TripleKind,
    /// Subject slot of the statement.
    pub subject: Option<String>,
    /// Predicate slot of the statement.
    pub predicate: Option<String>,
    /// Object slot of the statement.
    pub object: Option<String>,
    /// Qualifier for the whole statement, e.g. "NOT" for negation.
    pub qualifier: Option<String>,
    /// Modifier scoped to the subject, e.g. "high dose".
    pub subject_qualifier: Option<String>,
    /// Modifier scoped to the object, e.g. "severe".
    pub object_qualifier: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawTriple {
    #[serde(rename = "@type", default)]
    kind: TripleKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    subject: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    predicate: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    object: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    qualifier: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    subject_qualifier: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    object_qualifier: Option<String>,
}

impl TryFrom<RawTriple> for Triple {
    type Error = TalismanError;

    fn try_from(raw: RawTriple) -> Result<Self> {
        let mut triple = Triple::new(raw.kind)?;
        triple.subject = raw.subject;
        triple.predicate = raw.predicate;
        triple.object = raw.object;
        triple.qualifier = raw.qualifier;
        triple.subject_qualifier = raw.subject_qualifier;
        triple.object_qualifier = raw.object_qualifier;
        triple.validate()?;
        Ok(triple)
    }
}

impl From<Triple> for RawTriple {
    fn from(triple: Triple) -> Self {
        Self {
            kind: triple.kind,
            subject: triple.subject,
            predicate: triple.predicate,
            object: triple.object,
            qualifier: triple.qualifier,
            subject_qualifier: triple.subject_qualifier,
            object_qualifier: triple.object_qualifier,
        }
    }
}

impl Triple {
    /// Create an empty triple of the given kind.
    pub fn new(kind: TripleKind) -> Result<Self> {
        ensure_resolved(kind.as_str())?;
        Ok(Self {
            kind,
            subject: None,
            predicate: None,
            object: None,
            qualifier: None,
            subject_qualifier: None,
            object_qualifier: None,
        })
    }

    pub fn kind(&self) -> TripleKind {
        self.kind
    }

    /// Set the subject slot
    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    /// Set the predicate slot
    pub fn with_predicate(mut self, predicate: impl Into<String>) -> Self {
        self.predicate = Some(predicate.into());
        self
    }

    /// Set the object slot
    pub fn with_object(mut self, object: impl Into<String>) -> Self {
        self.object = Some(object.into());
        self
    }

    /// Set the statement-level qualifier
    pub fn with_qualifier(mut self, qualifier: impl Into<String>) -> Self {
        self.qualifier = Some(qualifier.into());
        self
    }

    /// Set the subject-scoped qualifier
    pub fn with_subject_qualifier(mut self, qualifier: impl Into<String>) -> Self {
        self.subject_qualifier = Some(qualifier.into());
        self
    }

    /// Set the object-scoped qualifier
    pub fn with_object_qualifier(mut self, qualifier: impl Into<String>) -> Self {
        self.object_qualifier = Some(qualifier.into());
        self
    }
}

impl Validate for Triple {
    fn type_name(&self) -> &'static str {
        self.kind.as_str()
    }

    fn validate(&self) -> Result<()> {
        // All six fields are optional free text; the kind tag alone
        // carries the subtype constraint, checked by the enclosing
        // document.
        Ok(())
    }
}

impl AssignFields for Triple {
    fn assign(&mut self, field: &str, value: Value) -> Result<()> {
        let kind = self.kind;
        let (slot, name): (&mut Option<String>, &'static str) = match field {
            "subject" => (&mut self.subject, "subject"),
            "predicate" => (&mut self.predicate, "predicate"),
            "object" => (&mut self.object, "object"),
            "qualifier" => (&mut self.qualifier, "qualifier"),
            "subject_qualifier" => (&mut self.subject_qualifier, "subject_qualifier"),
            "object_qualifier" => (&mut self.object_qualifier, "object_qualifier"),
            _ => {
                return Err(TalismanError::SchemaViolation {
                    type_name: kind.as_str(),
                    field: field.to_string(),
                })
            }
        };
        *slot = opt_string_value(kind.as_str(), name, value)?;
        Ok(())
    }
}

// ============================================================================
// Documents
// ============================================================================

/// Concrete kinds of "text with triples" document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DocumentKind {
    #[default]
    TextWithTriples,
    GeneProInteractionDocument,
}

impl DocumentKind {
    /// Get the string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TextWithTriples => "TextWithTriples",
            Self::GeneProInteractionDocument => "GeneProInteractionDocument",
        }
    }

    /// The triple kind every element of `triples` must carry, if narrowed.
    pub fn required_triple_kind(&self) -> Option<TripleKind> {
        match self {
            Self::TextWithTriples => None,
            Self::GeneProInteractionDocument => Some(TripleKind::ProteinToGeneRelationship),
        }
    }
}

impl std::fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A document pairing an optional publication with extracted triples.
///
/// The publication and the triples are held by value; triple order is
/// extraction order and is preserved verbatim (no sorting, no dedup).
/// A `GeneProInteractionDocument` only accepts
/// [`TripleKind::ProteinToGeneRelationship`] triples.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawTextWithTriples", into = "RawTextWithTriples")]
pub struct TextWithTriples {
    kind: DocumentKind,
    /// Bibliographic container for the source text.
    pub publication: Option<Publication>,
    triples: Vec<Triple>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawTextWithTriples {
    #[serde(rename = "@type", default)]
    kind: DocumentKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    publication: Option<Publication>,
    #[serde(default)]
    triples: Vec<Triple>,
}

impl TryFrom<RawTextWithTriples> for TextWithTriples {
    type Error = TalismanError;

    fn try_from(raw: RawTextWithTriples) -> Result<Self> {
        let mut doc = TextWithTriples::new(raw.kind)?;
        doc.publication = raw.publication;
        doc.set_triples(raw.triples)?;
        Ok(doc)
    }
}

impl From<TextWithTriples> for RawTextWithTriples {
    fn from(doc: TextWithTriples) -> Self {
        Self {
            kind: doc.kind,
            publication: doc.publication,
            triples: doc.triples,
        }
    }
}

impl TextWithTriples {
    /// Create an empty document of the given kind.
    pub fn new(kind: DocumentKind) -> Result<Self> {
        ensure_resolved(kind.as_str())?;
        Ok(Self {
            kind,
            publication: None,
            triples: Vec::new(),
        })
    }

    pub fn kind(&self) -> DocumentKind {
        self.kind
    }

    /// Set the publication
    pub fn with_publication(mut self, publication: Publication) -> Self {
        self.publication = Some(publication);
        self
    }

    /// Set the triple list, rejecting elements of the wrong subtype.
    pub fn with_triples(mut self, triples: Vec<Triple>) -> Result<Self> {
        self.set_triples(triples)?;
        Ok(self)
    }

    /// Triples in extraction order.
    pub fn triples(&self) -> &[Triple] {
        &self.triples
    }

    fn check_triple(&self, triple: &Triple) -> Result<()> {
        if let Some(required) = self.kind.required_triple_kind() {
            if triple.kind() != required {
                return Err(TalismanError::TypeMismatch {
                    type_name: self.kind.as_str(),
                    field: "triples",
                    expected: required.as_str(),
                });
            }
        }
        Ok(())
    }

    /// Append a triple, rejecting the wrong subtype.
    pub fn push_triple(&mut self, triple: Triple) -> Result<()> {
        self.check_triple(&triple)?;
        self.triples.push(triple);
        Ok(())
    }

    /// Replace the triple list, rejecting elements of the wrong subtype.
    pub fn set_triples(&mut self, triples: Vec<Triple>) -> Result<()> {
        for triple in &triples {
            self.check_triple(triple)?;
        }
        self.triples = triples;
        Ok(())
    }
}

impl Validate for TextWithTriples {
    fn type_name(&self) -> &'static str {
        self.kind.as_str()
    }

    fn validate(&self) -> Result<()> {
        for triple in &self.triples {
            self.check_triple(triple)?;
        }
        Ok(())
    }
}

impl AssignFields for TextWithTriples {
    fn assign(&mut self, field: &str, value: Value) -> Result<()> {
        match field {
            "publication" => {
                self.publication = match value {
                    Value::Null => None,
                    other => Some(serde_json::from_value(other).map_err(|_| {
                        TalismanError::TypeMismatch {
                            type_name: self.kind.as_str(),
                            field: "publication",
                            expected: "Publication",
                        }
                    })?),
                };
                Ok(())
            }
            "triples" => {
                let triples: Vec<Triple> = serde_json::from_value(value).map_err(|_| {
                    TalismanError::TypeMismatch {
                        type_name: self.kind.as_str(),
                        field: "triples",
                        expected: "list of triples",
                    }
                })?;
                self.set_triples(triples)
            }
            _ => Err(TalismanError::SchemaViolation {
                type_name: self.kind.as_str(),
                field: field.to_string(),
            }),
        }
    }
}

// ============================================================================
// Publication
// ============================================================================

/// Bibliographic/text container referenced by documents.
///
/// `combined_text` is externally populated; the model defines no
/// derivation rule for it.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawPublication", into = "RawPublication")]
pub struct Publication {
    /// The publication identifier, e.g. "PMID:123".
    pub id: Option<String>,
    /// The title of the publication.
    pub title: Option<String>,
    /// The abstract of the publication.
    pub abstract_text: Option<String>,
    /// Concatenated text assembled by the producer.
    pub combined_text: Option<String>,
    /// The full text of the publication.
    pub full_text: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawPublication {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    title: Option<String>,
    #[serde(rename = "abstract", default, skip_serializing_if = "Option::is_none")]
    abstract_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    combined_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    full_text: Option<String>,
}

impl TryFrom<RawPublication> for Publication {
    type Error = TalismanError;

    fn try_from(raw: RawPublication) -> Result<Self> {
        let mut publication = Publication::new()?;
        publication.id = raw.id;
        publication.title = raw.title;
        publication.abstract_text = raw.abstract_text;
        publication.combined_text = raw.combined_text;
        publication.full_text = raw.full_text;
        Ok(publication)
    }
}

impl From<Publication> for RawPublication {
    fn from(publication: Publication) -> Self {
        Self {
            id: publication.id,
            title: publication.title,
            abstract_text: publication.abstract_text,
            combined_text: publication.combined_text,
            full_text: publication.full_text,
        }
    }
}

impl Publication {
    /// Create an empty publication.
    pub fn new() -> Result<Self> {
        ensure_resolved("Publication")?;
        Ok(Self {
            id: None,
            title: None,
            abstract_text: None,
            combined_text: None,
            full_text: None,
        })
    }

    /// Set the identifier
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Set the title
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set the abstract
    pub fn with_abstract(mut self, abstract_text: impl Into<String>) -> Self {
        self.abstract_text = Some(abstract_text.into());
        self
    }

    /// Set the combined text
    pub fn with_combined_text(mut self, combined_text: impl Into<String>) -> Self {
        self.combined_text = Some(combined_text.into());
        self
    }

    /// Set the full text
    pub fn with_full_text(mut self, full_text: impl Into<String>) -> Self {
        self.full_text = Some(full_text.into());
        self
    }
}

impl Validate for Publication {
    fn type_name(&self) -> &'static str {
        "Publication"
    }

    fn validate(&self) -> Result<()> {
        Ok(())
    }
}

impl AssignFields for Publication {
    fn assign(&mut self, field: &str, value: Value) -> Result<()> {
        match field {
            "id" => self.id = opt_string_value("Publication", "id", value)?,
            "title" => self.title = opt_string_value("Publication", "title", value)?,
            "abstract" => {
                self.abstract_text = opt_string_value("Publication", "abstract", value)?
            }
            "combined_text" => {
                self.combined_text = opt_string_value("Publication", "combined_text", value)?
            }
            "full_text" => self.full_text = opt_string_value("Publication", "full_text", value)?,
            _ => {
                return Err(TalismanError::SchemaViolation {
                    type_name: "Publication",
                    field: field.to_string(),
                })
            }
        }
        Ok(())
    }
}

// ============================================================================
// Result Envelopes
// ============================================================================

/// The complex object carried by an extraction result.
///
/// A closed, tagged union over the known document/triple graph variants.
/// Anything else is preserved verbatim as `Opaque` rather than being an
/// untyped hole.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ExtractedObject {
    Document(TextWithTriples),
    Triple(Triple),
    Opaque(Value),
}

/// A result of extracting knowledge from text.
///
/// `named_entities` defaults to an empty ordered sequence (never null),
/// so consumers never special-case absence; discovery order is preserved.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawExtractionResult", into = "RawExtractionResult")]
pub struct ExtractionResult {
    /// Identifier of the source text.
    pub input_id: Option<String>,
    /// Title of the source text.
    pub input_title: Option<String>,
    /// The source text itself.
    pub input_text: Option<String>,
    /// Unprocessed model output.
    pub raw_completion_output: Option<String>,
    /// The prompt issued to the model.
    pub prompt: Option<String>,
    /// The complex object extracted from the text.
    pub extracted_object: Option<ExtractedObject>,
    /// Named entities extracted from the text, in discovery order.
    pub named_entities: Vec<NamedEntity>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawExtractionResult {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    input_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    input_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    input_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    raw_completion_output: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    prompt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    extracted_object: Option<ExtractedObject>,
    #[serde(default)]
    named_entities: Vec<NamedEntity>,
}

impl TryFrom<RawExtractionResult> for ExtractionResult {
    type Error = TalismanError;

    fn try_from(raw: RawExtractionResult) -> Result<Self> {
        let mut result = ExtractionResult::new()?;
        result.input_id = raw.input_id;
        result.input_title = raw.input_title;
        result.input_text = raw.input_text;
        result.raw_completion_output = raw.raw_completion_output;
        result.prompt = raw.prompt;
        result.extracted_object = raw.extracted_object;
        result.named_entities = raw.named_entities;
        Ok(result)
    }
}

impl From<ExtractionResult> for RawExtractionResult {
    fn from(result: ExtractionResult) -> Self {
        Self {
            input_id: result.input_id,
            input_title: result.input_title,
            input_text: result.input_text,
            raw_completion_output: result.raw_completion_output,
            prompt: result.prompt,
            extracted_object: result.extracted_object,
            named_entities: result.named_entities,
        }
    }
}

impl ExtractionResult {
    /// Create an empty extraction result.
    pub fn new() -> Result<Self> {
        ensure_resolved("ExtractionResult")?;
        Ok(Self {
            input_id: None,
            input_title: None,
            input_text: None,
            raw_completion_output: None,
            prompt: None,
            extracted_object: None,
            named_entities: Vec::new(),
        })
    }

    /// Set the input identifier
    pub fn with_input_id(mut self, input_id: impl Into<String>) -> Self {
        self.input_id = Some(input_id.into());
        self
    }

    /// Set the input title
    pub fn with_input_title(mut self, input_title: impl Into<String>) -> Self {
        self.input_title = Some(input_title.into());
        self
    }

    /// Set the input text
    pub fn with_input_text(mut self, input_text: impl Into<String>) -> Self {
        self.input_text = Some(input_text.into());
        self
    }

    /// Set the extracted object
    pub fn with_extracted_object(mut self, extracted_object: ExtractedObject) -> Self {
        self.extracted_object = Some(extracted_object);
        self
    }

    /// Set the named-entity list
    pub fn with_named_entities(mut self, named_entities: Vec<NamedEntity>) -> Self {
        self.named_entities = named_entities;
        self
    }
}

impl Validate for ExtractionResult {
    fn type_name(&self) -> &'static str {
        "ExtractionResult"
    }

    fn validate(&self) -> Result<()> {
        Ok(())
    }
}

impl AssignFields for ExtractionResult {
    fn assign(&mut self, field: &str, value: Value) -> Result<()> {
        match field {
            "input_id" => self.input_id = opt_string_value("ExtractionResult", "input_id", value)?,
            "input_title" => {
                self.input_title = opt_string_value("ExtractionResult", "input_title", value)?
            }
            "input_text" => {
                self.input_text = opt_string_value("ExtractionResult", "input_text", value)?
            }
            "raw_completion_output" => {
                self.raw_completion_output =
                    opt_string_value("ExtractionResult", "raw_completion_output", value)?
            }
            "prompt" => self.prompt = opt_string_value("ExtractionResult", "prompt", value)?,
            "extracted_object" => {
                self.extracted_object = match value {
                    Value::Null => None,
                    other => Some(serde_json::from_value(other).map_err(|_| {
                        TalismanError::TypeMismatch {
                            type_name: "ExtractionResult",
                            field: "extracted_object",
                            expected: "document or triple graph",
                        }
                    })?),
                };
            }
            "named_entities" => {
                self.named_entities = serde_json::from_value(value).map_err(|_| {
                    TalismanError::TypeMismatch {
                        type_name: "ExtractionResult",
                        field: "named_entities",
                        expected: "list of named entities",
                    }
                })?;
            }
            _ => {
                return Err(TalismanError::SchemaViolation {
                    type_name: "ExtractionResult",
                    field: field.to_string(),
                })
            }
        }
        Ok(())
    }
}

/// A lightweight record linking a raw text span to a resolved identifier
/// and its canonical label.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawAnnotatorResult", into = "RawAnnotatorResult")]
pub struct AnnotatorResult {
    /// The raw text span that was recognized.
    pub subject_text: Option<String>,
    /// The resolved identifier, e.g. a CURIE.
    pub object_id: Option<String>,
    /// The canonical label of the resolved identifier.
    pub object_text: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawAnnotatorResult {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    subject_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    object_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    object_text: Option<String>,
}

impl TryFrom<RawAnnotatorResult> for AnnotatorResult {
    type Error = TalismanError;

    fn try_from(raw: RawAnnotatorResult) -> Result<Self> {
        let mut result = AnnotatorResult::new()?;
        result.subject_text = raw.subject_text;
        result.object_id = raw.object_id;
        result.object_text = raw.object_text;
        Ok(result)
    }
}

impl From<AnnotatorResult> for RawAnnotatorResult {
    fn from(result: AnnotatorResult) -> Self {
        Self {
            subject_text: result.subject_text,
            object_id: result.object_id,
            object_text: result.object_text,
        }
    }
}

impl AnnotatorResult {
    /// Create an empty annotator result.
    pub fn new() -> Result<Self> {
        ensure_resolved("AnnotatorResult")?;
        Ok(Self {
            subject_text: None,
            object_id: None,
            object_text: None,
        })
    }

    /// Create a fully grounded annotation.
    pub fn grounded(
        subject_text: impl Into<String>,
        object_id: impl Into<String>,
        object_text: impl Into<String>,
    ) -> Result<Self> {
        let mut result = Self::new()?;
        result.subject_text = Some(subject_text.into());
        result.object_id = Some(object_id.into());
        result.object_text = Some(object_text.into());
        Ok(result)
    }
}

impl Validate for AnnotatorResult {
    fn type_name(&self) -> &'static str {
        "AnnotatorResult"
    }

    fn validate(&self) -> Result<()> {
        Ok(())
    }
}

impl AssignFields for AnnotatorResult {
    fn assign(&mut self, field: &str, value: Value) -> Result<()> {
        match field {
            "subject_text" => {
                self.subject_text = opt_string_value("AnnotatorResult", "subject_text", value)?
            }
            "object_id" => {
                self.object_id = opt_string_value("AnnotatorResult", "object_id", value)?
            }
            "object_text" => {
                self.object_text = opt_string_value("AnnotatorResult", "object_text", value)?
            }
            _ => {
                return Err(TalismanError::SchemaViolation {
                    type_name: "AnnotatorResult",
                    field: field.to_string(),
                })
            }
        }
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::resolve_forward_refs;
    use serde_json::json;

    fn resolve() {
        resolve_forward_refs().unwrap();
    }

    #[test]
    fn test_base_entity_allows_missing_id() {
        resolve();
        let entity = NamedEntity::base().unwrap();
        assert_eq!(entity.kind(), EntityKind::NamedEntity);
        assert!(entity.id().is_none());
        assert!(entity.label().is_none());
    }

    #[test]
    fn test_typed_entities_require_id() {
        resolve();
        for kind in [
            EntityKind::Protein,
            EntityKind::Gene,
            EntityKind::RelationshipType,
            EntityKind::ProteinToGenePredicate,
        ] {
            let err = NamedEntity::new(kind, None, None).unwrap_err();
            assert!(
                matches!(
                    err,
                    TalismanError::MissingRequiredField { field: "id", .. }
                ),
                "kind {kind} should require id"
            );
        }

        let protein = NamedEntity::protein("PR:P04637").unwrap();
        assert_eq!(protein.id(), Some("PR:P04637"));
    }

    #[test]
    fn test_set_id_revalidates_requiredness() {
        resolve();
        let mut protein = NamedEntity::protein("PR:P04637").unwrap();
        let err = protein.set_id(None).unwrap_err();
        assert!(matches!(err, TalismanError::MissingRequiredField { .. }));
        // Failed assignment leaves the object unchanged.
        assert_eq!(protein.id(), Some("PR:P04637"));

        let mut base = NamedEntity::base().unwrap();
        base.set_id(Some("CHEBI:1234".to_string())).unwrap();
        base.set_id(None).unwrap();
    }

    #[test]
    fn test_entity_assign_rejects_unknown_field() {
        resolve();
        let mut entity = NamedEntity::base().unwrap();
        let err = entity.assign("species", json!("human")).unwrap_err();
        assert!(matches!(err, TalismanError::SchemaViolation { ref field, .. } if field == "species"));
    }

    #[test]
    fn test_entity_assign_rejects_wrong_type() {
        resolve();
        let mut entity = NamedEntity::base().unwrap();
        let err = entity.assign("label", json!(42)).unwrap_err();
        assert!(matches!(
            err,
            TalismanError::TypeMismatch { field: "label", .. }
        ));
    }

    #[test]
    fn test_triple_builder_round_trip() {
        resolve();
        let triple = Triple::new(TripleKind::ProteinToGeneRelationship)
            .unwrap()
            .with_subject("TP53")
            .with_predicate("regulates")
            .with_object("MDM2")
            .with_qualifier("NOT")
            .with_subject_qualifier("phosphorylated")
            .with_object_qualifier("transcript");

        assert_eq!(triple.subject.as_deref(), Some("TP53"));
        assert_eq!(triple.predicate.as_deref(), Some("regulates"));
        assert_eq!(triple.object.as_deref(), Some("MDM2"));
        assert_eq!(triple.qualifier.as_deref(), Some("NOT"));
        assert_eq!(triple.subject_qualifier.as_deref(), Some("phosphorylated"));
        assert_eq!(triple.object_qualifier.as_deref(), Some("transcript"));
    }

    #[test]
    fn test_triple_assign_unknown_field() {
        resolve();
        let mut triple = Triple::new(TripleKind::Triple).unwrap();
        let err = triple.assign("confidence", json!(0.9)).unwrap_err();
        assert!(matches!(err, TalismanError::SchemaViolation { .. }));
    }

    #[test]
    fn test_narrowed_document_rejects_base_triple() {
        resolve();
        let mut doc = TextWithTriples::new(DocumentKind::GeneProInteractionDocument).unwrap();
        let base = Triple::new(TripleKind::Triple).unwrap().with_subject("TP53");

        let err = doc.push_triple(base.clone()).unwrap_err();
        assert!(matches!(
            err,
            TalismanError::TypeMismatch {
                field: "triples",
                expected: "ProteinToGeneRelationship",
                ..
            }
        ));

        let err = doc.set_triples(vec![base]).unwrap_err();
        assert!(matches!(err, TalismanError::TypeMismatch { .. }));
        assert!(doc.triples().is_empty());
    }

    #[test]
    fn test_base_document_accepts_any_triple_kind() {
        resolve();
        let doc = TextWithTriples::new(DocumentKind::TextWithTriples)
            .unwrap()
            .with_triples(vec![
                Triple::new(TripleKind::Triple).unwrap(),
                Triple::new(TripleKind::ProteinToGeneRelationship).unwrap(),
            ])
            .unwrap();
        assert_eq!(doc.triples().len(), 2);
    }

    #[test]
    fn test_triple_order_is_preserved() {
        resolve();
        let t1 = Triple::new(TripleKind::ProteinToGeneRelationship)
            .unwrap()
            .with_subject("TP53");
        let t2 = Triple::new(TripleKind::ProteinToGeneRelationship)
            .unwrap()
            .with_subject("BRCA1");
        let t3 = Triple::new(TripleKind::ProteinToGeneRelationship)
            .unwrap()
            .with_subject("EGFR");

        for order in [
            vec![t1.clone(), t2.clone(), t3.clone()],
            vec![t3.clone(), t1.clone(), t2.clone()],
        ] {
            let doc = TextWithTriples::new(DocumentKind::GeneProInteractionDocument)
                .unwrap()
                .with_triples(order.clone())
                .unwrap();
            assert_eq!(doc.triples(), order.as_slice());
        }
    }

    #[test]
    fn test_document_defaults_to_empty_triples() {
        resolve();
        let doc = TextWithTriples::new(DocumentKind::TextWithTriples).unwrap();
        assert!(doc.triples().is_empty());
        assert!(doc.publication.is_none());
    }

    #[test]
    fn test_extraction_result_defaults() {
        resolve();
        let result = ExtractionResult::new().unwrap();
        assert!(result.named_entities.is_empty());
        assert!(result.extracted_object.is_none());
    }

    #[test]
    fn test_named_entity_order_is_preserved() {
        resolve();
        let a = NamedEntity::protein("PR:P04637").unwrap();
        let b = NamedEntity::gene("HGNC:6973").unwrap();

        let forward = ExtractionResult::new()
            .unwrap()
            .with_named_entities(vec![a.clone(), b.clone()]);
        assert_eq!(forward.named_entities, vec![a.clone(), b.clone()]);

        let backward = ExtractionResult::new()
            .unwrap()
            .with_named_entities(vec![b.clone(), a.clone()]);
        assert_eq!(backward.named_entities, vec![b, a]);
    }

    #[test]
    fn test_sentinel_distinguishable_from_absent() {
        resolve();
        let mut triple = Triple::new(TripleKind::ProteinToGeneRelationship).unwrap();
        triple
            .assign("subject_qualifier", json!("NOT_MENTIONED"))
            .unwrap();

        let populated = triple.subject_qualifier.as_deref().unwrap();
        assert_eq!(
            NullDataOptions::from_str(populated),
            Some(NullDataOptions::NotMentioned)
        );
        // The untouched qualifier stays absent, not sentinel-valued.
        assert!(triple.qualifier.is_none());
    }

    #[test]
    fn test_sentinel_round_trip() {
        let value = serde_json::to_value(NullDataOptions::UnspecifiedMethodOfAdministration).unwrap();
        assert_eq!(value, json!("UNSPECIFIED_METHOD_OF_ADMINISTRATION"));
        let back: NullDataOptions = serde_json::from_value(value).unwrap();
        assert_eq!(back, NullDataOptions::UnspecifiedMethodOfAdministration);
        assert!(NullDataOptions::from_str("MAYBE").is_none());
    }

    #[test]
    fn test_publication_assign_uses_wire_name_for_abstract() {
        resolve();
        let mut publication = Publication::new().unwrap();
        publication.assign("abstract", json!("A")).unwrap();
        assert_eq!(publication.abstract_text.as_deref(), Some("A"));

        let err = publication.assign("abstract_text", json!("A")).unwrap_err();
        assert!(matches!(err, TalismanError::SchemaViolation { .. }));
    }

    #[test]
    fn test_annotator_result_grounded() {
        resolve();
        let annotation = AnnotatorResult::grounded("TP53", "HGNC:11998", "TP53 gene").unwrap();
        assert_eq!(annotation.subject_text.as_deref(), Some("TP53"));
        assert_eq!(annotation.object_id.as_deref(), Some("HGNC:11998"));
        assert_eq!(annotation.object_text.as_deref(), Some("TP53 gene"));
    }

    #[test]
    fn test_example_scenario_tp53_regulates_mdm2() {
        resolve();
        let publication = Publication::new()
            .unwrap()
            .with_id("PMID:1")
            .with_title("T")
            .with_abstract("A");

        let triple = Triple::new(TripleKind::ProteinToGeneRelationship)
            .unwrap()
            .with_subject("TP53")
            .with_predicate("regulates")
            .with_object("MDM2");

        let doc = TextWithTriples::new(DocumentKind::GeneProInteractionDocument)
            .unwrap()
            .with_publication(publication)
            .with_triples(vec![triple])
            .unwrap();

        let result = ExtractionResult::new()
            .unwrap()
            .with_input_id("doc-1")
            .with_extracted_object(ExtractedObject::Document(doc));

        match result.extracted_object.as_ref().unwrap() {
            ExtractedObject::Document(doc) => {
                assert_eq!(doc.triples()[0].subject.as_deref(), Some("TP53"));
                assert_eq!(
                    doc.publication.as_ref().unwrap().id.as_deref(),
                    Some("PMID:1")
                );
            }
            other => panic!("expected document, got {other:?}"),
        }
    }
}
