//! Relation Extraction (RE) module
//!
//! Extracts protein-to-gene relation mentions from text by pairing
//! recognized entity mentions whose connecting text contains a predicate
//! keyword. Detects simple negation ("does not activate") and surfaces it
//! as a statement qualifier rather than dropping the relation.

use crate::{Mention, RelationExtractor, RelationMention};
use talisman_core::{ExtractionConfig, Result};

// ============================================================================
// Predicate vocabulary
// ============================================================================

/// Keyword pattern mapping connecting text to a predicate label.
#[derive(Debug, Clone)]
pub struct PredicatePattern {
    /// Keywords whose presence between two mentions signals the predicate.
    pub keywords: Vec<String>,
    /// Predicate label emitted on the triple.
    pub predicate: String,
    /// Confidence score
    pub confidence: f32,
}

/// Negation markers checked in the connecting text.
const NEGATION_MARKERS: &[&str] = &["does not", "do not", "did not", "fails to", "cannot"];

// ============================================================================
// Rule-based RE
// ============================================================================

/// Rule-based relation extractor with a protein-to-gene predicate vocabulary.
pub struct RuleBasedRelationExtractor {
    patterns: Vec<PredicatePattern>,
    /// Maximum distance in bytes between paired mentions
    max_pair_distance: usize,
    /// Confidence threshold for keeping relations
    min_confidence: f32,
}

impl RuleBasedRelationExtractor {
    /// Create a new extractor with the default predicate vocabulary.
    pub fn new() -> Self {
        let mut re = Self {
            patterns: Vec::new(),
            max_pair_distance: 120,
            min_confidence: 0.5,
        };

        // More specific predicates first: "upregulate" and "transactivate"
        // contain "regulate"/"activate" and must win the keyword scan.
        re.add_pattern(vec!["upregulate", "up-regulate"], "upregulates", 0.85);
        re.add_pattern(vec!["downregulate", "down-regulate"], "downregulates", 0.85);
        re.add_pattern(vec!["transactivate"], "transactivates", 0.85);
        re.add_pattern(vec!["regulate", "regulation of"], "regulates", 0.85);
        re.add_pattern(vec!["activate", "activation of"], "activates", 0.85);
        re.add_pattern(vec!["inhibit", "inhibition of"], "inhibits", 0.85);
        re.add_pattern(vec!["repress", "suppress"], "represses", 0.85);
        re.add_pattern(vec!["binds", "bind to"], "binds", 0.8);
        re.add_pattern(vec!["induces expression of", "induce"], "induces", 0.75);

        re
    }

    /// Create an extractor tuned by the application config.
    pub fn with_config(config: &ExtractionConfig) -> Self {
        Self::new()
            .with_max_pair_distance(config.max_pair_distance)
            .with_min_confidence(config.min_confidence)
    }

    /// Set the maximum subject/object distance
    pub fn with_max_pair_distance(mut self, max_pair_distance: usize) -> Self {
        self.max_pair_distance = max_pair_distance;
        self
    }

    /// Set the confidence threshold
    pub fn with_min_confidence(mut self, min_confidence: f32) -> Self {
        self.min_confidence = min_confidence.clamp(0.0, 1.0);
        self
    }

    fn add_pattern(&mut self, keywords: Vec<&str>, predicate: &str, confidence: f32) {
        self.patterns.push(PredicatePattern {
            keywords: keywords.iter().map(|s| s.to_string()).collect(),
            predicate: predicate.to_string(),
            confidence,
        });
    }

    /// Find the predicate signalled by the connecting text, if any.
    fn match_predicate(&self, gap_text: &str) -> Option<&PredicatePattern> {
        let gap_lower = gap_text.to_lowercase();
        self.patterns
            .iter()
            .find(|p| p.keywords.iter().any(|k| gap_lower.contains(k.as_str())))
    }

    fn is_negated(gap_text: &str) -> bool {
        let gap_lower = gap_text.to_lowercase();
        NEGATION_MARKERS.iter().any(|m| gap_lower.contains(m))
    }
}

impl Default for RuleBasedRelationExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl RelationExtractor for RuleBasedRelationExtractor {
    fn extract(&self, text: &str, mentions: &[Mention]) -> Result<Vec<RelationMention>> {
        let mut relations = Vec::new();

        for subject in mentions {
            for object in mentions {
                if subject.start >= object.start {
                    continue;
                }

                let distance = object.start.saturating_sub(subject.end);
                if distance > self.max_pair_distance {
                    continue;
                }

                if !text.is_char_boundary(subject.end) || !text.is_char_boundary(object.start) {
                    continue;
                }
                let gap_text = &text[subject.end..object.start];

                // Pairs split across sentences are not evidence.
                if gap_text.contains('.') {
                    continue;
                }

                if let Some(pattern) = self.match_predicate(gap_text) {
                    if pattern.confidence < self.min_confidence {
                        continue;
                    }
                    let qualifier = Self::is_negated(gap_text).then(|| "NOT".to_string());
                    relations.push(RelationMention {
                        subject: subject.clone(),
                        predicate: pattern.predicate.clone(),
                        object: object.clone(),
                        qualifier,
                        confidence: pattern.confidence,
                    });
                }
            }
        }

        Ok(relations)
    }
}

// ============================================================================
// Tests
// ============================================================================
