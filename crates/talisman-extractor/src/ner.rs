//! Named Entity Recognition (NER) module
//!
//! Recognizes protein and gene mentions with two strategies:
//! - Lexicon matching: curated surface forms grounded to CURIE identifiers
//! - Pattern matching: regex heuristics for gene symbols and protein phrases
//!
//! Lexicon hits carry an identifier and a canonical label; pattern hits are
//! ungrounded and left for the loader to assign placeholder identifiers.

use std::collections::{HashMap, HashSet};

use regex::Regex;

use crate::{EntityExtractor, Mention};
use talisman_core::{EntityKind, Result};

// ============================================================================
// Protein/Gene Lexicon
// ============================================================================

/// Lexicon entry grounding a surface form to an ontology identifier.
#[derive(Debug, Clone)]
pub struct LexiconEntry {
    /// Canonical surface form.
    pub term: String,
    /// Canonical display label.
    pub label: String,
    pub kind: EntityKind,
    /// CURIE in the relevant namespace (HGNC for genes, PR for proteins).
    pub id: String,
    pub aliases: Vec<String>,
}

/// Curated protein/gene vocabulary.
pub struct ProteinGeneLexicon {
    entries: HashMap<String, LexiconEntry>,
    /// Lookup index (lowercase surface form -> entry key)
    lookup: HashMap<String, String>,
}

impl ProteinGeneLexicon {
    /// Create a lexicon seeded with well-known human genes and proteins.
    pub fn new() -> Self {
        let mut lexicon = Self {
            entries: HashMap::new(),
            lookup: HashMap::new(),
        };

        lexicon.init_genes();
        lexicon.init_proteins();
        lexicon
    }

    fn init_genes(&mut self) {
        self.add("TP53", "TP53", EntityKind::Gene, "HGNC:11998", vec!["p53 gene"]);
        self.add("MDM2", "MDM2", EntityKind::Gene, "HGNC:6973", vec!["HDM2"]);
        self.add("BRCA1", "BRCA1", EntityKind::Gene, "HGNC:1100", vec![]);
        self.add("EGFR", "EGFR", EntityKind::Gene, "HGNC:3236", vec!["ERBB1", "HER1"]);
        self.add("CDKN1A", "CDKN1A", EntityKind::Gene, "HGNC:1784", vec!["p21", "WAF1", "CIP1"]);
        self.add("CCND1", "CCND1", EntityKind::Gene, "HGNC:1582", vec!["cyclin D1 gene"]);
        self.add("MYC", "MYC", EntityKind::Gene, "HGNC:7553", vec!["c-Myc gene"]);
        self.add("VEGFA", "VEGFA", EntityKind::Gene, "HGNC:12680", vec!["VEGF gene"]);
        self.add("BAX", "BAX", EntityKind::Gene, "HGNC:959", vec![]);
        self.add("BBC3", "BBC3", EntityKind::Gene, "HGNC:17868", vec!["PUMA gene"]);
    }

    fn init_proteins(&mut self) {
        self.add(
            "p53",
            "cellular tumor antigen p53",
            EntityKind::Protein,
            "PR:P04637",
            vec!["p53 protein", "TP53 protein"],
        );
        self.add(
            "Mdm2",
            "E3 ubiquitin-protein ligase Mdm2",
            EntityKind::Protein,
            "PR:Q00987",
            vec!["MDM2 protein"],
        );
        self.add(
            "BRCA1 protein",
            "breast cancer type 1 susceptibility protein",
            EntityKind::Protein,
            "PR:P38398",
            vec![],
        );
        self.add(
            "EGFR protein",
            "epidermal growth factor receptor",
            EntityKind::Protein,
            "PR:P00533",
            vec![],
        );
        self.add(
            "STAT3",
            "signal transducer and activator of transcription 3",
            EntityKind::Protein,
            "PR:P40763",
            vec!["STAT3 protein"],
        );
        self.add(
            "beta-catenin",
            "catenin beta-1",
            EntityKind::Protein,
            "PR:P35222",
            vec!["CTNNB1 protein"],
        );
        self.add(
            "HIF-1alpha",
            "hypoxia-inducible factor 1-alpha",
            EntityKind::Protein,
            "PR:Q16665",
            vec!["HIF-1a", "HIF1A protein"],
        );
    }

    fn add(&mut self, term: &str, label: &str, kind: EntityKind, id: &str, aliases: Vec<&str>) {
        let entry = LexiconEntry {
            term: term.to_string(),
            label: label.to_string(),
            kind,
            id: id.to_string(),
            aliases: aliases.iter().map(|s| s.to_string()).collect(),
        };

        self.lookup.insert(term.to_lowercase(), term.to_string());
        for alias in &entry.aliases {
            self.lookup.insert(alias.to_lowercase(), term.to_string());
        }

        self.entries.insert(term.to_string(), entry);
    }

    /// Ground a surface form (case-insensitive) to a lexicon entry.
    pub fn ground(&self, surface: &str) -> Option<&LexiconEntry> {
        let key = self.lookup.get(&surface.to_lowercase())?;
        self.entries.get(key)
    }

    /// All entries, for vocabulary completion.
    pub fn entries(&self) -> impl Iterator<Item = &LexiconEntry> {
        self.entries.values()
    }
}

impl Default for ProteinGeneLexicon {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Rule-based NER
// ============================================================================

/// Rule-based NER combining the lexicon with regex heuristics.
pub struct RuleBasedNer {
    lexicon: ProteinGeneLexicon,
    /// Pattern rules (regex -> entity kind, confidence)
    patterns: Vec<(Regex, EntityKind, f32)>,
    /// Confidence threshold for keeping mentions
    min_confidence: f32,
}

impl RuleBasedNer {
    /// Create a new rule-based NER with the default lexicon and patterns.
    pub fn new() -> Self {
        let mut ner = Self {
            lexicon: ProteinGeneLexicon::new(),
            patterns: Vec::new(),
            min_confidence: 0.5,
        };

        // Gene symbols: short uppercase alphanumerics (TP53, CCND1).
        ner.add_pattern(r"\b[A-Z][A-Z0-9]{2,6}\b", EntityKind::Gene, 0.6);
        // Protein phrases ("Mdm2 protein", "kinase protein").
        ner.add_pattern(
            r"\b[A-Za-z][A-Za-z0-9-]*\s+protein\b",
            EntityKind::Protein,
            0.7,
        );

        ner
    }

    /// Set the confidence threshold
    pub fn with_min_confidence(mut self, min_confidence: f32) -> Self {
        self.min_confidence = min_confidence.clamp(0.0, 1.0);
        self
    }

    /// Access the underlying lexicon.
    pub fn lexicon(&self) -> &ProteinGeneLexicon {
        &self.lexicon
    }

    fn add_pattern(&mut self, pattern: &str, kind: EntityKind, confidence: f32) {
        if let Ok(regex) = Regex::new(pattern) {
            self.patterns.push((regex, kind, confidence));
        }
    }

    /// Extract mentions using regex heuristics (ungrounded).
    fn extract_by_patterns(&self, text: &str) -> Vec<Mention> {
        let mut mentions = Vec::new();

        for (regex, kind, confidence) in &self.patterns {
            for mat in regex.find_iter(text) {
                mentions.push(Mention {
                    text: mat.as_str().to_string(),
                    kind: *kind,
                    id: None,
                    canonical: None,
                    start: mat.start(),
                    end: mat.end(),
                    confidence: *confidence,
                });
            }
        }

        mentions
    }

    /// Extract mentions by lexicon lookup (grounded).
    fn extract_by_lexicon(&self, text: &str) -> Vec<Mention> {
        let mut mentions = Vec::new();
        let text_lower = text.to_lowercase();

        for (surface_lower, key) in &self.lexicon.lookup {
            let entry = match self.lexicon.entries.get(key) {
                Some(entry) => entry,
                None => continue,
            };

            for (start, matched) in text_lower.match_indices(surface_lower.as_str()) {
                let end = start + matched.len();
                // Lowercasing can shift byte offsets in non-ASCII text.
                if end > text.len()
                    || !text.is_char_boundary(start)
                    || !text.is_char_boundary(end)
                    || !is_word_bounded(text, start, end)
                {
                    continue;
                }
                mentions.push(Mention {
                    text: text[start..end].to_string(),
                    kind: entry.kind,
                    id: Some(entry.id.clone()),
                    canonical: Some(entry.label.clone()),
                    start,
                    end,
                    confidence: 0.95,
                });
            }
        }

        mentions
    }

    /// Remove overlapping mentions, keeping the highest confidence span.
    fn deduplicate(&self, mut mentions: Vec<Mention>) -> Vec<Mention> {
        // Longer spans win ties so "TP53" is not shadowed by "p53".
        mentions.sort_by(|a, b| {
            a.start
                .cmp(&b.start)
                .then_with(|| b.confidence.partial_cmp(&a.confidence).unwrap_or(std::cmp::Ordering::Equal))
                .then_with(|| b.end.cmp(&a.end))
        });

        let mut result = Vec::new();
        let mut covered: HashSet<usize> = HashSet::new();

        for mention in mentions {
            let overlaps = (mention.start..mention.end).any(|i| covered.contains(&i));
            if !overlaps {
                for i in mention.start..mention.end {
                    covered.insert(i);
                }
                result.push(mention);
            }
        }

        result.sort_by_key(|m| m.start);
        result
    }
}

impl Default for RuleBasedNer {
    fn default() -> Self {
        Self::new()
    }
}

impl EntityExtractor for RuleBasedNer {
    fn extract(&self, text: &str) -> Result<Vec<Mention>> {
        let mut mentions = self.extract_by_lexicon(text);
        mentions.extend(self.extract_by_patterns(text));

        let mentions = self.deduplicate(mentions);
        Ok(mentions
            .into_iter()
            .filter(|m| m.confidence >= self.min_confidence)
            .collect())
    }
}

/// Whether `text[start..end]` is delimited by non-word characters.
fn is_word_bounded(text: &str, start: usize, end: usize) -> bool {
    let before = text[..start].chars().next_back();
    let after = text[end..].chars().next();
    let is_word = |c: char| c.is_ascii_alphanumeric() || c == '_';
    !before.is_some_and(is_word) && !after.is_some_and(is_word)
}

// ============================================================================
// Tests
// ============================================================================
