//! Drug name normalizer.
//!
//! Handles:
//! - Case/whitespace normalization ("  Warfarin " -> "warfarin")
//! - Brand -> generic alias expansion (ecosprin -> aspirin)
//! - Near-miss spelling recovery via fuzzy matching ("clopidogrl" -> "clopidogrel")

use std::collections::HashMap;

use strsim::{jaro_winkler, normalized_levenshtein};

use crate::models::normalize_name;

/// Minimum similarity for a fuzzy spelling correction.
///
/// Set high: correcting to the wrong drug is worse than passing an unknown
/// name through unchanged.
const FUZZY_THRESHOLD: f64 = 0.93;

/// Normalizer for drug names.
pub struct Normalizer {
    /// Alias map: brand/spoken name -> generic name
    aliases: HashMap<String, String>,
    /// Known generic vocabulary (fuzzy-match targets)
    generics: Vec<String>,
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Normalizer {
    /// Create a normalizer with the default brand mappings.
    pub fn new() -> Self {
        let aliases = Self::default_aliases();
        let mut normalizer = Self {
            aliases,
            generics: Vec::new(),
        };
        normalizer.rebuild_vocabulary();
        normalizer
    }

    /// Canonical identifier for a raw drug name.
    ///
    /// Unknown names pass through normalized but otherwise unchanged; the
    /// engine makes no guess about names outside its vocabulary.
    pub fn canonical(&self, name: &str) -> String {
        let normalized = normalize_name(name);
        if normalized.is_empty() {
            return normalized;
        }

        if let Some(generic) = self.aliases.get(&normalized) {
            return generic.clone();
        }
        if self.generics.iter().any(|g| g == &normalized) {
            return normalized;
        }

        // Near-miss recovery against the known vocabulary only.
        let mut best: Option<(&str, f64)> = None;
        for candidate in self.aliases.keys().chain(self.generics.iter()) {
            let score = fuzzy_match(&normalized, candidate);
            if score >= FUZZY_THRESHOLD && best.map_or(true, |(_, s)| score > s) {
                best = Some((candidate, score));
            }
        }

        match best {
            Some((matched, _)) => self
                .aliases
                .get(matched)
                .cloned()
                .unwrap_or_else(|| matched.to_string()),
            None => normalized,
        }
    }

    /// Add a custom alias mapping.
    pub fn add_alias(&mut self, alias: &str, generic: &str) {
        self.aliases
            .insert(normalize_name(alias), normalize_name(generic));
        self.rebuild_vocabulary();
    }

    /// Merge a batch of aliases (e.g., loaded from the knowledge base).
    pub fn extend_aliases(&mut self, aliases: HashMap<String, String>) {
        for (alias, generic) in aliases {
            self.aliases
                .insert(normalize_name(&alias), normalize_name(&generic));
        }
        self.rebuild_vocabulary();
    }

    fn rebuild_vocabulary(&mut self) {
        let mut generics: Vec<String> = self.aliases.values().cloned().collect();
        generics.sort();
        generics.dedup();
        self.generics = generics;
    }

    /// Default brand -> generic mappings (common Indian retail brands).
    fn default_aliases() -> HashMap<String, String> {
        let mut map = HashMap::new();

        // Pain relievers
        map.insert("crocin".into(), "paracetamol".into());
        map.insert("calpol".into(), "paracetamol".into());
        map.insert("dolo".into(), "paracetamol".into());
        map.insert("brufen".into(), "ibuprofen".into());

        // Cardiac / antihypertensives
        map.insert("amlong".into(), "amlodipine".into());
        map.insert("amlokind".into(), "amlodipine".into());
        map.insert("metolar".into(), "metoprolol".into());
        map.insert("losar".into(), "losartan".into());
        map.insert("telma".into(), "telmisartan".into());

        // Anticoagulants / antiplatelets
        map.insert("coumadin".into(), "warfarin".into());
        map.insert("warf".into(), "warfarin".into());
        map.insert("ecosprin".into(), "aspirin".into());
        map.insert("disprin".into(), "aspirin".into());
        map.insert("plavix".into(), "clopidogrel".into());
        map.insert("clopitab".into(), "clopidogrel".into());

        // Diabetes
        map.insert("glycomet".into(), "metformin".into());
        map.insert("amaryl".into(), "glimepiride".into());
        map.insert("galvus".into(), "vildagliptin".into());

        // GI
        map.insert("omez".into(), "omeprazole".into());
        map.insert("pantocid".into(), "pantoprazole".into());
        map.insert("pan".into(), "pantoprazole".into());
        map.insert("rantac".into(), "ranitidine".into());

        // Antibiotics
        map.insert("azee".into(), "azithromycin".into());
        map.insert("azithral".into(), "azithromycin".into());
        map.insert("ciplox".into(), "ciprofloxacin".into());
        map.insert("mox".into(), "amoxicillin".into());

        // Statins
        map.insert("zocor".into(), "simvastatin".into());
        map.insert("simvotin".into(), "simvastatin".into());

        map
    }
}

/// Compute fuzzy string similarity using combined metrics.
fn fuzzy_match(a: &str, b: &str) -> f64 {
    // Jaro-Winkler favors shared prefixes (typical of drug name typos);
    // Levenshtein guards overall shape.
    let jw = jaro_winkler(a, b);
    let lev = normalized_levenshtein(a, b);

    jw * 0.6 + lev * 0.4
}
