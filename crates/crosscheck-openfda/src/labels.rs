//! OpenFDA drug-label parsing.
//!
//! Turns `drug/label.json` payloads into interaction records: pull the
//! `drug_interactions` narrative, split it into "Drug: description" clauses,
//! classify each clause's severity from its wording.

use serde::Deserialize;
use thiserror::Error;
use tracing::warn;

use crosscheck_core::models::{normalize_name, DrugPair, InteractionRecord, Severity};

/// Label parsing errors.
#[derive(Error, Debug)]
pub enum LabelError {
    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("Invalid response format: {0}")]
    InvalidFormat(String),
}

pub type LabelResult<T> = Result<T, LabelError>;

/// One drug label with its interaction narrative.
#[derive(Debug, Clone, PartialEq)]
pub struct DrugLabel {
    /// Generic name of the labeled drug (normalized)
    pub generic_name: String,
    /// Raw `drug_interactions` section text
    pub interaction_text: String,
}

/// One clause extracted from a label's interaction narrative.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelClause {
    /// The other drug named by the clause (normalized)
    pub other_drug: String,
    pub description: String,
}

#[derive(Debug, Deserialize)]
struct LabelResponse {
    #[serde(default)]
    results: Vec<LabelEntry>,
}

#[derive(Debug, Deserialize)]
struct LabelEntry {
    #[serde(default)]
    openfda: OpenFdaFields,
    #[serde(default)]
    drug_interactions: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
struct OpenFdaFields {
    #[serde(default)]
    generic_name: Vec<String>,
}

/// Parse an OpenFDA label API response into labels with interaction text.
///
/// Entries without a generic name or without an interaction section are
/// skipped; they carry nothing the knowledge base can use.
pub fn parse_label_response(json: &str) -> LabelResult<Vec<DrugLabel>> {
    let response: LabelResponse = serde_json::from_str(json)?;

    let labels = response
        .results
        .into_iter()
        .filter_map(|entry| {
            let generic = entry.openfda.generic_name.first()?;
            let text = entry.drug_interactions.first()?;
            if text.trim().is_empty() {
                return None;
            }
            Some(DrugLabel {
                generic_name: normalize_name(generic),
                interaction_text: text.clone(),
            })
        })
        .collect();

    Ok(labels)
}

/// Split an interaction narrative into per-drug clauses.
///
/// Labels commonly list interactions as "Drug: what happens." lines; anything
/// that does not fit that shape is dropped rather than guessed at.
pub fn extract_clauses(label: &DrugLabel) -> Vec<LabelClause> {
    let mut clauses = Vec::new();

    for segment in label.interaction_text.split(['\n', ';']) {
        let Some((name, description)) = segment.split_once(':') else {
            continue;
        };
        let name = name.trim();
        let description = description.trim();

        if !looks_like_drug_name(name) || description.len() < 10 {
            continue;
        }

        clauses.push(LabelClause {
            other_drug: normalize_name(name),
            description: description.to_string(),
        });
    }

    clauses
}

/// Classify clause severity from its wording.
///
/// Keyword tiers are checked heaviest-first so "serious, monitor closely"
/// classifies as critical, not moderate. Returns `None` when no tier matches;
/// the caller decides whether to drop or default such clauses.
pub fn classify_severity(description: &str) -> Option<Severity> {
    let text = description.to_lowercase();

    const CRITICAL: &[&str] = &[
        "contraindicated",
        "should not be used",
        "fatal",
        "life-threatening",
        "serious",
        "severe",
        "significant",
        "major interaction",
        "avoid combination",
    ];
    const MODERATE: &[&str] = &["monitor", "caution", "reduce dose", "moderate interaction"];
    const MINOR: &[&str] = &["minor", "mild", "usually no adjustment needed"];

    if CRITICAL.iter().any(|kw| text.contains(kw)) {
        return Some(Severity::Critical);
    }
    if MODERATE.iter().any(|kw| text.contains(kw)) {
        return Some(Severity::Moderate);
    }
    if MINOR.iter().any(|kw| text.contains(kw)) {
        return Some(Severity::Minor);
    }
    None
}

/// Convert a label into interaction records for the knowledge base.
///
/// Clauses whose severity cannot be classified are skipped with a warning,
/// keeping stored tiers exact (same posture as the JSON import path).
pub fn to_records(label: &DrugLabel) -> Vec<InteractionRecord> {
    extract_clauses(label)
        .into_iter()
        .filter_map(|clause| {
            let Some(severity) = classify_severity(&clause.description) else {
                warn!(
                    drug = %label.generic_name,
                    other = %clause.other_drug,
                    "skipping clause with unclassifiable severity"
                );
                return None;
            };
            let pair = DrugPair::new(&label.generic_name, &clause.other_drug)?;
            Some(InteractionRecord {
                pair,
                severity,
                title: first_sentence(&clause.description),
                description: clause.description,
                recommended_action: String::new(),
                source: "openfda".into(),
            })
        })
        .collect()
}

fn looks_like_drug_name(name: &str) -> bool {
    let word_count = name.split_whitespace().count();
    name.len() >= 3
        && name.len() <= 40
        && (1..=4).contains(&word_count)
        && name
            .chars()
            .all(|c| c.is_alphabetic() || c.is_whitespace() || c == '-')
}

fn first_sentence(text: &str) -> String {
    match text.split_once('.') {
        Some((head, _)) if !head.trim().is_empty() => head.trim().to_string(),
        _ => text.trim().to_string(),
    }
}
