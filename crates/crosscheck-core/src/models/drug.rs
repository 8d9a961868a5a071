//! Drug identity models.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A medication reference value.
///
/// Within a single check the normalized name is the natural key: two entries
/// that normalize to the same identifier are the same drug.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Drug {
    /// Normalized identifier (lowercase, trimmed, single-spaced)
    pub id: String,
    /// Name as written on the prescription
    pub display_name: String,
}

impl Drug {
    /// Create a drug from a raw name, normalizing the identifier.
    pub fn new(name: &str) -> Self {
        Self {
            id: normalize_name(name),
            display_name: name.trim().to_string(),
        }
    }
}

/// Collapse a raw drug name into its normalized identifier.
pub fn normalize_name(name: &str) -> String {
    name.trim()
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// An unordered pair of distinct drug identifiers.
///
/// The constructor canonicalizes order, so `{a, b}` and `{b, a}` compare and
/// hash identically. Invariant: `a < b`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DrugPair {
    pub a: String,
    pub b: String,
}

impl DrugPair {
    /// Build the canonical pair for two identifiers.
    ///
    /// Returns `None` when both normalize to the same identifier (a drug has
    /// no interaction with itself).
    pub fn new(x: &str, y: &str) -> Option<Self> {
        let x = normalize_name(x);
        let y = normalize_name(y);
        match x.cmp(&y) {
            std::cmp::Ordering::Less => Some(Self { a: x, b: y }),
            std::cmp::Ordering::Greater => Some(Self { a: y, b: x }),
            std::cmp::Ordering::Equal => None,
        }
    }

    /// Stable storage key for the pair.
    pub fn key(&self) -> String {
        format!("{}|{}", self.a, self.b)
    }

    /// Check whether an identifier is one side of the pair.
    pub fn contains(&self, id: &str) -> bool {
        self.a == id || self.b == id
    }

    /// The other side of the pair, if `id` is a member.
    pub fn other(&self, id: &str) -> Option<&str> {
        if self.a == id {
            Some(&self.b)
        } else if self.b == id {
            Some(&self.a)
        } else {
            None
        }
    }
}

impl fmt::Display for DrugPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} + {}", self.a, self.b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_name() {
        assert_eq!(normalize_name("  Warfarin "), "warfarin");
        assert_eq!(normalize_name("Vitamin   D3"), "vitamin d3");
        assert_eq!(normalize_name("ASPIRIN"), "aspirin");
    }

    #[test]
    fn test_pair_is_unordered() {
        let p1 = DrugPair::new("Warfarin", "aspirin").unwrap();
        let p2 = DrugPair::new("Aspirin", "warfarin").unwrap();
        assert_eq!(p1, p2);
        assert_eq!(p1.key(), "aspirin|warfarin");
    }

    #[test]
    fn test_self_pair_rejected() {
        assert!(DrugPair::new("aspirin", "Aspirin ").is_none());
    }

    #[test]
    fn test_pair_membership() {
        let pair = DrugPair::new("warfarin", "aspirin").unwrap();
        assert!(pair.contains("warfarin"));
        assert_eq!(pair.other("aspirin"), Some("warfarin"));
        assert_eq!(pair.other("metformin"), None);
    }
}
