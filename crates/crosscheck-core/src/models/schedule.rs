//! Prescriptions and daily schedule models.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::Drug;

/// A named time-of-day bucket in the unified daily schedule.
///
/// Ordering is chronological, with as-needed entries last.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Slot {
    Morning,
    Afternoon,
    Evening,
    Night,
    AsNeeded,
}

impl Slot {
    /// Expand a prescription frequency code into slots.
    ///
    /// Covers the shorthand found on printed prescriptions: `OD`, `BD`, `TID`,
    /// `QID`, `HS`, `SOS`, `STAT` and the `1-0-1` three-part notation.
    /// Unrecognized codes map to as-needed, so a parsing gap never drops a
    /// medication from the schedule.
    pub fn from_frequency_code(code: &str) -> Vec<Slot> {
        match code.trim().to_uppercase().as_str() {
            "OD" | "1-0-0" | "STAT" => vec![Slot::Morning],
            "0-1-0" => vec![Slot::Afternoon],
            "0-0-1" | "HS" => vec![Slot::Night],
            "BD" | "1-0-1" => vec![Slot::Morning, Slot::Night],
            "TID" | "1-1-1" => vec![Slot::Morning, Slot::Afternoon, Slot::Night],
            "QID" => vec![Slot::Morning, Slot::Afternoon, Slot::Evening, Slot::Night],
            "SOS" => vec![Slot::AsNeeded],
            _ => vec![Slot::AsNeeded],
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Slot::Morning => "Morning",
            Slot::Afternoon => "Afternoon",
            Slot::Evening => "Evening",
            Slot::Night => "Night",
            Slot::AsNeeded => "As needed",
        }
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One drug assigned to one slot within a prescription.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SlotAssignment {
    pub drug: Drug,
    /// Dose as written (e.g., "75 mg")
    pub dose: Option<String>,
    pub slot: Slot,
}

/// A single prescription: one source (prescriber/visit) and its dosing slots.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Prescription {
    /// Stable source identifier, generated locally
    pub source_id: String,
    /// Prescriber or clinic label shown to the patient
    pub prescriber: String,
    pub assignments: Vec<SlotAssignment>,
}

impl Prescription {
    /// Create an empty prescription with a generated source id.
    pub fn new(prescriber: impl Into<String>) -> Self {
        Self {
            source_id: uuid::Uuid::new_v4().to_string(),
            prescriber: prescriber.into(),
            assignments: Vec::new(),
        }
    }

    /// Create a prescription with an explicit source id (e.g., a vault key).
    pub fn with_source_id(source_id: impl Into<String>, prescriber: impl Into<String>) -> Self {
        Self {
            source_id: source_id.into(),
            prescriber: prescriber.into(),
            assignments: Vec::new(),
        }
    }

    /// Assign a drug directly to a slot.
    pub fn assign(&mut self, drug: Drug, dose: Option<String>, slot: Slot) {
        self.assignments.push(SlotAssignment { drug, dose, slot });
    }

    /// Add a medication by frequency code, expanding it into slot assignments.
    pub fn add_medication(&mut self, drug: Drug, dose: Option<String>, frequency: &str) {
        for slot in Slot::from_frequency_code(frequency) {
            self.assignments.push(SlotAssignment {
                drug: drug.clone(),
                dose: dose.clone(),
                slot,
            });
        }
    }

    /// All drugs named by this prescription (may repeat across slots).
    pub fn drugs(&self) -> impl Iterator<Item = &Drug> {
        self.assignments.iter().map(|a| &a.drug)
    }
}

/// One row of the merged daily schedule.
///
/// A drug prescribed by two sources for the same slot appears once per source,
/// so the patient sees both entries and where each came from.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScheduleEntry {
    pub drug: Drug,
    pub dose: Option<String>,
    /// Source id of the owning prescription
    pub source: String,
    /// Prescriber label of the owning prescription
    pub prescriber: String,
    /// Set when the drug participates in a cross-source interaction
    pub conflict: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frequency_codes() {
        assert_eq!(Slot::from_frequency_code("OD"), vec![Slot::Morning]);
        assert_eq!(Slot::from_frequency_code("bd"), vec![Slot::Morning, Slot::Night]);
        assert_eq!(
            Slot::from_frequency_code("1-1-1"),
            vec![Slot::Morning, Slot::Afternoon, Slot::Night]
        );
        assert_eq!(
            Slot::from_frequency_code("QID"),
            vec![Slot::Morning, Slot::Afternoon, Slot::Evening, Slot::Night]
        );
        assert_eq!(Slot::from_frequency_code("HS"), vec![Slot::Night]);
        assert_eq!(Slot::from_frequency_code("SOS"), vec![Slot::AsNeeded]);
    }

    #[test]
    fn test_unrecognized_code_is_as_needed() {
        assert_eq!(Slot::from_frequency_code("Q6H"), vec![Slot::AsNeeded]);
        assert_eq!(Slot::from_frequency_code(""), vec![Slot::AsNeeded]);
    }

    #[test]
    fn test_add_medication_expands_slots() {
        let mut rx = Prescription::new("Dr. Mehta");
        rx.add_medication(Drug::new("Metformin"), Some("500 mg".into()), "BD");

        assert_eq!(rx.assignments.len(), 2);
        assert_eq!(rx.assignments[0].slot, Slot::Morning);
        assert_eq!(rx.assignments[1].slot, Slot::Night);
        assert_eq!(rx.source_id.len(), 36); // UUID format
    }

    #[test]
    fn test_slot_ordering_is_chronological() {
        assert!(Slot::Morning < Slot::Afternoon);
        assert!(Slot::Night < Slot::AsNeeded);
    }
}
