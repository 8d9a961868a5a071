//! Daily dose sanity checks against published limits.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::models::normalize_name;

/// Safe daily range for one drug, in milligrams.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DoseLimit {
    /// Usual adult single dose
    pub standard_mg: f64,
    /// Maximum total over 24 hours
    pub max_daily_mg: f64,
}

/// Outcome of a dose check.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DoseAlert {
    WithinRange,
    /// Single dose above the usual adult dose but daily total within limits
    AboveStandard,
    /// Daily total exceeds the published maximum
    OverMaximum,
}

/// Checker holding per-drug limits (WHO DDD-style reference values).
pub struct DosageChecker {
    limits: HashMap<String, DoseLimit>,
}

impl Default for DosageChecker {
    fn default() -> Self {
        Self::builtin()
    }
}

impl DosageChecker {
    /// Checker with the built-in reference table for common drugs.
    pub fn builtin() -> Self {
        let mut limits = HashMap::new();

        // Cardiovascular
        limits.insert("amlodipine".into(), DoseLimit { standard_mg: 5.0, max_daily_mg: 10.0 });
        limits.insert("metoprolol".into(), DoseLimit { standard_mg: 50.0, max_daily_mg: 400.0 });
        limits.insert("losartan".into(), DoseLimit { standard_mg: 50.0, max_daily_mg: 100.0 });

        // Diabetes
        limits.insert("metformin".into(), DoseLimit { standard_mg: 500.0, max_daily_mg: 2550.0 });
        limits.insert("glimepiride".into(), DoseLimit { standard_mg: 2.0, max_daily_mg: 8.0 });

        // Pain/inflammation
        limits.insert("ibuprofen".into(), DoseLimit { standard_mg: 400.0, max_daily_mg: 2400.0 });
        limits.insert("paracetamol".into(), DoseLimit { standard_mg: 500.0, max_daily_mg: 4000.0 });

        // Antibiotics
        limits.insert("amoxicillin".into(), DoseLimit { standard_mg: 500.0, max_daily_mg: 6000.0 });
        limits.insert("azithromycin".into(), DoseLimit { standard_mg: 500.0, max_daily_mg: 500.0 });

        // GI
        limits.insert("omeprazole".into(), DoseLimit { standard_mg: 20.0, max_daily_mg: 80.0 });
        limits.insert("pantoprazole".into(), DoseLimit { standard_mg: 40.0, max_daily_mg: 80.0 });

        Self { limits }
    }

    /// Empty checker, to be filled from an external limits table.
    pub fn empty() -> Self {
        Self { limits: HashMap::new() }
    }

    pub fn set_limit(&mut self, drug_id: &str, limit: DoseLimit) {
        self.limits.insert(normalize_name(drug_id), limit);
    }

    pub fn limit_for(&self, drug_id: &str) -> Option<&DoseLimit> {
        self.limits.get(&normalize_name(drug_id))
    }

    /// Check a dosing plan (single dose x doses per day).
    ///
    /// Returns `None` for drugs outside the table: no limit data means no
    /// claim either way, the same posture the interaction engine takes on
    /// failed lookups.
    pub fn check(&self, drug_id: &str, single_dose_mg: f64, doses_per_day: u32) -> Option<DoseAlert> {
        let limit = self.limit_for(drug_id)?;
        let daily = single_dose_mg * f64::from(doses_per_day);

        if daily > limit.max_daily_mg {
            Some(DoseAlert::OverMaximum)
        } else if single_dose_mg > limit.standard_mg {
            Some(DoseAlert::AboveStandard)
        } else {
            Some(DoseAlert::WithinRange)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_within_range() {
        let checker = DosageChecker::builtin();
        assert_eq!(
            checker.check("Paracetamol", 500.0, 3),
            Some(DoseAlert::WithinRange)
        );
    }

    #[test]
    fn test_above_standard_single_dose() {
        let checker = DosageChecker::builtin();
        // 1000 mg per dose is above the usual 500, daily total still under 4 g
        assert_eq!(
            checker.check("paracetamol", 1000.0, 3),
            Some(DoseAlert::AboveStandard)
        );
    }

    #[test]
    fn test_over_daily_maximum() {
        let checker = DosageChecker::builtin();
        // 1000 mg x 5 = 5 g, over the 4 g daily ceiling
        assert_eq!(
            checker.check("paracetamol", 1000.0, 5),
            Some(DoseAlert::OverMaximum)
        );
    }

    #[test]
    fn test_unknown_drug_makes_no_claim() {
        let checker = DosageChecker::builtin();
        assert_eq!(checker.check("unlisted-drug", 100.0, 1), None);
    }

    #[test]
    fn test_custom_limit() {
        let mut checker = DosageChecker::empty();
        checker.set_limit("Telmisartan", DoseLimit { standard_mg: 40.0, max_daily_mg: 80.0 });
        assert_eq!(
            checker.check("telmisartan", 40.0, 1),
            Some(DoseAlert::WithinRange)
        );
        assert_eq!(
            checker.check("telmisartan", 80.0, 2),
            Some(DoseAlert::OverMaximum)
        );
    }
}
