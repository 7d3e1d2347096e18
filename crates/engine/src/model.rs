use serde::Serialize;

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

/// One bill-back claim row, scoped to one material within the cohort.
///
/// `None` means the source cell was empty or non-numeric. An absent value
/// never satisfies an equality predicate during scoring.
#[derive(Debug, Clone, Serialize)]
pub struct ClaimRecord {
    pub material_id: String,
    pub at_price: Option<f64>,
    pub case_in_part: Option<f64>,
    pub part_amount: Option<f64>,
    /// At price × case in part, supplied upstream.
    pub extended_part: Option<f64>,
}

/// One authorized deal (PPM) row, scoped to one material.
#[derive(Debug, Clone, Serialize)]
pub struct DealRecord {
    pub material_id: String,
    pub net_price: Option<f64>,
    pub quantity: Option<f64>,
    pub unit_rebate: Option<f64>,
    /// Unit rebate × quantity, supplied upstream.
    pub rebate: Option<f64>,
}

// ---------------------------------------------------------------------------
// Classification
// ---------------------------------------------------------------------------

/// The three compared fields, in mismatch-priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchField {
    AtPrice,
    CaseInPart,
    PartAmount,
}

impl std::fmt::Display for MatchField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AtPrice => write!(f, "At price"),
            Self::CaseInPart => write!(f, "Case in Part"),
            Self::PartAmount => write!(f, "Part Amount"),
        }
    }
}

/// Symbolic outcome of reconciling one record. Rendered to the textual
/// `Comment` column only at the output boundary.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Classification {
    PerfectMatch,
    FieldMismatch {
        field: MatchField,
        claim_value: Option<f64>,
        deal_value: Option<f64>,
    },
    MissingDeal,
    PpmOnly,
}

impl Classification {
    /// The `Comment` column text; `None` for a perfect match.
    pub fn comment(&self) -> Option<String> {
        match self {
            Self::PerfectMatch => None,
            Self::FieldMismatch { field, claim_value, deal_value } => Some(format!(
                "{field} mismatch ({} vs {})",
                fmt_value(*claim_value),
                fmt_value(*deal_value)
            )),
            Self::MissingDeal => Some("Missing Deal".to_string()),
            Self::PpmOnly => Some("PPM Only".to_string()),
        }
    }
}

/// Whole numbers keep a trailing `.0` ("5.0 vs 5.5"), matching the report
/// convention of the upstream extracts. Absent values print as `n/a`.
pub fn fmt_value(v: Option<f64>) -> String {
    match v {
        None => "n/a".to_string(),
        Some(v) if v == v.trunc() && v.is_finite() => format!("{v:.1}"),
        Some(v) => format!("{v}"),
    }
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

/// One row of the final result table: the union of a claim's fields, a
/// deal's fields (absent where the classification has no such side), the
/// signed variance, and the classification.
#[derive(Debug, Clone, Serialize)]
pub struct MatchOutcome {
    pub material_id: String,
    pub at_price: Option<f64>,
    pub case_in_part: Option<f64>,
    pub part_amount: Option<f64>,
    pub extended_part: Option<f64>,
    pub net_price: Option<f64>,
    pub quantity: Option<f64>,
    pub unit_rebate: Option<f64>,
    pub rebate: Option<f64>,
    pub variance: f64,
    pub classification: Classification,
}

impl MatchOutcome {
    pub fn comment(&self) -> Option<String> {
        self.classification.comment()
    }
}

// ---------------------------------------------------------------------------
// Summary + Result
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct ReconSummary {
    pub total_records: usize,
    pub perfect_matches: usize,
    pub field_mismatches: usize,
    pub missing_deals: usize,
    pub ppm_only: usize,
    pub total_variance: f64,
    pub absolute_variance: f64,
    pub percent_matched: f64,
}

/// A material group that failed and contributed no rows.
#[derive(Debug, Clone, Serialize)]
pub struct GroupWarning {
    pub material_id: String,
    pub message: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReconMeta {
    pub config_name: String,
    pub engine_version: String,
    pub close_threshold: f64,
    pub strategy: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReconResult {
    pub meta: ReconMeta,
    pub summary: ReconSummary,
    pub rows: Vec<MatchOutcome>,
    pub warnings: Vec<GroupWarning>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn comment_rendering() {
        assert_eq!(Classification::PerfectMatch.comment(), None);
        assert_eq!(
            Classification::MissingDeal.comment().as_deref(),
            Some("Missing Deal")
        );
        assert_eq!(
            Classification::PpmOnly.comment().as_deref(),
            Some("PPM Only")
        );
        let mismatch = Classification::FieldMismatch {
            field: MatchField::AtPrice,
            claim_value: Some(5.0),
            deal_value: Some(5.5),
        };
        assert_eq!(
            mismatch.comment().as_deref(),
            Some("At price mismatch (5.0 vs 5.5)")
        );
    }

    #[test]
    fn comment_with_absent_side() {
        let mismatch = Classification::FieldMismatch {
            field: MatchField::CaseInPart,
            claim_value: Some(10.0),
            deal_value: None,
        };
        assert_eq!(
            mismatch.comment().as_deref(),
            Some("Case in Part mismatch (10.0 vs n/a)")
        );
    }

    #[test]
    fn value_formatting() {
        assert_eq!(fmt_value(Some(5.0)), "5.0");
        assert_eq!(fmt_value(Some(5.5)), "5.5");
        assert_eq!(fmt_value(Some(-3.25)), "-3.25");
        assert_eq!(fmt_value(None), "n/a");
    }

    #[test]
    fn field_captions() {
        assert_eq!(MatchField::AtPrice.to_string(), "At price");
        assert_eq!(MatchField::CaseInPart.to_string(), "Case in Part");
        assert_eq!(MatchField::PartAmount.to_string(), "Part Amount");
    }
}
