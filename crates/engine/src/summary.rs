use crate::model::{Classification, MatchOutcome, ReconSummary};

/// Compute summary statistics from assembled result rows.
pub fn compute_summary(rows: &[MatchOutcome]) -> ReconSummary {
    let mut perfect_matches = 0;
    let mut field_mismatches = 0;
    let mut missing_deals = 0;
    let mut ppm_only = 0;
    let mut total_variance = 0.0;
    let mut absolute_variance = 0.0;

    for row in rows {
        match row.classification {
            Classification::PerfectMatch => perfect_matches += 1,
            Classification::FieldMismatch { .. } => field_mismatches += 1,
            Classification::MissingDeal => missing_deals += 1,
            Classification::PpmOnly => ppm_only += 1,
        }
        total_variance += row.variance;
        absolute_variance += row.variance.abs();
    }

    let percent_matched = if rows.is_empty() {
        0.0
    } else {
        perfect_matches as f64 / rows.len() as f64 * 100.0
    };

    ReconSummary {
        total_records: rows.len(),
        perfect_matches,
        field_mismatches,
        missing_deals,
        ppm_only,
        total_variance,
        absolute_variance,
        percent_matched,
    }
}
