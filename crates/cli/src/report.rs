//! Text and Markdown summary reports for a reconciliation run.

use dealproof_engine::model::{Classification, MatchOutcome, ReconResult};

/// Mismatched rows ordered by absolute variance, largest first.
fn top_mismatches(result: &ReconResult, limit: usize) -> Vec<&MatchOutcome> {
    let mut rows: Vec<&MatchOutcome> = result
        .rows
        .iter()
        .filter(|r| matches!(r.classification, Classification::FieldMismatch { .. }))
        .collect();
    rows.sort_by(|a, b| {
        b.variance
            .abs()
            .partial_cmp(&a.variance.abs())
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    rows.truncate(limit);
    rows
}

fn category_breakdown(result: &ReconResult) -> Vec<(&'static str, usize)> {
    let s = &result.summary;
    vec![
        ("Perfect Match", s.perfect_matches),
        ("Mismatch", s.field_mismatches),
        ("Missing Deal", s.missing_deals),
        ("PPM Only", s.ppm_only),
    ]
}

pub fn render_markdown(result: &ReconResult, generated_at: &str) -> String {
    let s = &result.summary;
    let mut out = String::new();

    out.push_str("# Bill-back Reconciliation Summary\n\n");
    out.push_str(&format!("Config: {}\n", result.meta.config_name));
    out.push_str(&format!("Generated on: {generated_at}\n\n"));

    out.push_str("## Summary\n\n");
    out.push_str("| Metric | Value |\n|--------|-------|\n");
    out.push_str(&format!("| Total Records | {} |\n", s.total_records));
    out.push_str(&format!(
        "| Perfect Matches | {} ({:.1}%) |\n",
        s.perfect_matches, s.percent_matched
    ));
    out.push_str(&format!("| Mismatches | {} |\n", s.field_mismatches));
    out.push_str(&format!("| Missing Deals | {} |\n", s.missing_deals));
    out.push_str(&format!("| PPM Only | {} |\n", s.ppm_only));
    out.push_str(&format!("| Total Variance | ${:.2} |\n", s.total_variance));
    out.push_str(&format!("| Absolute Variance | ${:.2} |\n", s.absolute_variance));

    out.push_str("\n## Category Breakdown\n\n");
    for (name, count) in category_breakdown(result) {
        out.push_str(&format!("- {name}: {count}\n"));
    }

    let top = top_mismatches(result, 10);
    if !top.is_empty() {
        out.push_str("\n## Top Mismatches by Variance\n\n");
        out.push_str("| Material | VAR | Comment |\n|----------|-----|--------|\n");
        for row in top {
            out.push_str(&format!(
                "| {} | ${:.2} | {} |\n",
                row.material_id,
                row.variance,
                row.comment().unwrap_or_default()
            ));
        }
    }

    if !result.warnings.is_empty() {
        out.push_str("\n## Skipped Material Groups\n\n");
        for w in &result.warnings {
            out.push_str(&format!("- {}: {}\n", w.material_id, w.message));
        }
    }

    out
}

pub fn render_text(result: &ReconResult, generated_at: &str) -> String {
    let s = &result.summary;
    let mut out = String::new();

    out.push_str("BILL-BACK RECONCILIATION SUMMARY\n");
    out.push_str("================================\n");
    out.push_str(&format!("Config: {}\n", result.meta.config_name));
    out.push_str(&format!("Generated on: {generated_at}\n\n"));

    out.push_str("SUMMARY\n-------\n");
    out.push_str(&format!("Total Records: {}\n", s.total_records));
    out.push_str(&format!(
        "Perfect Matches: {} ({:.1}%)\n",
        s.perfect_matches, s.percent_matched
    ));
    out.push_str(&format!("Mismatches: {}\n", s.field_mismatches));
    out.push_str(&format!("Missing Deals: {}\n", s.missing_deals));
    out.push_str(&format!("PPM Only: {}\n", s.ppm_only));
    out.push_str(&format!("Total Variance: ${:.2}\n", s.total_variance));
    out.push_str(&format!("Absolute Variance: ${:.2}\n", s.absolute_variance));

    out.push_str("\nCATEGORY BREAKDOWN\n------------------\n");
    for (name, count) in category_breakdown(result) {
        out.push_str(&format!("{name}: {count}\n"));
    }

    let top = top_mismatches(result, 10);
    if !top.is_empty() {
        out.push_str("\nTOP MISMATCHES BY VARIANCE\n--------------------------\n");
        out.push_str(&format!("{:<15} {:>12} {}\n", "Material", "VAR", "Comment"));
        for row in top {
            out.push_str(&format!(
                "{:<15} {:>12.2} {}\n",
                row.material_id,
                row.variance,
                row.comment().unwrap_or_default()
            ));
        }
    }

    if !result.warnings.is_empty() {
        out.push_str("\nSKIPPED MATERIAL GROUPS\n-----------------------\n");
        for w in &result.warnings {
            out.push_str(&format!("{}: {}\n", w.material_id, w.message));
        }
    }

    out
}
