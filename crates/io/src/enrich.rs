// Enrichment: brand+pack labels, state attachment, posting periods, and the
// cohort filter that narrows both tables before reconciliation.

use std::collections::HashMap;

use chrono::NaiveDate;
use dealproof_engine::config::{CohortConfig, ItemRefColumns};

use crate::error::IoError;
use crate::extract::{key_string, text, ClaimRow, DealRow};
use crate::states::StatesRef;
use crate::table::Table;

/// Item cross-reference: distributor item code → (brand, package size).
#[derive(Debug, Clone, Default)]
pub struct ItemRef {
    by_item_code: HashMap<String, (String, String)>,
}

impl ItemRef {
    pub fn from_table(table: &Table, columns: &ItemRefColumns) -> Result<Self, IoError> {
        let required = |name: &str| -> Result<usize, IoError> {
            table.column_index(name).ok_or_else(|| IoError::MissingColumn {
                table: "Item x Ref".to_string(),
                column: name.to_string(),
            })
        };

        let item_code_idx = required(&columns.item_code)?;
        let brand_idx = required(&columns.brand)?;
        let pack_size_idx = required(&columns.pack_size)?;

        let mut by_item_code = HashMap::new();
        for r in 0..table.len() {
            let code = key_string(table.cell(r, item_code_idx));
            if code.is_empty() {
                continue;
            }
            let brand = text(table.cell(r, brand_idx));
            let pack_size = text(table.cell(r, pack_size_idx));
            by_item_code.insert(code, (brand, pack_size));
        }

        Ok(Self { by_item_code })
    }

    pub fn lookup(&self, item_code: &str) -> Option<&(String, String)> {
        self.by_item_code.get(item_code.trim())
    }
}

/// `"{brand} {pack_size}"`, single-space joined and trimmed, so a missing
/// half never leaves a dangling space.
pub fn brand_pack_label(brand: &str, pack_size: &str) -> String {
    format!("{} {}", brand.trim(), pack_size.trim()).trim().to_string()
}

/// Parse a posting period (`YYYYMM`, zero-padded to six digits) into
/// (year, month).
pub fn parse_posting_period(raw: &str) -> Option<(i32, u32)> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let padded = format!("{trimmed:0>6}");
    let year: i32 = padded.get(..4)?.parse().ok()?;
    let month: u32 = padded.get(padded.len() - 2..)?.parse().ok()?;
    if !(1..=12).contains(&month) {
        return None;
    }
    Some((year, month))
}

pub fn month_name(month: u32) -> Option<&'static str> {
    const MONTHS: [&str; 12] = [
        "January", "February", "March", "April", "May", "June",
        "July", "August", "September", "October", "November", "December",
    ];
    MONTHS.get(month.checked_sub(1)? as usize).copied()
}

/// Fill claim-side enrichment: brand/pack from the item cross-reference,
/// state info via company code, and the parsed posting period. When a
/// states reference is active, claims without a company code are dropped;
/// they cannot belong to any market.
pub fn enrich_claims(rows: &mut Vec<ClaimRow>, item_ref: Option<&ItemRef>, states: Option<&StatesRef>) {
    for row in rows.iter_mut() {
        if let Some(item_ref) = item_ref {
            if let Some((brand, pack_size)) = item_ref.lookup(&row.record.material_id) {
                row.brand = brand.clone();
                row.pack_size = pack_size.clone();
            }
        }
        row.brand_pack = brand_pack_label(&row.brand, &row.pack_size);

        if let (Some(states), Some(code)) = (states, row.company_code.as_deref()) {
            if let Some(info) = states.lookup(code) {
                row.state = Some(info.state.clone());
                row.region = Some(info.region.clone());
                row.state_abbrev = info.abbreviation.map(|a| a.to_string());
            }
        }

        if let Some(period) = row.posting_period.as_deref() {
            if let Some((year, month)) = parse_posting_period(period) {
                row.month_name = month_name(month);
                row.period_date = NaiveDate::from_ymd_opt(year, month, 1);
            }
        }
    }

    if states.is_some() {
        rows.retain(|row| row.company_code.is_some());
    }
}

/// Deal-side enrichment: the rebate column is never absent downstream
/// (absent → 0), and each row gets its brand+pack label.
pub fn enrich_deals(rows: &mut [DealRow]) {
    for row in rows.iter_mut() {
        if row.record.rebate.is_none() {
            row.record.rebate = Some(0.0);
        }
        row.brand_pack = brand_pack_label(&row.brand, &row.pack_size);
    }
}

/// Narrow the claim side to the cohort: brand+pack label always, market and
/// posting period when configured.
pub fn filter_cohort_claims(rows: Vec<ClaimRow>, cohort: &CohortConfig) -> Vec<ClaimRow> {
    let label = cohort.brand_pack.trim();
    let period = cohort.period.as_deref().and_then(parse_posting_period);
    rows.into_iter()
        .filter(|row| row.brand_pack == label)
        .filter(|row| match cohort.market.as_deref() {
            None => true,
            Some(market) => row.state_abbrev.as_deref() == Some(market),
        })
        .filter(|row| match period {
            None => true,
            Some(want) => {
                row.posting_period.as_deref().and_then(parse_posting_period) == Some(want)
            }
        })
        .collect()
}

/// Narrow the deal side to the cohort's brand+pack label. The PPM extract
/// carries no market or period columns, so the label is the whole filter.
pub fn filter_cohort_deals(rows: Vec<DealRow>, cohort: &CohortConfig) -> Vec<DealRow> {
    let label = cohort.brand_pack.trim();
    rows.into_iter().filter(|row| row.brand_pack == label).collect()
}
