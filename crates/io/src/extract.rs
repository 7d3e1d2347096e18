// Typed extraction: generic tables → claim/deal rows.

use chrono::NaiveDate;
use dealproof_engine::config::{ClaimColumns, DealColumns};
use dealproof_engine::model::{ClaimRecord, DealRecord};

use crate::error::IoError;
use crate::table::{Cell, Table};

/// One bill-back row plus the context the enrichment pass fills in.
#[derive(Debug, Clone)]
pub struct ClaimRow {
    pub record: ClaimRecord,
    pub company_code: Option<String>,
    pub posting_period: Option<String>,
    pub brand: String,
    pub pack_size: String,
    pub brand_pack: String,
    pub state: Option<String>,
    pub region: Option<String>,
    pub state_abbrev: Option<String>,
    pub month_name: Option<&'static str>,
    pub period_date: Option<NaiveDate>,
}

/// One PPM row plus its own brand/package columns.
#[derive(Debug, Clone)]
pub struct DealRow {
    pub record: DealRecord,
    pub brand: String,
    pub pack_size: String,
    pub brand_pack: String,
}

/// Extract bill-back claim rows. Fails fast when a required column is
/// absent; rows without a material key are skipped.
pub fn extract_claims(table: &Table, columns: &ClaimColumns) -> Result<Vec<ClaimRow>, IoError> {
    let required = |name: &str| -> Result<usize, IoError> {
        table.column_index(name).ok_or_else(|| IoError::MissingColumn {
            table: "Bill back".to_string(),
            column: name.to_string(),
        })
    };

    let material_idx = required(&columns.material)?;
    let at_price_idx = required(&columns.at_price)?;
    let case_in_part_idx = required(&columns.case_in_part)?;
    let part_amount_idx = required(&columns.part_amount)?;
    let extended_part_idx = required(&columns.extended_part)?;
    // Enrichment-only columns; extracts without them still reconcile.
    let company_code_idx = table.column_index(&columns.company_code);
    let posting_period_idx = table.column_index(&columns.posting_period);

    let mut rows = Vec::with_capacity(table.len());
    for r in 0..table.len() {
        let material_id = key_string(table.cell(r, material_idx));
        if material_id.is_empty() {
            continue;
        }
        rows.push(ClaimRow {
            record: ClaimRecord {
                material_id,
                at_price: numeric(table.cell(r, at_price_idx)),
                case_in_part: numeric(table.cell(r, case_in_part_idx)),
                part_amount: numeric(table.cell(r, part_amount_idx)),
                extended_part: numeric(table.cell(r, extended_part_idx)),
            },
            company_code: company_code_idx.map(|i| key_string(table.cell(r, i))).filter(|s| !s.is_empty()),
            posting_period: posting_period_idx.map(|i| key_string(table.cell(r, i))).filter(|s| !s.is_empty()),
            brand: String::new(),
            pack_size: String::new(),
            brand_pack: String::new(),
            state: None,
            region: None,
            state_abbrev: None,
            month_name: None,
            period_date: None,
        });
    }

    Ok(rows)
}

/// Extract PPM deal rows. Same fail-fast column contract.
pub fn extract_deals(table: &Table, columns: &DealColumns) -> Result<Vec<DealRow>, IoError> {
    let required = |name: &str| -> Result<usize, IoError> {
        table.column_index(name).ok_or_else(|| IoError::MissingColumn {
            table: "PPM".to_string(),
            column: name.to_string(),
        })
    };

    let material_idx = required(&columns.material)?;
    let net_price_idx = required(&columns.net_price)?;
    let quantity_idx = required(&columns.quantity)?;
    let unit_rebate_idx = required(&columns.unit_rebate)?;
    let rebate_idx = required(&columns.rebate)?;
    let brand_idx = table.column_index(&columns.brand);
    let pack_size_idx = table.column_index(&columns.pack_size);

    let mut rows = Vec::with_capacity(table.len());
    for r in 0..table.len() {
        let material_id = key_string(table.cell(r, material_idx));
        if material_id.is_empty() {
            continue;
        }
        rows.push(DealRow {
            record: DealRecord {
                material_id,
                net_price: numeric(table.cell(r, net_price_idx)),
                quantity: numeric(table.cell(r, quantity_idx)),
                unit_rebate: numeric(table.cell(r, unit_rebate_idx)),
                rebate: numeric(table.cell(r, rebate_idx)),
            },
            brand: brand_idx.map(|i| text(table.cell(r, i))).unwrap_or_default(),
            pack_size: pack_size_idx.map(|i| text(table.cell(r, i))).unwrap_or_default(),
            brand_pack: String::new(),
        });
    }

    Ok(rows)
}

/// Lenient numeric coercion: anything that doesn't parse is absent, never 0.
pub fn numeric(cell: &Cell) -> Option<f64> {
    match cell {
        Cell::Number(v) => Some(*v),
        Cell::Text(s) => {
            let cleaned: String = s
                .trim()
                .trim_start_matches('$')
                .chars()
                .filter(|c| *c != ',')
                .collect();
            cleaned.parse::<f64>().ok()
        }
        Cell::Empty => None,
    }
}

pub fn text(cell: &Cell) -> String {
    match cell {
        Cell::Text(s) => s.trim().to_string(),
        Cell::Number(v) => number_key(*v),
        Cell::Empty => String::new(),
    }
}

/// Join-key rendering. Excel stores item codes as floats, so `100.0` must
/// come out as `"100"` to join against a text-typed `"100"`.
pub fn key_string(cell: &Cell) -> String {
    match cell {
        Cell::Text(s) => s.trim().to_string(),
        Cell::Number(v) => number_key(*v),
        Cell::Empty => String::new(),
    }
}

fn number_key(v: f64) -> String {
    if v == v.trunc() && v.is_finite() && v.abs() < 1e15 {
        format!("{}", v as i64)
    } else {
        format!("{v}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claim_table() -> Table {
        Table {
            headers: vec![
                "Material".into(),
                "At price".into(),
                "Case in Part".into(),
                "Part Amount".into(),
                "Extended Part".into(),
                "CoCd".into(),
                "Posting Period ".into(),
            ],
            rows: vec![
                vec![
                    Cell::Number(100.0),
                    Cell::Number(5.0),
                    Cell::Number(10.0),
                    Cell::Number(50.0),
                    Cell::Number(500.0),
                    Cell::Text("1001".into()),
                    Cell::Number(202505.0),
                ],
                vec![
                    Cell::Text(" 200 ".into()),
                    Cell::Text("$1,250.50".into()),
                    Cell::Empty,
                    Cell::Text("n/a".into()),
                    Cell::Number(0.0),
                    Cell::Empty,
                    Cell::Empty,
                ],
                vec![Cell::Empty, Cell::Number(1.0), Cell::Empty, Cell::Empty, Cell::Empty],
            ],
        }
    }

    #[test]
    fn extract_claims_with_coercion() {
        let rows = extract_claims(&claim_table(), &ClaimColumns::default()).unwrap();
        // The keyless third row is skipped.
        assert_eq!(rows.len(), 2);

        assert_eq!(rows[0].record.material_id, "100");
        assert_eq!(rows[0].record.at_price, Some(5.0));
        assert_eq!(rows[0].company_code.as_deref(), Some("1001"));
        assert_eq!(rows[0].posting_period.as_deref(), Some("202505"));

        assert_eq!(rows[1].record.material_id, "200");
        assert_eq!(rows[1].record.at_price, Some(1250.50));
        assert_eq!(rows[1].record.case_in_part, None);
        assert_eq!(rows[1].record.part_amount, None); // "n/a" is absent, not 0
        assert_eq!(rows[1].record.extended_part, Some(0.0));
    }

    #[test]
    fn missing_required_column_fails_fast() {
        let mut table = claim_table();
        table.headers[1] = "Price".into();
        let err = extract_claims(&table, &ClaimColumns::default()).unwrap_err();
        assert!(err.to_string().contains("At price"));
    }

    #[test]
    fn enrichment_columns_are_optional() {
        let mut table = claim_table();
        table.headers.truncate(5);
        let rows = extract_claims(&table, &ClaimColumns::default()).unwrap();
        assert_eq!(rows[0].company_code, None);
        assert_eq!(rows[0].posting_period, None);
    }

    #[test]
    fn extract_deals_with_brand_columns() {
        let table = Table {
            headers: vec![
                "Dist Item#".into(),
                "Net$".into(),
                "Quantity".into(),
                "Unit Rebate$".into(),
                "Rebate".into(),
                "Brand".into(),
                "Pkg Size".into(),
            ],
            rows: vec![vec![
                Cell::Number(100.0),
                Cell::Number(5.0),
                Cell::Number(10.0),
                Cell::Number(50.0),
                Cell::Empty,
                Cell::Text("CORONA EXTRA".into()),
                Cell::Text("24/12".into()),
            ]],
        };
        let rows = extract_deals(&table, &DealColumns::default()).unwrap();
        assert_eq!(rows[0].record.material_id, "100");
        assert_eq!(rows[0].record.rebate, None);
        assert_eq!(rows[0].brand, "CORONA EXTRA");
        assert_eq!(rows[0].pack_size, "24/12");
    }

    #[test]
    fn key_normalization() {
        assert_eq!(key_string(&Cell::Number(100.0)), "100");
        assert_eq!(key_string(&Cell::Number(100.5)), "100.5");
        assert_eq!(key_string(&Cell::Text("  100 ".into())), "100");
        assert_eq!(key_string(&Cell::Empty), "");
    }
}
