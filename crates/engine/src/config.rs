use serde::Deserialize;

use crate::error::EngineError;
use crate::matcher::{Greedy, MatchStrategy};

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct ReconConfig {
    pub name: String,
    pub claims: ClaimSource,
    pub deals: DealSource,
    #[serde(default)]
    pub references: ReferenceFiles,
    pub cohort: CohortConfig,
    #[serde(default)]
    pub matching: MatchingConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

// ---------------------------------------------------------------------------
// Sources
// ---------------------------------------------------------------------------

/// The bill-back extract. Column defaults are the extract's own captions,
/// including the trailing space SAP leaves on `"Posting Period "`.
#[derive(Debug, Clone, Deserialize)]
pub struct ClaimSource {
    pub file: String,
    #[serde(default)]
    pub sheet: Option<String>,
    #[serde(default)]
    pub columns: ClaimColumns,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ClaimColumns {
    #[serde(default = "d_material")]
    pub material: String,
    #[serde(default = "d_at_price")]
    pub at_price: String,
    #[serde(default = "d_case_in_part")]
    pub case_in_part: String,
    #[serde(default = "d_part_amount")]
    pub part_amount: String,
    #[serde(default = "d_extended_part")]
    pub extended_part: String,
    #[serde(default = "d_company_code")]
    pub company_code: String,
    #[serde(default = "d_posting_period")]
    pub posting_period: String,
}

fn d_material() -> String { "Material".into() }
fn d_at_price() -> String { "At price".into() }
fn d_case_in_part() -> String { "Case in Part".into() }
fn d_part_amount() -> String { "Part Amount".into() }
fn d_extended_part() -> String { "Extended Part".into() }
fn d_company_code() -> String { "CoCd".into() }
fn d_posting_period() -> String { "Posting Period ".into() }

impl Default for ClaimColumns {
    fn default() -> Self {
        Self {
            material: d_material(),
            at_price: d_at_price(),
            case_in_part: d_case_in_part(),
            part_amount: d_part_amount(),
            extended_part: d_extended_part(),
            company_code: d_company_code(),
            posting_period: d_posting_period(),
        }
    }
}

/// The PPM (deal) extract.
#[derive(Debug, Clone, Deserialize)]
pub struct DealSource {
    pub file: String,
    #[serde(default)]
    pub sheet: Option<String>,
    #[serde(default)]
    pub columns: DealColumns,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DealColumns {
    #[serde(default = "d_dist_item")]
    pub material: String,
    #[serde(default = "d_net")]
    pub net_price: String,
    #[serde(default = "d_quantity")]
    pub quantity: String,
    #[serde(default = "d_unit_rebate")]
    pub unit_rebate: String,
    #[serde(default = "d_rebate")]
    pub rebate: String,
    #[serde(default = "d_brand")]
    pub brand: String,
    #[serde(default = "d_pack_size")]
    pub pack_size: String,
}

fn d_dist_item() -> String { "Dist Item#".into() }
fn d_net() -> String { "Net$".into() }
fn d_quantity() -> String { "Quantity".into() }
fn d_unit_rebate() -> String { "Unit Rebate$".into() }
fn d_rebate() -> String { "Rebate".into() }
fn d_brand() -> String { "Brand".into() }
fn d_pack_size() -> String { "Pkg Size".into() }

impl Default for DealColumns {
    fn default() -> Self {
        Self {
            material: d_dist_item(),
            net_price: d_net(),
            quantity: d_quantity(),
            unit_rebate: d_unit_rebate(),
            rebate: d_rebate(),
            brand: d_brand(),
            pack_size: d_pack_size(),
        }
    }
}

// ---------------------------------------------------------------------------
// References
// ---------------------------------------------------------------------------

/// Optional enrichment tables: states (company code → state/region) and the
/// item cross-reference (item code → brand, package size).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReferenceFiles {
    #[serde(default)]
    pub states: Option<StatesSource>,
    #[serde(default)]
    pub item_ref: Option<ItemRefSource>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StatesSource {
    pub file: String,
    #[serde(default)]
    pub sheet: Option<String>,
    #[serde(default)]
    pub columns: StatesColumns,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StatesColumns {
    #[serde(default = "d_company_code_sap")]
    pub company_code: String,
    #[serde(default = "d_state")]
    pub state: String,
    #[serde(default = "d_region")]
    pub region: String,
}

fn d_company_code_sap() -> String { "Company Code (SAP)".into() }
fn d_state() -> String { "State".into() }
fn d_region() -> String { "Region".into() }

impl Default for StatesColumns {
    fn default() -> Self {
        Self {
            company_code: d_company_code_sap(),
            state: d_state(),
            region: d_region(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ItemRefSource {
    pub file: String,
    #[serde(default)]
    pub sheet: Option<String>,
    #[serde(default)]
    pub columns: ItemRefColumns,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ItemRefColumns {
    #[serde(default = "d_item_code")]
    pub item_code: String,
    #[serde(default = "d_brand_desc")]
    pub brand: String,
    #[serde(default = "d_package_size")]
    pub pack_size: String,
}

fn d_item_code() -> String { "Dist. Item Code".into() }
fn d_brand_desc() -> String { "Supp. Brand Desc.".into() }
fn d_package_size() -> String { "Package Size".into() }

impl Default for ItemRefColumns {
    fn default() -> Self {
        Self {
            item_code: d_item_code(),
            brand: d_brand_desc(),
            pack_size: d_package_size(),
        }
    }
}

// ---------------------------------------------------------------------------
// Cohort + Matching + Output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct CohortConfig {
    /// Brand + package-size label both tables are restricted to.
    pub brand_pack: String,
    /// Optional market (custom state abbreviation); narrows the claim side.
    #[serde(default)]
    pub market: Option<String>,
    /// Optional posting period, YYYYMM; narrows the claim side.
    #[serde(default)]
    pub period: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MatchingConfig {
    #[serde(default = "default_close_threshold")]
    pub close_threshold: f64,
    #[serde(default)]
    pub strategy: StrategyKind,
}

fn default_close_threshold() -> f64 {
    10.0
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            close_threshold: default_close_threshold(),
            strategy: StrategyKind::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyKind {
    #[default]
    Greedy,
}

impl StrategyKind {
    pub fn build(&self) -> Box<dyn MatchStrategy> {
        match self {
            Self::Greedy => Box::new(Greedy),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct OutputConfig {
    #[serde(default)]
    pub csv: Option<String>,
    #[serde(default)]
    pub json: Option<String>,
}

// ---------------------------------------------------------------------------
// Parse + Validate
// ---------------------------------------------------------------------------

impl ReconConfig {
    pub fn from_toml(input: &str) -> Result<Self, EngineError> {
        let config: ReconConfig =
            toml::from_str(input).map_err(|e| EngineError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), EngineError> {
        if self.claims.file.trim().is_empty() {
            return Err(EngineError::ConfigValidation("claims.file must not be empty".into()));
        }
        if self.deals.file.trim().is_empty() {
            return Err(EngineError::ConfigValidation("deals.file must not be empty".into()));
        }
        if self.cohort.brand_pack.trim().is_empty() {
            return Err(EngineError::ConfigValidation(
                "cohort.brand_pack must not be empty".into(),
            ));
        }
        if !self.matching.close_threshold.is_finite() || self.matching.close_threshold <= 0.0 {
            return Err(EngineError::ConfigValidation(format!(
                "matching.close_threshold must be a positive number, got {}",
                self.matching.close_threshold
            )));
        }
        if let Some(ref period) = self.cohort.period {
            if period.len() != 6 || !period.bytes().all(|b| b.is_ascii_digit()) {
                return Err(EngineError::ConfigValidation(format!(
                    "cohort.period must be YYYYMM, got '{period}'"
                )));
            }
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    const VALID: &str = r#"
name = "Q2 2025 bill-back audit"

[claims]
file = "billback.xlsx"
sheet = "Data DE DP DQ NC"

[deals]
file = "ppm.xlsx"
sheet = "Sheet1"

[references.states]
file = "states.xlsx"
sheet = "States"

[references.item_ref]
file = "item_x_ref.xlsx"

[cohort]
brand_pack = "CORONA EXTRA 24/12"
market = "TX"
period = "202505"

[matching]
close_threshold = 10.0

[output]
csv = "results.csv"
"#;

    #[test]
    fn parse_valid() {
        let config = ReconConfig::from_toml(VALID).unwrap();
        assert_eq!(config.name, "Q2 2025 bill-back audit");
        assert_eq!(config.claims.sheet.as_deref(), Some("Data DE DP DQ NC"));
        assert_eq!(config.cohort.market.as_deref(), Some("TX"));
        assert_eq!(config.matching.close_threshold, 10.0);
        assert_eq!(config.matching.strategy, StrategyKind::Greedy);
        assert_eq!(config.output.csv.as_deref(), Some("results.csv"));
        assert!(config.references.states.is_some());
    }

    #[test]
    fn column_defaults_are_the_extract_captions() {
        let config = ReconConfig::from_toml(VALID).unwrap();
        assert_eq!(config.claims.columns.material, "Material");
        assert_eq!(config.claims.columns.posting_period, "Posting Period ");
        assert_eq!(config.deals.columns.material, "Dist Item#");
        assert_eq!(config.deals.columns.unit_rebate, "Unit Rebate$");
    }

    #[test]
    fn column_override() {
        let input = format!("{VALID}\n[claims.columns]\nmaterial = \"Item\"\n");
        let config = ReconConfig::from_toml(&input).unwrap();
        assert_eq!(config.claims.columns.material, "Item");
        // Unspecified names keep their defaults.
        assert_eq!(config.claims.columns.at_price, "At price");
    }

    #[test]
    fn reference_column_defaults() {
        let config = ReconConfig::from_toml(VALID).unwrap();
        let states = config.references.states.as_ref().unwrap();
        assert_eq!(states.columns.company_code, "Company Code (SAP)");
        assert_eq!(states.columns.state, "State");
        let item_ref = config.references.item_ref.as_ref().unwrap();
        assert_eq!(item_ref.columns.item_code, "Dist. Item Code");
        assert_eq!(item_ref.columns.brand, "Supp. Brand Desc.");
        assert_eq!(item_ref.columns.pack_size, "Package Size");
    }

    #[test]
    fn matching_section_is_optional() {
        let input = r#"
name = "Defaults"
[claims]
file = "a.xlsx"
[deals]
file = "b.xlsx"
[cohort]
brand_pack = "X 12/24"
"#;
        let config = ReconConfig::from_toml(input).unwrap();
        assert_eq!(config.matching.close_threshold, 10.0);
        assert_eq!(config.matching.strategy, StrategyKind::Greedy);
    }

    #[test]
    fn reject_bad_threshold() {
        let input = VALID.replace("close_threshold = 10.0", "close_threshold = 0.0");
        let err = ReconConfig::from_toml(&input).unwrap_err();
        assert!(err.to_string().contains("close_threshold"));
    }

    #[test]
    fn reject_empty_brand_pack() {
        let input = VALID.replace("brand_pack = \"CORONA EXTRA 24/12\"", "brand_pack = \"\"");
        let err = ReconConfig::from_toml(&input).unwrap_err();
        assert!(err.to_string().contains("brand_pack"));
    }

    #[test]
    fn reject_bad_period() {
        let input = VALID.replace("period = \"202505\"", "period = \"May-25\"");
        let err = ReconConfig::from_toml(&input).unwrap_err();
        assert!(err.to_string().contains("YYYYMM"));
    }

    #[test]
    fn reject_unknown_strategy() {
        let input = VALID.replace("close_threshold = 10.0", "strategy = \"hungarian\"");
        assert!(ReconConfig::from_toml(&input).is_err());
    }
}
