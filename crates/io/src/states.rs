// State reference handling: custom market abbreviations and the company
// code → state/region lookup table.

use std::collections::HashMap;

use dealproof_engine::config::StatesColumns;

use crate::error::IoError;
use crate::extract::key_string;
use crate::table::Table;

/// State → custom market abbreviation, as used on the reporting side.
/// Split states (NY, CA) and wine-only markets keep their own labels.
const STATE_ABBREVIATIONS: &[(&str, &str)] = &[
    ("Delaware", "DE"),
    ("Florida", "FL"),
    ("Kentucky", "KY"),
    ("Maryland", "MD/DC"),
    ("District of Columbia", "MD/DC"),
    ("Montgomery Co. MD", "MD/DC"),
    ("New York - Metro", "NY METRO"),
    ("New York - Upstate", "NY UPSTATE"),
    ("Ohio (Wine)", "OH (Wine)"),
    ("South Carolina", "SC"),
    ("Arkansas", "AR"),
    ("Colorado", "CO"),
    ("Iowa (Wine)", "IA (Wine)"),
    ("Illinois", "IL"),
    ("Indiana", "IN"),
    ("Louisiana", "LA"),
    ("Minnesota", "MN"),
    ("Oklahoma", "OK"),
    ("South Dakota", "SD"),
    ("Texas", "TX"),
    ("Nebraska", "NE"),
    ("Tennessee", "TN"),
    ("North Dakota", "ND"),
    ("Kansas", "KS"),
    ("California - North", "NCA"),
    ("Nevada", "NV"),
    ("California - South", "SCA"),
    ("Washington", "WA"),
    ("Hawaii", "HI"),
    ("California", "CA"),
    ("Arizona", "AZ"),
    ("New Mexico", "NM"),
    ("Oregon", "OR"),
    ("Idaho", "ID"),
    ("Ohio", "OH"),
];

/// Custom abbreviation for a state name, if it is a known market.
pub fn custom_abbreviation(state: &str) -> Option<&'static str> {
    let state = state.trim();
    STATE_ABBREVIATIONS
        .iter()
        .find(|(name, _)| *name == state)
        .map(|(_, abbrev)| *abbrev)
}

/// Canadian regions carry no market abbreviation and are excluded.
pub fn is_canadian_region(region: &str) -> bool {
    region.trim() == "Canada Region"
}

#[derive(Debug, Clone)]
pub struct StateInfo {
    pub state: String,
    pub region: String,
    pub abbreviation: Option<&'static str>,
}

/// Company code → state/region lookup built from the states reference sheet.
#[derive(Debug, Clone, Default)]
pub struct StatesRef {
    by_company_code: HashMap<String, StateInfo>,
}

impl StatesRef {
    pub fn from_table(table: &Table, columns: &StatesColumns) -> Result<Self, IoError> {
        let required = |name: &str| -> Result<usize, IoError> {
            table.column_index(name).ok_or_else(|| IoError::MissingColumn {
                table: "States".to_string(),
                column: name.to_string(),
            })
        };

        let company_code_idx = required(&columns.company_code)?;
        let state_idx = required(&columns.state)?;
        let region_idx = required(&columns.region)?;

        let mut by_company_code = HashMap::new();
        for r in 0..table.len() {
            let code = key_string(table.cell(r, company_code_idx));
            if code.is_empty() {
                continue;
            }
            let region = key_string(table.cell(r, region_idx));
            if is_canadian_region(&region) {
                continue;
            }
            let state = key_string(table.cell(r, state_idx));
            let abbreviation = custom_abbreviation(&state);
            by_company_code.insert(code, StateInfo { state, region, abbreviation });
        }

        Ok(Self { by_company_code })
    }

    pub fn lookup(&self, company_code: &str) -> Option<&StateInfo> {
        self.by_company_code.get(company_code.trim())
    }

    pub fn len(&self) -> usize {
        self.by_company_code.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_company_code.is_empty()
    }
}
