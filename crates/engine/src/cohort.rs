use std::collections::HashMap;

use crate::model::{ClaimRecord, DealRecord};

/// One material's claim and deal row indices into the cohort tables.
#[derive(Debug, Clone)]
pub struct MaterialGroup {
    pub material_id: String,
    pub claim_rows: Vec<usize>,
    pub deal_rows: Vec<usize>,
}

/// Group both tables by trimmed material id.
///
/// Materials are visited in first-appearance order of the claim table;
/// materials present only in the deal table follow, in deal first-appearance
/// order, so their deal rows still surface as PPM-only.
pub fn partition(claims: &[ClaimRecord], deals: &[DealRecord]) -> Vec<MaterialGroup> {
    let mut groups: Vec<MaterialGroup> = Vec::new();
    let mut by_key: HashMap<String, usize> = HashMap::new();

    for (i, claim) in claims.iter().enumerate() {
        let key = claim.material_id.trim();
        let slot = *by_key.entry(key.to_string()).or_insert_with(|| {
            groups.push(MaterialGroup {
                material_id: key.to_string(),
                claim_rows: Vec::new(),
                deal_rows: Vec::new(),
            });
            groups.len() - 1
        });
        groups[slot].claim_rows.push(i);
    }

    for (i, deal) in deals.iter().enumerate() {
        let key = deal.material_id.trim();
        let slot = *by_key.entry(key.to_string()).or_insert_with(|| {
            groups.push(MaterialGroup {
                material_id: key.to_string(),
                claim_rows: Vec::new(),
                deal_rows: Vec::new(),
            });
            groups.len() - 1
        });
        groups[slot].deal_rows.push(i);
    }

    groups
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claim(material: &str) -> ClaimRecord {
        ClaimRecord {
            material_id: material.into(),
            at_price: Some(5.0),
            case_in_part: Some(10.0),
            part_amount: Some(50.0),
            extended_part: Some(500.0),
        }
    }

    fn deal(material: &str) -> DealRecord {
        DealRecord {
            material_id: material.into(),
            net_price: Some(5.0),
            quantity: Some(10.0),
            unit_rebate: Some(50.0),
            rebate: Some(500.0),
        }
    }

    #[test]
    fn claim_materials_come_first_in_appearance_order() {
        let claims = vec![claim("200"), claim("100"), claim("200")];
        let deals = vec![deal("100"), deal("300")];
        let groups = partition(&claims, &deals);

        let ids: Vec<&str> = groups.iter().map(|g| g.material_id.as_str()).collect();
        assert_eq!(ids, vec!["200", "100", "300"]);
        assert_eq!(groups[0].claim_rows, vec![0, 2]);
        assert_eq!(groups[1].claim_rows, vec![1]);
        assert_eq!(groups[1].deal_rows, vec![0]);
    }

    #[test]
    fn deal_only_material_gets_a_group() {
        let groups = partition(&[], &[deal("300"), deal("300")]);
        assert_eq!(groups.len(), 1);
        assert!(groups[0].claim_rows.is_empty());
        assert_eq!(groups[0].deal_rows, vec![0, 1]);
    }

    #[test]
    fn join_key_is_trimmed_on_both_sides() {
        let claims = vec![claim(" 100 ")];
        let deals = vec![deal("100")];
        let groups = partition(&claims, &deals);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].material_id, "100");
        assert_eq!(groups[0].claim_rows, vec![0]);
        assert_eq!(groups[0].deal_rows, vec![0]);
    }
}
