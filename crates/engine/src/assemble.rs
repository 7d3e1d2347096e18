use crate::error::EngineError;
use crate::matcher::GroupPairing;
use crate::model::{ClaimRecord, Classification, DealRecord, MatchOutcome};

/// Turn one material group's pairing into final result rows.
///
/// Matched and missing-deal rows come out in claim input order, followed by
/// the group's PPM-only orphans in deal input order. The pairing is checked
/// against the consumption invariants first, so a faulty [`MatchStrategy`]
/// implementation fails the group instead of corrupting the result table.
///
/// [`MatchStrategy`]: crate::matcher::MatchStrategy
pub fn assemble_group(
    material_id: &str,
    claims: &[ClaimRecord],
    deals: &[DealRecord],
    pairing: &GroupPairing,
) -> Result<Vec<MatchOutcome>, EngineError> {
    validate_pairing(material_id, claims.len(), deals.len(), pairing)?;

    let mut rows = Vec::with_capacity(claims.len() + pairing.orphan_deals.len());

    for p in &pairing.claims {
        let claim = &claims[p.claim_idx];
        match &p.deal {
            Some((deal_idx, score)) => {
                let deal = &deals[*deal_idx];
                let classification = match &score.disagreement {
                    None => Classification::PerfectMatch,
                    Some(d) => Classification::FieldMismatch {
                        field: d.field,
                        claim_value: d.claim_value,
                        deal_value: d.deal_value,
                    },
                };
                rows.push(MatchOutcome {
                    material_id: material_id.to_string(),
                    at_price: claim.at_price,
                    case_in_part: claim.case_in_part,
                    part_amount: claim.part_amount,
                    extended_part: claim.extended_part,
                    net_price: deal.net_price,
                    quantity: deal.quantity,
                    unit_rebate: deal.unit_rebate,
                    rebate: deal.rebate,
                    variance: claim.extended_part.unwrap_or(0.0) - deal.rebate.unwrap_or(0.0),
                    classification,
                });
            }
            None => rows.push(MatchOutcome {
                material_id: material_id.to_string(),
                at_price: claim.at_price,
                case_in_part: claim.case_in_part,
                part_amount: claim.part_amount,
                extended_part: claim.extended_part,
                net_price: None,
                quantity: None,
                unit_rebate: None,
                rebate: None,
                variance: claim.extended_part.unwrap_or(0.0),
                classification: Classification::MissingDeal,
            }),
        }
    }

    for &deal_idx in &pairing.orphan_deals {
        let deal = &deals[deal_idx];
        rows.push(MatchOutcome {
            material_id: material_id.to_string(),
            at_price: None,
            case_in_part: None,
            part_amount: None,
            extended_part: None,
            net_price: deal.net_price,
            quantity: deal.quantity,
            unit_rebate: deal.unit_rebate,
            rebate: deal.rebate,
            variance: -deal.rebate.unwrap_or(0.0),
            classification: Classification::PpmOnly,
        });
    }

    Ok(rows)
}

/// Consumption invariants: one pairing per claim, each deal consumed at most
/// once, and the orphan list is exactly the unconsumed deals in input order.
fn validate_pairing(
    material_id: &str,
    claim_count: usize,
    deal_count: usize,
    pairing: &GroupPairing,
) -> Result<(), EngineError> {
    let fail = |message: String| EngineError::GroupFailed {
        material_id: material_id.to_string(),
        message,
    };

    if pairing.claims.len() != claim_count {
        return Err(fail(format!(
            "strategy returned {} pairings for {} claims",
            pairing.claims.len(),
            claim_count
        )));
    }

    let mut consumed = vec![false; deal_count];
    for p in &pairing.claims {
        if p.claim_idx >= claim_count {
            return Err(fail(format!("claim index {} out of range", p.claim_idx)));
        }
        if let Some((deal_idx, _)) = &p.deal {
            if *deal_idx >= deal_count {
                return Err(fail(format!("deal index {deal_idx} out of range")));
            }
            if consumed[*deal_idx] {
                return Err(fail(format!("deal index {deal_idx} consumed twice")));
            }
            consumed[*deal_idx] = true;
        }
    }

    let expected: Vec<usize> = consumed
        .iter()
        .enumerate()
        .filter(|(_, used)| !**used)
        .map(|(i, _)| i)
        .collect();
    if pairing.orphan_deals != expected {
        return Err(fail("orphan list does not cover the unconsumed deals".to_string()));
    }

    Ok(())
}
