use crate::model::{ClaimRecord, DealRecord, MatchField};

/// The single field an eligible pairing disagrees on, with both sides'
/// values as they appeared in the inputs.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDisagreement {
    pub field: MatchField,
    pub claim_value: Option<f64>,
    pub deal_value: Option<f64>,
}

/// Score of an eligible claim/deal pairing.
///
/// `diff` is the absolute disagreement on the mismatched field: 0.0 when all
/// three fields agree, `+∞` when the mismatched field is absent on either
/// side (such a pairing is never preferred over one with a finite diff).
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateScore {
    pub disagreement: Option<FieldDisagreement>,
    pub diff: f64,
}

/// Evaluate the three equality predicates for a claim/deal pairing.
///
/// Price, quantity, and amount are compared with exact numeric equality;
/// an absent value on either side makes the predicate false (absent never
/// equals absent). Returns `None` unless at least two of three agree.
pub fn score(claim: &ClaimRecord, deal: &DealRecord) -> Option<CandidateScore> {
    let price_match = opt_eq(claim.at_price, deal.net_price);
    let qty_match = opt_eq(claim.case_in_part, deal.quantity);
    let amount_match = opt_eq(claim.part_amount, deal.unit_rebate);

    let agreeing = usize::from(price_match) + usize::from(qty_match) + usize::from(amount_match);
    if agreeing < 2 {
        return None;
    }

    // First disagreeing field in priority order: price, quantity, amount.
    let disagreeing = if !price_match {
        Some((MatchField::AtPrice, claim.at_price, deal.net_price))
    } else if !qty_match {
        Some((MatchField::CaseInPart, claim.case_in_part, deal.quantity))
    } else if !amount_match {
        Some((MatchField::PartAmount, claim.part_amount, deal.unit_rebate))
    } else {
        None
    };

    match disagreeing {
        None => Some(CandidateScore { disagreement: None, diff: 0.0 }),
        Some((field, claim_value, deal_value)) => {
            let diff = match (claim_value, deal_value) {
                (Some(a), Some(b)) => (a - b).abs(),
                _ => f64::INFINITY,
            };
            Some(CandidateScore {
                disagreement: Some(FieldDisagreement { field, claim_value, deal_value }),
                diff,
            })
        }
    }
}

fn opt_eq(a: Option<f64>, b: Option<f64>) -> bool {
    matches!((a, b), (Some(x), Some(y)) if x == y)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claim(price: Option<f64>, qty: Option<f64>, amount: Option<f64>) -> ClaimRecord {
        ClaimRecord {
            material_id: "100".into(),
            at_price: price,
            case_in_part: qty,
            part_amount: amount,
            extended_part: Some(500.0),
        }
    }

    fn deal(price: Option<f64>, qty: Option<f64>, amount: Option<f64>) -> DealRecord {
        DealRecord {
            material_id: "100".into(),
            net_price: price,
            quantity: qty,
            unit_rebate: amount,
            rebate: Some(500.0),
        }
    }

    #[test]
    fn all_three_agree() {
        let s = score(
            &claim(Some(5.0), Some(10.0), Some(50.0)),
            &deal(Some(5.0), Some(10.0), Some(50.0)),
        )
        .unwrap();
        assert_eq!(s.disagreement, None);
        assert_eq!(s.diff, 0.0);
    }

    #[test]
    fn two_of_three_is_eligible() {
        let s = score(
            &claim(Some(5.0), Some(10.0), Some(50.0)),
            &deal(Some(5.5), Some(10.0), Some(50.0)),
        )
        .unwrap();
        let d = s.disagreement.unwrap();
        assert_eq!(d.field, MatchField::AtPrice);
        assert_eq!(d.claim_value, Some(5.0));
        assert_eq!(d.deal_value, Some(5.5));
        assert!((s.diff - 0.5).abs() < 1e-12);
    }

    #[test]
    fn one_of_three_is_not_eligible() {
        assert!(score(
            &claim(Some(5.0), Some(10.0), Some(50.0)),
            &deal(Some(5.5), Some(12.0), Some(50.0)),
        )
        .is_none());
    }

    #[test]
    fn priority_order_picks_price_first() {
        // Price and amount both disagree → ineligible; price and qty agree,
        // amount disagrees → amount reported.
        let s = score(
            &claim(Some(5.0), Some(10.0), Some(50.0)),
            &deal(Some(5.0), Some(10.0), Some(49.0)),
        )
        .unwrap();
        assert_eq!(s.disagreement.unwrap().field, MatchField::PartAmount);

        let s = score(
            &claim(Some(5.0), Some(10.0), Some(50.0)),
            &deal(Some(4.0), Some(10.0), Some(50.0)),
        )
        .unwrap();
        assert_eq!(s.disagreement.unwrap().field, MatchField::AtPrice);
    }

    #[test]
    fn absent_never_matches() {
        // Absent price on one side: only qty and amount can agree.
        let s = score(
            &claim(None, Some(10.0), Some(50.0)),
            &deal(Some(5.0), Some(10.0), Some(50.0)),
        )
        .unwrap();
        let d = s.disagreement.unwrap();
        assert_eq!(d.field, MatchField::AtPrice);
        assert!(s.diff.is_infinite());

        // Absent on both sides is still not a match.
        assert!(score(
            &claim(None, Some(10.0), Some(50.0)),
            &deal(None, Some(10.0), Some(49.0)),
        )
        .is_none());
    }
}
