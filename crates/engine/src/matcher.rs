use crate::model::{ClaimRecord, DealRecord};
use crate::scorer::{score, CandidateScore};

/// One claim's pairing decision: the chosen deal index and its score, or
/// `None` when no eligible deal remained.
#[derive(Debug, Clone)]
pub struct ClaimPairing {
    pub claim_idx: usize,
    pub deal: Option<(usize, CandidateScore)>,
}

/// Output of pairing one material group. Claims appear in input order;
/// `orphan_deals` holds the never-consumed deal indices in input order.
#[derive(Debug, Clone)]
pub struct GroupPairing {
    pub claims: Vec<ClaimPairing>,
    pub orphan_deals: Vec<usize>,
}

/// Pairing policy for one material group.
///
/// Implementations must pair each claim with at most one deal and consume
/// each deal at most once. The shipped policy is [`Greedy`]; a minimum-cost
/// assignment can be substituted here without touching scoring or assembly.
pub trait MatchStrategy {
    fn pair_group(
        &self,
        claims: &[ClaimRecord],
        deals: &[DealRecord],
        close_threshold: f64,
    ) -> GroupPairing;

    fn name(&self) -> &'static str;
}

/// Greedy, input-order pairing: each claim scans the not-yet-consumed deals
/// and takes the eligible candidate with the smallest diff, preferring
/// candidates strictly under the closeness threshold. Ties go to the deal
/// encountered first.
pub struct Greedy;

impl MatchStrategy for Greedy {
    fn pair_group(
        &self,
        claims: &[ClaimRecord],
        deals: &[DealRecord],
        close_threshold: f64,
    ) -> GroupPairing {
        let mut consumed = vec![false; deals.len()];
        let mut pairings = Vec::with_capacity(claims.len());

        for (claim_idx, claim) in claims.iter().enumerate() {
            // Strict `<` keeps the first-encountered deal on equal diffs.
            let mut best_close: Option<(usize, CandidateScore)> = None;
            let mut best_any: Option<(usize, CandidateScore)> = None;

            for (deal_idx, deal) in deals.iter().enumerate() {
                if consumed[deal_idx] {
                    continue;
                }
                let Some(candidate) = score(claim, deal) else {
                    continue;
                };

                if candidate.diff < close_threshold
                    && best_close.as_ref().map_or(true, |(_, b)| candidate.diff < b.diff)
                {
                    best_close = Some((deal_idx, candidate.clone()));
                }
                if best_any.as_ref().map_or(true, |(_, b)| candidate.diff < b.diff) {
                    best_any = Some((deal_idx, candidate));
                }
            }

            let chosen = best_close.or(best_any);
            if let Some((deal_idx, _)) = chosen {
                consumed[deal_idx] = true;
            }
            pairings.push(ClaimPairing { claim_idx, deal: chosen });
        }

        let orphan_deals = consumed
            .iter()
            .enumerate()
            .filter(|(_, used)| !**used)
            .map(|(i, _)| i)
            .collect();

        GroupPairing { claims: pairings, orphan_deals }
    }

    fn name(&self) -> &'static str {
        "greedy"
    }
}
