use crate::assemble::assemble_group;
use crate::cohort::partition;
use crate::config::ReconConfig;
use crate::error::EngineError;
use crate::matcher::MatchStrategy;
use crate::model::{ClaimRecord, DealRecord, GroupWarning, MatchOutcome, ReconMeta, ReconResult};
use crate::summary::compute_summary;

/// Run reconciliation over one cohort's pre-filtered claim and deal tables.
pub fn run(config: &ReconConfig, claims: &[ClaimRecord], deals: &[DealRecord]) -> ReconResult {
    let strategy = config.matching.strategy.build();
    run_with_strategy(
        &config.name,
        config.matching.close_threshold,
        strategy.as_ref(),
        claims,
        deals,
    )
}

/// Like [`run`], with an explicit pairing strategy.
///
/// Material groups are processed independently; a group that fails
/// contributes no rows and is reported as a warning instead of aborting
/// the cohort.
pub fn run_with_strategy(
    config_name: &str,
    close_threshold: f64,
    strategy: &dyn MatchStrategy,
    claims: &[ClaimRecord],
    deals: &[DealRecord],
) -> ReconResult {
    let mut rows: Vec<MatchOutcome> = Vec::new();
    let mut warnings: Vec<GroupWarning> = Vec::new();

    for group in partition(claims, deals) {
        let group_claims: Vec<ClaimRecord> =
            group.claim_rows.iter().map(|&i| claims[i].clone()).collect();
        let group_deals: Vec<DealRecord> =
            group.deal_rows.iter().map(|&i| deals[i].clone()).collect();

        let pairing = strategy.pair_group(&group_claims, &group_deals, close_threshold);
        match assemble_group(&group.material_id, &group_claims, &group_deals, &pairing) {
            Ok(group_rows) => rows.extend(group_rows),
            Err(EngineError::GroupFailed { material_id, message }) => {
                warnings.push(GroupWarning { material_id, message });
            }
            Err(other) => {
                warnings.push(GroupWarning {
                    material_id: group.material_id.clone(),
                    message: other.to_string(),
                });
            }
        }
    }

    let summary = compute_summary(&rows);

    ReconResult {
        meta: ReconMeta {
            config_name: config_name.to_string(),
            engine_version: env!("CARGO_PKG_VERSION").to_string(),
            close_threshold,
            strategy: strategy.name().to_string(),
        },
        summary,
        rows,
        warnings,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matcher::{ClaimPairing, Greedy, GroupPairing};
    use crate::model::Classification;

    fn claim(material: &str, price: f64, qty: f64, amount: f64) -> ClaimRecord {
        ClaimRecord {
            material_id: material.into(),
            at_price: Some(price),
            case_in_part: Some(qty),
            part_amount: Some(amount),
            extended_part: Some(price * qty),
        }
    }

    fn deal(material: &str, price: f64, qty: f64, amount: f64) -> DealRecord {
        DealRecord {
            material_id: material.into(),
            net_price: Some(price),
            quantity: Some(qty),
            unit_rebate: Some(amount),
            rebate: Some(amount * qty),
        }
    }

    #[test]
    fn rows_keep_group_then_material_order() {
        let claims = vec![claim("200", 5.0, 10.0, 50.0), claim("100", 4.0, 8.0, 40.0)];
        let deals = vec![
            deal("100", 4.0, 8.0, 40.0),
            deal("200", 5.0, 10.0, 50.0),
            deal("200", 9.0, 9.0, 90.0),
            deal("300", 2.0, 6.0, 20.0),
        ];
        let result = run_with_strategy("test", 10.0, &Greedy, &claims, &deals);

        let ids: Vec<&str> = result.rows.iter().map(|r| r.material_id.as_str()).collect();
        // Material 200 first (claim order), its orphan immediately after its
        // matches, then 100, then the deal-only 300.
        assert_eq!(ids, vec!["200", "200", "100", "300"]);
        assert_eq!(result.rows[1].classification, Classification::PpmOnly);
        assert_eq!(result.rows[3].classification, Classification::PpmOnly);
        assert_eq!(result.summary.perfect_matches, 2);
        assert_eq!(result.summary.ppm_only, 2);
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn faulty_strategy_only_fails_its_group() {
        /// Pairs nothing and reports no orphans, violating conservation for
        /// any group that has deals.
        struct Broken;
        impl MatchStrategy for Broken {
            fn pair_group(
                &self,
                claims: &[ClaimRecord],
                _deals: &[DealRecord],
                _close_threshold: f64,
            ) -> GroupPairing {
                GroupPairing {
                    claims: claims
                        .iter()
                        .enumerate()
                        .map(|(i, _)| ClaimPairing { claim_idx: i, deal: None })
                        .collect(),
                    orphan_deals: Vec::new(),
                }
            }
            fn name(&self) -> &'static str {
                "broken"
            }
        }

        let claims = vec![claim("100", 5.0, 10.0, 50.0), claim("200", 4.0, 8.0, 40.0)];
        // Material 100 has a deal (Broken drops it → group fails); 200 has
        // none (Broken's output is valid there).
        let deals = vec![deal("100", 5.0, 10.0, 50.0)];
        let result = run_with_strategy("test", 10.0, &Broken, &claims, &deals);

        assert_eq!(result.warnings.len(), 1);
        assert_eq!(result.warnings[0].material_id, "100");
        let ids: Vec<&str> = result.rows.iter().map(|r| r.material_id.as_str()).collect();
        assert_eq!(ids, vec!["200"]);
        assert_eq!(result.rows[0].classification, Classification::MissingDeal);
    }

    #[test]
    fn meta_reflects_run_parameters() {
        let result = run_with_strategy("audit", 7.5, &Greedy, &[], &[]);
        assert_eq!(result.meta.config_name, "audit");
        assert_eq!(result.meta.close_threshold, 7.5);
        assert_eq!(result.meta.strategy, "greedy");
        assert_eq!(result.summary.total_records, 0);
    }
}
