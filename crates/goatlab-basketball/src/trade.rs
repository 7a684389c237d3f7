// Trade fairness: compare two packages' total value and decide.

use std::collections::HashSet;
use std::fmt;

use serde::Serialize;
use tracing::{debug, info};

use crate::player::PlayerRecord;
use crate::roster::RosterTable;
use crate::selection::TradePackage;

/// Minimum fairness ratio for a trade to be accepted.
pub const DEFAULT_FAIRNESS_THRESHOLD: f64 = 0.75;

/// Why a trade was accepted or rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionReason {
    EmptyPackage,
    BothZero,
    OneSideZero,
    Comparable,
    TooLopsided,
}

impl DecisionReason {
    pub fn message(&self) -> &'static str {
        match self {
            DecisionReason::EmptyPackage => "both sides must offer at least one player",
            DecisionReason::BothZero => "zero-value packages treated as equal",
            DecisionReason::OneSideZero => "lopsided: one side has zero value",
            DecisionReason::Comparable => "values comparable",
            DecisionReason::TooLopsided => "values too lopsided",
        }
    }
}

impl fmt::Display for DecisionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Outcome of one fairness evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TradeDecision {
    pub accepted: bool,
    pub reason: DecisionReason,
    /// Fairness ratio when both sides carry non-zero value.
    pub ratio: Option<f64>,
}

impl TradeDecision {
    fn accept(reason: DecisionReason, ratio: Option<f64>) -> Self {
        TradeDecision {
            accepted: true,
            reason,
            ratio,
        }
    }

    fn reject(reason: DecisionReason, ratio: Option<f64>) -> Self {
        TradeDecision {
            accepted: false,
            reason,
            ratio,
        }
    }
}

/// `min(|a|, |b|) / max(|a|, |b|)` for totals of the same sign; `0.0` when
/// the signs differ, since one side then adds value and the other removes it.
/// Both totals must be non-zero.
pub fn fairness_ratio(total_a: f64, total_b: f64) -> f64 {
    if (total_a < 0.0) != (total_b < 0.0) {
        return 0.0;
    }
    let (a, b) = (total_a.abs(), total_b.abs());
    a.min(b) / a.max(b)
}

/// Decide a trade on package values using the default 0.75 threshold.
pub fn evaluate_trade(pkg_a: &TradePackage, pkg_b: &TradePackage) -> TradeDecision {
    evaluate_trade_with_threshold(pkg_a, pkg_b, DEFAULT_FAIRNESS_THRESHOLD)
}

/// Decide a trade on package values. Rules, first match wins:
///
/// 1. either package empty: rejected
/// 2. both totals zero: accepted
/// 3. exactly one total zero: rejected
/// 4. fairness ratio >= `threshold`: accepted
/// 5. otherwise: rejected
///
/// The result does not depend on argument order.
pub fn evaluate_trade_with_threshold(
    pkg_a: &TradePackage,
    pkg_b: &TradePackage,
    threshold: f64,
) -> TradeDecision {
    let decision = decide(pkg_a, pkg_b, threshold);
    debug!(
        "trade {} ({:.3}) vs {} ({:.3}): accepted={} ({})",
        pkg_a.team(),
        pkg_a.total_value(),
        pkg_b.team(),
        pkg_b.total_value(),
        decision.accepted,
        decision.reason
    );
    decision
}

fn decide(pkg_a: &TradePackage, pkg_b: &TradePackage, threshold: f64) -> TradeDecision {
    if pkg_a.is_empty() || pkg_b.is_empty() {
        return TradeDecision::reject(DecisionReason::EmptyPackage, None);
    }

    let (v_a, v_b) = (pkg_a.total_value(), pkg_b.total_value());
    match (v_a == 0.0, v_b == 0.0) {
        (true, true) => return TradeDecision::accept(DecisionReason::BothZero, None),
        (true, false) | (false, true) => {
            return TradeDecision::reject(DecisionReason::OneSideZero, None)
        }
        (false, false) => {}
    }

    let ratio = fairness_ratio(v_a, v_b);
    if ratio >= threshold {
        TradeDecision::accept(DecisionReason::Comparable, Some(ratio))
    } else {
        TradeDecision::reject(DecisionReason::TooLopsided, Some(ratio))
    }
}

/// Return a new table in which every member of `pkg_a` plays for `pkg_b`'s
/// team and every member of `pkg_b` plays for `pkg_a`'s team. The input
/// table is left as it was, so callers can preview a trade and discard it.
pub fn reassign_teams(roster: &RosterTable, pkg_a: &TradePackage, pkg_b: &TradePackage) -> RosterTable {
    let to_b: HashSet<&str> = pkg_a.members().iter().map(|p| p.name.as_str()).collect();
    let to_a: HashSet<&str> = pkg_b.members().iter().map(|p| p.name.as_str()).collect();

    let players: Vec<PlayerRecord> = roster
        .iter()
        .map(|p| {
            let mut p = p.clone();
            if to_b.contains(p.name.as_str()) {
                p.team = pkg_b.team().to_string();
            } else if to_a.contains(p.name.as_str()) {
                p.team = pkg_a.team().to_string();
            }
            p
        })
        .collect();

    info!(
        "reassigned {} players {} -> {} and {} players {} -> {}",
        to_b.len(),
        pkg_a.team(),
        pkg_b.team(),
        to_a.len(),
        pkg_b.team(),
        pkg_a.team()
    );
    RosterTable::from_validated(players)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::selection::PackageDraft;
    use crate::stats::StatLine;

    fn player(name: &str, team: &str, value: f64) -> PlayerRecord {
        let stats = StatLine {
            games_played: 10.0,
            ..StatLine::default()
        };
        let mut p = PlayerRecord::new(name, team, "F", stats);
        p.derived.value = value;
        p
    }

    /// Package with one player per value.
    fn package(team: &str, values: &[f64]) -> TradePackage {
        let board: Vec<PlayerRecord> = values
            .iter()
            .enumerate()
            .map(|(i, &v)| player(&format!("{team}-{i}"), team, v))
            .collect();
        let mut draft = PackageDraft::new(team);
        for i in 0..board.len() {
            draft = draft.toggle(&board, i).unwrap();
        }
        draft.submit()
    }

    fn decide_totals(a: f64, b: f64) -> TradeDecision {
        evaluate_trade(&package("BOS", &[a]), &package("LAL", &[b]))
    }

    #[test]
    fn comparable_values_accepted() {
        let d = decide_totals(100.0, 80.0);
        assert!(d.accepted);
        assert_eq!(d.reason, DecisionReason::Comparable);
        assert_eq!(d.ratio, Some(0.8));
    }

    #[test]
    fn lopsided_values_rejected() {
        let d = decide_totals(100.0, 70.0);
        assert!(!d.accepted);
        assert_eq!(d.reason, DecisionReason::TooLopsided);
    }

    #[test]
    fn threshold_is_inclusive() {
        assert!(decide_totals(100.0, 75.0).accepted);
    }

    #[test]
    fn both_zero_accepted() {
        let d = decide_totals(0.0, 0.0);
        assert!(d.accepted);
        assert_eq!(d.reason, DecisionReason::BothZero);
        assert_eq!(d.ratio, None);
    }

    #[test]
    fn one_zero_rejected() {
        let d = decide_totals(0.0, 50.0);
        assert!(!d.accepted);
        assert_eq!(d.reason, DecisionReason::OneSideZero);
    }

    #[test]
    fn empty_package_rejected() {
        let empty = PackageDraft::new("BOS").submit();
        let full = package("LAL", &[10.0]);
        for d in [evaluate_trade(&empty, &full), evaluate_trade(&full, &empty)] {
            assert!(!d.accepted);
            assert_eq!(d.reason, DecisionReason::EmptyPackage);
        }
        let both_empty = evaluate_trade(&empty, &PackageDraft::new("LAL").submit());
        assert_eq!(both_empty.reason, DecisionReason::EmptyPackage);
    }

    #[test]
    fn acceptance_is_symmetric() {
        let pairs = [
            (100.0, 80.0),
            (100.0, 70.0),
            (0.0, 0.0),
            (0.0, 50.0),
            (-20.0, 30.0),
            (-20.0, -18.0),
            (12.5, 12.5),
        ];
        for (a, b) in pairs {
            assert_eq!(
                decide_totals(a, b).accepted,
                decide_totals(b, a).accepted,
                "asymmetric for ({a}, {b})"
            );
        }
    }

    #[test]
    fn opposite_signs_are_lopsided() {
        let d = decide_totals(-20.0, 30.0);
        assert!(!d.accepted);
        assert_eq!(d.ratio, Some(0.0));
    }

    #[test]
    fn both_negative_compare_magnitudes() {
        assert!(decide_totals(-20.0, -18.0).accepted);
        assert!(!decide_totals(-50.0, -10.0).accepted);
    }

    #[test]
    fn multi_player_totals() {
        let d = evaluate_trade(&package("BOS", &[90.0]), &package("LAL", &[60.0, 30.0]));
        assert!(d.accepted);
        assert_eq!(d.ratio, Some(1.0));
    }

    #[test]
    fn custom_threshold() {
        let a = package("BOS", &[100.0]);
        let b = package("LAL", &[70.0]);
        assert!(evaluate_trade_with_threshold(&a, &b, 0.7).accepted);
        assert!(!evaluate_trade_with_threshold(&a, &b, 0.9).accepted);
    }

    #[test]
    fn reasons_render_as_messages() {
        assert_eq!(
            DecisionReason::EmptyPackage.to_string(),
            "both sides must offer at least one player"
        );
        assert_eq!(DecisionReason::TooLopsided.to_string(), "values too lopsided");
    }

    #[test]
    fn reassign_swaps_teams_and_keeps_original() {
        let roster = RosterTable::new(vec![
            player("Star", "BOS", 90.0),
            player("Bench", "BOS", 5.0),
            player("Wing", "LAL", 60.0),
            player("Big", "LAL", 30.0),
            player("Guard", "NYK", 40.0),
        ])
        .unwrap();
        let board_a = roster.team_board("BOS");
        let board_b = roster.team_board("LAL");
        let pkg_a = PackageDraft::new("BOS").toggle(&board_a, 0).unwrap().submit();
        let pkg_b = PackageDraft::new("LAL")
            .toggle(&board_b, 0)
            .and_then(|d| d.toggle(&board_b, 1))
            .unwrap()
            .submit();

        let before = roster.clone();
        let after = reassign_teams(&roster, &pkg_a, &pkg_b);

        assert_eq!(roster, before);
        assert_eq!(after.get("Star").unwrap().team, "LAL");
        assert_eq!(after.get("Wing").unwrap().team, "BOS");
        assert_eq!(after.get("Big").unwrap().team, "BOS");
        assert_eq!(after.get("Bench").unwrap().team, "BOS");
        assert_eq!(after.get("Guard").unwrap().team, "NYK");
        assert_eq!(after.len(), roster.len());
    }
}
