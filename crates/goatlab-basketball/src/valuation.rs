// Player Impact & Potential (PIP): volume plus efficiency, scaled by an
// age-tier multiplier.

use tracing::debug;

use crate::player::{DerivedValues, PlayerRecord};
use crate::roster::RosterTable;
use crate::stats::StatLine;

// ---------------------------------------------------------------------------
// Age tiers
// ---------------------------------------------------------------------------

/// One entry of the age-tier table.
#[derive(Debug, Clone, Copy)]
pub struct AgeTier {
    pub label: &'static str,
    pub applies: fn(f64) -> bool,
    pub multiplier: f64,
}

/// Age tiers checked in order; the first matching tier wins.
pub const AGE_TIERS: [AgeTier; 3] = [
    AgeTier {
        label: "24 and under",
        applies: |age| age <= 24.0,
        multiplier: 1.20,
    },
    AgeTier {
        label: "25-29",
        applies: |age| (25.0..=29.0).contains(&age),
        multiplier: 1.25,
    },
    AgeTier {
        label: "35 and over",
        applies: |age| age >= 35.0,
        multiplier: 0.90,
    },
];

/// Multiplier when no tier matches. Covers 30-34, and fractional ages that
/// fall between tier bounds (e.g. 24.5).
pub const DEFAULT_AGE_MODIFIER: f64 = 1.00;

pub fn age_modifier(age: f64) -> f64 {
    AGE_TIERS
        .iter()
        .find(|tier| (tier.applies)(age))
        .map(|tier| tier.multiplier)
        .unwrap_or(DEFAULT_AGE_MODIFIER)
}

// ---------------------------------------------------------------------------
// Sub-scores
// ---------------------------------------------------------------------------

/// `win_shares * 4 + points / 40`
pub fn volume_score(stats: &StatLine) -> f64 {
    stats.win_shares * 4.0 + stats.points / 40.0
}

/// `PER * TS% + (AST% - TOV%) + (STL% + BLK%)`
pub fn efficiency_score(stats: &StatLine) -> f64 {
    stats.player_efficiency_rating * stats.true_shooting_pct
        + (stats.assist_pct - stats.turnover_pct)
        + (stats.steal_pct + stats.block_pct)
}

pub fn minutes_per_game(stats: &StatLine) -> f64 {
    if stats.games_played > 0.0 {
        stats.minutes / stats.games_played
    } else {
        0.0
    }
}

/// Derive the PIP fields for a single player's stats.
pub fn derive(stats: &StatLine) -> DerivedValues {
    let volume = volume_score(stats);
    let efficiency = efficiency_score(stats);
    let raw_impact = volume + efficiency;
    let modifier = age_modifier(stats.age);
    DerivedValues {
        minutes_per_game: minutes_per_game(stats),
        volume_score: volume,
        efficiency_score: efficiency,
        raw_impact,
        age_modifier: modifier,
        value: raw_impact * modifier,
    }
}

/// A copy of `player` with its derived fields filled in.
pub fn value_player(player: &PlayerRecord) -> PlayerRecord {
    PlayerRecord {
        derived: derive(&player.stats),
        ..player.clone()
    }
}

/// Annotate every player in the table with its PIP value. The input table
/// is not modified.
pub fn compute_value(roster: &RosterTable) -> RosterTable {
    let players: Vec<PlayerRecord> = roster.iter().map(value_player).collect();
    debug!("computed PIP values for {} players", players.len());
    RosterTable::from_validated(players)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f64, b: f64, epsilon: f64) -> bool {
        (a - b).abs() < epsilon
    }

    fn stats_with_age(age: f64) -> StatLine {
        StatLine {
            points: 1600.0,
            minutes: 2400.0,
            games_played: 70.0,
            age,
            win_shares: 8.0,
            player_efficiency_rating: 22.0,
            true_shooting_pct: 0.6,
            assist_pct: 25.0,
            turnover_pct: 12.0,
            steal_pct: 1.5,
            block_pct: 2.5,
            ..StatLine::default()
        }
    }

    #[test]
    fn sub_scores_follow_the_formulas() {
        let s = stats_with_age(30.0);
        assert!(approx_eq(volume_score(&s), 32.0 + 40.0, 1e-9));
        assert!(approx_eq(efficiency_score(&s), 13.2 + 13.0 + 4.0, 1e-9));
        assert!(approx_eq(minutes_per_game(&s), 2400.0 / 70.0, 1e-9));

        let d = derive(&s);
        assert!(approx_eq(d.raw_impact, 72.0 + 30.2, 1e-9));
        assert!(approx_eq(d.value, d.raw_impact, 1e-9));
    }

    #[test]
    fn age_tiers_first_match_wins() {
        assert_eq!(age_modifier(19.0), 1.20);
        assert_eq!(age_modifier(24.0), 1.20);
        assert_eq!(age_modifier(25.0), 1.25);
        assert_eq!(age_modifier(29.0), 1.25);
        assert_eq!(age_modifier(30.0), 1.00);
        assert_eq!(age_modifier(34.0), 1.00);
        assert_eq!(age_modifier(35.0), 0.90);
        assert_eq!(age_modifier(41.0), 0.90);
    }

    #[test]
    fn fractional_age_between_tiers_uses_default() {
        assert_eq!(age_modifier(24.5), DEFAULT_AGE_MODIFIER);
        assert_eq!(age_modifier(29.5), DEFAULT_AGE_MODIFIER);
    }

    #[test]
    fn prime_versus_young_ratio() {
        let young = derive(&stats_with_age(22.0));
        let prime = derive(&stats_with_age(27.0));
        assert!(approx_eq(young.raw_impact, prime.raw_impact, 1e-12));
        assert!(approx_eq(prime.value / young.value, 1.25 / 1.20, 1e-12));
    }

    #[test]
    fn veteran_versus_thirties_ratio() {
        let thirties = derive(&stats_with_age(32.0));
        let veteran = derive(&stats_with_age(35.0));
        assert!(approx_eq(veteran.value / thirties.value, 0.9 / 1.0, 1e-12));
    }

    #[test]
    fn compute_value_leaves_input_untouched() {
        let p = PlayerRecord::new("Test", "BOS", "F", stats_with_age(26.0));
        let table = RosterTable::new(vec![p]).unwrap();
        let valued = compute_value(&table);

        assert_eq!(table.players()[0].value(), 0.0);
        assert!(valued.players()[0].value() > 0.0);
        assert_eq!(valued.players()[0].derived.age_modifier, 1.25);
        assert_eq!(valued.players()[0].stats, table.players()[0].stats);
    }

    #[test]
    fn value_can_be_negative() {
        let s = StatLine {
            games_played: 5.0,
            age: 30.0,
            turnover_pct: 40.0,
            ..StatLine::default()
        };
        assert!(derive(&s).value < 0.0);
    }
}
