// Stat field registry: the whitelist of names formulas may reference.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A per-player season statistic known to the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatField {
    Points,
    Assists,
    Rebounds,
    Turnovers,
    Minutes,
    GamesPlayed,
    Age,
    WinShares,
    OffensiveWinShares,
    DefensiveWinShares,
    PlayerEfficiencyRating,
    TrueShootingPct,
    AssistPct,
    TurnoverPct,
    StealPct,
    BlockPct,
    UsagePct,
    ReboundPct,
    WinSharesPer48,
    FieldGoalPct,
    ThreePointPct,
    FreeThrowPct,
}

impl StatField {
    pub const ALL: [StatField; 22] = [
        StatField::Points,
        StatField::Assists,
        StatField::Rebounds,
        StatField::Turnovers,
        StatField::Minutes,
        StatField::GamesPlayed,
        StatField::Age,
        StatField::WinShares,
        StatField::OffensiveWinShares,
        StatField::DefensiveWinShares,
        StatField::PlayerEfficiencyRating,
        StatField::TrueShootingPct,
        StatField::AssistPct,
        StatField::TurnoverPct,
        StatField::StealPct,
        StatField::BlockPct,
        StatField::UsagePct,
        StatField::ReboundPct,
        StatField::WinSharesPer48,
        StatField::FieldGoalPct,
        StatField::ThreePointPct,
        StatField::FreeThrowPct,
    ];

    /// Canonical snake_case name used in formulas.
    pub fn name(&self) -> &'static str {
        match self {
            StatField::Points => "points",
            StatField::Assists => "assists",
            StatField::Rebounds => "rebounds",
            StatField::Turnovers => "turnovers",
            StatField::Minutes => "minutes",
            StatField::GamesPlayed => "games_played",
            StatField::Age => "age",
            StatField::WinShares => "win_shares",
            StatField::OffensiveWinShares => "offensive_win_shares",
            StatField::DefensiveWinShares => "defensive_win_shares",
            StatField::PlayerEfficiencyRating => "player_efficiency_rating",
            StatField::TrueShootingPct => "true_shooting_pct",
            StatField::AssistPct => "assist_pct",
            StatField::TurnoverPct => "turnover_pct",
            StatField::StealPct => "steal_pct",
            StatField::BlockPct => "block_pct",
            StatField::UsagePct => "usage_pct",
            StatField::ReboundPct => "rebound_pct",
            StatField::WinSharesPer48 => "win_shares_per_48",
            StatField::FieldGoalPct => "field_goal_pct",
            StatField::ThreePointPct => "three_point_pct",
            StatField::FreeThrowPct => "free_throw_pct",
        }
    }

    /// Basketball-Reference column header the stat is read from. Headers
    /// that are not valid identifiers (`WS/48`, `3P%`) are written in
    /// brackets inside formulas, e.g. `[3P%]`.
    pub fn column(&self) -> &'static str {
        match self {
            StatField::Points => "PTS",
            StatField::Assists => "AST",
            StatField::Rebounds => "TRB",
            StatField::Turnovers => "TOV",
            StatField::Minutes => "MP",
            StatField::GamesPlayed => "G",
            StatField::Age => "Age",
            StatField::WinShares => "WS",
            StatField::OffensiveWinShares => "OWS",
            StatField::DefensiveWinShares => "DWS",
            StatField::PlayerEfficiencyRating => "PER",
            StatField::TrueShootingPct => "TS%",
            StatField::AssistPct => "AST%",
            StatField::TurnoverPct => "TOV%",
            StatField::StealPct => "STL%",
            StatField::BlockPct => "BLK%",
            StatField::UsagePct => "USG%",
            StatField::ReboundPct => "TRB%",
            StatField::WinSharesPer48 => "WS/48",
            StatField::FieldGoalPct => "FG%",
            StatField::ThreePointPct => "3P%",
            StatField::FreeThrowPct => "FT%",
        }
    }

    /// Resolve a canonical name or column header, ignoring case.
    pub fn from_name(s: &str) -> Option<Self> {
        let s = s.trim();
        StatField::ALL
            .iter()
            .copied()
            .find(|f| f.name().eq_ignore_ascii_case(s) || f.column().eq_ignore_ascii_case(s))
    }
}

impl fmt::Display for StatField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Raw season statistics for one player. Every value is finite once a
/// record has passed roster validation; missing inputs are zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct StatLine {
    pub points: f64,
    pub assists: f64,
    pub rebounds: f64,
    pub turnovers: f64,
    pub minutes: f64,
    pub games_played: f64,
    pub age: f64,
    pub win_shares: f64,
    pub offensive_win_shares: f64,
    pub defensive_win_shares: f64,
    pub player_efficiency_rating: f64,
    pub true_shooting_pct: f64,
    pub assist_pct: f64,
    pub turnover_pct: f64,
    pub steal_pct: f64,
    pub block_pct: f64,
    pub usage_pct: f64,
    pub rebound_pct: f64,
    pub win_shares_per_48: f64,
    pub field_goal_pct: f64,
    pub three_point_pct: f64,
    pub free_throw_pct: f64,
}

impl StatLine {
    pub fn get(&self, field: StatField) -> f64 {
        match field {
            StatField::Points => self.points,
            StatField::Assists => self.assists,
            StatField::Rebounds => self.rebounds,
            StatField::Turnovers => self.turnovers,
            StatField::Minutes => self.minutes,
            StatField::GamesPlayed => self.games_played,
            StatField::Age => self.age,
            StatField::WinShares => self.win_shares,
            StatField::OffensiveWinShares => self.offensive_win_shares,
            StatField::DefensiveWinShares => self.defensive_win_shares,
            StatField::PlayerEfficiencyRating => self.player_efficiency_rating,
            StatField::TrueShootingPct => self.true_shooting_pct,
            StatField::AssistPct => self.assist_pct,
            StatField::TurnoverPct => self.turnover_pct,
            StatField::StealPct => self.steal_pct,
            StatField::BlockPct => self.block_pct,
            StatField::UsagePct => self.usage_pct,
            StatField::ReboundPct => self.rebound_pct,
            StatField::WinSharesPer48 => self.win_shares_per_48,
            StatField::FieldGoalPct => self.field_goal_pct,
            StatField::ThreePointPct => self.three_point_pct,
            StatField::FreeThrowPct => self.free_throw_pct,
        }
    }

    pub fn set(&mut self, field: StatField, value: f64) {
        *self.get_mut(field) = value;
    }

    pub fn get_mut(&mut self, field: StatField) -> &mut f64 {
        match field {
            StatField::Points => &mut self.points,
            StatField::Assists => &mut self.assists,
            StatField::Rebounds => &mut self.rebounds,
            StatField::Turnovers => &mut self.turnovers,
            StatField::Minutes => &mut self.minutes,
            StatField::GamesPlayed => &mut self.games_played,
            StatField::Age => &mut self.age,
            StatField::WinShares => &mut self.win_shares,
            StatField::OffensiveWinShares => &mut self.offensive_win_shares,
            StatField::DefensiveWinShares => &mut self.defensive_win_shares,
            StatField::PlayerEfficiencyRating => &mut self.player_efficiency_rating,
            StatField::TrueShootingPct => &mut self.true_shooting_pct,
            StatField::AssistPct => &mut self.assist_pct,
            StatField::TurnoverPct => &mut self.turnover_pct,
            StatField::StealPct => &mut self.steal_pct,
            StatField::BlockPct => &mut self.block_pct,
            StatField::UsagePct => &mut self.usage_pct,
            StatField::ReboundPct => &mut self.rebound_pct,
            StatField::WinSharesPer48 => &mut self.win_shares_per_48,
            StatField::FieldGoalPct => &mut self.field_goal_pct,
            StatField::ThreePointPct => &mut self.three_point_pct,
            StatField::FreeThrowPct => &mut self.free_throw_pct,
        }
    }

    /// The first field holding a NaN or infinite value, if any.
    pub fn first_non_finite(&self) -> Option<StatField> {
        StatField::ALL.into_iter().find(|&f| !self.get(f).is_finite())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_and_columns_are_unique() {
        let mut names: Vec<&str> = StatField::ALL.iter().map(|f| f.name()).collect();
        let mut columns: Vec<String> =
            StatField::ALL.iter().map(|f| f.column().to_lowercase()).collect();
        names.sort();
        names.dedup();
        columns.sort();
        columns.dedup();
        assert_eq!(names.len(), StatField::ALL.len());
        assert_eq!(columns.len(), StatField::ALL.len());
    }

    #[test]
    fn every_field_round_trips_through_both_spellings() {
        for field in StatField::ALL {
            assert_eq!(StatField::from_name(field.name()), Some(field));
            assert_eq!(StatField::from_name(field.column()), Some(field));
        }
    }

    #[test]
    fn lookup_ignores_case() {
        assert_eq!(StatField::from_name("pts"), Some(StatField::Points));
        assert_eq!(StatField::from_name("ts%"), Some(StatField::TrueShootingPct));
        assert_eq!(StatField::from_name("WIN_SHARES"), Some(StatField::WinShares));
        assert_eq!(StatField::from_name("ws/48"), Some(StatField::WinSharesPer48));
        assert_eq!(StatField::from_name("3p%"), Some(StatField::ThreePointPct));
        assert_eq!(StatField::from_name("fg%"), Some(StatField::FieldGoalPct));
        assert_eq!(StatField::from_name("salary"), None);
    }

    #[test]
    fn get_and_set_address_the_same_slot() {
        let mut line = StatLine::default();
        for (i, field) in StatField::ALL.into_iter().enumerate() {
            line.set(field, i as f64 + 1.0);
        }
        for (i, field) in StatField::ALL.into_iter().enumerate() {
            assert_eq!(line.get(field), i as f64 + 1.0);
        }
        assert_eq!(line.points, 1.0);
        assert_eq!(line.win_shares_per_48, 19.0);
        assert_eq!(line.free_throw_pct, 22.0);
    }

    #[test]
    fn detects_non_finite_values() {
        let mut line = StatLine::default();
        assert_eq!(line.first_non_finite(), None);
        line.steal_pct = f64::NAN;
        assert_eq!(line.first_non_finite(), Some(StatField::StealPct));
    }
}
