// Player records and the checks a record must pass before valuation.

use goatlab_core::StatRecord;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::stats::{StatField, StatLine};

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("player name must not be empty")]
    EmptyName,

    #[error("player `{player}` has a non-finite `{field}` value")]
    NonFiniteStat { player: String, field: StatField },

    #[error("player `{player}` has no games played")]
    NoGamesPlayed { player: String },

    #[error("player `{0}` appears more than once")]
    DuplicatePlayer(String),

    #[error("roster is empty")]
    EmptyRoster,
}

// ---------------------------------------------------------------------------
// Player record
// ---------------------------------------------------------------------------

/// Values derived from a player's raw stats by the valuation model.
/// All zero until `valuation::compute_value` has run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DerivedValues {
    pub minutes_per_game: f64,
    pub volume_score: f64,
    pub efficiency_score: f64,
    pub raw_impact: f64,
    pub age_modifier: f64,
    pub value: f64,
}

/// One player's season line plus the derived valuation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerRecord {
    pub name: String,
    pub team: String,
    pub position: String,
    pub stats: StatLine,
    #[serde(default)]
    pub derived: DerivedValues,
}

impl PlayerRecord {
    pub fn new(name: &str, team: &str, position: &str, stats: StatLine) -> Self {
        PlayerRecord {
            name: name.to_string(),
            team: team.to_string(),
            position: position.to_string(),
            stats,
            derived: DerivedValues::default(),
        }
    }

    /// PIP value (zero before valuation).
    pub fn value(&self) -> f64 {
        self.derived.value
    }

    pub fn stat(&self, field: StatField) -> f64 {
        self.stats.get(field)
    }

    /// Check the invariants the core relies on: a name, finite stats and at
    /// least one game played.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::EmptyName);
        }
        if let Some(field) = self.stats.first_non_finite() {
            return Err(ValidationError::NonFiniteStat {
                player: self.name.clone(),
                field,
            });
        }
        if self.stats.games_played <= 0.0 {
            return Err(ValidationError::NoGamesPlayed {
                player: self.name.clone(),
            });
        }
        Ok(())
    }
}

impl StatRecord for PlayerRecord {
    type Field = StatField;

    fn resolve_field(name: &str) -> Option<StatField> {
        StatField::from_name(name)
    }

    fn field_value(&self, field: StatField) -> f64 {
        self.stats.get(field)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
