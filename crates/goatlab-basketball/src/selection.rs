// Roster selector: toggle players from a team board into a trade package.

use serde::Serialize;
use thiserror::Error;

use crate::player::PlayerRecord;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SelectionError {
    #[error("index {index} is out of range for a board of {len} players")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("player `{player}` plays for {actual}, not {expected}")]
    TeamMismatch {
        player: String,
        expected: String,
        actual: String,
    },
}

/// A package under construction. Toggling returns a new draft, so a failed
/// toggle leaves the caller's draft exactly as it was.
#[derive(Debug, Clone, PartialEq)]
pub struct PackageDraft {
    team: String,
    members: Vec<PlayerRecord>,
}

impl PackageDraft {
    pub fn new(team: &str) -> Self {
        PackageDraft {
            team: team.to_string(),
            members: Vec::new(),
        }
    }

    pub fn team(&self) -> &str {
        &self.team
    }

    pub fn members(&self) -> &[PlayerRecord] {
        &self.members
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.members.iter().any(|p| p.name == name)
    }

    /// Add the player at `index` of `board` if absent, remove it if present.
    ///
    /// `board` is the team's roster in selection order (see
    /// `RosterTable::team_board`).
    pub fn toggle(&self, board: &[PlayerRecord], index: usize) -> Result<Self, SelectionError> {
        let player = board.get(index).ok_or(SelectionError::IndexOutOfRange {
            index,
            len: board.len(),
        })?;
        if player.team != self.team {
            return Err(SelectionError::TeamMismatch {
                player: player.name.clone(),
                expected: self.team.clone(),
                actual: player.team.clone(),
            });
        }

        let mut next = self.clone();
        match next.members.iter().position(|p| p.name == player.name) {
            Some(pos) => {
                next.members.remove(pos);
            }
            None => next.members.push(player.clone()),
        }
        Ok(next)
    }

    /// Finalize the draft. The returned package can no longer change.
    pub fn submit(self) -> TradePackage {
        let total_value = self.members.iter().map(PlayerRecord::value).sum();
        TradePackage {
            team: self.team,
            members: self.members,
            total_value,
        }
    }
}

/// A finalized set of players one team offers in a trade.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TradePackage {
    team: String,
    members: Vec<PlayerRecord>,
    total_value: f64,
}

impl TradePackage {
    pub fn team(&self) -> &str {
        &self.team
    }

    pub fn members(&self) -> &[PlayerRecord] {
        &self.members
    }

    /// Sum of PIP values over members.
    pub fn total_value(&self) -> f64 {
        self.total_value
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.members.iter().any(|p| p.name == name)
    }

    pub fn names(&self) -> Vec<&str> {
        self.members.iter().map(|p| p.name.as_str()).collect()
    }
}
