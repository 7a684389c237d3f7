// The roster table: the session's ordered, name-unique set of players.

use std::cmp::Ordering;
use std::collections::HashSet;

use serde::Serialize;

use crate::player::{PlayerRecord, ValidationError};

/// An ordered sequence of validated players, unique by name.
///
/// Tables are values: operations that change players (valuation, trades)
/// return a new table and leave the original untouched.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct RosterTable {
    players: Vec<PlayerRecord>,
}

impl RosterTable {
    /// Build a table, validating every record and rejecting duplicate names.
    pub fn new(players: Vec<PlayerRecord>) -> Result<Self, ValidationError> {
        let mut seen = HashSet::new();
        for p in &players {
            p.validate()?;
            if !seen.insert(p.name.as_str()) {
                return Err(ValidationError::DuplicatePlayer(p.name.clone()));
            }
        }
        Ok(RosterTable { players })
    }

    /// Rebuild from records that came out of an already-validated table.
    pub(crate) fn from_validated(players: Vec<PlayerRecord>) -> Self {
        RosterTable { players }
    }

    pub fn players(&self) -> &[PlayerRecord] {
        &self.players
    }

    pub fn into_players(self) -> Vec<PlayerRecord> {
        self.players
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PlayerRecord> {
        self.players.iter()
    }

    pub fn get(&self, name: &str) -> Option<&PlayerRecord> {
        self.players.iter().find(|p| p.name == name)
    }

    /// Distinct team codes, sorted.
    pub fn teams(&self) -> Vec<String> {
        let mut teams: Vec<String> = self.players.iter().map(|p| p.team.clone()).collect();
        teams.sort();
        teams.dedup();
        teams
    }

    /// A team's players ordered by descending value (ties by name). Indices
    /// into this ordering are what the roster selector toggles.
    pub fn team_board(&self, team: &str) -> Vec<PlayerRecord> {
        let mut board: Vec<PlayerRecord> = self
            .players
            .iter()
            .filter(|p| p.team == team)
            .cloned()
            .collect();
        board.sort_by(|a, b| cmp_value_desc(a.value(), b.value()).then_with(|| a.name.cmp(&b.name)));
        board
    }
}

impl<'a> IntoIterator for &'a RosterTable {
    type Item = &'a PlayerRecord;
    type IntoIter = std::slice::Iter<'a, PlayerRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.players.iter()
    }
}

/// Descending order for scores, with NaN sorted last.
pub fn cmp_value_desc(a: f64, b: f64) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => b.total_cmp(&a),
    }
}
