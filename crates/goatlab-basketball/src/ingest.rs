// Season stats loading from Basketball-Reference style CSV exports.
//
// Column values are coerced to numbers (missing or unparseable cells become
// zero), traded players are collapsed to their `TOT` row, and players who
// did not play or fall under the points floor are dropped before the rows
// are validated into a `RosterTable`.

use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::player::{PlayerRecord, ValidationError};
use crate::roster::RosterTable;
use crate::stats::{StatField, StatLine};

/// Team code Basketball-Reference uses for a traded player's season totals.
pub const TOTAL_TEAM: &str = "TOT";

/// Filters applied while loading.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IngestOptions {
    /// Drop players scoring fewer points than this.
    pub min_points: f64,
}

impl Default for IngestOptions {
    fn default() -> Self {
        IngestOptions { min_points: 15.0 }
    }
}

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error("failed to read file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("CSV error in {path}: {source}")]
    Csv { path: String, source: csv::Error },

    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),
}

// ---------------------------------------------------------------------------
// Raw CSV row (private)
// ---------------------------------------------------------------------------

/// One CSV row. Identity columns are named; every other column lands in
/// `columns` and is matched against the stat registry by header.
#[derive(Debug, Deserialize)]
#[allow(non_snake_case)]
struct RawStatRow {
    #[serde(alias = "Name")]
    Player: String,
    #[serde(default, alias = "Team")]
    Tm: String,
    #[serde(default)]
    Pos: String,
    #[serde(flatten)]
    columns: HashMap<String, serde_json::Value>,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Basketball-Reference exports append a `\slug` id to player names.
fn clean_name(raw: &str) -> String {
    raw.split('\\').next().unwrap_or_default().trim().to_string()
}

/// Numeric value of a cell, or `None` when it is empty, non-numeric or
/// non-finite.
fn coerce_number(value: &serde_json::Value) -> Option<f64> {
    let n = match value {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }?;
    n.is_finite().then_some(n)
}

fn stat_line_from_columns(player: &str, columns: &HashMap<String, serde_json::Value>) -> StatLine {
    let mut stats = StatLine::default();
    for (header, cell) in columns {
        let Some(field) = StatField::from_name(header) else {
            continue;
        };
        match coerce_number(cell) {
            Some(v) => stats.set(field, v),
            None => {
                let blank = matches!(cell, serde_json::Value::String(s) if s.trim().is_empty());
                if !blank {
                    warn!("player '{}': non-numeric {} value {}, using 0", player, header, cell);
                }
            }
        }
    }
    stats
}

// ---------------------------------------------------------------------------
// Reader-based loader (enables testing without temp files)
// ---------------------------------------------------------------------------

fn load_players_from_reader<R: Read>(rdr: R, options: &IngestOptions) -> Result<Vec<PlayerRecord>, csv::Error> {
    let mut reader = csv::Reader::from_reader(rdr);
    let mut players: Vec<PlayerRecord> = Vec::new();
    let mut index_by_name: HashMap<String, usize> = HashMap::new();

    for result in reader.deserialize::<RawStatRow>() {
        let raw = match result {
            Ok(raw) => raw,
            Err(e) => {
                warn!("skipping malformed stats row: {}", e);
                continue;
            }
        };

        let name = clean_name(&raw.Player);
        if name.is_empty() {
            warn!("skipping stats row with no player name");
            continue;
        }
        let stats = stat_line_from_columns(&name, &raw.columns);
        let record = PlayerRecord::new(&name, raw.Tm.trim(), raw.Pos.trim(), stats);

        match index_by_name.get(&name) {
            Some(&idx) => {
                if record.team == TOTAL_TEAM {
                    players[idx] = record;
                } else if players[idx].team != TOTAL_TEAM {
                    debug!("'{}' listed again for {}, keeping first row", name, record.team);
                }
            }
            None => {
                index_by_name.insert(name, players.len());
                players.push(record);
            }
        }
    }

    let before = players.len();
    players.retain(|p| {
        if p.stats.games_played <= 0.0 {
            debug!("dropping '{}': no games played", p.name);
            return false;
        }
        p.stats.points >= options.min_points
    });
    debug!(
        "kept {} of {} players (min_points={})",
        players.len(),
        before,
        options.min_points
    );

    Ok(players)
}

/// Parse and validate a roster from any reader.
pub fn load_roster_from_reader<R: Read>(rdr: R, options: &IngestOptions) -> Result<RosterTable, IngestError> {
    let players = load_players_from_reader(rdr, options).map_err(|e| IngestError::Csv {
        path: "<reader>".into(),
        source: e,
    })?;
    into_roster(players)
}

/// Load and validate a roster from a CSV file.
pub fn load_roster(path: &Path, options: &IngestOptions) -> Result<RosterTable, IngestError> {
    let file = std::fs::File::open(path).map_err(|e| IngestError::Io {
        path: path.display().to_string(),
        source: e,
    })?;
    let players = load_players_from_reader(file, options).map_err(|e| IngestError::Csv {
        path: path.display().to_string(),
        source: e,
    })?;
    let roster = into_roster(players)?;
    info!("loaded {} players from {}", roster.len(), path.display());
    Ok(roster)
}

fn into_roster(players: Vec<PlayerRecord>) -> Result<RosterTable, IngestError> {
    if players.is_empty() {
        return Err(ValidationError::EmptyRoster.into());
    }
    Ok(RosterTable::new(players)?)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
