// Formula scoring and stat leaderboards.

use goatlab_core::{normalize, EvalError, Formula, ScoreRange};
use serde::Serialize;
use tracing::debug;

use crate::player::PlayerRecord;
use crate::roster::{cmp_value_desc, RosterTable};
use crate::stats::StatField;

/// Default number of players shown in a ranking.
pub const DEFAULT_TOP_N: usize = 10;

/// One player's formula score.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedPlayer {
    pub name: String,
    pub team: String,
    /// Formula output before normalization.
    pub raw: f64,
    /// Normalized score within the requested range.
    pub score: f64,
}

/// One player's entry on a single-stat leaderboard.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatLeader {
    pub name: String,
    pub team: String,
    pub field: StatField,
    pub value: f64,
}

/// Evaluate `formula` for every player, normalize the results into `range`
/// and return all players ordered by descending score (NaN last). Equal
/// scores fall back to the raw value, then to name.
pub fn score_formula(
    roster: &RosterTable,
    formula: &str,
    range: ScoreRange,
) -> Result<Vec<RankedPlayer>, EvalError> {
    let compiled = Formula::compile::<PlayerRecord>(formula)?;
    let raw = compiled.eval_all(roster.players());
    let scores = normalize(&raw, range);

    let mut ranked: Vec<RankedPlayer> = roster
        .iter()
        .zip(raw.iter().zip(scores))
        .map(|(p, (&raw, score))| RankedPlayer {
            name: p.name.clone(),
            team: p.team.clone(),
            raw,
            score,
        })
        .collect();
    ranked.sort_by(|a, b| {
        cmp_value_desc(a.score, b.score)
            .then_with(|| cmp_value_desc(a.raw, b.raw))
            .then_with(|| a.name.cmp(&b.name))
    });

    debug!("scored {} players with `{}`", ranked.len(), compiled.expr());
    Ok(ranked)
}

/// Keep the first `n` entries of an ordered ranking.
pub fn top_n<T>(mut ranked: Vec<T>, n: usize) -> Vec<T> {
    ranked.truncate(n);
    ranked
}

/// The `n` players with the highest value of `field`.
pub fn stat_leaders(roster: &RosterTable, field: StatField, n: usize) -> Vec<StatLeader> {
    let mut leaders: Vec<StatLeader> = roster
        .iter()
        .map(|p| StatLeader {
            name: p.name.clone(),
            team: p.team.clone(),
            field,
            value: p.stat(field),
        })
        .collect();
    leaders.sort_by(|a, b| cmp_value_desc(a.value, b.value).then_with(|| a.name.cmp(&b.name)));
    top_n(leaders, n)
}

/// Top `n` players by PIP value.
pub fn value_leaders(roster: &RosterTable, n: usize) -> Vec<PlayerRecord> {
    let mut players = roster.players().to_vec();
    players.sort_by(|a, b| cmp_value_desc(a.value(), b.value()).then_with(|| a.name.cmp(&b.name)));
    top_n(players, n)
}
