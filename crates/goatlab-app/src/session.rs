// Session orchestration: owns the authoritative roster snapshot and threads
// it through ranking and trade evaluation.

use std::path::Path;

use serde::Serialize;
use thiserror::Error;
use tracing::info;

use goatlab_basketball::ingest::{load_roster, IngestError};
use goatlab_basketball::player::PlayerRecord;
use goatlab_basketball::ranking::{score_formula, stat_leaders, top_n, RankedPlayer, StatLeader};
use goatlab_basketball::roster::RosterTable;
use goatlab_basketball::selection::{PackageDraft, SelectionError, TradePackage};
use goatlab_basketball::stats::StatField;
use goatlab_basketball::trade::{evaluate_trade_with_threshold, reassign_teams, TradeDecision};
use goatlab_basketball::valuation::compute_value;
use goatlab_core::EvalError;

use crate::config::Config;

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Ingest(#[from] IngestError),

    #[error(transparent)]
    Formula(#[from] EvalError),

    #[error("selection error for {team}: {source}")]
    Selection {
        team: String,
        source: SelectionError,
    },

    #[error("unknown team `{0}`")]
    UnknownTeam(String),

    #[error("a trade needs two different teams, got {0} twice")]
    SameTeam(String),
}

// ---------------------------------------------------------------------------
// Trade proposal / outcome
// ---------------------------------------------------------------------------

/// Indices into each team's board (descending value order) to toggle into
/// that side's package. Repeating an index toggles the player back out.
#[derive(Debug, Clone, PartialEq)]
pub struct TradeProposal {
    pub team_a: String,
    pub picks_a: Vec<usize>,
    pub team_b: String,
    pub picks_b: Vec<usize>,
}

/// The result of evaluating a proposal. `preview` is the roster as it would
/// look after the trade, present only when the trade was accepted.
#[derive(Debug, Clone, Serialize)]
pub struct TradeOutcome {
    pub decision: TradeDecision,
    pub package_a: TradePackage,
    pub package_b: TradePackage,
    #[serde(skip)]
    pub preview: Option<RosterTable>,
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

pub struct Session {
    config: Config,
    roster: RosterTable,
}

impl Session {
    /// Start a session from an already-loaded roster. PIP values are
    /// computed once here.
    pub fn new(config: Config, roster: &RosterTable) -> Self {
        let roster = compute_value(roster);
        info!("session started with {} players", roster.len());
        Session { config, roster }
    }

    /// Load the configured stats CSV (relative to `base_dir` when not absolute).
    pub fn load(config: Config, base_dir: &Path) -> Result<Self, SessionError> {
        let path = base_dir.join(&config.data.stats_csv);
        let roster = load_roster(&path, &config.ingest_options())?;
        Ok(Session::new(config, &roster))
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The current authoritative roster snapshot.
    pub fn roster(&self) -> &RosterTable {
        &self.roster
    }

    /// Top players under `formula`, normalized to the configured range.
    pub fn rank(&self, formula: &str, limit: Option<usize>) -> Result<Vec<RankedPlayer>, SessionError> {
        let ranked = score_formula(&self.roster, formula, self.config.score_range())?;
        Ok(top_n(ranked, limit.unwrap_or(self.config.ranking.top_n)))
    }

    pub fn leaders(&self, field: StatField, limit: Option<usize>) -> Vec<StatLeader> {
        stat_leaders(&self.roster, field, limit.unwrap_or(self.config.ranking.top_n))
    }

    /// A team's players in selection order.
    pub fn board(&self, team: &str) -> Result<Vec<PlayerRecord>, SessionError> {
        let board = self.roster.team_board(team);
        if board.is_empty() {
            return Err(SessionError::UnknownTeam(team.to_string()));
        }
        Ok(board)
    }

    /// Build both packages from the proposal and evaluate them. The session
    /// snapshot is not changed; call `commit` to apply an accepted trade.
    pub fn propose_trade(&self, proposal: &TradeProposal) -> Result<TradeOutcome, SessionError> {
        if proposal.team_a == proposal.team_b {
            return Err(SessionError::SameTeam(proposal.team_a.clone()));
        }
        let package_a = self.build_package(&proposal.team_a, &proposal.picks_a)?;
        let package_b = self.build_package(&proposal.team_b, &proposal.picks_b)?;

        let decision = evaluate_trade_with_threshold(
            &package_a,
            &package_b,
            self.config.trade.fairness_threshold,
        );
        let preview = decision
            .accepted
            .then(|| reassign_teams(&self.roster, &package_a, &package_b));

        info!(
            "trade {} {:?} for {} {:?}: {}",
            proposal.team_a,
            package_a.names(),
            proposal.team_b,
            package_b.names(),
            decision.reason
        );
        Ok(TradeOutcome {
            decision,
            package_a,
            package_b,
            preview,
        })
    }

    /// Make an accepted trade's preview the new snapshot. Returns `false`
    /// (and leaves the snapshot alone) for rejected trades.
    pub fn commit(&mut self, outcome: TradeOutcome) -> bool {
        match outcome.preview {
            Some(roster) => {
                self.roster = roster;
                true
            }
            None => false,
        }
    }

    fn build_package(&self, team: &str, picks: &[usize]) -> Result<TradePackage, SessionError> {
        let board = self.board(team)?;
        let mut draft = PackageDraft::new(team);
        for &index in picks {
            draft = draft.toggle(&board, index).map_err(|source| SessionError::Selection {
                team: team.to_string(),
                source,
            })?;
        }
        Ok(draft.submit())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
