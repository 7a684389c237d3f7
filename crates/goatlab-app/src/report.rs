// Plain-text rendering of session results for the console.

use goatlab_basketball::player::PlayerRecord;
use goatlab_basketball::presets::Preset;
use goatlab_basketball::ranking::{RankedPlayer, StatLeader};
use goatlab_basketball::selection::TradePackage;

use crate::session::TradeOutcome;

pub fn presets(presets: &[Preset]) -> String {
    let mut out = String::from("GOAT LAB formulas:\n");
    for p in presets {
        out.push_str(&format!("{}: {}\n", p.key, p.description));
    }
    out
}

fn score_line(rank: usize, name: &str, team: &str, value: f64) -> String {
    format!("{rank:>3}. {name:<28} {team:<4} {value:>8.3}\n")
}

pub fn ranking(title: &str, ranked: &[RankedPlayer]) -> String {
    let mut out = format!("Top {} - {title}\n", ranked.len());
    for (i, r) in ranked.iter().enumerate() {
        out.push_str(&score_line(i + 1, &r.name, &r.team, r.score));
    }
    out
}

pub fn leaders(leaders: &[StatLeader]) -> String {
    let title = leaders.first().map(|l| l.field.column()).unwrap_or("-");
    let mut out = format!("Top {} - {title}\n", leaders.len());
    for (i, l) in leaders.iter().enumerate() {
        out.push_str(&score_line(i + 1, &l.name, &l.team, l.value));
    }
    out
}

/// A team's board with the indices used to select players for a trade.
pub fn board(team: &str, board: &[PlayerRecord]) -> String {
    let mut out = format!("{team} roster by PIP value\n");
    for (i, p) in board.iter().enumerate() {
        out.push_str(&format!(
            "{:>3}  {:<28} {:<3} age {:>2} {:>9.3}\n",
            i,
            p.name,
            p.position,
            p.stats.age,
            p.value()
        ));
    }
    out
}

fn package_line(package: &TradePackage) -> String {
    format!(
        "{} gives: {} (total {:.3})\n",
        package.team(),
        package.names().join(", "),
        package.total_value()
    )
}

pub fn trade(outcome: &TradeOutcome) -> String {
    let mut out = package_line(&outcome.package_a);
    out.push_str(&package_line(&outcome.package_b));
    if let Some(ratio) = outcome.decision.ratio {
        out.push_str(&format!("fairness ratio: {ratio:.3}\n"));
    }
    let verdict = if outcome.decision.accepted { "ACCEPTED" } else { "REJECTED" };
    out.push_str(&format!("{verdict}: {}\n", outcome.decision.reason));
    out
}
