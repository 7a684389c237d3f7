// Built-in GOAT LAB formulas.

use tracing::warn;

/// A named, ready-made scoring formula.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Preset {
    pub key: &'static str,
    pub description: &'static str,
    pub formula: &'static str,
}

pub const PRESETS: [Preset; 3] = [
    Preset {
        key: "1",
        description: "Advanced stats based on Win Shares and player percentages.",
        formula: "((48 * (offensive_win_shares + defensive_win_shares) / (minutes / 5))) * win_shares_per_48 \
                  + 0.5 * ((48 * (offensive_win_shares + defensive_win_shares) / (minutes / 5))) \
                  * (points + rebound_pct + assist_pct + steal_pct + block_pct + turnover_pct)",
    },
    Preset {
        key: "2",
        description: "Player Efficiency Rating (PER) multiplied by True Shooting Percentage (TS%) adjusted by Win Shares.",
        formula: "player_efficiency_rating * true_shooting_pct + offensive_win_shares - defensive_win_shares",
    },
    Preset {
        key: "3",
        description: "Basic formula based on points, assists, rebounds, and turnovers.",
        formula: "points + assists + rebounds - turnovers",
    },
];

pub fn find_preset(key: &str) -> Option<&'static Preset> {
    let key = key.trim();
    PRESETS.iter().find(|p| p.key == key)
}

/// The preset for `choice`, falling back to the first preset when the
/// choice is not recognised.
pub fn choose_preset(choice: &str) -> &'static Preset {
    find_preset(choice).unwrap_or_else(|| {
        warn!("unknown preset '{}', using preset {}", choice.trim(), PRESETS[0].key);
        &PRESETS[0]
    })
}
