// Command-line parsing for the `goatlab` binary.

use thiserror::Error;

use goatlab_basketball::stats::StatField;

use crate::session::TradeProposal;

pub const USAGE: &str = "\
usage:
  goatlab presets
  goatlab rank [--preset KEY | --formula EXPR] [--top N]
  goatlab leaders STAT[,STAT..] [--top N]
  goatlab board TEAM
  goatlab trade TEAM_A IDX[,IDX..] TEAM_B IDX[,IDX..] [--apply] [--json]";

#[derive(Debug, Clone, PartialEq, Error)]
pub enum CliError {
    #[error("missing command")]
    MissingCommand,

    #[error("unknown command `{0}`")]
    UnknownCommand(String),

    #[error("missing argument: {0}")]
    MissingArgument(&'static str),

    #[error("unexpected argument `{0}`")]
    UnexpectedArgument(String),

    #[error("invalid value `{value}` for {what}")]
    InvalidValue { what: &'static str, value: String },

    #[error("--preset and --formula cannot be combined")]
    ConflictingFormula,
}

/// Which formula `rank` should use.
#[derive(Debug, Clone, PartialEq)]
pub enum FormulaChoice {
    /// The configured default preset.
    Default,
    /// A preset key; unknown keys fall back to the first preset.
    Preset(String),
    Custom(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Presets,
    Rank {
        formula: FormulaChoice,
        top: Option<usize>,
    },
    Leaders {
        fields: Vec<StatField>,
        top: Option<usize>,
    },
    Board {
        team: String,
    },
    Trade {
        proposal: TradeProposal,
        apply: bool,
        json: bool,
    },
}

/// Parse the arguments following the program name.
pub fn parse_args<I, S>(args: I) -> Result<Command, CliError>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut args = args.into_iter().map(Into::into);
    let command = args.next().ok_or(CliError::MissingCommand)?;
    let rest: Vec<String> = args.collect();

    match command.as_str() {
        "presets" => {
            no_more(&rest)?;
            Ok(Command::Presets)
        }
        "rank" => parse_rank(&rest),
        "leaders" => parse_leaders(&rest),
        "board" => {
            let team = rest.first().ok_or(CliError::MissingArgument("TEAM"))?;
            no_more(&rest[1..])?;
            Ok(Command::Board {
                team: team.to_uppercase(),
            })
        }
        "trade" => parse_trade(&rest),
        other => Err(CliError::UnknownCommand(other.to_string())),
    }
}

fn no_more(rest: &[String]) -> Result<(), CliError> {
    match rest.first() {
        Some(extra) => Err(CliError::UnexpectedArgument(extra.clone())),
        None => Ok(()),
    }
}

fn flag_value<'a>(
    iter: &mut std::slice::Iter<'a, String>,
    what: &'static str,
) -> Result<&'a String, CliError> {
    iter.next().ok_or(CliError::MissingArgument(what))
}

fn parse_top(value: &str) -> Result<usize, CliError> {
    match value.parse::<usize>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(CliError::InvalidValue {
            what: "--top",
            value: value.to_string(),
        }),
    }
}

fn parse_rank(rest: &[String]) -> Result<Command, CliError> {
    let mut formula = FormulaChoice::Default;
    let mut top = None;
    let mut iter = rest.iter();

    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--preset" | "--formula" => {
                if formula != FormulaChoice::Default {
                    return Err(CliError::ConflictingFormula);
                }
                let value = flag_value(&mut iter, "formula or preset value")?.clone();
                formula = if arg == "--preset" {
                    FormulaChoice::Preset(value)
                } else {
                    FormulaChoice::Custom(value)
                };
            }
            "--top" => top = Some(parse_top(flag_value(&mut iter, "--top value")?)?),
            other => return Err(CliError::UnexpectedArgument(other.to_string())),
        }
    }
    Ok(Command::Rank { formula, top })
}

fn parse_leaders(rest: &[String]) -> Result<Command, CliError> {
    let mut iter = rest.iter();
    let stats = iter.next().ok_or(CliError::MissingArgument("STAT"))?;
    let fields = stats
        .split(',')
        .filter(|s| !s.trim().is_empty())
        .map(|s| {
            StatField::from_name(s).ok_or_else(|| CliError::InvalidValue {
                what: "STAT",
                value: s.trim().to_string(),
            })
        })
        .collect::<Result<Vec<_>, _>>()?;
    if fields.is_empty() {
        return Err(CliError::MissingArgument("STAT"));
    }

    let mut top = None;
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--top" => top = Some(parse_top(flag_value(&mut iter, "--top value")?)?),
            other => return Err(CliError::UnexpectedArgument(other.to_string())),
        }
    }
    Ok(Command::Leaders { fields, top })
}

fn parse_indices(value: &str) -> Result<Vec<usize>, CliError> {
    value
        .split(',')
        .filter(|s| !s.trim().is_empty())
        .map(|s| {
            s.trim().parse::<usize>().map_err(|_| CliError::InvalidValue {
                what: "player index",
                value: s.trim().to_string(),
            })
        })
        .collect()
}

fn parse_trade(rest: &[String]) -> Result<Command, CliError> {
    let mut positional = Vec::new();
    let mut apply = false;
    let mut json = false;

    for arg in rest {
        match arg.as_str() {
            "--apply" => apply = true,
            "--json" => json = true,
            flag if flag.starts_with("--") => {
                return Err(CliError::UnexpectedArgument(flag.to_string()))
            }
            _ => positional.push(arg.as_str()),
        }
    }

    let [team_a, picks_a, team_b, picks_b] = positional.as_slice() else {
        return match positional.len() {
            0 => Err(CliError::MissingArgument("TEAM_A")),
            1 => Err(CliError::MissingArgument("TEAM_A indices")),
            2 => Err(CliError::MissingArgument("TEAM_B")),
            3 => Err(CliError::MissingArgument("TEAM_B indices")),
            _ => Err(CliError::UnexpectedArgument(positional[4].to_string())),
        };
    };

    Ok(Command::Trade {
        proposal: TradeProposal {
            team_a: team_a.to_uppercase(),
            picks_a: parse_indices(picks_a)?,
            team_b: team_b.to_uppercase(),
            picks_b: parse_indices(picks_b)?,
        },
        apply,
        json,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(line: &str) -> Result<Command, CliError> {
        parse_args(line.split_whitespace())
    }

    #[test]
    fn presets_command() {
        assert_eq!(parse("presets"), Ok(Command::Presets));
        assert_eq!(
            parse("presets extra"),
            Err(CliError::UnexpectedArgument("extra".into()))
        );
    }

    #[test]
    fn rank_variants() {
        assert_eq!(
            parse("rank"),
            Ok(Command::Rank {
                formula: FormulaChoice::Default,
                top: None
            })
        );
        assert_eq!(
            parse("rank --preset 2 --top 5"),
            Ok(Command::Rank {
                formula: FormulaChoice::Preset("2".into()),
                top: Some(5)
            })
        );
        assert_eq!(
            parse_args(["rank", "--formula", "points + assists - turnovers"]),
            Ok(Command::Rank {
                formula: FormulaChoice::Custom("points + assists - turnovers".into()),
                top: None
            })
        );
    }

    #[test]
    fn rank_rejects_conflicts_and_bad_top() {
        assert_eq!(
            parse("rank --preset 1 --formula pts"),
            Err(CliError::ConflictingFormula)
        );
        assert!(matches!(parse("rank --top 0"), Err(CliError::InvalidValue { .. })));
        assert!(matches!(parse("rank --top"), Err(CliError::MissingArgument(_))));
    }

    #[test]
    fn leaders_resolves_stat_names() {
        assert_eq!(
            parse("leaders TS% --top 3"),
            Ok(Command::Leaders {
                fields: vec![StatField::TrueShootingPct],
                top: Some(3)
            })
        );
        assert!(matches!(parse("leaders salary"), Err(CliError::InvalidValue { .. })));
        assert_eq!(parse("leaders"), Err(CliError::MissingArgument("STAT")));
        assert_eq!(parse("leaders ,"), Err(CliError::MissingArgument("STAT")));
    }

    #[test]
    fn leaders_accepts_several_stats() {
        assert_eq!(
            parse("leaders PTS,fg%,3P%,FT%"),
            Ok(Command::Leaders {
                fields: vec![
                    StatField::Points,
                    StatField::FieldGoalPct,
                    StatField::ThreePointPct,
                    StatField::FreeThrowPct,
                ],
                top: None
            })
        );
        assert_eq!(
            parse("leaders PTS,steals"),
            Err(CliError::InvalidValue {
                what: "STAT",
                value: "steals".into()
            })
        );
    }

    #[test]
    fn board_uppercases_team() {
        assert_eq!(parse("board den"), Ok(Command::Board { team: "DEN".into() }));
    }

    #[test]
    fn trade_parses_indices_and_flags() {
        assert_eq!(
            parse("trade bos 0 lal 0,1 --apply"),
            Ok(Command::Trade {
                proposal: TradeProposal {
                    team_a: "BOS".into(),
                    picks_a: vec![0],
                    team_b: "LAL".into(),
                    picks_b: vec![0, 1],
                },
                apply: true,
                json: false,
            })
        );
    }

    #[test]
    fn trade_errors() {
        assert_eq!(parse("trade BOS 0 LAL"), Err(CliError::MissingArgument("TEAM_B indices")));
        assert!(matches!(parse("trade BOS x LAL 1"), Err(CliError::InvalidValue { .. })));
        assert_eq!(
            parse("trade BOS 0 LAL 1 NYK"),
            Err(CliError::UnexpectedArgument("NYK".into()))
        );
        assert_eq!(
            parse("trade BOS 0 LAL 1 --force"),
            Err(CliError::UnexpectedArgument("--force".into()))
        );
    }

    #[test]
    fn unknown_and_missing_command() {
        assert_eq!(parse(""), Err(CliError::MissingCommand));
        assert_eq!(parse("draft"), Err(CliError::UnknownCommand("draft".into())));
    }
}
