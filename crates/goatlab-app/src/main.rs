// GOAT LAB entry point.
//
// Startup sequence:
// 1. Initialize tracing (log to file, console is for results)
// 2. Parse command-line arguments
// 3. Load config
// 4. Load the stats CSV and compute PIP values
// 5. Run the command and print its output

use goatlab_app::cli::{self, Command, FormulaChoice};
use goatlab_app::config;
use goatlab_app::report;
use goatlab_app::session::Session;
use goatlab_basketball::presets::{choose_preset, PRESETS};

use anyhow::Context;
use tracing::{error, info};

fn main() -> anyhow::Result<()> {
    // 1. Initialize tracing
    init_tracing()?;
    info!("GOAT LAB starting up");

    // 2. Parse arguments
    let command = match cli::parse_args(std::env::args().skip(1)) {
        Ok(command) => command,
        Err(e) => {
            eprintln!("{e}\n\n{}", cli::USAGE);
            std::process::exit(2);
        }
    };

    if command == Command::Presets {
        print!("{}", report::presets(&PRESETS));
        return Ok(());
    }

    // 3. Load config
    let config = config::load_config().context("failed to load configuration")?;
    info!(
        "Config loaded: stats={}, min_points={}, threshold={}",
        config.data.stats_csv, config.data.min_points, config.trade.fairness_threshold
    );

    // 4. Load roster and compute valuations
    let cwd = std::env::current_dir().context("failed to resolve working directory")?;
    let mut session = Session::load(config, &cwd).context("failed to load player stats")?;

    // 5. Run the command
    if let Err(e) = run(&mut session, command) {
        error!("command failed: {:#}", e);
        return Err(e);
    }

    info!("GOAT LAB finished");
    Ok(())
}

fn run(session: &mut Session, command: Command) -> anyhow::Result<()> {
    match command {
        Command::Presets => print!("{}", report::presets(&PRESETS)),
        Command::Rank { formula, top } => {
            let (title, formula) = match formula {
                FormulaChoice::Default => {
                    let preset = choose_preset(&session.config().ranking.default_preset);
                    (format!("GOAT LAB Rating (preset {})", preset.key), preset.formula.to_string())
                }
                FormulaChoice::Preset(key) => {
                    let preset = choose_preset(&key);
                    (format!("GOAT LAB Rating (preset {})", preset.key), preset.formula.to_string())
                }
                FormulaChoice::Custom(text) => ("GOAT LAB Rating (custom)".to_string(), text),
            };
            let ranked = session.rank(&formula, top).context("formula could not be evaluated")?;
            print!("{}", report::ranking(&title, &ranked));
        }
        Command::Leaders { fields, top } => {
            let boards: Vec<String> = fields
                .into_iter()
                .map(|field| report::leaders(&session.leaders(field, top)))
                .collect();
            print!("{}", boards.join("\n"));
        }
        Command::Board { team } => {
            let board = session.board(&team)?;
            print!("{}", report::board(&team, &board));
        }
        Command::Trade { proposal, apply, json } => {
            let outcome = session.propose_trade(&proposal)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&outcome)?);
            } else {
                print!("{}", report::trade(&outcome));
            }
            if apply && session.commit(outcome) {
                for team in [&proposal.team_a, &proposal.team_b] {
                    print!("\n{}", report::board(team, &session.board(team)?));
                }
            }
        }
    }
    Ok(())
}

/// Initialize tracing to log to a file (stdout carries command output).
fn init_tracing() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let log_dir = std::env::current_dir()?.join("logs");
    std::fs::create_dir_all(&log_dir)?;

    let log_file = std::fs::File::create(log_dir.join("goatlab.log"))?;

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("goatlab=info,warn")),
        )
        .with_writer(log_file)
        .with_ansi(false)
        .with_target(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    Ok(())
}
