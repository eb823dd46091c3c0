mod report;

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};
use chrono::Utc;
use clap::{Parser, Subcommand, ValueEnum};
use kubb_core::sim::{simulate_blast_session, simulate_practice_session};
use kubb_core::{GamePhase, MemoryStore, Session, SessionStore, StatsConfig, Thrower};
use log::info;
use pressure_thrower::PressureThrower;
use rand::rngs::StdRng;
use rand::SeedableRng;
use steady_thrower::SteadyThrower;

#[derive(Parser, Debug)]
#[command(name = "kubb-cli", about = "Simulate and analyse Kubb training sessions")]
struct Args {
    /// Log at debug level regardless of RUST_LOG.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// JSON file with statistics thresholds.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Play simulated sessions and print their statistics.
    Simulate {
        #[arg(long, value_enum, default_value_t = Mode::Practice)]
        mode: Mode,
        #[arg(long, default_value_t = 5)]
        sessions: u32,
        #[arg(long, value_enum, default_value_t = ThrowerKind::Steady)]
        thrower: ThrowerKind,
        #[arg(long, default_value_t = 0.6)]
        hit_rate: f64,
        /// Planned throws per practice session.
        #[arg(long, default_value_t = 30)]
        target: u32,
        #[arg(long, value_enum, default_value_t = PhaseArg::All)]
        phase: PhaseArg,
        /// Rounds per Inkast & Blast session.
        #[arg(long, default_value_t = 10)]
        rounds: u32,
        #[arg(long, default_value_t = 42)]
        seed: u64,
        /// Write the simulated sessions to this JSON file.
        #[arg(long)]
        export: Option<PathBuf>,
    },
    /// Print statistics for sessions previously exported to JSON.
    Report {
        #[arg(long)]
        input: PathBuf,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Mode {
    Practice,
    Blast,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ThrowerKind {
    Steady,
    Pressure,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum PhaseArg {
    Early,
    Mid,
    End,
    All,
}

impl From<PhaseArg> for GamePhase {
    fn from(phase: PhaseArg) -> Self {
        match phase {
            PhaseArg::Early => GamePhase::Early,
            PhaseArg::Mid => GamePhase::Mid,
            PhaseArg::End => GamePhase::End,
            PhaseArg::All => GamePhase::All,
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let config = match &args.config {
        Some(path) => load_config(path)?,
        None => StatsConfig::default(),
    };
    let store = MemoryStore::new();

    match args.command {
        Command::Simulate {
            mode,
            sessions,
            thrower,
            hit_rate,
            target,
            phase,
            rounds,
            seed,
            export,
        } => {
            let thrower: Box<dyn Thrower> = match thrower {
                ThrowerKind::Steady => Box::new(SteadyThrower::new(hit_rate)),
                ThrowerKind::Pressure => Box::new(PressureThrower::new(hit_rate)),
            };
            let mut rng = StdRng::seed_from_u64(seed);

            for n in 1..=sessions {
                let session: Session = match mode {
                    Mode::Practice => {
                        simulate_practice_session(thrower.as_ref(), target, &mut rng)?.into()
                    }
                    Mode::Blast => {
                        simulate_blast_session(thrower.as_ref(), phase.into(), rounds, &mut rng)?
                            .into()
                    }
                };
                info!("{} finished session {}/{}", thrower.name(), n, sessions);
                store.save(&session)?;
            }

            if let Some(path) = export {
                export_sessions(&store, &path)?;
            }
        }
        Command::Report { input } => {
            for session in import_sessions(&input)? {
                store.save(&session)?;
            }
        }
    }

    let today = Utc::now().date_naive();
    let mut history = store.load_all()?;
    for session in history.iter_mut() {
        if session.finalize_if_stale(today) {
            store.save(session)?;
        }
    }
    println!("{}", report::render(&history, today, &config));
    Ok(())
}

fn init_logging(verbose: bool) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    let _ = builder.try_init();
}

fn load_config(path: &Path) -> Result<StatsConfig> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    StatsConfig::from_json_str(&raw).with_context(|| format!("parsing config {}", path.display()))
}

fn export_sessions(store: &MemoryStore, path: &Path) -> Result<()> {
    let sessions = store.load_all()?;
    let json = serde_json::to_string_pretty(&sessions)?;
    fs::write(path, json).with_context(|| format!("writing {}", path.display()))?;
    info!("exported {} sessions to {}", sessions.len(), path.display());
    Ok(())
}

fn import_sessions(path: &Path) -> Result<Vec<Session>> {
    let raw = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let sessions: Vec<Session> =
        serde_json::from_str(&raw).with_context(|| format!("parsing {}", path.display()))?;
    Ok(sessions)
}
