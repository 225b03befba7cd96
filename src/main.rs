use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::{ArgAction, Parser, ValueEnum};
use obstacle_avoidance::driver::{self, FixedPolicy, Policy, RandomPolicy};
use obstacle_avoidance::{Action, Scenario, ScenarioConfig};
use tracing_subscriber::EnvFilter;

/// Pause between steps when running in real time, in s.
const REALTIME_PACE: f64 = 0.1;

#[derive(Parser)]
#[command(version, about = "Drives the obstacle avoidance scenario with a simple policy")]
struct Args {
    /// Scenario configuration file (JSON); defaults are used when omitted
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Number of episodes to run
    #[arg(short, long, default_value_t = 10)]
    episodes: usize,

    /// The policy used to choose actions
    #[arg(short, long, value_enum, default_value_t = PolicyKind::Straight)]
    policy: PolicyKind,

    /// Seed for the scenario and the random policy
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Sleep between steps so the run can be followed live
    #[arg(long)]
    realtime: bool,

    /// Write the per-episode rewards to this file (JSON)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Write the final world state of the last episode to this file (JSON)
    #[arg(long, value_name = "FILE")]
    snapshot: Option<PathBuf>,

    /// Verbosity (-v: debug, -vv: trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

#[derive(Clone, Copy, ValueEnum)]
enum PolicyKind {
    Straight,
    Left,
    Right,
    Random,
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose);
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn run(args: &Args) -> obstacle_avoidance::Result<()> {
    let config = match &args.config {
        Some(path) => ScenarioConfig::from_path(path)?,
        None => ScenarioConfig::default(),
    };
    let mut scenario = Scenario::new(config)?;
    scenario.seed(args.seed);

    let mut policy: Box<dyn Policy> = match args.policy {
        PolicyKind::Straight => Box::new(FixedPolicy(Action::STRAIGHT)),
        PolicyKind::Left => Box::new(FixedPolicy(Action::TURN_LEFT)),
        PolicyKind::Right => Box::new(FixedPolicy(Action::TURN_RIGHT)),
        PolicyKind::Random => Box::new(RandomPolicy::new(args.seed)),
    };
    let pace = args
        .realtime
        .then(|| Duration::from_secs_f64(REALTIME_PACE));

    let summaries = driver::run(&mut scenario, policy.as_mut(), args.episodes, pace)?;
    for summary in &summaries {
        println!(
            "The total reward for episode {} is: {:.3}",
            summary.episode, summary.total_reward
        );
    }

    if let Some(path) = &args.output {
        let file = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(file, &summaries)?;
    }
    if let Some(path) = &args.snapshot {
        let file = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(file, &scenario.snapshot())?;
    }
    Ok(())
}
