use std::{
    fs,
    path::{Path, PathBuf},
    process::ExitCode,
    time::{Duration, Instant},
};

use clap::Parser;
use minipy::{
    LimitedTracker, NoLimitTracker, ResourceLimits, ResourceTracker, Runner, StdPrint,
    scripts::{BUILTINS_TEST, BUILTINS_TEST_NAME},
};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Run a Python script with the minipy interpreter.
///
/// With no SCRIPT, runs the bundled builtins smoke test.
#[derive(Debug, Parser)]
#[command(name = "minipy", version, about)]
struct Cli {
    /// Path of the script to run.
    script: Option<PathBuf>,

    /// Run the script this many times and log the timing of each run.
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
    repeat: u32,

    /// Maximum number of heap allocations per run.
    #[arg(long)]
    max_allocations: Option<usize>,

    /// Maximum heap memory per run, in bytes.
    #[arg(long)]
    max_memory: Option<usize>,

    /// Wall-clock limit per run, in milliseconds.
    #[arg(long)]
    timeout_ms: Option<u64>,

    /// Print the final module globals as JSON after the run.
    #[arg(long)]
    json: bool,

    /// Enable debug logging (overridden by RUST_LOG).
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn limits(&self) -> Option<ResourceLimits> {
        if self.max_allocations.is_none() && self.max_memory.is_none() && self.timeout_ms.is_none() {
            return None;
        }
        let mut limits = ResourceLimits::new();
        if let Some(max) = self.max_allocations {
            limits = limits.max_allocations(max);
        }
        if let Some(max) = self.max_memory {
            limits = limits.max_memory(max);
        }
        if let Some(ms) = self.timeout_ms {
            limits = limits.max_duration(Duration::from_millis(ms));
        }
        Some(limits)
    }
}

fn init_logger(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .compact(),
        )
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logger(cli.verbose);

    let (code, script_name) = match &cli.script {
        Some(path) => match read_file(path) {
            Ok(code) => (code, path.display().to_string()),
            Err(err) => {
                eprintln!("error: {err}");
                return ExitCode::FAILURE;
            }
        },
        None => (BUILTINS_TEST.to_owned(), BUILTINS_TEST_NAME.to_owned()),
    };

    let runner = match Runner::new(code, &script_name) {
        Ok(runner) => runner,
        Err(err) => {
            eprintln!("{err}");
            return ExitCode::FAILURE;
        }
    };

    let limits = cli.limits();
    for iteration in 1..=cli.repeat {
        let start = Instant::now();
        let result = match &limits {
            Some(limits) => run_once(&runner, LimitedTracker::new(limits.clone()), cli.json),
            None => run_once(&runner, NoLimitTracker, cli.json),
        };
        let elapsed = start.elapsed();
        if let Err(err) = result {
            tracing::debug!(iteration, ?elapsed, "run failed");
            eprintln!("{err}");
            return ExitCode::FAILURE;
        }
        tracing::info!(iteration, ?elapsed, "run complete");
    }
    ExitCode::SUCCESS
}

fn run_once(runner: &Runner, tracker: impl ResourceTracker, json: bool) -> Result<(), String> {
    if json {
        let output = runner
            .run_with_globals(tracker, &mut StdPrint)
            .map_err(|err| err.to_string())?;
        let json = serde_json::to_string_pretty(&output.globals).map_err(|err| err.to_string())?;
        println!("{json}");
    } else {
        runner.run(tracker, &mut StdPrint).map_err(|err| err.to_string())?;
    }
    Ok(())
}

fn read_file(path: &Path) -> Result<String, String> {
    tracing::debug!(path = %path.display(), "reading script");
    match fs::metadata(path) {
        Ok(metadata) => {
            if !metadata.is_file() {
                return Err(format!("{} is not a file", path.display()));
            }
        }
        Err(err) => return Err(format!("reading {}: {err}", path.display())),
    }
    fs::read_to_string(path).map_err(|err| format!("reading {}: {err}", path.display()))
}
