use clap::{Parser, Subcommand};
use scintsim_core::{run_simulation, JsonLinesWriter, RunConfig};
use std::fs;
use std::io::BufWriter;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "scintsim")]
#[command(about = "Segmented scintillator detector simulation", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Simulate a run and write the event ntuple
    Run {
        /// Path to a JSON run configuration
        #[arg(long)]
        config: Option<PathBuf>,
        /// Number of events (overrides the config file)
        #[arg(long)]
        events: Option<u32>,
        /// Run seed (overrides the config file)
        #[arg(long)]
        seed: Option<u64>,
        /// Worker threads, 0 = automatic (overrides the config file)
        #[arg(long)]
        threads: Option<usize>,
        /// Output ntuple file (JSON lines)
        #[arg(long, default_value = "scintsim.ntuple.jsonl")]
        output: PathBuf,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            config,
            events,
            seed,
            threads,
            output,
        } => match run(config, events, seed, threads, output) {
            Ok(()) => {}
            Err(e) => {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        },
    }
}

fn run(
    config: Option<PathBuf>,
    events: Option<u32>,
    seed: Option<u64>,
    threads: Option<usize>,
    output: PathBuf,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut run_config: RunConfig = match config {
        Some(path) => serde_json::from_str(&fs::read_to_string(path)?)?,
        None => RunConfig::default(),
    };
    if let Some(events) = events {
        run_config.events = events;
    }
    if let Some(seed) = seed {
        run_config.seed = seed;
    }
    if let Some(threads) = threads {
        run_config.threads = threads;
    }

    let file = fs::File::create(&output)?;
    let mut writer = JsonLinesWriter::new(BufWriter::new(file));
    let summary = run_simulation(&run_config, &mut writer)?;

    println!(
        "{} events, {} scored steps, {:.3} MeV deposited -> {}",
        summary.events,
        summary.steps,
        summary.total_edep,
        output.display()
    );

    Ok(())
}
