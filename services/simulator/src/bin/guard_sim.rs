//! Guard simulator
//!
//! `replay` runs a scenario file through a guard configured from TOML.
//! `probe` asks the pair oracle about live addresses over RPC, using the
//! factories registered in the same configuration.

use anyhow::{Context, Result};
use chain_reader::RpcChainReader;
use clap::{Parser, Subcommand};
use guard::{FactoryRegistry, PairOracle, PoolRejection};
use guard_config::{load_settings, GuardSettings};
use guard_simulator::telemetry::init_tracing;
use guard_simulator::{run_parallel, run_sequential, Outcome, ReplayReport, Scenario};
use std::path::PathBuf;
use tokio::runtime::Handle;
use tracing::{info, warn};
use types::{Address, ProtocolVersion};

#[derive(Parser, Debug)]
#[command(name = "guard_sim")]
#[command(about = "Directional transfer guard simulator")]
struct Args {
    /// Configuration file path
    #[arg(short, long, default_value = "config/guard.toml")]
    config: PathBuf,

    /// Environment (development, staging, production)
    #[arg(short, long)]
    environment: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Replay a scenario file
    Replay {
        /// Scenario JSON file
        #[arg(short, long)]
        scenario: PathBuf,

        /// Record through the shared ledger from concurrent workers
        #[arg(long)]
        parallel: bool,

        /// Worker tasks per epoch in parallel mode
        #[arg(long, default_value_t = 4)]
        workers: usize,

        /// Print the full report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Check whether live addresses are recognized pools
    Probe {
        /// Candidate addresses
        #[arg(required = true, value_parser = parse_address)]
        addresses: Vec<Address>,
    },
}

fn parse_address(s: &str) -> Result<Address, String> {
    s.trim_start_matches("0x")
        .parse::<Address>()
        .map_err(|e| format!("invalid address {s}: {e}"))
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let settings = load_settings(Some(&args.config), args.environment.as_deref())
        .with_context(|| format!("Failed to load {:?}", args.config))?;
    init_tracing(&settings.logging)?;

    info!(
        protected_token = ?settings.guard.protected_token,
        factories = settings.factories.len(),
        "guard_sim starting"
    );

    match args.command {
        Command::Replay {
            scenario,
            parallel,
            workers,
            json,
        } => {
            let scenario = Scenario::from_file(&scenario)?;
            let report = if parallel {
                run_parallel(&settings, scenario, workers).await?
            } else {
                run_sequential(&settings, &scenario)?
            };
            print_report(&report, json)?;
        }
        Command::Probe { addresses } => probe(settings, addresses).await?,
    }

    Ok(())
}

fn print_report(report: &ReplayReport, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(report)?);
        return Ok(());
    }

    for outcome in &report.outcomes {
        match &outcome.outcome {
            Outcome::Accepted => println!(
                "#{:<4} epoch {:<8} {:?} -> {:?}  accepted",
                outcome.index, outcome.epoch, outcome.from, outcome.to
            ),
            Outcome::Rejected { reason, .. } => println!(
                "#{:<4} epoch {:<8} {:?} -> {:?}  REJECTED: {}",
                outcome.index, outcome.epoch, outcome.from, outcome.to, reason
            ),
        }
    }
    println!("accepted: {}  rejected: {}", report.accepted, report.rejected);
    Ok(())
}

async fn probe(settings: GuardSettings, addresses: Vec<Address>) -> Result<()> {
    let mut factories = FactoryRegistry::new();
    for entry in &settings.factories {
        let version = ProtocolVersion::from_tag(entry.version);
        if !version.is_supported() {
            warn!(factory = ?entry.address, tag = entry.version, "skipping factory with unsupported version");
            continue;
        }
        factories.set(
            entry.address,
            guard::FactoryRecord {
                whitelisted: entry.whitelisted,
                version,
            },
        );
    }

    let reader = RpcChainReader::new(&settings.rpc, Handle::current())?;
    let oracle = PairOracle::new(reader, settings.oracle);

    // The RPC reader blocks on the runtime, so queries run off the async workers
    let results = tokio::task::spawn_blocking(move || {
        addresses
            .into_iter()
            .map(|candidate| (candidate, oracle.validate(candidate, &factories)))
            .collect::<Vec<_>>()
    })
    .await
    .context("Probe task panicked")?;

    for (candidate, result) in results {
        match result {
            Ok(pool) => println!(
                "{:?}: {} pool of factory {:?} ({:?}/{:?}{})",
                candidate,
                pool.version,
                pool.factory,
                pool.token0,
                pool.token1,
                pool.fee.map(|fee| format!(", fee {}", fee)).unwrap_or_default()
            ),
            Err(PoolRejection::NoCode) => println!("{:?}: not a contract", candidate),
            Err(rejection) => println!("{:?}: not a recognized pool ({})", candidate, rejection),
        }
    }
    Ok(())
}
