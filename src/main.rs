//! bakestimator — CLI entry point.
//!
//! Resolves the node RPC endpoint from the command line and optional TOML
//! configuration, fetches the protocol constants and total voting power,
//! runs the estimation engine once, and prints the report. Any failure —
//! unreachable node, unusable payload, invalid input — surfaces as a
//! readable message and a non-zero exit; the engine is never invoked with
//! partially-fetched data.

use anyhow::{bail, Result};
use clap::Parser;
use tracing::info;

use bakestimator::config::AppConfig;
use bakestimator::estimator;
use bakestimator::report;
use bakestimator::rpc::{self, ChainDataProvider, NodeRpcClient};
use bakestimator::types::{BakerInput, DEFAULT_CONFIDENCE, MUTEZ};

#[derive(Parser, Debug)]
#[clap(
    version,
    about = "Estimate expected baking/endorsing rewards and deposits for a Tezos baker"
)]
struct Args {
    /// Calculate estimates for this number of cycles. Defaults to the
    /// selected network's preserved_cycles.
    #[clap(short, long)]
    cycles: Option<u32>,

    /// Number of rolls of tez used for baking.
    #[clap(short, long, default_value_t = 1)]
    rolls: u32,

    /// Confidence level in (0, 1) for the max estimates.
    #[clap(long)]
    confidence: Option<f64>,

    /// Name of the Tezos network to query.
    #[clap(short, long)]
    network: Option<String>,

    /// Custom URL for the node RPC, overrides one derived from --network.
    #[clap(long)]
    rpc: Option<String>,

    /// Path to an optional TOML configuration file.
    #[clap(long, default_value = "bakestimator.toml")]
    config: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    init_logging();

    let args = Args::parse();
    let cfg = AppConfig::load_optional(&args.config)?.unwrap_or_default();

    let network = args
        .network
        .or(cfg.network.clone())
        .unwrap_or_else(|| "main".to_string());
    let confidence = args
        .confidence
        .or(cfg.confidence)
        .unwrap_or(DEFAULT_CONFIDENCE);

    let rpc_url = match args
        .rpc
        .as_deref()
        .or_else(|| cfg.rpc_url(&network))
        .or_else(|| rpc::network_rpc_url(&network))
    {
        Some(url) => url.to_string(),
        None => bail!(
            "Unknown network {network:?}; known networks: {}",
            rpc::network_names().join(", ")
        ),
    };

    info!(%network, %rpc_url, "Querying node");
    let client = NodeRpcClient::new(&rpc_url)?;

    let snapshot = client.fetch_constants().await?;
    let total_active_stake = client.fetch_total_active_stake().await?;

    let cycles = args.cycles.unwrap_or(snapshot.preserved_cycles);

    println!("preserved cycles: {}", snapshot.preserved_cycles);
    println!(
        "roll size: {}",
        snapshot.constants.minimal_stake as f64 / MUTEZ
    );
    println!();

    let input = BakerInput {
        total_active_stake,
        own_stake_weight: args.rolls as f64,
        cycles,
        confidence,
    };
    let result = estimator::estimate(&snapshot.constants, &input)?;

    println!("{}", report::text(&result));
    Ok(())
}

fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("bakestimator=warn"));

    fmt().with_env_filter(env_filter).with_target(true).init();
}
