//! Tezos node RPC chain data provider.
//!
//! Supplies the two pieces of external data the estimator consumes: the
//! protocol constants and the network-wide total voting power. The node
//! returns large amounts as JSON strings (and the reward constants as string
//! arrays where the first element applies), so the raw payload is converted
//! into the numeric [`ProtocolConstants`] before it reaches the engine —
//! missing or non-numeric fields are rejected here, never defaulted.
//!
//! Constants endpoint:    `chains/main/blocks/head/context/constants`
//! Voting power endpoint: `chains/main/blocks/head/votes/total_voting_power`

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, info};

use crate::types::{EstimatorError, ProtocolConstants};

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

const RPC_CONSTANTS: &str = "chains/main/blocks/head/context/constants";
const RPC_TOTAL_VOTING_POWER: &str = "chains/main/blocks/head/votes/total_voting_power";

/// Known public RPC endpoints by network name.
const NETWORKS: &[(&str, &str)] = &[
    ("main", "https://mainnet-tezos.giganode.io"),
    ("florence", "https://florence-tezos.giganode.io"),
];

/// Resolve a network name to its default RPC URL.
pub fn network_rpc_url(name: &str) -> Option<&'static str> {
    NETWORKS
        .iter()
        .find(|(n, _)| *n == name)
        .map(|(_, url)| *url)
}

/// Names of the known networks, for CLI help and error messages.
pub fn network_names() -> Vec<&'static str> {
    NETWORKS.iter().map(|(n, _)| *n).collect()
}

// ---------------------------------------------------------------------------
// Provider trait
// ---------------------------------------------------------------------------

/// Protocol constants plus the cycle metadata the CLI needs around them.
#[derive(Debug, Clone)]
pub struct ConstantsSnapshot {
    pub constants: ProtocolConstants,
    /// Number of cycles validator rights are computed ahead for; the default
    /// estimation horizon.
    pub preserved_cycles: u32,
}

/// Abstraction over the source of chain data.
///
/// The estimator itself never fetches anything; callers obtain a snapshot
/// through this trait and hand plain values to the engine. Tests substitute
/// a deterministic in-memory implementation.
#[async_trait]
pub trait ChainDataProvider: Send + Sync {
    /// Fetch the protocol constants at the current head.
    async fn fetch_constants(&self) -> Result<ConstantsSnapshot>;

    /// Fetch the network-wide total voting power (stake weight units).
    async fn fetch_total_active_stake(&self) -> Result<f64>;

    /// Provider name for logging and identification.
    fn name(&self) -> &str;
}

// ---------------------------------------------------------------------------
// Raw RPC payloads (node JSON → Rust)
// ---------------------------------------------------------------------------

/// The constants document as the node serves it. We only deserialize the
/// fields we need; amounts arrive as strings.
#[derive(Debug, Deserialize)]
struct RawConstants {
    #[serde(default)]
    blocks_per_cycle: Option<u32>,
    #[serde(default)]
    endorsers_per_block: Option<u32>,
    #[serde(default)]
    preserved_cycles: Option<u32>,
    #[serde(default)]
    block_security_deposit: Option<String>,
    #[serde(default)]
    endorsement_security_deposit: Option<String>,
    /// Per-included-endorsement baking reward; first element applies to
    /// blocks baked at priority zero.
    #[serde(default)]
    baking_reward_per_endorsement: Option<Vec<String>>,
    /// Per-slot endorsement reward; first element applies at priority zero.
    #[serde(default)]
    endorsement_reward: Option<Vec<String>>,
    #[serde(default)]
    tokens_per_roll: Option<String>,
}

impl RawConstants {
    fn into_snapshot(self) -> Result<ConstantsSnapshot, EstimatorError> {
        let constants = ProtocolConstants {
            blocks_per_cycle: require("blocks_per_cycle", self.blocks_per_cycle)?,
            endorsers_per_block: require("endorsers_per_block", self.endorsers_per_block)?,
            block_security_deposit: parse_amount(
                "block_security_deposit",
                self.block_security_deposit.as_deref(),
            )?,
            endorsement_security_deposit: parse_amount(
                "endorsement_security_deposit",
                self.endorsement_security_deposit.as_deref(),
            )?,
            baking_reward_per_endorsement: first_amount(
                "baking_reward_per_endorsement",
                self.baking_reward_per_endorsement.as_deref(),
            )?,
            endorsement_reward_per_slot: first_amount(
                "endorsement_reward",
                self.endorsement_reward.as_deref(),
            )?,
            minimal_stake: parse_amount("tokens_per_roll", self.tokens_per_roll.as_deref())?,
        };
        Ok(ConstantsSnapshot {
            constants,
            preserved_cycles: require("preserved_cycles", self.preserved_cycles)?,
        })
    }
}

fn require<T>(field: &str, value: Option<T>) -> Result<T, EstimatorError> {
    value.ok_or_else(|| EstimatorError::InvalidInput(format!("constant {field} is missing")))
}

fn parse_amount(field: &str, value: Option<&str>) -> Result<u64, EstimatorError> {
    let raw = require(field, value)?;
    raw.parse().map_err(|_| {
        EstimatorError::InvalidInput(format!("constant {field} is not numeric: {raw:?}"))
    })
}

fn first_amount(field: &str, values: Option<&[String]>) -> Result<u64, EstimatorError> {
    let list = require(field, values)?;
    let first = list
        .first()
        .ok_or_else(|| EstimatorError::InvalidInput(format!("constant {field} is empty")))?;
    first.parse().map_err(|_| {
        EstimatorError::InvalidInput(format!("constant {field} is not numeric: {first:?}"))
    })
}

/// The voting power endpoint returns a bare number on older protocols and a
/// quoted string on newer ones.
fn coerce_voting_power(value: &serde_json::Value) -> Result<f64, EstimatorError> {
    match value {
        serde_json::Value::Number(n) => n.as_f64().ok_or_else(|| {
            EstimatorError::InvalidInput(format!("total voting power is not numeric: {n}"))
        }),
        serde_json::Value::String(s) => s.parse().map_err(|_| {
            EstimatorError::InvalidInput(format!("total voting power is not numeric: {s:?}"))
        }),
        other => Err(EstimatorError::InvalidInput(format!(
            "total voting power has unexpected shape: {other}"
        ))),
    }
}

// ---------------------------------------------------------------------------
// Node client
// ---------------------------------------------------------------------------

/// HTTP client for a single Tezos node RPC endpoint.
pub struct NodeRpcClient {
    http: Client,
    base_url: String,
}

impl NodeRpcClient {
    pub fn new(base_url: &str) -> Result<Self> {
        let http = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .user_agent("bakestimator/0.1.0")
            .build()
            .context("Failed to build HTTP client for node RPC")?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = format!("{}/{}", self.base_url, path);
        debug!(%url, "node RPC request");
        let response = self
            .http
            .get(&url)
            .send()
            .await
            .with_context(|| format!("Request to {url} failed"))?
            .error_for_status()
            .with_context(|| format!("Node RPC {url} returned an error status"))?;
        response
            .json()
            .await
            .with_context(|| format!("Malformed JSON from {url}"))
    }
}

#[async_trait]
impl ChainDataProvider for NodeRpcClient {
    async fn fetch_constants(&self) -> Result<ConstantsSnapshot> {
        let raw: RawConstants = self.get_json(RPC_CONSTANTS).await?;
        let snapshot = raw
            .into_snapshot()
            .context("Constants payload unusable for estimation")?;
        info!(
            blocks_per_cycle = snapshot.constants.blocks_per_cycle,
            endorsers_per_block = snapshot.constants.endorsers_per_block,
            preserved_cycles = snapshot.preserved_cycles,
            "Fetched protocol constants"
        );
        Ok(snapshot)
    }

    async fn fetch_total_active_stake(&self) -> Result<f64> {
        let value: serde_json::Value = self.get_json(RPC_TOTAL_VOTING_POWER).await?;
        let total = coerce_voting_power(&value).context("Voting power payload unusable")?;
        info!(total_active_stake = total, "Fetched total voting power");
        Ok(total)
    }

    fn name(&self) -> &str {
        "node-rpc"
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn raw_constants() -> serde_json::Value {
        json!({
            "blocks_per_cycle": 8192,
            "endorsers_per_block": 32,
            "preserved_cycles": 5,
            "block_security_deposit": "640000000",
            "endorsement_security_deposit": "62500000",
            "baking_reward_per_endorsement": ["78125", "11719"],
            "endorsement_reward": ["78125", "52083"],
            "tokens_per_roll": "8000000000",
            // fields the node also serves but we ignore
            "hard_gas_limit_per_operation": "1040000",
            "quorum_min": 2000
        })
    }

    #[test]
    fn test_constants_conversion() {
        let raw: RawConstants = serde_json::from_value(raw_constants()).unwrap();
        let snapshot = raw.into_snapshot().unwrap();
        assert_eq!(snapshot.preserved_cycles, 5);
        assert_eq!(snapshot.constants.blocks_per_cycle, 8192);
        assert_eq!(snapshot.constants.block_security_deposit, 640_000_000);
        // first element of the reward arrays applies
        assert_eq!(snapshot.constants.baking_reward_per_endorsement, 78_125);
        assert_eq!(snapshot.constants.endorsement_reward_per_slot, 78_125);
        assert_eq!(snapshot.constants.minimal_stake, 8_000_000_000);
    }

    #[test]
    fn test_missing_constant_is_invalid_input() {
        let mut doc = raw_constants();
        doc.as_object_mut().unwrap().remove("block_security_deposit");
        let raw: RawConstants = serde_json::from_value(doc).unwrap();
        let err = raw.into_snapshot().unwrap_err();
        assert!(matches!(err, EstimatorError::InvalidInput(_)));
        assert!(format!("{err}").contains("block_security_deposit"));
    }

    #[test]
    fn test_non_numeric_constant_is_invalid_input() {
        let mut doc = raw_constants();
        doc["endorsement_security_deposit"] = json!("not-a-number");
        let raw: RawConstants = serde_json::from_value(doc).unwrap();
        assert!(matches!(
            raw.into_snapshot(),
            Err(EstimatorError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_empty_reward_array_is_invalid_input() {
        let mut doc = raw_constants();
        doc["baking_reward_per_endorsement"] = json!([]);
        let raw: RawConstants = serde_json::from_value(doc).unwrap();
        assert!(matches!(
            raw.into_snapshot(),
            Err(EstimatorError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_voting_power_coercion() {
        assert_eq!(coerce_voting_power(&json!(85000)).unwrap(), 85_000.0);
        assert_eq!(coerce_voting_power(&json!("85000")).unwrap(), 85_000.0);
        assert!(coerce_voting_power(&json!(["85000"])).is_err());
        assert!(coerce_voting_power(&json!("many")).is_err());
    }

    #[test]
    fn test_network_table() {
        assert_eq!(
            network_rpc_url("main"),
            Some("https://mainnet-tezos.giganode.io")
        );
        assert!(network_rpc_url("granada").is_none());
        assert!(network_names().contains(&"florence"));
    }
}
