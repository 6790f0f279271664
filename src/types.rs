//! Shared types for the bakestimator.
//!
//! These types form the data model used across all modules: the protocol
//! constants supplied by a chain data provider, the baker's inputs, and the
//! estimation result handed to the report renderer. They are designed to be
//! stable so that the rpc, estimator, and report modules can depend on them
//! without circular references.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Smallest currency units (mutez) per tez.
pub const MUTEZ: f64 = 1_000_000.0;

/// Default confidence level for the "max" (quantile) estimates.
pub const DEFAULT_CONFIDENCE: f64 = 0.9;

// ---------------------------------------------------------------------------
// Protocol constants
// ---------------------------------------------------------------------------

/// Protocol constants relevant to reward/deposit estimation.
///
/// Externally supplied (a node's constants endpoint) and read-only. All
/// monetary amounts are in mutez.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProtocolConstants {
    /// Blocks in one baking cycle.
    pub blocks_per_cycle: u32,
    /// Endorsement slots per block.
    pub endorsers_per_block: u32,
    /// Deposit locked per baked block.
    pub block_security_deposit: u64,
    /// Deposit locked per endorsement performed.
    pub endorsement_security_deposit: u64,
    /// Reward credited to the block baker per endorsement slot included.
    pub baking_reward_per_endorsement: u64,
    /// Reward paid per endorsement a baker performs.
    pub endorsement_reward_per_slot: u64,
    /// Stake required for one unit of selection weight (one roll).
    pub minimal_stake: u64,
}

impl ProtocolConstants {
    /// Aggregated reward for baking one full block: every endorsement slot
    /// included credits `baking_reward_per_endorsement` to the baker.
    pub fn full_block_reward(&self) -> u64 {
        self.baking_reward_per_endorsement * self.endorsers_per_block as u64
    }

    /// Helper to build test constants (mainnet Florence-era values).
    #[cfg(test)]
    pub fn sample() -> Self {
        ProtocolConstants {
            blocks_per_cycle: 8192,
            endorsers_per_block: 32,
            block_security_deposit: 640_000_000,
            endorsement_security_deposit: 62_500_000,
            baking_reward_per_endorsement: 78_125,
            endorsement_reward_per_slot: 78_125,
            minimal_stake: 8_000_000_000,
        }
    }
}

// ---------------------------------------------------------------------------
// Baker input
// ---------------------------------------------------------------------------

/// Per-invocation estimation inputs gathered by the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BakerInput {
    /// Sum of stake weight across all eligible validators network-wide.
    pub total_active_stake: f64,
    /// The baker's own stake weight (e.g. number of rolls).
    pub own_stake_weight: f64,
    /// Estimation horizon in cycles.
    pub cycles: u32,
    /// Quantile level in (0, 1) for the "max" estimates.
    pub confidence: f64,
}

impl BakerInput {
    /// Build an input with the default confidence level.
    pub fn new(total_active_stake: f64, own_stake_weight: f64, cycles: u32) -> Self {
        BakerInput {
            total_active_stake,
            own_stake_weight,
            cycles,
            confidence: DEFAULT_CONFIDENCE,
        }
    }
}

// ---------------------------------------------------------------------------
// Estimation result
// ---------------------------------------------------------------------------

/// A single count/deposits/rewards triple. Monetary figures are in tez.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Estimate {
    /// Expected or quantile number of selections.
    pub count: f64,
    /// Deposits locked for those selections, in tez.
    pub deposits: f64,
    /// Rewards earned for those selections, in tez.
    pub rewards: f64,
}

impl Estimate {
    /// Build an estimate from a selection count and raw mutez amounts.
    pub fn from_mutez(count: f64, deposits_mutez: f64, rewards_mutez: f64) -> Self {
        Estimate {
            count,
            deposits: deposits_mutez / MUTEZ,
            rewards: rewards_mutez / MUTEZ,
        }
    }
}

impl fmt::Display for Estimate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "count={:.2} deposits={:.2} rewards={:.2}",
            self.count, self.deposits, self.rewards
        )
    }
}

/// Mean and confidence-bound estimates for one selection bucket.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct BucketEstimate {
    pub mean: Estimate,
    pub max: Estimate,
}

/// Output of one estimation run, constructed fresh per call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EstimationResult {
    /// Echo of the network-wide stake the probabilities were derived from.
    pub total_active_stake: f64,
    /// Echo of the estimation horizon.
    pub cycles: u32,
    /// Confidence level used for the `max` estimates.
    pub confidence: f64,
    /// Block-baking selections.
    pub bakes: BucketEstimate,
    /// Endorsement selections.
    pub endorsements: BucketEstimate,
    /// Sum of the two buckets, estimate kind with estimate kind.
    pub total: BucketEstimate,
}

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Domain-specific error types for the estimator.
#[derive(Debug, thiserror::Error)]
pub enum EstimatorError {
    /// A required numeric input is missing, non-numeric, zero, or negative
    /// where a positive value is required, or confidence is outside (0, 1).
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The binomial quantile routine received out-of-domain parameters.
    #[error("computation failed: {0}")]
    Computation(String),
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
