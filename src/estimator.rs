//! Reward/deposit estimation engine.
//!
//! Pure, deterministic, synchronous: given protocol constants, the
//! network-wide active stake, and a baker's own stake weight, computes the
//! binomial distribution of baking/endorsing selections over the horizon and
//! derives expected and confidence-bound deposits and rewards.
//!
//! Selection model: each block and each endorsement slot is an independent
//! Bernoulli trial with per-trial probability
//! `p = own_stake_weight / total_active_stake`, matching the protocol's
//! proportional-to-stake committee selection.

use tracing::debug;

use crate::stats;
use crate::types::{
    BakerInput, BucketEstimate, Estimate, EstimationResult, EstimatorError, ProtocolConstants,
};

/// Estimate selections, deposits, and rewards for one baker.
///
/// Total function with no side effects; identical inputs yield identical
/// results. Never substitutes defaults for invalid input.
pub fn estimate(
    constants: &ProtocolConstants,
    input: &BakerInput,
) -> Result<EstimationResult, EstimatorError> {
    validate(constants, input)?;

    let p = input.own_stake_weight / input.total_active_stake;
    if !(0.0..=1.0).contains(&p) {
        // own stake exceeding the network total means corrupt upstream data
        return Err(EstimatorError::Computation(format!(
            "selection probability {p} outside [0, 1]"
        )));
    }

    let block_trials = constants.blocks_per_cycle as u64 * input.cycles as u64;
    let endorsement_trials = block_trials * constants.endorsers_per_block as u64;

    debug!(
        p,
        block_trials, endorsement_trials, "selection model parameters"
    );

    let b_mean = stats::binomial_mean(block_trials, p);
    let b_max = stats::binomial_ppf(input.confidence, block_trials, p)?;
    let e_mean = stats::binomial_mean(endorsement_trials, p);
    let e_max = stats::binomial_ppf(input.confidence, endorsement_trials, p)?;

    let bakes = bucket(
        b_mean,
        b_max,
        constants.block_security_deposit,
        constants.full_block_reward(),
    );
    let endorsements = bucket(
        e_mean,
        e_max,
        constants.endorsement_security_deposit,
        constants.endorsement_reward_per_slot,
    );

    // totals sum the two buckets estimate-kind with estimate-kind
    let total = BucketEstimate {
        mean: sum(&bakes.mean, &endorsements.mean),
        max: sum(&bakes.max, &endorsements.max),
    };

    Ok(EstimationResult {
        total_active_stake: input.total_active_stake,
        cycles: input.cycles,
        confidence: input.confidence,
        bakes,
        endorsements,
        total,
    })
}

/// Derive both estimates for one bucket from its per-selection amounts.
fn bucket(mean_count: f64, max_count: f64, deposit_mutez: u64, reward_mutez: u64) -> BucketEstimate {
    let per_deposit = deposit_mutez as f64;
    let per_reward = reward_mutez as f64;
    BucketEstimate {
        mean: Estimate::from_mutez(mean_count, mean_count * per_deposit, mean_count * per_reward),
        max: Estimate::from_mutez(max_count, max_count * per_deposit, max_count * per_reward),
    }
}

fn sum(a: &Estimate, b: &Estimate) -> Estimate {
    Estimate {
        count: a.count + b.count,
        deposits: a.deposits + b.deposits,
        rewards: a.rewards + b.rewards,
    }
}

fn validate(constants: &ProtocolConstants, input: &BakerInput) -> Result<(), EstimatorError> {
    if constants.blocks_per_cycle == 0 {
        return Err(EstimatorError::InvalidInput(
            "blocks_per_cycle must be positive".into(),
        ));
    }
    if constants.endorsers_per_block == 0 {
        return Err(EstimatorError::InvalidInput(
            "endorsers_per_block must be positive".into(),
        ));
    }
    if !input.total_active_stake.is_finite() || input.total_active_stake <= 0.0 {
        return Err(EstimatorError::InvalidInput(format!(
            "total_active_stake must be positive, got {}",
            input.total_active_stake
        )));
    }
    if !input.own_stake_weight.is_finite() || input.own_stake_weight <= 0.0 {
        return Err(EstimatorError::InvalidInput(format!(
            "own_stake_weight must be positive, got {}",
            input.own_stake_weight
        )));
    }
    if input.cycles == 0 {
        return Err(EstimatorError::InvalidInput(
            "cycles must be positive".into(),
        ));
    }
    if !input.confidence.is_finite() || input.confidence <= 0.0 || input.confidence >= 1.0 {
        return Err(EstimatorError::InvalidInput(format!(
            "confidence must be in (0, 1), got {}",
            input.confidence
        )));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
