//! bakestimator — expected baking/endorsing reward and deposit estimator
//! for Tezos bakers.
//!
//! Library crate exposing all modules for use by integration tests
//! and the binary entry point. The core is [`estimator::estimate`]: a pure
//! function from protocol constants and a baker's stake to the expected and
//! confidence-bound selection counts, deposits, and rewards.

pub mod config;
pub mod types;
pub mod stats;
pub mod estimator;
pub mod report;
pub mod rpc;
