//! Domain types for the snapshot pipeline.
//!
//! This module provides:
//! - Fixed-point scale constants matching the on-chain contracts
//! - The Network enum naming the two deployments
//! - Strongly-typed open-position records and their enriched form

pub mod position;
pub mod primitives;

pub use position::{EnrichedPosition, Position};
pub use primitives::{Network, FUNDING_RATE_PRECISION, MIN_POSITION_SIZE_USD, PRICE_PRECISION};
