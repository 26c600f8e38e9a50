//! Open-position records and their enriched form.

use super::Network;
use alloy::primitives::{Address, I256, U256};

/// An open leveraged trade record from the position source.
///
/// All USD-denominated fields (`size`, `collateral`, `collateral_delta`,
/// `average_price`, `fee`, `realised_pnl`) are fixed-point integers at
/// [`PRICE_PRECISION`](super::PRICE_PRECISION) scale; `entry_funding_rate`
/// is at [`FUNDING_RATE_PRECISION`](super::FUNDING_RATE_PRECISION) scale.
/// The source only returns positions with `size >= MIN_POSITION_SIZE_USD`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Position {
    pub account: Address,
    pub network: Network,
    pub collateral_token: Address,
    pub index_token: Address,
    pub is_long: bool,
    pub size: U256,
    pub collateral: U256,
    pub collateral_delta: U256,
    pub average_price: U256,
    pub fee: U256,
    pub realised_pnl: I256,
    /// Cumulative funding rate recorded at the position's most recent update.
    pub entry_funding_rate: U256,
}

/// A position plus the quantities derived from live vault state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnrichedPosition {
    pub position: Position,
    /// Funding accrued since entry, at PRICE_PRECISION scale. Signed: an
    /// accumulator that moved backwards yields a negative fee.
    pub funding_fee: I256,
    /// Magnitude of unrealized PnL implied by price movement, at
    /// PRICE_PRECISION scale. The sign (profit vs loss) is not tracked.
    pub unrealized_delta: U256,
}
