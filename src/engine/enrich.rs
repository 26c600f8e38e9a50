//! Per-position enrichment: funding accrual and mark-to-market delta.
//!
//! Both formulas mirror the vault's fixed-point integer arithmetic:
//! exact 256-bit values, truncating division, no floating point anywhere.

use super::tables::ChainTables;
use crate::domain::{EnrichedPosition, Network, Position, FUNDING_RATE_PRECISION};
use alloy::primitives::{Address, I256, U256};
use thiserror::Error;

/// Error type for the enrichment stage.
///
/// A missing table entry is fatal for the whole run: it means the chain-read
/// stage did not cover every token actually referenced by a position, and a
/// silent default would corrupt the report.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EnrichError {
    #[error("no cumulative funding rate for {token} on {network}")]
    MissingFundingRate { network: Network, token: Address },
    #[error("no mark price for {token} on {network}")]
    MissingPrice { network: Network, token: Address },
    #[error("arithmetic overflow computing {0}")]
    Overflow(&'static str),
}

/// Funding accrued by a position since entry, at PRICE_PRECISION scale.
///
/// `size * (cumulative_rate - entry_funding_rate) / FUNDING_RATE_PRECISION`,
/// truncating toward zero. The rate delta is signed: an accumulator that
/// somehow decreased yields a negative fee rather than an error.
pub fn funding_fee(
    size: U256,
    entry_funding_rate: U256,
    cumulative_rate: U256,
) -> Result<I256, EnrichError> {
    if size.is_zero() {
        return Ok(I256::ZERO);
    }

    let rate_delta = signed(cumulative_rate)?
        .checked_sub(signed(entry_funding_rate)?)
        .ok_or(EnrichError::Overflow("funding rate delta"))?;
    if rate_delta.is_zero() {
        return Ok(I256::ZERO);
    }

    signed(size)?
        .checked_mul(rate_delta)
        .ok_or(EnrichError::Overflow("funding fee"))?
        .checked_div(signed(FUNDING_RATE_PRECISION)?)
        .ok_or(EnrichError::Overflow("funding fee"))
}

/// Unsigned magnitude of the unrealized PnL implied by price movement, at
/// PRICE_PRECISION scale.
///
/// Longs mark against the bid-side `min_price`, shorts against the ask-side
/// `max_price` (the conservative side for the exchange). A zero average
/// price marks a degenerate placeholder entry and contributes nothing.
pub fn unrealized_delta(
    size: U256,
    average_price: U256,
    is_long: bool,
    min_price: U256,
    max_price: U256,
) -> Result<U256, EnrichError> {
    if average_price.is_zero() {
        return Ok(U256::ZERO);
    }

    let price = if is_long { min_price } else { max_price };
    let price_delta = if average_price > price {
        average_price - price
    } else {
        price - average_price
    };

    let scaled = size
        .checked_mul(price_delta)
        .ok_or(EnrichError::Overflow("unrealized delta"))?;
    Ok(scaled / average_price)
}

/// Enrich one position from its network's lookup tables.
pub fn enrich_position(
    position: Position,
    tables: &ChainTables,
) -> Result<EnrichedPosition, EnrichError> {
    let network_tables = tables.for_network(position.network);

    let cumulative_rate = network_tables
        .funding_rate(&position.collateral_token)
        .ok_or(EnrichError::MissingFundingRate {
            network: position.network,
            token: position.collateral_token,
        })?;
    let min_price =
        network_tables
            .min_price(&position.index_token)
            .ok_or(EnrichError::MissingPrice {
                network: position.network,
                token: position.index_token,
            })?;
    let max_price =
        network_tables
            .max_price(&position.index_token)
            .ok_or(EnrichError::MissingPrice {
                network: position.network,
                token: position.index_token,
            })?;

    let funding_fee = funding_fee(position.size, position.entry_funding_rate, cumulative_rate)?;
    let unrealized_delta = unrealized_delta(
        position.size,
        position.average_price,
        position.is_long,
        min_price,
        max_price,
    )?;

    Ok(EnrichedPosition {
        position,
        funding_fee,
        unrealized_delta,
    })
}

fn signed(value: U256) -> Result<I256, EnrichError> {
    I256::try_from(value).map_err(|_| EnrichError::Overflow("signed conversion"))
}
