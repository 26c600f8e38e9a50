//! In-memory fakes for testing the pipeline without network calls.

use super::{ChainError, ChainReader, PositionSource, SourceError};
use crate::domain::{Network, Position};
use alloy::primitives::{Address, U256};
use async_trait::async_trait;
use std::collections::HashMap;

/// Position source that returns predefined records, filtered by network.
#[derive(Debug, Clone, Default)]
pub struct MockPositionSource {
    positions: Vec<Position>,
}

impl MockPositionSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_position(mut self, position: Position) -> Self {
        self.positions.push(position);
        self
    }

    pub fn with_positions(mut self, positions: Vec<Position>) -> Self {
        self.positions.extend(positions);
        self
    }
}

#[async_trait]
impl PositionSource for MockPositionSource {
    async fn fetch_open_positions(&self, network: Network) -> Result<Vec<Position>, SourceError> {
        Ok(self
            .positions
            .iter()
            .filter(|p| p.network == network)
            .cloned()
            .collect())
    }
}

/// Chain reader serving values from in-memory tables. A token with no
/// configured value fails the call, like an RPC error would.
#[derive(Debug, Clone, Default)]
pub struct MockChainReader {
    funding_rates: HashMap<(Network, Address), U256>,
    min_prices: HashMap<(Network, Address), U256>,
    max_prices: HashMap<(Network, Address), U256>,
}

impl MockChainReader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_funding_rate(mut self, network: Network, token: Address, rate: U256) -> Self {
        self.funding_rates.insert((network, token), rate);
        self
    }

    pub fn with_prices(
        mut self,
        network: Network,
        token: Address,
        min: U256,
        max: U256,
    ) -> Self {
        self.min_prices.insert((network, token), min);
        self.max_prices.insert((network, token), max);
        self
    }

    fn get(
        map: &HashMap<(Network, Address), U256>,
        network: Network,
        token: Address,
        call: &'static str,
    ) -> Result<U256, ChainError> {
        map.get(&(network, token))
            .copied()
            .ok_or(ChainError::CallFailed {
                network,
                token,
                call,
                message: "no value configured".to_string(),
            })
    }
}

#[async_trait]
impl ChainReader for MockChainReader {
    async fn cumulative_funding_rate(
        &self,
        network: Network,
        token: Address,
    ) -> Result<U256, ChainError> {
        Self::get(&self.funding_rates, network, token, "cumulativeFundingRates")
    }

    async fn min_price(&self, network: Network, token: Address) -> Result<U256, ChainError> {
        Self::get(&self.min_prices, network, token, "getMinPrice")
    }

    async fn max_price(&self, network: Network, token: Address) -> Result<U256, ChainError> {
        Self::get(&self.max_prices, network, token, "getMaxPrice")
    }
}
