//! Per-network lookup tables of live vault state.
//!
//! Built once per run, before enrichment, from one read per distinct token.
//! Tables are network-scoped, so the same token address on both deployments
//! never collides.

use crate::domain::Network;
use alloy::primitives::{Address, U256};
use std::collections::HashMap;

/// Vault state for one network: cumulative funding rates keyed by collateral
/// token, min/max mark prices keyed by index token.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NetworkTables {
    funding_rates: HashMap<Address, U256>,
    min_prices: HashMap<Address, U256>,
    max_prices: HashMap<Address, U256>,
}

impl NetworkTables {
    pub fn insert_funding_rate(&mut self, token: Address, rate: U256) {
        self.funding_rates.insert(token, rate);
    }

    pub fn insert_prices(&mut self, token: Address, min: U256, max: U256) {
        self.min_prices.insert(token, min);
        self.max_prices.insert(token, max);
    }

    pub fn funding_rate(&self, token: &Address) -> Option<U256> {
        self.funding_rates.get(token).copied()
    }

    pub fn min_price(&self, token: &Address) -> Option<U256> {
        self.min_prices.get(token).copied()
    }

    pub fn max_price(&self, token: &Address) -> Option<U256> {
        self.max_prices.get(token).copied()
    }
}

/// Both networks' tables.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChainTables {
    arbitrum: NetworkTables,
    avalanche: NetworkTables,
}

impl ChainTables {
    pub fn for_network(&self, network: Network) -> &NetworkTables {
        match network {
            Network::Arbitrum => &self.arbitrum,
            Network::Avalanche => &self.avalanche,
        }
    }

    pub fn for_network_mut(&mut self, network: Network) -> &mut NetworkTables {
        match network {
            Network::Arbitrum => &mut self.arbitrum,
            Network::Avalanche => &mut self.avalanche,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_lookup() {
        let mut tables = NetworkTables::default();
        let token = Address::repeat_byte(0x01);

        tables.insert_funding_rate(token, U256::from(500u64));
        tables.insert_prices(token, U256::from(90u64), U256::from(110u64));

        assert_eq!(tables.funding_rate(&token), Some(U256::from(500u64)));
        assert_eq!(tables.min_price(&token), Some(U256::from(90u64)));
        assert_eq!(tables.max_price(&token), Some(U256::from(110u64)));
    }

    #[test]
    fn test_missing_token_yields_none() {
        let tables = NetworkTables::default();
        let token = Address::repeat_byte(0x02);
        assert_eq!(tables.funding_rate(&token), None);
        assert_eq!(tables.min_price(&token), None);
        assert_eq!(tables.max_price(&token), None);
    }

    #[test]
    fn test_networks_do_not_share_entries() {
        let mut tables = ChainTables::default();
        let token = Address::repeat_byte(0x03);

        tables
            .for_network_mut(Network::Arbitrum)
            .insert_funding_rate(token, U256::from(7u64));

        assert_eq!(
            tables.for_network(Network::Arbitrum).funding_rate(&token),
            Some(U256::from(7u64))
        );
        assert_eq!(
            tables.for_network(Network::Avalanche).funding_rate(&token),
            None
        );
    }
}
