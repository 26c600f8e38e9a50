use alloy::primitives::{address, Address};
use std::collections::HashMap;
use thiserror::Error;

const DEFAULT_SUBGRAPH_URL_ARBITRUM: &str =
    "https://api.thegraph.com/subgraphs/name/nissoh/gmx-arbitrum";
const DEFAULT_SUBGRAPH_URL_AVALANCHE: &str =
    "https://api.thegraph.com/subgraphs/name/nissoh/gmx-avalanche";
const DEFAULT_RPC_URL_ARBITRUM: &str = "https://arb1.arbitrum.io/rpc";
const DEFAULT_RPC_URL_AVALANCHE: &str = "https://rpc.ankr.com/avalanche";
const DEFAULT_VAULT_ARBITRUM: Address = address!("489ee077994b6658eafa855c308275ead8097c4a");
const DEFAULT_VAULT_AVALANCHE: Address = address!("9ab2de34a33fb459b538c43f251eb825645e8595");

/// Endpoints and contract addresses for both deployments.
#[derive(Debug, Clone)]
pub struct Config {
    pub subgraph_url_arbitrum: String,
    pub subgraph_url_avalanche: String,
    pub rpc_url_arbitrum: String,
    pub rpc_url_avalanche: String,
    pub vault_address_arbitrum: Address,
    pub vault_address_avalanche: Address,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

impl Config {
    /// Production endpoints for both networks.
    pub fn defaults() -> Self {
        Self {
            subgraph_url_arbitrum: DEFAULT_SUBGRAPH_URL_ARBITRUM.to_string(),
            subgraph_url_avalanche: DEFAULT_SUBGRAPH_URL_AVALANCHE.to_string(),
            rpc_url_arbitrum: DEFAULT_RPC_URL_ARBITRUM.to_string(),
            rpc_url_avalanche: DEFAULT_RPC_URL_AVALANCHE.to_string(),
            vault_address_arbitrum: DEFAULT_VAULT_ARBITRUM,
            vault_address_avalanche: DEFAULT_VAULT_AVALANCHE,
        }
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_env_map(std::env::vars().collect())
    }

    pub fn from_env_map(env_map: HashMap<String, String>) -> Result<Self, ConfigError> {
        let mut config = Self::defaults();

        if let Some(url) = env_map.get("SUBGRAPH_URL_ARBITRUM") {
            config.subgraph_url_arbitrum = url.clone();
        }
        if let Some(url) = env_map.get("SUBGRAPH_URL_AVALANCHE") {
            config.subgraph_url_avalanche = url.clone();
        }
        if let Some(url) = env_map.get("RPC_URL_ARBITRUM") {
            config.rpc_url_arbitrum = url.clone();
        }
        if let Some(url) = env_map.get("RPC_URL_AVALANCHE") {
            config.rpc_url_avalanche = url.clone();
        }
        if let Some(addr) = env_map.get("VAULT_ADDRESS_ARBITRUM") {
            config.vault_address_arbitrum = parse_vault("VAULT_ADDRESS_ARBITRUM", addr)?;
        }
        if let Some(addr) = env_map.get("VAULT_ADDRESS_AVALANCHE") {
            config.vault_address_avalanche = parse_vault("VAULT_ADDRESS_AVALANCHE", addr)?;
        }

        Ok(config)
    }
}

fn parse_vault(key: &str, value: &str) -> Result<Address, ConfigError> {
    value
        .parse()
        .map_err(|e| ConfigError::InvalidValue(key.to_string(), format!("{value:?}: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_env_uses_defaults() {
        let config = Config::from_env_map(HashMap::new()).unwrap();
        assert_eq!(config.subgraph_url_arbitrum, DEFAULT_SUBGRAPH_URL_ARBITRUM);
        assert_eq!(config.rpc_url_avalanche, DEFAULT_RPC_URL_AVALANCHE);
        assert_eq!(config.vault_address_arbitrum, DEFAULT_VAULT_ARBITRUM);
        assert_eq!(config.vault_address_avalanche, DEFAULT_VAULT_AVALANCHE);
    }

    #[test]
    fn test_env_overrides() {
        let mut env_map = HashMap::new();
        env_map.insert(
            "SUBGRAPH_URL_AVALANCHE".to_string(),
            "http://localhost:8000/subgraph".to_string(),
        );
        env_map.insert(
            "VAULT_ADDRESS_ARBITRUM".to_string(),
            "0x00000000000000000000000000000000000000ff".to_string(),
        );

        let config = Config::from_env_map(env_map).unwrap();
        assert_eq!(config.subgraph_url_avalanche, "http://localhost:8000/subgraph");
        assert_eq!(
            config.vault_address_arbitrum,
            "0x00000000000000000000000000000000000000ff"
                .parse::<Address>()
                .unwrap()
        );
        // Untouched fields keep their defaults.
        assert_eq!(config.subgraph_url_arbitrum, DEFAULT_SUBGRAPH_URL_ARBITRUM);
    }

    #[test]
    fn test_invalid_vault_address() {
        let mut env_map = HashMap::new();
        env_map.insert(
            "VAULT_ADDRESS_AVALANCHE".to_string(),
            "0xnot-an-address".to_string(),
        );
        let result = Config::from_env_map(env_map);
        match result {
            Err(ConfigError::InvalidValue(key, _)) => {
                assert_eq!(key, "VAULT_ADDRESS_AVALANCHE")
            }
            other => panic!("Expected InvalidValue error, got {other:?}"),
        }
    }
}
