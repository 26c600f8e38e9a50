//! On-chain vault reads over JSON-RPC.

use super::{ChainError, ChainReader};
use crate::config::Config;
use crate::domain::Network;
use alloy::primitives::{Address, U256};
use alloy::providers::{DynProvider, Provider, ProviderBuilder};
use alloy::sol;
use async_trait::async_trait;
use tracing::debug;

sol! {
    #[sol(rpc)]
    interface IVault {
        function cumulativeFundingRates(address _token) external view returns (uint256);
        function getMinPrice(address _token) external view returns (uint256);
        function getMaxPrice(address _token) external view returns (uint256);
    }
}

/// Chain reader backed by one vault contract per network.
///
/// Token arguments are `Address` values, so call arguments and lookup keys
/// share the same canonical form regardless of how the source encoded them.
#[derive(Clone)]
pub struct VaultReader {
    arbitrum: IVault::IVaultInstance<DynProvider>,
    avalanche: IVault::IVaultInstance<DynProvider>,
}

impl VaultReader {
    /// Build providers for both networks from the configured endpoints.
    pub fn connect(config: &Config) -> Result<Self, ChainError> {
        Ok(Self {
            arbitrum: Self::instance(
                Network::Arbitrum,
                &config.rpc_url_arbitrum,
                config.vault_address_arbitrum,
            )?,
            avalanche: Self::instance(
                Network::Avalanche,
                &config.rpc_url_avalanche,
                config.vault_address_avalanche,
            )?,
        })
    }

    fn instance(
        network: Network,
        rpc_url: &str,
        vault: Address,
    ) -> Result<IVault::IVaultInstance<DynProvider>, ChainError> {
        let url = rpc_url.parse().map_err(|e| ChainError::Endpoint {
            network,
            message: format!("{rpc_url:?}: {e}"),
        })?;
        let provider = ProviderBuilder::new().connect_http(url).erased();
        Ok(IVault::new(vault, provider))
    }

    fn vault(&self, network: Network) -> &IVault::IVaultInstance<DynProvider> {
        match network {
            Network::Arbitrum => &self.arbitrum,
            Network::Avalanche => &self.avalanche,
        }
    }
}

impl std::fmt::Debug for VaultReader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VaultReader")
            .field("arbitrum", self.arbitrum.address())
            .field("avalanche", self.avalanche.address())
            .finish()
    }
}

#[async_trait]
impl ChainReader for VaultReader {
    async fn cumulative_funding_rate(
        &self,
        network: Network,
        token: Address,
    ) -> Result<U256, ChainError> {
        debug!("cumulativeFundingRates({token}) on {network}");
        self.vault(network)
            .cumulativeFundingRates(token)
            .call()
            .await
            .map_err(|e| ChainError::CallFailed {
                network,
                token,
                call: "cumulativeFundingRates",
                message: e.to_string(),
            })
    }

    async fn min_price(&self, network: Network, token: Address) -> Result<U256, ChainError> {
        debug!("getMinPrice({token}) on {network}");
        self.vault(network)
            .getMinPrice(token)
            .call()
            .await
            .map_err(|e| ChainError::CallFailed {
                network,
                token,
                call: "getMinPrice",
                message: e.to_string(),
            })
    }

    async fn max_price(&self, network: Network, token: Address) -> Result<U256, ChainError> {
        debug!("getMaxPrice({token}) on {network}");
        self.vault(network)
            .getMaxPrice(token)
            .call()
            .await
            .map_err(|e| ChainError::CallFailed {
                network,
                token,
                call: "getMaxPrice",
                message: e.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connect_rejects_invalid_endpoint() {
        let mut config = Config::defaults();
        config.rpc_url_arbitrum = "not a url".to_string();
        let err = VaultReader::connect(&config).unwrap_err();
        match err {
            ChainError::Endpoint { network, .. } => assert_eq!(network, Network::Arbitrum),
            other => panic!("expected Endpoint error, got {other:?}"),
        }
    }

    #[test]
    fn test_connect_with_defaults() {
        // Only builds the providers; no request is issued.
        let reader = VaultReader::connect(&Config::defaults()).unwrap();
        let rendered = format!("{reader:?}");
        assert!(rendered.contains("VaultReader"));
    }
}
