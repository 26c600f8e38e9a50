//! External collaborators: the subgraph position source and the on-chain
//! vault reader, each behind a trait so the pipeline can run against mocks.

use crate::domain::{Network, Position};
use alloy::primitives::{Address, U256};
use async_trait::async_trait;
use thiserror::Error;

pub mod mock;
pub mod subgraph;
pub mod vault;

pub use mock::{MockChainReader, MockPositionSource};
pub use subgraph::SubgraphSource;
pub use vault::VaultReader;

/// Source of open-position records for a network.
#[async_trait]
pub trait PositionSource: Send + Sync + std::fmt::Debug {
    /// Fetch the current open positions above the size threshold for one
    /// network: at most 999 records, ordered by size descending.
    async fn fetch_open_positions(&self, network: Network) -> Result<Vec<Position>, SourceError>;
}

/// Read-only access to per-token vault state on a network.
///
/// No fallback values: a failed call must surface as an error so the run
/// aborts instead of producing a report from incomplete chain state.
#[async_trait]
pub trait ChainReader: Send + Sync + std::fmt::Debug {
    /// Cumulative funding-rate accumulator for a collateral token,
    /// at FUNDING_RATE_PRECISION scale.
    async fn cumulative_funding_rate(
        &self,
        network: Network,
        token: Address,
    ) -> Result<U256, ChainError>;

    /// Bid-side mark price for an index token, at PRICE_PRECISION scale.
    async fn min_price(&self, network: Network, token: Address) -> Result<U256, ChainError>;

    /// Ask-side mark price for an index token, at PRICE_PRECISION scale.
    async fn max_price(&self, network: Network, token: Address) -> Result<U256, ChainError>;
}

/// Error type for position-source operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SourceError {
    /// Transport-level failure reaching the subgraph.
    #[error("position query for {network} failed: {message}")]
    Network { network: Network, message: String },
    /// The subgraph answered with a non-success HTTP status.
    #[error("position query for {network} returned status {status}")]
    Http { network: Network, status: u16 },
    /// The subgraph rejected the query (GraphQL `errors` in the response).
    #[error("position query for {network} rejected: {message}")]
    Query { network: Network, message: String },
    /// A position record was missing a field or carried a value that does
    /// not parse as an exact integer.
    #[error("malformed position record: {0}")]
    Parse(String),
}

/// Error type for chain-read operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ChainError {
    #[error("invalid rpc endpoint for {network}: {message}")]
    Endpoint { network: Network, message: String },
    #[error("{call}({token}) failed on {network}: {message}")]
    CallFailed {
        network: Network,
        token: Address,
        call: &'static str,
        message: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_error_display() {
        let err = SourceError::Http {
            network: Network::Arbitrum,
            status: 502,
        };
        assert_eq!(
            err.to_string(),
            "position query for arbitrum returned status 502"
        );

        let err = SourceError::Parse("size is not an integer".to_string());
        assert_eq!(
            err.to_string(),
            "malformed position record: size is not an integer"
        );
    }

    #[test]
    fn test_chain_error_display() {
        let err = ChainError::CallFailed {
            network: Network::Avalanche,
            token: Address::ZERO,
            call: "getMinPrice",
            message: "execution reverted".to_string(),
        };
        let rendered = err.to_string();
        assert!(rendered.starts_with("getMinPrice("));
        assert!(rendered.contains("avalanche"));
        assert!(rendered.contains("execution reverted"));
    }
}
