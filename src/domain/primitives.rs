//! Domain primitives: networks and fixed-point scale constants.

use alloy::primitives::{uint, U256};
use serde::{Deserialize, Serialize};

/// Fixed-point scale for USD amounts and prices (10^30).
pub const PRICE_PRECISION: U256 = uint!(1_000_000_000_000_000_000_000_000_000_000_U256);

/// Fixed-point scale for cumulative funding rates (10^6).
pub const FUNDING_RATE_PRECISION: U256 = uint!(1_000_000_U256);

/// Minimum position size included in the snapshot: $10k at [`PRICE_PRECISION`].
pub const MIN_POSITION_SIZE_USD: U256 =
    uint!(10_000_000_000_000_000_000_000_000_000_000_000_U256);

/// One of the two independent exchange deployments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    Arbitrum,
    Avalanche,
}

impl Network {
    /// Every deployment the snapshot aggregates across.
    pub const ALL: [Network; 2] = [Network::Arbitrum, Network::Avalanche];
}

impl std::fmt::Display for Network {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Network::Arbitrum => write!(f, "arbitrum"),
            Network::Avalanche => write!(f, "avalanche"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scale_constants() {
        assert_eq!(PRICE_PRECISION, U256::from(10u64).pow(U256::from(30u64)));
        assert_eq!(FUNDING_RATE_PRECISION, U256::from(1_000_000u64));
        assert_eq!(
            MIN_POSITION_SIZE_USD,
            U256::from(10u64).pow(U256::from(34u64))
        );
    }

    #[test]
    fn test_network_display() {
        assert_eq!(Network::Arbitrum.to_string(), "arbitrum");
        assert_eq!(Network::Avalanche.to_string(), "avalanche");
    }

    #[test]
    fn test_network_all_covers_both() {
        assert_eq!(Network::ALL.len(), 2);
        assert_ne!(Network::ALL[0], Network::ALL[1]);
    }
}
