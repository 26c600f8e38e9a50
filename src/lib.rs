//! Aggregate exposure statistics for large open positions on a two-network
//! perpetual-futures exchange.
//!
//! The pipeline queries each network's subgraph for open positions above the
//! size threshold, reads live vault state (cumulative funding rates and
//! min/max mark prices) for every token those positions reference, enriches
//! each position with its accrued funding fee and unrealized price delta,
//! and folds everything into a single [`SummaryReport`].

pub mod config;
pub mod datasource;
pub mod domain;
pub mod engine;
pub mod error;
pub mod orchestration;

pub use config::Config;
pub use datasource::{
    ChainReader, MockChainReader, MockPositionSource, PositionSource, SubgraphSource, VaultReader,
};
pub use domain::{EnrichedPosition, Network, Position};
pub use engine::{ChainTables, SummaryReport, Totals};
pub use error::SnapshotError;
pub use orchestration::Snapshotter;
