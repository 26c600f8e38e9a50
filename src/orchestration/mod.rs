//! Pipeline wiring: fetch positions, read chain state, enrich, aggregate.

pub mod snapshot;

pub use snapshot::Snapshotter;
