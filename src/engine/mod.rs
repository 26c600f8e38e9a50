//! Pure computation core: lookup tables, enrichment formulas, aggregation.

pub mod aggregate;
pub mod enrich;
pub mod tables;

pub use aggregate::{aggregate, ReportError, SummaryReport, Totals};
pub use enrich::{enrich_position, funding_fee, unrealized_delta, EnrichError};
pub use tables::{ChainTables, NetworkTables};
