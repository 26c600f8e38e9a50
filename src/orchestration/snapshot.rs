use crate::datasource::{ChainError, ChainReader, PositionSource};
use crate::domain::{Network, Position};
use crate::engine::{aggregate, enrich_position, ChainTables, SummaryReport};
use crate::error::SnapshotError;
use futures::future::try_join_all;
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::info;

/// Runs the whole snapshot: fetch -> read chain state -> enrich -> aggregate.
///
/// One invocation produces one atomic report; any stage failure aborts the
/// run without partial output.
pub struct Snapshotter {
    source: Arc<dyn PositionSource>,
    chain: Arc<dyn ChainReader>,
}

impl Snapshotter {
    pub fn new(source: Arc<dyn PositionSource>, chain: Arc<dyn ChainReader>) -> Self {
        Self { source, chain }
    }

    pub async fn run(&self) -> Result<SummaryReport, SnapshotError> {
        info!("querying open positions");
        let (arbitrum, avalanche) = futures::try_join!(
            self.source.fetch_open_positions(Network::Arbitrum),
            self.source.fetch_open_positions(Network::Avalanche),
        )?;
        info!(
            arbitrum = arbitrum.len(),
            avalanche = avalanche.len(),
            "fetched open positions"
        );

        let mut positions = arbitrum;
        positions.extend(avalanche);

        info!("reading vault state");
        let tables = self.read_chain_state(&positions).await?;

        info!("enriching {} positions", positions.len());
        let enriched = positions
            .into_iter()
            .map(|position| enrich_position(position, &tables))
            .collect::<Result<Vec<_>, _>>()?;

        let report = aggregate(&enriched)?;
        info!(count = report.open_positions_count, "snapshot complete");
        Ok(report)
    }

    /// One read per distinct token per network, issued concurrently. Each
    /// table entry is written exactly once, keyed by its own token.
    async fn read_chain_state(
        &self,
        positions: &[Position],
    ) -> Result<ChainTables, SnapshotError> {
        let mut tables = ChainTables::default();

        for network in Network::ALL {
            let collateral_tokens: BTreeSet<_> = positions
                .iter()
                .filter(|p| p.network == network)
                .map(|p| p.collateral_token)
                .collect();
            let index_tokens: BTreeSet<_> = positions
                .iter()
                .filter(|p| p.network == network)
                .map(|p| p.index_token)
                .collect();

            let rates = try_join_all(collateral_tokens.into_iter().map(|token| async move {
                let rate = self.chain.cumulative_funding_rate(network, token).await?;
                Ok::<_, ChainError>((token, rate))
            }))
            .await?;

            let prices = try_join_all(index_tokens.into_iter().map(|token| async move {
                let min = self.chain.min_price(network, token).await?;
                let max = self.chain.max_price(network, token).await?;
                Ok::<_, ChainError>((token, min, max))
            }))
            .await?;

            let network_tables = tables.for_network_mut(network);
            for (token, rate) in rates {
                network_tables.insert_funding_rate(token, rate);
            }
            for (token, min, max) in prices {
                network_tables.insert_prices(token, min, max);
            }
        }

        Ok(tables)
    }
}
