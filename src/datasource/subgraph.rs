//! Subgraph client for fetching open positions.

use super::{PositionSource, SourceError};
use crate::config::Config;
use crate::domain::{Network, Position, MIN_POSITION_SIZE_USD};
use alloy::primitives::{Address, I256, U256};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

/// Position source backed by the per-network subgraph endpoints.
///
/// One fixed, parameterized query per network. No retries: a failed or
/// rejected query aborts the run.
#[derive(Debug, Clone)]
pub struct SubgraphSource {
    client: Client,
    arbitrum_url: String,
    avalanche_url: String,
}

fn open_trades_query() -> String {
    format!(
        r#"{{
  trades(
    first: 999
    orderBy: size
    orderDirection: desc
    where: {{ size_gte: "{}", status: open }}
  ) {{
    account
    averagePrice
    collateral
    collateralDelta
    collateralToken
    fee
    indexToken
    isLong
    realisedPnl
    size
    updateList(orderBy: timestamp, orderDirection: desc, first: 1) {{
      entryFundingRate
    }}
  }}
}}"#,
        MIN_POSITION_SIZE_USD
    )
}

impl SubgraphSource {
    pub fn new(config: &Config) -> Self {
        Self {
            client: Client::new(),
            arbitrum_url: config.subgraph_url_arbitrum.clone(),
            avalanche_url: config.subgraph_url_avalanche.clone(),
        }
    }

    fn url_for(&self, network: Network) -> &str {
        match network {
            Network::Arbitrum => &self.arbitrum_url,
            Network::Avalanche => &self.avalanche_url,
        }
    }
}

#[async_trait]
impl PositionSource for SubgraphSource {
    async fn fetch_open_positions(&self, network: Network) -> Result<Vec<Position>, SourceError> {
        debug!("querying open positions on {}", network);

        let body = serde_json::json!({ "query": open_trades_query() });
        let response = self
            .client
            .post(self.url_for(network))
            .json(&body)
            .send()
            .await
            .map_err(|e| SourceError::Network {
                network,
                message: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Http {
                network,
                status: status.as_u16(),
            });
        }

        let envelope: GraphResponse =
            response
                .json()
                .await
                .map_err(|e| SourceError::Parse(format!("{network}: {e}")))?;

        decode_response(network, envelope)
    }
}

#[derive(Debug, Deserialize)]
struct GraphResponse {
    data: Option<TradesData>,
    errors: Option<Vec<GraphError>>,
}

#[derive(Debug, Deserialize)]
struct GraphError {
    message: String,
}

#[derive(Debug, Deserialize)]
struct TradesData {
    trades: Vec<RawTrade>,
}

/// A trade record as the subgraph returns it: numeric fields are
/// decimal-encoded strings and must never pass through floating point.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawTrade {
    account: String,
    collateral_token: String,
    index_token: String,
    is_long: bool,
    size: String,
    collateral: String,
    collateral_delta: String,
    average_price: String,
    fee: String,
    realised_pnl: String,
    #[serde(default)]
    update_list: Vec<RawUpdate>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawUpdate {
    entry_funding_rate: String,
}

fn decode_response(
    network: Network,
    envelope: GraphResponse,
) -> Result<Vec<Position>, SourceError> {
    if let Some(errors) = envelope.errors {
        let message = errors
            .into_iter()
            .map(|e| e.message)
            .collect::<Vec<_>>()
            .join("; ");
        return Err(SourceError::Query { network, message });
    }

    let data = envelope.data.ok_or_else(|| {
        SourceError::Parse(format!("{network}: response has neither data nor errors"))
    })?;

    data.trades
        .into_iter()
        .map(|raw| raw.into_position(network))
        .collect()
}

impl RawTrade {
    fn into_position(self, network: Network) -> Result<Position, SourceError> {
        // The query asks for the single most recent update record; a trade
        // without one cannot yield an entry funding rate.
        let update = self.update_list.first().ok_or_else(|| {
            SourceError::Parse(format!("position {} has no update record", self.account))
        })?;

        Ok(Position {
            account: parse_address("account", &self.account)?,
            network,
            collateral_token: parse_address("collateralToken", &self.collateral_token)?,
            index_token: parse_address("indexToken", &self.index_token)?,
            is_long: self.is_long,
            size: parse_uint("size", &self.size)?,
            collateral: parse_uint("collateral", &self.collateral)?,
            collateral_delta: parse_uint("collateralDelta", &self.collateral_delta)?,
            average_price: parse_uint("averagePrice", &self.average_price)?,
            fee: parse_uint("fee", &self.fee)?,
            realised_pnl: parse_int("realisedPnl", &self.realised_pnl)?,
            entry_funding_rate: parse_uint("entryFundingRate", &update.entry_funding_rate)?,
        })
    }
}

fn parse_address(field: &str, value: &str) -> Result<Address, SourceError> {
    value
        .parse()
        .map_err(|e| SourceError::Parse(format!("invalid {field} {value:?}: {e}")))
}

fn parse_uint(field: &str, value: &str) -> Result<U256, SourceError> {
    value
        .parse()
        .map_err(|e| SourceError::Parse(format!("invalid {field} {value:?}: {e}")))
}

fn parse_int(field: &str, value: &str) -> Result<I256, SourceError> {
    value
        .parse()
        .map_err(|e| SourceError::Parse(format!("invalid {field} {value:?}: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_trade_json() -> serde_json::Value {
        serde_json::json!({
            "account": "0x00000000000000000000000000000000000000aa",
            "collateralToken": "0x00000000000000000000000000000000000000bb",
            "indexToken": "0x00000000000000000000000000000000000000cc",
            "isLong": true,
            "size": "50000000000000000000000000000000000",
            "collateral": "5000000000000000000000000000000000",
            "collateralDelta": "0",
            "averagePrice": "3000000000000000000000000000000000",
            "fee": "10000000000000000000000000000000",
            "realisedPnl": "-2000000000000000000000000000000",
            "updateList": [{ "entryFundingRate": "152340" }]
        })
    }

    fn envelope_with(trades: Vec<serde_json::Value>) -> GraphResponse {
        serde_json::from_value(serde_json::json!({ "data": { "trades": trades } })).unwrap()
    }

    #[test]
    fn test_decode_valid_trade() {
        let positions =
            decode_response(Network::Arbitrum, envelope_with(vec![valid_trade_json()])).unwrap();
        assert_eq!(positions.len(), 1);

        let position = &positions[0];
        assert_eq!(position.network, Network::Arbitrum);
        assert!(position.is_long);
        assert_eq!(
            position.size,
            "50000000000000000000000000000000000".parse::<U256>().unwrap()
        );
        assert_eq!(position.entry_funding_rate, U256::from(152_340u64));
        assert!(position.realised_pnl.is_negative());
    }

    #[test]
    fn test_decode_malformed_numeric_is_fatal() {
        let mut trade = valid_trade_json();
        trade["size"] = serde_json::json!("5e34");
        let err = decode_response(Network::Arbitrum, envelope_with(vec![trade])).unwrap_err();
        assert!(matches!(err, SourceError::Parse(_)), "got {err:?}");
        assert!(err.to_string().contains("size"));
    }

    #[test]
    fn test_decode_float_numeric_is_fatal() {
        let mut trade = valid_trade_json();
        trade["fee"] = serde_json::json!("10.5");
        let err = decode_response(Network::Avalanche, envelope_with(vec![trade])).unwrap_err();
        assert!(matches!(err, SourceError::Parse(_)));
    }

    #[test]
    fn test_decode_missing_update_record_is_fatal() {
        let mut trade = valid_trade_json();
        trade["updateList"] = serde_json::json!([]);
        let err = decode_response(Network::Arbitrum, envelope_with(vec![trade])).unwrap_err();
        assert!(err.to_string().contains("no update record"));
    }

    #[test]
    fn test_decode_graphql_errors_are_fatal() {
        let envelope: GraphResponse = serde_json::from_value(serde_json::json!({
            "errors": [{ "message": "indexing error" }]
        }))
        .unwrap();
        let err = decode_response(Network::Avalanche, envelope).unwrap_err();
        match err {
            SourceError::Query { network, message } => {
                assert_eq!(network, Network::Avalanche);
                assert_eq!(message, "indexing error");
            }
            other => panic!("expected Query error, got {other:?}"),
        }
    }

    #[test]
    fn test_decode_empty_body_is_fatal() {
        let envelope: GraphResponse = serde_json::from_value(serde_json::json!({})).unwrap();
        let err = decode_response(Network::Arbitrum, envelope).unwrap_err();
        assert!(matches!(err, SourceError::Parse(_)));
    }

    #[test]
    fn test_query_embeds_size_threshold() {
        let query = open_trades_query();
        assert!(query.contains("10000000000000000000000000000000000"));
        assert!(query.contains("status: open"));
        assert!(query.contains("first: 999"));
    }
}
