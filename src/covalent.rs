// src/covalent.rs
use eyre::Result;
use futures_util::{stream, StreamExt};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::time::Duration;
use tracing::{info, warn};

use crate::chains::Chain;

/// One asset record as the balance API delivers it.
#[derive(Debug, Deserialize, Clone)]
pub struct BalanceItem {
    pub contract_name: Option<String>,
    pub contract_ticker_symbol: Option<String>,

    /// Token base units as a decimal string; exceeds u64 for some tokens.
    pub balance: Option<String>,
    pub contract_decimals: Option<u32>,

    /// USD quote, currency-formatted (e.g. "$1,234.56").
    pub pretty_quote: Option<String>,
    pub logo_url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct BalanceData {
    #[serde(default)]
    items: Vec<BalanceItem>,
}

#[derive(Debug, Deserialize)]
struct BalancesResponse {
    data: Option<BalanceData>,

    #[allow(dead_code)]
    #[serde(default)]
    error: bool,
    #[allow(dead_code)]
    error_message: Option<String>,
}

/// Outcome of one (wallet, chain) balance request. Failures stay local to
/// their pair; downstream stages simply see no items for them.
#[derive(Debug, Clone)]
pub enum FetchResult {
    /// HTTP 200 with a non-null data payload.
    Ok {
        chain: Chain,
        wallet: String,
        items: Vec<BalanceItem>,
    },
    /// HTTP 200 but `data` was null; zero holdings, not an error.
    Empty { chain: Chain, wallet: String },
    /// Non-200, network error or malformed body; skipped downstream.
    Failed {
        chain: Chain,
        wallet: String,
        reason: String,
    },
}

/// Client for the Covalent `balances_v2` endpoint.
pub struct CovalentClient {
    http: Client,
    base_url: String,
    concurrency: usize,
}

impl CovalentClient {
    pub fn new(base_url: &str, timeout: Duration, concurrency: usize) -> Result<Self> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            concurrency: concurrency.max(1),
        })
    }

    /// Fetch balances for one (wallet, chain) pair.
    ///
    /// Never returns `Err`: every failure mode collapses into a
    /// `FetchResult` so one bad pair cannot abort the rest. No retries.
    pub async fn fetch_pair(&self, wallet: &str, chain: Chain, api_key: &str) -> FetchResult {
        let url = format!(
            "{}/v1/{}/address/{}/balances_v2/?quote-currency=USD",
            self.base_url, chain, wallet
        );

        info!("📡 GET balances for wallet {} on chain {}", wallet, chain);

        let resp = match self
            .http
            .get(&url)
            .basic_auth(api_key, Some(""))
            .send()
            .await
        {
            Ok(resp) => resp,
            Err(e) => {
                warn!(
                    "Failed to fetch balance for wallet {} on chain {}: {}",
                    wallet, chain, e
                );
                return FetchResult::Failed {
                    chain,
                    wallet: wallet.to_string(),
                    reason: format!("request error: {e}"),
                };
            }
        };

        let status = resp.status();
        if status != StatusCode::OK {
            let body = resp.text().await.unwrap_or_default();
            warn!(
                "Failed to fetch balance for wallet {} on chain {}: HTTP {} {}",
                wallet, chain, status, body
            );
            return FetchResult::Failed {
                chain,
                wallet: wallet.to_string(),
                reason: format!("HTTP {status}: {body}"),
            };
        }

        let text = match resp.text().await {
            Ok(text) => text,
            Err(e) => {
                warn!(
                    "Failed to read balance response for wallet {} on chain {}: {}",
                    wallet, chain, e
                );
                return FetchResult::Failed {
                    chain,
                    wallet: wallet.to_string(),
                    reason: format!("body read error: {e}"),
                };
            }
        };

        let parsed: BalancesResponse = match serde_json::from_str(&text) {
            Ok(parsed) => parsed,
            Err(e) => {
                warn!(
                    "Malformed balance response for wallet {} on chain {}: {}",
                    wallet, chain, e
                );
                return FetchResult::Failed {
                    chain,
                    wallet: wallet.to_string(),
                    reason: format!("malformed body: {e}"),
                };
            }
        };

        match parsed.data {
            Some(data) => FetchResult::Ok {
                chain,
                wallet: wallet.to_string(),
                items: data.items,
            },
            None => {
                info!("No data for wallet {} on chain {}", wallet, chain);
                FetchResult::Empty {
                    chain,
                    wallet: wallet.to_string(),
                }
            }
        }
    }

    /// Fetch every (wallet, chain) pair: outer loop wallets, inner chains.
    ///
    /// Runs up to `concurrency` requests at once but yields results in pair
    /// order, so downstream sorting stays reproducible.
    pub async fn fetch_all(
        &self,
        wallets: &[String],
        chains: &[Chain],
        api_key: &str,
    ) -> Vec<FetchResult> {
        let pairs: Vec<(String, Chain)> = wallets
            .iter()
            .flat_map(|wallet| chains.iter().map(move |chain| (wallet.clone(), *chain)))
            .collect();

        stream::iter(pairs)
            .map(|(wallet, chain)| async move { self.fetch_pair(&wallet, chain, api_key).await })
            .buffered(self.concurrency)
            .collect::<Vec<_>>()
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_balances_response() {
        let json = r#"{
            "data": {
                "items": [
                    {
                        "contract_name": "Ether",
                        "contract_ticker_symbol": "ETH",
                        "contract_decimals": 18,
                        "balance": "2000000000000000000",
                        "pretty_quote": "$4,600.00",
                        "logo_url": "https://logos.example/eth.png"
                    }
                ]
            },
            "error": false,
            "error_message": null
        }"#;

        let parsed: BalancesResponse = serde_json::from_str(json).unwrap();
        let data = parsed.data.unwrap();
        assert_eq!(data.items.len(), 1);
        let item = &data.items[0];
        assert_eq!(item.contract_ticker_symbol.as_deref(), Some("ETH"));
        assert_eq!(item.contract_decimals, Some(18));
        assert_eq!(item.balance.as_deref(), Some("2000000000000000000"));
    }

    #[test]
    fn test_parse_null_data() {
        let json = r#"{"data": null, "error": false, "error_message": null}"#;
        let parsed: BalancesResponse = serde_json::from_str(json).unwrap();
        assert!(parsed.data.is_none());
    }

    #[test]
    fn test_parse_item_with_missing_fields() {
        // only balance present; every other field is optional on the wire
        let json = r#"{"data": {"items": [{"balance": "123"}]}}"#;
        let parsed: BalancesResponse = serde_json::from_str(json).unwrap();
        let item = &parsed.data.unwrap().items[0];
        assert_eq!(item.balance.as_deref(), Some("123"));
        assert!(item.contract_decimals.is_none());
        assert!(item.pretty_quote.is_none());
    }

    #[test]
    fn test_parse_data_without_items() {
        let json = r#"{"data": {}}"#;
        let parsed: BalancesResponse = serde_json::from_str(json).unwrap();
        assert!(parsed.data.unwrap().items.is_empty());
    }

    #[test]
    fn test_malformed_body_is_an_error() {
        assert!(serde_json::from_str::<BalancesResponse>("<html>502</html>").is_err());
    }
}
