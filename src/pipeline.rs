use chrono::Utc;
use serde::Deserialize;
use tracing::info;

use crate::aggregate;
use crate::bucket::{self, DEFAULT_BUCKET_THRESHOLD};
use crate::chains::Chain;
use crate::config::Config;
use crate::covalent::CovalentClient;
use crate::error::PortfolioError;
use crate::models::PortfolioReport;
use crate::normalize;

/// One fetch cycle's inputs, as handed over by the presentation layer.
#[derive(Debug, Clone, Deserialize)]
pub struct PortfolioRequest {
    pub wallets: Vec<String>,
    pub chains: Vec<String>,
    /// Overrides the configured COVALENT_API_KEY for this cycle.
    #[serde(default)]
    pub api_key: Option<String>,
}

/// Run one full fetch-and-aggregate cycle.
///
/// Validates inputs before any network call, then fetches every
/// (wallet, chain) pair, normalizes, aggregates and buckets. Failed pairs
/// are logged and skipped; a report whose table is empty means no pair
/// produced a positive-value holding.
pub async fn run(
    client: &CovalentClient,
    cfg: &Config,
    request: &PortfolioRequest,
) -> Result<PortfolioReport, PortfolioError> {
    let wallets: Vec<String> = request
        .wallets
        .iter()
        .map(|w| w.trim().to_string())
        .filter(|w| !w.is_empty())
        .collect();
    if wallets.is_empty() {
        return Err(PortfolioError::NoWalletsEntered);
    }

    if request.chains.is_empty() {
        return Err(PortfolioError::NoChainsSelected);
    }
    let chains: Vec<Chain> = request
        .chains
        .iter()
        .map(|c| c.parse::<Chain>())
        .collect::<Result<_, _>>()?;

    let api_key = request
        .api_key
        .as_deref()
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .or(cfg.api_key.as_deref())
        .ok_or(PortfolioError::MissingApiKey)?;

    info!(
        "Fetching balances for {} wallet(s) across {} chain(s)",
        wallets.len(),
        chains.len()
    );

    let results = client.fetch_all(&wallets, &chains, api_key).await;
    let records = normalize::normalize_all(results);
    info!("Normalized {} balance record(s)", records.len());

    let agg = aggregate::aggregate(records)?;
    let buckets = bucket::bucket(&agg.table, DEFAULT_BUCKET_THRESHOLD);
    let panels = bucket::chart_panels(&buckets, &agg);

    // distinct chains in table order feed the dashboard's filter dropdown
    let mut chains_seen: Vec<Chain> = Vec::new();
    for row in &agg.table {
        if !chains_seen.contains(&row.chain) {
            chains_seen.push(row.chain);
        }
    }

    let report = PortfolioReport {
        title: format!(
            "Total Balance = {}",
            aggregate::format_usd(agg.grand_total)
        ),
        table: agg.table,
        buckets,
        panels,
        grand_total: agg.grand_total,
        per_chain_total: agg.per_chain_total,
        chains: chains_seen,
        fetched_at: Utc::now(),
    };

    info!(
        "Cycle complete: {} row(s), grand total {}",
        report.table.len(),
        report.grand_total
    );

    Ok(report)
}
