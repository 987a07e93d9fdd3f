// src/models.rs
use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::chains::Chain;

/// One asset holding for one wallet on one chain, as normalized from the
/// balance API.
#[derive(Debug, Clone)]
pub struct BalanceRecord {
    pub contract_name: Option<String>,
    pub ticker_symbol: Option<String>,
    /// Token base units as a decimal digit string; wider than u64 for some tokens.
    pub raw_balance: Option<String>,
    pub decimals: Option<u32>,
    /// USD quote as delivered, currency-formatted (e.g. "$1,234.56").
    pub quote_usd: Option<String>,
    pub logo_url: Option<String>,
    pub chain: Chain,
    pub wallet_address: String,
}

/// A balance record projected to the dashboard's display fields.
#[derive(Debug, Clone, Serialize)]
pub struct AggregatedRow {
    pub name: String,
    pub coin: String,
    pub balance: Decimal,
    /// Numeric USD value, kept alongside the display string for totals.
    pub value: Decimal,
    pub value_display: String,
    pub chain: Chain,
    pub logo: Option<String>,
}

/// Chart-ready row: sub-threshold holdings are collapsed into "Other" per
/// chain, so name and logo no longer apply.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BucketedRow {
    pub chain: Chain,
    pub coin: String,
    pub balance: Decimal,
    pub value: Decimal,
}

/// One donut chart per chain.
#[derive(Debug, Clone, Serialize)]
pub struct ChartPanel {
    pub chain: Chain,
    /// Panel heading, e.g. "eth-mainnet = $1,234.56".
    pub title: String,
    pub slices: Vec<ChartSlice>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChartSlice {
    pub label: String,
    pub value: Decimal,
}

/// Everything the presentation layer needs from one fetch cycle.
///
/// Rebuilt from scratch on every cycle; nothing here survives between runs.
#[derive(Debug, Clone, Serialize)]
pub struct PortfolioReport {
    /// Overall heading, e.g. "Total Balance = $12,345.67".
    pub title: String,
    pub table: Vec<AggregatedRow>,
    pub buckets: Vec<BucketedRow>,
    pub panels: Vec<ChartPanel>,
    pub grand_total: Decimal,
    pub per_chain_total: BTreeMap<String, Decimal>,
    /// Distinct chains in table order, for the detail view's filter dropdown.
    pub chains: Vec<Chain>,
    pub fetched_at: DateTime<Utc>,
}

impl PortfolioReport {
    /// Detail-table view: `None` selects the unfiltered "Total" view.
    pub fn table_for_chain(&self, chain: Option<Chain>) -> Vec<&AggregatedRow> {
        match chain {
            Some(c) => self.table.iter().filter(|row| row.chain == c).collect(),
            None => self.table.iter().collect(),
        }
    }

    /// True when no (wallet, chain) pair produced a positive-value holding.
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(coin: &str, chain: Chain, value: i64) -> AggregatedRow {
        AggregatedRow {
            name: coin.to_string(),
            coin: coin.to_string(),
            balance: Decimal::ONE,
            value: Decimal::from(value),
            value_display: String::new(),
            chain,
            logo: None,
        }
    }

    fn report(table: Vec<AggregatedRow>) -> PortfolioReport {
        PortfolioReport {
            title: String::new(),
            table,
            buckets: vec![],
            panels: vec![],
            grand_total: Decimal::ZERO,
            per_chain_total: BTreeMap::new(),
            chains: vec![],
            fetched_at: Utc::now(),
        }
    }

    #[test]
    fn test_table_for_chain_filters_rows() {
        let r = report(vec![
            row("ETH", Chain::EthMainnet, 300),
            row("BNB", Chain::BscMainnet, 150),
            row("USDC", Chain::EthMainnet, 50),
        ]);

        let eth = r.table_for_chain(Some(Chain::EthMainnet));
        assert_eq!(eth.len(), 2);
        assert!(eth.iter().all(|row| row.chain == Chain::EthMainnet));

        let total = r.table_for_chain(None);
        assert_eq!(total.len(), 3);
    }

    #[test]
    fn test_empty_report() {
        assert!(report(vec![]).is_empty());
        assert!(!report(vec![row("ETH", Chain::EthMainnet, 1)]).is_empty());
    }
}
