// src/bucket.rs
use std::collections::BTreeMap;

use rust_decimal::Decimal;

use crate::aggregate::{format_usd, Aggregation};
use crate::chains::Chain;
use crate::models::{AggregatedRow, BucketedRow, ChartPanel, ChartSlice};

/// Rows below this USD value are collapsed into the "Other" slice.
pub const DEFAULT_BUCKET_THRESHOLD: Decimal = Decimal::ONE_HUNDRED;

pub const OTHER_LABEL: &str = "Other";

/// Collapse sub-threshold rows into "Other" and sum per (chain, coin).
///
/// Output rows are grouped contiguously by chain, in the order the
/// dashboard lists chains, with coins ordered alphabetically inside each
/// chain. Name and logo do not survive grouping since one group may span
/// several tokens.
pub fn bucket(table: &[AggregatedRow], threshold: Decimal) -> Vec<BucketedRow> {
    let mut groups: BTreeMap<(Chain, String), (Decimal, Decimal)> = BTreeMap::new();

    for row in table {
        let coin = if row.value < threshold {
            OTHER_LABEL.to_string()
        } else {
            row.coin.clone()
        };
        let entry = groups
            .entry((row.chain, coin))
            .or_insert((Decimal::ZERO, Decimal::ZERO));
        entry.0 += row.balance;
        entry.1 += row.value;
    }

    groups
        .into_iter()
        .map(|((chain, coin), (balance, value))| BucketedRow {
            chain,
            coin,
            balance,
            value,
        })
        .collect()
}

/// Build one chart panel per chain that has bucketed rows, titled with the
/// chain's total, e.g. `eth-mainnet = $1,234.56`. A chain that contributed
/// no rows gets no panel.
///
/// Relies on `bucket()` output being chain-contiguous.
pub fn chart_panels(buckets: &[BucketedRow], agg: &Aggregation) -> Vec<ChartPanel> {
    let mut panels: Vec<ChartPanel> = Vec::new();

    for row in buckets {
        if panels.last().map(|p| p.chain) != Some(row.chain) {
            let total = agg
                .per_chain_total
                .get(row.chain.as_str())
                .copied()
                .unwrap_or(Decimal::ZERO);
            panels.push(ChartPanel {
                chain: row.chain,
                title: format!("{} = {}", row.chain, format_usd(total)),
                slices: Vec::new(),
            });
        }
        if let Some(panel) = panels.last_mut() {
            panel.slices.push(ChartSlice {
                label: row.coin.clone(),
                value: row.value,
            });
        }
    }

    panels
}
