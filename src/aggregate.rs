// src/aggregate.rs
use std::collections::BTreeMap;

use rust_decimal::Decimal;
use tracing::warn;

use crate::error::PortfolioError;
use crate::models::{AggregatedRow, BalanceRecord};

/// Output of one aggregation pass over the normalized record set.
#[derive(Debug, Clone)]
pub struct Aggregation {
    /// Positive-value rows, sorted by value descending.
    pub table: Vec<AggregatedRow>,
    pub grand_total: Decimal,
    pub per_chain_total: BTreeMap<String, Decimal>,
}

/// Parse a USD quote like "$1,234.56" (or a bare number) into a Decimal.
pub fn try_parse_usd(value: &str) -> Option<Decimal> {
    let cleaned: String = value
        .trim()
        .chars()
        .filter(|c| *c != '$' && *c != ',')
        .collect();
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse::<Decimal>().ok()
}

/// Scale a raw base-unit balance down by `decimals` digits.
///
/// The decimal point is inserted into the digit string before parsing, so
/// balances wider than any machine integer still come through exactly.
/// `None` means the input is not a plain digit string, or its scaled value
/// exceeds Decimal's 28-digit capacity.
pub fn scale_raw_balance(raw: &str, decimals: u32) -> Option<Decimal> {
    let digits = raw.trim();
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    if decimals == 0 {
        return digits.parse::<Decimal>().ok();
    }
    let d = decimals as usize;
    let scaled = if digits.len() > d {
        let (int_part, frac_part) = digits.split_at(digits.len() - d);
        format!("{int_part}.{frac_part}")
    } else {
        format!("0.{digits:0>width$}", width = d)
    };
    scaled.parse::<Decimal>().ok()
}

/// Render a USD amount as `$1,234.56`.
pub fn format_usd(value: Decimal) -> String {
    let rounded = value.round_dp(2);
    let negative = rounded.is_sign_negative();
    let plain = format!("{:.2}", rounded.abs());
    let (int_part, frac_part) = plain.split_once('.').unwrap_or((plain.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    if negative {
        format!("-${grouped}.{frac_part}")
    } else {
        format!("${grouped}.{frac_part}")
    }
}

fn coin_label(record: &BalanceRecord) -> String {
    record
        .ticker_symbol
        .clone()
        .or_else(|| record.contract_name.clone())
        .unwrap_or_else(|| "<unknown>".to_string())
}

/// Merge normalized records into the dashboard table.
///
/// Rows with an unusable raw balance or a non-positive USD value are
/// dropped; a record without `contract_decimals` aborts the cycle. The
/// surviving rows are sorted by value descending (stable, so equal values
/// keep discovery order) and their display strings are rendered only after
/// filtering and sorting.
pub fn aggregate(records: Vec<BalanceRecord>) -> Result<Aggregation, PortfolioError> {
    let mut table: Vec<AggregatedRow> = Vec::with_capacity(records.len());

    for record in records {
        // raw balance must coerce to a number; a row that doesn't is dropped
        let raw = match record.raw_balance.as_deref().map(str::trim) {
            Some(raw) if !raw.is_empty() && raw.bytes().all(|b| b.is_ascii_digit()) => raw,
            _ => {
                warn!(
                    "Dropping {} (wallet {} on {}): unusable raw balance {:?}",
                    coin_label(&record),
                    record.wallet_address,
                    record.chain,
                    record.raw_balance
                );
                continue;
            }
        };

        // decimals are required to scale; a record without them kills the cycle
        let decimals = record
            .decimals
            .ok_or_else(|| PortfolioError::MissingDecimals {
                coin: coin_label(&record),
                chain: record.chain.to_string(),
                wallet: record.wallet_address.clone(),
            })?;

        let balance = match scale_raw_balance(raw, decimals) {
            Some(balance) => balance,
            None => {
                warn!(
                    "Dropping {} (wallet {} on {}): balance {} does not fit",
                    coin_label(&record),
                    record.wallet_address,
                    record.chain,
                    raw
                );
                continue;
            }
        };

        // an unparseable or missing quote counts as zero, which the
        // positive-value filter below then excludes
        let value = record
            .quote_usd
            .as_deref()
            .and_then(try_parse_usd)
            .unwrap_or(Decimal::ZERO);

        if value <= Decimal::ZERO {
            continue;
        }

        table.push(AggregatedRow {
            name: record.contract_name.unwrap_or_default(),
            coin: record.ticker_symbol.unwrap_or_default(),
            balance,
            value,
            value_display: String::new(),
            chain: record.chain,
            logo: record.logo_url,
        });
    }

    // value descending; sort_by is stable so ties keep discovery order
    table.sort_by(|a, b| b.value.cmp(&a.value));

    for row in &mut table {
        row.value_display = format_usd(row.value);
    }

    let mut grand_total = Decimal::ZERO;
    let mut per_chain_total: BTreeMap<String, Decimal> = BTreeMap::new();
    for row in &table {
        grand_total += row.value;
        *per_chain_total
            .entry(row.chain.to_string())
            .or_insert(Decimal::ZERO) += row.value;
    }

    Ok(Aggregation {
        table,
        grand_total,
        per_chain_total,
    })
}
