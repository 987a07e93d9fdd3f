use crate::covalent::FetchResult;
use crate::models::BalanceRecord;

/// Flatten one fetch outcome into records tagged with their source wallet
/// and chain. Empty and failed pairs contribute nothing; the fetcher has
/// already logged them.
pub fn normalize(result: FetchResult) -> Vec<BalanceRecord> {
    match result {
        FetchResult::Ok {
            chain,
            wallet,
            items,
        } => items
            .into_iter()
            .map(|item| BalanceRecord {
                contract_name: item.contract_name,
                ticker_symbol: item.contract_ticker_symbol,
                raw_balance: item.balance,
                decimals: item.contract_decimals,
                quote_usd: item.pretty_quote,
                logo_url: item.logo_url,
                chain,
                wallet_address: wallet.clone(),
            })
            .collect(),
        FetchResult::Empty { .. } | FetchResult::Failed { .. } => Vec::new(),
    }
}

/// Normalize a whole fetch cycle, preserving pair order.
pub fn normalize_all(results: Vec<FetchResult>) -> Vec<BalanceRecord> {
    results.into_iter().flat_map(normalize).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chains::Chain;
    use crate::covalent::BalanceItem;

    fn item(symbol: &str, balance: &str) -> BalanceItem {
        BalanceItem {
            contract_name: Some(format!("{symbol} Token")),
            contract_ticker_symbol: Some(symbol.to_string()),
            balance: Some(balance.to_string()),
            contract_decimals: Some(18),
            pretty_quote: Some("$10.00".to_string()),
            logo_url: None,
        }
    }

    #[test]
    fn test_ok_result_tags_chain_and_wallet() {
        let records = normalize(FetchResult::Ok {
            chain: Chain::BscMainnet,
            wallet: "0xabc".to_string(),
            items: vec![item("BNB", "5"), item("CAKE", "7")],
        });

        assert_eq!(records.len(), 2);
        for record in &records {
            assert_eq!(record.chain, Chain::BscMainnet);
            assert_eq!(record.wallet_address, "0xabc");
        }
        assert_eq!(records[0].ticker_symbol.as_deref(), Some("BNB"));
        assert_eq!(records[1].raw_balance.as_deref(), Some("7"));
    }

    #[test]
    fn test_empty_and_failed_yield_no_records() {
        assert!(normalize(FetchResult::Empty {
            chain: Chain::EthMainnet,
            wallet: "0xabc".to_string(),
        })
        .is_empty());

        assert!(normalize(FetchResult::Failed {
            chain: Chain::EthMainnet,
            wallet: "0xabc".to_string(),
            reason: "HTTP 429".to_string(),
        })
        .is_empty());
    }

    #[test]
    fn test_failed_pair_leaves_other_pairs_intact() {
        let records = normalize_all(vec![
            FetchResult::Ok {
                chain: Chain::EthMainnet,
                wallet: "0xaaa".to_string(),
                items: vec![item("ETH", "1")],
            },
            FetchResult::Failed {
                chain: Chain::EthMainnet,
                wallet: "0xbbb".to_string(),
                reason: "timeout".to_string(),
            },
            FetchResult::Ok {
                chain: Chain::MaticMainnet,
                wallet: "0xccc".to_string(),
                items: vec![item("POL", "2")],
            },
        ]);

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].wallet_address, "0xaaa");
        assert_eq!(records[1].wallet_address, "0xccc");
    }
}
