use reqwest::Client;
use serde_json::Value;

const BASE_URL: &str = "https://api.covalenthq.com";
const DEFAULT_WALLET: &str = "0xfc43f5f9dd45258b3aff31bdbe6561d97e8b71de";
const DEFAULT_CHAIN: &str = "eth-mainnet";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let api_key = std::env::var("COVALENT_API_KEY")?;
    let wallet = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_WALLET.to_string());
    let chain = std::env::args()
        .nth(2)
        .unwrap_or_else(|| DEFAULT_CHAIN.to_string());

    println!("Fetching balances for {wallet} on {chain}...");

    let url =
        format!("{BASE_URL}/v1/{chain}/address/{wallet}/balances_v2/?quote-currency=USD");

    let client = Client::new();
    let resp = client.get(&url).basic_auth(&api_key, Some("")).send().await?;
    println!("Status: {}", resp.status());

    let body: Value = resp.json().await?;
    match body.pointer("/data/items") {
        Some(Value::Array(items)) => {
            println!("Fetched {} items", items.len());
            for item in items.iter().take(5) {
                println!(
                    "{} | balance: {} | decimals: {} | quote: {}",
                    item["contract_ticker_symbol"],
                    item["balance"],
                    item["contract_decimals"],
                    item["pretty_quote"]
                );
            }
        }
        _ => println!("No items in response: {body:#}"),
    }

    Ok(())
}
