use dotenvy::dotenv;
use eyre::Result;
use std::env;
use std::time::Duration;
use tracing::info;

#[derive(Debug, Clone)]
pub struct Config {
    /// Fallback credential; a key sent with the request takes precedence.
    pub api_key: Option<String>,
    pub base_url: String,
    pub port: u16,
    pub request_timeout: Duration,
    pub fetch_concurrency: usize,
}

pub fn load() -> Result<Config> {
    dotenv().ok();

    // Optional here: the dashboard can supply a key per request instead
    let api_key = env::var("COVALENT_API_KEY")
        .ok()
        .filter(|k| !k.trim().is_empty());

    let base_url = env::var("COVALENT_API_URL")
        .unwrap_or_else(|_| "https://api.covalenthq.com".to_string());

    // API port (default: 8080)
    let port = env::var("PORT")
        .unwrap_or_else(|_| "8080".to_string())
        .parse()
        .unwrap_or(8080);

    // Per-request timeout in seconds (default: 15)
    let timeout_secs: u64 = env::var("REQUEST_TIMEOUT_SECS")
        .unwrap_or_else(|_| "15".to_string())
        .parse()
        .unwrap_or(15);

    // Max in-flight balance requests (default: 4)
    let fetch_concurrency: usize = env::var("FETCH_CONCURRENCY")
        .unwrap_or_else(|_| "4".to_string())
        .parse()
        .unwrap_or(4);

    if timeout_secs == 0 {
        eyre::bail!("REQUEST_TIMEOUT_SECS must be non-zero");
    }
    if fetch_concurrency == 0 {
        eyre::bail!("FETCH_CONCURRENCY must be non-zero");
    }

    let cfg = Config {
        api_key,
        base_url: base_url.trim_end_matches('/').to_string(),
        port,
        request_timeout: Duration::from_secs(timeout_secs),
        fetch_concurrency,
    };

    info!(
        "Loaded config: base_url={}, port={}, timeout={}s, concurrency={}, env_api_key={}",
        cfg.base_url,
        cfg.port,
        timeout_secs,
        cfg.fetch_concurrency,
        if cfg.api_key.is_some() { "set" } else { "unset" }
    );

    Ok(cfg)
}
