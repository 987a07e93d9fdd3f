use thiserror::Error;

/// Failures that terminate a fetch cycle.
///
/// Per-pair fetch failures, empty payloads and unparseable numeric fields
/// are not listed here: those are logged and skipped locally so that one bad
/// pair or row never blocks the rest of the cycle.
#[derive(Debug, Error)]
pub enum PortfolioError {
    #[error("no wallet addresses entered")]
    NoWalletsEntered,

    #[error("no chains selected")]
    NoChainsSelected,

    #[error("unknown chain identifier: {0}")]
    UnknownChain(String),

    #[error("no Covalent API key: set COVALENT_API_KEY or send one with the request")]
    MissingApiKey,

    #[error("token {coin} on {chain} (wallet {wallet}) has no contract_decimals, cannot scale its balance")]
    MissingDecimals {
        coin: String,
        chain: String,
        wallet: String,
    },
}
