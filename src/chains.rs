// src/chains.rs
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::PortfolioError;

/// Networks the balance API can be queried on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Chain {
    EthMainnet,
    BscMainnet,
    MaticMainnet,
    OptimismMainnet,
    AvalancheMainnet,
    ArbitrumMainnet,
}

impl Chain {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Chain::EthMainnet => "eth-mainnet",
            Chain::BscMainnet => "bsc-mainnet",
            Chain::MaticMainnet => "matic-mainnet",
            Chain::OptimismMainnet => "optimism-mainnet",
            Chain::AvalancheMainnet => "avalanche-mainnet",
            Chain::ArbitrumMainnet => "arbitrum-mainnet",
        }
    }

    /// Every supported chain, in the order the dashboard lists them.
    pub const fn all() -> [Chain; 6] {
        [
            Chain::EthMainnet,
            Chain::BscMainnet,
            Chain::MaticMainnet,
            Chain::OptimismMainnet,
            Chain::AvalancheMainnet,
            Chain::ArbitrumMainnet,
        ]
    }
}

impl fmt::Display for Chain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Chain {
    type Err = PortfolioError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "eth-mainnet" => Ok(Chain::EthMainnet),
            "bsc-mainnet" => Ok(Chain::BscMainnet),
            "matic-mainnet" => Ok(Chain::MaticMainnet),
            "optimism-mainnet" => Ok(Chain::OptimismMainnet),
            "avalanche-mainnet" => Ok(Chain::AvalancheMainnet),
            "arbitrum-mainnet" => Ok(Chain::ArbitrumMainnet),
            other => Err(PortfolioError::UnknownChain(other.to_string())),
        }
    }
}
