//! Ledger configuration.
//!
//! The contract identity and the airdrop symbol are fixed per ledger
//! instance and handed to [`crate::TokenLedger::new`].

use anyhow::{Context, bail};
use serde::{Deserialize, Serialize};

use rankblock_core::{AccountName, Symbol};

pub const CONTRACT_ENV: &str = "RANKBLOCK_CONTRACT";
pub const AIRDROP_SYMBOL_ENV: &str = "RANKBLOCK_AIRDROP_SYMBOL";
pub const MAX_MEMO_BYTES_ENV: &str = "RANKBLOCK_MAX_MEMO_BYTES";

pub const DEFAULT_CONTRACT: &str = "rankblock";
pub const DEFAULT_MAX_MEMO_BYTES: usize = 256;

fn default_airdrop_symbol() -> Symbol {
    Symbol::new(4, "RB")
}

fn default_max_memo_bytes() -> usize {
    DEFAULT_MAX_MEMO_BYTES
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerConfig {
    /// Account allowed to create tokens.
    pub contract: AccountName,
    /// Symbol under which `provision_account` registers holders.
    #[serde(default = "default_airdrop_symbol")]
    pub airdrop_symbol: Symbol,
    /// Upper bound on memo length, in bytes. May be lowered, never raised
    /// above [`DEFAULT_MAX_MEMO_BYTES`].
    #[serde(default = "default_max_memo_bytes")]
    pub max_memo_bytes: usize,
}

impl LedgerConfig {
    pub fn new(contract: AccountName) -> Self {
        Self {
            contract,
            airdrop_symbol: default_airdrop_symbol(),
            max_memo_bytes: DEFAULT_MAX_MEMO_BYTES,
        }
    }

    pub fn with_airdrop_symbol(mut self, symbol: Symbol) -> Self {
        self.airdrop_symbol = symbol;
        self
    }

    /// Effective memo limit in bytes, never above [`DEFAULT_MAX_MEMO_BYTES`].
    pub fn memo_limit(&self) -> usize {
        self.max_memo_bytes.min(DEFAULT_MAX_MEMO_BYTES)
    }

    /// Load from `RANKBLOCK_*` environment variables.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Parse a JSON document (`{"contract": "rankblock", "airdrop_symbol": "4,RB"}`).
    pub fn from_json(json: &str) -> anyhow::Result<Self> {
        let config: Self = serde_json::from_str(json).context("parsing ledger config")?;
        config.validate()?;
        Ok(config)
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let contract = match lookup(CONTRACT_ENV) {
            Some(raw) => raw,
            None => {
                tracing::warn!("{CONTRACT_ENV} not set; using '{DEFAULT_CONTRACT}'");
                DEFAULT_CONTRACT.to_string()
            }
        };
        let contract =
            AccountName::new(contract).with_context(|| format!("invalid {CONTRACT_ENV}"))?;

        let mut config = Self::new(contract);

        if let Some(raw) = lookup(AIRDROP_SYMBOL_ENV) {
            config.airdrop_symbol = raw
                .parse()
                .with_context(|| format!("invalid {AIRDROP_SYMBOL_ENV}"))?;
        }
        if let Some(raw) = lookup(MAX_MEMO_BYTES_ENV) {
            config.max_memo_bytes = raw
                .trim()
                .parse()
                .with_context(|| format!("invalid {MAX_MEMO_BYTES_ENV}"))?;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if !self.airdrop_symbol.is_valid() {
            bail!("airdrop symbol {} is not valid", self.airdrop_symbol);
        }
        if self.max_memo_bytes == 0 || self.max_memo_bytes > DEFAULT_MAX_MEMO_BYTES {
            bail!(
                "max_memo_bytes must be within 1..={DEFAULT_MAX_MEMO_BYTES}, got {}",
                self.max_memo_bytes
            );
        }
        Ok(())
    }
}
