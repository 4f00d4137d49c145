use crate::error::ConfigError;
use core_types::Pubkey;
use serde::Deserialize;
use std::path::PathBuf;
use std::str::FromStr;

/// The root configuration structure for the entire application.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub rpc: RpcConfig,
    pub programs: ProgramsConfig,
    #[serde(default)]
    pub loaders: LoadersConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Parses the configured program ids into addresses.
    pub fn program_ids(&self) -> Result<ProgramIds, ConfigError> {
        Ok(ProgramIds {
            vault: parse_address("programs.vault", &self.programs.vault)?,
            lending: parse_address("programs.lending", &self.programs.lending)?,
            options: parse_address("programs.options", &self.programs.options)?,
            orderbook: parse_address("programs.orderbook", &self.programs.orderbook)?,
        })
    }
}

/// Connection parameters for the ledger RPC endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct RpcConfig {
    pub url: String,
    /// Commitment used for blockhash fetches, reads and simulations.
    #[serde(default)]
    pub commitment: Commitment,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum Commitment {
    Processed,
    #[default]
    Confirmed,
    Finalized,
}

/// Base58 program ids of the vault program and the three protocols it integrates.
#[derive(Debug, Clone, Deserialize)]
pub struct ProgramsConfig {
    pub vault: String,
    pub lending: String,
    pub options: String,
    pub orderbook: String,
}

/// Parsed program ids, handed to the instruction composer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgramIds {
    pub vault: Pubkey,
    pub lending: Pubkey,
    pub options: Pubkey,
    pub orderbook: Pubkey,
}

/// Per-protocol loader settings.
///
/// An empty account list means "scan every account owned by the protocol's program".
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoadersConfig {
    #[serde(default)]
    pub orderbook: LoaderScope,
    #[serde(default)]
    pub lending: LoaderScope,
    #[serde(default)]
    pub options: LoaderScope,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoaderScope {
    #[serde(default)]
    pub accounts: Vec<String>,
}

impl LoaderScope {
    pub fn addresses(&self) -> Result<Vec<Pubkey>, ConfigError> {
        self.accounts
            .iter()
            .map(|a| parse_address("loaders.accounts", a))
            .collect()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// A bare level ("debug") or a full `EnvFilter` directive string.
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub json: bool,
    /// When set, logs are also written to a daily-rolling file in this directory.
    #[serde(default)]
    pub directory: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
            directory: None,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn parse_address(field: &str, value: &str) -> Result<Pubkey, ConfigError> {
    Pubkey::from_str(value.trim()).map_err(|e| ConfigError::InvalidAddress {
        field: field.to_string(),
        value: value.to_string(),
        reason: e.to_string(),
    })
}
