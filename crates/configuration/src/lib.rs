use crate::error::ConfigError;
use std::path::Path;

// Declare the modules that make up this crate.
pub mod error;
pub mod logging;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use logging::init_logging;
pub use settings::{
    Commitment, Config, LoaderScope, LoadersConfig, LoggingConfig, ProgramIds, ProgramsConfig,
    RpcConfig,
};

/// Loads the application configuration from a TOML file layered with environment overrides.
///
/// Environment variables use the `VAULT` prefix and `__` as the section separator,
/// so `VAULT_RPC__URL` overrides `[rpc] url`.
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let builder = config::Config::builder()
        .add_source(config::File::from(path))
        .add_source(
            config::Environment::with_prefix("VAULT")
                .prefix_separator("_")
                .separator("__"),
        )
        .build()?;

    // Attempt to deserialize the entire configuration into our `Config` struct
    let config = builder.try_deserialize::<Config>()?;

    // Fail at startup rather than on the first operation.
    config.program_ids()?;
    for scope in [&config.loaders.orderbook, &config.loaders.lending, &config.loaders.options] {
        scope.addresses()?;
    }

    Ok(config)
}
