//! Shared vocabulary for the vault client: the decoded protocol accounts, the
//! on-ledger vault state, and the small enums every other crate speaks.

pub mod accounts;
pub mod amounts;
pub mod enums;
pub mod error;
pub mod layout;

// Re-export the core types to provide a clean public API.
pub use accounts::{
    DecodedAccount, LendingReserve, OptionsGroup, OrderbookMarket, Product, Strike, VaultState,
};
pub use amounts::{from_native, to_native, PLATFORM_PRECISION};
pub use enums::{AccountKind, ExecutionMode, OptionKind, Protocol, Side};
pub use error::CoreError;
pub use solana_sdk::pubkey::Pubkey;
