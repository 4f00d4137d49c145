use serde::{Deserialize, Serialize};
use std::fmt;

/// The three external protocols whose metadata the registry caches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Protocol {
    Orderbook,
    Lending,
    Options,
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Protocol::Orderbook => write!(f, "orderbook"),
            Protocol::Lending => write!(f, "lending"),
            Protocol::Options => write!(f, "options"),
        }
    }
}

/// Discriminates the variants of `DecodedAccount` without borrowing the payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AccountKind {
    LendingReserve,
    OptionsGroup,
    OrderbookMarket,
}

impl fmt::Display for AccountKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AccountKind::LendingReserve => write!(f, "lending reserve"),
            AccountKind::OptionsGroup => write!(f, "options group"),
            AccountKind::OrderbookMarket => write!(f, "orderbook market"),
        }
    }
}

/// Option kind as stored in a product slot of an options group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OptionKind {
    Uninitialized,
    Call,
    Put,
    Future,
}

impl OptionKind {
    pub fn to_u8(self) -> u8 {
        match self {
            OptionKind::Uninitialized => 0,
            OptionKind::Call => 1,
            OptionKind::Put => 2,
            OptionKind::Future => 3,
        }
    }
}

impl TryFrom<u8> for OptionKind {
    type Error = crate::CoreError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(OptionKind::Uninitialized),
            1 => Ok(OptionKind::Call),
            2 => Ok(OptionKind::Put),
            3 => Ok(OptionKind::Future),
            other => Err(crate::CoreError::InvalidOptionKind(other)),
        }
    }
}

/// Side of the order book.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Bid,
    Ask,
}

impl Side {
    /// Wire encoding used by the options venue (0 is reserved for "uninitialized").
    pub fn to_u8(self) -> u8 {
        match self {
            Side::Bid => 1,
            Side::Ask => 2,
        }
    }
}

/// Whether an operation stops after the dry run or is also committed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionMode {
    #[default]
    Simulate,
    Commit,
}

impl ExecutionMode {
    pub fn from_commit_flag(commit: bool) -> Self {
        if commit { ExecutionMode::Commit } else { ExecutionMode::Simulate }
    }

    pub fn commits(&self) -> bool {
        matches!(self, ExecutionMode::Commit)
    }
}
