//! Raw, fixed-size account layouts as they sit on the ledger.
//!
//! Every account starts with an 8-byte discriminator, `sha256("account:<Name>")[..8]`,
//! followed by a `#[repr(C)]` body read zero-copy through `bytemuck`. The body is
//! read unaligned because RPC payloads give no alignment guarantee.

use crate::error::CoreError;
use bytemuck::{Pod, Zeroable};
use sha2::{Digest, Sha256};

pub const DISCRIMINATOR_LEN: usize = 8;

/// Product slots per options group (two expiry series of 23 products).
pub const MAX_PRODUCTS: usize = 46;

/// A fixed-size account body that can be recognised by its discriminator.
pub trait AccountLayout: Pod {
    const NAME: &'static str;

    fn discriminator() -> [u8; DISCRIMINATOR_LEN] {
        account_discriminator(Self::NAME)
    }
}

pub fn account_discriminator(name: &str) -> [u8; DISCRIMINATOR_LEN] {
    let digest = Sha256::digest(format!("account:{name}").as_bytes());
    let mut out = [0u8; DISCRIMINATOR_LEN];
    out.copy_from_slice(&digest[..DISCRIMINATOR_LEN]);
    out
}

/// Returns true when `data` carries the discriminator of layout `T`.
pub fn matches<T: AccountLayout>(data: &[u8]) -> bool {
    data.len() >= DISCRIMINATOR_LEN && data[..DISCRIMINATOR_LEN] == T::discriminator()
}

/// Decodes the body of an account of layout `T`. Trailing bytes are ignored.
pub fn load<T: AccountLayout>(data: &[u8]) -> Result<T, CoreError> {
    let required = DISCRIMINATOR_LEN + std::mem::size_of::<T>();
    if data.len() < required {
        return Err(CoreError::AccountTooSmall {
            layout: T::NAME,
            required,
            found: data.len(),
        });
    }
    if !matches::<T>(data) {
        return Err(CoreError::DiscriminatorMismatch(T::NAME));
    }
    Ok(bytemuck::pod_read_unaligned(&data[DISCRIMINATOR_LEN..required]))
}

/// Serializes a body with its discriminator, the inverse of [`load`].
pub fn encode<T: AccountLayout>(body: &T) -> Vec<u8> {
    let mut data = Vec::with_capacity(DISCRIMINATOR_LEN + std::mem::size_of::<T>());
    data.extend_from_slice(&T::discriminator());
    data.extend_from_slice(bytemuck::bytes_of(body));
    data
}

#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct RawVault {
    pub authority: [u8; 32],
    pub reserve: [u8; 32],
    pub options_group: [u8; 32],
    pub shares_mint: [u8; 32],
    pub collateral_vault: [u8; 32],
    pub underlying_vault: [u8; 32],
    pub usdc_vault: [u8; 32],
    pub margin_account: [u8; 32],
    pub deposit_limit: u64,
    pub total_deposit: u64,
    pub fee_bps: u16,
    pub bump: u8,
    pub executor_bump: u8,
    pub mint_bump: u8,
    pub _padding: [u8; 3],
}

impl AccountLayout for RawVault {
    const NAME: &'static str = "Vault";
}

#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct RawReserve {
    pub lending_market: [u8; 32],
    pub liquidity_mint: [u8; 32],
    pub liquidity_supply: [u8; 32],
    pub liquidity_oracle: [u8; 32],
    pub collateral_mint: [u8; 32],
    pub collateral_supply: [u8; 32],
    pub available_liquidity: u64,
    pub collateral_mint_supply: u64,
    pub liquidity_decimals: u8,
    pub _padding: [u8; 7],
}

impl AccountLayout for RawReserve {
    const NAME: &'static str = "Reserve";
}

#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct RawProduct {
    pub market: [u8; 32],
    pub strike_value: u64,
    pub strike_is_set: u8,
    pub kind: u8,
    pub dirty: u8,
    pub _padding: [u8; 5],
}

#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct RawOptionsGroup {
    pub underlying_mint: [u8; 32],
    pub quote_mint: [u8; 32],
    pub oracle: [u8; 32],
    pub vault: [u8; 32],
    pub insurance_vault: [u8; 32],
    pub products: [RawProduct; MAX_PRODUCTS],
}

impl AccountLayout for RawOptionsGroup {
    const NAME: &'static str = "OptionsGroup";
}

#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct RawMarket {
    pub base_mint: [u8; 32],
    pub quote_mint: [u8; 32],
    pub base_vault: [u8; 32],
    pub quote_vault: [u8; 32],
    pub request_queue: [u8; 32],
    pub event_queue: [u8; 32],
    pub bids: [u8; 32],
    pub asks: [u8; 32],
    pub vault_signer_nonce: u64,
    pub base_lot_size: u64,
    pub quote_lot_size: u64,
}

impl AccountLayout for RawMarket {
    const NAME: &'static str = "Market";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_rejects_short_data() {
        let err = load::<RawMarket>(&[0u8; 12]).unwrap_err();
        assert!(matches!(err, CoreError::AccountTooSmall { layout: "Market", .. }));
    }

    #[test]
    fn load_rejects_foreign_discriminator() {
        // Pad so the size check passes and the discriminator check is what fails.
        let mut padded = encode(&RawReserve::zeroed());
        padded.resize(DISCRIMINATOR_LEN + std::mem::size_of::<RawMarket>(), 0);
        let err = load::<RawMarket>(&padded).unwrap_err();
        assert_eq!(err, CoreError::DiscriminatorMismatch("Market"));
    }

    #[test]
    fn discriminators_are_distinct() {
        let all = [
            RawVault::discriminator(),
            RawReserve::discriminator(),
            RawOptionsGroup::discriminator(),
            RawMarket::discriminator(),
        ];
        for (i, a) in all.iter().enumerate() {
            for b in &all[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn encoded_body_decodes_from_unaligned_buffer() {
        let mut raw = RawMarket::zeroed();
        raw.vault_signer_nonce = 7;
        raw.bids = [3u8; 32];
        let mut data = vec![0xAA];
        data.extend(encode(&raw));
        let decoded = load::<RawMarket>(&data[1..]).unwrap();
        assert_eq!(decoded.vault_signer_nonce, 7);
        assert_eq!(decoded.bids, [3u8; 32]);
    }
}
