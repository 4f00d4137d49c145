use crate::enums::{AccountKind, OptionKind, Protocol};
use crate::error::CoreError;
use crate::layout::{self, RawMarket, RawOptionsGroup, RawReserve, RawVault};
use solana_sdk::pubkey::Pubkey;

/// A lending-market reserve the vault supplies liquidity to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LendingReserve {
    pub address: Pubkey,
    pub lending_market: Pubkey,
    pub liquidity_mint: Pubkey,
    pub liquidity_supply: Pubkey,
    pub liquidity_oracle: Pubkey,
    pub collateral_mint: Pubkey,
    pub collateral_supply: Pubkey,
    pub available_liquidity: u64,
    pub collateral_mint_supply: u64,
    pub liquidity_decimals: u8,
}

impl LendingReserve {
    pub fn decode(address: Pubkey, data: &[u8]) -> Result<Self, CoreError> {
        let raw = layout::load::<RawReserve>(data)?;
        Ok(Self {
            address,
            lending_market: Pubkey::new_from_array(raw.lending_market),
            liquidity_mint: Pubkey::new_from_array(raw.liquidity_mint),
            liquidity_supply: Pubkey::new_from_array(raw.liquidity_supply),
            liquidity_oracle: Pubkey::new_from_array(raw.liquidity_oracle),
            collateral_mint: Pubkey::new_from_array(raw.collateral_mint),
            collateral_supply: Pubkey::new_from_array(raw.collateral_supply),
            available_liquidity: raw.available_liquidity,
            collateral_mint_supply: raw.collateral_mint_supply,
            liquidity_decimals: raw.liquidity_decimals,
        })
    }
}

/// A strike slot. `is_set` is false until the venue has assigned a strike.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Strike {
    pub is_set: bool,
    pub value: u64,
}

/// One tradable product of an options group, backed by an order-book market.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Product {
    pub market: Pubkey,
    pub strike: Strike,
    pub kind: OptionKind,
    pub dirty: bool,
}

/// The options venue's per-underlying group: oracle, margin vaults and products.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionsGroup {
    pub address: Pubkey,
    pub underlying_mint: Pubkey,
    /// Mint of the margin collateral (USDC).
    pub quote_mint: Pubkey,
    pub oracle: Pubkey,
    pub vault: Pubkey,
    pub insurance_vault: Pubkey,
    pub products: Vec<Product>,
}

impl OptionsGroup {
    pub fn decode(address: Pubkey, data: &[u8]) -> Result<Self, CoreError> {
        let raw = layout::load::<RawOptionsGroup>(data)?;
        let products = raw
            .products
            .iter()
            .map(|p| {
                Ok(Product {
                    market: Pubkey::new_from_array(p.market),
                    strike: Strike {
                        is_set: p.strike_is_set != 0,
                        value: p.strike_value,
                    },
                    kind: OptionKind::try_from(p.kind)?,
                    dirty: p.dirty != 0,
                })
            })
            .collect::<Result<Vec<Product>, CoreError>>()?;

        Ok(Self {
            address,
            underlying_mint: Pubkey::new_from_array(raw.underlying_mint),
            quote_mint: Pubkey::new_from_array(raw.quote_mint),
            oracle: Pubkey::new_from_array(raw.oracle),
            vault: Pubkey::new_from_array(raw.vault),
            insurance_vault: Pubkey::new_from_array(raw.insurance_vault),
            products,
        })
    }
}

/// An order-book market and the queues/vaults an order touches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderbookMarket {
    pub address: Pubkey,
    pub base_mint: Pubkey,
    pub quote_mint: Pubkey,
    pub base_vault: Pubkey,
    pub quote_vault: Pubkey,
    pub request_queue: Pubkey,
    pub event_queue: Pubkey,
    pub bids: Pubkey,
    pub asks: Pubkey,
    pub vault_signer_nonce: u64,
    pub base_lot_size: u64,
    pub quote_lot_size: u64,
}

impl OrderbookMarket {
    pub fn decode(address: Pubkey, data: &[u8]) -> Result<Self, CoreError> {
        let raw = layout::load::<RawMarket>(data)?;
        Ok(Self {
            address,
            base_mint: Pubkey::new_from_array(raw.base_mint),
            quote_mint: Pubkey::new_from_array(raw.quote_mint),
            base_vault: Pubkey::new_from_array(raw.base_vault),
            quote_vault: Pubkey::new_from_array(raw.quote_vault),
            request_queue: Pubkey::new_from_array(raw.request_queue),
            event_queue: Pubkey::new_from_array(raw.event_queue),
            bids: Pubkey::new_from_array(raw.bids),
            asks: Pubkey::new_from_array(raw.asks),
            vault_signer_nonce: raw.vault_signer_nonce,
            base_lot_size: raw.base_lot_size,
            quote_lot_size: raw.quote_lot_size,
        })
    }
}

/// Any metadata account one of the protocol loaders knows how to decode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodedAccount {
    LendingReserve(LendingReserve),
    OptionsGroup(OptionsGroup),
    OrderbookMarket(OrderbookMarket),
}

impl DecodedAccount {
    /// Decodes an account published by `protocol`.
    ///
    /// Returns `Ok(None)` when the discriminator belongs to none of the layouts the
    /// protocol publishes (user accounts, queues, and so on), so a program scan can
    /// skip them.
    pub fn decode(
        protocol: Protocol,
        address: Pubkey,
        data: &[u8],
    ) -> Result<Option<Self>, CoreError> {
        let decoded = match protocol {
            Protocol::Lending if layout::matches::<RawReserve>(data) => {
                DecodedAccount::LendingReserve(LendingReserve::decode(address, data)?)
            }
            Protocol::Options if layout::matches::<RawOptionsGroup>(data) => {
                DecodedAccount::OptionsGroup(OptionsGroup::decode(address, data)?)
            }
            Protocol::Orderbook if layout::matches::<RawMarket>(data) => {
                DecodedAccount::OrderbookMarket(OrderbookMarket::decode(address, data)?)
            }
            _ => return Ok(None),
        };
        Ok(Some(decoded))
    }

    pub fn kind(&self) -> AccountKind {
        match self {
            DecodedAccount::LendingReserve(_) => AccountKind::LendingReserve,
            DecodedAccount::OptionsGroup(_) => AccountKind::OptionsGroup,
            DecodedAccount::OrderbookMarket(_) => AccountKind::OrderbookMarket,
        }
    }

    pub fn address(&self) -> &Pubkey {
        match self {
            DecodedAccount::LendingReserve(r) => &r.address,
            DecodedAccount::OptionsGroup(g) => &g.address,
            DecodedAccount::OrderbookMarket(m) => &m.address,
        }
    }
}

/// Live state of one vault, read fresh from the ledger before every composition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VaultState {
    pub address: Pubkey,
    pub authority: Pubkey,
    pub reserve: Pubkey,
    pub options_group: Pubkey,
    pub shares_mint: Pubkey,
    pub collateral_vault: Pubkey,
    pub underlying_vault: Pubkey,
    pub usdc_vault: Pubkey,
    pub margin_account: Pubkey,
    pub deposit_limit: u64,
    pub total_deposit: u64,
    pub fee_bps: u16,
    pub bump: u8,
    pub executor_bump: u8,
    pub mint_bump: u8,
}

impl VaultState {
    pub fn decode(address: Pubkey, data: &[u8]) -> Result<Self, CoreError> {
        let raw = layout::load::<RawVault>(data)?;
        let state = Self {
            address,
            authority: Pubkey::new_from_array(raw.authority),
            reserve: Pubkey::new_from_array(raw.reserve),
            options_group: Pubkey::new_from_array(raw.options_group),
            shares_mint: Pubkey::new_from_array(raw.shares_mint),
            collateral_vault: Pubkey::new_from_array(raw.collateral_vault),
            underlying_vault: Pubkey::new_from_array(raw.underlying_vault),
            usdc_vault: Pubkey::new_from_array(raw.usdc_vault),
            margin_account: Pubkey::new_from_array(raw.margin_account),
            deposit_limit: raw.deposit_limit,
            total_deposit: raw.total_deposit,
            fee_bps: raw.fee_bps,
            bump: raw.bump,
            executor_bump: raw.executor_bump,
            mint_bump: raw.mint_bump,
        };

        // A vault that points at the default address has not been initialized.
        if state.reserve == Pubkey::default() || state.options_group == Pubkey::default() {
            return Err(CoreError::InvalidInput(
                "vault".to_string(),
                format!("{address} has no reserve or options group assigned"),
            ));
        }
        Ok(state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{encode, RawProduct};
    use bytemuck::Zeroable;

    #[test]
    fn options_group_decodes_products_in_slot_order() {
        let mut raw = RawOptionsGroup::zeroed();
        raw.products[0] = RawProduct {
            market: [1u8; 32],
            strike_value: 100,
            strike_is_set: 1,
            kind: OptionKind::Put.to_u8(),
            dirty: 0,
            _padding: [0; 5],
        };
        raw.products[1] = RawProduct {
            market: [2u8; 32],
            strike_value: 150,
            strike_is_set: 1,
            kind: OptionKind::Call.to_u8(),
            dirty: 1,
            _padding: [0; 5],
        };
        let address = Pubkey::new_unique();
        let group = OptionsGroup::decode(address, &encode(&raw)).unwrap();

        assert_eq!(group.products.len(), layout::MAX_PRODUCTS);
        assert_eq!(group.products[0].kind, OptionKind::Put);
        assert_eq!(group.products[1].strike, Strike { is_set: true, value: 150 });
        assert!(group.products[1].dirty);
        assert_eq!(group.products[2].kind, OptionKind::Uninitialized);
    }

    #[test]
    fn options_group_rejects_unknown_kind() {
        let mut raw = RawOptionsGroup::zeroed();
        raw.products[3].kind = 9;
        let err = OptionsGroup::decode(Pubkey::new_unique(), &encode(&raw)).unwrap_err();
        assert_eq!(err, CoreError::InvalidOptionKind(9));
    }

    #[test]
    fn decode_skips_layouts_foreign_to_the_protocol() {
        let data = encode(&RawMarket::zeroed());
        let skipped =
            DecodedAccount::decode(Protocol::Lending, Pubkey::new_unique(), &data).unwrap();
        assert!(skipped.is_none());

        let decoded = DecodedAccount::decode(Protocol::Orderbook, Pubkey::new_unique(), &data)
            .unwrap()
            .unwrap();
        assert_eq!(decoded.kind(), AccountKind::OrderbookMarket);
    }

    #[test]
    fn uninitialized_vault_is_rejected() {
        let data = encode(&RawVault::zeroed());
        let err = VaultState::decode(Pubkey::new_unique(), &data).unwrap_err();
        assert!(matches!(err, CoreError::InvalidInput(..)));
    }
}
