//! # Instruction Composer
//!
//! One routine per vault operation. Each routine reads the vault's live state from
//! the ledger, resolves the protocol accounts it needs through the registry, and
//! returns the ordered instructions for the executor. Nothing here signs or sends.

use crate::error::ComposeError;
use crate::instructions::VaultContext;
use configuration::ProgramIds;
use core_types::{Pubkey, Side, VaultState};
use ledger_client::Ledger;
use ledger_client::error::LedgerError;
use registry::AccountRegistry;
use solana_sdk::instruction::Instruction;
use solana_sdk::signature::{Keypair, Signer};
use std::sync::Arc;

pub mod error;
pub mod instructions;
pub mod pda;
pub mod products;

pub use instructions::{BidOrder, CreateVaultArgs};
pub use products::select_bid_product;

/// Fee ceiling of a vault, in basis points.
pub const MAX_FEE_BPS: u16 = 10_000;

/// The address an operation acts as: the first signer, which also pays the fee.
pub fn operator(signers: &[&Keypair]) -> Result<Pubkey, ComposeError> {
    signers
        .first()
        .map(|signer| signer.pubkey())
        .ok_or(ComposeError::MissingSigner)
}

fn require_positive(field: &'static str, amount: u64) -> Result<(), ComposeError> {
    if amount == 0 {
        return Err(ComposeError::InvalidAmount { field });
    }
    Ok(())
}

pub struct InstructionComposer {
    ledger: Arc<dyn Ledger>,
    programs: ProgramIds,
}

impl InstructionComposer {
    pub fn new(ledger: Arc<dyn Ledger>, programs: ProgramIds) -> Self {
        Self { ledger, programs }
    }

    pub fn programs(&self) -> &ProgramIds {
        &self.programs
    }

    /// Reads and decodes the vault. Never cached: every composition sees the
    /// ledger as it is now.
    pub async fn load_vault(&self, address: &Pubkey) -> Result<VaultState, ComposeError> {
        let data = match self.ledger.fetch_account_data(address).await {
            Ok(data) => data,
            Err(LedgerError::AccountNotFound(_)) => {
                return Err(ComposeError::VaultNotFound(*address));
            }
            Err(e) => return Err(e.into()),
        };
        VaultState::decode(*address, &data).map_err(|source| ComposeError::MalformedVault {
            address: *address,
            source,
        })
    }

    pub fn create_vault(
        &self,
        registry: &AccountRegistry,
        authority: &Pubkey,
        args: &CreateVaultArgs,
    ) -> Result<Vec<Instruction>, ComposeError> {
        if args.fee_bps > MAX_FEE_BPS {
            return Err(ComposeError::InvalidFee(args.fee_bps));
        }
        let reserve = registry.reserve(&args.reserve)?;
        let group = registry.options_group(&args.options_group)?;

        let (vault, _) = pda::vault_address(&self.programs.vault, &reserve.address, authority);
        tracing::debug!(
            %vault,
            reserve = %reserve.address,
            group = %group.address,
            "Composing vault creation"
        );
        Ok(vec![instructions::initialize_vault(
            &self.programs,
            authority,
            reserve,
            group,
            args,
        )])
    }

    pub async fn deposit(
        &self,
        registry: &AccountRegistry,
        vault: &Pubkey,
        user: &Pubkey,
        amount: u64,
    ) -> Result<Vec<Instruction>, ComposeError> {
        require_positive("deposit amount", amount)?;
        let state = self.load_vault(vault).await?;
        let reserve = registry.reserve(&state.reserve)?;
        let ctx = VaultContext::new(&self.programs, &state);
        Ok(vec![instructions::deposit(&ctx, reserve, user, amount)])
    }

    pub async fn withdraw(
        &self,
        registry: &AccountRegistry,
        vault: &Pubkey,
        user: &Pubkey,
        shares: u64,
    ) -> Result<Vec<Instruction>, ComposeError> {
        require_positive("withdraw amount", shares)?;
        let state = self.load_vault(vault).await?;
        let reserve = registry.reserve(&state.reserve)?;
        let ctx = VaultContext::new(&self.programs, &state);
        Ok(vec![instructions::withdraw(&ctx, reserve, user, shares)])
    }

    pub async fn init_open_orders(
        &self,
        registry: &AccountRegistry,
        vault: &Pubkey,
        authority: &Pubkey,
        market: &Pubkey,
    ) -> Result<Vec<Instruction>, ComposeError> {
        let state = self.load_vault(vault).await?;
        let group = registry.options_group(&state.options_group)?;
        let market = registry.market(market)?;
        let ctx = VaultContext::new(&self.programs, &state);
        Ok(vec![instructions::initialize_open_orders(
            &ctx, authority, group, market,
        )])
    }

    pub async fn harvest_yield(
        &self,
        registry: &AccountRegistry,
        vault: &Pubkey,
        authority: &Pubkey,
    ) -> Result<Vec<Instruction>, ComposeError> {
        let state = self.load_vault(vault).await?;
        let reserve = registry.reserve(&state.reserve)?;
        let ctx = VaultContext::new(&self.programs, &state);
        Ok(vec![instructions::harvest_yield(&ctx, authority, reserve)])
    }

    pub async fn reinvest_lending(
        &self,
        registry: &AccountRegistry,
        vault: &Pubkey,
        authority: &Pubkey,
    ) -> Result<Vec<Instruction>, ComposeError> {
        let state = self.load_vault(vault).await?;
        let reserve = registry.reserve(&state.reserve)?;
        let ctx = VaultContext::new(&self.programs, &state);
        Ok(vec![instructions::reinvest_lending(&ctx, authority, reserve)])
    }

    pub async fn reinvest_options(
        &self,
        registry: &AccountRegistry,
        vault: &Pubkey,
        authority: &Pubkey,
        amount: u64,
    ) -> Result<Vec<Instruction>, ComposeError> {
        require_positive("reinvest amount", amount)?;
        let state = self.load_vault(vault).await?;
        let group = registry.options_group(&state.options_group)?;
        let ctx = VaultContext::new(&self.programs, &state);
        Ok(vec![instructions::reinvest_options(
            &ctx, authority, group, amount,
        )])
    }

    /// Composes a bid: both sides of the product's pricing are refreshed before the
    /// order is placed, in one atomic transaction.
    pub async fn place_bid(
        &self,
        registry: &AccountRegistry,
        vault: &Pubkey,
        authority: &Pubkey,
        order: &BidOrder,
    ) -> Result<Vec<Instruction>, ComposeError> {
        let state = self.load_vault(vault).await?;
        let group = registry.options_group(&state.options_group)?;
        let (index, product) = select_bid_product(group, order.strike, order.kind).ok_or(
            ComposeError::NoMatchingProduct {
                group: group.address,
                strike: order.strike,
                kind: order.kind,
            },
        )?;
        let market = registry.market(&product.market)?;
        // Bounded by MAX_PRODUCTS in the selection.
        let index = index as u8;

        tracing::debug!(
            %vault,
            market = %market.address,
            product = index,
            price = order.price,
            size = order.size,
            "Composing bid"
        );
        let ctx = VaultContext::new(&self.programs, &state);
        Ok(vec![
            instructions::update_pricing(&self.programs, group, market, index, Side::Bid),
            instructions::update_pricing(&self.programs, group, market, index, Side::Ask),
            instructions::place_bid(&ctx, authority, group, market, index, order),
        ])
    }

    pub async fn redeem_options(
        &self,
        registry: &AccountRegistry,
        vault: &Pubkey,
        authority: &Pubkey,
        amount: u64,
    ) -> Result<Vec<Instruction>, ComposeError> {
        require_positive("redeem amount", amount)?;
        let state = self.load_vault(vault).await?;
        let group = registry.options_group(&state.options_group)?;
        let ctx = VaultContext::new(&self.programs, &state);
        Ok(vec![instructions::redeem_options(
            &ctx, authority, group, amount,
        )])
    }

    pub async fn swap_to_underlying(
        &self,
        vault: &Pubkey,
        authority: &Pubkey,
        amount: u64,
    ) -> Result<Vec<Instruction>, ComposeError> {
        require_positive("swap amount", amount)?;
        let state = self.load_vault(vault).await?;
        let ctx = VaultContext::new(&self.programs, &state);
        Ok(vec![instructions::swap_to_underlying(&ctx, authority, amount)])
    }

    pub async fn swap_to_usdc(
        &self,
        registry: &AccountRegistry,
        vault: &Pubkey,
        authority: &Pubkey,
        amount: u64,
    ) -> Result<Vec<Instruction>, ComposeError> {
        require_positive("swap amount", amount)?;
        let state = self.load_vault(vault).await?;
        let reserve = registry.reserve(&state.reserve)?;
        let ctx = VaultContext::new(&self.programs, &state);
        Ok(vec![instructions::swap_to_usdc(
            &ctx, authority, reserve, amount,
        )])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytemuck::Zeroable;
    use core_types::layout::{self, RawVault};
    use core_types::{
        DecodedAccount, LendingReserve, OptionKind, OptionsGroup, OrderbookMarket, Product,
        Protocol, Strike,
    };
    use ledger_client::mock::MockLedger;
    use registry::RegistryError;
    use std::collections::HashMap;

    struct Fixture {
        ledger: Arc<MockLedger>,
        composer: InstructionComposer,
        registry: AccountRegistry,
        vault: Pubkey,
        authority: Pubkey,
        reserve: LendingReserve,
        group: OptionsGroup,
        call_market: OrderbookMarket,
        margin_account: Pubkey,
        usdc_vault: Pubkey,
        underlying_vault: Pubkey,
    }

    fn market(address: Pubkey) -> OrderbookMarket {
        OrderbookMarket {
            address,
            base_mint: Pubkey::new_unique(),
            quote_mint: Pubkey::new_unique(),
            base_vault: Pubkey::new_unique(),
            quote_vault: Pubkey::new_unique(),
            request_queue: Pubkey::new_unique(),
            event_queue: Pubkey::new_unique(),
            bids: Pubkey::new_unique(),
            asks: Pubkey::new_unique(),
            vault_signer_nonce: 0,
            base_lot_size: 1,
            quote_lot_size: 1,
        }
    }

    /// A vault over one reserve and a group holding a put at 100 and a call at 150.
    fn fixture() -> Fixture {
        let programs = ProgramIds {
            vault: Pubkey::new_unique(),
            lending: Pubkey::new_unique(),
            options: Pubkey::new_unique(),
            orderbook: Pubkey::new_unique(),
        };
        let reserve = LendingReserve {
            address: Pubkey::new_unique(),
            lending_market: Pubkey::new_unique(),
            liquidity_mint: Pubkey::new_unique(),
            liquidity_supply: Pubkey::new_unique(),
            liquidity_oracle: Pubkey::new_unique(),
            collateral_mint: Pubkey::new_unique(),
            collateral_supply: Pubkey::new_unique(),
            available_liquidity: 0,
            collateral_mint_supply: 0,
            liquidity_decimals: 6,
        };
        let put_market = market(Pubkey::new_unique());
        let call_market = market(Pubkey::new_unique());
        let product = |market: &OrderbookMarket, value, kind| Product {
            market: market.address,
            strike: Strike { is_set: true, value },
            kind,
            dirty: false,
        };
        let group = OptionsGroup {
            address: Pubkey::new_unique(),
            underlying_mint: Pubkey::new_unique(),
            quote_mint: Pubkey::new_unique(),
            oracle: Pubkey::new_unique(),
            vault: Pubkey::new_unique(),
            insurance_vault: Pubkey::new_unique(),
            products: vec![
                product(&put_market, 100, OptionKind::Put),
                product(&call_market, 150, OptionKind::Call),
            ],
        };

        let registry = AccountRegistry::merge([
            (
                Protocol::Orderbook,
                HashMap::from([
                    (put_market.address, DecodedAccount::OrderbookMarket(put_market.clone())),
                    (call_market.address, DecodedAccount::OrderbookMarket(call_market.clone())),
                ]),
            ),
            (
                Protocol::Lending,
                HashMap::from([(reserve.address, DecodedAccount::LendingReserve(reserve.clone()))]),
            ),
            (
                Protocol::Options,
                HashMap::from([(group.address, DecodedAccount::OptionsGroup(group.clone()))]),
            ),
        ]);

        let authority = Pubkey::new_unique();
        let (vault, bump) = pda::vault_address(&programs.vault, &reserve.address, &authority);
        let mut raw = RawVault::zeroed();
        raw.authority = authority.to_bytes();
        raw.reserve = reserve.address.to_bytes();
        raw.options_group = group.address.to_bytes();
        raw.shares_mint = pda::shares_mint_address(&programs.vault, &vault).0.to_bytes();
        let margin_account = Pubkey::new_unique();
        let (usdc_vault, underlying_vault) = (Pubkey::new_unique(), Pubkey::new_unique());
        raw.margin_account = margin_account.to_bytes();
        raw.usdc_vault = usdc_vault.to_bytes();
        raw.underlying_vault = underlying_vault.to_bytes();
        raw.deposit_limit = 1_000_000;
        raw.bump = bump;

        let ledger = Arc::new(MockLedger::new());
        ledger.set_account(vault, programs.vault, layout::encode(&raw));

        Fixture {
            composer: InstructionComposer::new(ledger.clone(), programs),
            ledger,
            registry,
            vault,
            authority,
            reserve,
            group,
            call_market,
            margin_account,
            usdc_vault,
            underlying_vault,
        }
    }

    /// Checks the target program, the sighash and that `signer` is the only signer.
    fn assert_vault_call(f: &Fixture, ix: &Instruction, name: &str, signer: &Pubkey) {
        assert_eq!(ix.program_id, f.composer.programs().vault);
        assert_eq!(&ix.data[..8], &instructions::sighash(name), "{name}");
        let signers: Vec<Pubkey> = ix
            .accounts
            .iter()
            .filter(|m| m.is_signer)
            .map(|m| m.pubkey)
            .collect();
        assert_eq!(signers, vec![*signer], "{name}");
    }

    fn writes(ix: &Instruction, key: &Pubkey) -> bool {
        ix.accounts.iter().any(|m| m.pubkey == *key && m.is_writable)
    }

    fn reads(ix: &Instruction, key: &Pubkey) -> bool {
        ix.accounts.iter().any(|m| m.pubkey == *key)
    }

    fn bid(strike: u64, kind: OptionKind) -> BidOrder {
        BidOrder {
            strike,
            kind,
            price: 2_500_000,
            size: 1,
            client_order_id: Some(42),
        }
    }

    #[tokio::test]
    async fn bid_refreshes_both_sides_before_placing() {
        let f = fixture();
        let ixs = f
            .composer
            .place_bid(&f.registry, &f.vault, &f.authority, &bid(150, OptionKind::Call))
            .await
            .unwrap();

        assert_eq!(ixs.len(), 3);
        let programs = f.composer.programs();
        let update = instructions::sighash("update_pricing");
        assert_eq!(ixs[0].program_id, programs.options);
        assert_eq!(&ixs[0].data[..8], &update);
        assert_eq!(ixs[0].data[8..], [Side::Bid.to_u8(), 1]);
        assert_eq!(ixs[1].data[8..], [Side::Ask.to_u8(), 1]);
        assert!(ixs[0].accounts.iter().any(|m| m.pubkey == f.call_market.bids));
        assert!(ixs[1].accounts.iter().any(|m| m.pubkey == f.call_market.asks));

        assert_eq!(ixs[2].program_id, programs.vault);
        assert_eq!(&ixs[2].data[..8], &instructions::sighash("place_bid"));
        assert_eq!(*ixs[2].data.last().unwrap(), 1);
        assert!(ixs[2].accounts.iter().any(|m| m.pubkey == f.call_market.address));
    }

    #[tokio::test]
    async fn bid_without_matching_product_is_not_found() {
        let f = fixture();
        let misses = [
            (100, OptionKind::Call),
            (100, OptionKind::Put),
            (175, OptionKind::Call),
        ];
        for (strike, kind) in misses {
            let err = f
                .composer
                .place_bid(&f.registry, &f.vault, &f.authority, &bid(strike, kind))
                .await
                .unwrap_err();
            assert!(err.is_not_found(), "{strike}/{kind:?}: {err}");
        }
        assert!(f.ledger.simulated().is_empty());
    }

    #[tokio::test]
    async fn deposit_targets_vault_program_with_user_as_signer() {
        let f = fixture();
        let user = Pubkey::new_unique();
        let ixs = f.composer.deposit(&f.registry, &f.vault, &user, 500).await.unwrap();

        assert_eq!(ixs.len(), 1);
        let ix = &ixs[0];
        assert_eq!(ix.program_id, f.composer.programs().vault);
        assert_eq!(ix.data[8..], 500u64.to_le_bytes());
        let signers: Vec<_> = ix.accounts.iter().filter(|m| m.is_signer).collect();
        assert_eq!(signers.len(), 1);
        assert_eq!(signers[0].pubkey, user);
        assert!(writes(ix, &f.reserve.liquidity_supply));
    }

    #[tokio::test]
    async fn withdraw_burns_shares_against_the_vault_reserve() {
        let f = fixture();
        let user = Pubkey::new_unique();
        let ixs = f.composer.withdraw(&f.registry, &f.vault, &user, 250).await.unwrap();

        assert_eq!(ixs.len(), 1);
        let ix = &ixs[0];
        assert_vault_call(&f, ix, "withdraw", &user);
        assert_eq!(ix.data[8..], 250u64.to_le_bytes());
        assert!(writes(ix, &f.reserve.address));
        assert!(writes(ix, &f.reserve.liquidity_supply));
        assert!(reads(ix, &f.reserve.lending_market));
    }

    #[tokio::test]
    async fn open_orders_use_the_requested_market() {
        let f = fixture();
        let ixs = f
            .composer
            .init_open_orders(&f.registry, &f.vault, &f.authority, &f.call_market.address)
            .await
            .unwrap();

        assert_eq!(ixs.len(), 1);
        let ix = &ixs[0];
        assert_vault_call(&f, ix, "initialize_open_orders", &f.authority);
        assert_eq!(ix.data.len(), 8);
        assert!(reads(ix, &f.call_market.address));
        assert!(reads(ix, &f.group.address));
        assert!(reads(ix, &f.margin_account));
        let programs = f.composer.programs();
        let (executor, _) = pda::executor_address(&programs.vault, &f.vault);
        let open_orders = pda::open_orders_address(
            &programs.options,
            &programs.orderbook,
            &f.call_market.address,
            &executor,
        );
        assert!(writes(ix, &open_orders));
    }

    #[tokio::test]
    async fn open_orders_reject_unknown_and_mistyped_markets() {
        let f = fixture();
        let unknown = Pubkey::new_unique();
        match f
            .composer
            .init_open_orders(&f.registry, &f.vault, &f.authority, &unknown)
            .await
        {
            Err(ComposeError::Registry(RegistryError::NotFound(address))) => {
                assert_eq!(address, unknown)
            }
            other => panic!("expected NotFound, got {other:?}"),
        }

        assert!(matches!(
            f.composer
                .init_open_orders(&f.registry, &f.vault, &f.authority, &f.reserve.address)
                .await,
            Err(ComposeError::Registry(RegistryError::KindMismatch { .. }))
        ));
        assert!(f.ledger.simulated().is_empty());
    }

    #[tokio::test]
    async fn lending_yield_is_harvested_and_reinvested_through_the_reserve() {
        let f = fixture();
        let harvest = f
            .composer
            .harvest_yield(&f.registry, &f.vault, &f.authority)
            .await
            .unwrap();
        let reinvest = f
            .composer
            .reinvest_lending(&f.registry, &f.vault, &f.authority)
            .await
            .unwrap();

        for (ixs, name) in [(&harvest, "harvest_yield"), (&reinvest, "reinvest_lending")] {
            assert_eq!(ixs.len(), 1);
            let ix = &ixs[0];
            assert_vault_call(&f, ix, name, &f.authority);
            assert_eq!(ix.data.len(), 8);
            assert!(writes(ix, &f.reserve.address));
            assert!(writes(ix, &f.reserve.collateral_mint));
            assert!(writes(ix, &f.underlying_vault));
        }
    }

    #[tokio::test]
    async fn margin_moves_use_the_vaults_recorded_margin_account() {
        let f = fixture();
        let reinvest = f
            .composer
            .reinvest_options(&f.registry, &f.vault, &f.authority, 1_500)
            .await
            .unwrap();
        let redeem = f
            .composer
            .redeem_options(&f.registry, &f.vault, &f.authority, 700)
            .await
            .unwrap();

        let cases = [
            (&reinvest, "reinvest_options", 1_500u64),
            (&redeem, "redeem_options", 700),
        ];
        for (ixs, name, amount) in cases {
            assert_eq!(ixs.len(), 1);
            let ix = &ixs[0];
            assert_vault_call(&f, ix, name, &f.authority);
            assert_eq!(ix.data[8..], amount.to_le_bytes());
            assert!(writes(ix, &f.margin_account));
            assert!(writes(ix, &f.usdc_vault));
            assert!(writes(ix, &f.group.vault));
            assert!(reads(ix, &f.group.address));
        }
        assert!(reads(&redeem[0], &f.group.oracle));
        assert!(!reads(&reinvest[0], &f.group.oracle));
    }

    #[tokio::test]
    async fn swap_to_underlying_moves_between_the_vaults_token_accounts() {
        let f = fixture();
        let ixs = f
            .composer
            .swap_to_underlying(&f.vault, &f.authority, 900)
            .await
            .unwrap();

        assert_eq!(ixs.len(), 1);
        let ix = &ixs[0];
        assert_vault_call(&f, ix, "swap_to_underlying", &f.authority);
        assert_eq!(ix.data[8..], 900u64.to_le_bytes());
        assert!(writes(ix, &f.usdc_vault));
        assert!(writes(ix, &f.underlying_vault));
        assert!(!reads(ix, &f.reserve.address));
    }

    #[tokio::test]
    async fn zero_amounts_are_rejected_before_reading_the_vault() {
        let f = fixture();
        let missing = Pubkey::new_unique();
        assert!(matches!(
            f.composer.deposit(&f.registry, &missing, &f.authority, 0).await,
            Err(ComposeError::InvalidAmount { .. })
        ));
        assert!(matches!(
            f.composer.swap_to_usdc(&f.registry, &missing, &f.authority, 0).await,
            Err(ComposeError::InvalidAmount { .. })
        ));
        assert!(matches!(
            f.composer.redeem_options(&f.registry, &missing, &f.authority, 0).await,
            Err(ComposeError::InvalidAmount { .. })
        ));
    }

    #[tokio::test]
    async fn unknown_vault_is_reported() {
        let f = fixture();
        let missing = Pubkey::new_unique();
        match f.composer.harvest_yield(&f.registry, &missing, &f.authority).await {
            Err(ComposeError::VaultNotFound(address)) => assert_eq!(address, missing),
            other => panic!("expected VaultNotFound, got {other:?}"),
        }
    }

    #[test]
    fn create_vault_validates_fee_and_identities() {
        let f = fixture();
        let args = CreateVaultArgs {
            reserve: f.reserve.address,
            options_group: f.group.address,
            deposit_limit: 1_000,
            fee_bps: 10_001,
        };
        assert!(matches!(
            f.composer.create_vault(&f.registry, &f.authority, &args),
            Err(ComposeError::InvalidFee(10_001))
        ));

        let unknown = CreateVaultArgs {
            reserve: Pubkey::new_unique(),
            fee_bps: 100,
            ..args
        };
        assert!(matches!(
            f.composer.create_vault(&f.registry, &f.authority, &unknown),
            Err(ComposeError::Registry(RegistryError::NotFound(_)))
        ));

        let swapped = CreateVaultArgs {
            reserve: f.group.address,
            fee_bps: 100,
            ..args
        };
        assert!(matches!(
            f.composer.create_vault(&f.registry, &f.authority, &swapped),
            Err(ComposeError::Registry(RegistryError::KindMismatch { .. }))
        ));

        let ok = CreateVaultArgs { fee_bps: 10_000, ..args };
        let ixs = f.composer.create_vault(&f.registry, &f.authority, &ok).unwrap();
        let (vault, _) =
            pda::vault_address(&f.composer.programs().vault, &f.reserve.address, &f.authority);
        assert_eq!(ixs[0].accounts[1].pubkey, vault);
        assert_eq!(ixs[0].accounts[0].pubkey, f.authority);
    }

    #[tokio::test]
    async fn vault_state_is_read_fresh_for_every_composition() {
        let f = fixture();
        let first = f.composer.load_vault(&f.vault).await.unwrap();
        assert_eq!(first.deposit_limit, 1_000_000);

        let mut raw = RawVault::zeroed();
        raw.authority = f.authority.to_bytes();
        raw.reserve = f.reserve.address.to_bytes();
        raw.options_group = f.group.address.to_bytes();
        raw.deposit_limit = 7;
        f.ledger
            .set_account(f.vault, f.composer.programs().vault, layout::encode(&raw));

        assert_eq!(f.composer.load_vault(&f.vault).await.unwrap().deposit_limit, 7);
    }

    #[test]
    fn operator_is_first_signer() {
        let (a, b) = (Keypair::new(), Keypair::new());
        assert_eq!(operator(&[&a, &b]).unwrap(), a.pubkey());
        assert!(matches!(operator(&[]), Err(ComposeError::MissingSigner)));
    }
}
