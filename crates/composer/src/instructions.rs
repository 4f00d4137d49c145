//! Pure instruction builders for the vault program and the options venue.
//!
//! Builders take already-resolved accounts and never touch the network. Data is the
//! 8-byte `sha256("global:<name>")` sighash followed by little-endian arguments.

use crate::pda;
use configuration::ProgramIds;
use core_types::{
    LendingReserve, OptionKind, OptionsGroup, OrderbookMarket, Pubkey, Side, VaultState,
};
use sha2::{Digest, Sha256};
use solana_sdk::instruction::{AccountMeta, Instruction};
use solana_sdk::{system_program, sysvar};
use spl_associated_token_account::get_associated_token_address;

pub const SIGHASH_LEN: usize = 8;

pub fn sighash(name: &str) -> [u8; SIGHASH_LEN] {
    let digest = Sha256::digest(format!("global:{name}").as_bytes());
    let mut out = [0u8; SIGHASH_LEN];
    out.copy_from_slice(&digest[..SIGHASH_LEN]);
    out
}

fn with_amount(name: &str, amount: u64) -> Vec<u8> {
    let mut data = sighash(name).to_vec();
    data.extend_from_slice(&amount.to_le_bytes());
    data
}

/// Caller-supplied parameters of a new vault.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CreateVaultArgs {
    pub reserve: Pubkey,
    pub options_group: Pubkey,
    pub deposit_limit: u64,
    pub fee_bps: u16,
}

/// A limit bid on one options product.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BidOrder {
    /// Strike in native units (six decimals).
    pub strike: u64,
    pub kind: OptionKind,
    /// Limit price in native units (six decimals).
    pub price: u64,
    pub size: u64,
    pub client_order_id: Option<u64>,
}

/// The live vault plus the addresses every vault instruction repeats.
#[derive(Debug, Clone, Copy)]
pub struct VaultContext<'a> {
    pub programs: &'a ProgramIds,
    pub vault: &'a VaultState,
    pub executor: Pubkey,
}

impl<'a> VaultContext<'a> {
    pub fn new(programs: &'a ProgramIds, vault: &'a VaultState) -> Self {
        let (executor, _) = pda::executor_address(&programs.vault, &vault.address);
        Self {
            programs,
            vault,
            executor,
        }
    }

    /// The margin account recorded when the vault was created.
    fn margin_account(&self) -> Pubkey {
        self.vault.margin_account
    }

    fn open_orders(&self, market: &Pubkey) -> Pubkey {
        pda::open_orders_address(
            &self.programs.options,
            &self.programs.orderbook,
            market,
            &self.executor,
        )
    }
}

pub fn initialize_vault(
    programs: &ProgramIds,
    authority: &Pubkey,
    reserve: &LendingReserve,
    group: &OptionsGroup,
    args: &CreateVaultArgs,
) -> Instruction {
    let addresses = pda::VaultAddresses::derive(programs, &reserve.address, authority);
    let margin_account =
        pda::margin_account_address(&programs.options, &group.address, &addresses.executor.0);

    let mut data = with_amount("initialize_vault", args.deposit_limit);
    data.extend_from_slice(&args.fee_bps.to_le_bytes());
    data.extend_from_slice(&[addresses.vault.1, addresses.executor.1, addresses.shares_mint.1]);

    Instruction {
        program_id: programs.vault,
        accounts: vec![
            AccountMeta::new(*authority, true),
            AccountMeta::new(addresses.vault.0, false),
            AccountMeta::new_readonly(addresses.executor.0, false),
            AccountMeta::new(addresses.shares_mint.0, false),
            AccountMeta::new(addresses.collateral_vault, false),
            AccountMeta::new(addresses.underlying_vault, false),
            AccountMeta::new(addresses.usdc_vault, false),
            AccountMeta::new_readonly(reserve.address, false),
            AccountMeta::new_readonly(reserve.collateral_mint, false),
            AccountMeta::new_readonly(reserve.liquidity_mint, false),
            AccountMeta::new_readonly(group.address, false),
            AccountMeta::new_readonly(group.quote_mint, false),
            AccountMeta::new(margin_account, false),
            AccountMeta::new_readonly(programs.options, false),
            AccountMeta::new_readonly(system_program::id(), false),
            AccountMeta::new_readonly(spl_token::id(), false),
            AccountMeta::new_readonly(sysvar::rent::id(), false),
        ],
        data,
    }
}

fn user_liquidity_accounts(
    ctx: &VaultContext<'_>,
    reserve: &LendingReserve,
    user: &Pubkey,
) -> Vec<AccountMeta> {
    let programs = ctx.programs;
    vec![
        AccountMeta::new(get_associated_token_address(user, &ctx.vault.shares_mint), false),
        AccountMeta::new(get_associated_token_address(user, &reserve.liquidity_mint), false),
        AccountMeta::new_readonly(*user, true),
        AccountMeta::new(ctx.vault.address, false),
        AccountMeta::new(ctx.vault.collateral_vault, false),
        AccountMeta::new_readonly(ctx.executor, false),
        AccountMeta::new(ctx.vault.shares_mint, false),
        AccountMeta::new(reserve.liquidity_supply, false),
        AccountMeta::new(reserve.collateral_mint, false),
        AccountMeta::new_readonly(reserve.lending_market, false),
        AccountMeta::new_readonly(
            pda::lending_market_authority(&programs.lending, &reserve.lending_market),
            false,
        ),
        AccountMeta::new(reserve.address, false),
        AccountMeta::new_readonly(sysvar::clock::id(), false),
        AccountMeta::new_readonly(spl_token::id(), false),
        AccountMeta::new_readonly(programs.lending, false),
    ]
}

/// Supplies `amount` of the reserve's liquidity from the user and mints vault shares.
pub fn deposit(
    ctx: &VaultContext<'_>,
    reserve: &LendingReserve,
    user: &Pubkey,
    amount: u64,
) -> Instruction {
    Instruction {
        program_id: ctx.programs.vault,
        accounts: user_liquidity_accounts(ctx, reserve, user),
        data: with_amount("deposit", amount),
    }
}

/// Burns `shares` of the user's vault shares and returns the matching liquidity.
pub fn withdraw(
    ctx: &VaultContext<'_>,
    reserve: &LendingReserve,
    user: &Pubkey,
    shares: u64,
) -> Instruction {
    Instruction {
        program_id: ctx.programs.vault,
        accounts: user_liquidity_accounts(ctx, reserve, user),
        data: with_amount("withdraw", shares),
    }
}

pub fn initialize_open_orders(
    ctx: &VaultContext<'_>,
    authority: &Pubkey,
    group: &OptionsGroup,
    market: &OrderbookMarket,
) -> Instruction {
    let programs = ctx.programs;
    let open_orders = ctx.open_orders(&market.address);
    Instruction {
        program_id: programs.vault,
        accounts: vec![
            AccountMeta::new(*authority, true),
            AccountMeta::new_readonly(ctx.vault.address, false),
            AccountMeta::new_readonly(ctx.executor, false),
            AccountMeta::new_readonly(programs.options, false),
            AccountMeta::new_readonly(pda::options_state_address(&programs.options), false),
            AccountMeta::new_readonly(group.address, false),
            AccountMeta::new_readonly(ctx.margin_account(), false),
            AccountMeta::new(open_orders, false),
            AccountMeta::new_readonly(market.address, false),
            AccountMeta::new(
                pda::open_orders_map_address(&programs.options, &open_orders),
                false,
            ),
            AccountMeta::new_readonly(programs.orderbook, false),
            AccountMeta::new_readonly(system_program::id(), false),
            AccountMeta::new_readonly(sysvar::rent::id(), false),
        ],
        data: sighash("initialize_open_orders").to_vec(),
    }
}

fn lending_position_accounts(
    ctx: &VaultContext<'_>,
    authority: &Pubkey,
    reserve: &LendingReserve,
) -> Vec<AccountMeta> {
    let programs = ctx.programs;
    vec![
        AccountMeta::new_readonly(*authority, true),
        AccountMeta::new(ctx.vault.address, false),
        AccountMeta::new_readonly(ctx.executor, false),
        AccountMeta::new(ctx.vault.collateral_vault, false),
        AccountMeta::new(ctx.vault.underlying_vault, false),
        AccountMeta::new(reserve.address, false),
        AccountMeta::new(reserve.liquidity_supply, false),
        AccountMeta::new(reserve.collateral_mint, false),
        AccountMeta::new_readonly(reserve.lending_market, false),
        AccountMeta::new_readonly(
            pda::lending_market_authority(&programs.lending, &reserve.lending_market),
            false,
        ),
        AccountMeta::new_readonly(sysvar::clock::id(), false),
        AccountMeta::new_readonly(spl_token::id(), false),
        AccountMeta::new_readonly(programs.lending, false),
    ]
}

/// Redeems the yield accrued on the vault's collateral into the underlying sub-vault.
pub fn harvest_yield(
    ctx: &VaultContext<'_>,
    authority: &Pubkey,
    reserve: &LendingReserve,
) -> Instruction {
    Instruction {
        program_id: ctx.programs.vault,
        accounts: lending_position_accounts(ctx, authority, reserve),
        data: sighash("harvest_yield").to_vec(),
    }
}

/// Supplies the underlying sub-vault's balance back into the lending reserve.
pub fn reinvest_lending(
    ctx: &VaultContext<'_>,
    authority: &Pubkey,
    reserve: &LendingReserve,
) -> Instruction {
    Instruction {
        program_id: ctx.programs.vault,
        accounts: lending_position_accounts(ctx, authority, reserve),
        data: sighash("reinvest_lending").to_vec(),
    }
}

fn margin_accounts(
    ctx: &VaultContext<'_>,
    authority: &Pubkey,
    group: &OptionsGroup,
) -> Vec<AccountMeta> {
    let programs = ctx.programs;
    vec![
        AccountMeta::new_readonly(*authority, true),
        AccountMeta::new_readonly(ctx.vault.address, false),
        AccountMeta::new_readonly(ctx.executor, false),
        AccountMeta::new(ctx.vault.usdc_vault, false),
        AccountMeta::new_readonly(programs.options, false),
        AccountMeta::new_readonly(pda::options_state_address(&programs.options), false),
        AccountMeta::new_readonly(group.address, false),
        AccountMeta::new(ctx.margin_account(), false),
        AccountMeta::new(group.vault, false),
    ]
}

/// Moves `amount` USDC from the vault into its options margin account.
pub fn reinvest_options(
    ctx: &VaultContext<'_>,
    authority: &Pubkey,
    group: &OptionsGroup,
    amount: u64,
) -> Instruction {
    let mut accounts = margin_accounts(ctx, authority, group);
    accounts.push(AccountMeta::new_readonly(spl_token::id(), false));
    Instruction {
        program_id: ctx.programs.vault,
        accounts,
        data: with_amount("reinvest_options", amount),
    }
}

/// Withdraws `amount` USDC from the options margin account back into the vault.
pub fn redeem_options(
    ctx: &VaultContext<'_>,
    authority: &Pubkey,
    group: &OptionsGroup,
    amount: u64,
) -> Instruction {
    let mut accounts = margin_accounts(ctx, authority, group);
    accounts.extend([
        AccountMeta::new_readonly(group.oracle, false),
        AccountMeta::new_readonly(
            pda::greeks_address(&ctx.programs.options, &group.address),
            false,
        ),
        AccountMeta::new_readonly(spl_token::id(), false),
    ]);
    Instruction {
        program_id: ctx.programs.vault,
        accounts,
        data: with_amount("redeem_options", amount),
    }
}

fn swap_accounts(ctx: &VaultContext<'_>, authority: &Pubkey) -> Vec<AccountMeta> {
    vec![
        AccountMeta::new_readonly(*authority, true),
        AccountMeta::new_readonly(ctx.vault.address, false),
        AccountMeta::new_readonly(ctx.executor, false),
        AccountMeta::new(ctx.vault.usdc_vault, false),
        AccountMeta::new(ctx.vault.underlying_vault, false),
        AccountMeta::new_readonly(spl_token::id(), false),
    ]
}

/// Swaps `amount` USDC held by the vault into the underlying token.
pub fn swap_to_underlying(ctx: &VaultContext<'_>, authority: &Pubkey, amount: u64) -> Instruction {
    Instruction {
        program_id: ctx.programs.vault,
        accounts: swap_accounts(ctx, authority),
        data: with_amount("swap_to_underlying", amount),
    }
}

/// Swaps `amount` of the underlying token into USDC, priced off the reserve's oracle.
pub fn swap_to_usdc(
    ctx: &VaultContext<'_>,
    authority: &Pubkey,
    reserve: &LendingReserve,
    amount: u64,
) -> Instruction {
    let mut accounts = swap_accounts(ctx, authority);
    accounts.extend([
        AccountMeta::new_readonly(reserve.address, false),
        AccountMeta::new_readonly(reserve.liquidity_mint, false),
        AccountMeta::new_readonly(reserve.liquidity_oracle, false),
    ]);
    Instruction {
        program_id: ctx.programs.vault,
        accounts,
        data: with_amount("swap_to_usdc", amount),
    }
}

/// Refreshes the options venue's quote for one side of a product.
///
/// Targets the options program directly; it needs no vault signature.
pub fn update_pricing(
    programs: &ProgramIds,
    group: &OptionsGroup,
    market: &OrderbookMarket,
    product_index: u8,
    side: Side,
) -> Instruction {
    let book = match side {
        Side::Bid => market.bids,
        Side::Ask => market.asks,
    };
    let mut data = sighash("update_pricing").to_vec();
    data.extend_from_slice(&[side.to_u8(), product_index]);

    Instruction {
        program_id: programs.options,
        accounts: vec![
            AccountMeta::new_readonly(pda::options_state_address(&programs.options), false),
            AccountMeta::new(group.address, false),
            AccountMeta::new(pda::greeks_address(&programs.options, &group.address), false),
            AccountMeta::new_readonly(group.oracle, false),
            AccountMeta::new_readonly(market.address, false),
            AccountMeta::new_readonly(book, false),
        ],
        data,
    }
}

pub fn place_bid(
    ctx: &VaultContext<'_>,
    authority: &Pubkey,
    group: &OptionsGroup,
    market: &OrderbookMarket,
    product_index: u8,
    order: &BidOrder,
) -> Instruction {
    let programs = ctx.programs;
    let mut data = with_amount("place_bid", order.price);
    data.extend_from_slice(&order.size.to_le_bytes());
    match order.client_order_id {
        Some(id) => {
            data.push(1);
            data.extend_from_slice(&id.to_le_bytes());
        }
        None => data.push(0),
    }
    data.push(product_index);

    Instruction {
        program_id: programs.vault,
        accounts: vec![
            AccountMeta::new_readonly(*authority, true),
            AccountMeta::new(ctx.vault.address, false),
            AccountMeta::new_readonly(ctx.executor, false),
            AccountMeta::new_readonly(programs.options, false),
            AccountMeta::new_readonly(pda::options_state_address(&programs.options), false),
            AccountMeta::new_readonly(group.address, false),
            AccountMeta::new(ctx.margin_account(), false),
            AccountMeta::new(ctx.open_orders(&market.address), false),
            AccountMeta::new(market.address, false),
            AccountMeta::new(market.request_queue, false),
            AccountMeta::new(market.event_queue, false),
            AccountMeta::new(market.bids, false),
            AccountMeta::new(market.asks, false),
            AccountMeta::new_readonly(programs.orderbook, false),
            AccountMeta::new_readonly(
                pda::greeks_address(&programs.options, &group.address),
                false,
            ),
            AccountMeta::new_readonly(group.oracle, false),
            AccountMeta::new_readonly(spl_token::id(), false),
            AccountMeta::new_readonly(sysvar::rent::id(), false),
        ],
        data,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sighash_matches_anchor_convention() {
        let expected = Sha256::digest(b"global:deposit");
        assert_eq!(&sighash("deposit")[..], &expected[..8]);
        assert_ne!(sighash("deposit"), sighash("withdraw"));
    }

    #[test]
    fn amount_follows_sighash_little_endian() {
        let data = with_amount("deposit", 0x0102);
        assert_eq!(data.len(), SIGHASH_LEN + 8);
        assert_eq!(&data[SIGHASH_LEN..], &[0x02, 0x01, 0, 0, 0, 0, 0, 0]);
    }
}
