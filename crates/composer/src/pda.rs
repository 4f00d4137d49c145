//! Program-derived addresses used by the vault program and the protocols it calls.

use configuration::ProgramIds;
use core_types::Pubkey;

pub const VAULT_SEED: &[u8] = b"vault";
pub const EXECUTOR_SEED: &[u8] = b"executor";
pub const SHARES_SEED: &[u8] = b"shares";
pub const COLLATERAL_SEED: &[u8] = b"collateral";
pub const UNDERLYING_SEED: &[u8] = b"underlying";
pub const USDC_SEED: &[u8] = b"usdc";
pub const MARGIN_SEED: &[u8] = b"margin";
pub const OPEN_ORDERS_SEED: &[u8] = b"open-orders";
pub const OPEN_ORDERS_MAP_SEED: &[u8] = b"open-orders-map";
pub const OPTIONS_STATE_SEED: &[u8] = b"state";
pub const GREEKS_SEED: &[u8] = b"greeks";

/// Every address derived for one vault, computed together so call sites stay short.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VaultAddresses {
    pub vault: (Pubkey, u8),
    pub executor: (Pubkey, u8),
    pub shares_mint: (Pubkey, u8),
    pub collateral_vault: Pubkey,
    pub underlying_vault: Pubkey,
    pub usdc_vault: Pubkey,
}

impl VaultAddresses {
    pub fn derive(programs: &ProgramIds, reserve: &Pubkey, authority: &Pubkey) -> Self {
        let vault = vault_address(&programs.vault, reserve, authority);
        Self {
            executor: executor_address(&programs.vault, &vault.0),
            shares_mint: shares_mint_address(&programs.vault, &vault.0),
            collateral_vault: token_vault_address(&programs.vault, COLLATERAL_SEED, &vault.0),
            underlying_vault: token_vault_address(&programs.vault, UNDERLYING_SEED, &vault.0),
            usdc_vault: token_vault_address(&programs.vault, USDC_SEED, &vault.0),
            vault,
        }
    }
}

pub fn vault_address(vault_program: &Pubkey, reserve: &Pubkey, authority: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(
        &[VAULT_SEED, reserve.as_ref(), authority.as_ref()],
        vault_program,
    )
}

/// The signing authority the vault program uses for CPIs on behalf of `vault`.
pub fn executor_address(vault_program: &Pubkey, vault: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(&[EXECUTOR_SEED, vault.as_ref()], vault_program)
}

pub fn shares_mint_address(vault_program: &Pubkey, vault: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(&[SHARES_SEED, vault.as_ref()], vault_program)
}

/// One of the vault's token accounts, selected by seed (`collateral`, `underlying`, `usdc`).
pub fn token_vault_address(vault_program: &Pubkey, seed: &[u8], vault: &Pubkey) -> Pubkey {
    Pubkey::find_program_address(&[seed, vault.as_ref()], vault_program).0
}

pub fn lending_market_authority(lending_program: &Pubkey, lending_market: &Pubkey) -> Pubkey {
    Pubkey::find_program_address(&[lending_market.as_ref()], lending_program).0
}

pub fn margin_account_address(options_program: &Pubkey, group: &Pubkey, owner: &Pubkey) -> Pubkey {
    Pubkey::find_program_address(&[MARGIN_SEED, group.as_ref(), owner.as_ref()], options_program).0
}

pub fn open_orders_address(
    options_program: &Pubkey,
    orderbook_program: &Pubkey,
    market: &Pubkey,
    owner: &Pubkey,
) -> Pubkey {
    Pubkey::find_program_address(
        &[
            OPEN_ORDERS_SEED,
            orderbook_program.as_ref(),
            market.as_ref(),
            owner.as_ref(),
        ],
        options_program,
    )
    .0
}

pub fn open_orders_map_address(options_program: &Pubkey, open_orders: &Pubkey) -> Pubkey {
    Pubkey::find_program_address(&[OPEN_ORDERS_MAP_SEED, open_orders.as_ref()], options_program).0
}

pub fn options_state_address(options_program: &Pubkey) -> Pubkey {
    Pubkey::find_program_address(&[OPTIONS_STATE_SEED], options_program).0
}

pub fn greeks_address(options_program: &Pubkey, group: &Pubkey) -> Pubkey {
    Pubkey::find_program_address(&[GREEKS_SEED, group.as_ref()], options_program).0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn programs() -> ProgramIds {
        ProgramIds {
            vault: Pubkey::new_unique(),
            lending: Pubkey::new_unique(),
            options: Pubkey::new_unique(),
            orderbook: Pubkey::new_unique(),
        }
    }

    #[test]
    fn vault_addresses_are_deterministic_and_distinct() {
        let programs = programs();
        let (reserve, authority) = (Pubkey::new_unique(), Pubkey::new_unique());
        let a = VaultAddresses::derive(&programs, &reserve, &authority);
        let b = VaultAddresses::derive(&programs, &reserve, &authority);
        assert_eq!(a, b);

        let all = [
            a.vault.0,
            a.executor.0,
            a.shares_mint.0,
            a.collateral_vault,
            a.underlying_vault,
            a.usdc_vault,
        ];
        for (i, x) in all.iter().enumerate() {
            for y in &all[i + 1..] {
                assert_ne!(x, y);
            }
        }
    }

    #[test]
    fn vault_address_depends_on_authority() {
        let programs = programs();
        let reserve = Pubkey::new_unique();
        let one = vault_address(&programs.vault, &reserve, &Pubkey::new_unique());
        let two = vault_address(&programs.vault, &reserve, &Pubkey::new_unique());
        assert_ne!(one.0, two.0);
    }

    #[test]
    fn open_orders_map_follows_open_orders() {
        let programs = programs();
        let market = Pubkey::new_unique();
        let owner = Pubkey::new_unique();
        let oo = open_orders_address(&programs.options, &programs.orderbook, &market, &owner);
        assert_eq!(
            open_orders_map_address(&programs.options, &oo),
            open_orders_map_address(&programs.options, &oo)
        );
        let other_market = Pubkey::new_unique();
        assert_ne!(
            oo,
            open_orders_address(&programs.options, &programs.orderbook, &other_market, &owner)
        );
    }
}
