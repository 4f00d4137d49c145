use anyhow::{Context, anyhow};
use clap::{Parser, Subcommand, ValueEnum};
use comfy_table::Table;
use configuration::{Commitment, init_logging, load_config};
use core_types::{DecodedAccount, ExecutionMode, OptionKind, Pubkey, from_native, to_native};
use ledger_client::{Ledger, RpcLedger};
use loaders::{ResolvedScopes, ledger_loaders};
use manager::{BidOrder, CreateVaultArgs, ExecutionOutcome, VaultManager};
use rust_decimal::Decimal;
use solana_sdk::signature::{Keypair, Signer, read_keypair_file};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// The main entry point for the vault client.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env file is fine; real environment variables still apply.
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = load_config(&cli.config)
        .with_context(|| format!("Failed to load configuration from {}", cli.config.display()))?;
    let _log_guard = init_logging(&config.logging)?;

    let commitment = cli.commitment.unwrap_or(config.rpc.commitment);
    let ledger: Arc<dyn Ledger> = Arc::new(RpcLedger::new(config.rpc.url.clone(), commitment));
    let programs = config.program_ids()?;
    let scopes = ResolvedScopes::try_from(&config.loaders)?;
    let manager = VaultManager::new(
        ledger.clone(),
        ledger_loaders(ledger, &programs, &scopes),
        programs,
    );
    let mode = ExecutionMode::from_commit_flag(cli.commit);
    tracing::debug!(url = %config.rpc.url, ?commitment, ?mode, "Client configured");

    // The faucet needs neither the registry nor vault state.
    if let Commands::Airdrop { recipient, lamports } = cli.command {
        let recipient = match recipient {
            Some(recipient) => recipient,
            None => load_keypair(cli.keypair.as_deref())?.pubkey(),
        };
        let signature = manager.request_test_funds(&recipient, lamports).await?;
        println!("{signature}");
        return Ok(());
    }

    let registry = manager
        .preload()
        .await
        .context("Failed to preload the account registry")?;

    if let Commands::Accounts = cli.command {
        print_registry(registry.accounts().values());
        return Ok(());
    }

    let keypair = load_keypair(cli.keypair.as_deref())?;
    let signers = [&keypair];

    let outcome = match cli.command {
        Commands::CreateVault {
            reserve,
            options_group,
            deposit_limit,
            fee_bps,
        } => {
            let vault = manager.vault_address(&reserve, &keypair.pubkey());
            println!("vault: {vault}");
            let args = CreateVaultArgs {
                reserve,
                options_group,
                deposit_limit,
                fee_bps,
            };
            manager.create_vault(args, &signers, mode).await?
        }
        Commands::Deposit { vault, amount } => {
            manager.deposit(&vault, amount, &signers, mode).await?
        }
        Commands::Withdraw { vault, shares } => {
            manager.withdraw(&vault, shares, &signers, mode).await?
        }
        Commands::InitOpenOrders { vault, market } => {
            manager.init_open_orders(&vault, &market, &signers, mode).await?
        }
        Commands::Harvest { vault } => manager.harvest_yield(&vault, &signers, mode).await?,
        Commands::ReinvestLending { vault } => {
            manager.reinvest_lending(&vault, &signers, mode).await?
        }
        Commands::ReinvestOptions { vault, amount } => {
            manager.reinvest_options(&vault, amount, &signers, mode).await?
        }
        Commands::Bid {
            vault,
            strike,
            kind,
            price,
            size,
            client_order_id,
        } => {
            let order = BidOrder {
                strike: to_native(strike).context("Invalid strike")?,
                kind: kind.into(),
                price: to_native(price).context("Invalid price")?,
                size,
                client_order_id,
            };
            manager.place_bid(&vault, order, &signers, mode).await?
        }
        Commands::Redeem { vault, amount } => {
            manager.redeem_options(&vault, amount, &signers, mode).await?
        }
        Commands::SwapToUnderlying { vault, amount } => {
            manager.swap_to_underlying(&vault, amount, &signers, mode).await?
        }
        Commands::SwapToUsdc { vault, amount } => {
            manager.swap_to_usdc(&vault, amount, &signers, mode).await?
        }
        Commands::Accounts | Commands::Airdrop { .. } => return Ok(()),
    };

    print_outcome(&outcome)
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// Orchestrates a yield vault across a lending market, an options venue and an order book.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(long, global = true, default_value = "config.toml")]
    config: PathBuf,

    /// Keypair file of the signer. It pays the fee and acts as user or vault authority.
    #[arg(long, global = true)]
    keypair: Option<PathBuf>,

    /// Submit the transaction after simulating it. Without this flag nothing is sent.
    #[arg(long, global = true)]
    commit: bool,

    /// Overrides `[rpc] commitment`.
    #[arg(long, global = true, value_enum)]
    commitment: Option<Commitment>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Preload and print every protocol account the client knows about.
    Accounts,
    /// Create a vault over a lending reserve and an options group.
    CreateVault {
        #[arg(long)]
        reserve: Pubkey,
        #[arg(long)]
        options_group: Pubkey,
        /// Maximum total deposits, in native units of the reserve's liquidity.
        #[arg(long)]
        deposit_limit: u64,
        /// Performance fee in basis points (at most 10000).
        #[arg(long, default_value_t = 0)]
        fee_bps: u16,
    },
    /// Deposit liquidity into a vault in exchange for shares.
    Deposit {
        #[arg(long)]
        vault: Pubkey,
        #[arg(long)]
        amount: u64,
    },
    /// Burn vault shares for liquidity.
    Withdraw {
        #[arg(long)]
        vault: Pubkey,
        #[arg(long)]
        shares: u64,
    },
    /// Open the vault's orders account on one options market.
    InitOpenOrders {
        #[arg(long)]
        vault: Pubkey,
        #[arg(long)]
        market: Pubkey,
    },
    /// Harvest lending yield into the vault's underlying account.
    Harvest {
        #[arg(long)]
        vault: Pubkey,
    },
    /// Supply the underlying account's balance back to the lending reserve.
    ReinvestLending {
        #[arg(long)]
        vault: Pubkey,
    },
    /// Move USDC into the vault's options margin account.
    ReinvestOptions {
        #[arg(long)]
        vault: Pubkey,
        #[arg(long)]
        amount: u64,
    },
    /// Place a bid on the product matching a strike and kind.
    Bid {
        #[arg(long)]
        vault: Pubkey,
        /// Strike as a decimal, e.g. 150 or 22.5
        #[arg(long)]
        strike: Decimal,
        #[arg(long, value_enum, default_value_t = KindArg::Call)]
        kind: KindArg,
        /// Limit price as a decimal.
        #[arg(long)]
        price: Decimal,
        #[arg(long)]
        size: u64,
        #[arg(long)]
        client_order_id: Option<u64>,
    },
    /// Withdraw USDC from the options margin account.
    Redeem {
        #[arg(long)]
        vault: Pubkey,
        #[arg(long)]
        amount: u64,
    },
    /// Swap the vault's USDC into the underlying token.
    SwapToUnderlying {
        #[arg(long)]
        vault: Pubkey,
        #[arg(long)]
        amount: u64,
    },
    /// Swap the vault's underlying token into USDC.
    SwapToUsdc {
        #[arg(long)]
        vault: Pubkey,
        #[arg(long)]
        amount: u64,
    },
    /// Request test funds (devnet and local validators only).
    Airdrop {
        /// Defaults to the keypair's address.
        #[arg(long)]
        recipient: Option<Pubkey>,
        #[arg(long, default_value_t = 1_000_000_000)]
        lamports: u64,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum KindArg {
    Call,
    Put,
    Future,
}

impl From<KindArg> for OptionKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Call => OptionKind::Call,
            KindArg::Put => OptionKind::Put,
            KindArg::Future => OptionKind::Future,
        }
    }
}

// ==============================================================================
// Output
// ==============================================================================

fn load_keypair(path: Option<&Path>) -> anyhow::Result<Keypair> {
    let path = path.ok_or_else(|| anyhow!("This command needs a signer; pass --keypair <FILE>"))?;
    read_keypair_file(path).map_err(|e| anyhow!("Failed to read keypair {}: {e}", path.display()))
}

fn print_outcome(outcome: &ExecutionOutcome) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(outcome)?);
    if let Some(err) = &outcome.simulation().err {
        tracing::warn!(error = %err, "Simulation reported an error");
    }
    Ok(())
}

fn print_registry<'a>(accounts: impl Iterator<Item = &'a DecodedAccount>) {
    let mut rows: Vec<&DecodedAccount> = accounts.collect();
    rows.sort_by_key(|account| (account.kind().to_string(), *account.address()));

    let mut table = Table::new();
    table.set_header(vec!["Address", "Kind", "Details"]);
    for account in rows {
        let details = match account {
            DecodedAccount::LendingReserve(reserve) => format!(
                "mint {} | available {}",
                reserve.liquidity_mint, reserve.available_liquidity
            ),
            DecodedAccount::OptionsGroup(group) => {
                let strikes: Vec<String> = group
                    .products
                    .iter()
                    .filter(|p| p.strike.is_set && p.kind == OptionKind::Call)
                    .map(|p| from_native(p.strike.value).to_string())
                    .collect();
                format!(
                    "underlying {} | call strikes [{}]",
                    group.underlying_mint,
                    strikes.join(", ")
                )
            }
            DecodedAccount::OrderbookMarket(market) => {
                format!("base {} | quote {}", market.base_mint, market.quote_mint)
            }
        };
        table.add_row(vec![account.address().to_string(), account.kind().to_string(), details]);
    }
    println!("{table}");
}
