//! biji: a minimal command-line Bitcoin wallet.
//!
//! Keeps single secp256k1 keys in a hex key file, shows address history
//! from an Esplora server, and builds, signs and broadcasts P2PKH payments.
//! Without a subcommand it starts the interactive menu.

use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use tracing::info;

use biji_client::EsploraClient;
use biji_core::address::{Address, Network};
use biji_wallet::{Destination, SelectionPolicy, Wallet, WalletConfig};

mod config;
mod display;
mod menu;

use menu::{Console, Menu};

/// Biji command-line wallet.
#[derive(Parser)]
#[command(name = "biji")]
#[command(version, about = "A minimal command-line Bitcoin wallet.")]
struct Cli {
    /// Configuration file (default: ~/.biji/config.toml if present).
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Network (mainnet or testnet).
    #[arg(short, long, global = true)]
    network: Option<Network>,

    /// Esplora API base URL.
    #[arg(short, long, global = true)]
    server: Option<String>,

    /// Key file (default: ~/.biji/keys.txt).
    #[arg(short, long, global = true)]
    keys: Option<PathBuf>,

    /// Seconds to wait for the server.
    #[arg(short, long, global = true)]
    timeout: Option<u64>,

    /// Coin selection order (oracle-order, largest-first, smallest-first).
    #[arg(long, global = true)]
    policy: Option<SelectionPolicy>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive menu (default).
    Menu,
    /// Generate a key from a fresh random seed.
    NewKey,
    /// List receive addresses.
    Addresses,
    /// Show history and balance.
    History(HistoryArgs),
    /// Pay one or more ADDRESS=AMOUNT destinations.
    Send(SendArgs),
    /// Import a WIF private key.
    Import(ImportArgs),
    /// Print every key as WIF.
    Export,
}

#[derive(Args)]
struct HistoryArgs {
    /// Print the raw history as JSON.
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct SendArgs {
    /// Destinations as ADDRESS=AMOUNT, amount in BTC with up to 8 decimals.
    #[arg(required = true, value_name = "ADDRESS=AMOUNT")]
    payments: Vec<String>,

    /// Change address (default: first key's address).
    #[arg(long)]
    change_address: Option<Address>,

    /// Broadcast without asking.
    #[arg(short, long)]
    yes: bool,
}

#[derive(Args)]
struct ImportArgs {
    /// WIF-encoded private key.
    wif: String,
}

impl Cli {
    fn overrides(&self) -> config::Overrides {
        config::Overrides {
            network: self.network,
            server_url: self.server.clone(),
            key_file: self.keys.clone(),
            timeout_secs: self.timeout,
            selection_policy: self.policy,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = config::load(cli.config.as_deref(), None, &cli.overrides())
        .context("Failed to load configuration")?;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_level)),
        )
        .with_writer(io::stderr)
        .init();

    info!(
        network = %config.network,
        server = %config.server_url(),
        keys = %config.key_file.display(),
        policy = %config.selection_policy,
        "Starting biji"
    );

    let mut wallet = Wallet::open(config.clone()).with_context(|| {
        format!("Failed to load keys from {}", config.key_file.display())
    })?;

    match cli.command.unwrap_or(Commands::Menu) {
        Commands::Menu => run_menu(&mut wallet, &config),
        Commands::NewKey => new_key(&mut wallet),
        Commands::Addresses => list_addresses(&wallet),
        Commands::History(args) => history(&wallet, &config, args),
        Commands::Send(args) => send(&wallet, &config, args),
        Commands::Import(args) => import(&mut wallet, args),
        Commands::Export => export(&wallet),
    }
}

fn connect(config: &WalletConfig) -> Result<EsploraClient> {
    EsploraClient::from_wallet_config(config).context("Failed to set up server client")
}

fn run_menu(wallet: &mut Wallet, config: &WalletConfig) -> Result<()> {
    let client = connect(config)?;
    let stdin = io::stdin();
    let console = Console::new(stdin.lock(), io::stdout());
    Menu::new(wallet, &client, &client, console).run()
}

/// Derive a key from a new 192-bit seed and save it.
fn new_key(wallet: &mut Wallet) -> Result<()> {
    let address = wallet.new_key()?;
    wallet.save().with_context(|| {
        format!("Failed to save keys to {}", wallet.config().key_file.display())
    })?;
    println!("{address}");
    Ok(())
}

fn list_addresses(wallet: &Wallet) -> Result<()> {
    for address in wallet.addresses() {
        println!("{address}");
    }
    Ok(())
}

fn history(wallet: &Wallet, config: &WalletConfig, args: HistoryArgs) -> Result<()> {
    let client = connect(config)?;
    let history = wallet.history(&client).context("History query failed")?;
    let mut out = io::stdout().lock();
    if args.json {
        serde_json::to_writer_pretty(&mut out, &history)?;
        writeln!(out)?;
    } else {
        display::write_history(&mut out, &history)?;
        display::write_balance(&mut out, &wallet.balance(&history))?;
    }
    Ok(())
}

fn send(wallet: &Wallet, config: &WalletConfig, args: SendArgs) -> Result<()> {
    let network = wallet.network();
    let destinations = args
        .payments
        .iter()
        .map(|payment| parse_payment(payment, network))
        .collect::<Result<Vec<_>>>()?;

    let client = connect(config)?;
    let stdin = io::stdin();
    let mut console = Console::new(stdin.lock(), io::stdout());
    menu::send_payment(
        wallet,
        &client,
        &client,
        destinations,
        args.change_address,
        &mut console,
        args.yes,
    )
    .context("Send failed")?;
    Ok(())
}

fn import(wallet: &mut Wallet, args: ImportArgs) -> Result<()> {
    let address = wallet.import_wif(&args.wif).context("Failed to import key")?;
    if wallet.has_unsaved_changes() {
        wallet.save().with_context(|| {
            format!("Failed to save keys to {}", wallet.config().key_file.display())
        })?;
    }
    println!("{address}");
    Ok(())
}

fn export(wallet: &Wallet) -> Result<()> {
    let network = wallet.network();
    for key in wallet.keys().keys() {
        println!("{}\t{}", key.address(network), key.to_wif(network));
    }
    Ok(())
}

fn parse_payment(payment: &str, network: Network) -> Result<Destination> {
    let Some((address, amount)) = payment.split_once('=') else {
        bail!("Expected ADDRESS=AMOUNT, got {payment:?}");
    };
    Destination::parse(address, amount, network)
        .with_context(|| format!("Invalid destination {payment:?}"))
}
