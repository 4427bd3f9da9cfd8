//! quill: a light wallet talking to quill full nodes.

use anyhow::{bail, Context};
use clap::Parser;
use std::path::PathBuf;

use quill_network::ResponseMode;
use quill_types::{Address, SpendingPolicy, TxHash};
use quill_utils::LogFormat;
use quill_wallet_core::{load_keyring, save_keyring, KeyManager, Keyring, Wallet, WalletConfig};

#[derive(Parser)]
#[command(name = "quill", about = "quill light wallet")]
struct Cli {
    /// Path to a TOML configuration file. File settings are the base;
    /// CLI flags and env vars override them.
    #[arg(long, env = "QUILL_CONFIG")]
    config: Option<PathBuf>,

    /// Encrypted keystore file.
    #[arg(long, env = "QUILL_KEYSTORE")]
    keystore: Option<PathBuf>,

    /// Keystore password.
    #[arg(long, env = "QUILL_PASSWORD", hide_env_values = true)]
    password: Option<String>,

    /// Full node to query as "host:port". Repeat for several.
    #[arg(long = "peer", env = "QUILL_PEERS", value_delimiter = ',')]
    peers: Vec<String>,

    /// Reply delivery: "synchronous" or "callback".
    #[arg(long, env = "QUILL_MODE")]
    mode: Option<ResponseMode>,

    /// Log level: "trace", "debug", "info", "warn", "error".
    #[arg(long, env = "QUILL_LOG_LEVEL")]
    log_level: Option<String>,

    /// Log format: "human" or "json".
    #[arg(long, env = "QUILL_LOG_FORMAT")]
    log_format: Option<LogFormat>,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand)]
enum Command {
    /// Create a new keystore.
    Keygen {
        /// Number of key pairs; the threshold policy needs its full key count.
        #[arg(long, default_value_t = 1)]
        keys: usize,

        /// Replace an existing keystore file.
        #[arg(long)]
        force: bool,
    },
    /// Print the wallet's addresses.
    Address {
        /// Print the threshold (multi-key) address instead.
        #[arg(long)]
        multi: bool,
    },
    /// Query a balance.
    Balance {
        /// Address to query; defaults to the wallet's own.
        #[arg(long)]
        address: Option<Address>,
    },
    /// List unspent outputs.
    Utxos {
        #[arg(long)]
        address: Option<Address>,
    },
    /// Build, sign and submit a spend.
    Send {
        #[arg(long)]
        to: Address,

        #[arg(long)]
        value: u64,

        /// Defaults to the configured fee.
        #[arg(long)]
        fee: Option<u64>,

        /// "single" or "threshold".
        #[arg(long, default_value = "single")]
        policy: String,
    },
    /// Ask for a transaction's confirmation status.
    Status { txid: TxHash },
}

fn load_config(cli: &Cli) -> anyhow::Result<WalletConfig> {
    let mut config = match &cli.config {
        Some(path) => WalletConfig::from_toml_file(path)?,
        None => WalletConfig::default(),
    };
    if let Some(keystore) = &cli.keystore {
        config.keystore_path = keystore.clone();
    }
    if !cli.peers.is_empty() {
        config.peers = cli.peers.clone();
    }
    if let Some(mode) = cli.mode {
        config.response_mode = mode;
    }
    if let Some(level) = &cli.log_level {
        config.log_level = level.clone();
    }
    if let Some(format) = cli.log_format {
        config.log_format = format.to_string();
    }
    Ok(config)
}

fn parse_policy(name: &str, threshold_keys: usize) -> anyhow::Result<SpendingPolicy> {
    match name.to_ascii_lowercase().as_str() {
        "single" | "single-sig" => Ok(SpendingPolicy::SingleSig),
        "threshold" | "multi" => Ok(SpendingPolicy::Threshold { n: threshold_keys }),
        other => bail!("unknown spending policy {other:?}, expected \"single\" or \"threshold\""),
    }
}

fn password(cli: &Cli) -> anyhow::Result<&str> {
    cli.password
        .as_deref()
        .context("a keystore password is required (--password or QUILL_PASSWORD)")
}

fn open_wallet(cli: &Cli, config: &WalletConfig) -> anyhow::Result<Wallet> {
    let keys = load_keyring(&config.keystore_path, password(cli)?)
        .with_context(|| format!("opening keystore {}", config.keystore_path.display()))?;
    Ok(Wallet::from_config(config, keys)?)
}

fn validated(address: &Address) -> anyhow::Result<()> {
    if !quill_crypto::validate_address(address) {
        bail!("invalid address {address}");
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = load_config(&cli)?;

    quill_utils::init_logging(config.log_format.parse()?, &config.log_level)?;
    if let Some(path) = &cli.config {
        tracing::debug!("Loaded config from {}", path.display());
    }

    match &cli.command {
        Command::Keygen { keys, force } => {
            let path = &config.keystore_path;
            if path.exists() && !force {
                bail!("{} already exists, pass --force to replace it", path.display());
            }
            let ring = Keyring::generate(*keys)?;
            save_keyring(&ring, path, password(&cli)?)?;
            println!("{}", ring.primary_address());
        }
        Command::Address { multi } => {
            let wallet = open_wallet(&cli, &config)?;
            if *multi {
                println!("{}", wallet.multi_address()?);
            } else {
                println!("{}", wallet.address());
            }
        }
        Command::Balance { address } => {
            if let Some(a) = address {
                validated(a)?;
            }
            let wallet = open_wallet(&cli, &config)?;
            match wallet.get_balance(address.as_ref()).await? {
                Some(balance) => println!("{balance}"),
                None => bail!("no peer answered the balance query"),
            }
        }
        Command::Utxos { address } => {
            if let Some(a) = address {
                validated(a)?;
            }
            let wallet = open_wallet(&cli, &config)?;
            match wallet.get_utxos(address.as_ref()).await? {
                Some(utxos) => {
                    for u in utxos {
                        println!(
                            "{}:{} value={} height={}{}",
                            u.outpoint.txid,
                            u.outpoint.index,
                            u.value,
                            u.height,
                            if u.is_coinbase { " coinbase" } else { "" }
                        );
                    }
                }
                None => bail!("no peer answered the UTXO query"),
            }
        }
        Command::Send {
            to,
            value,
            fee,
            policy,
        } => {
            validated(to)?;
            let policy = parse_policy(policy, config.threshold_keys)?;
            let wallet = open_wallet(&cli, &config)?;
            let tx = wallet.submit_transaction(policy, to, *value, *fee).await?;
            println!("{}", quill_crypto::transaction_id(&tx)?);
        }
        Command::Status { txid } => {
            let wallet = open_wallet(&cli, &config)?;
            match wallet.get_transaction_status(txid).await? {
                Some(status) => println!("{status}"),
                None => println!("unknown"),
            }
        }
    }

    Ok(())
}
