//! SIWS Wallet CLI
//!
//! Command-line tool for inspecting chain-agnostic identities and exercising
//! the sign-in flow against in-memory wallets and proxy pages.

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use serde_json::{Value, json};
use siws_wallet_core::extension::MemoryWallet;
use siws_wallet_core::wrap::{is_wrapped, to_hex, unwrap_bytes, wrap_bytes};
use siws_wallet_core::{
    ChainAgnosticAddress, ChainAgnosticId, ExtensionConnector, InjectedAccount, KNOWN_WALLETS,
    PolkadotAddress,
};
use siws_wallet_popup::{
    Envelope, MemoryWindowHost, Message, PopupSignIn, ProxyError, SignInConfig, TokioTimer,
    signin_url,
};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{Level, info, warn};
use tracing_subscriber::FmtSubscriber;

const DEFAULT_PROXY_URL: &str = "https://proxy.example.com";
const DEFAULT_RPC_URL: &str = "ws://localhost:9944";
const DEFAULT_GENESIS_HASH: &str =
    "0x4a587bf17a404e3572747add7aab7bbe56e805a5479c6c436f07f36fcc8d3ae1";

#[derive(Parser)]
#[command(name = "siws-wallet")]
#[command(about = "SIWS Wallet CLI", version)]
struct Cli {
    /// Log at debug level
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a chain id (`ns:ref`) or address (`ns:ref:address`)
    Parse {
        value: String,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Frame a message in <Bytes> tags and print it as hex
    Wrap {
        message: String,

        /// Treat the input as hex and strip the frame instead
        #[arg(long)]
        unwrap: bool,
    },

    /// Build the proxy popup URL
    SigninUrl {
        #[arg(long, default_value = DEFAULT_PROXY_URL)]
        proxy_url: String,

        #[arg(long, default_value = DEFAULT_RPC_URL)]
        rpc_url: String,
    },

    /// Run a popup sign-in against a simulated wallet and proxy page
    Simulate {
        /// JSON sign-in configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Injected name of the simulated wallet
        #[arg(long, default_value = "polkadot-js")]
        wallet: String,

        /// Account address exposed by the simulated wallet
        #[arg(
            long,
            default_value = "5Dc96kiTPTfZHmq6yTFSqejJzfUNfQQjneNesRWf9MDppJsd"
        )]
        address: String,

        #[arg(long, default_value = DEFAULT_GENESIS_HASH)]
        genesis_hash: String,

        /// Close the popup instead of answering
        #[arg(long)]
        cancel: bool,
    },

    /// List supported wallet extensions
    Wallets,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    FmtSubscriber::builder()
        .with_max_level(if cli.verbose { Level::DEBUG } else { Level::INFO })
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Parse { value, json } => parse(&value, json)?,
        Commands::Wrap { message, unwrap } => wrap(&message, unwrap)?,
        Commands::SigninUrl { proxy_url, rpc_url } => {
            url::Url::parse(&proxy_url).context("invalid proxy URL")?;
            println!("{}", signin_url(&proxy_url, &rpc_url));
        }
        Commands::Simulate {
            config,
            wallet,
            address,
            genesis_hash,
            cancel,
        } => {
            let config = load_config(config)?;
            let response = simulate(config, &wallet, &address, &genesis_hash, cancel).await?;
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        Commands::Wallets => show_wallets(),
    }

    Ok(())
}

fn parse(value: &str, as_json: bool) -> Result<()> {
    // two separators means an address
    let output = if value.matches(':').count() >= 2 {
        let address: ChainAgnosticAddress = value.parse()?;
        json!({
            "namespace": address.chain_id().namespace(),
            "reference": address.chain_id().reference(),
            "chainId": address.chain_id().to_string(),
            "address": address.address(),
            "normalized": address.to_string(),
        })
    } else {
        let id: ChainAgnosticId = value.parse()?;
        json!({
            "namespace": id.namespace(),
            "reference": id.reference(),
            "normalized": id.to_string(),
        })
    };

    if as_json {
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else if let Value::Object(fields) = output {
        for (key, value) in fields {
            println!("{key:>10}: {}", value.as_str().unwrap_or_default());
        }
    }
    Ok(())
}

fn wrap(input: &str, unwrap: bool) -> Result<()> {
    if !unwrap {
        println!("{}", to_hex(&wrap_bytes(input.as_bytes())));
        return Ok(());
    }

    let bytes = hex::decode(input.trim_start_matches("0x")).context("input is not hex")?;
    if !is_wrapped(&bytes) {
        warn!("Input carries no <Bytes> frame");
    }
    println!("{}", String::from_utf8_lossy(unwrap_bytes(&bytes)));
    Ok(())
}

fn load_config(path: Option<PathBuf>) -> Result<SignInConfig> {
    let config = match path {
        Some(path) => {
            let json = std::fs::read_to_string(&path)
                .with_context(|| format!("reading {}", path.display()))?;
            SignInConfig::from_json(&json)?
        }
        None => SignInConfig::new("1", DEFAULT_PROXY_URL, DEFAULT_RPC_URL),
    };
    config.validate()?;
    Ok(config)
}

/// Sign a SIWS message with an in-memory wallet, then deliver it through a
/// scripted proxy popup
async fn simulate(
    config: SignInConfig,
    wallet_name: &str,
    address: &str,
    genesis_hash: &str,
    cancel: bool,
) -> Result<Value> {
    let wallet = MemoryWallet::enableable(wallet_name)
        .with_version(siws_wallet_core::VERSION)
        .with_accounts(vec![InjectedAccount::new(address).with_name("Simulated")]);
    let connector =
        ExtensionConnector::new(Some(MemoryWallet::registry([wallet])), "siws-wallet simulate")?;

    let extension = connector.connect(wallet_name).await?;
    info!(wallet = %extension.name, version = %extension.version, "Wallet connected");

    let account = connector
        .get_accounts()
        .await?
        .into_iter()
        .next()
        .context("wallet exposes no accounts")?;
    let identity = PolkadotAddress::new(genesis_hash, account.address)?;

    let domain = url::Url::parse(&config.proxy_url)?
        .host_str()
        .unwrap_or("localhost")
        .to_string();
    let message = format!("{domain} wants you to sign in with your Polkadot account:\n{identity}");
    let signature = connector
        .sign_message_with_wrapped_bytes(message.as_bytes(), identity.address())
        .await?;

    let detail = json!({
        "signIn": {
            "siwsPayload": { "message": message, "signature": signature }
        },
        "address": identity.to_string(),
    });

    let host = if cancel {
        MemoryWindowHost::new()
    } else {
        MemoryWindowHost::new().with_responder(move |envelope| {
            if envelope.is(Message::SigninPayload) {
                vec![Envelope::new(
                    Message::WalletProxyResponseMessage.as_str(),
                    json!({ "detail": detail.clone() }),
                )]
            } else {
                Vec::new()
            }
        })
    };

    let mut session = PopupSignIn::new(host.clone(), TokioTimer, config);
    let user = async {
        if cancel {
            tokio::time::sleep(Duration::from_millis(1_200)).await;
            if let Some(window) = host.last_window() {
                info!("Closing the popup");
                window.close();
            }
        }
    };

    let (result, ()) = tokio::join!(session.get_login_or_registration_payload(), user);
    match result {
        Ok(response) => Ok(response.into_inner()),
        Err(ProxyError::Cancelled) => bail!("sign-in cancelled: popup closed"),
        Err(e) => Err(e.into()),
    }
}

fn show_wallets() {
    println!("SIWS Wallet v{}", siws_wallet_core::VERSION);
    println!();
    println!("Supported wallets:");
    for wallet in KNOWN_WALLETS {
        println!("  - {} ({})", wallet.display_name, wallet.injected_name);
        for link in wallet.browser_downloads.iter().chain(wallet.app_downloads) {
            println!("      {}: {}", link.platform, link.url);
        }
    }
}
