//! # rocketshoes
//!
//! Command line front end for the RocketShoes cart.
//!
//! ```text
//! rocketshoes show
//! rocketshoes add 3
//! rocketshoes update 3 2
//! rocketshoes remove 3
//! rocketshoes serve --fixture fixtures/server.json --port 3333
//! ```
//!
//! Cart commands print the resulting cart and header badge to stdout.
//! Failure notices go to stderr and set a non-zero exit code.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use rocketshoes_api::{Catalog, CatalogFixture, FixtureServer, HttpCatalog};
use rocketshoes_cart::{CartConfig, CartStore, CatalogSource, Notifier};
use rocketshoes_core::{Cart, CartBadge, Notice, Operation, ProductId, UpdateProductAmount};
use rocketshoes_storage::{SqliteStorage, StorageConfig};

const DEFAULT_FIXTURE: &str = "fixtures/server.json";
const DEFAULT_PORT: u16 = 3333;

#[derive(Parser)]
#[command(name = "rocketshoes", version, about = "RocketShoes shopping cart")]
struct Cli {
    #[arg(long, global = true, value_name = "PATH", help = "Config file (default: platform config dir)")]
    config: Option<PathBuf>,

    #[arg(long, global = true, help = "Print the cart as JSON")]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    #[command(about = "Show the cart")]
    Show,

    #[command(about = "Add one unit of a product")]
    Add {
        #[arg(help = "Product id")]
        id: ProductId,
    },

    #[command(about = "Remove a product from the cart")]
    Remove {
        #[arg(help = "Product id")]
        id: ProductId,
    },

    #[command(about = "Set the amount of a product in the cart")]
    Update {
        #[arg(help = "Product id")]
        id: ProductId,
        #[arg(allow_negative_numbers = true, help = "New amount; zero or less is ignored")]
        amount: i64,
    },

    #[command(about = "Serve a catalog fixture over HTTP")]
    Serve {
        #[arg(long, value_name = "PATH", help = "Fixture document (default: fixtures/server.json)")]
        fixture: Option<PathBuf>,
        #[arg(long, default_value_t = DEFAULT_PORT, help = "Port to listen on")]
        port: u16,
    },
}

/// Prints notices to stderr.
struct StderrNotifier;

impl Notifier for StderrNotifier {
    fn notify(&self, _operation: Operation, notice: Notice) {
        eprintln!("! {}", notice.message());
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();

    match run(Cli::parse()).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

/// Initializes the tracing subscriber on stderr.
///
/// `RUST_LOG` overrides the default `info` level, with sqlx capped at `warn`.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,sqlx=warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Runs one command. `Ok(false)` means the cart operation was refused.
async fn run(cli: Cli) -> Result<bool> {
    let config = CartConfig::load(cli.config.clone()).context("loading configuration")?;
    debug!(?config, "Configuration loaded");

    let command = match cli.command {
        Command::Serve { fixture, port } => {
            serve(&config, fixture, port).await?;
            return Ok(true);
        }
        command => command,
    };

    let store = open_store(&config).await?;

    let outcome = match command {
        Command::Show | Command::Serve { .. } => Ok(store.cart()),
        Command::Add { id } => store.add_product(id).await,
        Command::Remove { id } => store.remove_product(id).await,
        Command::Update { id, amount } => {
            store
                .update_product_amount(UpdateProductAmount {
                    product_id: id,
                    amount,
                })
                .await
        }
    };

    // The store has already reported the failure; show the unchanged cart.
    let cart = outcome.as_ref().cloned().unwrap_or_else(|_| store.cart());
    print_cart(&cart, &store.header().badge(), cli.json)?;

    Ok(outcome.is_ok())
}

async fn open_store(config: &CartConfig) -> Result<CartStore> {
    let catalog: Arc<dyn Catalog> = match config.api.catalog {
        CatalogSource::Remote => Arc::new(
            HttpCatalog::new(&config.api.base_url, config.api.timeout())
                .context("creating catalog client")?,
        ),
        CatalogSource::Fixture => {
            let cwd = std::env::current_dir()?;
            let path = config
                .fixture_path(&cwd)
                .context("fixture catalog selected without fixture_path")?;
            Arc::new(CatalogFixture::from_file(path)?)
        }
    };

    let db_path = config.database_path()?;
    let storage = SqliteStorage::open(StorageConfig::new(db_path.clone()))
        .await
        .with_context(|| format!("opening cart database {}", db_path.display()))?;

    let store = CartStore::builder(catalog, Arc::new(storage))
        .notifier(Arc::new(StderrNotifier))
        .storage_key(config.storage.cart_key.clone())
        .open()
        .await?;

    Ok(store)
}

async fn serve(config: &CartConfig, fixture: Option<PathBuf>, port: u16) -> Result<()> {
    let cwd = std::env::current_dir()?;
    let path = fixture
        .or_else(|| config.fixture_path(&cwd))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_FIXTURE));

    let fixture = CatalogFixture::from_file(&path)?;
    let handle = FixtureServer::new(fixture)
        .start(&format!("127.0.0.1:{}", port))
        .await?;

    println!("Catalog fixture served at {}", handle.base_url());

    tokio::signal::ctrl_c()
        .await
        .context("waiting for Ctrl+C")?;
    info!("Ctrl+C received");
    handle.shutdown().await;

    Ok(())
}

fn print_cart(cart: &Cart, badge: &CartBadge, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(cart)?);
        return Ok(());
    }

    println!("My cart: {}", badge);
    if cart.is_empty() {
        println!("  (empty)");
        return Ok(());
    }

    for item in cart.items() {
        println!(
            "  #{:<4} {:<40} {:>3} x {:>8.2} = {:>9.2}",
            item.id,
            item.title,
            item.amount,
            item.price,
            item.subtotal()
        );
    }
    println!("  Total: {:.2}", cart.total_price());

    Ok(())
}
