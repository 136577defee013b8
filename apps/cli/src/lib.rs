//! # Stride CLI Library
//!
//! Everything behind the `stride` binary: argument parsing, startup wiring
//! and output.
//!
//! ## Module Organization
//! ```text
//! stride_cli/
//! ├── lib.rs          ◄─── You are here (startup & dispatch)
//! ├── api.rs          ◄─── HTTP storefront client
//! ├── state/
//! │   ├── mod.rs      ◄─── State type exports
//! │   ├── storefront.rs ◄─ Stock/catalog backend selection
//! │   ├── cart.rs     ◄─── CartManager + TerminalNotifier
//! │   └── config.rs   ◄─── Environment configuration
//! ├── commands/
//! │   ├── mod.rs      ◄─── Command exports
//! │   ├── cart.rs     ◄─── show / add / remove / set
//! │   └── product.rs  ◄─── products
//! └── error.rs        ◄─── ApiError for infrastructure failures
//! ```
//!
//! ## Exit Codes
//! | Code | Meaning                                              |
//! |------|------------------------------------------------------|
//! | 0    | Operation accepted (or read-only command)            |
//! | 1    | Cart operation rejected, message printed to stderr   |
//! | 2    | Startup or storefront failure (`ApiError`)           |

pub mod api;
pub mod commands;
pub mod error;
pub mod state;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use commands::cart::CartResponse;
use error::ApiError;
use state::{cart_store, CartState, ConfigState, Storefront};
use stride_db::{Database, DbConfig};

#[derive(Debug, Parser)]
#[command(
    name = "stride",
    version,
    about = "Stride Cart storefront CLI",
    long_about = "Manage a persisted shopping cart with stock-aware add, remove and quantity updates.",
    after_help = "Examples:\n  stride products\n  stride add 3\n  stride set 3 2\n  stride remove 3\n  STRIDE_BACKEND=http stride show --json"
)]
pub struct Cli {
    /// Print JSON instead of a table
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(flatten)]
    Cart(CartCommand),
    #[command(about = "List the catalog with stock levels")]
    Products {
        #[arg(long, default_value_t = 50)]
        limit: u32,
    },
}

/// Subcommands that open the cart and print it afterwards.
#[derive(Debug, Subcommand)]
enum CartCommand {
    #[command(about = "Show the cart with totals")]
    Show,
    #[command(about = "Add one unit of a product")]
    Add { id: i64 },
    #[command(about = "Remove a product from the cart")]
    Remove { id: i64 },
    #[command(about = "Set the quantity of a product already in the cart")]
    Set {
        id: i64,
        #[arg(allow_negative_numbers = true)]
        amount: i64,
    },
}

/// Parses arguments, runs one command and maps the outcome to an exit code.
pub async fn run() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();
    let json = cli.json;

    match execute(cli).await {
        Ok(code) => code,
        Err(err) => {
            error!(code = ?err.code, message = %err.message, "Command failed");
            if json {
                print_json(&err);
            } else {
                eprintln!("error: {}", err.message);
            }
            ExitCode::from(2)
        }
    }
}

async fn execute(cli: Cli) -> Result<ExitCode, ApiError> {
    let config = ConfigState::from_env();
    let db_path = get_database_path(&config)?;
    info!(?db_path, backend = ?config.backend, "Starting stride");

    let db = Database::new(DbConfig::new(db_path)).await?;
    let storefront = Storefront::from_config(&config, &db)?;

    let code = match cli.command {
        Command::Products { limit } => {
            let listings = commands::product::list_products(&storefront, limit).await?;
            if cli.json {
                print_json(&listings);
            } else {
                print!("{}", commands::product::render_products(&listings, &config));
            }
            ExitCode::SUCCESS
        }
        Command::Cart(command) => {
            let cart = CartState::open(&storefront, cart_store(&config, &db)).await;
            let response = run_cart_command(&cart, command).await;

            if cli.json {
                print_json(&response);
            } else {
                print!("{}", commands::cart::render_cart(&response, &config));
            }

            if cart.notifications() > 0 {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            }
        }
    };

    db.close().await;
    Ok(code)
}

async fn run_cart_command(cart: &CartState, command: CartCommand) -> CartResponse {
    match command {
        CartCommand::Show => commands::cart::get_cart(cart),
        CartCommand::Add { id } => commands::cart::add_to_cart(cart, id).await,
        CartCommand::Remove { id } => commands::cart::remove_from_cart(cart, id).await,
        CartCommand::Set { id, amount } => {
            commands::cart::update_cart_item(cart, id, amount).await
        }
    }
}

fn print_json<T: Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(text) => println!("{}", text),
        Err(err) => error!(%err, "Failed to serialize output"),
    }
}

/// Initializes the tracing subscriber for structured logging.
///
/// Logs go to stderr so stdout stays parseable with `--json`.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=stride=trace` - Show trace for stride crates only
/// - Default: `info,stride=debug,sqlx=warn`
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,stride=debug,sqlx=warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Determines the database file path.
///
/// `STRIDE_DB_PATH` wins, otherwise [`DbConfig::default_path`] is used and
/// its directory created.
fn get_database_path(config: &ConfigState) -> Result<PathBuf, ApiError> {
    if let Some(path) = &config.database_path {
        return Ok(path.clone());
    }

    let path = DbConfig::default_path()
        .ok_or_else(|| ApiError::config("Could not determine app data directory"))?;

    if let Some(data_dir) = path.parent() {
        std::fs::create_dir_all(data_dir).map_err(|e| {
            ApiError::config(format!(
                "Could not create {}: {}",
                data_dir.display(),
                e
            ))
        })?;
    }

    Ok(path)
}
