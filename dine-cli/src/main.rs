//! `dine` - order from a restaurant table in the terminal

mod commands;
mod prompt;
mod render;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use dine_client::{ClientConfig, DinerApp, Route, RouteHistory};

#[derive(Parser, Debug)]
#[command(name = "dine")]
#[command(about = "Scan a table QR code, browse the menu and place orders")]
struct Args {
    /// Backend host, e.g. https://menu.example.com
    #[arg(long, env = "MENU_API_URL")]
    api_url: Option<String>,

    /// Directory holding the persisted table/cart/auth state
    #[arg(long, env = "MENU_DATA_DIR")]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Open a table QR link (or just its query, e.g. "table=12")
    Scan { url: String },

    /// List the menu for the current table
    Menu {
        #[arg(long)]
        category: Option<String>,
        /// Filter by name or description
        #[arg(long)]
        search: Option<String>,
    },

    /// Show a product with its sizes and add-ons
    Product { id: String },

    /// Add a product to the cart
    Add {
        product_id: String,
        #[arg(long)]
        size: Option<String>,
        #[arg(long = "addon")]
        addons: Vec<String>,
        #[arg(long, default_value_t = 1)]
        qty: u32,
    },

    /// Show the cart
    Cart,

    /// Remove a cart line
    Remove { line_id: String },

    /// Set a cart line's quantity (0 or less removes it)
    Qty {
        line_id: String,
        #[arg(allow_negative_numbers = true)]
        quantity: i64,
    },

    /// Sign in by SMS code and place the cart as an order
    Checkout,

    /// List your orders
    Orders {
        /// Keep refreshing until Ctrl-C
        #[arg(long)]
        watch: bool,
    },

    /// Cancel one item of an order
    CancelItem { order_id: String, item_id: String },

    /// Sign out
    Logout,

    /// Forget the current table
    ForgetTable,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "dine_client=info,dine=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let mut config = ClientConfig::from_env();
    if let Some(url) = args.api_url {
        config.base_url = url;
    }
    if let Some(dir) = args.data_dir {
        config = config.with_data_dir(dir);
    }
    tracing::debug!(base_url = %config.base_url, data_dir = %config.data_dir.display(), "Configuration loaded");

    let navigator = Arc::new(RouteHistory::new(Route::Home));
    let app = Arc::new(DinerApp::connect(&config, navigator.clone())?);

    let result = commands::run(args.command, &app, &config).await;

    if let Some(route) = navigator.visited().last() {
        println!("-> {route}");
    }
    result
}
