//! Subcommand handlers

use std::sync::Arc;

use anyhow::{Context, Result, bail};
use dine_client::catalog::{ProductSelection, resolve_image_url, search_products};
use dine_client::qr::handle_scan;
use dine_client::{
    Checkout, CheckoutError, CheckoutStep, ClientConfig, DinerApp, OrderPoller, SubmitOutcome,
};

use crate::Command;
use crate::prompt::Prompt;
use crate::render;

pub async fn run(command: Command, app: &Arc<DinerApp>, config: &ClientConfig) -> Result<()> {
    match command {
        Command::Scan { url } => scan(app, &url).await,
        Command::Menu { category, search } => menu(app, category.as_deref(), search.as_deref()).await,
        Command::Product { id } => product(app, config, &id).await,
        Command::Add {
            product_id,
            size,
            addons,
            qty,
        } => add(app, config, &product_id, size.as_deref(), &addons, qty).await,
        Command::Cart => {
            render::cart(&app.cart());
            Ok(())
        }
        Command::Remove { line_id } => {
            let mut cart = app.cart();
            if cart.line(&line_id).is_none() {
                bail!("No cart line {line_id}");
            }
            cart.remove_item(&line_id);
            render::cart(&cart);
            Ok(())
        }
        Command::Qty { line_id, quantity } => {
            let mut cart = app.cart();
            if cart.line(&line_id).is_none() {
                bail!("No cart line {line_id}");
            }
            cart.update_quantity(&line_id, quantity);
            render::cart(&cart);
            Ok(())
        }
        Command::Checkout => checkout(app).await,
        Command::Orders { watch } => orders(app, config, watch).await,
        Command::CancelItem { order_id, item_id } => {
            app.gateway()
                .cancel_item(&order_id, &item_id)
                .await
                .map_err(|e| anyhow::anyhow!(e.user_message()))?;
            println!("Item {item_id} cancelled");
            Ok(())
        }
        Command::Logout => {
            app.auth().logout();
            println!("Signed out");
            Ok(())
        }
        Command::ForgetTable => {
            app.table().clear_table();
            println!("Table forgotten");
            Ok(())
        }
    }
}

async fn scan(app: &DinerApp, url: &str) -> Result<()> {
    handle_scan(app, url).await;
    let session = app.table().session().clone();
    match session.table_number {
        Some(number) if session.needs_resolution() => {
            println!("Table {number} (not confirmed by the restaurant yet)")
        }
        Some(number) => println!(
            "Table {number} at {}{}",
            session.restaurant_name.as_deref().unwrap_or("the restaurant"),
            session
                .menu_name
                .map(|m| format!(", menu \"{m}\""))
                .unwrap_or_default()
        ),
        None => println!("No table in this link"),
    }
    Ok(())
}

async fn menu(app: &DinerApp, category: Option<&str>, search: Option<&str>) -> Result<()> {
    let menu_id = app.table().session().menu_id.clone();
    let gateway = app.gateway();

    if category.is_none() {
        let categories = gateway
            .categories(menu_id.as_deref())
            .await
            .context("Failed to load categories")?;
        let names: Vec<String> = categories
            .iter()
            .filter(|c| c.is_active)
            .map(|c| format!("{} ({})", c.name, c.id))
            .collect();
        if !names.is_empty() {
            println!("Categories: {}", names.join(", "));
        }
    }

    let products = gateway
        .products(category, menu_id.as_deref())
        .await
        .context("Failed to load products")?;
    render::products(&search_products(&products, search.unwrap_or_default()));
    Ok(())
}

async fn product(app: &DinerApp, config: &ClientConfig, id: &str) -> Result<()> {
    let detail = app
        .gateway()
        .product(id)
        .await
        .map_err(|e| anyhow::anyhow!(e.user_message()))?;
    let image = resolve_image_url(config.asset_base(), detail.product.image_url.as_deref());
    render::product(&detail, image);
    Ok(())
}

async fn add(
    app: &DinerApp,
    config: &ClientConfig,
    product_id: &str,
    size: Option<&str>,
    addons: &[String],
    qty: u32,
) -> Result<()> {
    let detail = app
        .gateway()
        .product(product_id)
        .await
        .map_err(|e| anyhow::anyhow!(e.user_message()))?;
    if !detail.product.is_available {
        bail!("{} is not available right now", detail.product.name);
    }

    let mut selection = ProductSelection::new(detail);
    if let Some(size) = size
        && !selection.select_size(size)
    {
        bail!("Unknown size {size}");
    }
    for addon in addons {
        if !selection.toggle_addon(addon) {
            bail!("Add-on {addon} is unknown or unavailable");
        }
    }
    selection.set_quantity(qty);

    let mut line = selection.to_cart_line();
    line.image_url = resolve_image_url(config.asset_base(), line.image_url.as_deref());
    let name = line.product_name.clone();

    let mut cart = app.cart();
    let line_id = cart.add_item(line);
    println!(
        "Added {name} x{} ({})  [{line_id}]",
        selection.quantity(),
        render::money(selection.total_price())
    );
    println!("Cart: {} item(s), {}", cart.item_count(), render::money(cart.total()));
    Ok(())
}

async fn checkout(app: &Arc<DinerApp>) -> Result<()> {
    let Some(checkout) = Checkout::open(app.clone()) else {
        println!("Your cart is empty");
        return Ok(());
    };
    let mut prompt = Prompt::new();

    render::cart(&app.cart());
    if let Some(advisory) = checkout.check_restaurant().await {
        println!("\n{}", advisory.message);
        if !prompt.confirm("Continue anyway?").await? {
            checkout.advisory_back_to_menu();
            return Ok(());
        }
        checkout.dismiss_advisory();
    }

    loop {
        match checkout.step() {
            CheckoutStep::Phone => {
                let Some(input) = prompt.ask("Phone number: ").await? else {
                    return Ok(());
                };
                if input.is_empty() {
                    return Ok(());
                }
                if !checkout.input_phone(&input) {
                    println!("Too many digits");
                    continue;
                }
                println!("Sending code to {}", checkout.phone());
                if let Err(e) = checkout.send_code().await {
                    println!("{}", checkout.auth_error().unwrap_or_else(|| e.to_string()));
                }
            }
            CheckoutStep::Otp => {
                let Some(input) = prompt.ask("Code from SMS (or \"back\"): ").await? else {
                    return Ok(());
                };
                if input == "back" {
                    checkout.change_number();
                    continue;
                }
                checkout.input_otp(&input);
                if let Err(e) = checkout.verify_code().await {
                    println!("{}", checkout.auth_error().unwrap_or_else(|| e.to_string()));
                }
            }
            CheckoutStep::Confirm => {
                let notes = prompt.ask("Notes for the kitchen (optional): ").await?;
                checkout.set_instructions(notes.as_deref().unwrap_or_default());
                if !prompt.confirm("Place order?").await? {
                    return Ok(());
                }
                match checkout.submit().await {
                    Ok(outcome) => {
                        let verb = match outcome {
                            SubmitOutcome::Created { .. } => "placed",
                            SubmitOutcome::Appended { .. } => "added to your open order",
                        };
                        match outcome.table_number() {
                            Some(n) => println!("Order {} {verb}, table {n}", outcome.order_id()),
                            None => println!("Order {} {verb}", outcome.order_id()),
                        }
                        return Ok(());
                    }
                    Err(CheckoutError::SessionExpired) => {
                        println!("Your session expired, please sign in again");
                    }
                    Err(e) => {
                        println!("{}", checkout.submit_error().unwrap_or_else(|| e.to_string()));
                        if !prompt.confirm("Try again?").await? {
                            return Ok(());
                        }
                    }
                }
            }
        }
    }
}

async fn orders(app: &DinerApp, config: &ClientConfig, watch: bool) -> Result<()> {
    if !app.auth().is_authenticated() {
        bail!("Sign in through checkout to see your orders");
    }

    if !watch {
        let orders = app
            .gateway()
            .orders()
            .await
            .map_err(|e| anyhow::anyhow!(e.user_message()))?;
        print_orders(&orders);
        return Ok(());
    }

    let poller = OrderPoller::spawn(app.gateway_handle(), config.poll_interval);
    let mut view = poller.subscribe();
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            changed = view.changed() => {
                if changed.is_err() {
                    break;
                }
                let snapshot = view.borrow_and_update().clone();
                println!("\n--- {} ---", chrono::Local::now().format("%H:%M:%S"));
                if let Some(error) = &snapshot.last_error {
                    println!("Refresh failed: {error}");
                }
                print_orders(&snapshot.orders);
                if !app.auth().is_authenticated() {
                    break;
                }
            }
        }
    }
    poller.stop().await;
    Ok(())
}

fn print_orders(orders: &[dine_client::Order]) {
    if orders.is_empty() {
        println!("No orders yet");
    }
    for order in orders {
        render::order(order);
    }
}
