//! Plain-text rendering

use chrono::{DateTime, Local};
use dine_client::catalog::format_price;
use dine_client::{CartStore, Order, OrderItemStatus, OrderStatus, Product, ProductDetail};
use rust_decimal::Decimal;

pub fn money(amount: Decimal) -> String {
    format!("{} TJS", format_price(amount))
}

fn order_status(status: OrderStatus) -> &'static str {
    match status {
        OrderStatus::Pending => "waiting for confirmation",
        OrderStatus::Confirmed => "confirmed",
        OrderStatus::Preparing => "being prepared",
        OrderStatus::Ready => "ready",
        OrderStatus::Delivered => "served",
        OrderStatus::Completed => "completed",
        OrderStatus::Cancelled => "cancelled",
    }
}

fn created_at(raw: &str) -> String {
    DateTime::parse_from_rfc3339(raw)
        .map(|t| t.with_timezone(&Local).format("%d.%m %H:%M").to_string())
        .unwrap_or_else(|_| raw.to_string())
}

pub fn products(products: &[&Product]) {
    if products.is_empty() {
        println!("Nothing found");
        return;
    }
    for p in products {
        let availability = if p.is_available { "" } else { "  (unavailable)" };
        println!(
            "{:<12} {:<28} {:>12}  {} min{}",
            p.id,
            p.name,
            money(p.base_price),
            p.prep_time_minutes,
            availability
        );
    }
}

pub fn product(detail: &ProductDetail, image_url: Option<String>) {
    let p = &detail.product;
    println!("{} ({})", p.name, p.id);
    if !p.description.is_empty() {
        println!("  {}", p.description);
    }
    println!(
        "  {}  |  {} kcal  |  {} min  |  rating {:.1}",
        money(p.base_price),
        p.calories,
        p.prep_time_minutes,
        p.rating
    );
    if let Some(url) = image_url {
        println!("  image: {url}");
    }
    if !detail.sizes.is_empty() {
        println!("Sizes:");
        for size in &detail.sizes {
            let marker = if size.is_default { " (default)" } else { "" };
            println!("  {:<12} {:<16} +{}{}", size.id, size.name, money(size.price_modifier), marker);
        }
    }
    if !detail.addons.is_empty() {
        println!("Add-ons:");
        for addon in &detail.addons {
            let marker = if addon.is_available { "" } else { " (unavailable)" };
            println!("  {:<12} {:<16} +{}{}", addon.id, addon.name, money(addon.price), marker);
        }
    }
}

pub fn cart(cart: &CartStore) {
    if cart.is_empty() {
        println!("Cart is empty");
        return;
    }
    for line in cart.lines() {
        let mut name = line.product_name.clone();
        if let Some(size) = &line.size_name {
            name.push_str(&format!(" ({size})"));
        }
        println!(
            "{:<32} x{:<3} {:>12}   [{}]",
            name,
            line.quantity,
            money(line.total_price),
            line.id
        );
        if !line.addon_names.is_empty() {
            println!("    + {}", line.addon_names.join(", "));
        }
    }
    println!("{:<37} {:>12}", "Subtotal", money(cart.subtotal()));
    println!("{:<37} {:>12}", "Service (10%)", money(cart.tax()));
    println!("{:<37} {:>12}", "Total", money(cart.total()));
}

pub fn order(order: &Order) {
    println!(
        "Order {}  table {}  {}  - {}",
        order.id,
        order.table_number,
        created_at(&order.created_at),
        order_status(order.status)
    );
    for item in &order.items {
        let state = match item.status {
            OrderItemStatus::Cancelled => " (cancelled)",
            OrderItemStatus::Pending => " (pending)",
            OrderItemStatus::Active => "",
        };
        println!(
            "  {:<10} {:<28} x{:<3} {:>12}{}",
            item.id,
            item.product_name,
            item.quantity,
            money(item.total_price),
            state
        );
    }
    println!("  Total {}", money(order.total));
}
