//! Order notification payload
//!
//! Renders a placed order into the plain-text summary handed to the
//! external chat transport. Built only from the persisted header and
//! item rows, so a resend after restart produces the same text.

use std::fmt::Write;

use rust_decimal::Decimal;

use crate::pricing::calculator::round_percent_of;
use shared::models::{Order, OrderItem};

fn fmt_money(minor: i64) -> String {
    format!("{}.{:02}", minor / 100, (minor % 100).abs())
}

fn describe_item(item: &OrderItem) -> String {
    match item {
        OrderItem::Catalog {
            product_id, size, ..
        } => format!("product #{product_id} ({size})"),
        OrderItem::Custom {
            size,
            color,
            text,
            ..
        } => {
            let mut desc = if color.is_empty() {
                format!("custom ({size})")
            } else {
                format!("custom ({size}, {color})")
            };
            if let Some(text) = text {
                let _ = write!(desc, " \"{text}\"");
            }
            desc
        }
    }
}

/// Plain-text order summary for the notification channel.
pub fn build_order_message(order: &Order, items: &[OrderItem]) -> String {
    let mut msg = String::new();
    let _ = writeln!(msg, "New order #{}", order.id);

    let contact = match &order.customer_email {
        Some(email) => format!("{} ({}, {})", order.customer_name, order.customer_phone, email),
        None => format!("{} ({})", order.customer_name, order.customer_phone),
    };
    let _ = writeln!(msg, "Customer: {contact}");
    let _ = writeln!(msg, "Ship to: {}", order.shipping_address);
    let _ = writeln!(msg, "Payment: {}", order.payment_channel);

    let _ = writeln!(msg, "Items:");
    let mut subtotal = 0;
    for item in items {
        subtotal += item.line_total();
        let _ = writeln!(
            msg,
            "  - {} x {} @ {} = {}",
            item.quantity(),
            describe_item(item),
            fmt_money(item.unit_price()),
            fmt_money(item.line_total()),
        );
    }

    let _ = writeln!(msg, "Subtotal: {}", fmt_money(subtotal));
    let mut after_discount = subtotal;
    if let (Some(code), Some(percent)) = (&order.coupon_code, order.coupon_discount_percent) {
        // The frozen percent is authoritative; the coupon row may have
        // changed or been deleted since checkout.
        let discount = round_percent_of(subtotal, Decimal::from(percent));
        let _ = writeln!(msg, "Discount ({code}, {percent}%): -{}", fmt_money(discount));
        after_discount = subtotal - discount;
    }
    let extras = order.total_amount - after_discount;
    if extras > 0 {
        let _ = writeln!(msg, "Shipping & tax: {}", fmt_money(extras));
    }
    let _ = write!(msg, "Total: {}", fmt_money(order.total_amount));

    msg
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::{OrderKind, OrderStatus};

    fn header() -> Order {
        Order {
            id: 420017,
            customer_name: "Dana Wu".into(),
            customer_email: None,
            customer_phone: "5550001".into(),
            shipping_address: "12 Harbor Rd".into(),
            payment_channel: "stripe".into(),
            total_amount: 2760,
            coupon_code: None,
            coupon_discount_percent: None,
            kind: OrderKind::Catalog,
            status: OrderStatus::Pending,
            created_at: 0,
        }
    }

    #[test]
    fn renders_lines_and_breakdown() {
        let items = vec![OrderItem::Catalog {
            product_id: 7,
            size: "M".into(),
            quantity: 2,
            unit_price: 1200,
        }];
        let msg = build_order_message(&header(), &items);

        assert!(msg.starts_with("New order #420017"));
        assert!(msg.contains("Customer: Dana Wu (5550001)"));
        assert!(msg.contains("  - 2 x product #7 (M) @ 12.00 = 24.00"));
        assert!(msg.contains("Subtotal: 24.00"));
        assert!(msg.contains("Shipping & tax: 3.60"));
        assert!(msg.ends_with("Total: 27.60"));
        assert!(!msg.contains("Discount"));
    }

    #[test]
    fn coupon_line_uses_the_frozen_percent() {
        let mut order = header();
        order.coupon_code = Some("DEV10".into());
        order.coupon_discount_percent = Some(10);
        order.total_amount = 2160;
        let items = vec![OrderItem::Catalog {
            product_id: 7,
            size: "M".into(),
            quantity: 2,
            unit_price: 1200,
        }];

        let msg = build_order_message(&order, &items);
        assert!(msg.contains("Discount (DEV10, 10%): -2.40"));
        assert!(msg.ends_with("Total: 21.60"));
    }

    #[test]
    fn custom_item_shows_color_and_print_text() {
        let items = vec![OrderItem::Custom {
            size: "L".into(),
            quantity: 1,
            unit_price: 2500,
            color: "black".into(),
            image_refs: vec!["designs/a.png".into()],
            text: Some("front print".into()),
            options: Default::default(),
        }];
        let mut order = header();
        order.total_amount = 2500;

        let msg = build_order_message(&order, &items);
        assert!(msg.contains("1 x custom (L, black) \"front print\" @ 25.00"));
    }
}
