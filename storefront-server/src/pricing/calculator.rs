//! Price Calculator
//!
//! Pure breakdown computation: (line items, coupon snapshot, settings)
//! -> (subtotal, discount, shipping, tax, total). The same function
//! backs quote display and the amount persisted on the order, so it must
//! be identically reproducible for identical inputs.
//!
//! Percentage math runs through rust_decimal and is rounded half-up to
//! whole minor currency units exactly once per step — never re-rounded
//! downstream.

use rust_decimal::prelude::*;
use serde::{Deserialize, Serialize};
use shared::models::{CouponSnapshot, LineItem, StoreSettings};

/// Full price breakdown in minor currency units
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceBreakdown {
    pub subtotal: i64,
    pub discount: i64,
    pub subtotal_after_discount: i64,
    pub shipping: i64,
    pub tax: i64,
    pub total: i64,
}

/// round(amount * percent / 100), half-up to whole units
pub(crate) fn round_percent_of(amount: i64, percent: Decimal) -> i64 {
    (Decimal::from(amount) * percent / Decimal::ONE_HUNDRED)
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
        .unwrap_or_default()
}

/// Compute the authoritative price breakdown.
///
/// Fixed step order:
/// 1. subtotal = sum of line totals
/// 2. discount = round(subtotal * percent / 100) for an attached coupon
/// 3. subtotal_after_discount
/// 4. shipping: free iff the *discounted* subtotal reaches the threshold
///    (equality counts as free) — a coupon can push an order back below
///    the free-shipping line
/// 5. tax on the discounted subtotal only, never on shipping
/// 6. total
pub fn compute(
    items: &[LineItem],
    coupon: Option<&CouponSnapshot>,
    settings: &StoreSettings,
) -> PriceBreakdown {
    let subtotal: i64 = items.iter().map(LineItem::line_total).sum();

    // Single multiplicative step: the discount is computed once on the
    // pre-discount subtotal and can never compound.
    let discount = match coupon {
        Some(snapshot) => round_percent_of(subtotal, Decimal::from(snapshot.discount_percent)),
        None => 0,
    };
    let subtotal_after_discount = subtotal - discount;

    let shipping = if subtotal_after_discount >= settings.free_shipping_threshold {
        0
    } else {
        settings.shipping_fee
    };

    let tax = if settings.gst_enabled {
        let rate = Decimal::from_f64(settings.gst_percentage).unwrap_or_default();
        round_percent_of(subtotal_after_discount, rate)
    } else {
        0
    };

    PriceBreakdown {
        subtotal,
        discount,
        subtotal_after_discount,
        shipping,
        tax,
        total: subtotal_after_discount + shipping + tax,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::ItemRef;

    fn item(price: i64, quantity: i64) -> LineItem {
        LineItem {
            item: ItemRef::Catalog(1),
            size: "M".into(),
            color: "red".into(),
            unit_price: price,
            quantity,
            custom: None,
        }
    }

    fn settings() -> StoreSettings {
        StoreSettings {
            shipping_fee: 99,
            free_shipping_threshold: 999,
            gst_percentage: 18.0,
            gst_enabled: true,
            ..Default::default()
        }
    }

    fn coupon(percent: i64) -> CouponSnapshot {
        CouponSnapshot {
            code: "DEV10".into(),
            discount_percent: percent,
        }
    }

    #[test]
    fn no_coupon_over_threshold() {
        // 1200 >= 999: free shipping; tax = round(1200 * 0.18) = 216
        let breakdown = compute(&[item(600, 2)], None, &settings());
        assert_eq!(
            breakdown,
            PriceBreakdown {
                subtotal: 1200,
                discount: 0,
                subtotal_after_discount: 1200,
                shipping: 0,
                tax: 216,
                total: 1416,
            }
        );
    }

    #[test]
    fn coupon_discounts_then_taxes_the_discounted_subtotal() {
        // discount = 120, after = 1080 >= 999 still free,
        // tax = round(1080 * 0.18) = round(194.4) = 194
        let breakdown = compute(&[item(600, 2)], Some(&coupon(10)), &settings());
        assert_eq!(
            breakdown,
            PriceBreakdown {
                subtotal: 1200,
                discount: 120,
                subtotal_after_discount: 1080,
                shipping: 0,
                tax: 194,
                total: 1274,
            }
        );
    }

    #[test]
    fn below_threshold_pays_shipping() {
        // 500 < 999: shipping 99; tax = round(500 * 0.18) = 90
        let breakdown = compute(&[item(500, 1)], None, &settings());
        assert_eq!(breakdown.shipping, 99);
        assert_eq!(breakdown.tax, 90);
        assert_eq!(breakdown.total, 689);
    }

    #[test]
    fn threshold_boundary_is_inclusive() {
        let breakdown = compute(&[item(999, 1)], None, &settings());
        assert_eq!(breakdown.shipping, 0);

        let breakdown = compute(&[item(998, 1)], None, &settings());
        assert_eq!(breakdown.shipping, 99);
    }

    #[test]
    fn coupon_can_push_an_order_below_the_free_shipping_line() {
        // 1000 >= 999 free without coupon, but 10% off -> 900 < 999
        let breakdown = compute(&[item(1000, 1)], Some(&coupon(10)), &settings());
        assert_eq!(breakdown.subtotal_after_discount, 900);
        assert_eq!(breakdown.shipping, 99);
    }

    #[test]
    fn gst_disabled_means_zero_tax() {
        let mut s = settings();
        s.gst_enabled = false;
        let breakdown = compute(&[item(600, 2)], None, &s);
        assert_eq!(breakdown.tax, 0);
        assert_eq!(breakdown.total, 1200);
    }

    #[test]
    fn empty_cart_prices_to_shipping_only() {
        // Degenerate input; the order writer rejects empty carts before
        // pricing ever matters, but the math must stay total = fee
        let breakdown = compute(&[], None, &settings());
        assert_eq!(breakdown.subtotal, 0);
        assert_eq!(breakdown.total, 99);
    }

    #[test]
    fn discount_rounds_half_up() {
        // 15% of 250 = 37.5 -> 38
        let mut s = settings();
        s.gst_enabled = false;
        s.free_shipping_threshold = 0;
        let breakdown = compute(&[item(250, 1)], Some(&coupon(15)), &s);
        assert_eq!(breakdown.discount, 38);
        assert_eq!(breakdown.total, 212);
    }

    #[test]
    fn hundred_percent_coupon_zeroes_the_goods() {
        let mut s = settings();
        s.gst_enabled = false;
        let breakdown = compute(&[item(500, 1)], Some(&coupon(100)), &s);
        assert_eq!(breakdown.discount, 500);
        assert_eq!(breakdown.subtotal_after_discount, 0);
        // 0 < 999 threshold: shipping still applies
        assert_eq!(breakdown.total, 99);
    }

    #[test]
    fn identical_inputs_reproduce_identical_breakdowns() {
        let items = vec![item(333, 3), item(101, 7)];
        let c = coupon(7);
        let s = settings();
        let first = compute(&items, Some(&c), &s);
        for _ in 0..10 {
            assert_eq!(compute(&items, Some(&c), &s), first);
        }
    }
}
