//! Cart totals. Both the `/cart/summary` route and [`crate::client`] go
//! through [`summarize`], so every surface shows the same figures.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::CartItemWithProduct;

/// Subtotal at or above which shipping is free.
pub const FREE_SHIPPING_THRESHOLD: Decimal = Decimal::from_parts(10000, 0, 0, false, 2);
pub const SHIPPING_FEE: Decimal = Decimal::from_parts(999, 0, 0, false, 2);
pub const TAX_RATE: Decimal = Decimal::from_parts(8, 0, 0, false, 2);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CartSummary {
    pub item_count: i64,
    #[schema(value_type = String, example = "3998.00")]
    pub subtotal: Decimal,
    #[schema(value_type = String, example = "0.00")]
    pub shipping: Decimal,
    #[schema(value_type = String, example = "319.84")]
    pub tax: Decimal,
    #[schema(value_type = String, example = "4317.84")]
    pub total: Decimal,
    /// How much more the shopper must add to reach free shipping.
    #[schema(value_type = String, example = "0.00")]
    pub free_shipping_remaining: Decimal,
}

pub fn summarize(lines: &[CartItemWithProduct]) -> CartSummary {
    let item_count = lines.iter().map(|l| i64::from(l.item.quantity)).sum();
    let subtotal: Decimal = lines
        .iter()
        .map(|l| l.product.price * Decimal::from(l.item.quantity))
        .sum();

    if lines.is_empty() {
        return CartSummary {
            item_count: 0,
            subtotal: cents(Decimal::ZERO),
            shipping: cents(Decimal::ZERO),
            tax: cents(Decimal::ZERO),
            total: cents(Decimal::ZERO),
            free_shipping_remaining: FREE_SHIPPING_THRESHOLD,
        };
    }

    let shipping = if subtotal >= FREE_SHIPPING_THRESHOLD {
        Decimal::ZERO
    } else {
        SHIPPING_FEE
    };
    let tax = cents(subtotal * TAX_RATE);
    let total = subtotal + shipping + tax;

    CartSummary {
        item_count,
        subtotal: cents(subtotal),
        shipping: cents(shipping),
        tax,
        total: cents(total),
        free_shipping_remaining: cents((FREE_SHIPPING_THRESHOLD - subtotal).max(Decimal::ZERO)),
    }
}

fn cents(amount: Decimal) -> Decimal {
    let mut rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(2);
    rounded
}
