use serde::Serialize;
use thiserror::Error;

use irmaozinho_core::DocumentId;

use crate::cart::Cart;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLine {
    pub product_id: DocumentId,
    pub name: String,
    pub unit_price: f64,
    pub quantity: u64,
    pub line_total: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderSummary {
    pub lines: Vec<OrderLine>,
    pub item_count: u64,
    pub subtotal: f64,
    /// `None` until shipping is quoted.
    pub shipping: Option<f64>,
    pub total: f64,
}

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum CheckoutError {
    #[error("cart is empty")]
    EmptyCart,

    #[error("online payment is not available yet")]
    PaymentDisabled,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Checkout;

impl Checkout {
    pub fn summary(cart: &Cart) -> OrderSummary {
        let lines: Vec<OrderLine> = cart
            .items()
            .iter()
            .map(|item| OrderLine {
                product_id: item.product_id,
                name: item.name.clone(),
                unit_price: item.price,
                quantity: item.quantity,
                line_total: item.line_total(),
            })
            .collect();

        let subtotal = cart.subtotal();
        OrderSummary {
            lines,
            item_count: cart.item_count(),
            subtotal,
            shipping: None,
            total: subtotal,
        }
    }

    /// Payment is not wired; a non-empty cart still stops here.
    pub fn place_order(cart: &Cart) -> Result<OrderSummary, CheckoutError> {
        if cart.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }
        let summary = Self::summary(cart);
        tracing::info!(
            items = summary.item_count,
            total = summary.total,
            "order not placed: payment disabled"
        );
        Err(CheckoutError::PaymentDisabled)
    }
}

/// Brazilian real, as shown in the storefront: `R$ 29,90`.
pub fn format_brl(amount: f64) -> String {
    format!("R$ {amount:.2}").replace('.', ",")
}
