//! `irmaozinho-storefront`: cart and checkout summary.
//!
//! Payment is not wired: placing an order always stops at
//! [`CheckoutError::PaymentDisabled`].

pub mod cart;
pub mod checkout;
pub mod stock;

pub use cart::{Cart, CartError, CartItem};
pub use checkout::{Checkout, CheckoutError, OrderLine, OrderSummary, format_brl};
pub use stock::{LOW_STOCK_THRESHOLD, StockLevel};
