//! Shopping cart, persisted client-side as a JSON array of items.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use irmaozinho_core::DocumentId;
use irmaozinho_validation::Product;

use crate::stock::StockLevel;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub product_id: DocumentId,
    pub name: String,
    pub price: f64,
    pub quantity: u64,
    #[serde(default)]
    pub image_url: String,
    /// Stock seen when the item was last added.
    pub stock: u64,
}

impl CartItem {
    pub fn line_total(&self) -> f64 {
        self.price * self.quantity as f64
    }
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum CartError {
    #[error("{0} is not available")]
    Inactive(String),

    #[error("{0} is out of stock")]
    OutOfStock(String),

    #[error("only {available} units of {name} available (requested {requested})")]
    ExceedsStock {
        name: String,
        requested: u64,
        available: u64,
    },

    #[error("quantity must be at least 1")]
    ZeroQuantity,

    #[error("product {0} is not in the cart")]
    NotInCart(DocumentId),
}

/// Serialized as a bare array of items. Deserializing goes through
/// [`Cart::from_items`], so a restored cart holds the same invariants as one
/// built with [`Cart::add`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(into = "Vec<CartItem>", from = "Vec<CartItem>")]
pub struct Cart {
    items: Vec<CartItem>,
}

impl From<Vec<CartItem>> for Cart {
    fn from(items: Vec<CartItem>) -> Self {
        Cart::from_items(items)
    }
}

impl From<Cart> for Vec<CartItem> {
    fn from(cart: Cart) -> Self {
        cart.items
    }
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a cart from stored lines: duplicate products are merged (the
    /// lower stock snapshot wins), quantities are capped at stock, and empty
    /// lines are dropped.
    pub fn from_items(items: Vec<CartItem>) -> Self {
        let received = items.len();
        let mut cart = Cart::new();

        for item in items {
            match cart.position(item.product_id) {
                Some(i) => {
                    let line = &mut cart.items[i];
                    line.quantity = line.quantity.saturating_add(item.quantity);
                    line.stock = line.stock.min(item.stock);
                }
                None => cart.items.push(item),
            }
        }

        let mut repaired = cart.items.len() != received;
        cart.items.retain_mut(|line| {
            if line.quantity > line.stock {
                line.quantity = line.stock;
                repaired = true;
            }
            if line.quantity == 0 {
                repaired = true;
                return false;
            }
            true
        });

        if repaired {
            tracing::warn!(received, kept = cart.items.len(), "repaired inconsistent cart lines");
        }
        cart
    }

    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn quantity_of(&self, product_id: DocumentId) -> u64 {
        self.position(product_id)
            .map(|i| self.items[i].quantity)
            .unwrap_or(0)
    }

    /// Add `quantity` units, merging with any existing line. The merged
    /// quantity may not exceed the product's stock. Returns the new line quantity.
    pub fn add(
        &mut self,
        product_id: DocumentId,
        product: &Product,
        quantity: u64,
    ) -> Result<u64, CartError> {
        if quantity == 0 {
            return Err(CartError::ZeroQuantity);
        }
        if !product.active {
            return Err(CartError::Inactive(product.name.clone()));
        }

        let level = StockLevel::of(product.stock);
        if level == StockLevel::OutOfStock {
            return Err(CartError::OutOfStock(product.name.clone()));
        }

        let merged = self.quantity_of(product_id).saturating_add(quantity);
        if !level.can_supply(merged) {
            return Err(CartError::ExceedsStock {
                name: product.name.clone(),
                requested: merged,
                available: level.units(),
            });
        }

        match self.position(product_id) {
            Some(i) => {
                let item = &mut self.items[i];
                item.quantity = merged;
                item.price = product.price;
                item.stock = product.stock;
            }
            None => self.items.push(CartItem {
                product_id,
                name: product.name.clone(),
                price: product.price,
                quantity: merged,
                image_url: product.image_url.clone(),
                stock: product.stock,
            }),
        }
        Ok(merged)
    }

    /// Returns whether a line was removed.
    pub fn remove(&mut self, product_id: DocumentId) -> bool {
        let before = self.items.len();
        self.items.retain(|item| item.product_id != product_id);
        self.items.len() != before
    }

    /// Set a line's quantity. Zero or less removes the line.
    pub fn update_quantity(&mut self, product_id: DocumentId, quantity: i64) -> Result<(), CartError> {
        let i = self
            .position(product_id)
            .ok_or(CartError::NotInCart(product_id))?;

        let Ok(quantity) = u64::try_from(quantity) else {
            self.items.remove(i);
            return Ok(());
        };
        if quantity == 0 {
            self.items.remove(i);
            return Ok(());
        }

        let item = &mut self.items[i];
        if quantity > item.stock {
            return Err(CartError::ExceedsStock {
                name: item.name.clone(),
                requested: quantity,
                available: item.stock,
            });
        }
        item.quantity = quantity;
        Ok(())
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Total units across all lines.
    pub fn item_count(&self) -> u64 {
        self.items.iter().map(|item| item.quantity).sum()
    }

    pub fn subtotal(&self) -> f64 {
        self.items.iter().map(CartItem::line_total).sum()
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| "[]".to_string())
    }

    /// Restore a persisted cart. A corrupt payload yields an empty cart.
    pub fn from_json(raw: &str) -> Self {
        match serde_json::from_str(raw) {
            Ok(cart) => cart,
            Err(err) => {
                tracing::warn!(error = %err, "discarding corrupt cart payload");
                Self::default()
            }
        }
    }

    fn position(&self, product_id: DocumentId) -> Option<usize> {
        self.items.iter().position(|item| item.product_id == product_id)
    }
}
