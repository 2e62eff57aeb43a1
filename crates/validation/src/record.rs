//! Normalized records of any kind.

use serde::Serialize;
use serde_json::Value;

use irmaozinho_core::EntityKind;

use crate::{Article, Credentials, Product, Supplier};

/// Output of `normalize`: the canonical shape handed to persistence.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Record {
    Article(Article),
    Product(Product),
    Supplier(Supplier),
    Credentials(Credentials),
}

impl Record {
    pub fn kind(&self) -> EntityKind {
        match self {
            Record::Article(_) => EntityKind::Article,
            Record::Product(_) => EntityKind::Product,
            Record::Supplier(_) => EntityKind::Supplier,
            Record::Credentials(_) => EntityKind::Credentials,
        }
    }

    /// camelCase JSON document, the same field names forms submit.
    pub fn to_value(&self) -> Value {
        // Every variant is a plain struct of strings, numbers and booleans;
        // non-finite floats are never produced by normalization.
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

impl From<Article> for Record {
    fn from(value: Article) -> Self {
        Record::Article(value)
    }
}

impl From<Product> for Record {
    fn from(value: Product) -> Self {
        Record::Product(value)
    }
}

impl From<Supplier> for Record {
    fn from(value: Supplier) -> Self {
        Record::Supplier(value)
    }
}

impl From<Credentials> for Record {
    fn from(value: Credentials) -> Self {
        Record::Credentials(value)
    }
}
