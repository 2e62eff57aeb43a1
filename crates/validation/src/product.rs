//! Storefront products.

use serde::{Deserialize, Serialize};

use crate::config::ValidationConfig;
use crate::fields::{
    Fields, Flag, Integer, Numeric, Text, char_len, coerce_flag, flag, integer, numeric, text, trimmed,
    trimmed_opt,
};
use crate::links::check_image_url;
use crate::sanitize::Sanitizer;

/// Normalized product, ready for persistence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub name: String,
    pub description: String,
    pub price: f64,
    pub stock: u64,
    pub active: bool,
    pub category: String,
    pub image_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supplier_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supplier_name: Option<String>,
}

pub(crate) fn validate(fields: &Fields, config: &ValidationConfig, errors: &mut Vec<String>) {
    let limits = &config.product;

    match text(fields, "name") {
        Text::WrongType => errors.push("name must be text".to_string()),
        Text::Present(name) if !name.trim().is_empty() => {
            let len = char_len(name.trim());
            if len > limits.name_max {
                errors.push(format!("name must be at most {} characters", limits.name_max));
            } else if len < limits.name_min {
                errors.push(format!("name must be at least {} characters", limits.name_min));
            }
        }
        _ => errors.push("name is required".to_string()),
    }

    match text(fields, "description") {
        Text::WrongType => errors.push("description must be text".to_string()),
        Text::Present(d) if char_len(d) > limits.description_max => {
            errors.push(format!("description must be at most {} characters", limits.description_max));
        }
        _ => {}
    }

    match numeric(fields, "price") {
        Numeric::Absent => errors.push("price is required".to_string()),
        Numeric::Invalid => errors.push("price must be a valid number".to_string()),
        Numeric::Value(p) if p < 0.0 => errors.push("price cannot be negative".to_string()),
        Numeric::Value(p) if p > limits.price_ceiling => {
            errors.push(format!("price must be at most {}", limits.price_ceiling));
        }
        Numeric::Value(_) => {}
    }

    match integer(fields, "stock") {
        Integer::NotInteger => errors.push("stock must be an integer".to_string()),
        Integer::Value(s) if s < 0 => errors.push("stock cannot be negative".to_string()),
        _ => {}
    }

    if flag(fields, "active") == Flag::WrongType {
        errors.push("active must be true or false".to_string());
    }

    check_image_url(fields, config.image_url_max, errors);

    match text(fields, "category") {
        Text::WrongType => errors.push("category must be text".to_string()),
        Text::Present(c) if char_len(c.trim()) > limits.category_max => {
            errors.push(format!("category must be at most {} characters", limits.category_max));
        }
        _ => {}
    }

    match text(fields, "supplierId") {
        Text::WrongType => errors.push("supplierId must be text".to_string()),
        Text::Present(s) if char_len(s.trim()) > limits.supplier_id_max => {
            errors.push(format!(
                "supplierId must be at most {} characters",
                limits.supplier_id_max
            ));
        }
        _ => {}
    }
    match text(fields, "supplierName") {
        Text::WrongType => errors.push("supplierName must be text".to_string()),
        Text::Present(s) if char_len(s.trim()) > limits.supplier_name_max => {
            errors.push(format!(
                "supplierName must be at most {} characters",
                limits.supplier_name_max
            ));
        }
        _ => {}
    }
}

pub(crate) fn normalize(fields: &Fields, config: &ValidationConfig, sanitizer: &dyn Sanitizer) -> Product {
    let description = match text(fields, "description") {
        Text::Present(d) => sanitizer.sanitize(d),
        _ => String::new(),
    };

    let price = match numeric(fields, "price") {
        Numeric::Value(p) => p,
        _ => 0.0,
    };

    let stock = match integer(fields, "stock") {
        Integer::Value(s) => u64::try_from(s).unwrap_or(0),
        _ => 0,
    };

    // A blank category is as good as none.
    let category = trimmed_opt(fields, "category").unwrap_or_else(|| config.default_product_category.clone());

    Product {
        name: trimmed(fields, "name"),
        description,
        price,
        stock,
        active: coerce_flag(fields, "active", true),
        category,
        image_url: trimmed(fields, "imageUrl"),
        supplier_id: trimmed_opt(fields, "supplierId"),
        supplier_name: trimmed_opt(fields, "supplierName"),
    }
}
