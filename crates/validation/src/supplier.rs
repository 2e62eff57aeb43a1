//! Product suppliers.
//!
//! The commission rate is fixed by the business for now and read-only in the
//! admin UI, but validation only enforces the [0, 1] range so per-supplier
//! rates stay possible without a schema change.

use serde::{Deserialize, Serialize};

use crate::config::ValidationConfig;
use crate::email::is_valid_email;
use crate::fields::{Fields, Flag, Numeric, Text, char_len, coerce_flag, flag, numeric, text, trimmed};

/// Normalized supplier, ready for persistence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Supplier {
    pub name: String,
    /// Trimmed and lower-cased.
    pub email: String,
    pub phone: String,
    pub commission_rate: f64,
    pub payment_method: String,
    pub active: bool,
}

pub(crate) fn validate(fields: &Fields, config: &ValidationConfig, errors: &mut Vec<String>) {
    let limits = &config.supplier;

    match text(fields, "name") {
        Text::WrongType => errors.push("name must be text".to_string()),
        Text::Present(name) if !name.trim().is_empty() => {
            if char_len(name.trim()) > limits.name_max {
                errors.push(format!("name must be at most {} characters", limits.name_max));
            }
        }
        _ => errors.push("name is required".to_string()),
    }

    match text(fields, "email") {
        Text::WrongType => errors.push("email must be text".to_string()),
        Text::Present(email) if !email.trim().is_empty() => {
            if char_len(email.trim()) > limits.email_max {
                errors.push(format!("email must be at most {} characters", limits.email_max));
            } else if !is_valid_email(email) {
                errors.push("email must be a valid email address".to_string());
            }
        }
        _ => errors.push("email is required".to_string()),
    }

    match numeric(fields, "commissionRate") {
        Numeric::Absent => errors.push("commissionRate is required".to_string()),
        Numeric::Invalid => errors.push("commissionRate must be a valid number".to_string()),
        Numeric::Value(rate) if !(0.0..=1.0).contains(&rate) => {
            errors.push("commissionRate must be between 0 and 1".to_string());
        }
        Numeric::Value(_) => {}
    }

    let payment_ok = matches!(text(fields, "paymentMethod"), Text::Present(m) if m == config.payment_method);
    if !payment_ok {
        errors.push(format!("paymentMethod must be one of: {}", config.payment_method));
    }

    if flag(fields, "active") == Flag::WrongType {
        errors.push("active must be true or false".to_string());
    }

    match text(fields, "phone") {
        Text::WrongType => errors.push("phone must be text".to_string()),
        Text::Present(phone) if char_len(phone.trim()) > limits.phone_max => {
            errors.push(format!("phone must be at most {} characters", limits.phone_max));
        }
        _ => {}
    }
}

pub(crate) fn normalize(fields: &Fields, config: &ValidationConfig) -> Supplier {
    let commission_rate = match numeric(fields, "commissionRate") {
        Numeric::Value(rate) => rate,
        _ => config.default_commission_rate,
    };

    let payment_method = match text(fields, "paymentMethod") {
        Text::Present(m) => m.trim().to_string(),
        _ => config.payment_method.clone(),
    };

    Supplier {
        name: trimmed(fields, "name"),
        email: trimmed(fields, "email").to_lowercase(),
        phone: trimmed(fields, "phone"),
        commission_rate,
        payment_method,
        active: coerce_flag(fields, "active", true),
    }
}
