//! Login and sign-up credentials.

use serde::{Deserialize, Serialize};

use crate::config::ValidationConfig;
use crate::email::is_valid_email;
use crate::fields::{Fields, Text, char_len, text, trimmed};

/// Normalized credentials, handed to the identity provider and never stored.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl core::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Password rules on their own, for forms that check the field as it is typed.
///
/// Length counts every character: leading and trailing spaces are part of a
/// password.
pub fn check_password(password: &str, config: &ValidationConfig) -> Vec<String> {
    let limits = &config.credentials;
    let len = char_len(password);

    if password.is_empty() {
        vec!["password is required".to_string()]
    } else if len < limits.password_min {
        vec![format!("password must be at least {} characters", limits.password_min)]
    } else if len > limits.password_max {
        vec![format!("password must be at most {} characters", limits.password_max)]
    } else {
        Vec::new()
    }
}

pub(crate) fn validate(fields: &Fields, config: &ValidationConfig, errors: &mut Vec<String>) {
    match text(fields, "email") {
        Text::WrongType => errors.push("email must be text".to_string()),
        Text::Present(email) if !email.trim().is_empty() => {
            if !is_valid_email(email) {
                errors.push("email must be a valid email address".to_string());
            }
        }
        _ => errors.push("email is required".to_string()),
    }

    let password = match text(fields, "password") {
        Text::WrongType => {
            errors.push("password must be text".to_string());
            None
        }
        Text::Present(p) => {
            errors.extend(check_password(p, config));
            Some(p)
        }
        Text::Absent => {
            errors.extend(check_password("", config));
            None
        }
    };

    // Sign-up forms send a confirmation; login forms do not.
    match text(fields, "confirmPassword") {
        Text::Absent => {}
        Text::Present(confirm) if Some(confirm) == password => {}
        _ => errors.push("confirmPassword must match password".to_string()),
    }
}

pub(crate) fn normalize(fields: &Fields) -> Credentials {
    let password = match text(fields, "password") {
        Text::Present(p) => p.to_string(),
        _ => String::new(),
    };

    Credentials {
        email: trimmed(fields, "email").to_lowercase(),
        password,
    }
}
