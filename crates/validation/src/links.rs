//! URL rule shared by every `imageUrl` field.

use serde_json::Value;
use url::Url;

use crate::fields::{Fields, Text, char_len, text};

/// Absolute `http`/`https` URL with a host.
///
/// Relative paths, `javascript:`, `data:` and malformed strings are rejected.
pub fn is_valid_url(candidate: Option<&str>) -> bool {
    let Some(candidate) = candidate.map(str::trim).filter(|s| !s.is_empty()) else {
        return false;
    };

    match Url::parse(candidate) {
        Ok(url) => matches!(url.scheme(), "http" | "https") && url.host().is_some(),
        Err(_) => false,
    }
}

/// [`is_valid_url`] over an arbitrary JSON value; non-strings are invalid.
pub fn is_valid_url_value(candidate: &Value) -> bool {
    is_valid_url(candidate.as_str())
}

/// Optional image URL: absent, `null` or blank means "no image".
pub(crate) fn check_image_url(fields: &Fields, max: usize, errors: &mut Vec<String>) {
    match text(fields, "imageUrl") {
        Text::Absent => {}
        Text::WrongType => errors.push("imageUrl must be text".to_string()),
        Text::Present(raw) => {
            let url = raw.trim();
            if url.is_empty() {
                return;
            }
            if char_len(url) > max {
                errors.push(format!("imageUrl is too long (max {max} characters)"));
            } else if !is_valid_url(Some(url)) {
                errors.push("imageUrl must be a valid http:// or https:// URL".to_string());
            }
        }
    }
}
