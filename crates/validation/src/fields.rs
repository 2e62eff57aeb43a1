//! Typed accessors over an untrusted JSON record.
//!
//! Every accessor classifies a field instead of failing: absent (missing or
//! `null`), present with a usable value, or present with the wrong shape.

use std::sync::LazyLock;

use serde_json::{Map, Value};

pub(crate) type Fields = Map<String, Value>;

static EMPTY: LazyLock<Fields> = LazyLock::new(Map::new);

/// Anything that is not a JSON object is read as an empty record.
pub(crate) fn fields_of(raw: &Value) -> &Fields {
    raw.as_object().unwrap_or(&EMPTY)
}

fn present<'a>(fields: &'a Fields, key: &str) -> Option<&'a Value> {
    fields.get(key).filter(|v| !v.is_null())
}

pub(crate) fn char_len(s: &str) -> usize {
    s.chars().count()
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum Text<'a> {
    Absent,
    Present(&'a str),
    WrongType,
}

pub(crate) fn text<'a>(fields: &'a Fields, key: &str) -> Text<'a> {
    match present(fields, key) {
        None => Text::Absent,
        Some(Value::String(s)) => Text::Present(s),
        Some(_) => Text::WrongType,
    }
}

/// Present text that is not blank.
pub(crate) fn filled<'a>(fields: &'a Fields, key: &str) -> Option<&'a str> {
    match text(fields, key) {
        Text::Present(s) if !s.trim().is_empty() => Some(s),
        _ => None,
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum Numeric {
    Absent,
    Value(f64),
    Invalid,
}

/// Numbers and numeric-looking strings; non-finite results are invalid.
pub(crate) fn numeric(fields: &Fields, key: &str) -> Numeric {
    let parsed = match present(fields, key) {
        None => return Numeric::Absent,
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        Some(_) => None,
    };

    match parsed {
        Some(v) if v.is_finite() => Numeric::Value(v),
        _ => Numeric::Invalid,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Integer {
    Absent,
    Value(i64),
    NotInteger,
}

pub(crate) fn integer(fields: &Fields, key: &str) -> Integer {
    match present(fields, key) {
        None => Integer::Absent,
        Some(Value::Number(n)) => match n.as_i64() {
            Some(v) => Integer::Value(v),
            None => n.as_f64().map_or(Integer::NotInteger, integral),
        },
        Some(Value::String(s)) => {
            let s = s.trim();
            match s.parse::<i64>() {
                Ok(v) => Integer::Value(v),
                Err(_) => s.parse::<f64>().map_or(Integer::NotInteger, integral),
            }
        }
        Some(_) => Integer::NotInteger,
    }
}

fn integral(v: f64) -> Integer {
    // `i64::MAX as f64` rounds up to 2^63, hence the strict upper bound.
    if v.is_finite() && v.fract() == 0.0 && v >= i64::MIN as f64 && v < i64::MAX as f64 {
        Integer::Value(v as i64)
    } else {
        Integer::NotInteger
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Flag {
    Absent,
    Value(bool),
    WrongType,
}

pub(crate) fn flag(fields: &Fields, key: &str) -> Flag {
    match present(fields, key) {
        None => Flag::Absent,
        Some(Value::Bool(b)) => Flag::Value(*b),
        Some(_) => Flag::WrongType,
    }
}

/// Form checkboxes sometimes arrive as `"true"`/`"false"`.
pub(crate) fn coerce_flag(fields: &Fields, key: &str, default: bool) -> bool {
    match flag(fields, key) {
        Flag::Value(b) => b,
        Flag::Absent => default,
        Flag::WrongType => match text(fields, key) {
            Text::Present(s) if s.trim().eq_ignore_ascii_case("true") => true,
            Text::Present(s) if s.trim().eq_ignore_ascii_case("false") => false,
            _ => default,
        },
    }
}

/// Trimmed text, empty when absent or not text.
pub(crate) fn trimmed(fields: &Fields, key: &str) -> String {
    match text(fields, key) {
        Text::Present(s) => s.trim().to_string(),
        _ => String::new(),
    }
}

/// Trimmed text, `None` when absent, blank or not text.
pub(crate) fn trimmed_opt(fields: &Fields, key: &str) -> Option<String> {
    filled(fields, key).map(|s| s.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn obj(v: Value) -> Fields {
        v.as_object().cloned().unwrap()
    }

    #[test]
    fn non_objects_read_as_empty() {
        assert!(fields_of(&json!(null)).is_empty());
        assert!(fields_of(&json!([1, 2])).is_empty());
        assert!(fields_of(&json!("title")).is_empty());
    }

    #[test]
    fn null_counts_as_absent() {
        let f = obj(json!({"title": null, "price": null}));
        assert_eq!(text(&f, "title"), Text::Absent);
        assert_eq!(numeric(&f, "price"), Numeric::Absent);
    }

    #[test]
    fn numeric_accepts_numeric_strings_and_rejects_non_finite() {
        let f = obj(json!({"a": "29.90", "b": " 7 ", "c": "NaN", "d": "Infinity", "e": "abc", "f": true}));
        assert_eq!(numeric(&f, "a"), Numeric::Value(29.9));
        assert_eq!(numeric(&f, "b"), Numeric::Value(7.0));
        assert_eq!(numeric(&f, "c"), Numeric::Invalid);
        assert_eq!(numeric(&f, "d"), Numeric::Invalid);
        assert_eq!(numeric(&f, "e"), Numeric::Invalid);
        assert_eq!(numeric(&f, "f"), Numeric::Invalid);
    }

    #[test]
    fn integer_accepts_integral_floats_only() {
        let f = obj(json!({"a": 10, "b": "10", "c": 10.0, "d": 10.5, "e": "x"}));
        assert_eq!(integer(&f, "a"), Integer::Value(10));
        assert_eq!(integer(&f, "b"), Integer::Value(10));
        assert_eq!(integer(&f, "c"), Integer::Value(10));
        assert_eq!(integer(&f, "d"), Integer::NotInteger);
        assert_eq!(integer(&f, "e"), Integer::NotInteger);
    }

    #[test]
    fn coerce_flag_keeps_explicit_false() {
        let f = obj(json!({"a": false, "b": "false", "c": 0}));
        assert!(!coerce_flag(&f, "a", true));
        assert!(!coerce_flag(&f, "b", true));
        assert!(coerce_flag(&f, "c", true));
        assert!(coerce_flag(&f, "missing", true));
    }
}
