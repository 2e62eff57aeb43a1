//! Articles and chronicles.

use serde::{Deserialize, Serialize};

use crate::config::ValidationConfig;
use crate::fields::{Fields, Text, char_len, text, trimmed};
use crate::links::check_image_url;
use crate::sanitize::Sanitizer;

/// Normalized article, ready for persistence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    pub title: String,
    /// Sanitized HTML; whitespace preserved.
    pub body: String,
    pub category: String,
    /// Empty when the article has no image.
    pub image_url: String,
}

pub(crate) fn validate(fields: &Fields, config: &ValidationConfig, errors: &mut Vec<String>) {
    let limits = &config.article;

    match text(fields, "title") {
        Text::WrongType => errors.push("title must be text".to_string()),
        Text::Present(title) if !title.trim().is_empty() => {
            let len = char_len(title.trim());
            if len > limits.title_max {
                errors.push(format!("title must be at most {} characters", limits.title_max));
            } else if len < limits.title_min {
                errors.push(format!("title must be at least {} characters", limits.title_min));
            }
        }
        _ => errors.push("title is required".to_string()),
    }

    // Body length counts whitespace: indentation and blank lines are content.
    match text(fields, "body") {
        Text::WrongType => errors.push("body must be text".to_string()),
        Text::Present(body) if !body.trim().is_empty() => {
            let len = char_len(body);
            if len > limits.body_max {
                errors.push(format!("body is too long (max {} characters)", limits.body_max));
            } else if len < limits.body_min {
                errors.push(format!("body must be at least {} characters", limits.body_min));
            }
        }
        _ => errors.push("body is required".to_string()),
    }

    let category_ok = matches!(
        text(fields, "category"),
        Text::Present(c) if config.article_categories.iter().any(|allowed| allowed == c)
    );
    if !category_ok {
        errors.push(format!(
            "category must be one of: {}",
            config.article_categories.join(", ")
        ));
    }

    check_image_url(fields, config.image_url_max, errors);
}

pub(crate) fn normalize(fields: &Fields, config: &ValidationConfig, sanitizer: &dyn Sanitizer) -> Article {
    let body = match text(fields, "body") {
        Text::Present(body) => sanitizer.sanitize(body),
        _ => String::new(),
    };

    let category = match text(fields, "category") {
        Text::Present(c) if !c.trim().is_empty() => c.trim().to_string(),
        _ => config.default_article_category.clone(),
    };

    Article {
        title: trimmed(fields, "title"),
        body,
        category,
        image_url: trimmed(fields, "imageUrl"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sanitize::AllowListSanitizer;
    use serde_json::{Value, json};

    fn errors_for(raw: Value) -> Vec<String> {
        let mut errors = Vec::new();
        validate(raw.as_object().unwrap(), &ValidationConfig::default(), &mut errors);
        errors
    }

    fn normalized(raw: Value) -> Article {
        normalize(raw.as_object().unwrap(), &ValidationConfig::default(), &AllowListSanitizer)
    }

    #[test]
    fn valid_article_has_no_errors() {
        let errors = errors_for(json!({
            "title": "Título do Artigo",
            "body": "Este é o conteúdo do artigo que tem mais de 10 caracteres.",
            "category": "Articles",
            "imageUrl": "https://example.com/image.jpg",
        }));
        assert!(errors.is_empty(), "{errors:?}");
    }

    #[test]
    fn empty_title_is_required() {
        let errors = errors_for(json!({"title": "", "body": "Conteúdo válido", "category": "Articles"}));
        assert_eq!(errors, vec!["title is required"]);
    }

    #[test]
    fn title_length_uses_trimmed_characters() {
        let errors = errors_for(json!({"title": "  ab  ", "body": "Conteúdo válido", "category": "Chronicles"}));
        assert_eq!(errors, vec!["title must be at least 3 characters"]);

        let errors = errors_for(json!({"title": "A".repeat(201), "body": "Conteúdo válido", "category": "Articles"}));
        assert_eq!(errors, vec!["title must be at most 200 characters"]);
    }

    #[test]
    fn title_counts_characters_not_bytes() {
        let errors = errors_for(json!({"title": "ção", "body": "Conteúdo válido", "category": "Articles"}));
        assert!(errors.is_empty(), "{errors:?}");
    }

    #[test]
    fn body_length_keeps_whitespace() {
        // 8 visible characters padded to 12 still passes the 10 minimum.
        let errors = errors_for(json!({"title": "Title", "body": "  abcdefgh  ", "category": "Articles"}));
        assert!(errors.is_empty(), "{errors:?}");

        let errors = errors_for(json!({"title": "Title", "body": "A".repeat(50_001), "category": "Articles"}));
        assert_eq!(errors, vec!["body is too long (max 50000 characters)"]);
    }

    #[test]
    fn unknown_category_names_the_allowed_set() {
        let errors = errors_for(json!({"title": "Title", "body": "Conteúdo válido", "category": "articles"}));
        assert_eq!(errors, vec!["category must be one of: Articles, Chronicles"]);
    }

    #[test]
    fn short_everything_reports_three_messages() {
        let errors = errors_for(json!({"title": "Hi", "body": "short", "category": "Bad"}));
        assert_eq!(
            errors,
            vec![
                "title must be at least 3 characters",
                "body must be at least 10 characters",
                "category must be one of: Articles, Chronicles",
            ]
        );
    }

    #[test]
    fn wrong_types_are_reported_not_panicked_on() {
        let errors = errors_for(json!({"title": 12, "body": {"html": "x"}, "category": ["Articles"], "imageUrl": 3}));
        assert_eq!(
            errors,
            vec![
                "title must be text",
                "body must be text",
                "category must be one of: Articles, Chronicles",
                "imageUrl must be text",
            ]
        );
    }

    #[test]
    fn normalize_trims_title_and_url_but_not_body() {
        let article = normalized(json!({
            "title": "  Título com espaços  ",
            "body": "  Conteúdo com espaços  ",
            "category": "Articles",
            "imageUrl": "  https://example.com  ",
        }));
        assert_eq!(article.title, "Título com espaços");
        assert_eq!(article.body, "  Conteúdo com espaços  ");
        assert_eq!(article.image_url, "https://example.com");
    }

    #[test]
    fn normalize_defaults_category_and_sanitizes_body() {
        let article = normalized(json!({"title": "T", "body": "<script>alert(1)</script><b>hi</b>"}));
        assert_eq!(article.category, "Articles");
        assert_eq!(article.body, "<b>hi</b>");
        assert_eq!(article.image_url, "");
    }
}
