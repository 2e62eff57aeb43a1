//! Validation limits and business defaults.
//!
//! Defaults mirror the storefront's current phase; every value can be
//! overridden through `IRMAOZINHO_*` environment variables.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value:?}")]
    Invalid { key: &'static str, value: String },

    #[error("inconsistent configuration: {0}")]
    Inconsistent(String),
}

/// Field limits for articles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArticleLimits {
    pub title_min: usize,
    pub title_max: usize,
    pub body_min: usize,
    pub body_max: usize,
}

impl Default for ArticleLimits {
    fn default() -> Self {
        Self {
            title_min: 3,
            title_max: 200,
            body_min: 10,
            body_max: 50_000,
        }
    }
}

/// Field limits for products.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProductLimits {
    pub name_min: usize,
    pub name_max: usize,
    pub description_max: usize,
    pub category_max: usize,
    pub supplier_id_max: usize,
    pub supplier_name_max: usize,
    /// Highest accepted price, inclusive.
    pub price_ceiling: f64,
}

impl Default for ProductLimits {
    fn default() -> Self {
        Self {
            name_min: 2,
            name_max: 200,
            description_max: 2000,
            category_max: 100,
            supplier_id_max: 200,
            supplier_name_max: 200,
            price_ceiling: 1_000_000.0,
        }
    }
}

/// Field limits for suppliers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SupplierLimits {
    pub name_max: usize,
    pub email_max: usize,
    pub phone_max: usize,
}

impl Default for SupplierLimits {
    fn default() -> Self {
        Self {
            name_max: 200,
            email_max: 200,
            phone_max: 50,
        }
    }
}

/// Password bounds for credentials.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CredentialLimits {
    pub password_min: usize,
    pub password_max: usize,
}

impl Default for CredentialLimits {
    fn default() -> Self {
        Self {
            password_min: 6,
            password_max: 128,
        }
    }
}

/// Complete validation configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    pub article: ArticleLimits,
    pub product: ProductLimits,
    pub supplier: SupplierLimits,
    pub credentials: CredentialLimits,
    pub image_url_max: usize,
    /// Allowed article categories (exact match).
    pub article_categories: Vec<String>,
    pub default_article_category: String,
    pub default_product_category: String,
    /// The only payment method suppliers may use in this phase.
    pub payment_method: String,
    /// Commission pre-filled by the admin UI. Validation only enforces [0, 1].
    pub default_commission_rate: f64,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            article: ArticleLimits::default(),
            product: ProductLimits::default(),
            supplier: SupplierLimits::default(),
            credentials: CredentialLimits::default(),
            image_url_max: 1000,
            article_categories: vec!["Articles".to_string(), "Chronicles".to_string()],
            default_article_category: "Articles".to_string(),
            default_product_category: "Other".to_string(),
            payment_method: "manual".to_string(),
            default_commission_rate: 0.15,
        }
    }
}

impl ValidationConfig {
    /// Defaults overridden by `IRMAOZINHO_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overridden by whatever `lookup` returns for each known key.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(raw) = lookup("IRMAOZINHO_PRICE_CEILING") {
            config.product.price_ceiling = parse("IRMAOZINHO_PRICE_CEILING", &raw)?;
        }
        if let Some(raw) = lookup("IRMAOZINHO_ARTICLE_CATEGORIES") {
            config.article_categories = raw
                .split(',')
                .map(str::trim)
                .filter(|c| !c.is_empty())
                .map(str::to_string)
                .collect();
        }
        if let Some(raw) = lookup("IRMAOZINHO_DEFAULT_ARTICLE_CATEGORY") {
            config.default_article_category = raw.trim().to_string();
        }
        if let Some(raw) = lookup("IRMAOZINHO_DEFAULT_PRODUCT_CATEGORY") {
            config.default_product_category = raw.trim().to_string();
        }
        if let Some(raw) = lookup("IRMAOZINHO_PAYMENT_METHOD") {
            config.payment_method = raw.trim().to_string();
        }
        if let Some(raw) = lookup("IRMAOZINHO_DEFAULT_COMMISSION_RATE") {
            config.default_commission_rate = parse("IRMAOZINHO_DEFAULT_COMMISSION_RATE", &raw)?;
        }
        if let Some(raw) = lookup("IRMAOZINHO_PASSWORD_MIN") {
            config.credentials.password_min = parse("IRMAOZINHO_PASSWORD_MIN", &raw)?;
        }
        if let Some(raw) = lookup("IRMAOZINHO_PASSWORD_MAX") {
            config.credentials.password_max = parse("IRMAOZINHO_PASSWORD_MAX", &raw)?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Reject configurations the validators cannot honour.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.article_categories.is_empty() {
            return Err(ConfigError::Inconsistent("article_categories is empty".into()));
        }
        if !self.article_categories.contains(&self.default_article_category) {
            return Err(ConfigError::Inconsistent(format!(
                "default article category {:?} is not one of {:?}",
                self.default_article_category, self.article_categories
            )));
        }
        if self.default_product_category.trim().is_empty() {
            return Err(ConfigError::Inconsistent("default_product_category is blank".into()));
        }
        if self.payment_method.trim().is_empty() {
            return Err(ConfigError::Inconsistent("payment_method is blank".into()));
        }
        let ceiling = self.product.price_ceiling;
        if !ceiling.is_finite() || ceiling < 0.0 {
            return Err(ConfigError::Inconsistent(format!("price ceiling {ceiling} is not a finite non-negative number")));
        }
        if !(0.0..=1.0).contains(&self.default_commission_rate) {
            return Err(ConfigError::Inconsistent(format!(
                "default commission rate {} is outside [0, 1]",
                self.default_commission_rate
            )));
        }

        let bounds = [
            ("title", self.article.title_min, self.article.title_max),
            ("body", self.article.body_min, self.article.body_max),
            ("product name", self.product.name_min, self.product.name_max),
            ("password", self.credentials.password_min, self.credentials.password_max),
        ];
        for (field, min, max) in bounds {
            if min > max {
                return Err(ConfigError::Inconsistent(format!("{field} minimum {min} exceeds maximum {max}")));
            }
        }

        Ok(())
    }
}

fn parse<T: std::str::FromStr>(key: &'static str, raw: &str) -> Result<T, ConfigError> {
    raw.trim().parse().map_err(|_| ConfigError::Invalid {
        key,
        value: raw.to_string(),
    })
}
