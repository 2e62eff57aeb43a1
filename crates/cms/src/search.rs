//! Client-side listing filters: free-text search and category buckets.

use irmaozinho_core::Collection;
use irmaozinho_validation::{Article, Product};

use crate::store::StoredDocument;

/// Terms shorter than this (after trimming) do not filter.
pub const MIN_TERM_CHARS: usize = 2;

/// Category value that selects every bucket.
pub const ALL_CATEGORIES: &str = "all";

pub trait Searchable {
    /// Text fields a search term is matched against.
    fn haystacks(&self) -> Vec<&str>;

    fn category(&self) -> Option<&str>;
}

impl Searchable for Article {
    fn haystacks(&self) -> Vec<&str> {
        vec![self.title.as_str(), self.body.as_str()]
    }

    fn category(&self) -> Option<&str> {
        Some(self.category.as_str())
    }
}

impl Searchable for Product {
    fn haystacks(&self) -> Vec<&str> {
        vec![self.name.as_str(), self.description.as_str()]
    }

    fn category(&self) -> Option<&str> {
        Some(self.category.as_str())
    }
}

impl Searchable for StoredDocument {
    fn haystacks(&self) -> Vec<&str> {
        let keys: &[&str] = match self.collection {
            Collection::Articles => &["title", "body", "author", "excerpt"],
            Collection::Products => &["name", "description"],
            Collection::Suppliers => &["name", "email"],
            Collection::AuditLogs => &["action"],
        };
        keys.iter().filter_map(|key| self.str_field(key)).collect()
    }

    fn category(&self) -> Option<&str> {
        self.str_field("category")
    }
}

/// Case-insensitive substring search. A blank or too-short term returns
/// every item.
pub fn search<'a, T: Searchable>(items: &'a [T], term: &str) -> Vec<&'a T> {
    let needle = term.trim().to_lowercase();
    if needle.chars().count() < MIN_TERM_CHARS {
        return items.iter().collect();
    }

    items
        .iter()
        .filter(|item| {
            item.haystacks()
                .iter()
                .any(|hay| hay.to_lowercase().contains(&needle))
        })
        .collect()
}

/// Exact category match; `None` or [`ALL_CATEGORIES`] keeps everything.
pub fn filter_by_category<'a, T: Searchable>(items: &'a [T], category: Option<&str>) -> Vec<&'a T> {
    match category {
        None | Some(ALL_CATEGORIES) => items.iter().collect(),
        Some(wanted) => items
            .iter()
            .filter(|item| item.category() == Some(wanted))
            .collect(),
    }
}
