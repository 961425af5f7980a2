// ============================================================================
// Menu Core - Category Catalog
// File: crates/menu-core/src/domain/category.rs
// Description: Single source of truth for the enumerated category labels
// ============================================================================

use std::fmt;

use menu_shared::constants::ALL_ITEMS_LABEL;
use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Configured category labels, trimmed, deduplicated, in configured order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryCatalog {
    labels: Vec<String>,
}

impl CategoryCatalog {
    pub fn new<I, S>(labels: I) -> Result<Self, DomainError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut normalized: Vec<String> = Vec::new();
        for label in labels {
            let label = label.as_ref().trim();
            if label.is_empty() || normalized.iter().any(|l| l == label) {
                continue;
            }
            if label == ALL_ITEMS_LABEL {
                return Err(DomainError::ValidationError(format!(
                    "'{}' is reserved for filtering",
                    ALL_ITEMS_LABEL
                )));
            }
            normalized.push(label.to_string());
        }

        if normalized.is_empty() {
            return Err(DomainError::ValidationError(
                "category catalog must contain at least one label".to_string(),
            ));
        }

        Ok(Self { labels: normalized })
    }

    pub fn contains(&self, label: &str) -> bool {
        self.labels.iter().any(|l| l == label)
    }

    /// Trimmed label if it belongs to the catalog.
    pub fn resolve(&self, label: &str) -> Result<String, DomainError> {
        let label = label.trim();
        if label.is_empty() {
            return Err(DomainError::ValidationError("category is required".to_string()));
        }
        if !self.contains(label) {
            return Err(DomainError::InvalidCategory(label.to_string()));
        }
        Ok(label.to_string())
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.labels.iter().map(String::as_str)
    }

    /// Labels offered by a category picker, `All Items` first.
    pub fn filter_options(&self) -> Vec<String> {
        std::iter::once(ALL_ITEMS_LABEL.to_string())
            .chain(self.labels.iter().cloned())
            .collect()
    }
}

/// Category selection applied over a full listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(String),
}

impl CategoryFilter {
    /// `None`, blank or `All Items` select everything.
    pub fn from_label(label: Option<&str>) -> Self {
        match label.map(str::trim) {
            None | Some("") => CategoryFilter::All,
            Some(l) if l == ALL_ITEMS_LABEL => CategoryFilter::All,
            Some(l) => CategoryFilter::Only(l.to_string()),
        }
    }

    pub fn matches(&self, category: &str) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Only(label) => label == category,
        }
    }
}

impl fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CategoryFilter::All => write!(f, "{}", ALL_ITEMS_LABEL),
            CategoryFilter::Only(label) => write!(f, "{}", label),
        }
    }
}
