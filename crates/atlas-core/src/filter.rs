//! Filter engine: a pure mapping from (category, search text) to the visible
//! subset of canonical records.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::record::{BusinessType, CompanyRecord, RecordId};

/// Category selector value.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CategoryFilter {
    #[default]
    All,
    #[serde(rename = "Life Sciences")]
    LifeSciences,
    Technology,
}

impl CategoryFilter {
    /// Selector options in display order.
    pub const OPTIONS: [CategoryFilter; 3] = [
        CategoryFilter::All,
        CategoryFilter::LifeSciences,
        CategoryFilter::Technology,
    ];

    /// Label shown in the category selector.
    pub fn label(self) -> &'static str {
        match self {
            CategoryFilter::All => "All Companies",
            CategoryFilter::LifeSciences => BusinessType::LIFE_SCIENCES_LABEL,
            CategoryFilter::Technology => BusinessType::TECHNOLOGY_LABEL,
        }
    }

    /// Exact-match test; `All` accepts everything, including unknown types.
    pub fn matches(self, business_type: &BusinessType) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::LifeSciences => *business_type == BusinessType::LifeSciences,
            CategoryFilter::Technology => *business_type == BusinessType::Technology,
        }
    }
}

impl fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Current filter inputs of one dashboard session.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterState {
    pub category: CategoryFilter,
    pub search: String,
}

/// Records matching a filter, in canonical order.
#[derive(Clone, Debug, PartialEq)]
pub struct FilterOutcome<'a> {
    pub records: Vec<&'a CompanyRecord>,
}

impl FilterOutcome<'_> {
    pub fn count(&self) -> usize {
        self.records.len()
    }

    pub fn ids(&self) -> Vec<RecordId> {
        self.records.iter().map(|record| record.id).collect()
    }
}

/// Apply the category and search predicates to `records`.
pub fn filter<'a>(
    records: &'a [CompanyRecord],
    category: CategoryFilter,
    search: &str,
) -> FilterOutcome<'a> {
    // Whitespace only decides emptiness; a non-blank needle is matched as typed.
    let needle = (!search.trim().is_empty()).then(|| search.to_lowercase());
    let records = records
        .iter()
        .filter(|record| category.matches(&record.business_type))
        .filter(|record| match &needle {
            Some(needle) => record.name.to_lowercase().contains(needle.as_str()),
            None => true,
        })
        .collect();
    FilterOutcome { records }
}

/// "<N> companies", singular for exactly one.
pub fn count_label(count: usize) -> String {
    if count == 1 {
        "1 company".to_string()
    } else {
        format!("{count} companies")
    }
}
