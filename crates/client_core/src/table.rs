//! Presentation model for the workflow table and its detail dialog.

use shared::domain::{Entity, EntityLink};

pub const PAGE_SIZE_OPTIONS: [usize; 3] = [5, 10, 20];
pub const DEFAULT_PAGE_SIZE: usize = PAGE_SIZE_OPTIONS[0];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableQuery {
    pub search: String,
    /// Zero-based.
    pub page: usize,
    pub page_size: usize,
}

impl TableQuery {
    /// Page sizes outside [`PAGE_SIZE_OPTIONS`] fall back to the default.
    pub fn new(search: impl Into<String>, page: usize, page_size: usize) -> Self {
        let page_size = if PAGE_SIZE_OPTIONS.contains(&page_size) {
            page_size
        } else {
            DEFAULT_PAGE_SIZE
        };
        Self {
            search: search.into(),
            page,
            page_size,
        }
    }
}

impl Default for TableQuery {
    fn default() -> Self {
        Self::new("", 0, DEFAULT_PAGE_SIZE)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRow {
    pub name: String,
    pub owner: String,
    pub tags: String,
}

impl TableRow {
    pub fn from_entity(entity: &Entity) -> Self {
        Self {
            name: entity.name().to_string(),
            owner: entity.owner().to_string(),
            tags: entity.tags().join(", "),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TablePage {
    pub rows: Vec<TableRow>,
    pub page: usize,
    pub page_count: usize,
    pub total_matches: usize,
}

impl TablePage {
    pub fn build(entities: &[Entity], query: &TableQuery) -> Self {
        let needle = query.search.trim().to_lowercase();
        let matches: Vec<&Entity> = entities
            .iter()
            .filter(|entity| needle.is_empty() || matches_search(entity, &needle))
            .collect();

        let page_size = query.page_size.max(1);
        let total_matches = matches.len();
        let page_count = total_matches.div_ceil(page_size).max(1);
        let page = query.page.min(page_count - 1);
        let rows = matches
            .into_iter()
            .skip(page * page_size)
            .take(page_size)
            .map(TableRow::from_entity)
            .collect();

        Self {
            rows,
            page,
            page_count,
            total_matches,
        }
    }
}

fn matches_search(entity: &Entity, needle: &str) -> bool {
    [entity.name(), entity.owner(), entity.description()]
        .into_iter()
        .chain(entity.tags().iter().map(String::as_str))
        .any(|field| field.to_lowercase().contains(needle))
}

/// Everything the detail dialog shows for one entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityDetail {
    pub name: String,
    pub description: String,
    pub owner: String,
    pub lifecycle: String,
    pub tags: Vec<String>,
    pub links: Vec<EntityLink>,
}

impl EntityDetail {
    pub fn from_entity(entity: &Entity) -> Self {
        Self {
            name: entity.name().to_string(),
            description: entity.description().to_string(),
            owner: entity.owner().to_string(),
            lifecycle: entity.lifecycle().to_string(),
            tags: entity.tags().to_vec(),
            links: entity.links().to_vec(),
        }
    }
}

#[cfg(test)]
#[path = "tests/table_tests.rs"]
mod tests;
