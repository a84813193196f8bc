use serde::{Deserialize, Serialize};

use crate::domain::Entity;

pub const DEFAULT_BUILDING_BLOCKS: [&str; 3] = ["block1", "block2", "block3"];

pub fn health_route() -> &'static str {
    "/health"
}

pub fn building_blocks_route() -> &'static str {
    "/building-blocks"
}

pub fn catalog_entities_route() -> &'static str {
    "/entities"
}

/// Body of a catalog entities response.
///
/// Older catalog backends answer with a bare array, newer ones wrap it in
/// `{ "items": [...] }`; both are accepted.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EntityListResponse {
    Bare(Vec<Entity>),
    Items { items: Vec<Entity> },
}

impl EntityListResponse {
    pub fn into_entities(self) -> Vec<Entity> {
        match self {
            Self::Bare(items) => items,
            Self::Items { items } => items,
        }
    }
}
