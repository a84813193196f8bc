use std::sync::Arc;

use shared::error::{ApiError, ErrorCode};

/// Route-independent backend state shared by every handler.
#[derive(Clone)]
pub struct ApiContext {
    building_blocks: Arc<[String]>,
}

impl ApiContext {
    pub fn new(building_blocks: Vec<String>) -> Self {
        Self {
            building_blocks: building_blocks.into(),
        }
    }
}

pub fn health(_ctx: &ApiContext) -> &'static str {
    "ok"
}

pub fn list_building_blocks(ctx: &ApiContext) -> Vec<String> {
    ctx.building_blocks.to_vec()
}

pub fn route_not_found(path: &str) -> ApiError {
    ApiError::new(ErrorCode::NotFound, format!("no route for {path}"))
}

#[cfg(test)]
#[path = "tests/mod_tests.rs"]
mod tests;
