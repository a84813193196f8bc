use std::fs;

use serde::Deserialize;
use shared::protocol::DEFAULT_BUILDING_BLOCKS;
use tracing::warn;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub server_bind: String,
    pub route_prefix: Option<String>,
    pub building_blocks: Vec<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server_bind: "127.0.0.1:7007".into(),
            route_prefix: None,
            building_blocks: DEFAULT_BUILDING_BLOCKS
                .iter()
                .map(|block| block.to_string())
                .collect(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct FileSettings {
    bind_addr: Option<String>,
    route_prefix: Option<String>,
    building_blocks: Option<Vec<String>>,
}

pub fn load_settings() -> Settings {
    let mut settings = Settings::default();

    if let Ok(raw) = fs::read_to_string("server.toml") {
        apply_file_settings(&mut settings, &raw);
    }
    apply_env_overrides(&mut settings, |key| std::env::var(key).ok());

    settings
}

pub(crate) fn apply_file_settings(settings: &mut Settings, raw: &str) {
    let file_cfg = match toml::from_str::<FileSettings>(raw) {
        Ok(cfg) => cfg,
        Err(error) => {
            warn!(%error, "ignoring unreadable server.toml");
            return;
        }
    };

    if let Some(v) = file_cfg.bind_addr {
        settings.server_bind = v;
    }
    if let Some(v) = file_cfg.route_prefix {
        settings.route_prefix = normalize_route_prefix(&v);
    }
    if let Some(v) = file_cfg.building_blocks {
        settings.building_blocks = v;
    }
}

pub(crate) fn apply_env_overrides(
    settings: &mut Settings,
    lookup: impl Fn(&str) -> Option<String>,
) {
    if let Some(v) = lookup("SERVER_BIND") {
        settings.server_bind = v;
    }
    if let Some(v) = lookup("APP__BIND_ADDR") {
        settings.server_bind = v;
    }

    if let Some(v) = lookup("APP__ROUTE_PREFIX") {
        settings.route_prefix = normalize_route_prefix(&v);
    }

    if let Some(v) = lookup("APP__BUILDING_BLOCKS") {
        settings.building_blocks = v
            .split(',')
            .map(str::trim)
            .filter(|block| !block.is_empty())
            .map(str::to_string)
            .collect();
    }
}

/// Turns `api/blocks/`, `/api/blocks` and friends into `/api/blocks`.
/// An empty or root prefix means the routes are served unprefixed.
pub(crate) fn normalize_route_prefix(raw: &str) -> Option<String> {
    let trimmed = raw.trim().trim_matches('/');
    if trimmed.is_empty() {
        return None;
    }
    Some(format!("/{trimmed}"))
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
