use std::fmt;

use serde::{Deserialize, Serialize};

pub const RESOURCE_KIND: &str = "Resource";
pub const GITHUB_WORKFLOW_TYPE: &str = "github-workflow";

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EntityLink {
    pub url: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default, rename = "type")]
    pub link_type: Option<String>,
}

impl EntityLink {
    /// Title to show for the link, falling back to the url itself.
    pub fn label(&self) -> &str {
        self.title
            .as_deref()
            .filter(|title| !title.trim().is_empty())
            .unwrap_or(&self.url)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EntityMetadata {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub links: Vec<EntityLink>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EntitySpec {
    #[serde(default, rename = "type")]
    pub spec_type: Option<String>,
    #[serde(default)]
    pub lifecycle: Option<String>,
    #[serde(default)]
    pub owner: Option<String>,
}

/// A catalog descriptor as returned by the catalog entities endpoint.
///
/// Only the fields the list and detail views read are modelled; anything
/// else in the descriptor is ignored on deserialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entity {
    #[serde(default)]
    pub api_version: String,
    pub kind: String,
    pub metadata: EntityMetadata,
    #[serde(default)]
    pub spec: EntitySpec,
}

impl Entity {
    pub fn name(&self) -> &str {
        &self.metadata.name
    }

    pub fn description(&self) -> &str {
        self.metadata.description.as_deref().unwrap_or_default()
    }

    pub fn owner(&self) -> &str {
        self.spec.owner.as_deref().unwrap_or_default()
    }

    pub fn lifecycle(&self) -> &str {
        self.spec.lifecycle.as_deref().unwrap_or_default()
    }

    pub fn tags(&self) -> &[String] {
        &self.metadata.tags
    }

    pub fn links(&self) -> &[EntityLink] {
        &self.metadata.links
    }
}

/// Kind and `spec.type` constraint passed through to the entity source.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueryFilter {
    kind: String,
    spec_type: String,
}

impl QueryFilter {
    pub fn new(kind: impl Into<String>, spec_type: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            spec_type: spec_type.into(),
        }
    }

    pub fn github_workflows() -> Self {
        Self::new(RESOURCE_KIND, GITHUB_WORKFLOW_TYPE)
    }

    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn spec_type(&self) -> &str {
        &self.spec_type
    }

    /// Catalog query-string form, e.g. `kind=Resource,spec.type=github-workflow`.
    pub fn to_query_value(&self) -> String {
        format!("kind={},spec.type={}", self.kind, self.spec_type)
    }
}

impl Default for QueryFilter {
    fn default() -> Self {
        Self::github_workflows()
    }
}

impl fmt::Display for QueryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_query_value())
    }
}

#[cfg(test)]
#[path = "tests/domain_tests.rs"]
mod tests;
