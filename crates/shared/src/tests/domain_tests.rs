use super::*;

use crate::protocol::EntityListResponse;

#[test]
fn filter_renders_catalog_query_value() {
    let filter = QueryFilter::default();
    assert_eq!(filter.kind(), RESOURCE_KIND);
    assert_eq!(filter.spec_type(), GITHUB_WORKFLOW_TYPE);
    assert_eq!(filter.to_string(), "kind=Resource,spec.type=github-workflow");
}

#[test]
fn sparse_descriptor_fills_defaults() {
    let entity: Entity = serde_json::from_value(serde_json::json!({
        "kind": "Resource",
        "metadata": { "name": "bare-workflow" }
    }))
    .expect("entity");

    assert_eq!(entity.name(), "bare-workflow");
    assert_eq!(entity.description(), "");
    assert_eq!(entity.owner(), "");
    assert!(entity.tags().is_empty());
    assert!(entity.links().is_empty());
}

#[test]
fn unknown_descriptor_fields_are_ignored() {
    let entity: Entity = serde_json::from_value(serde_json::json!({
        "apiVersion": "backstage.io/v1alpha1",
        "kind": "Resource",
        "metadata": {
            "name": "some-workflow",
            "path": "workflows",
            "schema": { "type": "object", "required": ["workflow_file_path"] },
            "links": [{ "url": "https://github.com/your-org/common-github-workflows" }]
        },
        "spec": { "type": "github-workflow", "owner": "your-org", "tags": ["ci"] }
    }))
    .expect("entity");

    assert_eq!(entity.api_version, "backstage.io/v1alpha1");
    assert_eq!(entity.spec.spec_type.as_deref(), Some(GITHUB_WORKFLOW_TYPE));
    assert_eq!(
        entity.links()[0].label(),
        "https://github.com/your-org/common-github-workflows"
    );
}

#[test]
fn entity_list_accepts_both_shapes() {
    let bare: EntityListResponse = serde_json::from_str("[]").expect("bare");
    assert!(bare.into_entities().is_empty());

    let wrapped: EntityListResponse = serde_json::from_value(serde_json::json!({
        "items": [{ "kind": "Resource", "metadata": { "name": "wf-a" } }]
    }))
    .expect("wrapped");
    let entities = wrapped.into_entities();
    assert_eq!(entities.len(), 1);
    assert_eq!(entities[0].name(), "wf-a");
}
