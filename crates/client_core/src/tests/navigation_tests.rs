use super::*;

use std::sync::atomic::{AtomicUsize, Ordering};

#[test]
fn entity_path_appends_one_segment() {
    assert_eq!(entity_path("/building-blocks", "wf-a"), "/building-blocks/wf-a");
    assert_eq!(entity_path("/building-blocks/", "wf-a"), "/building-blocks/wf-a");
}

#[test]
fn extracts_trailing_entity_segment() {
    let base = "/building-blocks";
    assert_eq!(entity_name_from_path(base, "/building-blocks/wf-a"), Some("wf-a"));
    assert_eq!(entity_name_from_path(base, "/building-blocks/wf-a/"), Some("wf-a"));
    assert_eq!(
        entity_name_from_path(base, "/building-blocks/wf-a?tab=links"),
        Some("wf-a")
    );
    assert_eq!(entity_name_from_path(base, "/building-blocks"), None);
    assert_eq!(entity_name_from_path(base, "/building-blocks/"), None);
    assert_eq!(entity_name_from_path(base, "/building-blocks/a/b"), None);
    assert_eq!(entity_name_from_path(base, "/building-blocksx/wf-a"), None);
    assert_eq!(entity_name_from_path(base, "/catalog/wf-a"), None);
}

#[test]
fn navigate_records_history_and_notifies() {
    let navigator = MemoryNavigator::new("/building-blocks");
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = seen.clone();
    navigator.on_location_change(Arc::new(move |path: &str| {
        sink.lock().expect("lock").push(path.to_string());
    }));

    navigator.navigate_to("/building-blocks/wf-a");
    navigator.navigate_to("/building-blocks/wf-a");
    assert_eq!(navigator.current_path(), "/building-blocks/wf-a");
    assert_eq!(
        navigator.history(),
        vec!["/building-blocks", "/building-blocks/wf-a"]
    );

    assert!(navigator.back());
    assert!(!navigator.back());
    assert_eq!(navigator.current_path(), "/building-blocks");
    assert_eq!(
        *seen.lock().expect("lock"),
        vec!["/building-blocks/wf-a", "/building-blocks"]
    );
}

#[test]
fn handlers_may_navigate_reentrantly() {
    let navigator = MemoryNavigator::new("/");
    let calls = Arc::new(AtomicUsize::new(0));
    let weak = Arc::downgrade(&navigator);
    let counter = calls.clone();
    navigator.on_location_change(Arc::new(move |path: &str| {
        counter.fetch_add(1, Ordering::SeqCst);
        if path == "/redirect" {
            if let Some(navigator) = weak.upgrade() {
                navigator.navigate_to("/target");
            }
        }
    }));

    navigator.navigate_to("/redirect");
    assert_eq!(navigator.current_path(), "/target");
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}
