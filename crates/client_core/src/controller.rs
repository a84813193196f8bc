//! View-state controller for the catalog-backed list view.
//!
//! One controller belongs to one mounted view. It issues a single entity
//! query, publishes every state transition as a [`ViewSnapshot`], and keeps
//! the selected entity in step with the navigation location.
//!
//! ```text
//!             ┌──► Empty
//!   Loading ──┼──► Loaded ◄──► Loaded + selection
//!             └──► Failed
//! ```
//!
//! The query runs on a spawned task. Its result is applied only while the
//! controller is still active: after [`ViewController::stop`] a late result
//! is dropped, and the task never keeps a dropped controller alive.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use shared::{
    domain::{Entity, QueryFilter},
    error::FetchError,
};
use tokio::{sync::watch, task::JoinHandle};
use tokio_stream::wrappers::WatchStream;
use tracing::{debug, warn};

use crate::{
    catalog::EntitySource,
    navigation::{entity_name_from_path, entity_path, Navigator},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewState {
    Loading,
    Failed(FetchError),
    Empty,
    Loaded(Vec<Entity>),
}

impl ViewState {
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    pub fn entities(&self) -> &[Entity] {
        match self {
            Self::Loaded(entities) => entities,
            _ => &[],
        }
    }

    fn contains(&self, name: &str) -> bool {
        self.entities().iter().any(|entity| entity.name() == name)
    }

    fn label(&self) -> &'static str {
        match self {
            Self::Loading => "loading",
            Self::Failed(_) => "failed",
            Self::Empty => "empty",
            Self::Loaded(_) => "loaded",
        }
    }
}

/// What a renderer needs after each transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewSnapshot {
    pub view_state: ViewState,
    pub selection: Option<String>,
}

impl ViewSnapshot {
    pub fn selected_entity(&self) -> Option<&Entity> {
        let name = self.selection.as_deref()?;
        self.view_state
            .entities()
            .iter()
            .find(|entity| entity.name() == name)
    }
}

struct ControllerState {
    view_state: ViewState,
    selection: Option<String>,
    // last reported location, replayed once the fetch lands
    pending_location: Option<String>,
    started: bool,
    active: bool,
}

impl ControllerState {
    fn snapshot(&self) -> ViewSnapshot {
        ViewSnapshot {
            view_state: self.view_state.clone(),
            selection: self.selection.clone(),
        }
    }

    fn reconcile(&mut self, base_path: &str, path: &str) -> bool {
        let next = entity_name_from_path(base_path, path)
            .filter(|name| self.view_state.contains(name))
            .map(str::to_string);
        if self.selection == next {
            return false;
        }
        self.selection = next;
        true
    }
}

struct ControllerShared {
    state: Mutex<ControllerState>,
    snapshots: watch::Sender<ViewSnapshot>,
    source: Arc<dyn EntitySource>,
    navigator: Arc<dyn Navigator>,
    base_path: String,
}

#[derive(Clone)]
pub struct ViewController {
    shared: Arc<ControllerShared>,
}

impl ViewController {
    pub fn new(
        source: Arc<dyn EntitySource>,
        navigator: Arc<dyn Navigator>,
        base_path: impl Into<String>,
    ) -> Self {
        let state = ControllerState {
            view_state: ViewState::Loading,
            selection: None,
            pending_location: None,
            started: false,
            active: true,
        };
        let (snapshots, _) = watch::channel(state.snapshot());
        let base_path: String = base_path.into();
        Self {
            shared: Arc::new(ControllerShared {
                state: Mutex::new(state),
                snapshots,
                source,
                navigator,
                base_path: base_path.trim_end_matches('/').to_string(),
            }),
        }
    }

    /// Reconcile from every location change the navigator reports, starting
    /// with the current one so deep links resolve.
    pub fn follow_location(&self) {
        let weak: Weak<ControllerShared> = Arc::downgrade(&self.shared);
        self.shared
            .navigator
            .on_location_change(Arc::new(move |path: &str| {
                if let Some(shared) = weak.upgrade() {
                    ViewController { shared }.reconcile_from_location(path);
                }
            }));
        let current = self.shared.navigator.current_path();
        self.reconcile_from_location(&current);
    }

    /// Issue the entity query. Only the first call per controller does
    /// anything; the returned handle completes once the result is applied
    /// or discarded.
    pub fn start(&self, filter: QueryFilter) -> Option<JoinHandle<()>> {
        {
            let mut state = self.lock_state();
            if !state.active {
                debug!("ignoring start on stopped controller");
                return None;
            }
            if state.started {
                warn!(%filter, "controller already started; ignoring second start");
                return None;
            }
            state.started = true;
        }

        debug!(%filter, "fetching entities");
        let weak = Arc::downgrade(&self.shared);
        let source = self.shared.source.clone();
        Some(tokio::spawn(async move {
            let result = source.query(&filter).await;
            match weak.upgrade() {
                Some(shared) => ViewController { shared }.apply_fetch_result(result),
                None => debug!("controller dropped before fetch completed"),
            }
        }))
    }

    /// Detach from the in-flight fetch. Nothing the fetch produces after
    /// this call becomes observable.
    pub fn stop(&self) {
        let mut state = self.lock_state();
        if state.active {
            state.active = false;
            debug!(state = state.view_state.label(), "controller stopped");
        }
    }

    pub fn is_active(&self) -> bool {
        self.lock_state().active
    }

    pub fn base_path(&self) -> &str {
        &self.shared.base_path
    }

    pub fn snapshot(&self) -> ViewSnapshot {
        self.lock_state().snapshot()
    }

    pub fn subscribe(&self) -> watch::Receiver<ViewSnapshot> {
        self.shared.snapshots.subscribe()
    }

    pub fn snapshots(&self) -> WatchStream<ViewSnapshot> {
        WatchStream::new(self.subscribe())
    }

    pub fn selected_entity(&self) -> Option<Entity> {
        self.snapshot().selected_entity().cloned()
    }

    /// Select a loaded entity and move the location to its detail path.
    /// Silently ignored unless `name` is part of the loaded data.
    pub fn select(&self, name: &str) {
        let path = {
            let mut state = self.lock_state();
            if !state.active || !state.view_state.contains(name) {
                debug!(
                    name,
                    state = state.view_state.label(),
                    "ignoring selection of unavailable entity"
                );
                return;
            }
            if state.selection.as_deref() != Some(name) {
                state.selection = Some(name.to_string());
                self.publish(&state);
            }
            entity_path(&self.shared.base_path, name)
        };
        self.shared.navigator.navigate_to(&path);
    }

    pub fn clear_selection(&self) {
        {
            let mut state = self.lock_state();
            if !state.active {
                return;
            }
            // a deep link dismissed before the data landed must not come back
            state.pending_location = None;
            if state.selection.take().is_some() {
                self.publish(&state);
            }
        }
        self.shared.navigator.navigate_to(&self.shared.base_path);
    }

    /// Derive the selection from `path` without navigating. A path that
    /// cannot be matched yet is remembered and replayed when data arrives.
    pub fn reconcile_from_location(&self, path: &str) {
        let mut state = self.lock_state();
        if !state.active {
            return;
        }
        state.pending_location = Some(path.to_string());
        if state.reconcile(&self.shared.base_path, path) {
            debug!(path, selection = ?state.selection, "selection reconciled from location");
            self.publish(&state);
        }
    }

    fn apply_fetch_result(&self, result: Result<Vec<Entity>, FetchError>) {
        let mut state = self.lock_state();
        if !state.active {
            debug!("discarding fetch result for stopped controller");
            return;
        }
        if !state.view_state.is_loading() {
            return;
        }

        state.view_state = match result {
            Ok(entities) if entities.is_empty() => ViewState::Empty,
            Ok(entities) => ViewState::Loaded(entities),
            Err(err) => {
                warn!(kind = ?err.kind(), error = %err.message(), "entity fetch failed");
                ViewState::Failed(err)
            }
        };
        debug!(
            state = state.view_state.label(),
            count = state.view_state.entities().len(),
            "fetch completed"
        );

        if let Some(path) = state.pending_location.clone() {
            state.reconcile(&self.shared.base_path, &path);
        }
        self.publish(&state);
    }

    fn publish(&self, state: &ControllerState) {
        self.shared.snapshots.send_replace(state.snapshot());
    }

    fn lock_state(&self) -> MutexGuard<'_, ControllerState> {
        self.shared
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
#[path = "tests/controller_tests.rs"]
mod tests;
