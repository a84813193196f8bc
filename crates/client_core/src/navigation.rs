use std::sync::{Arc, Mutex, PoisonError};

use tracing::debug;

pub type LocationHandler = Arc<dyn Fn(&str) + Send + Sync>;

/// Read/write access to the application's current location path.
pub trait Navigator: Send + Sync {
    fn current_path(&self) -> String;
    fn navigate_to(&self, path: &str);
    fn on_location_change(&self, handler: LocationHandler);
}

/// Path of the detail view for `name` under `base_path`.
pub fn entity_path(base_path: &str, name: &str) -> String {
    format!("{}/{name}", base_path.trim_end_matches('/'))
}

/// Entity name encoded as the single trailing segment of `path` under
/// `base_path`, if any. Query strings and fragments are ignored.
pub fn entity_name_from_path<'a>(base_path: &str, path: &'a str) -> Option<&'a str> {
    let path = path.split(['?', '#']).next().unwrap_or_default();
    let rest = path.strip_prefix(base_path.trim_end_matches('/'))?;
    let name = rest.strip_prefix('/')?.trim_end_matches('/');
    if name.is_empty() || name.contains('/') {
        return None;
    }
    Some(name)
}

struct History {
    entries: Vec<String>,
}

/// In-process [`Navigator`] with a history stack.
pub struct MemoryNavigator {
    history: Mutex<History>,
    handlers: Mutex<Vec<LocationHandler>>,
}

impl MemoryNavigator {
    pub fn new(initial_path: impl Into<String>) -> Arc<Self> {
        Arc::new(Self {
            history: Mutex::new(History {
                entries: vec![initial_path.into()],
            }),
            handlers: Mutex::new(Vec::new()),
        })
    }

    pub fn history(&self) -> Vec<String> {
        self.history
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entries
            .clone()
    }

    /// Pops the current entry. Returns `false` when already at the first one.
    pub fn back(&self) -> bool {
        let path = {
            let mut history = self.history.lock().unwrap_or_else(PoisonError::into_inner);
            if history.entries.len() < 2 {
                return false;
            }
            history.entries.pop();
            history.entries.last().cloned().unwrap_or_default()
        };
        self.notify(&path);
        true
    }

    fn notify(&self, path: &str) {
        // handlers may navigate again, so call them without holding any lock
        let handlers = self
            .handlers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        for handler in handlers {
            handler(path);
        }
    }
}

impl Navigator for MemoryNavigator {
    fn current_path(&self) -> String {
        self.history
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entries
            .last()
            .cloned()
            .unwrap_or_default()
    }

    fn navigate_to(&self, path: &str) {
        {
            let mut history = self.history.lock().unwrap_or_else(PoisonError::into_inner);
            if history.entries.last().map(String::as_str) == Some(path) {
                return;
            }
            history.entries.push(path.to_string());
        }
        debug!(path, "location changed");
        self.notify(path);
    }

    fn on_location_change(&self, handler: LocationHandler) {
        self.handlers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(handler);
    }
}

#[cfg(test)]
#[path = "tests/navigation_tests.rs"]
mod tests;
