//! Application state for the HR engine API.

use std::sync::Arc;

use crate::engine::HrEngine;

/// Shared application state.
///
/// Holds the wired engine; every handler reaches the services through it.
#[derive(Clone)]
pub struct AppState {
    engine: Arc<HrEngine>,
}

impl AppState {
    /// Creates a new application state around `engine`.
    pub fn new(engine: HrEngine) -> Self {
        Self {
            engine: Arc::new(engine),
        }
    }

    /// Returns the engine.
    pub fn engine(&self) -> &HrEngine {
        &self.engine
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_state_is_clone() {
        fn assert_clone<T: Clone + Send + Sync + 'static>() {}
        assert_clone::<AppState>();
    }
}
