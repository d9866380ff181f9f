//! Application state for the HTTP service.

use std::sync::Arc;

use prepline::Pipeline;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Pipeline used by every request; each request works on its own table.
    pub pipeline: Arc<Pipeline>,
}

impl AppState {
    /// Create new application state.
    pub fn new(pipeline: Pipeline) -> Self {
        Self {
            pipeline: Arc::new(pipeline),
        }
    }
}
