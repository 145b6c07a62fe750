use std::sync::Arc;

use tern::dispatch::ToolDispatcher;

/// Shared application state. The dispatcher is immutable after startup;
/// concurrent requests share it behind an Arc.
#[derive(Clone)]
pub struct AppState {
    pub dispatcher: Arc<ToolDispatcher>,
}

impl AppState {
    pub fn new(dispatcher: ToolDispatcher) -> Self {
        Self {
            dispatcher: Arc::new(dispatcher),
        }
    }
}
