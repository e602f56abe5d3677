//! Shared application state.

use std::sync::Arc;

use crate::domain::{Assistant, MessageStore};

use super::registry::RoomRegistry;

/// Shared application state
pub struct AppState {
    /// Registry of connected sessions and rooms
    pub registry: RoomRegistry,
    /// Message store (persistence port)
    pub store: Arc<dyn MessageStore>,
    /// Assistant port; `None` when no backend is configured, in which case
    /// AI commands answer with an "AI not available" notice
    pub assistant: Option<Arc<dyn Assistant>>,
}

impl AppState {
    pub fn new(store: Arc<dyn MessageStore>, assistant: Option<Arc<dyn Assistant>>) -> Self {
        Self {
            registry: RoomRegistry::new(),
            store,
            assistant,
        }
    }
}
