use std::sync::Arc;

use crate::db::ReviewStore;

/// Shared application state
///
/// Holds the storage collaborator behind a trait object so integration
/// tests can swap in an in-memory store.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn ReviewStore>,
}

impl AppState {
    pub fn new(store: Arc<dyn ReviewStore>) -> Self {
        Self { store }
    }
}
