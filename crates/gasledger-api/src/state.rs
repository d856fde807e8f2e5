use std::sync::Arc;

use gasledger_repository::{IdentityProvider, ReadingStore};

/// Shared handler state: the two collaborators every reading operation needs.
/// Both are injected; nothing in the API layer reaches for a global.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn ReadingStore>,
    pub identity: Arc<dyn IdentityProvider>,
}

impl AppState {
    pub fn new(store: Arc<dyn ReadingStore>, identity: Arc<dyn IdentityProvider>) -> Self {
        Self { store, identity }
    }
}
