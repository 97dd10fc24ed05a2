//! Application state for dependency injection.

use std::sync::Arc;

use auth_service_lib::RegistrationService;
use user_service_lib::infra::Database;

use crate::session::SessionEstablisher;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub registration: Arc<dyn RegistrationService>,
    pub sessions: SessionEstablisher,
    pub database: Database,
}

impl AppState {
    /// Create new app state.
    pub fn new(
        registration: Arc<dyn RegistrationService>,
        sessions: SessionEstablisher,
        database: Database,
    ) -> Self {
        Self {
            registration,
            sessions,
            database,
        }
    }
}
