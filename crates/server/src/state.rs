//! Shared application state

use std::sync::Arc;

use intake_agent::DialogueController;
use intake_config::Settings;
use intake_persistence::TicketStore;

use crate::session::SessionRegistry;

/// State shared by every request handler
#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<Settings>,
    pub controller: Arc<DialogueController>,
    pub sessions: Arc<SessionRegistry>,
    pub store: Arc<dyn TicketStore>,
}

impl AppState {
    pub fn new(
        settings: Settings,
        controller: Arc<DialogueController>,
        store: Arc<dyn TicketStore>,
    ) -> Self {
        Self {
            settings: Arc::new(settings),
            controller,
            sessions: Arc::new(SessionRegistry::new()),
            store,
        }
    }
}
