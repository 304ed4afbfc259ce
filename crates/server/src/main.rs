//! 311 intake agent server entry point

use std::path::PathBuf;
use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use intake_agent::DialogueController;
use intake_config::{load_settings, Settings};
use intake_geocode::AddressVerifier;
use intake_persistence::{InMemoryTicketStore, TicketStore};
use intake_server::{create_router, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let config_path = std::env::var("INTAKE_CONFIG").ok().map(PathBuf::from);
    let settings = match load_settings(config_path.as_deref()) {
        Ok(settings) => settings,
        Err(err) => {
            tracing::warn!(error = %err, "failed to load settings, using defaults");
            Settings::default()
        }
    };

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        city = %settings.default_city,
        state = %settings.default_state,
        "starting 311 intake agent"
    );

    let verifier = match AddressVerifier::from_config(&settings.geocoder) {
        Ok(verifier) => verifier,
        Err(err) => {
            tracing::warn!(error = %err, "geocoder unavailable, continuing without verification");
            None
        }
    };

    let store: Arc<dyn TicketStore> = Arc::new(InMemoryTicketStore::new());
    let controller = Arc::new(DialogueController::new(verifier, store.clone()));
    let state = AppState::new(settings.clone(), controller, store);

    let router = create_router(state);
    let addr = format!("{}:{}", settings.server.host, settings.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(addr = %addr, "listening");

    axum::serve(listener, router).await?;
    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("intake=info,tower_http=info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}
