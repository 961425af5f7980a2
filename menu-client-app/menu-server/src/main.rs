use std::net::SocketAddr;
use std::sync::Arc;

use tracing::{error, info, warn};

use menu_api::{build_router, AppState};
use menu_core::domain::CategoryCatalog;
use menu_core::services::{AuthService, EventBus, LifecycleSettings, MenuItemLifecycle};
use menu_infrastructure::{
    InMemoryAuthProvider, InMemoryDocumentStore, InMemoryObjectStore,
    InMemoryReconciliationJournal, ObjectStoreSettings, QueuedReconciliationLog,
};
use menu_security::TokenService;
use menu_shared::config::AppConfig;
use menu_shared::utils::mask_email;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env
    dotenvy::dotenv().ok();

    // Initialize telemetry
    menu_shared::telemetry::init_telemetry();

    info!("Menu Server starting...");

    // Load configuration
    let config = match AppConfig::load() {
        Ok(c) => c,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    // Category catalog (single source of truth)
    let catalog = Arc::new(CategoryCatalog::new(&config.menu.categories)?);
    info!("Category catalog: {}", catalog.labels().join(", "));

    // Stores
    let documents = Arc::new(InMemoryDocumentStore::new());
    let objects = Arc::new(InMemoryObjectStore::new(ObjectStoreSettings {
        chunk_bytes: config.storage.upload_chunk_bytes,
        public_base_url: config.storage.public_base_url.clone(),
    }));
    let journal = Arc::new(InMemoryReconciliationJournal::with_capacity(
        config.reconciliation.journal_capacity,
    ));
    let reconciliation =
        QueuedReconciliationLog::spawn(journal, config.reconciliation.queue_capacity);

    let lifecycle = MenuItemLifecycle::new(
        documents,
        objects.clone(),
        Arc::new(reconciliation),
        catalog,
        Arc::new(EventBus::new(config.menu.event_bus_capacity)),
        LifecycleSettings {
            collection: config.menu.collection.clone(),
            max_image_bytes: config.storage.max_image_bytes,
        },
    );

    // Auth
    let token_secret = if config.auth.token_secret.is_empty() {
        warn!("auth.token_secret not set, generated an ephemeral secret (sessions end on restart)");
        TokenService::generate_secret()
    } else {
        config.auth.token_secret.clone()
    };
    let provider = InMemoryAuthProvider::new(
        TokenService::new(token_secret),
        config.auth.session_ttl_seconds,
    );
    if config.auth.admin_password.is_empty() {
        warn!("auth.admin_password not set, admin sign-in is disabled");
    } else {
        provider.add_admin(&config.auth.admin_email, &config.auth.admin_password)?;
        info!("Admin account: {}", mask_email(&config.auth.admin_email));
    }
    let auth = AuthService::new(Arc::new(provider));

    // Bind address
    let host: std::net::IpAddr = config.app.host.parse()?;
    let addr = SocketAddr::from((host, config.app.port));

    // Build router
    let state = AppState::new(Arc::new(lifecycle), Arc::new(auth), objects, config);
    let app = build_router(state);

    info!("Listening on {}", addr);

    // Start server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Menu Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
