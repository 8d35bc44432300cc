//! goalboard backend
//!
//! Main application entry point: starts the HTTP API and the bot
//! long-poll loop as a background task.

use tokio::sync::watch;
use tracing::info;

use goalboard::{
    api::{self, AppState},
    bot::{BotPoller, TelegramClient},
    config::Settings,
    database::{self, connection::create_pool, DatabaseService},
    services::ServiceFactory,
    utils::logging,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    // Load configuration
    let settings = Settings::new()?;
    settings.validate()?;

    // Initialize logging; the guard keeps the file writer alive
    let _log_guard = logging::init_logging(&settings.logging)?;

    info!("Starting goalboard backend...");

    // Initialize database connection
    info!("Connecting to database...");
    let db_config = database::connection::DatabaseConfig {
        url: settings.database.url.clone(),
        max_connections: settings.database.max_connections,
        min_connections: settings.database.min_connections,
        ..Default::default()
    };
    let pool = create_pool(&db_config).await?;

    // Run database migrations
    database::run_migrations(&pool).await?;

    let db = DatabaseService::new(pool);

    // Initialize services
    info!("Initializing services...");
    let tg_client = TelegramClient::new(&settings.bot)?;
    let services = ServiceFactory::new(db.clone(), tg_client.clone(), &settings);

    // Start the bot poller as a background task with an explicit
    // shutdown signal
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let poller = BotPoller::new(tg_client, services.linking.clone(), shutdown_rx);
    let poller_handle = tokio::spawn(poller.run());

    // Start the HTTP server
    let state = AppState { db, services };
    let app = api::router(state);

    let addr = format!("{}:{}", settings.server.host, settings.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // Stop the poller and wait for it to drain
    let _ = shutdown_tx.send(true);
    let _ = poller_handle.await;

    info!("goalboard has been shut down");
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("Shutdown signal received");
    }
}
