use auth_service::config::Config;
use auth_service::directory::StaticDirectory;
use auth_service::handlers::auth_handler::AppState;
use auth_service::keys::KeyManager;
use auth_service::routes;
use auth_service::services::{session_service::SessionService, token_service::TokenService};
use auth_service::store::{RedisRevocationStore, SessionRevocationStore};
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "auth_service=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting account auth service");

    let config = Config::from_env().map_err(|e| {
        error!("Failed to load configuration: {}", e);
        e
    })?;

    info!("Configuration loaded successfully");

    // Key material load is fatal on failure: the process must not begin
    // serving requests without a valid keypair.
    let key_manager = KeyManager::load(
        Path::new(&config.private_key_path),
        Path::new(&config.public_key_path),
        &config.key_derivation_factor,
        config.key_derivation_iterations,
    )
    .map_err(|e| {
        error!("Failed to load signing keypair: {}", e);
        e
    })?;
    let key_manager = Arc::new(key_manager);

    info!("Connecting to revocation store...");
    let backend = RedisRevocationStore::connect(&config.redis_url)
        .await
        .map_err(|e| {
            error!("Failed to connect to revocation store: {}", e);
            e
        })?;
    let revocation = SessionRevocationStore::new(
        Arc::new(backend),
        Duration::from_millis(config.revocation_timeout_ms),
    );

    info!("Revocation store connected");

    let directory = StaticDirectory::from_file(Path::new(&config.user_directory_path))
        .map_err(|e| {
            error!("Failed to load user directory: {}", e);
            e
        })?;

    let tokens = TokenService::new(key_manager, config.token_ttl_seconds);
    let sessions = SessionService::new(tokens.clone(), revocation.clone(), config.bcrypt_cost);

    let bind_address = config.bind_address.clone();

    let state = Arc::new(AppState {
        tokens,
        sessions,
        revocation,
        directory: Arc::new(directory),
    });

    let app = routes::build_routes(state);

    let addr: SocketAddr = bind_address.parse().map_err(|e| {
        error!("Invalid bind address: {}", e);
        e
    })?;

    info!("Account auth service listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
