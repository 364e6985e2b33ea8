use bank_api::auth::{CredentialManager, TokenService};
use bank_api::configuration::get_configuration;
use bank_api::startup::run;
use bank_api::storage::{InMemoryStore, PostgresStore, Storage};
use bank_api::telemetry::init_telemetry;
use sqlx::postgres::PgPoolOptions;
use std::net::TcpListener;
use std::sync::Arc;

fn startup_error(kind: std::io::ErrorKind, message: &str) -> std::io::Error {
    std::io::Error::new(kind, message.to_string())
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    init_telemetry();

    tracing::info!("Starting application");

    let configuration = get_configuration().map_err(|e| {
        tracing::error!("Failed to read configuration: {}", e);
        startup_error(std::io::ErrorKind::InvalidInput, "Configuration error")
    })?;

    // Fail fast on a missing signing secret or a bad work factor
    let tokens = TokenService::new(&configuration.jwt).map_err(|e| {
        tracing::error!("Invalid token settings: {}", e);
        startup_error(std::io::ErrorKind::InvalidInput, "Configuration error")
    })?;
    let credentials = CredentialManager::new(&configuration.credentials).map_err(|e| {
        tracing::error!("Invalid credential settings: {}", e);
        startup_error(std::io::ErrorKind::InvalidInput, "Configuration error")
    })?;

    let store: Arc<dyn Storage> = match &configuration.database {
        Some(database) => {
            tracing::info!("Attempting to connect to database");
            let pool = PgPoolOptions::new()
                .max_connections(5)
                .connect(&database.connection_string())
                .await
                .map_err(|e| {
                    tracing::error!("Failed to create connection pool: {}", e);
                    startup_error(
                        std::io::ErrorKind::ConnectionRefused,
                        "Database connection error",
                    )
                })?;

            let store = PostgresStore::new(pool);
            store.init().await.map_err(|e| {
                tracing::error!("Failed to create account table: {}", e);
                startup_error(std::io::ErrorKind::Other, "Database initialisation error")
            })?;

            tracing::info!("Database connection pool created successfully");
            Arc::new(store)
        }
        None => {
            tracing::warn!("No database configured, accounts are kept in memory");
            Arc::new(InMemoryStore::new())
        }
    };

    let address = format!(
        "{}:{}",
        configuration.application.host, configuration.application.port
    );
    let listener = TcpListener::bind(&address)?;
    tracing::info!("Server listening on: {}", address);

    run(listener, store, tokens, credentials)?.await
}
