use std::sync::Arc;

use auth::PasswordHasher;
use auth::TokenIssuer;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use user_directory::config::Config;
use user_directory::domain::user::ports::UserServicePort;
use user_directory::domain::user::service::UserService;
use user_directory::inbound::http::router::create_router;
use user_directory::outbound::repositories::InMemoryUserRepository;
use user_directory::outbound::repositories::PostgresUserRepository;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    let dotenv = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "user_directory=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        service = "user-directory",
        version = env!("CARGO_PKG_VERSION"),
        "Service starting"
    );
    if let Ok(path) = dotenv {
        tracing::info!(path = %path.display(), "Loaded environment file");
    }

    let config = Config::load()?;

    tracing::info!(
        http_port = config.server.http_port,
        database = config.database.is_some(),
        jwt_expiration_hours = ?config.jwt.expiration_hours,
        hashing_memory_kib = config.hashing.memory_kib,
        hashing_iterations = config.hashing.iterations,
        hashing_parallelism = config.hashing.parallelism,
        "Configuration loaded"
    );

    let password_hasher = PasswordHasher::with_cost(config.hashing.into())?;

    let mut token_issuer = TokenIssuer::new(config.jwt.secret.as_bytes());
    if let Some(hours) = config.jwt.expiration_hours {
        token_issuer = token_issuer.with_expiration_hours(hours);
    }
    let token_issuer = Arc::new(token_issuer);

    let (user_service, pg_pool): (Arc<dyn UserServicePort>, Option<PgPool>) =
        match &config.database {
            Some(database) => {
                let pg_pool = PgPoolOptions::new()
                    .max_connections(5)
                    .connect(&database.url)
                    .await
                    .inspect_err(|e| {
                        tracing::error!(error = %e, database = "postgresql", "Database connection failed")
                    })?;
                tracing::info!(
                    max_connections = 5,
                    database = "postgresql",
                    "Database connection pool created"
                );

                sqlx::migrate!("./migrations").run(&pg_pool).await?;
                tracing::info!(database = "postgresql", "Database migrations completed");

                let user_repository = Arc::new(PostgresUserRepository::new(pg_pool.clone()));
                (
                    Arc::new(UserService::new(user_repository, password_hasher)),
                    Some(pg_pool),
                )
            }
            None => {
                tracing::warn!("No database.url configured, users are kept in memory");
                let user_repository = Arc::new(InMemoryUserRepository::new());
                (
                    Arc::new(UserService::new(user_repository, password_hasher)),
                    None,
                )
            }
        };

    let http_address = format!("0.0.0.0:{}", config.server.http_port);
    let http_listener = tokio::net::TcpListener::bind(&http_address).await?;
    tracing::info!(
        address = %http_address,
        port = config.server.http_port,
        protocol = "http",
        "Http server listening"
    );

    let http_application = create_router(user_service, token_issuer);
    axum::serve(http_listener, http_application)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some(pg_pool) = pg_pool {
        pg_pool.close().await;
        tracing::info!(database = "postgresql", "Database connection pool closed");
    }

    tracing::info!("Server exited successfully");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        return;
    }
    tracing::info!("Shutdown signal received");
}
