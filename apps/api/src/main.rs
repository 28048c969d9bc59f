use axum::http::{header, Method};
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::CorsLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use bookshelf_api::config::Config;
use bookshelf_api::graphql::SchemaBuilder;
use bookshelf_api::repositories::{MemoryStore, PgStore, SharedStore};
use bookshelf_api::routes::{app_router, GraphQLState, HealthState};
use bookshelf_api::services::seed_library;
use bookshelf_shared_config::{StoreBackend, DEFAULT_LOG_FILTER};

/// Build the CORS layer based on configuration.
///
/// In production mode:
/// - If `CORS_ORIGINS` is set, only those origins are allowed
/// - If `CORS_ORIGINS` is not set, CORS requests are rejected (no origins allowed)
///
/// In development mode:
/// - If `CORS_ORIGINS` is set, those origins are used
/// - If `CORS_ORIGINS` is not set, permissive CORS is used for convenience
fn build_cors_layer(config: &Config) -> CorsLayer {
    let is_production = config.environment().is_production();

    match &config.cors_allowed_origins {
        Some(origins) if !origins.is_empty() => {
            let allowed_origins: Vec<_> = origins
                .iter()
                .filter_map(|origin| {
                    origin.parse().ok().or_else(|| {
                        tracing::warn!("Invalid CORS origin '{}', skipping", origin);
                        None
                    })
                })
                .collect();

            if allowed_origins.is_empty() {
                tracing::error!("No valid CORS origins configured, CORS requests will be rejected");
                CorsLayer::new()
            } else {
                tracing::info!(
                    "CORS configured with {} allowed origin(s): {:?}",
                    allowed_origins.len(),
                    origins
                );
                CorsLayer::new()
                    .allow_origin(allowed_origins)
                    .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
                    .allow_headers([header::CONTENT_TYPE, header::ACCEPT, header::ORIGIN])
                    .max_age(Duration::from_secs(3600))
            }
        }
        _ if is_production => {
            tracing::warn!(
                "CORS_ORIGINS not configured in production mode. \
                 CORS requests will be rejected. Set CORS_ORIGINS to allow cross-origin requests."
            );
            CorsLayer::new()
        }
        _ => {
            tracing::warn!(
                "Using permissive CORS in development mode. \
                 Set CORS_ORIGINS for production-like behavior."
            );
            CorsLayer::permissive()
        }
    }
}

/// Open the configured entity store, running migrations for PostgreSQL
async fn connect_store(config: &Config) -> anyhow::Result<SharedStore> {
    match config.store().backend {
        StoreBackend::Memory => {
            tracing::info!("Using in-memory store");
            Ok(Arc::new(MemoryStore::new()))
        }
        StoreBackend::Postgres => {
            let database = config.database();
            tracing::info!("Connecting to database...");

            let pool = PgPoolOptions::new()
                .max_connections(database.max_connections)
                .min_connections(database.min_connections)
                .acquire_timeout(Duration::from_secs(database.connect_timeout_secs))
                .idle_timeout(Duration::from_secs(database.idle_timeout_secs))
                .connect(&database.url)
                .await?;

            tracing::info!("Database connection established");

            tracing::info!("Running database migrations...");
            sqlx::migrate!("./migrations").run(&pool).await?;
            tracing::info!("Migrations completed successfully");

            Ok(Arc::new(PgStore::new(pool)))
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables and configuration
    let dotenv_loaded = bookshelf_shared_config::load_dotenv();
    let config = Config::from_env()?;

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_new(&config.common.log_level)
                .unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    if dotenv_loaded {
        tracing::debug!("Loaded variables from .env");
    }

    tracing::info!(
        port = config.port,
        backend = %config.store().backend,
        environment = %config.environment(),
        "Starting Bookshelf API server"
    );

    let store = connect_store(&config).await?;

    if config.store().seed_on_startup {
        let report = seed_library(&store).await?;
        tracing::info!(
            authors = report.authors_inserted,
            books = report.books_inserted,
            "Sample library seeded"
        );
    }

    let schema = SchemaBuilder::new()
        .store(store.clone())
        .policy(config.policy)
        .max_depth(config.max_depth)
        .build()?;
    tracing::info!(
        titles = ?config.policy.titles,
        author_deletion = ?config.policy.author_deletion,
        "GraphQL schema built"
    );

    let graphql_state = GraphQLState {
        schema,
        store: store.clone(),
        loader_settings: config.loader,
    };
    let health_state = HealthState::new(store, config.store().backend.as_str());

    let app = app_router(graphql_state, health_state).layer(build_cors_layer(&config));

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(addr).await?;

    tracing::info!("Listening on {}", addr);
    tracing::info!(
        "GraphQL Playground available at http://{}:{}/graphql/playground",
        addr.ip(),
        addr.port()
    );

    axum::serve(listener, app).await?;

    Ok(())
}
