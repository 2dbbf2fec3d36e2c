//! Cocoon Price Advisor - Backend Server
//!
//! Recommends the crop start date with the best expected cocoon price at
//! harvest for a farm location, using historical climatology and a
//! pre-trained price model.

use axum::{routing::get, Router};
use sqlx::postgres::PgPoolOptions;
use std::{sync::Arc, time::Duration};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod config;
mod error;
mod handlers;
mod middleware;
mod models;
mod routes;
mod services;

pub use config::Config;

use services::{AppContext, HistoryService, WeatherHistoryLoader};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub context: AppContext,
    pub config: Arc<Config>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cpa_server=debug,tower_http=debug,sqlx=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = config::Config::load()?;

    tracing::info!("Starting Cocoon Price Advisor Server");
    tracing::info!("Environment: {}", config.environment);

    // Everything below degrades instead of aborting startup
    let weather = WeatherHistoryLoader::new(&config.data).load_all();
    let model = services::model::load_model_or_warn(&config.data.model_path);
    let history = HistoryService::new(connect_database(&config).await);

    let state = AppState {
        context: AppContext::new(weather, model, history, config.recommendation.horizon),
        config: Arc::new(config.clone()),
    };

    // Build application
    let app = create_app(state);

    // Start server
    let listener =
        tokio::net::TcpListener::bind((config.server.host.as_str(), config.server.port)).await?;
    tracing::info!("Listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Connect to the history database, if one is configured and reachable
async fn connect_database(config: &Config) -> Option<sqlx::PgPool> {
    let Some(url) = config.database.url.as_deref() else {
        tracing::info!("No database configured, recommendation history disabled");
        return None;
    };

    tracing::info!("Connecting to database...");
    let pool = match PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .min_connections(config.database.min_connections)
        .acquire_timeout(Duration::from_secs(30))
        .connect(url)
        .await
    {
        Ok(pool) => pool,
        Err(e) => {
            tracing::warn!("Database unreachable, recommendation history disabled: {}", e);
            return None;
        }
    };
    tracing::info!("Database connection established");

    tracing::info!("Running database migrations...");
    if let Err(e) = sqlx::migrate!("./migrations").run(&pool).await {
        tracing::warn!("Migrations failed, recommendation history disabled: {}", e);
        return None;
    }
    tracing::info!("Migrations completed");

    Some(pool)
}

/// Create the application router with all routes and middleware
fn create_app(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(root))
        .route("/health", get(handlers::health_check))
        .nest("/api/v1", routes::api_routes(state.clone()))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Root endpoint
async fn root() -> &'static str {
    "Cocoon Price Advisor API v1.0"
}
