//! Blogsite
//!
//! A single-tenant blog and recipe publishing server with SQLite persistence.

mod api;
mod auth;
mod config;
mod db;
mod errors;
mod models;
mod views;

use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use biscotti::Processor;
use sqlx::SqlitePool;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use config::Config;
use views::Views;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub views: Arc<Views>,
    pub config: Arc<Config>,
    /// Signs and verifies the session cookie
    pub cookies: Arc<Processor>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::from_env()?;

    // Initialize logging
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting blogsite");
    tracing::info!("Database path: {:?}", config.db_path);
    tracing::info!("Bind address: {}", config.bind_addr);

    if config.admin_token.is_empty() {
        tracing::warn!("No admin token configured (ADMIN_TOKEN). Admin login is disabled!");
    }
    if config.secret_key == "dev-secret" {
        tracing::warn!("Using the default SECRET_KEY; session cookies can be forged.");
    }

    // Initialize database and schema
    let pool = db::init_database(&config.db_path).await?;

    let state = AppState {
        pool,
        views: Arc::new(Views::new(&config.base_url)?),
        cookies: Arc::new(auth::cookie_processor(&config.secret_key)),
        config: Arc::new(config.clone()),
    };

    // Build router
    let app = create_router(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("Server listening on {}", config.bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the application router with all routes.
pub fn create_router(state: AppState) -> Router {
    // Admin routes, gated on the session flag
    let admin_routes = Router::new()
        .route("/admin", get(api::dashboard).post(api::submit))
        .route("/admin/edit/{id}", get(api::edit_form).post(api::update))
        .route("/admin/delete/{id}", post(api::delete_post))
        .route("/admin/delete-recipe/{id}", post(api::delete_recipe))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_admin,
        ));

    let public_routes = Router::new()
        .route("/", get(api::index))
        .route("/feed", get(api::feed))
        .route("/home", get(api::feed))
        .route("/post/{id}", get(api::post_detail))
        .route("/recipes", get(api::list_recipes))
        .route("/admin/login", get(api::login_form).post(api::login))
        .route("/admin/logout", post(api::logout))
        .route("/maintenance", get(api::maintenance))
        .route("/maintance", get(api::maintenance));

    // Health check (no storage access)
    let health_routes = Router::new().route("/health", get(health_check));

    Router::new()
        .merge(admin_routes)
        .merge(public_routes)
        .merge(health_routes)
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
        .with_state(state)
}

/// Health check endpoint.
async fn health_check() -> &'static str {
    "OK"
}
