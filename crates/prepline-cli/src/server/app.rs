//! Axum application setup.

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};

use super::handlers;
use super::state::AppState;

/// Create the Axum router with all routes.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_routes = Router::new()
        .route("/health", get(handlers::health))
        .route("/pipeline", post(handlers::run_pipeline))
        .route("/clean", post(handlers::clean_table))
        .route("/transform", post(handlers::transform_table));

    Router::new()
        .route("/", get(handlers::root))
        // Path used by earlier clients of the service.
        .route("/run-pipeline", post(handlers::run_pipeline))
        .nest("/api", api_routes)
        .layer(cors)
        .with_state(state)
}

/// Start the web server.
pub async fn run_server(
    state: AppState,
    host: &str,
    port: u16,
) -> Result<(), Box<dyn std::error::Error>> {
    let app = create_router(state);
    let listener = tokio::net::TcpListener::bind((host, port)).await?;

    tracing::info!(addr = %listener.local_addr()?, "Server listening");
    println!("Server listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app).await?;
    Ok(())
}
