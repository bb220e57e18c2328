use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::controllers::{
    article::ArticleController,
    health::{self, ReadyState},
    language,
    podcast::PodcastController,
};
use crate::infrastructure::config::Config;

/// Start the HTTP server with all routes configured
pub async fn start_http_server(
    config: Arc<Config>,
    ready_state: Arc<ReadyState>,
    article_controller: Arc<ArticleController>,
    podcast_controller: Arc<PodcastController>,
) -> Result<(), Box<dyn std::error::Error>> {
    let podcast_routes = Router::new()
        .route("/api/podcasts", post(PodcastController::generate))
        .with_state(podcast_controller);

    let article_routes = Router::new()
        .route("/api/articles/preview", post(ArticleController::preview))
        .with_state(article_controller);

    let language_routes = Router::new().route("/api/languages", get(language::languages));

    let health_routes = Router::new()
        .route("/health", get(health::health))
        .route("/health/ready", get(health::health_ready))
        .with_state(ready_state);

    let app = Router::new()
        .merge(podcast_routes)
        .merge(article_routes)
        .merge(language_routes)
        .merge(health_routes)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("HTTP server listening on {}", addr);

    axum::serve(listener, app).await?;
    Ok(())
}
