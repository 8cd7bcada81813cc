mod config;
mod error;
mod handlers;
mod models;
mod notify;
mod services;
mod state;
mod store;
mod validation;

use config::Config;
use notify::Notifier;
use ntex::web;
use ntex_cors::Cors;
use state::AppState;
use std::sync::Arc;
use std::time::Duration;
use store::github::GitHubStore;
use store::DocumentStore;
use tracing::info;

#[ntex::main]
async fn main() -> std::io::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = Arc::new(Config::from_env());
    let bind_addr = format!("{}:{}", config.host, config.port);

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(10))
        .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
        .build()
        .expect("Failed to build HTTP client");

    let store: Arc<dyn DocumentStore> = Arc::new(GitHubStore::new(client.clone(), &config));
    let state = AppState {
        config,
        store,
        notifier: Notifier::new(client),
    };

    info!("Campaign tracker server starting on {}", bind_addr);

    web::HttpServer::new(move || {
        web::App::new()
            .state(state.clone())
            .wrap(
                Cors::new()
                    .allowed_origin("*")
                    .allowed_methods(vec!["GET", "POST", "OPTIONS"])
                    .allowed_headers(vec!["Content-Type"])
                    .max_age(3600)
                    .finish(),
            )
            // Health check
            .route("/api/health", web::get().to(health))
            // Player roster
            .route("/api/players/register", web::post().to(handlers::players::register))
            .route("/api/players/delete", web::post().to(handlers::players::delete))
            // Leaderboard admin
            .route("/api/scores/adjust", web::post().to(handlers::leaderboard::adjust))
            // Game reports
            .route("/api/games/submit", web::post().to(handlers::games::submit))
    })
    .bind(bind_addr)?
    .run()
    .await
}

async fn health() -> web::HttpResponse {
    web::HttpResponse::Ok().json(&serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
