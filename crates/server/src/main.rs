use std::sync::Arc;

use axum::{routing::get, Router};
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};

mod config;
mod meshes;
mod routes;

use config::ServerConfig;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ServerConfig>,
}

fn app(state: AppState) -> Router {
    let data = ServeDir::new(&state.config.data_dir);
    let web = ServeDir::new(&state.config.web_dir);

    Router::new()
        .route("/api/health", get(routes::health))
        .route("/api/meshes", get(routes::list_meshes))
        .route("/api/meshes/{file}", get(routes::mesh_summary))
        .nest_service("/data", data)
        .fallback_service(web)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "meshviewer_server=info,tower_http=info".into()),
        )
        .init();

    let config = match ServerConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Configuration error: {e}");
            std::process::exit(2);
        }
    };
    let addr = config.addr;
    tracing::info!(
        "Serving meshes from {} and page from {}",
        config.data_dir.display(),
        config.web_dir.display()
    );

    let state = AppState {
        config: Arc::new(config),
    };

    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!("Failed to bind {addr}: {e}");
            std::process::exit(1);
        }
    };
    tracing::info!("Server running on http://{addr}");
    if let Err(e) = axum::serve(listener, app(state)).await {
        tracing::error!("Server error: {e}");
    }
}
