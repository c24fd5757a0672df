mod api;
mod config;
mod function;
mod routes;
mod state;
mod store;

use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let dotenv = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    if let Err(e) = dotenv {
        tracing::debug!(error = %e, "no .env file loaded");
    }

    let config = match config::ServerConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "invalid server configuration");
            std::process::exit(1);
        }
    };

    let addr = config.socket_addr();
    let function_base_path = config.function_base_path.clone();
    let state = state::AppState::in_memory(config);

    let app = routes::app(state);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("failed to bind");

    tracing::info!(%addr, %function_base_path, "design extractor api listening");
    axum::serve(listener, app).await.expect("server failed");
}
