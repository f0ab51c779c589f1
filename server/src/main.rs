#![recursion_limit = "256"]

mod config;
mod routes;
mod state;

use std::net::SocketAddr;

#[tokio::main]
async fn main() {
    if let Err(e) = dotenvy::dotenv() {
        if !e.not_found() {
            eprintln!("failed to read .env: {e}");
        }
    }
    tracing_subscriber::fmt::init();

    let config = config::ServerConfig::from_env().expect("invalid server configuration");
    let addr = config.socket_addr();
    tracing::info!(api_base_url = %config.api_base_url, max_body_bytes = config.max_body_bytes, "forwarding API requests");

    let state = state::AppState::new(config).expect("http client init failed");
    let app = routes::leptos_app(state).expect("leptos app init failed");

    let listener = tokio::net::TcpListener::bind(addr).await.expect("failed to bind");
    tracing::info!(%addr, "satdash listening");
    axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>())
        .await
        .expect("server failed");
}
