// src/main.rs
mod auth;
mod config;
mod db;
mod error;
mod google;
mod handlers;
mod messages;
mod models;
mod polls;
mod routes;
mod state;
mod users;

use std::net::SocketAddr;

use dotenvy::dotenv;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::Config;
use crate::state::AppState;

#[tokio::main]
async fn main() {
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::load();

    let pool = db::create_pool(&config.database_url)
        .await
        .expect("failed to connect to the database");
    db::init_schema(&pool).await.expect("failed to create tables");
    info!("database ready");

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let app = routes::create_router(AppState::new(pool, config));

    info!("listening on {addr}");
    axum_server::bind(addr)
        .serve(app.into_make_service())
        .await
        .expect("server error");
}
