// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 BCard Labs

use std::{env, net::SocketAddr};

use tracing_subscriber::EnvFilter;

use bcard_server::{
    api::router,
    auth::TokenService,
    config::{
        DATA_DIR_ENV, DEFAULT_DATA_DIR, DEFAULT_PORT, HOST_ENV, JWT_SECRET_ENV, LOG_FORMAT_ENV,
        PORT_ENV,
    },
    state::AppState,
    storage::{DocumentStore, StoragePaths},
};

#[tokio::main]
async fn main() {
    init_tracing();

    let data_dir = env::var(DATA_DIR_ENV).unwrap_or_else(|_| DEFAULT_DATA_DIR.to_string());
    let mut store = DocumentStore::new(StoragePaths::new(&data_dir));
    store
        .initialize()
        .expect("Failed to initialize document store");

    let secret = env::var(JWT_SECRET_ENV).expect("JWT_SECRET must be set");
    let state = AppState::new(store, TokenService::new(secret.as_bytes()));
    let app = router(state);

    let host = env::var(HOST_ENV).unwrap_or_else(|_| "0.0.0.0".to_string());
    let port: u16 = env::var(PORT_ENV)
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(DEFAULT_PORT);

    let addr: SocketAddr = format!("{host}:{port}")
        .parse()
        .expect("Failed to parse bind address");

    tracing::info!(%addr, data_dir = %data_dir, "directory server listening (docs at /docs)");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server failed");
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug"));

    if env::var(LOG_FORMAT_ENV).as_deref() == Ok("json") {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to install Ctrl+C handler");
    tracing::info!("shutdown signal received");
}
