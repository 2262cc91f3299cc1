use std::sync::Arc;

use anyhow::Context;
use axum::{Router, middleware};
use tower_http::trace::TraceLayer;

use finance_tracker::{
    auth::jwt::TokenIssuer,
    config::AppConfig,
    db::connection,
    logging::init_tracing,
    middleware::{catch_panic_layer, json_error_middleware},
    routes::router,
    state::AppState,
};

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        tracing::error!("server failed: {err:?}");
        eprintln!("server failed: {err:?}");
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let cfg = AppConfig::from_env().context("failed to load config")?;
    init_tracing(&cfg.logging);

    let db = connection::connect(cfg.database()?).await?;
    let tokens = TokenIssuer::from_config(cfg.auth()?);
    let state = AppState::new(cfg, db, tokens);

    let app = Router::new()
        .merge(router(Arc::clone(&state)))
        .layer(middleware::from_fn(json_error_middleware))
        .layer(catch_panic_layer())
        .layer(TraceLayer::new_for_http());

    let addr = state.config.server.bind_addr()?;
    tracing::info!(%addr, "finance tracker listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
