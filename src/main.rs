use std::sync::Arc;

use todo_api_rust::database::clock::SystemClock;
use todo_api_rust::{app, config, database, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt::init();

    let config = config::config();

    let pool = database::connect(&config.database_url).await?;
    database::init_schema(&pool).await?;

    let state = AppState::new(pool, Arc::new(SystemClock));
    let app = app(state);

    let bind_addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!("todo API listening on http://{bind_addr}");

    axum::serve(listener, app).await?;
    Ok(())
}
