use server::db::AppState;
use server::store::PgObituaryStore;

#[tokio::main]
async fn main() {
    // Load .env if present; production sets env vars directly.
    let _ = dotenvy::dotenv();
    server::telemetry::init_telemetry();

    server::config::load_app_config();
    let settings = server::config::search_settings();
    server::health::record_start_time();

    let pool = server::db::create_pool();
    server::db::run_migrations(&pool).await;

    let state = AppState::new(PgObituaryStore::new(pool), settings.default_page_size);
    let app = server::openapi::app_router(state);

    let addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("Failed to bind listen address");
    tracing::info!(%addr, "listening");

    axum::serve(listener, app).await.expect("Server error");
}
