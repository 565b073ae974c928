mod companies;
mod data;
mod error;
mod pages;

use axum::{
    http::{header, HeaderValue, Method},
    routing::get,
    Json, Router,
};
use std::net::SocketAddr;
use tower_http::cors::CorsLayer;
use vitrine_common::types::ServiceInfo;
use vitrine_config::{init_tracing, AppConfig};
use vitrine_db::company::pg_repository::PgCompanyRepository;
use vitrine_db::sync::pg_repository::PgWatermarkRepository;
use vitrine_ingest::typeform::client::{TypeformClient, TypeformConfig};

#[derive(Clone)]
pub struct AppState {
    pub companies: PgCompanyRepository,
    pub watermarks: PgWatermarkRepository,
    /// None when the form connector env vars are absent; /data then
    /// answers with a configuration error.
    pub typeform: Option<TypeformClient>,
    pub google_site_token: String,
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn info() -> Json<ServiceInfo> {
    Json(ServiceInfo::new("vitrine-api"))
}

fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin([
            "http://localhost:3000".parse::<HeaderValue>().unwrap(),
            "http://127.0.0.1:3000".parse::<HeaderValue>().unwrap(),
        ])
        .allow_methods([Method::GET, Method::PUT])
        .allow_headers([header::CONTENT_TYPE]);

    let verification_path = format!("/google{}.html", state.google_site_token);

    Router::new()
        .route("/health", get(health))
        .route("/info", get(info))
        .route("/data", get(data::run_sync))
        .route(&verification_path, get(pages::site_verification))
        .merge(pages::router())
        .merge(companies::router())
        .fallback(pages::fallback)
        .layer(cors)
        .with_state(state)
}

#[tokio::main]
async fn main() {
    let config = AppConfig::from_env().expect("failed to load config");
    init_tracing(&config.log_level);
    tracing::info!(service = "vitrine-api", "starting");

    let pool = vitrine_db::create_pool(&config.database_url)
        .await
        .expect("failed to create database pool");

    let typeform = match TypeformConfig::from_env() {
        Some(tf_config) => Some(
            TypeformClient::new(tf_config).expect("failed to create typeform client"),
        ),
        None => {
            tracing::info!("no typeform credentials found, /data will be unavailable");
            None
        }
    };

    let state = AppState {
        companies: PgCompanyRepository::new(pool.clone()),
        watermarks: PgWatermarkRepository::new(pool),
        typeform,
        google_site_token: config.google_site_token.clone(),
    };

    let app = build_router(state);
    let addr: SocketAddr = config.bind_addr().parse().expect("invalid bind address");

    tracing::info!(%addr, "listening");
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("failed to bind");
    axum::serve(listener, app).await.expect("server error");
}
