pub mod handlers;
pub mod requests;
pub mod responses;

use axum::routing::{get, put};
use axum::Router;

use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/admin/companies", get(handlers::list_companies))
        .route("/admin/companies/{id}", get(handlers::get_company))
        .route("/admin/companies/{id}/status", put(handlers::update_status))
}
