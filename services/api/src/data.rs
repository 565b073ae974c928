use axum::extract::State;
use axum::Json;
use vitrine_common::error::VitrineError;
use vitrine_ingest::sync::DirectorySyncer;
use vitrine_ingest::typeform::models::FormResponse;

use crate::error::ApiError;
use crate::AppState;

/// Pulls new form responses on demand and answers with the raw fetched
/// records, mirroring what went into the directory.
pub async fn run_sync(
    State(state): State<AppState>,
) -> Result<Json<Vec<FormResponse>>, ApiError> {
    let client = state.typeform.clone().ok_or_else(|| {
        ApiError(VitrineError::Config(
            "form connector is not configured".to_string(),
        ))
    })?;

    let syncer = DirectorySyncer::new(client, state.companies.clone(), state.watermarks.clone());
    let report = syncer
        .synchronize()
        .await
        .map_err(VitrineError::from)?;

    tracing::info!(
        fetched = report.fetched.len(),
        inserted = report.inserted,
        new_since = ?report.new_since,
        raced = report.raced,
        "on-demand sync completed"
    );

    Ok(Json(report.fetched))
}
