use std::str::FromStr;

use axum::extract::{Path, Query, State};
use axum::Json;
use uuid::Uuid;
use vitrine_common::error::VitrineError;
use vitrine_db::company::models::{CompanyFilter, CompanyStatus};
use vitrine_db::company::repositories::CompanyRepository;

use crate::companies::requests::UpdateStatusRequest;
use crate::companies::responses::{CompanyResponse, ListCompaniesResponse};
use crate::error::ApiError;
use crate::AppState;

pub async fn list_companies(
    State(state): State<AppState>,
    Query(filter): Query<CompanyFilter>,
) -> Result<Json<ListCompaniesResponse>, ApiError> {
    let companies = state.companies.list(filter).await?;
    let data: Vec<CompanyResponse> = companies.into_iter().map(Into::into).collect();
    let count = data.len();
    Ok(Json(ListCompaniesResponse { data, count }))
}

pub async fn get_company(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<CompanyResponse>, ApiError> {
    let company = state
        .companies
        .get_by_id(id)
        .await?
        .ok_or_else(|| ApiError(VitrineError::NotFound(format!("company not found: {id}"))))?;
    Ok(Json(company.into()))
}

pub async fn update_status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateStatusRequest>,
) -> Result<Json<CompanyResponse>, ApiError> {
    let status = CompanyStatus::from_str(&body.status)
        .map_err(VitrineError::Validation)?;

    let updated = state.companies.set_status(id, status).await?;
    tracing::info!(company_id = %id, status = status.as_str(), "company status updated");
    Ok(Json(updated.into()))
}
