//! Governance template handlers

use crate::api::rest::state::AppState;
use crate::error::ApiResult;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use govflow_types::{
    GovernanceTemplate, GovernanceTemplateId, GovernanceTemplateOverview, GovernanceTemplatePatch,
    NewGovernanceTemplate,
};

/// List governance templates with their workflow templates
pub async fn list_governance_templates(
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<GovernanceTemplateOverview>>> {
    let templates = state.service.list_governance_templates().await?;
    Ok(Json(templates))
}

/// Get a governance template
pub async fn get_governance_template(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<GovernanceTemplate>> {
    let id = GovernanceTemplateId::parse(&id)?;
    let template = state.service.get_governance_template(&id).await?;
    Ok(Json(template))
}

/// Create a governance template
pub async fn create_governance_template(
    State(state): State<AppState>,
    Json(request): Json<NewGovernanceTemplate>,
) -> ApiResult<(StatusCode, Json<GovernanceTemplate>)> {
    let template = state.service.create_governance_template(request).await?;
    Ok((StatusCode::CREATED, Json(template)))
}

/// Update a governance template
pub async fn update_governance_template(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(patch): Json<GovernanceTemplatePatch>,
) -> ApiResult<Json<GovernanceTemplate>> {
    let id = GovernanceTemplateId::parse(&id)?;
    let template = state.service.update_governance_template(&id, patch).await?;
    Ok(Json(template))
}

/// Delete a governance template and everything it owns
pub async fn delete_governance_template(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    let id = GovernanceTemplateId::parse(&id)?;
    state.service.delete_governance_template(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}
