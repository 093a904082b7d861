//! Workflow template handlers

use crate::api::rest::state::AppState;
use crate::error::ApiResult;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use govflow_types::{
    GovernanceTemplateId, NewWorkflowTemplate, WorkflowTemplate, WorkflowTemplateId,
    WorkflowTemplatePatch,
};
use serde::Deserialize;

/// Workflow template listing filter
#[derive(Debug, Deserialize)]
pub struct WorkflowTemplateQuery {
    pub governance_template_id: Option<String>,
}

/// List workflow templates, optionally for one governance template
pub async fn list_workflow_templates(
    State(state): State<AppState>,
    Query(query): Query<WorkflowTemplateQuery>,
) -> ApiResult<Json<Vec<WorkflowTemplate>>> {
    let governance_id = query
        .governance_template_id
        .as_deref()
        .map(GovernanceTemplateId::parse)
        .transpose()?;
    let templates = state
        .service
        .list_workflow_templates(governance_id.as_ref())
        .await?;
    Ok(Json(templates))
}

/// Get a workflow template
pub async fn get_workflow_template(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<WorkflowTemplate>> {
    let id = WorkflowTemplateId::parse(&id)?;
    Ok(Json(state.service.get_workflow_template(&id).await?))
}

/// Create a workflow template at the end of its governance template
pub async fn create_workflow_template(
    State(state): State<AppState>,
    Json(request): Json<NewWorkflowTemplate>,
) -> ApiResult<(StatusCode, Json<WorkflowTemplate>)> {
    let template = state.service.create_workflow_template(request).await?;
    Ok((StatusCode::CREATED, Json(template)))
}

/// Update a workflow template, moving it when `order` is given
pub async fn update_workflow_template(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(patch): Json<WorkflowTemplatePatch>,
) -> ApiResult<Json<WorkflowTemplate>> {
    let id = WorkflowTemplateId::parse(&id)?;
    Ok(Json(state.service.update_workflow_template(&id, patch).await?))
}

/// Delete a workflow template
pub async fn delete_workflow_template(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    let id = WorkflowTemplateId::parse(&id)?;
    state.service.delete_workflow_template(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}
