//! Checklist-item template handlers

use crate::api::rest::state::AppState;
use crate::error::ApiResult;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use govflow_types::{
    ChecklistItemTemplate, ChecklistItemTemplateId, ChecklistItemTemplatePatch,
    NewChecklistItemTemplate, WorkflowTemplateId,
};
use serde::Deserialize;

/// Checklist-item template listing filter
#[derive(Debug, Deserialize)]
pub struct ChecklistTemplateQuery {
    pub workflow_template_id: Option<String>,
}

pub async fn list_checklist_item_templates(
    State(state): State<AppState>,
    Query(query): Query<ChecklistTemplateQuery>,
) -> ApiResult<Json<Vec<ChecklistItemTemplate>>> {
    let workflow_id = query
        .workflow_template_id
        .as_deref()
        .map(WorkflowTemplateId::parse)
        .transpose()?;
    let templates = state
        .service
        .list_checklist_item_templates(workflow_id.as_ref())
        .await?;
    Ok(Json(templates))
}

pub async fn get_checklist_item_template(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<ChecklistItemTemplate>> {
    let id = ChecklistItemTemplateId::parse(&id)?;
    Ok(Json(state.service.get_checklist_item_template(&id).await?))
}

pub async fn create_checklist_item_template(
    State(state): State<AppState>,
    Json(request): Json<NewChecklistItemTemplate>,
) -> ApiResult<(StatusCode, Json<ChecklistItemTemplate>)> {
    let template = state.service.create_checklist_item_template(request).await?;
    Ok((StatusCode::CREATED, Json(template)))
}

pub async fn update_checklist_item_template(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(patch): Json<ChecklistItemTemplatePatch>,
) -> ApiResult<Json<ChecklistItemTemplate>> {
    let id = ChecklistItemTemplateId::parse(&id)?;
    Ok(Json(
        state.service.update_checklist_item_template(&id, patch).await?,
    ))
}

pub async fn delete_checklist_item_template(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    let id = ChecklistItemTemplateId::parse(&id)?;
    state.service.delete_checklist_item_template(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}
