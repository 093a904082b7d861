//! Workflow instance handlers

use super::required;
use crate::api::rest::state::AppState;
use crate::error::ApiResult;
use axum::{
    extract::{Path, Query, State},
    Json,
};
use govflow_engine::WorkflowInstanceProgress;
use govflow_types::{ProjectId, WorkflowInstance, WorkflowInstanceId, WorkflowInstancePatch};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct WorkflowInstanceQuery {
    pub project_id: Option<String>,
}

/// Workflow instances of a project, most advanced first
pub async fn list_workflow_instances(
    State(state): State<AppState>,
    Query(query): Query<WorkflowInstanceQuery>,
) -> ApiResult<Json<Vec<WorkflowInstanceProgress>>> {
    let project_id = ProjectId::parse(required(&query.project_id, "project_id")?)?;
    Ok(Json(state.service.list_workflow_instances(&project_id).await?))
}

pub async fn get_workflow_instance(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<WorkflowInstance>> {
    let id = WorkflowInstanceId::parse(&id)?;
    Ok(Json(state.service.get_workflow_instance(&id).await?))
}

pub async fn update_workflow_instance(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(patch): Json<WorkflowInstancePatch>,
) -> ApiResult<Json<WorkflowInstance>> {
    let id = WorkflowInstanceId::parse(&id)?;
    Ok(Json(state.service.update_workflow_instance(&id, patch).await?))
}
