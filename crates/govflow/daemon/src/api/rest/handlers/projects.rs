//! Project handlers

use crate::api::rest::state::AppState;
use crate::error::ApiResult;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use govflow_engine::ProjectChecklist;
use govflow_types::{NewProject, Project, ProjectId, ProjectPatch, ProjectWithWorkflows};

/// List all projects
pub async fn list_projects(State(state): State<AppState>) -> ApiResult<Json<Vec<Project>>> {
    Ok(Json(state.service.list_projects().await?))
}

/// Get a project
pub async fn get_project(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Project>> {
    let id = ProjectId::parse(&id)?;
    Ok(Json(state.service.get_project(&id).await?))
}

/// Create a project and instantiate its selected workflows
pub async fn create_project(
    State(state): State<AppState>,
    Json(request): Json<NewProject>,
) -> ApiResult<(StatusCode, Json<ProjectWithWorkflows>)> {
    let created = state.service.create_project(request).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Update a project
pub async fn update_project(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(patch): Json<ProjectPatch>,
) -> ApiResult<Json<Project>> {
    let id = ProjectId::parse(&id)?;
    Ok(Json(state.service.update_project(&id, patch).await?))
}

/// Delete a project with its instances
pub async fn delete_project(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    let id = ProjectId::parse(&id)?;
    state.service.delete_project(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Every checklist item of a project, grouped by workflow and bucket
pub async fn project_checklist(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<ProjectChecklist>> {
    let id = ProjectId::parse(&id)?;
    Ok(Json(state.service.project_checklist(&id).await?))
}
