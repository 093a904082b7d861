//! Checklist-item instance handlers

use super::{actor_from, required};
use crate::api::rest::state::AppState;
use crate::error::ApiResult;
use axum::{
    extract::{Path, Query, State},
    http::HeaderMap,
    Json,
};
use govflow_engine::ChecklistListing;
use govflow_types::{
    ChecklistItemInstance, ChecklistItemInstanceId, ChecklistItemInstancePatch,
    StatusChangeRecord, StatusUpdate, WorkflowInstanceId,
};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct ChecklistInstanceQuery {
    pub workflow_instance_id: Option<String>,
}

/// Items of a workflow instance in dependency order
pub async fn list_checklist_item_instances(
    State(state): State<AppState>,
    Query(query): Query<ChecklistInstanceQuery>,
) -> ApiResult<Json<ChecklistListing>> {
    let workflow_id =
        WorkflowInstanceId::parse(required(&query.workflow_instance_id, "workflow_instance_id")?)?;
    Ok(Json(
        state.service.list_checklist_item_instances(&workflow_id).await?,
    ))
}

pub async fn get_checklist_item_instance(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<ChecklistItemInstance>> {
    let id = ChecklistItemInstanceId::parse(&id)?;
    Ok(Json(state.service.get_checklist_item_instance(&id).await?))
}

/// Patch an item; the actor comes from the `x-actor-id` header
pub async fn update_checklist_item_instance(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
    Json(patch): Json<ChecklistItemInstancePatch>,
) -> ApiResult<Json<ChecklistItemInstance>> {
    let id = ChecklistItemInstanceId::parse(&id)?;
    let actor = actor_from(&headers);
    Ok(Json(
        state
            .service
            .update_checklist_item_instance(&id, patch, &actor)
            .await?,
    ))
}

/// Status transition; completion requires every prerequisite complete
pub async fn update_checklist_item_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
    Json(update): Json<StatusUpdate>,
) -> ApiResult<Json<ChecklistItemInstance>> {
    let id = ChecklistItemInstanceId::parse(&id)?;
    let actor = actor_from(&headers);
    Ok(Json(
        state
            .service
            .update_checklist_item_status(&id, update.status, &actor)
            .await?,
    ))
}

pub async fn list_status_history(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Vec<StatusChangeRecord>>> {
    let id = ChecklistItemInstanceId::parse(&id)?;
    Ok(Json(state.service.list_status_history(&id).await?))
}
