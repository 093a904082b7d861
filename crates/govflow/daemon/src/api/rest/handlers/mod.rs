//! API request handlers

mod checklist_instances;
mod checklist_templates;
mod governance_templates;
mod health;
mod projects;
mod workflow_instances;
mod workflow_templates;

pub use checklist_instances::*;
pub use checklist_templates::*;
pub use governance_templates::*;
pub use health::*;
pub use projects::*;
pub use workflow_instances::*;
pub use workflow_templates::*;

use crate::error::{ApiError, ApiResult};
use axum::http::HeaderMap;
use govflow_types::Actor;

/// Header naming who performs a change
pub const ACTOR_HEADER: &str = "x-actor-id";

/// Actor from [`ACTOR_HEADER`], falling back to the system actor
pub(crate) fn actor_from(headers: &HeaderMap) -> Actor {
    headers
        .get(ACTOR_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(Actor::new)
        .unwrap_or_default()
}

/// A query parameter that must be present
pub(crate) fn required<'a>(value: &'a Option<String>, name: &str) -> ApiResult<&'a str> {
    value
        .as_deref()
        .ok_or_else(|| ApiError::BadRequest(format!("{} query parameter is required", name)))
}
