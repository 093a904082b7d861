//! API Router configuration

use super::handlers;
use super::state::AppState;
use crate::config::ServerConfig;
use axum::{
    routing::{get, put},
    Router,
};
use std::time::Duration;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

/// Create the main API router
pub fn create_router(state: AppState, config: &ServerConfig) -> Router {
    let api_routes = Router::new()
        // Health
        .route("/health", get(handlers::health_check))
        // Governance templates
        .route(
            "/governance-templates",
            get(handlers::list_governance_templates).post(handlers::create_governance_template),
        )
        .route(
            "/governance-templates/:id",
            get(handlers::get_governance_template)
                .put(handlers::update_governance_template)
                .delete(handlers::delete_governance_template),
        )
        // Workflow templates
        .route(
            "/workflow-templates",
            get(handlers::list_workflow_templates).post(handlers::create_workflow_template),
        )
        .route(
            "/workflow-templates/:id",
            get(handlers::get_workflow_template)
                .put(handlers::update_workflow_template)
                .delete(handlers::delete_workflow_template),
        )
        // Checklist-item templates
        .route(
            "/checklist-item-templates",
            get(handlers::list_checklist_item_templates)
                .post(handlers::create_checklist_item_template),
        )
        .route(
            "/checklist-item-templates/:id",
            get(handlers::get_checklist_item_template)
                .put(handlers::update_checklist_item_template)
                .delete(handlers::delete_checklist_item_template),
        )
        // Projects
        .route(
            "/projects",
            get(handlers::list_projects).post(handlers::create_project),
        )
        .route(
            "/projects/:id",
            get(handlers::get_project)
                .put(handlers::update_project)
                .delete(handlers::delete_project),
        )
        .route("/projects/:id/checklist", get(handlers::project_checklist))
        // Workflow instances
        .route("/workflow-instances", get(handlers::list_workflow_instances))
        .route(
            "/workflow-instances/:id",
            get(handlers::get_workflow_instance).put(handlers::update_workflow_instance),
        )
        // Checklist-item instances
        .route(
            "/checklist-item-instances",
            get(handlers::list_checklist_item_instances),
        )
        .route(
            "/checklist-item-instances/:id",
            get(handlers::get_checklist_item_instance).put(handlers::update_checklist_item_instance),
        )
        .route(
            "/checklist-item-instances/:id/status",
            put(handlers::update_checklist_item_status),
        )
        .route(
            "/checklist-item-instances/:id/history",
            get(handlers::list_status_history),
        );

    // Build router with middleware
    let router = Router::new()
        .nest("/api/v1", api_routes)
        .layer(RequestBodyLimitLayer::new(config.max_body_size))
        .layer(TimeoutLayer::new(Duration::from_secs(config.request_timeout_secs)))
        .layer(TraceLayer::new_for_http());

    let router = if config.enable_cors {
        router.layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
    } else {
        router
    };

    router.with_state(state)
}
