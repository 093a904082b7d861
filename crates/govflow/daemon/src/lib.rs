//! Govflow Daemon library
//!
//! This module provides the core components for the Govflow daemon:
//! - REST API handlers
//! - Layered configuration
//! - Server lifecycle management

pub mod api;
pub mod config;
pub mod error;
pub mod server;

pub use api::create_router;
pub use config::DaemonConfig;
pub use error::{ApiError, ApiResult, DaemonError, DaemonResult};
pub use server::Server;
