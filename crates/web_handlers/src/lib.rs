//! # Web Handlers for the Follow-up Service
//!
//! This crate provides the web handlers that trigger follow-up runs and report
//! service status.

/// Handler that runs the follow-up workflow for a campaign
mod follow_up_handlers;
pub use follow_up_handlers::*;

/// Unauthenticated diagnostic status handler
mod status_handlers;
pub use status_handlers::*;
