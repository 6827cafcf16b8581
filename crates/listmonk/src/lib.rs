//! # Listmonk
//!
//! This crate provides a client for the Listmonk mailing-list API, covering the
//! campaign, subscriber and list operations used by the follow-up workflow.

/// Wire types for Listmonk requests and responses
mod types;
pub use types::*;

/// Error type shared by every API call
mod error;
pub use error::*;

/// Connection settings loaded from the environment
mod settings;
pub use settings::*;

/// The `ListmonkApi` trait and its HTTP implementation
mod client;
pub use client::*;
