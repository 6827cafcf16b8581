//! # Follow Up
//!
//! This crate finds the subscribers who did not open a campaign, collects them
//! into a new list and prepares an unsent follow-up campaign for that list.

/// Paged retrieval of subscribers without a view record
mod unopened;
pub use unopened::*;

/// Orchestration of a follow-up run
mod service;
pub use service::*;

#[cfg(test)]
mod test_support;
