//! Domain logic for the kbflow knowledge review workflow.
//!
//! This crate has no I/O dependencies so it can be used by the repository
//! layer, the API layer, and any future CLI tooling.

pub mod error;
pub mod knowledge;
pub mod pagination;
pub mod types;
pub mod workflow;
