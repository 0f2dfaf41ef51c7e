//! Hierarchical node browser backed by a remote tree API.
//!
//! The [`application::services::TreeStore`] owns all client-side state and
//! mediates every request; the CLI is one consumer of it.

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;
