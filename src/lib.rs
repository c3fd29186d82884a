//! Concourse pipeline health summaries.
//!
//! Pipelines and jobs fetched from Concourse hosts are folded into one
//! [`summary::SummaryRecord`] per pipeline group, sorted for display and
//! optionally filtered by per-host membership rules.

pub mod auth;
pub mod cli;
pub mod config;
pub mod error;
pub mod output;
pub mod providers;
pub mod summary;
