//! # jira-deploy
//!
//! Tells Jira Cloud which issues went to production and moves the release tag
//! to the deployed commit.

pub mod app;
pub mod cli;
pub mod config;
pub mod deployment;
pub mod error;
pub mod github;
pub mod issues;
pub mod jira;
pub mod logging;
pub mod ui;

// Re-export commonly used types
pub use app::Outcome;
pub use config::Config;
pub use deployment::Deployment;
pub use error::{ApiError, Error, Result};
