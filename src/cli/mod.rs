//! CLI command handlers
//!
//! This module contains the implementation of CLI commands,
//! bridging the clap argument parsing with the report pipeline.

pub mod report;

pub use report::{
    handle_auth, handle_config, handle_generate, handle_init, handle_summary, ReportArgs,
};
