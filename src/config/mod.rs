//! Configuration module for the expense report generator
//!
//! This module provides configuration management including:
//! - Base directory and artifact path resolution
//! - Report settings persistence

pub mod paths;
pub mod settings;

pub use paths::ReportPaths;
pub use settings::{ChartSettings, Settings};
