//! nskit - dependency resolver and build driver for goog.provide/goog.require projects
//!
//! Scans JavaScript sources for namespace declarations, orders them so
//! every file follows the files it depends on, and drives a project
//! through its lifecycle: init, setup, ready, build.
//!
//! # Architecture
//!
//! The crate is organized into several modules:
//!
//! - [`cli`] - Command-line interface parsing and output formatting
//! - [`core`] - Resolution pipeline and lifecycle orchestration
//! - [`infra`] - Infrastructure layer (filesystem, git, compiler process)
//! - [`config`] - Configuration and constants
//! - [`error`] - Error types and handling

pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod infra;

#[cfg(test)]
pub mod test_utils;
