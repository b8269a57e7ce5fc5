//! Core business logic module
//!
//! This module contains the resolver pipeline and the lifecycle driver.
//! Side effects go through [`crate::infra`].
//!
//! # Submodules
//!
//! - [`config`] - Project configuration (nskit.toml) parsing
//! - [`extractor`] - provide/require extraction
//! - [`walker`] - Source discovery and parallel scanning
//! - [`graph`] - Symbol table and file dependency graph
//! - [`resolver`] - Topological build plan
//! - [`deps`] - Development dependency manifest rendering
//! - [`stage`] - Lifecycle stage probing
//! - [`init`] - Project initialization logic
//! - [`resources`] - Output tree staging and page rewriting
//! - [`source_map`] - Source map fix-up
//! - [`builder`] - Lifecycle orchestration

pub mod builder;
pub mod config;
pub mod deps;
pub mod extractor;
pub mod graph;
pub mod init;
pub mod resolver;
pub mod resources;
pub mod source_map;
pub mod stage;
pub mod walker;
