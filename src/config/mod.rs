//! Configuration constants
//!
//! - [`defaults`] - Default file names, directories and build options
//! - [`urls`] - Upstream repository URLs

pub mod defaults;
pub mod urls;
