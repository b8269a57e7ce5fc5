//! Infrastructure layer
//!
//! Handles all I/O operations: filesystem and external processes.
//! Collaborators (library fetch, compiler) sit behind traits so the
//! orchestrator can be driven by fakes in tests.

pub mod compiler;
pub mod filesystem;
pub mod git;
pub mod interrupt;
