//! Upstream repository URLs

/// Module library repository cloned by `nskit setup`
pub const CLOSURE_LIBRARY: &str = "https://github.com/google/closure-library.git";
