//! Guards for generated output: secret detection and path policy.
//!
//! Both guards take their configuration at construction and never change it.

pub mod paths;
pub mod secrets;

pub use paths::{IGNORE_FILE, PathGuard, PathPolicy, has_path_traversal};
pub use secrets::{SecretFinding, SecretGuard, SecretPattern, truncate_value};
