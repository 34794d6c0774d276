//! JSON output for resolved projects.
//!
//! Dumps let users inspect what a spec resolved to after includes,
//! templates and platform fan-out.

mod project_json;

pub use project_json::*;
