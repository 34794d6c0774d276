//! Application use cases.

mod spec_loader;

pub use spec_loader::*;
