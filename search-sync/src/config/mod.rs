//! Configuration and dependency wiring for the search sync pipeline.

mod dependencies;

pub use dependencies::{ConnectionMode, Dependencies};
