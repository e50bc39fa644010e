//! Configuration and dependency wiring for the catalog module.

mod dependencies;
mod settings;

pub use dependencies::Dependencies;
pub use settings::{LogFormat, ModuleConfig};
