//! Infrastructure adapters for escaping, highlighting, configuration, and logging.

pub mod config;
pub mod escape;
pub mod highlight;
pub mod logging;
