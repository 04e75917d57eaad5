//! Application layer orchestrating domain logic and infrastructure.

pub mod apply;
pub mod capture;
pub mod extract;
pub mod prompt;
pub mod render;
pub mod request;
pub mod selection;
pub mod session;
