//! Infrastructure layer - External service implementations

pub mod generator;
pub mod logging;
pub mod observability;
pub mod services;
