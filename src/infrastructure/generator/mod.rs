//! Upstream answer generator implementations

mod simulated;

pub use simulated::{GeneratorConfig, SimulatedGenerator};
