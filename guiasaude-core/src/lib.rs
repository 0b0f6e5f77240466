//! Core types and service wiring for the Guia Saúde facility directory.

/// Snapshot cache with TTL, single-flight refresh, and fallback policy.
pub mod cache;
/// Runtime configuration surface and its defaults.
pub mod config;
/// Static hand-curated facility records served when extraction fails.
pub mod fallback;
/// Domain models shared by the provider and the serving layer.
pub mod model;
/// Traits describing the facility-source interface.
pub mod ports;
/// High-level service facade used by the routing layer.
pub mod service;

pub use cache::*;
pub use config::*;
pub use fallback::*;
pub use model::*;
pub use ports::*;
pub use service::*;
