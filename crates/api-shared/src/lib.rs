//! # API Shared
//!
//! Shared utilities and definitions for the discovery APIs.
//!
//! Contains:
//! - Wire types for the generation, export and preview endpoints (`wire` module)
//! - Shared services like `HealthService`
//!
//! Used by `discovery-core`, `api-rest` and the CLI so the JSON shapes are defined once.

pub mod health;
pub mod wire;

pub use health::HealthService;
pub use wire::*;
