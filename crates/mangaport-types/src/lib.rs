//! # Mangaport Types
//!
//! Core types, models, and error definitions for the Mangaport gateway.
//!
//! - **`error`** - Typed error hierarchy for the gateway and configuration
//! - **`models`** - Provider enum, configuration, MangaDex / Kitsu wire models
//!
//! ## Architecture Role
//!
//! `mangaport-types` sits at the bottom of the dependency graph:
//!
//! ```text
//!              mangaport-types (this crate)
//!                        │
//!                        ▼
//!                 mangaport-core
//!                        │
//!                        ▼
//!                mangaport-server
//! ```
//!
//! Nothing in here performs I/O.

pub mod error;
pub mod models;

// Re-export error types for convenience
pub use error::{ConfigError, GatewayError, GatewayFailure};

// Re-export core model types
pub use models::{GatewayConfig, PageLimitConfig, Provider, ProviderConfig};
