//! # Mangaport Core
//!
//! Outbound side of the Mangaport reader backend.
//!
//! ## Layout
//!
//! ```text
//! mangaport-core/src/
//! ├── gateway/          # query encoding, page limiter, provider egress, proxy route
//! │   ├── query.rs
//! │   ├── rate_limit/   # fixed-window limiter + injectable clock
//! │   └── upstream/     # request execution and error normalization
//! ├── providers/        # typed MangaDex / Kitsu calls
//! └── modules/          # config loading, logging, reconciliation, chapters, pages
//! ```
//!
//! Every provider call goes through [`gateway::Gateway`]; nothing else in the
//! workspace talks to MangaDex or Kitsu directly.

#![allow(
    clippy::module_name_repetitions,
    reason = "Gateway types are re-exported at the crate root"
)]
#![allow(
    clippy::redundant_else,
    reason = "Explicit else blocks improve readability in complex control flow"
)]
#![allow(clippy::implicit_clone, reason = "Explicit .clone() vs .to_string() is stylistic")]
// Test-only lints: allow panic!, float comparisons, etc. in test code
#![cfg_attr(
    test,
    allow(
        clippy::panic,
        clippy::print_stdout,
        clippy::float_cmp,
        clippy::assertions_on_result_states
    )
)]

pub mod error;
pub mod gateway;
pub mod modules;
pub mod providers;

// Re-export commonly used types
pub use error::{AppError, AppResult};
pub use gateway::{Gateway, GatewayMethod, GatewayRequest, GatewayResponse, QueryParams};
pub use modules::reconcile::{ReconciledManga, Reconciler};
pub use providers::{KitsuClient, MangaDexClient};
