//! Investment simulation and risk profiling.
//!
//! The [`engine`] module holds the pure calculation core: interest strategies dispatched by
//! product type and a rule-based risk scorer. [`advisory`] wires the engines to repositories,
//! request validation and an axum router.

pub mod advisory;
pub mod clock;
pub mod config;
pub mod engine;
pub mod error;
pub mod telemetry;
pub mod usage;
