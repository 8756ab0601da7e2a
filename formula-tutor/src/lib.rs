//! AI math formula tutor facade.
//!
//! Bundles the workspace crates behind feature flags so embedders can pull in
//! only the pieces they need (for example, just [`prompts`] and [`adapters`]).

#![warn(missing_docs, clippy::pedantic)]

/// Re-export shared primitives for convenience.
pub use tutor_primitives as primitives;

/// Composer, controller, and view selection (enabled by `kernel` feature).
#[cfg(feature = "kernel")]
pub use tutor_kernel as kernel;

/// Generative-text service adapters (enabled by `adapters` feature).
#[cfg(feature = "adapters")]
pub use tutor_adapters as adapters;

/// Prompt templates (enabled by `prompts` feature).
#[cfg(feature = "prompts")]
pub use tutor_prompts as prompts;

/// Settings and credential sources (enabled by `config` feature).
#[cfg(feature = "config")]
pub use tutor_config as config;

/// Tracing setup (enabled by `telemetry` feature).
#[cfg(feature = "telemetry")]
pub use tutor_telemetry as telemetry;
