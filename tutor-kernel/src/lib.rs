//! Form state machine and request lifecycle for the formula tutor.
//!
//! [`Composer`] turns a grade and formula into one call against a
//! [`TextGenerator`](tutor_adapters::traits::TextGenerator). [`Controller`] owns
//! the form state, validates input, drives the composer, and publishes every
//! transition over a `tokio::sync::watch` channel. [`view`] maps a state snapshot
//! to what a front end should draw.

#![warn(missing_docs, clippy::pedantic)]

mod composer;
mod controller;
mod phase;
pub mod view;

pub use composer::{Composer, ComposerError, ComposerResult, UNKNOWN_FAILURE_MESSAGE};
pub use controller::{
    ANALYSIS_FAILURE_MESSAGE, Controller, EMPTY_FORMULA_MESSAGE, FormState, SubmitOutcome,
};
pub use phase::{Phase, PhaseError, PhaseEvent, PhaseResult};
pub use view::{
    Block, EMPTY_PROMPT_MESSAGE, LOADING_MESSAGE, View, classify_line, render_blocks, select_view,
};
