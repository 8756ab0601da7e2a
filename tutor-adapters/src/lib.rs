//! Generative-text service adapters used by the formula tutor.
//!
//! [`traits`] defines the provider-neutral interface; [`gemini`] implements it
//! against the Google Gemini REST API.

#![warn(missing_docs, clippy::pedantic)]

pub mod gemini;
pub mod traits;

mod http_client;
