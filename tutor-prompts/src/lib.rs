//! Prompt composition for formula analysis.
//!
//! [`template`] provides generic `{{variable}}` substitution; [`analysis`] holds
//! the fixed instruction sent to the generative-text service.

#![warn(missing_docs, clippy::pedantic)]

pub mod analysis;
pub mod template;

pub use analysis::{ANALYSIS_SECTIONS, formula_analysis_prompt, formula_analysis_template};
pub use template::{PromptTemplate, TemplateBuilder, TemplateError, TemplateResult};
