//! Plain-text rendering of the form's output region.

use std::fmt::Write as _;

use formula_tutor::kernel::{Block, EMPTY_PROMPT_MESSAGE, LOADING_MESSAGE, View};
use formula_tutor::primitives::GradeLevel;

/// Renders `view` as terminal text.
pub fn view(view: &View) -> String {
    match view {
        View::Loading => format!("⏳ {LOADING_MESSAGE}\n"),
        View::Error(message) => format!("[오류] {message}\n"),
        View::Result(blocks) => {
            let mut out = String::new();
            for block in blocks {
                match block {
                    Block::Heading(text) => {
                        let _ = writeln!(out, "\n== {text} ==");
                    }
                    Block::Code(text) => {
                        let _ = writeln!(out, "    {text}");
                    }
                    Block::Paragraph(text) => {
                        let _ = writeln!(out, "{text}");
                    }
                }
            }
            out
        }
        View::Prompt => format!("{EMPTY_PROMPT_MESSAGE}\n"),
    }
}

/// Lists grade labels, marking the selected one.
pub fn grades(selected: GradeLevel) -> String {
    GradeLevel::ALL
        .iter()
        .map(|grade| {
            if *grade == selected {
                format!("[{grade}]")
            } else {
                grade.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
