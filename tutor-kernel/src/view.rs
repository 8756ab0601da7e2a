//! View selection and line classification for analysis results.

use crate::controller::FormState;

/// Shown while a request is outstanding.
pub const LOADING_MESSAGE: &str = "AI가 공식을 분석하고 있습니다...";

/// Shown before anything has been submitted.
pub const EMPTY_PROMPT_MESSAGE: &str = "궁금한 수학 공식을 입력하고 AI 분석을 시작하세요!";

const HEADING_MARKER: &str = "### ";
const CODE_DELIMITER: char = '`';

/// One display line of an analysis result.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Block {
    /// Section heading, marker stripped.
    Heading(String),
    /// Backtick-wrapped line, delimiters stripped.
    Code(String),
    /// Anything else, unchanged.
    Paragraph(String),
}

/// What the output region shows.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum View {
    /// A request is outstanding.
    Loading,
    /// An error message.
    Error(String),
    /// The classified lines of a result.
    Result(Vec<Block>),
    /// Nothing submitted yet; show [`EMPTY_PROMPT_MESSAGE`].
    Prompt,
}

/// Classifies a single line.
///
/// ```
/// use tutor_kernel::{Block, classify_line};
///
/// assert_eq!(classify_line("`a^2+b^2=c^2`"), Block::Code("a^2+b^2=c^2".to_owned()));
/// ```
#[must_use]
pub fn classify_line(line: &str) -> Block {
    if let Some(heading) = line.strip_prefix(HEADING_MARKER) {
        return Block::Heading(heading.to_owned());
    }

    if line.starts_with(CODE_DELIMITER) && line.ends_with(CODE_DELIMITER) {
        // A lone backtick both opens and closes, leaving nothing inside.
        let inner = if line.len() >= 2 {
            &line[1..line.len() - 1]
        } else {
            ""
        };
        return Block::Code(inner.to_owned());
    }

    Block::Paragraph(line.to_owned())
}

/// Splits `text` on `\n` and classifies each line.
#[must_use]
pub fn render_blocks(text: &str) -> Vec<Block> {
    text.split('\n').map(classify_line).collect()
}

/// Picks the view for `state`: loading, then error, then result, then prompt.
#[must_use]
pub fn select_view(state: &FormState) -> View {
    if state.loading {
        return View::Loading;
    }
    if let Some(error) = state.error.as_deref().filter(|error| !error.is_empty()) {
        return View::Error(error.to_owned());
    }
    if !state.result.is_empty() {
        return View::Result(render_blocks(&state.result));
    }
    View::Prompt
}

#[cfg(test)]
mod tests {
    use tutor_primitives::GradeLevel;

    use super::*;

    fn state() -> FormState {
        FormState::new(GradeLevel::default())
    }

    #[test]
    fn heading_marker_is_stripped() {
        assert_eq!(
            classify_line("### 📝 공식 이름"),
            Block::Heading("📝 공식 이름".to_owned())
        );
        assert_eq!(
            classify_line("###no space"),
            Block::Paragraph("###no space".to_owned())
        );
    }

    #[test]
    fn code_strips_exactly_one_delimiter_each_side() {
        assert_eq!(classify_line("``x``"), Block::Code("`x`".to_owned()));
        assert_eq!(classify_line("`"), Block::Code(String::new()));
        assert_eq!(classify_line("``"), Block::Code(String::new()));
        assert_eq!(
            classify_line("`open only"),
            Block::Paragraph("`open only".to_owned())
        );
    }

    #[test]
    fn plain_lines_are_unchanged() {
        for line in ["", "  indented", "피타고라스의 정리", "a `b` c"] {
            assert_eq!(classify_line(line), Block::Paragraph(line.to_owned()));
        }
    }

    #[test]
    fn classification_is_idempotent_for_paragraphs() {
        let line = "just text";
        let Block::Paragraph(once) = classify_line(line) else {
            panic!("expected paragraph");
        };
        assert_eq!(classify_line(&once), Block::Paragraph(line.to_owned()));
    }

    #[test]
    fn result_lines_are_classified_independently() {
        assert_eq!(
            render_blocks("### 📝 공식 이름\nPythagorean"),
            vec![
                Block::Heading("📝 공식 이름".to_owned()),
                Block::Paragraph("Pythagorean".to_owned()),
            ]
        );
        assert_eq!(render_blocks("a\n\nb").len(), 3);
    }

    #[test]
    fn loading_overrides_everything() {
        let mut state = state();
        state.loading = true;
        state.error = Some("boom".to_owned());
        state.result = "text".to_owned();
        assert_eq!(select_view(&state), View::Loading);
    }

    #[test]
    fn error_overrides_result() {
        let mut state = state();
        state.error = Some("boom".to_owned());
        state.result = "text".to_owned();
        assert_eq!(select_view(&state), View::Error("boom".to_owned()));
    }

    #[test]
    fn empty_state_shows_prompt() {
        assert_eq!(select_view(&state()), View::Prompt);

        let mut state = state();
        state.error = Some(String::new());
        assert_eq!(select_view(&state), View::Prompt);
    }
}
