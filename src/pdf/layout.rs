//! Word-boundary line wrapping against a column width.
//!
//! Wrapping never splits inside a word: a word wider than the column is
//! emitted alone on its own line rather than hyphenated.

use crate::fonts::FontEntry;

pub(crate) struct WrappedLine {
    pub(crate) text: String,
    pub(crate) width: f32,
}

/// Wrap `text` to `max_width` points at `font_pt`. Whitespace-only input
/// produces no lines.
pub(crate) fn wrap_lines(
    text: &str,
    entry: &FontEntry,
    font_pt: f32,
    max_width: f32,
) -> Vec<WrappedLine> {
    let space_w = entry.space_width(font_pt);
    let mut lines: Vec<WrappedLine> = Vec::new();
    let mut current = String::new();
    let mut current_w = 0.0f32;

    for word in text.split_whitespace() {
        let word_w = entry.text_width(word, font_pt);
        if current.is_empty() {
            current.push_str(word);
            current_w = word_w;
        } else if current_w + space_w + word_w > max_width {
            lines.push(WrappedLine {
                text: std::mem::take(&mut current),
                width: current_w,
            });
            current.push_str(word);
            current_w = word_w;
        } else {
            current.push(' ');
            current.push_str(word);
            current_w += space_w + word_w;
        }
    }

    if !current.is_empty() {
        lines.push(WrappedLine {
            text: current,
            width: current_w,
        });
    }
    lines
}
