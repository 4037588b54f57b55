//! Text measurement and line breaking.
//!
//! Measurement goes through the [`MeasureSurface`] trait so the
//! renderer core stays independent of the concrete text stack; the
//! process-wide implementation lives in [`crate::fonts`].
//!
//! Line breaking: the value splits on `\n` into hard lines; with
//! wrapping enabled each hard line is tokenised so that every
//! whitespace run or other non-word character ends its token, then
//! tokens fill soft lines greedily. A single token wider than the
//! available width is broken character by character rather than
//! discarded.

/// A surface that can measure rendered text width for a font string.
pub trait MeasureSurface {
    /// Width in device pixels of `text` rendered with `font`.
    fn measure_text_width(&mut self, font: &str, text: &str) -> f32;
}

/// Split a line into tokens, keeping each non-word character (including
/// whitespace) attached to the end of the preceding token.
fn tokenize(line: &str) -> Vec<&str> {
    let mut tokens = Vec::new();
    let mut start = 0;
    for (i, ch) in line.char_indices() {
        if !(ch.is_ascii_alphanumeric() || ch == '_') {
            let end = i + ch.len_utf8();
            tokens.push(&line[start..end]);
            start = end;
        }
    }
    if start < line.len() {
        tokens.push(&line[start..]);
    }
    tokens
}

/// Append a token too wide for an empty line, breaking it character by
/// character. Full fragments are flushed to `lines`; the last fragment
/// stays in `current` so following tokens continue on it.
fn push_char_broken(
    measurer: &mut dyn MeasureSurface,
    font: &str,
    token: &str,
    width: f32,
    current: &mut String,
    lines: &mut Vec<String>,
) {
    let mut scratch = String::new();
    for ch in token.chars() {
        if !current.is_empty() {
            scratch.clear();
            scratch.push_str(current);
            scratch.push(ch);
            if measurer.measure_text_width(font, &scratch) >= width {
                lines.push(std::mem::take(current));
            }
        }
        current.push(ch);
    }
}

/// Break a cell value into the lines to draw.
///
/// With `wrap_text` disabled the hard lines are returned verbatim.
pub fn break_text_lines(
    measurer: &mut dyn MeasureSurface,
    font: &str,
    value: &str,
    width: f32,
    wrap_text: bool,
) -> Vec<String> {
    let mut lines = Vec::new();
    for hard_line in value.split('\n') {
        if !wrap_text {
            lines.push(hard_line.to_string());
            continue;
        }

        let mut current = String::new();
        let mut scratch = String::new();
        for token in tokenize(hard_line) {
            if current.is_empty() {
                if measurer.measure_text_width(font, token) >= width {
                    push_char_broken(measurer, font, token, width, &mut current, &mut lines);
                } else {
                    current.push_str(token);
                }
                continue;
            }

            scratch.clear();
            scratch.push_str(&current);
            scratch.push_str(token);
            if measurer.measure_text_width(font, &scratch) >= width {
                lines.push(std::mem::take(&mut current));
                if measurer.measure_text_width(font, token) >= width {
                    push_char_broken(measurer, font, token, width, &mut current, &mut lines);
                } else {
                    current.push_str(token);
                }
            } else {
                current.push_str(token);
            }
        }
        lines.push(current);
    }
    lines
}
