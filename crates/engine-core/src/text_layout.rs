//! Approximate paragraph wrapping for the recording backend.
//!
//! Real shaping belongs to the drawing backend; this keeps line breaking
//! deterministic and cheap for display lists and tests.

/// Wrapped paragraph lines.
#[derive(Clone, Debug, PartialEq)]
pub struct WrappedText {
    /// The wrapped lines of text
    pub lines: Vec<String>,
    /// Height of each line in pixels
    pub line_height: f32,
    /// Total height of all lines
    pub total_height: f32,
}

/// Fast word-wrapping using character-count approximation.
///
/// Uses an average advance of `0.55 * size + letter_spacing` per character.
/// Explicit newlines always break.
pub fn wrap_text_fast(
    text: &str,
    max_width: f32,
    size: f32,
    line_height: f32,
    letter_spacing: f32,
) -> WrappedText {
    let avg_char_width = (size * 0.55 + letter_spacing).max(0.01);
    let max_chars = if max_width.is_finite() {
        (max_width / avg_char_width).floor() as usize
    } else {
        usize::MAX
    };

    if max_chars == 0 {
        return WrappedText {
            lines: vec![],
            line_height,
            total_height: 0.0,
        };
    }

    let mut lines: Vec<String> = Vec::new();
    for paragraph in text.split('\n') {
        let mut current_line = String::new();
        for word in paragraph.split_whitespace() {
            let candidate_len = if current_line.is_empty() {
                word.chars().count()
            } else {
                current_line.chars().count() + 1 + word.chars().count()
            };

            if candidate_len <= max_chars {
                if !current_line.is_empty() {
                    current_line.push(' ');
                }
                current_line.push_str(word);
                continue;
            }
            if !current_line.is_empty() {
                lines.push(std::mem::take(&mut current_line));
            }
            // Handle very long words by breaking them
            let chars: Vec<char> = word.chars().collect();
            let mut chunks = chars.chunks(max_chars).peekable();
            while let Some(chunk) = chunks.next() {
                if chunks.peek().is_some() {
                    lines.push(chunk.iter().collect());
                } else {
                    current_line = chunk.iter().collect();
                }
            }
        }
        lines.push(current_line);
    }
    // A trailing empty line from the final split carries no text.
    while lines.last().is_some_and(|l| l.is_empty()) && lines.len() > 1 {
        lines.pop();
    }
    if lines.len() == 1 && lines[0].is_empty() {
        lines.clear();
    }

    let total_height = lines.len() as f32 * line_height;

    WrappedText {
        lines,
        line_height,
        total_height,
    }
}

/// Walk wrapped lines top to bottom, handing each line and its origin to `render_line`.
pub fn render_wrapped_text<F>(
    wrapped: &WrappedText,
    pos: [f32; 2],
    mut render_line: F,
) where
    F: FnMut(&str, [f32; 2]),
{
    for (i, line) in wrapped.lines.iter().enumerate() {
        let y = pos[1] + (i as f32) * wrapped.line_height;
        render_line(line, [pos[0], y]);
    }
}
