//! Greedy word-wrapping to a fixed character width.
//!
//! Width is a count of Unicode scalar values, not measured glyph width, so
//! the result is the same on every machine regardless of font or locale.
//!
//! Tokens are whitespace-delimited and rejoined with a single space; runs of
//! whitespace (tabs, soft line breaks) therefore collapse on wrapped lines.
//! A token longer than the width is hard-broken every `width` chars. Its
//! last piece stays open, so the next token may still pack onto that line.

/// Wrap one paragraph into lines of at most `width` chars.
///
/// Always returns at least one line: a blank paragraph yields `[""]`, which
/// keeps the paragraph boundary visible in the flattened line stream.
///
/// `width` must be ≥ 1 ([`crate::ConversionConfig`] guarantees it); a zero
/// width is treated as 1.
pub fn wrap_paragraph(paragraph: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines = Vec::new();
    let mut line = String::new();
    let mut line_len = 0usize;

    for word in paragraph.split_whitespace() {
        let word_len = word.chars().count();

        if line_len > 0 && line_len + 1 + word_len <= width {
            line.push(' ');
            line.push_str(word);
            line_len += 1 + word_len;
            continue;
        }

        if line_len > 0 {
            lines.push(std::mem::take(&mut line));
            line_len = 0;
        }

        if word_len <= width {
            line.push_str(word);
            line_len = word_len;
            continue;
        }

        // Hard break: emit full-width pieces, keep the remainder open.
        let chars: Vec<char> = word.chars().collect();
        let mut pieces = chars.chunks(width).peekable();
        while let Some(piece) = pieces.next() {
            let piece: String = piece.iter().collect();
            if pieces.peek().is_some() {
                lines.push(piece);
            } else {
                line_len = piece.chars().count();
                line = piece;
            }
        }
    }

    if line_len > 0 || lines.is_empty() {
        lines.push(line);
    }
    lines
}

/// Wrap every paragraph and flatten, preserving paragraph order.
pub fn wrap_paragraphs<I, S>(paragraphs: I, width: usize) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    paragraphs
        .into_iter()
        .flat_map(|p| wrap_paragraph(p.as_ref(), width))
        .collect()
}
