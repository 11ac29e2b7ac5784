//! Line classification for prose segments.
//!
//! Each line becomes exactly one [`LineToken`]. Precedence is blank, heading,
//! unordered item, ordered item, then paragraph text.

/// Deepest heading level; longer `#` runs are clamped to it.
pub const MAX_HEADING_LEVEL: u8 = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineToken<'a> {
    Blank,
    Heading { level: u8, text: &'a str },
    UnorderedItem(&'a str),
    OrderedItem(&'a str),
    Text(&'a str),
}

/// Lex every line of a prose segment. Lines are split on `\n` and a trailing
/// `\r` is dropped.
pub fn lex_lines(text: &str) -> impl Iterator<Item = LineToken<'_>> {
    text.split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .map(lex_line)
}

pub fn lex_line(line: &str) -> LineToken<'_> {
    if line.trim().is_empty() {
        return LineToken::Blank;
    }

    let trimmed = line.trim_start();

    if trimmed.starts_with('#') {
        let hashes = trimmed.bytes().take_while(|b| *b == b'#').count();
        let level = u8::try_from(hashes)
            .unwrap_or(MAX_HEADING_LEVEL)
            .clamp(1, MAX_HEADING_LEVEL);
        let text = trimmed[hashes..].trim_start();
        return LineToken::Heading { level, text };
    }

    if let Some(rest) = unordered_marker(trimmed) {
        return LineToken::UnorderedItem(rest);
    }

    if let Some(rest) = ordered_marker(trimmed) {
        return LineToken::OrderedItem(rest);
    }

    LineToken::Text(line)
}

/// `-`, `*` or `+` followed by whitespace. Returns the item text.
fn unordered_marker(line: &str) -> Option<&str> {
    let rest = line
        .strip_prefix('-')
        .or_else(|| line.strip_prefix('*'))
        .or_else(|| line.strip_prefix('+'))?;
    after_marker_whitespace(rest)
}

/// One or more ASCII digits, `.`, then whitespace. Returns the item text.
fn ordered_marker(line: &str) -> Option<&str> {
    let digits = line.bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 {
        return None;
    }
    let rest = line[digits..].strip_prefix('.')?;
    after_marker_whitespace(rest)
}

fn after_marker_whitespace(rest: &str) -> Option<&str> {
    if rest.starts_with(char::is_whitespace) {
        Some(rest.trim_start())
    } else {
        None
    }
}
