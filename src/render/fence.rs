//! Triple-backtick fence extraction.
//!
//! Fences pair up left to right, each opener closing at the nearest following
//! marker. A trailing unpaired marker is left in the surrounding text.

const FENCE: &str = "```";

/// Language tag used when a fence has no info line.
pub const DEFAULT_LANGUAGE: &str = "text";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Prose outside any fence, passed through untouched.
    Text(String),
    /// The inside of a fence.
    Code { language: String, body: String },
}

/// Split a message into prose and code segments in source order.
///
/// A message without any complete fence comes back as a single
/// [`Segment::Text`] equal to the input. Otherwise empty prose between or
/// around fences is dropped.
pub fn split_fences(content: &str) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut cursor = 0;

    while let Some((open, close)) = next_fence(content, cursor) {
        push_text(&mut segments, &content[cursor..open]);
        segments.push(code_segment(&content[open + FENCE.len()..close]));
        cursor = close + FENCE.len();
    }

    if segments.is_empty() {
        return vec![Segment::Text(content.to_string())];
    }

    push_text(&mut segments, &content[cursor..]);
    segments
}

/// Byte offsets of the next opening and closing markers at or after `from`.
fn next_fence(content: &str, from: usize) -> Option<(usize, usize)> {
    let open = from + content[from..].find(FENCE)?;
    let body_start = open + FENCE.len();
    let close = body_start + content[body_start..].find(FENCE)?;
    Some((open, close))
}

fn push_text(segments: &mut Vec<Segment>, text: &str) {
    if !text.is_empty() {
        segments.push(Segment::Text(text.to_string()));
    }
}

fn code_segment(inner: &str) -> Segment {
    let (info, body) = match inner.split_once('\n') {
        Some((info, rest)) => (info, rest),
        None => (inner, ""),
    };

    let language = match info.trim() {
        "" => DEFAULT_LANGUAGE.to_string(),
        tag => tag.to_string(),
    };

    // The newline right before the closing marker belongs to the fence.
    let body = body
        .strip_suffix('\n')
        .map(|b| b.strip_suffix('\r').unwrap_or(b))
        .unwrap_or(body);

    Segment::Code {
        language,
        body: body.to_string(),
    }
}
