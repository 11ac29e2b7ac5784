//! Inline span formatting.
//!
//! Three passes run in precedence order, each rewriting only the
//! [`Span::PlainText`] runs left by the previous one:
//!
//! 1. `` `code` ``: content may not contain a backtick.
//! 2. `**bold**`: shortest match, content not rescanned.
//! 3. `*italic*`: content may not contain an asterisk.
//!
//! A delimiter pair with nothing between it is not a span and stays literal.

use super::Span;

#[derive(Clone, Copy)]
struct Delimiter {
    marker: &'static str,
    /// Whether the span body may contain the marker's own character.
    body_may_contain_marker: bool,
    wrap: fn(String) -> Span,
}

const CODE: Delimiter = Delimiter {
    marker: "`",
    body_may_contain_marker: false,
    wrap: Span::InlineCode,
};

const BOLD: Delimiter = Delimiter {
    marker: "**",
    body_may_contain_marker: true,
    wrap: Span::Bold,
};

const ITALIC: Delimiter = Delimiter {
    marker: "*",
    body_may_contain_marker: false,
    wrap: Span::Italic,
};

/// Format one line of text into styled spans.
pub fn format_inline(line: &str) -> Vec<Span> {
    let mut spans = if line.is_empty() {
        Vec::new()
    } else {
        vec![Span::PlainText(line.to_string())]
    };
    for delimiter in [CODE, BOLD, ITALIC] {
        spans = apply(spans, delimiter);
    }
    spans
}

fn apply(spans: Vec<Span>, delimiter: Delimiter) -> Vec<Span> {
    let mut out = Vec::with_capacity(spans.len());
    for span in spans {
        match span {
            Span::PlainText(text) => scan(&text, delimiter, &mut out),
            styled => out.push(styled),
        }
    }
    out
}

fn scan(text: &str, delimiter: Delimiter, out: &mut Vec<Span>) {
    let marker = delimiter.marker;
    let mut plain_start = 0;
    let mut pos = 0;

    while pos < text.len() {
        if text[pos..].starts_with(marker) {
            let body_start = pos + marker.len();
            if let Some(body_len) = body_len(&text[body_start..], delimiter) {
                if plain_start < pos {
                    out.push(Span::PlainText(text[plain_start..pos].to_string()));
                }
                let body = &text[body_start..body_start + body_len];
                out.push((delimiter.wrap)(body.to_string()));
                pos = body_start + body_len + marker.len();
                plain_start = pos;
                continue;
            }
        }
        pos += text[pos..].chars().next().map_or(1, char::len_utf8);
    }

    if plain_start < text.len() {
        out.push(Span::PlainText(text[plain_start..].to_string()));
    }
}

/// Length of a non-empty span body at the start of `rest`, if a closing
/// marker follows it.
fn body_len(rest: &str, delimiter: Delimiter) -> Option<usize> {
    let marker = delimiter.marker;
    if delimiter.body_may_contain_marker {
        let first = rest.chars().next()?.len_utf8();
        rest[first..].find(marker).map(|close| first + close)
    } else {
        match rest.find(marker)? {
            0 => None,
            close => Some(close),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain(text: &str) -> Span {
        Span::PlainText(text.into())
    }

    #[test]
    fn mixed_markers_follow_precedence() {
        // Leading prose is kept so the spans concatenate back to the line.
        assert_eq!(
            format_inline("Use `x=1` **bold** and *italic*"),
            vec![
                plain("Use "),
                Span::InlineCode("x=1".into()),
                plain(" "),
                Span::Bold("bold".into()),
                plain(" and "),
                Span::Italic("italic".into()),
            ]
        );
    }

    #[test]
    fn plain_line_round_trips_exactly() {
        let line = "  Nothing special here, just 3 < 4 & done.  ";
        assert_eq!(format_inline(line), vec![plain(line)]);
    }

    #[test]
    fn code_content_is_inert() {
        assert_eq!(
            format_inline("`**not bold** *nor italic*`"),
            vec![Span::InlineCode("**not bold** *nor italic*".into())]
        );
    }

    #[test]
    fn bold_content_is_not_rescanned() {
        assert_eq!(
            format_inline("**a *b* c**"),
            vec![Span::Bold("a *b* c".into())]
        );
    }

    #[test]
    fn empty_delimiters_stay_literal() {
        assert_eq!(format_inline("a `` b"), vec![plain("a `` b")]);
        assert_eq!(format_inline("a **** b"), vec![plain("a **** b")]);
        assert_eq!(format_inline("a ** b"), vec![plain("a ** b")]);
    }

    #[test]
    fn unmatched_markers_stay_in_surrounding_text() {
        assert_eq!(format_inline("2 * 3 = 6"), vec![plain("2 * 3 = 6")]);
        assert_eq!(
            format_inline("tick ` then `code`"),
            vec![
                plain("tick "),
                Span::InlineCode(" then ".into()),
                plain("code`"),
            ]
        );
    }

    #[test]
    fn double_backtick_opens_at_second_tick() {
        assert_eq!(
            format_inline("``x`"),
            vec![plain("`"), Span::InlineCode("x".into())]
        );
    }

    #[test]
    fn bold_is_shortest_match() {
        assert_eq!(
            format_inline("**a** and **b**"),
            vec![
                Span::Bold("a".into()),
                plain(" and "),
                Span::Bold("b".into()),
            ]
        );
    }

    #[test]
    fn triple_asterisks_bind_bold_first() {
        assert_eq!(
            format_inline("***x***"),
            vec![Span::Bold("*x".into()), plain("*")]
        );
    }

    #[test]
    fn multibyte_text_is_handled() {
        assert_eq!(
            format_inline("héllo *wörld* ✓"),
            vec![plain("héllo "), Span::Italic("wörld".into()), plain(" ✓")]
        );
    }

    #[test]
    fn empty_line_has_no_spans() {
        assert!(format_inline("").is_empty());
    }
}
