//! Turns rendered blocks and messages into ratatui lines.

use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span as TuiSpan};

use crate::core::message::{Message, Role};
use crate::render::{render_markdown, BlockNode, Span};
use crate::ui::syntax::Highlighter;
use crate::ui::theme::Theme;

pub const USER_PREFIX: &str = "You: ";
const USER_CONTINUATION_INDENT: &str = "     ";

fn span_style(span: &Span, base: Style, theme: &Theme) -> Style {
    match span {
        Span::PlainText(_) => base,
        Span::Bold(_) => base.add_modifier(Modifier::BOLD),
        Span::Italic(_) => base.add_modifier(Modifier::ITALIC),
        Span::InlineCode(_) => base.patch(theme.md_inline_code_style),
    }
}

fn styled_spans(spans: &[Span], base: Style, theme: &Theme) -> Vec<TuiSpan<'static>> {
    spans
        .iter()
        .map(|span| TuiSpan::styled(span.text().to_string(), span_style(span, base, theme)))
        .collect()
}

fn plain_code_lines(code: &str, theme: &Theme) -> Vec<Line<'static>> {
    let mut style = theme.md_code_style;
    if let Some(bg) = theme.md_codeblock_bg_color() {
        style = style.bg(bg);
    }
    code.split('\n')
        .map(|line| Line::from(TuiSpan::styled(line.to_string(), style)))
        .collect()
}

/// One or more lines per block; `Blank` becomes an empty line.
pub fn render_blocks(
    blocks: &[BlockNode],
    theme: &Theme,
    highlighter: &dyn Highlighter,
) -> Vec<Line<'static>> {
    let base = theme.assistant_text_style;
    let mut lines = Vec::new();
    for block in blocks {
        match block {
            BlockNode::Heading { spans, .. } => {
                let heading = base.patch(theme.md_heading_style);
                lines.push(Line::from(styled_spans(spans, heading, theme)));
            }
            BlockNode::Paragraph { spans } => {
                lines.push(Line::from(styled_spans(spans, base, theme)));
            }
            BlockNode::List { ordered, items } => {
                for (index, item) in items.iter().enumerate() {
                    let marker = if *ordered {
                        format!("{}. ", index + 1)
                    } else {
                        "- ".to_string()
                    };
                    let mut spans = vec![TuiSpan::styled(marker, theme.md_list_marker_style)];
                    spans.extend(styled_spans(item, base, theme));
                    lines.push(Line::from(spans));
                }
            }
            BlockNode::CodeBlock { language, code } => {
                let highlighted = highlighter
                    .highlight(language, code, theme)
                    .filter(|highlighted| !highlighted.is_empty());
                lines.extend(highlighted.unwrap_or_else(|| plain_code_lines(code, theme)));
            }
            BlockNode::Blank => lines.push(Line::default()),
        }
    }
    lines
}

/// User messages are shown verbatim behind a `You: ` prefix. Assistant
/// messages go through the markdown pipeline unless `markdown` is off.
pub fn render_message(
    message: &Message,
    theme: &Theme,
    highlighter: &dyn Highlighter,
    markdown: bool,
) -> Vec<Line<'static>> {
    match message.role {
        Role::User => message
            .content
            .split('\n')
            .enumerate()
            .map(|(index, text)| {
                let lead = if index == 0 {
                    TuiSpan::styled(USER_PREFIX, theme.user_prefix_style)
                } else {
                    TuiSpan::raw(USER_CONTINUATION_INDENT)
                };
                Line::from(vec![
                    lead,
                    TuiSpan::styled(text.to_string(), theme.user_text_style),
                ])
            })
            .collect(),
        Role::Assistant if markdown => {
            render_blocks(&render_markdown(&message.content), theme, highlighter)
        }
        Role::Assistant => message
            .content
            .split('\n')
            .map(|text| Line::from(TuiSpan::styled(text.to_string(), theme.assistant_text_style)))
            .collect(),
    }
}

/// Failure text, verbatim, in the theme's error style.
pub fn render_error(text: &str, theme: &Theme) -> Vec<Line<'static>> {
    text.split('\n')
        .map(|line| Line::from(TuiSpan::styled(line.to_string(), theme.error_text_style)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::message::MessageId;
    use crate::ui::syntax::PlainHighlighter;

    fn line_text(line: &Line<'_>) -> String {
        line.spans.iter().map(|span| span.content.as_ref()).collect()
    }

    fn texts(lines: &[Line<'_>]) -> Vec<String> {
        lines.iter().map(line_text).collect()
    }

    #[test]
    fn blocks_render_one_line_each_with_list_markers() {
        let blocks = render_markdown("# Title\n- one\n- two\n\n1. first\n2. second");
        let lines = render_blocks(&blocks, &Theme::monochrome(), &PlainHighlighter);

        assert_eq!(
            texts(&lines),
            vec!["Title", "- one", "- two", "", "1. first", "2. second"]
        );
        assert!(lines[0].spans[0]
            .style
            .add_modifier
            .contains(Modifier::BOLD));
    }

    #[test]
    fn inline_spans_carry_modifiers() {
        let blocks = render_markdown("plain **bold** *it* `code`");
        let theme = Theme::dark_default();
        let lines = render_blocks(&blocks, &theme, &PlainHighlighter);

        let spans = &lines[0].spans;
        assert_eq!(spans[1].content, "bold");
        assert!(spans[1].style.add_modifier.contains(Modifier::BOLD));
        assert_eq!(spans[3].content, "it");
        assert!(spans[3].style.add_modifier.contains(Modifier::ITALIC));
        assert_eq!(spans[5].content, "code");
        assert_eq!(spans[5].style.fg, theme.md_inline_code_style.fg);
    }

    #[test]
    fn code_falls_back_to_plain_lines() {
        let blocks = render_markdown("```rust\nlet a = 1;\n**not bold**\n```");
        let theme = Theme::dark_default();
        let lines = render_blocks(&blocks, &theme, &PlainHighlighter);

        assert_eq!(texts(&lines), vec!["let a = 1;", "**not bold**"]);
        assert_eq!(lines[0].spans[0].style.bg, theme.md_codeblock_bg);
    }

    #[test]
    fn user_messages_get_prefix_and_indent() {
        let message = Message::new(MessageId(1), Role::User, "hi **there**\nsecond");
        let lines = render_message(&message, &Theme::monochrome(), &PlainHighlighter, true);

        assert_eq!(texts(&lines), vec!["You: hi **there**", "     second"]);
    }

    #[test]
    fn errors_use_error_style_without_markdown() {
        let theme = Theme::dark_default();
        let lines = render_error("Sorry, **failed**\nretry", &theme);

        assert_eq!(texts(&lines), vec!["Sorry, **failed**", "retry"]);
        assert!(lines
            .iter()
            .all(|line| line.spans[0].style == theme.error_text_style));
    }

    #[test]
    fn assistant_markdown_can_be_disabled() {
        let message = Message::new(MessageId(2), Role::Assistant, "# Raw\n- item");
        let theme = Theme::monochrome();

        let raw = render_message(&message, &theme, &PlainHighlighter, false);
        assert_eq!(texts(&raw), vec!["# Raw", "- item"]);

        let rendered = render_message(&message, &theme, &PlainHighlighter, true);
        assert_eq!(texts(&rendered), vec!["Raw", "- item"]);
    }
}
