//! Conversational markdown rendering.
//!
//! Rendering is a one-way pipeline from a message string to an ordered list of
//! [`BlockNode`]s that any presentation layer can consume:
//!
//! 1. [`fence`] pre-splits the message on triple-backtick fences so code is
//!    never read as prose.
//! 2. [`lexer`] classifies each prose line into a [`lexer::LineToken`].
//! 3. [`blocks`] folds the token stream into block nodes, grouping list items.
//! 4. [`inline`] turns the text of headings, paragraphs and list items into
//!    styled [`Span`]s.
//!
//! Only a conversational subset of markdown is understood. Tables,
//! blockquotes, nested lists and links are rendered as plain text.
//!
//! ```
//! use parlance::render::{render_markdown, BlockNode, Span};
//!
//! let blocks = render_markdown("# Title\n- one\n- **two**");
//! assert_eq!(
//!     blocks,
//!     vec![
//!         BlockNode::Heading { level: 1, spans: vec![Span::PlainText("Title".into())] },
//!         BlockNode::List {
//!             ordered: false,
//!             items: vec![
//!                 vec![Span::PlainText("one".into())],
//!                 vec![Span::Bold("two".into())],
//!             ],
//!         },
//!     ]
//! );
//! ```

pub mod blocks;
pub mod fence;
pub mod inline;
pub mod lexer;


use serde::Serialize;

pub use blocks::segment_blocks;
pub use fence::{split_fences, Segment};
pub use inline::format_inline;

/// A minimal styled run of inline text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "text", rename_all = "snake_case")]
pub enum Span {
    PlainText(String),
    Bold(String),
    Italic(String),
    InlineCode(String),
}

impl Span {
    pub fn text(&self) -> &str {
        match self {
            Span::PlainText(text)
            | Span::Bold(text)
            | Span::Italic(text)
            | Span::InlineCode(text) => text,
        }
    }

    /// The span written back with its markdown delimiters.
    pub fn to_markdown(&self) -> String {
        match self {
            Span::PlainText(text) => text.clone(),
            Span::Bold(text) => format!("**{text}**"),
            Span::Italic(text) => format!("*{text}*"),
            Span::InlineCode(text) => format!("`{text}`"),
        }
    }
}

/// One structural unit of rendered output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BlockNode {
    Heading { level: u8, spans: Vec<Span> },
    Paragraph { spans: Vec<Span> },
    /// A run of consecutive list items of the same kind.
    List { ordered: bool, items: Vec<Vec<Span>> },
    CodeBlock { language: String, code: String },
    Blank,
}

impl BlockNode {
    /// Concatenated text of every span in the block. Code blocks yield their
    /// raw body.
    pub fn plain_text(&self) -> String {
        match self {
            BlockNode::Heading { spans, .. } | BlockNode::Paragraph { spans } => {
                spans_text(spans)
            }
            BlockNode::List { items, .. } => items
                .iter()
                .map(|item| spans_text(item))
                .collect::<Vec<_>>()
                .join("\n"),
            BlockNode::CodeBlock { code, .. } => code.clone(),
            BlockNode::Blank => String::new(),
        }
    }
}

pub fn spans_text(spans: &[Span]) -> String {
    spans.iter().map(Span::text).collect()
}

/// Render a full message into its ordered block nodes.
pub fn render_markdown(content: &str) -> Vec<BlockNode> {
    let mut blocks = Vec::new();
    for segment in split_fences(content) {
        match segment {
            Segment::Text(text) => blocks.extend(segment_blocks(&text)),
            Segment::Code { language, body } => blocks.push(BlockNode::CodeBlock {
                language,
                code: body,
            }),
        }
    }
    blocks
}

/// Write block nodes back out as markdown source.
///
/// Ordered lists are renumbered from 1. Feeding the result back through
/// [`render_markdown`] yields the same blocks for heading, paragraph and list
/// content.
pub fn to_markdown(blocks: &[BlockNode]) -> String {
    let mut lines: Vec<String> = Vec::with_capacity(blocks.len());
    for block in blocks {
        match block {
            BlockNode::Heading { level, spans } => {
                lines.push(format!(
                    "{} {}",
                    "#".repeat(usize::from(*level)),
                    spans_markdown(spans)
                ));
            }
            BlockNode::Paragraph { spans } => lines.push(spans_markdown(spans)),
            BlockNode::List { ordered, items } => {
                for (index, item) in items.iter().enumerate() {
                    let marker = if *ordered {
                        format!("{}.", index + 1)
                    } else {
                        "-".to_string()
                    };
                    lines.push(format!("{marker} {}", spans_markdown(item)));
                }
            }
            BlockNode::CodeBlock { language, code } => {
                lines.push(format!("```{language}\n{code}\n```"));
            }
            BlockNode::Blank => lines.push(String::new()),
        }
    }
    lines.join("\n")
}

fn spans_markdown(spans: &[Span]) -> String {
    spans.iter().map(Span::to_markdown).collect()
}
