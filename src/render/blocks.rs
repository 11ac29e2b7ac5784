use super::inline::format_inline;
use super::lexer::{lex_lines, LineToken};
use super::{BlockNode, Span};

/// Items collected for the list currently being built.
#[derive(Default)]
struct PendingList {
    ordered: bool,
    items: Vec<Vec<Span>>,
}

/// Folds line tokens into block nodes, holding at most one open list.
#[derive(Default)]
struct Segmenter {
    blocks: Vec<BlockNode>,
    list: Option<PendingList>,
}

impl Segmenter {
    fn push_token(&mut self, token: LineToken<'_>) {
        match token {
            LineToken::Blank => {
                self.flush_list();
                self.blocks.push(BlockNode::Blank);
            }
            LineToken::Heading { level, text } => {
                self.flush_list();
                self.blocks.push(BlockNode::Heading {
                    level,
                    spans: format_inline(text),
                });
            }
            LineToken::UnorderedItem(text) => self.push_item(false, text),
            LineToken::OrderedItem(text) => self.push_item(true, text),
            LineToken::Text(text) => {
                self.flush_list();
                self.blocks.push(BlockNode::Paragraph {
                    spans: format_inline(text),
                });
            }
        }
    }

    fn push_item(&mut self, ordered: bool, text: &str) {
        if self.list.as_ref().is_some_and(|list| list.ordered != ordered) {
            self.flush_list();
        }
        self.list
            .get_or_insert_with(|| PendingList {
                ordered,
                items: Vec::new(),
            })
            .items
            .push(format_inline(text));
    }

    fn flush_list(&mut self) {
        if let Some(PendingList { ordered, items }) = self.list.take() {
            self.blocks.push(BlockNode::List { ordered, items });
        }
    }

    fn finish(mut self) -> Vec<BlockNode> {
        self.flush_list();
        self.blocks
    }
}

/// Segment a prose segment (no fences) into block nodes.
pub fn segment_blocks(text: &str) -> Vec<BlockNode> {
    if text.is_empty() {
        return Vec::new();
    }
    let mut segmenter = Segmenter::default();
    for token in lex_lines(text) {
        segmenter.push_token(token);
    }
    segmenter.finish()
}
