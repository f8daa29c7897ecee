use crate::error::{ParseError, ParseResult};
use crate::lexer::{decode_entity, split_open_tag, tokenize, OpenTag, Token};
use proofmark_document::{CorrectionMark, Node, NodeType, ATTR_LEVEL};
use std::ops::Range;

pub const MARK_BOLD: &str = "bold";
pub const MARK_ITALIC: &str = "italic";
pub const MARK_STRIKE: &str = "strike";

pub(crate) const DATA_CORRECTION: &str = "data-correction";
pub(crate) const DATA_TEXT: &str = "data-text";
pub(crate) const DATA_ADDED: &str = "data-added";
pub(crate) const DATA_REMOVED: &str = "data-removed";

/// Parser for the markup subset
///
/// Block tags: `p`, `h1`..`h6`, `blockquote`. Inline tags: `strong`/`b`,
/// `em`/`i`, `s`/`strike`/`del` (text marks), `span` (transparent, or a
/// correction marker when it carries `data-correction`), `br`, `img`.
/// Inline content outside a block is wrapped in a paragraph.
pub struct Parser<'src> {
    source: &'src str,
    tokens: Vec<(Token<'src>, Range<usize>)>,
    pos: usize,
    marks: Vec<&'static str>,
}

impl<'src> Parser<'src> {
    pub fn new(source: &'src str) -> ParseResult<Self> {
        Ok(Self {
            source,
            tokens: tokenize(source)?,
            pos: 0,
            marks: Vec::new(),
        })
    }

    /// Parse a complete document
    pub fn parse_document(&mut self) -> ParseResult<Node> {
        let mut doc = Node::new(NodeType::Doc);
        doc.children = self.parse_blocks(None)?;
        doc.normalize();
        Ok(doc)
    }

    /// Parse blocks until the closing tag `until` (or the end of input when
    /// `until` is `None`). Stray inline content is gathered into paragraphs.
    fn parse_blocks(&mut self, until: Option<&str>) -> ParseResult<Vec<Node>> {
        let mut blocks = Vec::new();
        let mut loose: Vec<Node> = Vec::new();

        loop {
            let Some((token, span)) = self.peek().cloned() else {
                if let Some(tag) = until {
                    return Err(ParseError::unexpected_eof(self.source.len(), tag));
                }
                break;
            };

            match token {
                Token::CloseTag(name) => {
                    if until == Some(name) {
                        self.advance();
                        break;
                    }
                    return Err(ParseError::unexpected_token(
                        span.start,
                        until.map_or("end of input".to_string(), |t| format!("</{}>", t)),
                        format!("</{}>", name),
                    ));
                }
                Token::OpenTag(raw) => {
                    let tag = split_open_tag(raw, span.start)?;
                    if block_type(&tag.name).is_some() {
                        flush_loose(&mut loose, &mut blocks);
                        self.advance();
                        blocks.push(self.parse_block(tag, span.start)?);
                    } else {
                        loose.extend(self.parse_inline_item()?);
                    }
                }
                Token::Text(text) if loose.is_empty() && text.trim().is_empty() => {
                    // Whitespace between blocks
                    self.advance();
                }
                _ => loose.extend(self.parse_inline_item()?),
            }
        }

        flush_loose(&mut loose, &mut blocks);
        Ok(blocks)
    }

    fn parse_block(&mut self, tag: OpenTag<'src>, pos: usize) -> ParseResult<Node> {
        let node_type = block_type(&tag.name)
            .ok_or_else(|| ParseError::unknown_tag(pos, tag.name.clone()))?;

        if tag.self_closing {
            return Ok(new_block(node_type, &tag.name));
        }

        let mut block = new_block(node_type, &tag.name);
        block.children = if node_type == NodeType::Blockquote {
            self.parse_blocks(Some(&tag.name))?
        } else {
            self.parse_inline_until(&tag.name)?
        };
        Ok(block)
    }

    /// Parse inline content up to and including `</close>`.
    fn parse_inline_until(&mut self, close: &str) -> ParseResult<Vec<Node>> {
        let mut nodes = Vec::new();
        loop {
            match self.peek() {
                None => return Err(ParseError::unexpected_eof(self.source.len(), close)),
                Some((Token::CloseTag(name), span)) => {
                    if *name != close {
                        return Err(ParseError::unexpected_token(
                            span.start,
                            format!("</{}>", close),
                            format!("</{}>", name),
                        ));
                    }
                    self.advance();
                    return Ok(nodes);
                }
                Some(_) => nodes.extend(self.parse_inline_item()?),
            }
        }
    }

    /// Parse one inline token (possibly a whole inline element).
    fn parse_inline_item(&mut self) -> ParseResult<Vec<Node>> {
        let Some((token, span)) = self.advance().cloned() else {
            return Ok(Vec::new());
        };

        match token {
            Token::Text(text) => Ok(vec![self.marked_text(text.to_string())]),
            Token::Ampersand => Ok(vec![self.marked_text("&".to_string())]),
            Token::Entity(entity) => {
                let decoded = decode_entity(entity)
                    .map(String::from)
                    .unwrap_or_else(|| entity.to_string());
                Ok(vec![self.marked_text(decoded)])
            }
            Token::CloseTag(name) => Err(ParseError::unexpected_token(
                span.start,
                "inline content",
                format!("</{}>", name),
            )),
            Token::OpenTag(raw) => {
                let tag = split_open_tag(raw, span.start)?;
                self.parse_inline_element(tag, span.start)
            }
        }
    }

    fn parse_inline_element(&mut self, tag: OpenTag<'src>, pos: usize) -> ParseResult<Vec<Node>> {
        match tag.name.as_str() {
            "br" => Ok(vec![Node::hard_break()]),
            "img" => {
                let mut image = Node::new(NodeType::Image);
                for (key, value) in tag.attributes {
                    image = image.with_attr(key, value);
                }
                Ok(vec![image])
            }
            "span" if tag.attributes.iter().any(|(k, _)| *k == DATA_CORRECTION) => {
                let inner = if tag.self_closing {
                    Vec::new()
                } else {
                    self.parse_inline_until("span")?
                };
                Ok(vec![correction_from_tag(&tag, &inner)])
            }
            "span" => self.parse_inline_children(&tag),
            name => match mark_for(name) {
                Some(mark) => {
                    self.marks.push(mark);
                    let children = self.parse_inline_children(&tag);
                    self.marks.pop();
                    children
                }
                None => Err(ParseError::unknown_tag(pos, name)),
            },
        }
    }

    fn parse_inline_children(&mut self, tag: &OpenTag<'src>) -> ParseResult<Vec<Node>> {
        if tag.self_closing {
            return Ok(Vec::new());
        }
        self.parse_inline_until(&tag.name)
    }

    fn marked_text(&self, text: String) -> Node {
        self.marks
            .iter()
            .fold(Node::text(text), |node, mark| node.with_attr(*mark, true))
    }

    fn peek(&self) -> Option<&(Token<'src>, Range<usize>)> {
        self.tokens.get(self.pos)
    }

    fn advance(&mut self) -> Option<&(Token<'src>, Range<usize>)> {
        let token = self.tokens.get(self.pos);
        if token.is_some() {
            self.pos += 1;
        }
        token
    }
}

fn block_type(name: &str) -> Option<NodeType> {
    match name {
        "p" => Some(NodeType::Paragraph),
        "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => Some(NodeType::Heading),
        "blockquote" => Some(NodeType::Blockquote),
        _ => None,
    }
}

fn new_block(node_type: NodeType, name: &str) -> Node {
    let block = Node::new(node_type);
    if node_type == NodeType::Heading {
        let level: u8 = name[1..].parse().unwrap_or(1);
        block.with_attr(ATTR_LEVEL, level)
    } else {
        block
    }
}

fn mark_for(name: &str) -> Option<&'static str> {
    match name {
        "strong" | "b" => Some(MARK_BOLD),
        "em" | "i" => Some(MARK_ITALIC),
        "s" | "strike" | "del" => Some(MARK_STRIKE),
        _ => None,
    }
}

fn correction_from_tag(tag: &OpenTag<'_>, inner: &[Node]) -> Node {
    let attr = |key: &str| {
        tag.attributes
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    };
    let flag = |key: &str| matches!(attr(key), Some("true") | Some(""));

    let text = match attr(DATA_TEXT) {
        Some(text) => text.to_string(),
        None => inner.iter().map(Node::text_str).collect(),
    };

    CorrectionMark {
        text,
        added: flag(DATA_ADDED),
        removed: flag(DATA_REMOVED),
    }
    .into_node()
}

fn flush_loose(loose: &mut Vec<Node>, blocks: &mut Vec<Node>) {
    if loose.is_empty() {
        return;
    }
    let only_whitespace = loose
        .iter()
        .all(|n| n.is_text() && n.text_str().trim().is_empty());
    let children = std::mem::take(loose);
    if !only_whitespace {
        blocks.push(Node::paragraph(children));
    }
}

/// Parse markup into a document tree
pub fn parse(source: &str) -> ParseResult<Node> {
    Parser::new(source)?.parse_document()
}
