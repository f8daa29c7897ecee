//! Lexer for the markup subset using logos
//!
//! Markup is lexed in two passes: [`Token`] splits the source into whole
//! tags, entities and text runs, and [`TagPart`] splits the inside of an
//! opening tag into its name and attributes.

use crate::error::{ParseError, ParseResult};
use logos::Logos;
use std::ops::Range;

/// Top-level markup tokens
#[derive(Logos, Debug, Clone, PartialEq, Eq)]
#[logos(skip r"<!--([^-]|-[^-])*-->")]
pub enum Token<'src> {
    /// `<name attr="value">` or `<name />`, angle brackets included
    #[regex(r"<[a-zA-Z][a-zA-Z0-9]*[^>]*>", |lex| lex.slice())]
    OpenTag(&'src str),

    /// `</name>`, resolved to the tag name
    #[regex(r"</[a-zA-Z][a-zA-Z0-9]*[ \t\r\n]*>", |lex| {
        let s = lex.slice();
        s[2..s.len() - 1].trim_end()
    })]
    CloseTag(&'src str),

    #[regex(r"&[a-zA-Z]+;|&#[0-9]+;|&#[xX][0-9a-fA-F]+;", |lex| lex.slice())]
    Entity(&'src str),

    /// An `&` that does not start an entity is literal text
    #[token("&")]
    Ampersand,

    #[regex(r"[^<&]+", |lex| lex.slice())]
    Text(&'src str),
}

/// Pieces of an opening tag, between the brackets
#[derive(Logos, Debug, Clone, PartialEq, Eq)]
#[logos(skip r"[ \t\r\n]+")]
pub enum TagPart<'src> {
    #[regex(r"[a-zA-Z_:][a-zA-Z0-9_:.\-]*", |lex| lex.slice())]
    Name(&'src str),

    #[token("=")]
    Eq,

    #[regex(r#""[^"]*""#, |lex| { let s = lex.slice(); &s[1..s.len() - 1] })]
    #[regex(r"'[^']*'", |lex| { let s = lex.slice(); &s[1..s.len() - 1] })]
    Quoted(&'src str),

    #[token("/")]
    Slash,
}

/// An opening tag split into its parts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenTag<'src> {
    pub name: String,
    pub attributes: Vec<(&'src str, String)>,
    pub self_closing: bool,
}

/// Lex markup into tokens with byte spans
pub fn tokenize(source: &str) -> ParseResult<Vec<(Token<'_>, Range<usize>)>> {
    Token::lexer(source)
        .spanned()
        .map(|(result, span)| match result {
            Ok(token) => Ok((token, span)),
            Err(_) => Err(ParseError::lexer_error(span.start)),
        })
        .collect()
}

/// Split `<name a="1" b>` into name, attributes and the self-closing flag.
/// `pos` is the byte offset of the tag, used for error reporting.
pub fn split_open_tag(tag: &str, pos: usize) -> ParseResult<OpenTag<'_>> {
    let inner = &tag[1..tag.len() - 1];
    let mut parts = TagPart::lexer(inner).spanned().peekable();

    let name = match parts.next() {
        Some((Ok(TagPart::Name(name)), _)) => name.to_ascii_lowercase(),
        _ => return Err(ParseError::invalid_syntax(pos, "expected tag name")),
    };

    let mut attributes = Vec::new();
    let mut self_closing = false;

    while let Some((part, span)) = parts.next() {
        let at = pos + 1 + span.start;
        match part {
            Ok(TagPart::Name(key)) => {
                let value = if matches!(parts.peek(), Some((Ok(TagPart::Eq), _))) {
                    parts.next();
                    match parts.next() {
                        Some((Ok(TagPart::Quoted(v)), _)) | Some((Ok(TagPart::Name(v)), _)) => {
                            decode_entities(v)
                        }
                        _ => {
                            return Err(ParseError::unexpected_token(
                                at,
                                "attribute value",
                                "end of tag",
                            ))
                        }
                    }
                } else {
                    String::new()
                };
                attributes.push((key, value));
            }
            Ok(TagPart::Slash) => self_closing = true,
            Ok(_) => return Err(ParseError::unexpected_token(at, "attribute name", "value")),
            Err(_) => return Err(ParseError::lexer_error(at)),
        }
    }

    Ok(OpenTag {
        name,
        attributes,
        self_closing,
    })
}

/// Decode a single entity such as `&amp;` or `&#39;`.
pub fn decode_entity(entity: &str) -> Option<char> {
    let body = entity.strip_prefix('&')?.strip_suffix(';')?;
    match body {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        "nbsp" => Some('\u{a0}'),
        _ => {
            let code = if let Some(hex) = body.strip_prefix("#x").or_else(|| body.strip_prefix("#X")) {
                u32::from_str_radix(hex, 16).ok()?
            } else {
                body.strip_prefix('#')?.parse().ok()?
            };
            char::from_u32(code)
        }
    }
}

/// Decode every entity in an attribute value. Unknown entities are kept
/// as written.
pub fn decode_entities(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut rest = value;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        rest = &rest[amp..];
        let decoded = rest
            .find(';')
            .and_then(|end| decode_entity(&rest[..=end]).map(|c| (c, end)));
        match decoded {
            Some((c, end)) => {
                out.push(c);
                rest = &rest[end + 1..];
            }
            None => {
                out.push('&');
                rest = &rest[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_tags_and_text() {
        let tokens = tokenize("<p>Hi &amp; bye</p>").unwrap();
        let kinds: Vec<_> = tokens.into_iter().map(|(t, _)| t).collect();

        assert_eq!(
            kinds,
            vec![
                Token::OpenTag("<p>"),
                Token::Text("Hi "),
                Token::Entity("&amp;"),
                Token::Text(" bye"),
                Token::CloseTag("p"),
            ]
        );
    }

    #[test]
    fn test_comments_skipped() {
        let tokens = tokenize("<p><!-- note -->x</p>").unwrap();
        assert_eq!(tokens.len(), 3);
    }

    #[test]
    fn test_stray_angle_bracket_is_error() {
        let err = tokenize("a < b").unwrap_err();
        assert_eq!(err, ParseError::lexer_error(2));
    }

    #[test]
    fn test_split_open_tag() {
        let tag = split_open_tag(r#"<IMG src="a.png" alt='x' hidden />"#, 0).unwrap();

        assert_eq!(tag.name, "img");
        assert!(tag.self_closing);
        assert_eq!(
            tag.attributes,
            vec![
                ("src", "a.png".to_string()),
                ("alt", "x".to_string()),
                ("hidden", String::new()),
            ]
        );
    }

    #[test]
    fn test_decode_entity() {
        assert_eq!(decode_entity("&lt;"), Some('<'));
        assert_eq!(decode_entity("&#39;"), Some('\''));
        assert_eq!(decode_entity("&#x41;"), Some('A'));
        assert_eq!(decode_entity("&bogus;"), None);
    }

    #[test]
    fn test_attribute_entities_decoded() {
        let tag = split_open_tag(r#"<span data-text="Fish &amp; &quot;chips&quot; &x">"#, 0).unwrap();
        assert_eq!(tag.attributes[0].1, r#"Fish & "chips" &x"#);
    }
}
