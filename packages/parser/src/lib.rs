//! # Proofmark Parser
//!
//! Reads and writes the small HTML subset the editor schema uses, so that
//! documents and corrected text can be exchanged as markup as well as JSON.

pub mod error;
pub mod lexer;
pub mod parser;
pub mod serializer;

pub use error::{ParseError, ParseResult};
pub use lexer::{tokenize, Token};
pub use parser::{parse, Parser, MARK_BOLD, MARK_ITALIC, MARK_STRIKE};
pub use serializer::{serialize, Serializer};

#[cfg(test)]
mod tests {
    use super::*;
    use proofmark_document::NodeType;

    #[test]
    fn test_parse_serialize_roundtrip() {
        let source = "<h1>Notes</h1>\n<p>One <em>two</em> three</p>\n<blockquote><p>q</p></blockquote>";
        let doc = parse(source).unwrap();

        assert_eq!(doc.count(NodeType::Paragraph), 2);
        assert_eq!(serialize(&doc), source);
    }
}
