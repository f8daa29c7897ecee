//! Word tokenizer
//!
//! A token is a run of non-whitespace characters followed by the whitespace
//! that trails it. Splits happen only where a non-whitespace run starts, so
//! joining the tokens gives back the input exactly. Leading whitespace, if
//! any, forms a token of its own.

/// Split `text` into word tokens.
pub fn tokenize(text: &str) -> Vec<&str> {
    let mut tokens = Vec::new();
    let mut start = 0;
    let mut prev_whitespace = false;

    for (i, c) in text.char_indices() {
        let whitespace = c.is_whitespace();
        if !whitespace && prev_whitespace && i > start {
            tokens.push(&text[start..i]);
            start = i;
        }
        prev_whitespace = whitespace;
    }

    if start < text.len() {
        tokens.push(&text[start..]);
    }
    tokens
}

/// Length of a token in characters, the unit of document positions.
pub fn token_len(token: &str) -> usize {
    token.chars().count()
}

/// The token without its trailing whitespace.
pub fn word(token: &str) -> &str {
    token.trim_end()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_tokenize_keeps_trailing_whitespace() {
        assert_eq!(tokenize("A cat jumped"), vec!["A ", "cat ", "jumped"]);
        assert_eq!(tokenize("one  two\n"), vec!["one  ", "two\n"]);
    }

    #[test]
    fn test_tokenize_leading_whitespace() {
        assert_eq!(tokenize("  lead"), vec!["  ", "lead"]);
        assert_eq!(tokenize("   "), vec!["   "]);
    }

    #[test]
    fn test_tokenize_empty() {
        assert!(tokenize("").is_empty());
    }

    #[test]
    fn test_tokenize_unicode() {
        assert_eq!(tokenize("héllo wörld"), vec!["héllo ", "wörld"]);
        assert_eq!(token_len("héllo "), 6);
        assert_eq!(word("héllo "), "héllo");
    }

    proptest! {
        #[test]
        fn prop_tokens_concatenate_to_input(s in "\\PC*") {
            prop_assert_eq!(tokenize(&s).concat(), s);
        }

        #[test]
        fn prop_no_inner_word_break(s in "[a-z \\t\\n]{0,40}") {
            for token in tokenize(&s) {
                let body = token.trim_start();
                // Whitespace inside a token is only ever trailing
                prop_assert_eq!(body.trim_end(), body.split_whitespace().next().unwrap_or(""));
            }
        }
    }
}
