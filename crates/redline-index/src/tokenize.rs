//! Tokenizer shared by indexing and querying.
//!
//! A token is a maximal run of alphanumeric characters, lowercased. Its
//! offset is the character offset of its first character in the original
//! text.

use std::iter::Peekable;
use std::str::Chars;

/// A token and where it starts.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Token {
    /// Lowercased token text.
    pub text: String,
    /// Character offset of the first character.
    pub offset: usize,
    /// Length of the source run, in characters.
    pub len: usize,
}

/// Iterator over the tokens of a string.
pub struct Tokens<'a> {
    chars: Peekable<Chars<'a>>,
    position: usize,
}

impl<'a> Iterator for Tokens<'a> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        // Skip separators.
        while let Some(c) = self.chars.peek() {
            if c.is_alphanumeric() {
                break;
            }
            self.chars.next();
            self.position += 1;
        }

        let offset = self.position;
        let mut text = String::new();
        while let Some(&c) = self.chars.peek() {
            if !c.is_alphanumeric() {
                break;
            }
            text.extend(c.to_lowercase());
            self.chars.next();
            self.position += 1;
        }

        if text.is_empty() {
            None
        } else {
            Some(Token {
                text,
                offset,
                len: self.position - offset,
            })
        }
    }
}

/// Tokenize `text`.
pub fn tokenize(text: &str) -> Tokens<'_> {
    Tokens {
        chars: text.chars().peekable(),
        position: 0,
    }
}

/// Normalize a single term the way the tokenizer would.
///
/// Returns `None` if `term` does not consist of exactly one token.
pub fn normalize(term: &str) -> Option<String> {
    let mut tokens = tokenize(term);
    let first = tokens.next()?;
    match tokens.next() {
        Some(_) => None,
        None => Some(first.text),
    }
}
