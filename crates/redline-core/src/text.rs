//! Character/byte offset conversion.
//!
//! Public offsets are counted in characters; slicing a `str` needs bytes.

use std::str::Chars;

/// Random-access conversion between character and byte offsets of one string.
pub(crate) struct CharOffsets {
    /// Byte offset of every character boundary, including the end.
    /// `None` when the content is ASCII and the two coincide.
    boundaries: Option<Vec<usize>>,
    byte_len: usize,
}

impl CharOffsets {
    pub(crate) fn new(content: &str) -> Self {
        let boundaries = if content.is_ascii() {
            None
        } else {
            Some(
                content
                    .char_indices()
                    .map(|(b, _)| b)
                    .chain(std::iter::once(content.len()))
                    .collect(),
            )
        };

        Self {
            boundaries,
            byte_len: content.len(),
        }
    }

    /// Length of the content in characters.
    pub(crate) fn char_len(&self) -> usize {
        match &self.boundaries {
            None => self.byte_len,
            Some(b) => b.len() - 1,
        }
    }

    /// Byte offset of a character offset. `char_idx` must be `<= char_len()`.
    pub(crate) fn to_byte(&self, char_idx: usize) -> usize {
        match &self.boundaries {
            None => char_idx,
            Some(b) => b[char_idx],
        }
    }

    /// Character offset of a byte offset lying on a character boundary.
    pub(crate) fn to_char(&self, byte_idx: usize) -> usize {
        match &self.boundaries {
            None => byte_idx,
            Some(b) => match b.binary_search(&byte_idx) {
                Ok(i) | Err(i) => i,
            },
        }
    }
}

/// Forward-only character to byte cursor.
pub(crate) struct ByteCursor<'a> {
    chars: Chars<'a>,
    char_pos: usize,
    byte_pos: usize,
}

impl<'a> ByteCursor<'a> {
    pub(crate) fn new(content: &'a str) -> Self {
        Self {
            chars: content.chars(),
            char_pos: 0,
            byte_pos: 0,
        }
    }

    /// Advance to `char_idx` and return its byte offset. Seeking backwards or
    /// past the end stays put.
    pub(crate) fn seek(&mut self, char_idx: usize) -> usize {
        while self.char_pos < char_idx {
            match self.chars.next() {
                Some(c) => {
                    self.byte_pos += c.len_utf8();
                    self.char_pos += 1;
                }
                None => break,
            }
        }
        self.byte_pos
    }
}
