//! Input Sources
//!
//! A parser reads characters from a [`CharSource`]. Whether a parser can be
//! cloned depends on its source: every source states through
//! [`Duplicable`] whether it can hand out an independent copy of itself.

use std::io::{ErrorKind, Read};
use std::sync::Arc;

use crate::error::{DuplicateError, ParserError, Result};

/// Capability to produce an independent copy positioned at the same point
pub trait Duplicable: Sized {
    fn duplicate(&self) -> std::result::Result<Self, DuplicateError>;
}

/// Character stream feeding a parser buffer
pub trait CharSource: Duplicable {
    /// Append up to `max` characters to `out`, returning how many were
    /// appended. Returns 0 at end of input.
    fn read_chars(&mut self, out: &mut Vec<char>, max: usize) -> Result<usize>;
}

/// In-memory text. Copies share the text and keep their own position.
#[derive(Debug, Clone)]
pub struct StrSource {
    chars: Arc<[char]>,
    pos: usize,
}

impl StrSource {
    pub fn new(text: &str) -> Self {
        Self {
            chars: text.chars().collect(),
            pos: 0,
        }
    }

    /// Characters not yet read
    pub fn remaining(&self) -> usize {
        self.chars.len() - self.pos
    }
}

impl From<&str> for StrSource {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

impl Duplicable for StrSource {
    fn duplicate(&self) -> std::result::Result<Self, DuplicateError> {
        Ok(self.clone())
    }
}

impl CharSource for StrSource {
    fn read_chars(&mut self, out: &mut Vec<char>, max: usize) -> Result<usize> {
        let end = self.pos.saturating_add(max).min(self.chars.len());
        out.extend_from_slice(&self.chars[self.pos..end]);
        let read = end - self.pos;
        self.pos = end;
        Ok(read)
    }
}

const READ_BLOCK: usize = 4096;

/// UTF-8 byte stream. Sequences split across reads are carried over.
///
/// Streams cannot be rewound, so this source is never duplicable.
#[derive(Debug)]
pub struct ReaderSource<R> {
    reader: R,
    pending: Vec<u8>,
    consumed: u64,
    eof: bool,
}

impl<R: Read> ReaderSource<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            pending: Vec::new(),
            consumed: 0,
            eof: false,
        }
    }

    pub fn into_inner(self) -> R {
        self.reader
    }

    /// Move up to `limit` complete characters from `pending` into `out`
    fn decode_pending(&mut self, out: &mut Vec<char>, limit: usize) -> Result<usize> {
        let valid = match std::str::from_utf8(&self.pending) {
            Ok(text) => text.len(),
            Err(err) if err.valid_up_to() == 0 && err.error_len().is_some() => {
                return Err(ParserError::InvalidUtf8 { offset: self.consumed });
            }
            Err(err) => err.valid_up_to(),
        };
        let text = std::str::from_utf8(&self.pending[..valid])
            .map_err(|_| ParserError::InvalidUtf8 { offset: self.consumed })?;

        let mut bytes = 0;
        let mut count = 0;
        for c in text.chars().take(limit) {
            out.push(c);
            bytes += c.len_utf8();
            count += 1;
        }
        self.pending.drain(..bytes);
        self.consumed += bytes as u64;
        Ok(count)
    }

    fn refill(&mut self) -> Result<()> {
        let mut block = [0u8; READ_BLOCK];
        let n = loop {
            match self.reader.read(&mut block) {
                Ok(n) => break n,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(err.into()),
            }
        };
        if n == 0 {
            self.eof = true;
        } else {
            self.pending.extend_from_slice(&block[..n]);
        }
        Ok(())
    }
}

impl<R> Duplicable for ReaderSource<R> {
    fn duplicate(&self) -> std::result::Result<Self, DuplicateError> {
        Err(DuplicateError {
            kind: "ReaderSource",
            reason: "byte streams cannot be copied".to_string(),
        })
    }
}

impl<R: Read> CharSource for ReaderSource<R> {
    fn read_chars(&mut self, out: &mut Vec<char>, max: usize) -> Result<usize> {
        let mut produced = 0;
        while produced < max {
            let taken = self.decode_pending(out, max - produced)?;
            produced += taken;
            if taken > 0 {
                continue;
            }
            if self.eof {
                if !self.pending.is_empty() {
                    return Err(ParserError::InvalidUtf8 { offset: self.consumed });
                }
                break;
            }
            self.refill()?;
        }
        Ok(produced)
    }
}
