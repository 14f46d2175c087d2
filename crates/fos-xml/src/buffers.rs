//! Parser Buffers
//!
//! Everything a parser owns per document lives in one record, so copying a
//! parser's state is a single `clone()` of [`ParserBuffers`].

use std::sync::Arc;

/// One open element
#[derive(Debug, Clone)]
pub(crate) struct ElementFrame {
    /// Name characters exactly as they appeared in the start tag
    pub(crate) raw_name: Box<[char]>,
    /// Local name, or the full name when namespaces are not processed
    pub(crate) name: Arc<str>,
    pub(crate) prefix: Option<Arc<str>>,
    /// Declared prefixes in scope before this element opened
    pub(crate) namespace_count: usize,
}

/// Owned parser state for the current document
#[derive(Debug, Clone, Default)]
pub(crate) struct ParserBuffers {
    /// Characters read from the input source
    pub(crate) buf: Vec<char>,
    pub(crate) elements: Vec<ElementFrame>,
    /// Attribute names of the most recent start tag
    pub(crate) attribute_names: Vec<Arc<str>>,
    pub(crate) namespace_prefixes: Vec<Arc<str>>,
}

impl ParserBuffers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop all per-document state, keeping allocations
    pub fn clear(&mut self) {
        self.buf.clear();
        self.elements.clear();
        self.attribute_names.clear();
        self.namespace_prefixes.clear();
    }

    /// Number of open elements
    pub fn depth(&self) -> usize {
        self.elements.len()
    }
}
