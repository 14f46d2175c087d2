//! Pull parser host state
//!
//! `PullParser` owns everything a tokenizer needs besides the grammar: the
//! input source, the character buffer, the open-element stack and the
//! string cache. The tokenizer finds name windows in [`PullParser::buffer`]
//! and hands them back as `(offset, length)` pairs.

use std::sync::Arc;

use fos_intern::{CacheMetrics, InternCache, InternError};

use crate::buffers::{ElementFrame, ParserBuffers};
use crate::config::{CacheResetPolicy, ParserConfig};
use crate::error::{ParserError, Result};
use crate::feature::Feature;
use crate::source::{CharSource, Duplicable};

/// Position of the parser within a document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventType {
    StartDocument,
    StartTag,
    Text,
    EndTag,
    EndDocument,
}

/// Parser state over a character source `S`
#[derive(Debug)]
pub struct PullParser<S> {
    config: ParserConfig,
    source: Option<S>,
    cache: InternCache,
    buffers: ParserBuffers,
    event_type: EventType,
    process_namespaces: bool,
}

impl<S: CharSource> PullParser<S> {
    /// Create a parser with the default configuration
    pub fn new() -> Self {
        let config = ParserConfig::default();
        Self {
            process_namespaces: config.process_namespaces,
            config,
            source: None,
            cache: InternCache::new(),
            buffers: ParserBuffers::new(),
            event_type: EventType::StartDocument,
        }
    }

    pub fn with_config(config: ParserConfig) -> Result<Self> {
        if config.read_chunk == 0 {
            return Err(ParserError::ZeroReadChunk);
        }
        let mut cache = InternCache::with_config(config.cache)?;
        cache.set_interning_enabled(config.names_interned);
        Ok(Self {
            process_namespaces: config.process_namespaces,
            config,
            source: None,
            cache,
            buffers: ParserBuffers::new(),
            event_type: EventType::StartDocument,
        })
    }

    /// Report string cache activity into `metrics`
    pub fn with_metrics(mut self, metrics: Arc<dyn CacheMetrics>) -> Self {
        self.cache.set_metrics(Some(metrics));
        self
    }

    /// Begin a new document read from `source`
    pub fn set_input(&mut self, source: S) {
        self.source = Some(source);
        self.buffers.clear();
        self.event_type = EventType::StartDocument;
        if self.config.reset_policy == CacheResetPolicy::PerDocument {
            self.cache.reset();
        }
        tracing::debug!(cached = self.cache.len(), "parser input set");
    }

    /// Detach the current source
    pub fn take_input(&mut self) -> Option<S> {
        self.source.take()
    }

    /// Change a feature. Only allowed before the first event of a document.
    pub fn set_feature(&mut self, feature: Feature, state: bool) -> Result<()> {
        if self.event_type != EventType::StartDocument {
            return Err(ParserError::FeatureLocked {
                feature,
                event: self.event_type,
            });
        }
        match feature {
            Feature::NamesInterned => self.cache.set_interning_enabled(state),
            Feature::ProcessNamespaces => self.process_namespaces = state,
        }
        Ok(())
    }

    pub fn set_feature_by_uri(&mut self, uri: &str, state: bool) -> Result<()> {
        let feature =
            Feature::from_uri(uri).ok_or_else(|| ParserError::UnknownFeature(uri.to_string()))?;
        self.set_feature(feature, state)
    }

    pub fn feature(&self, feature: Feature) -> bool {
        match feature {
            Feature::NamesInterned => self.cache.is_interning_enabled(),
            Feature::ProcessNamespaces => self.process_namespaces,
        }
    }

    pub fn event_type(&self) -> EventType {
        self.event_type
    }

    /// Record the event the tokenizer just produced
    pub fn set_event_type(&mut self, event: EventType) {
        self.event_type = event;
    }

    /// Append the next chunk of input to the buffer. Returns 0 at end of
    /// input.
    pub fn fill_buffer(&mut self) -> Result<usize> {
        let source = self.source.as_mut().ok_or(ParserError::NoInput)?;
        source.read_chars(&mut self.buffers.buf, self.config.read_chunk)
    }

    pub fn buffer(&self) -> &[char] {
        &self.buffers.buf
    }

    /// Drop the first `len` buffered characters. Offsets of the remaining
    /// characters shift down by `len`.
    pub fn discard_buffer_prefix(&mut self, len: usize) {
        let len = len.min(self.buffers.buf.len());
        self.buffers.buf.drain(..len);
    }

    /// String for a window of the buffer, canonical while names are
    /// interned
    pub fn new_string(&mut self, offset: usize, length: usize) -> Result<Arc<str>> {
        Ok(self.cache.intern_or_create(&self.buffers.buf, offset, length)?)
    }

    /// Open an element named by a buffer window
    pub fn push_element(&mut self, offset: usize, length: usize) -> Result<Arc<str>> {
        let raw_name: Box<[char]> = self.window(offset, length)?.into();
        let colon = raw_name.iter().position(|&c| c == ':').filter(|&p| p > 0);

        let (prefix, name) = match colon {
            Some(p) if self.process_namespaces => {
                let prefix = self.new_string(offset, p)?;
                let local = self.new_string(offset + p + 1, length - p - 1)?;
                (Some(prefix), local)
            }
            _ => (None, self.new_string(offset, length)?),
        };

        self.buffers.elements.push(ElementFrame {
            raw_name,
            name: Arc::clone(&name),
            prefix,
            namespace_count: self.buffers.namespace_prefixes.len(),
        });
        self.buffers.attribute_names.clear();
        self.event_type = EventType::StartTag;
        Ok(name)
    }

    /// Close the innermost element. The window holds the end tag name and
    /// must match the start tag exactly.
    pub fn pop_element(&mut self, offset: usize, length: usize) -> Result<Arc<str>> {
        let found = self.window(offset, length)?;
        let open = self.buffers.elements.last().ok_or(ParserError::StackUnderflow)?;
        if *open.raw_name != *found {
            return Err(ParserError::MismatchedEndTag {
                expected: open.raw_name.iter().collect(),
                found: found.iter().collect(),
            });
        }

        let frame = self.buffers.elements.pop().ok_or(ParserError::StackUnderflow)?;
        self.buffers.namespace_prefixes.truncate(frame.namespace_count);
        self.event_type = EventType::EndTag;
        Ok(frame.name)
    }

    /// Record an attribute name of the current start tag
    pub fn add_attribute(&mut self, offset: usize, length: usize) -> Result<Arc<str>> {
        let name = self.new_string(offset, length)?;
        self.buffers.attribute_names.push(Arc::clone(&name));
        Ok(name)
    }

    /// Bring a namespace prefix into scope for the current element
    pub fn declare_prefix(&mut self, offset: usize, length: usize) -> Result<Arc<str>> {
        let prefix = self.new_string(offset, length)?;
        self.buffers.namespace_prefixes.push(Arc::clone(&prefix));
        Ok(prefix)
    }

    pub fn depth(&self) -> usize {
        self.buffers.depth()
    }

    /// Name of the innermost open element
    pub fn current_name(&self) -> Option<&Arc<str>> {
        self.buffers.elements.last().map(|frame| &frame.name)
    }

    pub fn current_prefix(&self) -> Option<&Arc<str>> {
        self.buffers.elements.last().and_then(|frame| frame.prefix.as_ref())
    }

    pub fn attribute_names(&self) -> &[Arc<str>] {
        &self.buffers.attribute_names
    }

    pub fn namespace_prefixes(&self) -> &[Arc<str>] {
        &self.buffers.namespace_prefixes
    }

    pub fn cache(&self) -> &InternCache {
        &self.cache
    }

    pub fn reset_cache(&mut self) {
        self.cache.reset();
    }

    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    /// Independent copy of this parser, positioned at the same point.
    ///
    /// Fails without copying anything if the source cannot be duplicated.
    pub fn try_clone(&self) -> Result<Self> {
        let source = self.source.as_ref().map(Duplicable::duplicate).transpose()?;
        tracing::debug!(
            depth = self.depth(),
            cached = self.cache.len(),
            "parser cloned"
        );
        Ok(Self {
            config: self.config.clone(),
            source,
            cache: self.cache.clone(),
            buffers: self.buffers.clone(),
            event_type: self.event_type,
            process_namespaces: self.process_namespaces,
        })
    }

    fn window(&self, offset: usize, length: usize) -> Result<&[char]> {
        let buf = &self.buffers.buf;
        buf.get(offset..)
            .and_then(|rest| rest.get(..length))
            .ok_or(ParserError::Cache(InternError::InvalidWindow {
                offset,
                length,
                buffer_len: buf.len(),
            }))
    }
}

impl<S: CharSource> Default for PullParser<S> {
    fn default() -> Self {
        Self::new()
    }
}
