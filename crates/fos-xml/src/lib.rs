//! fOS XML
//!
//! Host state for a streaming pull parser: input sources, per-document
//! buffers, feature flags and the name cache. Tokenizing itself is left to
//! the caller, which reports name windows found in the parser buffer.
//!
//! # Example
//! ```
//! use fos_xml::{PullParser, StrSource};
//!
//! let mut parser = PullParser::new();
//! parser.set_input(StrSource::new("<item><item>"));
//! parser.fill_buffer().unwrap();
//!
//! let outer = parser.push_element(1, 4).unwrap();
//! let inner = parser.push_element(7, 4).unwrap();
//! assert!(std::sync::Arc::ptr_eq(&outer, &inner));
//! ```

mod buffers;
mod config;
mod error;
mod feature;
mod parser;
mod source;

pub use config::{CacheResetPolicy, ParserConfig};
pub use error::{DuplicateError, ParserError, Result};
pub use feature::Feature;
pub use parser::{EventType, PullParser};
pub use source::{CharSource, Duplicable, ReaderSource, StrSource};

// Re-export the cache crate for hosts that configure it directly
pub use fos_intern as intern;
