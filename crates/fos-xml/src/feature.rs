//! Parser features

use std::fmt;

/// Toggles that may only change before the first event of a document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Feature {
    /// Names are returned as canonical shared strings (default: on)
    NamesInterned,
    /// Element names are split into prefix and local part (default: off)
    ProcessNamespaces,
}

impl Feature {
    pub const ALL: [Feature; 2] = [Feature::NamesInterned, Feature::ProcessNamespaces];

    pub const fn uri(self) -> &'static str {
        match self {
            Feature::NamesInterned => "http://xmlpull.org/v1/doc/features.html#names-interned",
            Feature::ProcessNamespaces => "http://xmlpull.org/v1/doc/features.html#process-namespaces",
        }
    }

    pub fn from_uri(uri: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.uri() == uri)
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.uri())
    }
}
