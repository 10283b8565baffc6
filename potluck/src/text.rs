//! Text - compact string type for text nodes and attribute values.

use compact_str::{CompactString, ToCompactString, format_compact};
use std::borrow::Borrow;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::Deref;

/// Text content for a node or an attribute value.
///
/// `Plain` text is escaped when serialized; `Html` is raw markup written out
/// verbatim.
#[derive(Clone)]
pub enum Text {
    Plain(CompactString),
    Html(CompactString),
}

/// Mark a string as raw HTML so it is never escaped.
pub fn html(s: impl AsRef<str>) -> Text {
    Text::Html(CompactString::new(s.as_ref()))
}

impl Text {
    pub fn new() -> Self {
        Self::Plain(CompactString::default())
    }

    pub fn plain(s: impl AsRef<str>) -> Self {
        Self::Plain(CompactString::new(s.as_ref()))
    }

    /// Plain text for a float. Whole numbers keep one decimal (`1.0`, not `1`).
    pub fn float(n: f64) -> Self {
        if n.is_finite() && n.fract() == 0.0 {
            Self::Plain(format_compact!("{n:.1}"))
        } else {
            Self::Plain(n.to_compact_string())
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Plain(s) | Self::Html(s) => s.as_str(),
        }
    }

    /// Whether this text is raw HTML.
    pub fn is_html(&self) -> bool {
        matches!(self, Self::Html(_))
    }

    pub fn is_empty(&self) -> bool {
        self.as_str().is_empty()
    }

    pub fn len(&self) -> usize {
        self.as_str().len()
    }

    /// Append to this text, keeping its plain/raw marking.
    pub fn push_str(&mut self, s: &str) {
        match self {
            Self::Plain(existing) | Self::Html(existing) => existing.push_str(s),
        }
    }
}

impl Default for Text {
    fn default() -> Self {
        Self::new()
    }
}

impl Deref for Text {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        self.as_str()
    }
}

impl AsRef<str> for Text {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl Borrow<str> for Text {
    fn borrow(&self) -> &str {
        self.as_str()
    }
}

impl PartialEq for Text {
    fn eq(&self, other: &Self) -> bool {
        self.is_html() == other.is_html() && self.as_str() == other.as_str()
    }
}

impl Eq for Text {}

impl PartialEq<str> for Text {
    fn eq(&self, other: &str) -> bool {
        self.as_str() == other
    }
}

impl PartialEq<&str> for Text {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == *other
    }
}

impl Hash for Text {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.is_html().hash(state);
        self.as_str().hash(state);
    }
}

impl fmt::Debug for Text {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Plain(s) => fmt::Debug::fmt(s.as_str(), f),
            Self::Html(s) => write!(f, "html({:?})", s.as_str()),
        }
    }
}

impl fmt::Display for Text {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self.as_str(), f)
    }
}

impl From<&str> for Text {
    fn from(s: &str) -> Self {
        Self::Plain(CompactString::new(s))
    }
}

impl From<String> for Text {
    fn from(s: String) -> Self {
        Self::Plain(CompactString::from(s))
    }
}

impl From<&String> for Text {
    fn from(s: &String) -> Self {
        Self::Plain(CompactString::new(s))
    }
}

impl From<CompactString> for Text {
    fn from(s: CompactString) -> Self {
        Self::Plain(s)
    }
}
