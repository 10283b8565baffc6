//! Element attributes.
//!
//! Names are normalized on the way in (`class_` -> `class`, `data_x` -> `data-x`),
//! values are coerced from a closed set of accepted kinds, and insertion order is
//! preserved for serialization.

use compact_str::{CompactString, ToCompactString};
use indexmap::IndexMap;

use crate::text::Text;

/// A value that can be assigned to an attribute.
#[derive(Debug, Clone, PartialEq)]
pub enum AttrValue {
    /// No value; the attribute is removed.
    Null,
    /// `true` is written as an empty value, `false` removes the attribute.
    Bool(bool),
    Int(i128),
    Float(f64),
    Str(CompactString),
    /// Raw HTML, never escaped.
    Html(CompactString),
}

impl AttrValue {
    /// Coerce to the stored form, or `None` when the attribute should be absent.
    pub fn normalize(self) -> Option<Text> {
        match self {
            AttrValue::Null | AttrValue::Bool(false) => None,
            AttrValue::Bool(true) => Some(Text::new()),
            AttrValue::Int(n) => Some(Text::Plain(n.to_compact_string())),
            AttrValue::Float(n) => Some(Text::float(n)),
            AttrValue::Str(s) => Some(Text::Plain(s)),
            AttrValue::Html(s) => Some(Text::Html(s)),
        }
    }
}

impl From<&str> for AttrValue {
    fn from(s: &str) -> Self {
        AttrValue::Str(CompactString::new(s))
    }
}

impl From<String> for AttrValue {
    fn from(s: String) -> Self {
        AttrValue::Str(CompactString::from(s))
    }
}

impl From<&String> for AttrValue {
    fn from(s: &String) -> Self {
        AttrValue::Str(CompactString::new(s))
    }
}

impl From<Text> for AttrValue {
    fn from(t: Text) -> Self {
        match t {
            Text::Plain(s) => AttrValue::Str(s),
            Text::Html(s) => AttrValue::Html(s),
        }
    }
}

impl From<bool> for AttrValue {
    fn from(b: bool) -> Self {
        AttrValue::Bool(b)
    }
}

impl From<f64> for AttrValue {
    fn from(n: f64) -> Self {
        AttrValue::Float(n)
    }
}

impl From<f32> for AttrValue {
    fn from(n: f32) -> Self {
        AttrValue::Float(n.into())
    }
}

macro_rules! int_attr_value {
    ($($t:ty),*) => {
        $(
            impl From<$t> for AttrValue {
                fn from(n: $t) -> Self {
                    AttrValue::Int(n as i128)
                }
            }
        )*
    };
}

int_attr_value!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

impl<T: Into<AttrValue>> From<Option<T>> for AttrValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(AttrValue::Null, Into::into)
    }
}

/// Normalize an attribute name: drop one trailing underscore, turn the
/// remaining underscores into hyphens, and lowercase.
pub fn normalize_attr_name(name: &str) -> CompactString {
    let name = name.strip_suffix('_').unwrap_or(name);
    name.chars()
        .map(|c| if c == '_' { '-' } else { c })
        .flat_map(char::to_lowercase)
        .collect()
}

/// Ordered attributes of an element, keyed by normalized name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttrTable {
    entries: IndexMap<CompactString, Text>,
}

impl AttrTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table by setting each pair in order.
    pub fn collect_from<I, K, V>(iter: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<AttrValue>,
    {
        let mut attrs = Self::new();
        attrs.merge(iter);
        attrs
    }

    /// Set an attribute. Absent values (`None`, `false`) remove the entry.
    pub fn set(&mut self, name: impl AsRef<str>, value: impl Into<AttrValue>) {
        let name = normalize_attr_name(name.as_ref());
        match value.into().normalize() {
            Some(value) => {
                self.entries.insert(name, value);
            }
            None => {
                self.entries.shift_remove(&name);
            }
        }
    }

    /// Set every pair in order. Existing keys keep their position.
    pub fn merge<I, K, V>(&mut self, iter: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<AttrValue>,
    {
        for (name, value) in iter {
            self.set(name, value);
        }
    }

    /// Merge another, already-normalized table into this one.
    pub fn extend_from(&mut self, other: &AttrTable) {
        for (name, value) in &other.entries {
            self.entries.insert(name.clone(), value.clone());
        }
    }

    /// Get an attribute by its normalized name.
    pub fn get(&self, name: &str) -> Option<&Text> {
        self.entries.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Remove an attribute by its normalized name, keeping the others in order.
    pub fn remove(&mut self, name: &str) -> Option<Text> {
        self.entries.shift_remove(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Text)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<'a> IntoIterator for &'a AttrTable {
    type Item = (&'a CompactString, &'a Text);
    type IntoIter = indexmap::map::Iter<'a, CompactString, Text>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
