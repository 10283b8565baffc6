//! Serializer for resolved tag trees.
//!
//! Output follows a fixed pretty-printing layout:
//!
//! - Two spaces of indentation per level
//! - Void elements without children self-close (`<br/>`)
//! - An element whose only visible child is text stays on one line
//! - Metadata nodes are skipped entirely
//! - Plain text and attribute values are escaped (`&`, `<`, `>` and `"` at
//!   least); raw HTML is written verbatim
//!
//! Trees must be resolved with `tagify()` first; a lazy node is an error.

use std::fmt::Write;

use crate::dom::{Element, Fragment, Node};
use crate::error::{Error, Result};
use crate::text::Text;

/// Options for HTML serialization.
#[derive(Clone, Debug)]
pub struct SerializeOptions {
    /// Indentation level of the outermost node (default: 0)
    pub indent: usize,
    /// Line separator (default: "\n")
    pub eol: String,
}

impl Default for SerializeOptions {
    fn default() -> Self {
        Self {
            indent: 0,
            eol: "\n".to_string(),
        }
    }
}

impl SerializeOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start at the given indentation level.
    pub fn at_indent(mut self, indent: usize) -> Self {
        self.indent = indent;
        self
    }

    /// Use a custom line separator.
    pub fn with_eol(mut self, eol: impl Into<String>) -> Self {
        self.eol = eol.into();
        self
    }
}

/// Serialize a single node to an HTML string.
pub fn serialize_node(node: &Node, opts: &SerializeOptions) -> Result<String> {
    let mut out = String::new();
    let mut ser = Serializer::new(&mut out, opts);
    ser.write_node(node)?;
    Ok(out)
}

/// Serialize an element and its children to an HTML string.
pub fn serialize_element(elem: &Element, opts: &SerializeOptions) -> Result<String> {
    let mut out = String::new();
    let mut ser = Serializer::new(&mut out, opts);
    ser.write_element(elem)?;
    Ok(out)
}

/// Serialize a fragment's visible children, one per line.
pub fn serialize_fragment(frag: &Fragment, opts: &SerializeOptions) -> Result<String> {
    let mut out = String::new();
    let mut ser = Serializer::new(&mut out, opts);
    ser.write_children(frag)?;
    Ok(out)
}

/// Elements written as `<name/>` when they have no visible children.
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "command", "embed", "hr", "img", "input", "keygen", "link",
    "meta", "param", "source", "track", "wbr",
];

/// Check if a tag is a void element.
pub fn is_void_element(tag: &str) -> bool {
    VOID_ELEMENTS.contains(&tag)
}

/// Escape text content.
pub fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    push_text_escaped(&mut out, text);
    out
}

/// Escape an attribute value.
pub fn escape_attr(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    push_attr_escaped(&mut out, text);
    out
}

fn push_text_escaped(out: &mut String, text: &str) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
}

fn push_attr_escaped(out: &mut String, text: &str) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            '\r' => out.push_str("&#13;"),
            '\n' => out.push_str("&#10;"),
            _ => out.push(c),
        }
    }
}

struct Serializer<'a, W: Write> {
    out: &'a mut W,
    options: &'a SerializeOptions,
    depth: usize,
}

impl<'a, W: Write> Serializer<'a, W> {
    fn new(out: &'a mut W, options: &'a SerializeOptions) -> Self {
        Self {
            out,
            options,
            depth: options.indent,
        }
    }

    fn write_indent(&mut self) {
        for _ in 0..self.depth {
            let _ = write!(self.out, "  ");
        }
    }

    fn write_eol(&mut self) {
        let _ = write!(self.out, "{}", self.options.eol);
    }

    fn write_text(&mut self, text: &Text) {
        match text {
            Text::Html(raw) => {
                let _ = write!(self.out, "{}", raw);
            }
            Text::Plain(plain) => {
                let _ = write!(self.out, "{}", escape_text(plain));
            }
        }
    }

    fn write_attr(&mut self, name: &str, value: &Text) {
        let _ = write!(self.out, " {}=\"", name);
        match value {
            Text::Html(raw) => {
                let _ = write!(self.out, "{}", raw);
            }
            Text::Plain(plain) => {
                let _ = write!(self.out, "{}", escape_attr(plain));
            }
        }
        let _ = write!(self.out, "\"");
    }

    fn write_element(&mut self, elem: &Element) -> Result<()> {
        let tag = &elem.name;

        // Opening tag
        self.write_indent();
        let _ = write!(self.out, "<{}", tag);
        for (name, value) in &elem.attrs {
            self.write_attr(name, value);
        }

        let mut visible = elem.children.visible();
        let first = visible.next();
        let second = visible.next();

        match (first, second) {
            (None, _) if is_void_element(tag) => {
                let _ = write!(self.out, "/>");
            }
            (None, _) => {
                let _ = write!(self.out, "></{}>", tag);
            }
            (Some(Node::Text(text)), None) => {
                let _ = write!(self.out, ">");
                self.write_text(text);
                let _ = write!(self.out, "</{}>", tag);
            }
            _ => {
                let _ = write!(self.out, ">");
                self.write_eol();
                self.depth += 1;
                let result = self.write_children(&elem.children);
                self.depth -= 1;
                result?;
                self.write_eol();
                self.write_indent();
                let _ = write!(self.out, "</{}>", tag);
            }
        }
        Ok(())
    }

    fn write_children(&mut self, children: &Fragment) -> Result<()> {
        for (i, child) in children.visible().enumerate() {
            if i > 0 {
                self.write_eol();
            }
            self.write_node(child)?;
        }
        Ok(())
    }

    fn write_node(&mut self, node: &Node) -> Result<()> {
        match node {
            Node::Element(elem) => self.write_element(&elem.borrow()),
            Node::Text(text) => {
                self.write_indent();
                self.write_text(text);
                Ok(())
            }
            Node::Metadata(_) => Ok(()),
            Node::Lazy(_) => Err(Error::UnresolvedLazy),
        }
    }
}

// =============================================================================
// Convenience methods
// =============================================================================

impl Element {
    /// Serialize this element to an HTML string with default options.
    pub fn to_html(&self) -> Result<String> {
        serialize_element(self, &SerializeOptions::default())
    }

    /// Serialize this element with custom options.
    pub fn to_html_with_options(&self, opts: &SerializeOptions) -> Result<String> {
        serialize_element(self, opts)
    }
}

impl Fragment {
    /// Serialize this fragment to an HTML string with default options.
    pub fn to_html(&self) -> Result<String> {
        serialize_fragment(self, &SerializeOptions::default())
    }

    /// Serialize this fragment with custom options.
    pub fn to_html_with_options(&self, opts: &SerializeOptions) -> Result<String> {
        serialize_fragment(self, opts)
    }
}

impl Node {
    /// Serialize this node to an HTML string with default options.
    pub fn to_html(&self) -> Result<String> {
        serialize_node(self, &SerializeOptions::default())
    }

    /// Serialize this node with custom options.
    pub fn to_html_with_options(&self, opts: &SerializeOptions) -> Result<String> {
        serialize_node(self, opts)
    }
}

// =============================================================================
// Tests
// =============================================================================
