//! Full HTML documents.
//!
//! A [`Document`] wraps arbitrary content in `<html>`/`<head>`/`<body>`, pulls
//! every [`Dependency`] out of the tree, and writes the matching asset tags into
//! the head. Saving a document also copies the dependencies' files next to it.

use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use indexmap::IndexMap;

use crate::attrs::{AttrTable, AttrValue};
use crate::dependency::Dependency;
use crate::dom::{Child, Element, Fragment, Node};
use crate::error::{Error, Result};
use crate::tracing_macros::debug;

/// Options for [`Document::save_html`].
#[derive(Clone, Debug, Default)]
pub struct SaveOptions {
    /// Directory, relative to the saved file, that assets are copied into.
    /// Asset URLs in the markup carry the same prefix.
    pub lib_prefix: Option<String>,
    /// Root directory of each package named by a [`DependencySource`](crate::DependencySource)
    pub package_dirs: IndexMap<String, PathBuf>,
}

impl SaveOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_lib_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.lib_prefix = Some(prefix.into());
        self
    }

    pub fn with_package_dir(mut self, package: impl Into<String>, dir: impl Into<PathBuf>) -> Self {
        self.package_dirs.insert(package.into(), dir.into());
        self
    }
}

/// Rendered markup together with the dependencies it refers to.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedHtml {
    pub html: String,
    pub dependencies: Vec<Dependency>,
}

/// Content plus the attributes of the `<html>` element that will wrap it.
#[derive(Debug, Clone, Default)]
pub struct Document {
    pub content: Fragment,
    pub html_attrs: AttrTable,
}

impl Document {
    pub fn new(content: impl Into<Child>) -> Self {
        Self {
            content: Fragment::from_child(content),
            html_attrs: AttrTable::new(),
        }
    }

    /// Set an attribute on the `<html>` element.
    pub fn with_attr(mut self, name: impl AsRef<str>, value: impl Into<AttrValue>) -> Self {
        self.html_attrs.set(name, value);
        self
    }

    pub fn with_attrs<I, K, V>(mut self, attrs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<AttrValue>,
    {
        self.html_attrs.merge(attrs);
        self
    }

    pub fn append(&mut self, child: impl Into<Child>) {
        self.content.append(child);
    }

    /// The content's only node, if it is an element named `name`.
    fn sole_element(&self, name: &str) -> Option<Element> {
        if self.content.len() != 1 {
            return None;
        }
        match &self.content[0] {
            Node::Element(e) if e.borrow().name == name => Some(e.borrow().clone()),
            _ => None,
        }
    }

    /// Build the resolved `<html>` element with dependencies hoisted into its
    /// head.
    ///
    /// Content that is a single `<html>` element is used as the root, and a
    /// single `<body>` element as the body. Anything else is wrapped in a new
    /// `<body>`.
    pub fn assemble(&self, lib_prefix: Option<&str>) -> Result<Element> {
        if let Some(mut root) = self.sole_element("html") {
            root.attrs.extend_from(&self.html_attrs);
            return hoist_head_content(&root.tagify()?, lib_prefix);
        }

        let body = match self.sole_element("body") {
            Some(body) => body,
            None => Element::new("body").with_child(&self.content),
        };

        let mut root = Element::new("html");
        root.attrs = self.html_attrs.clone();
        root.append(Element::new("head"));
        root.append(body.tagify()?);
        hoist_head_content(&root, lib_prefix)
    }

    /// Render the complete document, starting with `<!DOCTYPE html>`.
    pub fn render(&self, lib_prefix: Option<&str>) -> Result<RenderedHtml> {
        let root = self.assemble(lib_prefix)?.render()?;
        Ok(RenderedHtml {
            html: format!("<!DOCTYPE html>\n{}", root.html),
            dependencies: root.dependencies,
        })
    }

    /// Render to `file` and copy every dependency's assets into the file's
    /// directory (below `lib_prefix`, if set). Returns the path written.
    pub fn save_html(&self, file: impl AsRef<Path>, options: &SaveOptions) -> Result<PathBuf> {
        let file = file.as_ref();
        let base = match file.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        let lib_dir = match options.lib_prefix.as_deref() {
            Some(prefix) if !prefix.is_empty() => base.join(prefix),
            _ => base,
        };

        let rendered = self.render(options.lib_prefix.as_deref())?;
        for dep in &rendered.dependencies {
            dep.copy_to(&lib_dir, options)?;
        }

        debug!(
            file = %file.display(),
            dependencies = rendered.dependencies.len(),
            "saving document"
        );
        fs::write(file, &rendered.html).map_err(|e| Error::io(file, e))?;
        Ok(file.to_path_buf())
    }
}

/// Copy `root` with a `<meta charset>` and every dependency's tags added to its
/// head. Neither `root` nor its existing head are modified.
fn hoist_head_content(root: &Element, lib_prefix: Option<&str>) -> Result<Element> {
    if root.name != "html" {
        return Err(Error::NotHtmlRoot {
            name: root.name.to_string(),
        });
    }
    let deps = root.dependencies();
    debug!(dependencies = deps.len(), "hoisting dependencies into <head>");

    let mut root = root.clone();
    let existing = root
        .children
        .iter()
        .enumerate()
        .find_map(|(i, node)| match node {
            Node::Element(e) if e.borrow().name == "head" => Some((i, Rc::clone(e))),
            _ => None,
        });

    let mut head = match &existing {
        Some((_, head)) => head.borrow().clone(),
        None => Element::new("head"),
    };
    head.insert(0, Element::new("meta").with_attr("charset", "utf-8"));
    for dep in &deps {
        head.append(dep.as_html_tags(lib_prefix));
    }

    match existing {
        Some((i, _)) => root.children[i] = Node::element(head),
        None => root.insert(0, head),
    }
    Ok(root)
}

impl Element {
    /// Resolve this element and serialize it, along with its dependencies.
    pub fn render(&self) -> Result<RenderedHtml> {
        let resolved = self.tagify()?;
        Ok(RenderedHtml {
            html: resolved.to_html()?,
            dependencies: resolved.dependencies(),
        })
    }

    /// Save this element as a standalone document, see [`Document::save_html`].
    pub fn save_html(&self, file: impl AsRef<Path>, options: &SaveOptions) -> Result<PathBuf> {
        Document::new(self.clone()).save_html(file, options)
    }
}

impl Fragment {
    /// Resolve this fragment and serialize it, along with its dependencies.
    pub fn render(&self) -> Result<RenderedHtml> {
        let resolved = self.tagify()?;
        Ok(RenderedHtml {
            html: resolved.to_html()?,
            dependencies: resolved.dependencies(),
        })
    }

    /// Save this fragment as a standalone document, see [`Document::save_html`].
    pub fn save_html(&self, file: impl AsRef<Path>, options: &SaveOptions) -> Result<PathBuf> {
        Document::new(self).save_html(file, options)
    }
}
