//! HTML tag trees with lazy resolution, pretty serialization, and hoisted
//! asset dependencies.
//!
//! potluck provides:
//! - **Tag trees**: [`Element`], [`Fragment`] and [`Node`], built from anything
//!   convertible into a [`Child`] and flattened on the way in
//! - **Lazy content**: [`Tagifiable`] values resolved by `tagify()` into an
//!   independent tree
//! - **Serialization**: indented HTML with text and attribute escaping
//! - **Dependencies**: script, stylesheet and head assets that travel inside
//!   the tree and are hoisted into `<head>` when a [`Document`] is rendered
//!
//! # Example
//!
//! ```rust
//! use potluck::{Dependency, DependencySource, Document, Element};
//!
//! let widget = Dependency::new("widget", "1.2")?
//!     .with_source(DependencySource::local("assets"))
//!     .with_script([("src", "widget.js")])?;
//!
//! let doc = Document::new(Element::new("div").with_child("Hello").with_child(widget));
//! let rendered = doc.render(Some("lib"))?;
//!
//! assert!(rendered.html.contains("<script src=\"lib/widget-1.2/widget.js\"></script>"));
//! assert!(rendered.html.ends_with("<body>\n    <div>Hello</div>\n  </body>\n</html>"));
//! # Ok::<(), potluck::Error>(())
//! ```

mod tracing_macros;

pub mod attrs;
pub mod dependency;
pub mod document;
pub mod dom;
mod error;
pub mod serialize;
pub mod text;
pub mod version;

pub use attrs::{AttrTable, AttrValue};
pub use dependency::{
    AttrMap, Dependency, DependencySource, DependencySpec, SourceSpec, collect_dependencies,
    head_content, resolve_dependencies,
};
pub use document::{Document, RenderedHtml, SaveOptions};
pub use dom::{Child, Element, Fragment, Metadata, Node, Shared, Tagifiable, flatten, walk_mutate};
pub use error::{Error, Result};
pub use serialize::SerializeOptions;
pub use text::{Text, html};
pub use version::Version;
