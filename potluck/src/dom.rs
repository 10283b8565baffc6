//! Tag tree types.
//!
//! A tree is built from [`Element`]s and [`Fragment`]s whose children are
//! [`Node`]s. Element and metadata nodes are shared, mutable handles: cloning an
//! `Element` or `Fragment` is a *shallow* copy that gets a fresh attribute table
//! and child list but still points at the same child elements. [`Element::tagify`]
//! is the deep counterpart: it resolves lazy nodes and returns a tree that shares
//! nothing mutable with its source.
//!
//! # Example
//!
//! ```rust
//! use potluck::{Element, Fragment};
//!
//! let list = Element::new("ul")
//!     .with_attr("class_", "items")
//!     .with_children((1..=2).map(|n| Element::new("li").with_child(n)));
//!
//! assert_eq!(
//!     list.to_html().unwrap(),
//!     "<ul class=\"items\">\n  <li>1</li>\n  <li>2</li>\n</ul>"
//! );
//!
//! let frag = Fragment::from_child(["one", "two"]);
//! assert_eq!(frag.len(), 2);
//! ```

use compact_str::{CompactString, ToCompactString};
use std::cell::{Ref, RefCell};
use std::fmt;
use std::ops::{Index, IndexMut};
use std::rc::Rc;

use crate::attrs::{AttrTable, AttrValue, normalize_attr_name};
use crate::dependency::Dependency;
use crate::error::Result;
use crate::text::Text;

/// A mutable node handle shared between shallow copies of a tree.
pub type Shared<T> = Rc<RefCell<T>>;

fn share<T>(value: T) -> Shared<T> {
    Rc::new(RefCell::new(value))
}

/// Content that is only turned into concrete nodes when the tree is resolved.
pub trait Tagifiable {
    /// Produce the concrete node standing in for `self`.
    ///
    /// The returned node may itself contain lazy content; it is resolved in turn.
    fn tagify(&self) -> Result<Node>;
}

/// A child of an element or fragment.
#[derive(Clone)]
pub enum Node {
    /// Content resolved on demand, see [`Tagifiable`]
    Lazy(Rc<dyn Tagifiable>),
    /// An element node
    Element(Shared<Element>),
    /// An invisible side-channel node, such as a [`Dependency`]
    Metadata(Shared<Metadata>),
    /// A text node
    Text(Text),
}

impl Node {
    /// A plain (escaped) text node.
    pub fn text(text: impl Into<Text>) -> Self {
        Node::Text(text.into())
    }

    pub fn element(element: Element) -> Self {
        Node::Element(share(element))
    }

    pub fn metadata(metadata: Metadata) -> Self {
        Node::Metadata(share(metadata))
    }

    pub fn lazy(value: impl Tagifiable + 'static) -> Self {
        Node::Lazy(Rc::new(value))
    }

    pub fn is_element(&self) -> bool {
        matches!(self, Node::Element(_))
    }

    pub fn is_text(&self) -> bool {
        matches!(self, Node::Text(_))
    }

    pub fn is_metadata(&self) -> bool {
        matches!(self, Node::Metadata(_))
    }

    pub fn is_lazy(&self) -> bool {
        matches!(self, Node::Lazy(_))
    }

    pub fn as_element(&self) -> Option<&Shared<Element>> {
        match self {
            Node::Element(e) => Some(e),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&Text> {
        match self {
            Node::Text(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_metadata(&self) -> Option<&Shared<Metadata>> {
        match self {
            Node::Metadata(m) => Some(m),
            _ => None,
        }
    }

    /// Borrow the dependency carried by this node, if it is one.
    pub fn as_dependency(&self) -> Option<Ref<'_, Dependency>> {
        let meta = self.as_metadata()?;
        Ref::filter_map(meta.borrow(), Metadata::as_dependency).ok()
    }

    /// Resolve this node into an independent, fully concrete copy.
    pub fn tagify(&self) -> Result<Node> {
        match self {
            Node::Lazy(lazy) => lazy.tagify()?.tagify(),
            Node::Element(e) => Ok(Node::Element(share(e.borrow().tagify()?))),
            Node::Metadata(m) => Ok(Node::Metadata(share(m.borrow().deep_clone()))),
            Node::Text(t) => Ok(Node::Text(t.clone())),
        }
    }

    /// Copy the whole subtree without resolving anything. Lazy handles are shared.
    pub fn deep_clone(&self) -> Node {
        match self {
            Node::Lazy(lazy) => Node::Lazy(Rc::clone(lazy)),
            Node::Element(e) => Node::Element(share(e.borrow().deep_clone())),
            Node::Metadata(m) => Node::Metadata(share(m.borrow().deep_clone())),
            Node::Text(t) => Node::Text(t.clone()),
        }
    }
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Node::Lazy(a), Node::Lazy(b)) => Rc::ptr_eq(a, b),
            (Node::Element(a), Node::Element(b)) => a == b,
            (Node::Metadata(a), Node::Metadata(b)) => a == b,
            (Node::Text(a), Node::Text(b)) => a == b,
            _ => false,
        }
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::Lazy(_) => f.write_str("Lazy(..)"),
            Node::Element(e) => fmt::Debug::fmt(&*e.borrow(), f),
            Node::Metadata(m) => fmt::Debug::fmt(&*m.borrow(), f),
            Node::Text(t) => fmt::Debug::fmt(t, f),
        }
    }
}

impl From<Element> for Node {
    fn from(element: Element) -> Self {
        Node::element(element)
    }
}

impl From<Text> for Node {
    fn from(text: Text) -> Self {
        Node::Text(text)
    }
}

impl From<&str> for Node {
    fn from(s: &str) -> Self {
        Node::text(s)
    }
}

impl From<String> for Node {
    fn from(s: String) -> Self {
        Node::text(s)
    }
}

impl From<Dependency> for Node {
    fn from(dep: Dependency) -> Self {
        Node::metadata(Metadata::Dependency(dep))
    }
}

/// A node that is never rendered, carrying information alongside the tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Metadata {
    /// Assets the surrounding markup needs in the document head
    Dependency(Dependency),
    /// A named marker with no payload
    Marker(CompactString),
}

impl Metadata {
    pub fn as_dependency(&self) -> Option<&Dependency> {
        match self {
            Metadata::Dependency(dep) => Some(dep),
            Metadata::Marker(_) => None,
        }
    }

    pub fn as_dependency_mut(&mut self) -> Option<&mut Dependency> {
        match self {
            Metadata::Dependency(dep) => Some(dep),
            Metadata::Marker(_) => None,
        }
    }

    /// A copy that shares no mutable state with `self`.
    pub fn deep_clone(&self) -> Metadata {
        match self {
            Metadata::Dependency(dep) => Metadata::Dependency(dep.deep_clone()),
            Metadata::Marker(name) => Metadata::Marker(name.clone()),
        }
    }
}

/// Anything accepted where children are expected. Flattened into [`Node`]s.
#[derive(Clone, Debug)]
pub enum Child {
    Node(Node),
    Fragment(Fragment),
    Int(i128),
    Float(f64),
    /// Contributes nothing
    None,
    List(Vec<Child>),
}

impl Child {
    fn flatten_into(self, out: &mut Vec<Node>) {
        match self {
            Child::Node(node) => out.push(node),
            Child::Fragment(frag) => out.extend(frag.nodes),
            Child::Int(n) => out.push(Node::Text(Text::Plain(n.to_compact_string()))),
            Child::Float(n) => out.push(Node::Text(Text::float(n))),
            Child::None => {}
            Child::List(items) => {
                for item in items {
                    item.flatten_into(out);
                }
            }
        }
    }
}

/// Flatten arbitrarily nested children into a flat list of nodes, in order.
pub fn flatten(child: impl Into<Child>) -> Vec<Node> {
    let mut out = Vec::new();
    child.into().flatten_into(&mut out);
    out
}

impl From<Node> for Child {
    fn from(node: Node) -> Self {
        Child::Node(node)
    }
}

impl From<Element> for Child {
    fn from(element: Element) -> Self {
        Child::Node(Node::element(element))
    }
}

impl From<Shared<Element>> for Child {
    fn from(element: Shared<Element>) -> Self {
        Child::Node(Node::Element(element))
    }
}

impl From<Metadata> for Child {
    fn from(metadata: Metadata) -> Self {
        Child::Node(Node::metadata(metadata))
    }
}

impl From<Dependency> for Child {
    fn from(dep: Dependency) -> Self {
        Child::Node(Node::from(dep))
    }
}

impl From<Rc<dyn Tagifiable>> for Child {
    fn from(lazy: Rc<dyn Tagifiable>) -> Self {
        Child::Node(Node::Lazy(lazy))
    }
}

impl From<Fragment> for Child {
    fn from(frag: Fragment) -> Self {
        Child::Fragment(frag)
    }
}

impl From<&Fragment> for Child {
    fn from(frag: &Fragment) -> Self {
        Child::Fragment(frag.clone())
    }
}

impl From<Text> for Child {
    fn from(text: Text) -> Self {
        Child::Node(Node::Text(text))
    }
}

impl From<&str> for Child {
    fn from(s: &str) -> Self {
        Child::Node(Node::text(s))
    }
}

impl From<String> for Child {
    fn from(s: String) -> Self {
        Child::Node(Node::text(s))
    }
}

impl From<&String> for Child {
    fn from(s: &String) -> Self {
        Child::Node(Node::text(s))
    }
}

impl From<CompactString> for Child {
    fn from(s: CompactString) -> Self {
        Child::Node(Node::text(s))
    }
}

impl From<f64> for Child {
    fn from(n: f64) -> Self {
        Child::Float(n)
    }
}

impl From<f32> for Child {
    fn from(n: f32) -> Self {
        Child::Float(n.into())
    }
}

macro_rules! int_child {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Child {
                fn from(n: $t) -> Self {
                    Child::Int(n as i128)
                }
            }
        )*
    };
}

int_child!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

impl<T: Into<Child>> From<Option<T>> for Child {
    fn from(value: Option<T>) -> Self {
        value.map_or(Child::None, Into::into)
    }
}

impl<T: Into<Child>> From<Vec<T>> for Child {
    fn from(items: Vec<T>) -> Self {
        Child::List(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Child>, const N: usize> From<[T; N]> for Child {
    fn from(items: [T; N]) -> Self {
        Child::List(items.into_iter().map(Into::into).collect())
    }
}

/// An ordered list of sibling nodes with no enclosing tag.
///
/// Every way of adding children flattens its input first, so a fragment never
/// contains nested fragments, lists, or numbers.
#[derive(Clone, Default, PartialEq)]
pub struct Fragment {
    nodes: Vec<Node>,
}

impl Fragment {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a fragment from any (possibly nested) children.
    pub fn from_child(child: impl Into<Child>) -> Self {
        Self {
            nodes: flatten(child),
        }
    }

    /// Append children at the end.
    pub fn append(&mut self, child: impl Into<Child>) {
        self.nodes.extend(flatten(child));
    }

    /// Append each item of `children` at the end.
    pub fn extend<I, C>(&mut self, children: I)
    where
        I: IntoIterator<Item = C>,
        C: Into<Child>,
    {
        for child in children {
            self.append(child);
        }
    }

    /// Insert children before position `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index > len`.
    pub fn insert(&mut self, index: usize, child: impl Into<Child>) {
        let nodes = flatten(child);
        self.nodes.splice(index..index, nodes);
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Node> {
        self.nodes.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Node> {
        self.nodes.iter()
    }

    pub fn as_slice(&self) -> &[Node] {
        &self.nodes
    }

    /// Children that show up in serialized output (everything but metadata).
    pub fn visible(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter().filter(|n| !n.is_metadata())
    }

    /// Resolve every child into an independent, fully concrete copy.
    pub fn tagify(&self) -> Result<Fragment> {
        let nodes = self.nodes.iter().map(Node::tagify).collect::<Result<_>>()?;
        Ok(Fragment { nodes })
    }

    /// Copy the whole subtree without resolving anything.
    pub fn deep_clone(&self) -> Fragment {
        Fragment {
            nodes: self.nodes.iter().map(Node::deep_clone).collect(),
        }
    }
}

impl fmt::Debug for Fragment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(&self.nodes).finish()
    }
}

impl Index<usize> for Fragment {
    type Output = Node;

    fn index(&self, index: usize) -> &Node {
        &self.nodes[index]
    }
}

impl IndexMut<usize> for Fragment {
    fn index_mut(&mut self, index: usize) -> &mut Node {
        &mut self.nodes[index]
    }
}

impl<'a> IntoIterator for &'a Fragment {
    type Item = &'a Node;
    type IntoIter = std::slice::Iter<'a, Node>;

    fn into_iter(self) -> Self::IntoIter {
        self.nodes.iter()
    }
}

impl IntoIterator for Fragment {
    type Item = Node;
    type IntoIter = std::vec::IntoIter<Node>;

    fn into_iter(self) -> Self::IntoIter {
        self.nodes.into_iter()
    }
}

impl FromIterator<Node> for Fragment {
    fn from_iter<I: IntoIterator<Item = Node>>(iter: I) -> Self {
        Fragment {
            nodes: iter.into_iter().collect(),
        }
    }
}

/// An HTML element: a tag name, attributes, and children.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    /// The tag name, never empty
    pub name: CompactString,
    /// Attributes in insertion order
    pub attrs: AttrTable,
    /// Child nodes
    pub children: Fragment,
}

impl Element {
    /// Create an element with no attributes or children.
    ///
    /// # Panics
    ///
    /// Panics if `name` is empty.
    pub fn new(name: impl AsRef<str>) -> Self {
        let name = name.as_ref();
        assert!(!name.is_empty(), "element name must not be empty");
        Self {
            name: CompactString::new(name),
            attrs: AttrTable::new(),
            children: Fragment::new(),
        }
    }

    pub fn with_child(mut self, child: impl Into<Child>) -> Self {
        self.append(child);
        self
    }

    pub fn with_children<I, C>(mut self, children: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<Child>,
    {
        self.extend(children);
        self
    }

    pub fn with_attr(mut self, name: impl AsRef<str>, value: impl Into<AttrValue>) -> Self {
        self.set_attr(name, value);
        self
    }

    pub fn with_attrs<I, K, V>(mut self, attrs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<AttrValue>,
    {
        self.merge_attrs(attrs);
        self
    }

    /// Add more children and attributes, exactly as if they had been given
    /// when the element was built.
    pub fn call(&mut self, children: impl Into<Child>, attrs: &AttrTable) -> &mut Self {
        self.append(children);
        self.attrs.extend_from(attrs);
        self
    }

    pub fn append(&mut self, child: impl Into<Child>) {
        self.children.append(child);
    }

    pub fn extend<I, C>(&mut self, children: I)
    where
        I: IntoIterator<Item = C>,
        C: Into<Child>,
    {
        self.children.extend(children);
    }

    pub fn insert(&mut self, index: usize, child: impl Into<Child>) {
        self.children.insert(index, child);
    }

    pub fn set_attr(&mut self, name: impl AsRef<str>, value: impl Into<AttrValue>) {
        self.attrs.set(name, value);
    }

    pub fn merge_attrs<I, K, V>(&mut self, attrs: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<AttrValue>,
    {
        self.attrs.merge(attrs);
    }

    /// Get an attribute, normalizing `name` the same way setters do.
    pub fn get_attr(&self, name: &str) -> Option<&Text> {
        self.attrs.get(&normalize_attr_name(name))
    }

    /// Append a class to the `class` attribute.
    pub fn add_class(&mut self, class: &str) -> &mut Self {
        let value = match self.attrs.get("class") {
            Some(existing) if !existing.is_empty() => format!("{existing} {class}"),
            _ => class.to_string(),
        };
        self.attrs.set("class", value);
        self
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.attrs
            .get("class")
            .is_some_and(|existing| existing.split(' ').any(|c| c == class))
    }

    /// Wrap this element in a shared handle.
    pub fn into_shared(self) -> Shared<Element> {
        share(self)
    }

    /// A short description such as `<div#main.wide with 2 children>`.
    pub fn summary(&self) -> String {
        let mut out = format!("<{}", self.name);
        let mut others = self.attrs.len();
        if let Some(id) = self.attrs.get("id") {
            out.push('#');
            out.push_str(id);
            others -= 1;
        }
        if let Some(class) = self.attrs.get("class") {
            for c in class.split_whitespace() {
                out.push('.');
                out.push_str(c);
            }
            others -= 1;
        }
        out.push_str(" with ");
        if others > 0 {
            out.push_str(&format!("{others} other attributes and "));
        }
        let n = self.children.len();
        let noun = if n == 1 { "child" } else { "children" };
        out.push_str(&format!("{n} {noun}>"));
        out
    }

    /// Resolve the element into an independent, fully concrete copy.
    pub fn tagify(&self) -> Result<Element> {
        Ok(Element {
            name: self.name.clone(),
            attrs: self.attrs.clone(),
            children: self.children.tagify()?,
        })
    }

    /// Copy the whole subtree without resolving anything.
    pub fn deep_clone(&self) -> Element {
        Element {
            name: self.name.clone(),
            attrs: self.attrs.clone(),
            children: self.children.deep_clone(),
        }
    }
}

/// Apply `f` to `node`, then to each child of the result, depth first.
///
/// Children are replaced in place through their shared handles, so the changes
/// are visible from every tree holding those handles.
pub fn walk_mutate<F>(node: Node, f: &mut F) -> Node
where
    F: FnMut(Node) -> Node,
{
    let node = f(node);
    if let Node::Element(element) = &node {
        let len = element.borrow().children.len();
        for i in 0..len {
            let child = element.borrow().children[i].clone();
            let replaced = walk_mutate(child, f);
            element.borrow_mut().children[i] = replaced;
        }
    }
    node
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::html;
    use facet_testhelpers::test;
    use std::cell::Cell;

    struct Greeting(&'static str);

    impl Tagifiable for Greeting {
        fn tagify(&self) -> Result<Node> {
            Ok(Node::element(Element::new("em").with_child(self.0)))
        }
    }

    #[test]
    fn test_flatten_nested_numbers() {
        let nodes = flatten(vec![
            Child::from(1),
            Child::from(vec![Child::from(2), Child::from(vec![Child::from("3"), Child::from(4)])]),
        ]);
        assert_eq!(
            nodes,
            vec![Node::text("1"), Node::text("2"), Node::text("3"), Node::text("4")]
        );
    }

    #[test]
    fn test_flatten_drops_none_and_empty_containers() {
        let nodes = flatten(vec![
            Child::None,
            Child::List(vec![]),
            Child::Fragment(Fragment::new()),
            Child::from(Some("kept")),
            Child::from(None::<&str>),
        ]);
        assert_eq!(nodes, vec![Node::text("kept")]);
    }

    #[test]
    fn test_flatten_expands_fragments() {
        let inner = Fragment::from_child(vec![
            Child::from(Element::new("span").with_child(3)),
            Child::from(4),
        ]);
        let frag = Fragment::from_child(vec![
            Child::from(1),
            Child::from(Fragment::from_child(vec![Child::from(2), Child::from(inner)])),
        ]);
        assert_eq!(frag.len(), 4);
        assert_eq!(frag[0], Node::text("1"));
        assert_eq!(frag[1], Node::text("2"));
        assert_eq!(frag[2], Node::element(Element::new("span").with_child("3")));
        assert_eq!(frag[3], Node::text("4"));
    }

    #[test]
    fn test_fragment_insert_and_append() {
        let mut frag = Fragment::new();
        frag.append(Element::new("a"));
        frag.insert(0, Element::new("span"));
        frag.insert(1, vec!["x", "y"]);
        let names: Vec<String> = frag
            .iter()
            .map(|n| match n {
                Node::Element(e) => e.borrow().name.to_string(),
                Node::Text(t) => t.to_string(),
                _ => unreachable!(),
            })
            .collect();
        assert_eq!(names, vec!["span", "x", "y", "a"]);
    }

    #[test]
    fn test_construction_styles_agree() {
        let children = || {
            vec![
                Child::from(Element::new("h1").with_child("hello")),
                Child::from("text"),
                Child::None,
                Child::from(vec![Child::from("list"), Child::from(vec!["here"])]),
            ]
        };
        let attrs = [("class_", "foo"), ("for_", "bar"), ("id", "baz")];

        let x1 = Element::new("div").with_children(children()).with_attrs(attrs);

        let mut x2 = Element::new("div").with_attrs(attrs);
        x2.append(children());

        let mut x3 = Element::new("div");
        x3.call(children(), &AttrTable::collect_from(attrs));

        assert_eq!(x1, x2);
        assert_eq!(x2, x3);
        assert_eq!(x1.children.len(), 4);
    }

    #[test]
    fn test_classes() {
        let mut div = Element::new("div").with_attr("class_", "foo");
        div.add_class("bar");
        assert_eq!(div.get_attr("class").unwrap(), "foo bar");
        assert!(div.has_class("foo"));
        assert!(div.has_class("bar"));
        assert!(!div.has_class("missing"));

        let mut bare = Element::new("div");
        bare.add_class("only");
        assert_eq!(bare.get_attr("class").unwrap(), "only");
    }

    #[test]
    fn test_summary() {
        assert_eq!(Element::new("div").summary(), "<div with 0 children>");
        assert_eq!(
            Element::new("div").with_child("foo").summary(),
            "<div with 1 child>"
        );
        assert_eq!(
            Element::new("div")
                .with_children(["foo", "bar"])
                .with_attr("id", "id")
                .summary(),
            "<div#id with 2 children>"
        );
        assert_eq!(
            Element::new("div")
                .with_attrs([("id", "id"), ("class_", "foo bar")])
                .summary(),
            "<div#id.foo.bar with 0 children>"
        );
        assert_eq!(
            Element::new("div")
                .with_attrs([("id", "id"), ("class_", "cls"), ("foo", "bar")])
                .summary(),
            "<div#id.cls with 1 other attributes and 0 children>"
        );
    }

    #[test]
    fn test_tagify_resolves_lazy_children() {
        let div = Element::new("div").with_child(Node::lazy(Greeting("hi")));
        let resolved = div.tagify().unwrap();
        assert!(div.children[0].is_lazy());
        assert_eq!(
            resolved.children[0],
            Node::element(Element::new("em").with_child("hi"))
        );
    }

    /// Counts its resolutions. With `inner` set, it wraps a second lazy node.
    struct Counted {
        calls: Rc<Cell<usize>>,
        inner: Option<Rc<Cell<usize>>>,
    }

    impl Tagifiable for Counted {
        fn tagify(&self) -> Result<Node> {
            self.calls.set(self.calls.get() + 1);
            match &self.inner {
                Some(inner) => {
                    let nested = Node::lazy(Counted {
                        calls: Rc::clone(inner),
                        inner: None,
                    });
                    Ok(Node::element(Element::new("span").with_child(nested)))
                }
                None => Ok(Node::text("deep")),
            }
        }
    }

    fn has_lazy(node: &Node) -> bool {
        match node {
            Node::Lazy(_) => true,
            Node::Element(e) => e.borrow().children.iter().any(has_lazy),
            _ => false,
        }
    }

    #[test]
    fn test_lazy_resolved_once_per_occurrence() {
        let outer = Rc::new(Cell::new(0));
        let inner = Rc::new(Cell::new(0));
        let lazy = Node::lazy(Counted {
            calls: Rc::clone(&outer),
            inner: Some(Rc::clone(&inner)),
        });
        let div = Element::new("div")
            .with_child(lazy.clone())
            .with_child(Element::new("p").with_child(lazy));

        let resolved = div.tagify().unwrap();
        assert_eq!(outer.get(), 2);
        assert_eq!(inner.get(), 2);
        assert!(!resolved.children.iter().any(has_lazy));
        assert_eq!(
            resolved.to_html().unwrap(),
            "<div>\n  <span>deep</span>\n  <p>\n    <span>deep</span>\n  </p>\n</div>"
        );

        // the source keeps its lazy nodes and can be resolved again
        assert!(div.children.iter().any(has_lazy));
        div.tagify().unwrap();
        assert_eq!(outer.get(), 4);
    }

    #[test]
    fn test_float_children_keep_a_decimal() {
        let p = Element::new("p").with_children(vec![
            Child::from(2.0),
            Child::from(2.5),
            Child::from(3),
        ]);
        assert_eq!(p.children[0], Node::text("2.0"));
        assert_eq!(p.children[1], Node::text("2.5"));
        assert_eq!(p.children[2], Node::text("3"));
    }

    #[test]
    fn test_lazy_nodes_compare_by_identity() {
        let shared: Rc<dyn Tagifiable> = Rc::new(Greeting("a"));
        let a = Node::Lazy(Rc::clone(&shared));
        let b = Node::Lazy(shared);
        assert_eq!(a, b);
        assert_ne!(Node::lazy(Greeting("a")), Node::lazy(Greeting("a")));
    }

    #[test]
    fn test_raw_and_plain_text_children_differ() {
        let plain = Element::new("p").with_child("<b>");
        let raw = Element::new("p").with_child(html("<b>"));
        assert_ne!(plain, raw);
    }

    #[test]
    fn test_empty_name_rejected() {
        let result = std::panic::catch_unwind(|| Element::new(""));
        assert!(result.is_err());
    }
}
