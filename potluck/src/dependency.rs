//! Asset dependencies carried inside tag trees.
//!
//! A [`Dependency`] is a metadata node: it renders as nothing where it sits, and
//! is later collected, deduplicated by name, and turned into `<meta>`, `<link>`
//! and `<script>` tags in the document head. Its files are copied next to the
//! saved document under `<name>-<version>/`.

use std::fs;
use std::hash::Hasher;
use std::path::{Path, PathBuf};

use facet::Facet;
use indexmap::IndexMap;
use indexmap::map::Entry;
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use rapidhash::RapidHasher;

use crate::document::SaveOptions;
use crate::dom::{Child, Element, Fragment, Node};
use crate::error::{Error, Result};
use crate::tracing_macros::{debug, trace};
use crate::version::Version;

/// Attributes of a single script, stylesheet, or meta entry, in order.
pub type AttrMap = IndexMap<String, String>;

/// Characters left alone when quoting an asset path for use in a URL.
const URL_PATH: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~')
    .remove(b'/');

fn quote_path(path: &str) -> String {
    utf8_percent_encode(path, URL_PATH).to_string()
}

/// Where a dependency's files live on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencySource {
    /// Package whose root `subdir` is relative to. `None` means the current
    /// working directory.
    pub package: Option<String>,
    pub subdir: PathBuf,
}

impl DependencySource {
    /// Files under `subdir`, relative to the current working directory.
    pub fn local(subdir: impl Into<PathBuf>) -> Self {
        Self {
            package: None,
            subdir: subdir.into(),
        }
    }

    /// Files under `subdir` inside a package's root directory.
    pub fn package(package: impl Into<String>, subdir: impl Into<PathBuf>) -> Self {
        Self {
            package: Some(package.into()),
            subdir: subdir.into(),
        }
    }
}

/// A named, versioned bundle of head assets.
#[derive(Debug, Clone, PartialEq)]
pub struct Dependency {
    pub name: String,
    pub version: Version,
    pub source: Option<DependencySource>,
    /// Script entries, each with a `src`
    pub scripts: Vec<AttrMap>,
    /// Stylesheet entries, each with an `href` and a `rel`
    pub stylesheets: Vec<AttrMap>,
    /// Attributes of extra `<meta>` tags
    pub meta: Vec<AttrMap>,
    /// Copy every file of the source directory, not just scripts and stylesheets
    pub all_files: bool,
    /// Extra markup appended to the document head
    pub head: Option<Fragment>,
}

fn attr_map<I, K, V>(attrs: I) -> AttrMap
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<String>,
{
    attrs
        .into_iter()
        .map(|(k, v)| (k.into(), v.into()))
        .collect()
}

impl Dependency {
    pub fn new(name: impl Into<String>, version: &str) -> Result<Self> {
        Ok(Self {
            name: name.into(),
            version: Version::parse(version)?,
            source: None,
            scripts: Vec::new(),
            stylesheets: Vec::new(),
            meta: Vec::new(),
            all_files: false,
            head: None,
        })
    }

    pub fn with_source(mut self, source: DependencySource) -> Self {
        self.source = Some(source);
        self
    }

    /// Add a script. The attributes must include `src`.
    pub fn with_script<I, K, V>(mut self, attrs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let attrs = attr_map(attrs);
        self.require(&attrs, "src")?;
        self.scripts.push(attrs);
        Ok(self)
    }

    /// Add a stylesheet. The attributes must include `href`; `rel` defaults to
    /// `stylesheet`.
    pub fn with_stylesheet<I, K, V>(mut self, attrs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut attrs = attr_map(attrs);
        self.require(&attrs, "href")?;
        attrs
            .entry("rel".to_string())
            .or_insert_with(|| "stylesheet".to_string());
        self.stylesheets.push(attrs);
        Ok(self)
    }

    pub fn with_meta<I, K, V>(mut self, attrs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.meta.push(attr_map(attrs));
        self
    }

    pub fn with_all_files(mut self, all_files: bool) -> Self {
        self.all_files = all_files;
        self
    }

    pub fn with_head(mut self, head: impl Into<Child>) -> Self {
        self.head = Some(Fragment::from_child(head));
        self
    }

    fn require(&self, attrs: &AttrMap, field: &str) -> Result<()> {
        if attrs.contains_key(field) {
            Ok(())
        } else {
            Err(Error::MissingDependencyField {
                dependency: self.dir_name(),
                field: field.to_string(),
            })
        }
    }

    /// `<name>-<version>`, the directory the assets are copied into.
    pub fn dir_name(&self) -> String {
        format!("{}-{}", self.name, self.version)
    }

    /// A copy that shares no mutable state with `self`.
    pub fn deep_clone(&self) -> Dependency {
        Dependency {
            head: self.head.as_ref().map(Fragment::deep_clone),
            ..self.clone()
        }
    }

    /// The tags this dependency contributes to the document head: metas, then
    /// stylesheets, then scripts, then the extra head content.
    ///
    /// Asset paths are rewritten to `[lib_prefix/]<name>-<version>/<path>`, with
    /// the path percent-encoded.
    pub fn as_html_tags(&self, lib_prefix: Option<&str>) -> Fragment {
        let href_prefix = match lib_prefix.map(|p| p.trim_end_matches('/')) {
            Some(prefix) if !prefix.is_empty() => format!("{prefix}/{}", self.dir_name()),
            _ => self.dir_name(),
        };
        let rewrite = |path: &str| format!("{href_prefix}/{}", quote_path(path));

        let mut tags = Fragment::new();
        for meta in &self.meta {
            tags.append(Element::new("meta").with_attrs(meta));
        }
        for sheet in &self.stylesheets {
            let mut attrs = sheet.clone();
            if let Some(href) = attrs.get_mut("href") {
                *href = rewrite(href);
            }
            attrs.insert("rel".to_string(), "stylesheet".to_string());
            tags.append(Element::new("link").with_attrs(&attrs));
        }
        for script in &self.scripts {
            let mut attrs = script.clone();
            if let Some(src) = attrs.get_mut("src") {
                *src = rewrite(src);
            }
            tags.append(Element::new("script").with_attrs(&attrs));
        }
        if let Some(head) = &self.head {
            tags.append(head);
        }
        tags
    }

    /// The directory holding this dependency's files, if it has a source.
    pub fn source_dir(&self, options: &SaveOptions) -> Result<Option<PathBuf>> {
        let Some(source) = &self.source else {
            return Ok(None);
        };
        let root = match &source.package {
            Some(package) => options
                .package_dirs
                .get(package)
                .cloned()
                .ok_or_else(|| Error::UnknownPackage {
                    dependency: self.dir_name(),
                    package: package.clone(),
                })?,
            None => std::env::current_dir().map_err(|e| Error::io(Path::new("."), e))?,
        };
        Ok(Some(root.join(&source.subdir)))
    }

    /// Source files to copy, as `(absolute, relative)` pairs.
    fn source_files(&self, src_dir: &Path) -> Result<Vec<(PathBuf, PathBuf)>> {
        if self.all_files {
            let entries = fs::read_dir(src_dir).map_err(|e| Error::io(src_dir, e))?;
            let mut files = Vec::new();
            for entry in entries {
                let entry = entry.map_err(|e| Error::io(src_dir, e))?;
                let path = entry.path();
                if path.is_file() {
                    files.push((path, PathBuf::from(entry.file_name())));
                }
            }
            files.sort();
            return Ok(files);
        }

        let scripts = self.scripts.iter().filter_map(|s| s.get("src"));
        let sheets = self.stylesheets.iter().filter_map(|s| s.get("href"));
        Ok(scripts
            .chain(sheets)
            .map(|rel| (src_dir.join(rel), PathBuf::from(rel)))
            .collect())
    }

    /// Copy this dependency's files into `dir/<name>-<version>/`, replacing
    /// whatever was there.
    ///
    /// Every source file is checked before anything is written.
    pub fn copy_to(&self, dir: &Path, options: &SaveOptions) -> Result<()> {
        let Some(src_dir) = self.source_dir(options)? else {
            return Ok(());
        };
        let files = self.source_files(&src_dir)?;
        if let Some((missing, _)) = files.iter().find(|(path, _)| !path.is_file()) {
            return Err(Error::MissingSourceFile {
                dependency: self.dir_name(),
                path: missing.display().to_string(),
            });
        }

        let target_dir = dir.join(self.dir_name());
        debug!(
            dependency = %self.dir_name(),
            target = %target_dir.display(),
            files = files.len(),
            "copying dependency"
        );
        if target_dir.exists() {
            fs::remove_dir_all(&target_dir).map_err(|e| Error::io(&target_dir, e))?;
        }
        fs::create_dir_all(&target_dir).map_err(|e| Error::io(&target_dir, e))?;

        for (src, rel) in &files {
            let dest = target_dir.join(rel);
            if let Some(parent) = dest.parent() {
                fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
            }
            trace!(from = %src.display(), to = %dest.display(), "copying file");
            fs::copy(src, &dest).map_err(|e| Error::io(&dest, e))?;
        }
        Ok(())
    }
}

/// Wrap arbitrary markup as a dependency so it is hoisted into the head.
///
/// The name is derived from a hash of the rendered markup, so the same content
/// used twice ends up in the head once.
pub fn head_content(child: impl Into<Child>) -> Result<Dependency> {
    let head = Fragment::from_child(child);
    let rendered = head.tagify()?.to_html()?;
    let mut hasher = RapidHasher::default();
    hasher.write(rendered.as_bytes());
    let name = format!("headcontent_{:x}", hasher.finish());
    Ok(Dependency::new(name, "0.0")?.with_head(head))
}

/// Gather every dependency in `nodes`, depth first, without deduplicating.
///
/// Only element children are searched; lazy nodes must be resolved first.
pub fn collect_dependencies<'a>(nodes: impl IntoIterator<Item = &'a Node>) -> Vec<Dependency> {
    let mut deps = Vec::new();
    collect_into(nodes, &mut deps);
    deps
}

fn collect_into<'a>(nodes: impl IntoIterator<Item = &'a Node>, deps: &mut Vec<Dependency>) {
    for node in nodes {
        match node {
            Node::Element(element) => collect_into(&element.borrow().children, deps),
            Node::Metadata(_) => {
                if let Some(dep) = node.as_dependency() {
                    deps.push(dep.clone());
                }
            }
            Node::Lazy(_) | Node::Text(_) => {}
        }
    }
}

/// Keep one dependency per name: the one with the highest version, or the
/// first one seen when versions tie. Names stay in order of first appearance.
pub fn resolve_dependencies(deps: impl IntoIterator<Item = Dependency>) -> Vec<Dependency> {
    let mut resolved: IndexMap<String, Dependency> = IndexMap::new();
    for dep in deps {
        match resolved.entry(dep.name.clone()) {
            Entry::Occupied(mut entry) => {
                if dep.version > entry.get().version {
                    debug!(
                        name = %dep.name,
                        from = %entry.get().version,
                        to = %dep.version,
                        "newer dependency version replaces older"
                    );
                    entry.insert(dep);
                } else {
                    trace!(
                        name = %dep.name,
                        version = %dep.version,
                        "dropping duplicate dependency"
                    );
                }
            }
            Entry::Vacant(entry) => {
                entry.insert(dep);
            }
        }
    }
    resolved.into_values().collect()
}

impl Element {
    /// Deduplicated dependencies found among this element's children.
    pub fn dependencies(&self) -> Vec<Dependency> {
        resolve_dependencies(collect_dependencies(&self.children))
    }
}

impl Fragment {
    /// Deduplicated dependencies found in this fragment.
    pub fn dependencies(&self) -> Vec<Dependency> {
        resolve_dependencies(collect_dependencies(self))
    }
}

// =============================================================================
// JSON manifest
// =============================================================================

/// Source location as written in a manifest.
#[derive(Facet, Debug, Clone, PartialEq)]
pub struct SourceSpec {
    #[facet(default)]
    pub package: Option<String>,
    pub subdir: String,
}

/// A dependency described as JSON.
///
/// ```json
/// {
///   "name": "widgets",
///   "version": "2.1",
///   "source": { "subdir": "assets" },
///   "script": [{ "src": "widgets.js", "defer": "" }],
///   "stylesheet": [{ "href": "widgets.css" }]
/// }
/// ```
#[derive(Facet, Debug, Clone, PartialEq)]
pub struct DependencySpec {
    pub name: String,
    pub version: String,
    #[facet(default)]
    pub source: Option<SourceSpec>,
    #[facet(default)]
    pub script: Vec<AttrMap>,
    #[facet(default)]
    pub stylesheet: Vec<AttrMap>,
    #[facet(default)]
    pub meta: Vec<AttrMap>,
    #[facet(default)]
    pub all_files: bool,
}

impl DependencySpec {
    pub fn from_json(json: &str) -> Result<Self> {
        facet_json::from_str(json).map_err(|e| Error::Manifest {
            reason: e.to_string(),
        })
    }
}

impl TryFrom<DependencySpec> for Dependency {
    type Error = Error;

    fn try_from(spec: DependencySpec) -> Result<Self> {
        let mut dep = Dependency::new(spec.name, &spec.version)?.with_all_files(spec.all_files);
        if let Some(source) = spec.source {
            dep = dep.with_source(DependencySource {
                package: source.package,
                subdir: PathBuf::from(source.subdir),
            });
        }
        for script in spec.script {
            dep = dep.with_script(script)?;
        }
        for sheet in spec.stylesheet {
            dep = dep.with_stylesheet(sheet)?;
        }
        for meta in spec.meta {
            dep = dep.with_meta(meta);
        }
        Ok(dep)
    }
}
