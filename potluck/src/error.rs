use facet::Facet;

/// Errors raised while building, resolving, rendering, or saving a tag tree.
#[derive(Facet, Debug)]
#[facet(derive(Error))]
#[repr(u8)]
pub enum Error {
    /// encountered a non-tagified object; call tagify() before rendering
    UnresolvedLazy,

    /// expected <html> tag, got <{name}>
    NotHtmlRoot { name: String },

    /// missing required attribute '{field}' in HTML dependency {dependency}
    MissingDependencyField { dependency: String, field: String },

    /// failed to find HTML dependency {dependency} because {path} doesn't exist
    MissingSourceFile { dependency: String, path: String },

    /// no directory configured for package '{package}' used by HTML dependency {dependency}
    UnknownPackage { dependency: String, package: String },

    /// invalid version string '{version}'
    InvalidVersion { version: String },

    /// invalid dependency manifest: {reason}
    Manifest { reason: String },

    /// i/o error at {path}: {reason}
    Io { path: String, reason: String },
}

impl Error {
    pub(crate) fn io(path: &std::path::Path, err: std::io::Error) -> Self {
        Error::Io {
            path: path.display().to_string(),
            reason: err.to_string(),
        }
    }
}

/// Result alias used throughout potluck.
pub type Result<T, E = Error> = std::result::Result<T, E>;
