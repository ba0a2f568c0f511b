//! Root-confined resolution of media identifiers.
//!
//! Identifiers arrive as URL path segments and are untrusted: they may
//! contain `..`, absolute-path markers, or separators that were already
//! percent-decoded. [`MediaStore::resolve`] proves that an identifier names
//! a regular file inside the configured root before any handle is opened.

use std::path::{Component, Path, PathBuf};

use crate::error::{Error, Result};

/// Resolves logical identifiers to validated paths inside the media root.
#[derive(Debug, Clone)]
pub struct MediaStore {
    root: PathBuf,
    extensions: Vec<String>,
}

/// An absolute path proven to lie inside the media root, together with the
/// file size observed at resolution time.
#[derive(Debug, Clone)]
pub struct ResolvedPath {
    path: PathBuf,
    size: u64,
}

impl ResolvedPath {
    /// The canonical filesystem path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// File size in bytes at resolution time.
    pub fn size(&self) -> u64 {
        self.size
    }

    /// File name component, for `Content-Disposition` headers.
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

impl MediaStore {
    /// Create a store over `root`, admitting only files whose extension is in
    /// `extensions` (lowercase, without the leading dot).
    pub fn new(root: PathBuf, extensions: Vec<String>) -> Self {
        let extensions = extensions
            .into_iter()
            .map(|e| e.to_ascii_lowercase())
            .collect();
        Self { root, extensions }
    }

    /// The configured media root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Whether `path` carries an extension on the allow-list.
    pub fn is_allowed(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .map(|e| self.extensions.iter().any(|a| a == &e.to_ascii_lowercase()))
            .unwrap_or(false)
    }

    /// Resolve `identifier` to a validated path inside the root.
    ///
    /// Identifiers that are absolute or contain `..` components are rejected
    /// lexically, before any filesystem access. The surviving candidates are
    /// canonicalized (resolving symlinks) and checked for containment under
    /// the canonicalized root, so a symlink pointing outside the root is also
    /// a [`Error::PathEscape`].
    pub async fn resolve(&self, identifier: &str) -> Result<ResolvedPath> {
        let candidate = Path::new(identifier);

        if identifier.is_empty()
            || candidate.is_absolute()
            || candidate
                .components()
                .any(|c| !matches!(c, Component::Normal(_)))
        {
            return Err(Error::path_escape(identifier));
        }

        let root = tokio::fs::canonicalize(&self.root)
            .await
            .map_err(|e| Error::Internal(format!("media root unavailable: {e}")))?;

        let canonical = tokio::fs::canonicalize(root.join(candidate))
            .await
            .map_err(|_| Error::not_found("media file", identifier))?;

        if !canonical.starts_with(&root) {
            return Err(Error::path_escape(identifier));
        }

        let metadata = tokio::fs::metadata(&canonical)
            .await
            .map_err(|_| Error::not_found("media file", identifier))?;

        if !metadata.is_file() || !self.is_allowed(&canonical) {
            return Err(Error::not_found("media file", identifier));
        }

        Ok(ResolvedPath {
            path: canonical,
            size: metadata.len(),
        })
    }
}
