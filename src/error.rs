//! Unified error type for the reelhouse application.
//!
//! All modules funnel their failures into [`Error`], which carries enough
//! context for API handlers to derive an HTTP status code via
//! [`Error::http_status`].

use std::fmt;

/// Unified error type covering all failure modes in reelhouse.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The requested entity could not be found.
    #[error("{entity} not found: {id}")]
    NotFound {
        /// The kind of entity (e.g. "media file", "movie").
        entity: String,
        /// The identifier that was looked up.
        id: String,
    },

    /// An identifier resolved to a path outside the configured media root.
    ///
    /// Maps to the same HTTP status as [`Error::NotFound`] so callers cannot
    /// probe for the existence of files outside the root.
    #[error("identifier escapes media root: {identifier}")]
    PathEscape {
        /// The offending identifier as supplied by the client.
        identifier: String,
    },

    /// Request data failed validation.
    #[error("Validation error: {0}")]
    Validation(String),

    /// The remote catalog returned an error or malformed data.
    #[error("Catalog error: {0}")]
    Catalog(String),

    /// A required collaborator is not configured or not ready.
    #[error("Service unavailable: {0}")]
    Unavailable(String),

    /// An I/O operation failed.
    #[error("IO error: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Catch-all for unexpected internal errors.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Map this error to an appropriate HTTP status code.
    pub fn http_status(&self) -> u16 {
        match self {
            Error::NotFound { .. } => 404,
            Error::PathEscape { .. } => 404,
            Error::Validation(_) => 400,
            Error::Catalog(_) => 502,
            Error::Unavailable(_) => 503,
            Error::Io { .. } => 500,
            Error::Internal(_) => 500,
        }
    }

    /// Convenience constructor for [`Error::NotFound`].
    pub fn not_found(entity: impl Into<String>, id: impl fmt::Display) -> Self {
        Error::NotFound {
            entity: entity.into(),
            id: id.to_string(),
        }
    }

    /// Convenience constructor for [`Error::PathEscape`].
    pub fn path_escape(identifier: impl Into<String>) -> Self {
        Error::PathEscape {
            identifier: identifier.into(),
        }
    }
}

/// Result alias using the crate-level [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_display() {
        let err = Error::not_found("media file", "movies/a.mp4");
        assert_eq!(err.to_string(), "media file not found: movies/a.mp4");
        assert_eq!(err.http_status(), 404);
    }

    #[test]
    fn path_escape_maps_to_not_found_status() {
        let err = Error::path_escape("../../etc/passwd");
        assert_eq!(err.http_status(), 404);
    }

    #[test]
    fn io_error_converts() {
        let io = std::io::Error::new(std::io::ErrorKind::Other, "disk on fire");
        let err: Error = io.into();
        assert_eq!(err.http_status(), 500);
    }
}
