//! Error types for catalog loading and scene mounting.
//!
//! Nothing here is fatal to the host: malformed entities are logged and
//! dropped, unreadable files fall back to the built-in catalog, and a missing
//! render context degrades to a loading indicator.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum GalaxyError {
    /// Catalog or config file could not be read.
    #[error("cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// File contents are not valid JSON for the expected shape.
    #[error("cannot parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Parsed config carries values the scene cannot use.
    #[error("invalid config {}: {reason}", path.display())]
    InvalidConfig { path: PathBuf, reason: String },

    /// An entity entry is missing a required field or carries an unusable value.
    #[error("entity #{index} is malformed: {reason}")]
    MalformedEntity { index: usize, reason: String },

    /// The host could not hand us a graphics context.
    #[error("render context unavailable: {0}")]
    RenderContext(String),
}

impl GalaxyError {
    pub fn malformed(index: usize, reason: impl Into<String>) -> Self {
        Self::MalformedEntity {
            index,
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_message_names_index() {
        let e = GalaxyError::malformed(3, "missing field `name`");
        assert_eq!(e.to_string(), "entity #3 is malformed: missing field `name`");
    }

    #[test]
    fn render_context_message() {
        let e = GalaxyError::RenderContext("no GL backend".into());
        assert!(e.to_string().contains("no GL backend"));
    }
}
