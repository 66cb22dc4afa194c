//! Error types for structure reconstruction.
//!
//! Statistical and heuristic edge cases (degenerate distributions, empty
//! pages, missing TOC, sub-threshold fuzzy scores) are absorbed by the
//! pipeline with documented fallback values and never surface here. The
//! error paths that remain are a failing upstream span source, invalid
//! configuration, and diagnostic snapshot I/O.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while reconstructing document structure.
#[derive(Error, Debug)]
pub enum ReflowError {
    /// The external span source failed; the pipeline cannot proceed
    /// without spans. Carries the document identifier and the stage name.
    #[error("span extraction failed for document '{document}' in stage '{stage}': {source}")]
    Extraction {
        /// Identifier of the document being processed
        document: String,
        /// Pipeline stage that observed the failure
        stage: String,
        /// The underlying extractor error
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Invalid configuration rejected by the builder.
    #[error("invalid configuration: {reason}")]
    Config {
        /// Description of what is invalid
        reason: String,
    },

    /// A diagnostic snapshot could not be serialized.
    #[error("failed to serialize snapshot {}: {source}", .path.display())]
    Snapshot {
        /// Destination path of the snapshot
        path: PathBuf,
        /// The underlying serialization error
        source: serde_json::Error,
    },

    /// I/O error while persisting a diagnostic snapshot.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Type alias for `Result` with [`ReflowError`], used throughout the crate.
pub type Result<T> = std::result::Result<T, ReflowError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    fn boxed(msg: &str) -> Box<dyn std::error::Error + Send + Sync> {
        Box::new(std::io::Error::new(std::io::ErrorKind::NotFound, msg.to_string()))
    }

    #[test]
    fn extraction_display_names_document_and_stage() {
        let err = ReflowError::Extraction {
            document: "book.pdf".to_string(),
            stage: "span-extraction".to_string(),
            source: boxed("connection reset"),
        };
        let msg = err.to_string();
        assert!(msg.contains("book.pdf"));
        assert!(msg.contains("span-extraction"));
        assert!(msg.contains("connection reset"));
    }

    #[test]
    fn config_display() {
        let err = ReflowError::Config {
            reason: "fuzzy_threshold must lie in 0..=100".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "invalid configuration: fuzzy_threshold must lie in 0..=100"
        );
    }

    #[test]
    fn io_error_converts_and_sources() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: ReflowError = io.into();
        assert!(err.to_string().contains("denied"));
        assert!(err.source().is_some());
    }
}
