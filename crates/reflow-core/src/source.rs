//! External span-source boundary.
//!
//! Span extraction from the document's binary page format is not part of
//! this crate; an implementation of [`SpanSource`] supplies per-page spans
//! for a document identifier. A failing source is the pipeline's only fatal
//! error path.

use crate::types::PageSpans;

/// Boxed error returned by span-source implementations.
pub type SourceError = Box<dyn std::error::Error + Send + Sync>;

/// Supplier of positioned text spans for a document.
///
/// Implementations return one [`PageSpans`] per page, ordered by page
/// number. No ordering is required of the spans within a page; the
/// pipeline re-sorts into geometric reading order.
pub trait SpanSource {
    /// Extract all spans of the identified document.
    ///
    /// # Errors
    ///
    /// Any error aborts the pipeline; it is wrapped into
    /// [`ReflowError::Extraction`](crate::ReflowError::Extraction) together
    /// with the document identifier and stage name.
    fn document_spans(&self, document_id: &str) -> Result<Vec<PageSpans>, SourceError>;
}

/// In-memory span source, useful for tests and for callers that already
/// hold extracted spans.
#[derive(Debug, Clone, Default)]
pub struct StaticSpanSource {
    pages: Vec<PageSpans>,
}

impl StaticSpanSource {
    /// Wrap already-extracted pages.
    #[inline]
    #[must_use = "returns a source serving the given pages"]
    pub fn new(pages: Vec<PageSpans>) -> Self {
        Self { pages }
    }
}

impl SpanSource for StaticSpanSource {
    fn document_spans(&self, _document_id: &str) -> Result<Vec<PageSpans>, SourceError> {
        Ok(self.pages.clone())
    }
}
