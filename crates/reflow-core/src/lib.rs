//! # reflow-core — Document Structure Reconstruction
//!
//! Reconstructs the *logical structure* of a paginated document —
//! paragraphs, headings, and a table of contents — from a flat, noisy
//! stream of positioned text spans. Spans carry only geometry (bounding
//! box, page) and typography (font family, size, bold/italic); structure
//! is inferred purely from statistical regularities in that geometry.
//!
//! ## Pipeline
//!
//! 1. **Line bunching** — spans merge into visual lines on vertical
//!    overlap.
//! 2. **Page profiling** — per-page sparsity, lone-number density, line
//!    length and margin statistics; corpus-wide thresholds derived from
//!    their distributions.
//! 3. **Structure detection** — pages classify as TOC candidates or
//!    heading-bearing; the longest contiguous candidate run becomes the
//!    canonical TOC; geometric outlier lines are confirmed as headings by
//!    fuzzy correspondence to TOC entries.
//! 4. **Paragraph segmentation** — the flagged line sequence partitions
//!    into paragraphs with page-break-aware continuation logic.
//! 5. **Post-processing** — ASCII cleaning, hyphen joining, heading
//!    merging — and assembly into renderer-facing records.
//!
//! ## Quick Start
//!
//! ```
//! use reflow_core::{BBox, FontStyle, PageSpans, ReflowConfig, Span, StructurePipeline};
//!
//! # fn main() -> reflow_core::Result<()> {
//! let page = PageSpans {
//!     page: 0,
//!     width: 612.0,
//!     height: 792.0,
//!     spans: vec![
//!         Span {
//!             page: 0,
//!             bbox: BBox::new(72.0, 100.0, 540.0, 112.0),
//!             text: "It was a dark and stormy night; the rain".to_string(),
//!             font_size: 12.0,
//!             font_family: "Garamond".to_string(),
//!             style: FontStyle::default(),
//!         },
//!         Span {
//!             page: 0,
//!             bbox: BBox::new(72.0, 114.0, 520.0, 126.0),
//!             text: "fell in torrents.".to_string(),
//!             font_size: 12.0,
//!             font_family: "Garamond".to_string(),
//!             style: FontStyle::default(),
//!         },
//!     ],
//! };
//!
//! let pipeline = StructurePipeline::new(ReflowConfig::default());
//! let document = pipeline.run(&[page])?;
//!
//! assert_eq!(document.len(), 1);
//! assert_eq!(
//!     document.paragraphs[0].lines[0].text,
//!     "It was a dark and stormy night; the rain fell in torrents."
//! );
//! # Ok(())
//! # }
//! ```
//!
//! ## Error Handling
//!
//! Statistical edge cases (zero-variance distributions, empty pages, a
//! missing TOC, sub-threshold fuzzy scores) are absorbed with documented
//! fallback values and never raised. Only a failing upstream span source
//! — and snapshot I/O, when diagnostics are enabled — returns an error;
//! see [`ReflowError`].
//!
//! ## Determinism
//!
//! The pipeline is single-threaded, batch, and deterministic: feeding the
//! same spans in any order yields identical output. There is no partial
//! result; the run completes or fails.

pub mod config;
pub mod error;
pub mod pipeline;
pub mod similarity;
pub mod snapshot;
pub mod source;
pub mod types;

pub use config::{ReflowConfig, ReflowConfigBuilder};
pub use error::{ReflowError, Result};
pub use pipeline::{
    CorpusThresholds, DetectionOutcome, PageClass, PageProfile, StructurePipeline,
};
pub use similarity::{NormalizedLevenshtein, TextSimilarity};
pub use snapshot::SnapshotWriter;
pub use source::{SpanSource, StaticSpanSource};
pub use types::{
    BBox, FontStyle, Line, LineFlags, LineRecord, PageSpans, Paragraph, ParagraphRecord, Span,
    StructuredDocument,
};
