//! The document-structure reconstruction pipeline.
//!
//! Strictly sequential batch stages, each consuming the full output of the
//! previous one: span-to-line bunching, per-page statistical profiling,
//! TOC/heading detection, paragraph segmentation, and post-processing.
//! Every stage is a pure function over its input collection; processing
//! order (page ascending, then top-to-bottom, left-to-right) is part of
//! the contract.

pub mod bunching;
pub mod detect;
pub mod output;
pub mod postprocess;
pub mod profile;
pub mod segment;

use crate::config::ReflowConfig;
use crate::error::{ReflowError, Result};
use crate::similarity::{NormalizedLevenshtein, TextSimilarity};
use crate::snapshot::SnapshotWriter;
use crate::source::SpanSource;
use crate::types::{PageSpans, StructuredDocument};
use std::fmt;

pub use bunching::bunch_lines;
pub use detect::{classify_page, detect_structure, longest_toc_run, DetectionOutcome, PageClass};
pub use output::assemble_document;
pub use postprocess::{clean_paragraphs, join_hyphenated_words, merge_heading_paragraphs};
pub use profile::{corpus_thresholds, profile_pages, CorpusThresholds, PageProfile};
pub use segment::{segment_paragraphs, SegmentCarry, Transition};

/// Reconstructs document structure from positioned spans.
///
/// Owns the configuration and the injected similarity scorer. The pipeline
/// is deterministic: the same spans always reconstruct the same structure,
/// so there is no retry policy.
pub struct StructurePipeline {
    config: ReflowConfig,
    similarity: Box<dyn TextSimilarity>,
}

impl fmt::Debug for StructurePipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StructurePipeline")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl StructurePipeline {
    /// Pipeline with the default normalized-Levenshtein scorer.
    #[inline]
    #[must_use = "returns a new pipeline"]
    pub fn new(config: ReflowConfig) -> Self {
        Self::with_similarity(config, Box::new(NormalizedLevenshtein))
    }

    /// Pipeline with an injected similarity scorer (deterministic stubs in
    /// tests, alternative fuzzy matchers in production).
    #[inline]
    #[must_use = "returns a new pipeline"]
    pub fn with_similarity(config: ReflowConfig, similarity: Box<dyn TextSimilarity>) -> Self {
        Self { config, similarity }
    }

    /// The active configuration.
    #[inline]
    #[must_use = "returns the active configuration"]
    pub fn config(&self) -> &ReflowConfig {
        &self.config
    }

    /// Reconstruct structure from already-extracted pages.
    ///
    /// # Errors
    ///
    /// Fails only when diagnostic snapshots are enabled and cannot be
    /// written; the reconstruction itself absorbs all statistical edge
    /// cases with documented fallbacks.
    pub fn run(&self, pages: &[PageSpans]) -> Result<StructuredDocument> {
        let snapshots = self.config.snapshot_dir.as_ref().map(SnapshotWriter::new);

        let span_count: usize = pages.iter().map(|p| p.spans.len()).sum();
        let lines = bunch_lines(pages, &self.config);
        log::info!(
            "bunched {} spans into {} lines across {} pages",
            span_count,
            lines.len(),
            pages.len()
        );

        let profiles = profile_pages(pages, &lines);
        let thresholds = corpus_thresholds(&profiles, &self.config);
        log::debug!("corpus thresholds: {thresholds:?}");

        let (lines, outcome) = detect_structure(
            pages,
            lines,
            &profiles,
            &thresholds,
            self.similarity.as_ref(),
            &self.config,
        );
        log::info!(
            "detected toc run of {} pages and {} headings",
            outcome.toc_run.len(),
            outcome.heading_count
        );

        let paragraphs = segment_paragraphs(lines, &self.config);
        log::info!("segmented {} paragraphs", paragraphs.len());
        if let Some(writer) = &snapshots {
            writer.write("paragraphs", &paragraphs)?;
        }

        let paragraphs = clean_paragraphs(paragraphs);
        if let Some(writer) = &snapshots {
            writer.write("cleaned_paragraphs", &paragraphs)?;
        }

        let paragraphs = join_hyphenated_words(paragraphs);
        if let Some(writer) = &snapshots {
            writer.write("dehyphenated_paragraphs", &paragraphs)?;
        }

        let paragraphs = merge_heading_paragraphs(paragraphs);
        let document = assemble_document(paragraphs);
        if let Some(writer) = &snapshots {
            writer.write("formatted_paragraphs", &document)?;
        }

        log::info!("reconstructed {} paragraph records", document.len());
        Ok(document)
    }

    /// Extract spans through `source` and reconstruct the document's
    /// structure.
    ///
    /// # Errors
    ///
    /// A failing span source is fatal and surfaces as
    /// [`ReflowError::Extraction`] carrying the document identifier and
    /// stage name.
    pub fn run_document(
        &self,
        source: &dyn SpanSource,
        document_id: &str,
    ) -> Result<StructuredDocument> {
        let pages = source
            .document_spans(document_id)
            .map_err(|source| ReflowError::Extraction {
                document: document_id.to_string(),
                stage: "span-extraction".to_string(),
                source,
            })?;
        self.run(&pages)
    }
}
