//! Structure detection: TOC candidate pages, the canonical TOC run, and
//! fuzzy-corroborated chapter headings.
//!
//! Each page is classified independently against the frozen corpus
//! thresholds; the only cross-page state is the thresholds themselves.
//! Heading confirmation is a two-stage gate: a line must be a geometric
//! outlier (unusually short or off-margin) AND fuzzy-match a TOC entry.
//! Geometry alone over-triggers on isolated short lines; TOC
//! correspondence alone misses rephrased headings but filters with high
//! precision.

use crate::config::ReflowConfig;
use crate::pipeline::profile::{CorpusThresholds, PageProfile};
use crate::similarity::TextSimilarity;
use crate::types::{Line, PageSpans};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Per-page classification, first matching rule wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PageClass {
    /// Too dense to carry TOC/heading structure, or no layout signal
    Ignored,
    /// Statistically resembles a table-of-contents page
    TocCandidate,
    /// Sparse page with layout outliers; searched for headings
    FormattingRelevant,
}

impl fmt::Display for PageClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ignored => write!(f, "ignored"),
            Self::TocCandidate => write!(f, "toc-candidate"),
            Self::FormattingRelevant => write!(f, "formatting-relevant"),
        }
    }
}

/// Summary of what the detector found, for logging and inspection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DetectionOutcome {
    /// Pages individually classified as TOC candidates
    pub toc_candidates: Vec<usize>,
    /// Pages classified as heading-bearing
    pub formatting_relevant: Vec<usize>,
    /// The canonical TOC: longest contiguous candidate run
    pub toc_run: Vec<usize>,
    /// Number of lines confirmed as headings
    pub heading_count: usize,
}

/// Classify one page against the corpus thresholds.
///
/// Rules, in order: a page whose normalized sparsity deviation stays at or
/// below the sparsity threshold is ignored; a sparse page with high
/// number density and a layout outlier is a TOC candidate; a sparse page
/// with a layout outlier alone is formatting-relevant; anything else is
/// ignored.
#[must_use = "returns the page classification"]
pub fn classify_page(profile: &PageProfile, thresholds: &CorpusThresholds) -> PageClass {
    // a zero-variance corpus has no outliers: deviation 0 for every page
    let deviation = if thresholds.sparsity_std != 0.0 {
        (profile.sparsity - thresholds.sparsity_mean) / thresholds.sparsity_std
    } else {
        0.0
    };
    if deviation <= thresholds.sparsity {
        return PageClass::Ignored;
    }
    let layout_outlier = profile.avg_line_length >= thresholds.line_length
        || profile.margin_modes[0] >= thresholds.off_margin;
    if profile.number_density >= thresholds.number_density && layout_outlier {
        PageClass::TocCandidate
    } else if layout_outlier {
        PageClass::FormattingRelevant
    } else {
        PageClass::Ignored
    }
}

/// Longest contiguous run among the candidate pages; equal lengths go to
/// the run starting earliest.
#[must_use = "returns the selected TOC run"]
pub fn longest_toc_run(candidates: &[usize]) -> Vec<usize> {
    let mut sorted = candidates.to_vec();
    sorted.sort_unstable();
    sorted.dedup();

    let mut longest: Vec<usize> = Vec::new();
    let mut run: Vec<usize> = Vec::new();
    for &page in &sorted {
        let contiguous = run.last().is_some_and(|&prev| page == prev + 1);
        if run.is_empty() || contiguous {
            run.push(page);
        } else {
            if beats(&run, &longest) {
                longest = run.clone();
            }
            run = vec![page];
        }
    }
    if beats(&run, &longest) {
        longest = run;
    }
    longest
}

fn beats(run: &[usize], longest: &[usize]) -> bool {
    run.len() > longest.len()
        || (run.len() == longest.len()
            && matches!((run.first(), longest.first()), (Some(a), Some(b)) if a < b))
}

/// Whether a line is a geometric heading candidate: much shorter than the
/// corpus modal line length, or off the modal margin.
fn is_heading_candidate(line: &Line, thresholds: &CorpusThresholds, config: &ReflowConfig) -> bool {
    let short_cutoff =
        thresholds.line_length_mode - config.heading_length_stddevs * thresholds.line_length_std;
    line.length() < short_cutoff
        || (line.indent() - thresholds.margin_mode).abs() > thresholds.off_margin
}

/// Run detection over the whole document: classify pages, select the TOC
/// run, confirm headings, and set the `toc`/`heading` flags on the lines.
///
/// An empty TOC run simply yields zero headings; it is not an error.
#[must_use = "returns the flagged lines and the detection summary"]
pub fn detect_structure(
    pages: &[PageSpans],
    mut lines: Vec<Line>,
    profiles: &[PageProfile],
    thresholds: &CorpusThresholds,
    similarity: &dyn TextSimilarity,
    config: &ReflowConfig,
) -> (Vec<Line>, DetectionOutcome) {
    let mut toc_candidates = Vec::new();
    let mut formatting_relevant = Vec::new();
    for profile in profiles {
        match classify_page(profile, thresholds) {
            PageClass::TocCandidate => toc_candidates.push(profile.page),
            PageClass::FormattingRelevant => formatting_relevant.push(profile.page),
            PageClass::Ignored => {}
        }
    }

    let toc_run = longest_toc_run(&toc_candidates);
    log::debug!(
        "page classification: {} toc candidates {:?}, {} formatting-relevant {:?}, toc run {:?}",
        toc_candidates.len(),
        toc_candidates,
        formatting_relevant.len(),
        formatting_relevant,
        toc_run
    );

    // heading candidates are corroborated against the span texts of the
    // TOC-run pages
    let toc_entries: Vec<&str> = pages
        .iter()
        .filter(|p| toc_run.contains(&p.page))
        .flat_map(|p| p.spans.iter().map(|s| s.text.as_str()))
        .collect();

    let mut heading_count = 0;
    for line in &mut lines {
        if toc_run.contains(&line.page) {
            line.flags.toc = true;
            continue;
        }
        if !formatting_relevant.contains(&line.page) {
            continue;
        }
        if !is_heading_candidate(line, thresholds, config) {
            continue;
        }
        if toc_entries.is_empty() {
            continue;
        }
        let best = toc_entries
            .iter()
            .map(|entry| similarity.score(&line.text, entry))
            .fold(0.0f64, f64::max);
        if best >= config.fuzzy_threshold {
            log::debug!("confirmed heading on page {}: {:?}", line.page, line.text);
            line.flags.heading = true;
            heading_count += 1;
        }
    }

    let outcome = DetectionOutcome {
        toc_candidates,
        formatting_relevant,
        toc_run,
        heading_count,
    };
    (lines, outcome)
}
