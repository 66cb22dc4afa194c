//! Pipeline configuration.
//!
//! Every tuned constant of the pipeline lives here so that runs are
//! reproducible and the stages are unit-testable against alternate
//! thresholds. Construct a [`ReflowConfig`] through the builder; `build`
//! validates the values and rejects non-finite or out-of-range thresholds.

use crate::error::{ReflowError, Result};
use std::path::PathBuf;

/// Tuned constants threaded through every pipeline stage.
///
/// The bias constants are empirical: each corpus threshold is derived as
/// `((mode - mean) / stddev) + bias` over the distribution of per-page
/// statistics, with `degenerate_threshold` substituted whenever the
/// distribution has zero variance.
#[derive(Debug, Clone, PartialEq)]
pub struct ReflowConfig {
    /// Minimum vertical-overlap ratio (overlap / average span height) for
    /// two spans to share a line
    pub line_overlap_ratio: f64,

    /// Bias added to the normalized sparsity mode when deriving the
    /// page-sparsity threshold
    pub sparsity_bias: f64,

    /// Bias added to the normalized number-density mode when deriving the
    /// TOC number-density threshold
    pub number_density_bias: f64,

    /// Bias added to the normalized line-length mode when deriving the
    /// line-length threshold
    pub line_length_bias: f64,

    /// Bias added to the normalized margin mode when deriving the
    /// off-margin threshold
    pub margin_bias: f64,

    /// Fixed threshold substituted when a statistic's distribution has zero
    /// variance (degenerate single-value corpus)
    pub degenerate_threshold: f64,

    /// Minimum fuzzy-similarity score (0-100) for a heading candidate to be
    /// confirmed against a TOC entry
    pub fuzzy_threshold: f64,

    /// How many corpus standard deviations shorter than the modal line
    /// length a line must be to count as a geometric heading candidate
    pub heading_length_stddevs: f64,

    /// Vertical gap between consecutive lines that opens a new paragraph
    pub vertical_gap_threshold: f64,

    /// Indent change between consecutive lines that opens a new paragraph;
    /// also bounds the indent step under which a page-break paragraph is
    /// marked as a continuation
    pub indent_threshold: f64,

    /// Font-size change between consecutive lines that opens a new
    /// paragraph
    pub font_size_threshold: f64,

    /// Directory for diagnostic JSON snapshots of intermediate stage
    /// outputs; `None` disables snapshots
    pub snapshot_dir: Option<PathBuf>,
}

impl Default for ReflowConfig {
    #[inline]
    fn default() -> Self {
        ReflowConfigBuilder::new()
            .build()
            .expect("default config is valid")
    }
}

/// Builder for [`ReflowConfig`].
///
/// # Examples
///
/// ```
/// use reflow_core::ReflowConfigBuilder;
///
/// # fn main() -> reflow_core::Result<()> {
/// let config = ReflowConfigBuilder::new()
///     .vertical_gap_threshold(6.5)
///     .indent_threshold(12.0)
///     .build()?;
/// assert_eq!(config.vertical_gap_threshold, 6.5);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ReflowConfigBuilder {
    line_overlap_ratio: f64,
    sparsity_bias: f64,
    number_density_bias: f64,
    line_length_bias: f64,
    margin_bias: f64,
    degenerate_threshold: f64,
    fuzzy_threshold: f64,
    heading_length_stddevs: f64,
    vertical_gap_threshold: f64,
    indent_threshold: f64,
    font_size_threshold: f64,
    snapshot_dir: Option<PathBuf>,
}

impl Default for ReflowConfigBuilder {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl ReflowConfigBuilder {
    /// Create a builder with the default tuning.
    #[inline]
    #[must_use = "returns a new builder with default settings"]
    pub fn new() -> Self {
        Self {
            line_overlap_ratio: 0.5,
            sparsity_bias: 0.5,
            number_density_bias: 4.0,
            line_length_bias: 0.1,
            margin_bias: 1.0,
            degenerate_threshold: 1.0,
            fuzzy_threshold: 95.0,
            heading_length_stddevs: 2.0,
            vertical_gap_threshold: 5.0,
            indent_threshold: 10.0,
            font_size_threshold: 1.0,
            snapshot_dir: None,
        }
    }

    /// Minimum vertical-overlap ratio for spans to share a line
    #[must_use = "builder methods return the updated builder"]
    pub fn line_overlap_ratio(mut self, ratio: f64) -> Self {
        self.line_overlap_ratio = ratio;
        self
    }

    /// Bias for the sparsity threshold
    #[must_use = "builder methods return the updated builder"]
    pub fn sparsity_bias(mut self, bias: f64) -> Self {
        self.sparsity_bias = bias;
        self
    }

    /// Bias for the number-density threshold
    #[must_use = "builder methods return the updated builder"]
    pub fn number_density_bias(mut self, bias: f64) -> Self {
        self.number_density_bias = bias;
        self
    }

    /// Bias for the line-length threshold
    #[must_use = "builder methods return the updated builder"]
    pub fn line_length_bias(mut self, bias: f64) -> Self {
        self.line_length_bias = bias;
        self
    }

    /// Bias for the off-margin threshold
    #[must_use = "builder methods return the updated builder"]
    pub fn margin_bias(mut self, bias: f64) -> Self {
        self.margin_bias = bias;
        self
    }

    /// Fallback threshold for zero-variance distributions
    #[must_use = "builder methods return the updated builder"]
    pub fn degenerate_threshold(mut self, value: f64) -> Self {
        self.degenerate_threshold = value;
        self
    }

    /// Minimum fuzzy score (0-100) confirming a heading
    #[must_use = "builder methods return the updated builder"]
    pub fn fuzzy_threshold(mut self, score: f64) -> Self {
        self.fuzzy_threshold = score;
        self
    }

    /// Standard deviations below the modal line length marking a heading
    /// candidate
    #[must_use = "builder methods return the updated builder"]
    pub fn heading_length_stddevs(mut self, stddevs: f64) -> Self {
        self.heading_length_stddevs = stddevs;
        self
    }

    /// Vertical gap opening a new paragraph
    #[must_use = "builder methods return the updated builder"]
    pub fn vertical_gap_threshold(mut self, gap: f64) -> Self {
        self.vertical_gap_threshold = gap;
        self
    }

    /// Indent change opening a new paragraph
    #[must_use = "builder methods return the updated builder"]
    pub fn indent_threshold(mut self, indent: f64) -> Self {
        self.indent_threshold = indent;
        self
    }

    /// Font-size change opening a new paragraph
    #[must_use = "builder methods return the updated builder"]
    pub fn font_size_threshold(mut self, size: f64) -> Self {
        self.font_size_threshold = size;
        self
    }

    /// Enable diagnostic snapshots under the given directory
    #[must_use = "builder methods return the updated builder"]
    pub fn snapshot_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.snapshot_dir = Some(dir.into());
        self
    }

    /// Validate the settings and produce a [`ReflowConfig`].
    ///
    /// # Errors
    ///
    /// Returns [`ReflowError::Config`] when a threshold is non-finite,
    /// a ratio or distance is out of range, or the fuzzy threshold lies
    /// outside `0..=100`.
    pub fn build(self) -> Result<ReflowConfig> {
        let finite = [
            ("line_overlap_ratio", self.line_overlap_ratio),
            ("sparsity_bias", self.sparsity_bias),
            ("number_density_bias", self.number_density_bias),
            ("line_length_bias", self.line_length_bias),
            ("margin_bias", self.margin_bias),
            ("degenerate_threshold", self.degenerate_threshold),
            ("fuzzy_threshold", self.fuzzy_threshold),
            ("heading_length_stddevs", self.heading_length_stddevs),
            ("vertical_gap_threshold", self.vertical_gap_threshold),
            ("indent_threshold", self.indent_threshold),
            ("font_size_threshold", self.font_size_threshold),
        ];
        for (name, value) in finite {
            if !value.is_finite() {
                return Err(ReflowError::Config {
                    reason: format!("{name} must be finite, got {value}"),
                });
            }
        }
        if self.line_overlap_ratio <= 0.0 || self.line_overlap_ratio > 1.0 {
            return Err(ReflowError::Config {
                reason: format!(
                    "line_overlap_ratio must lie in (0, 1], got {}",
                    self.line_overlap_ratio
                ),
            });
        }
        if !(0.0..=100.0).contains(&self.fuzzy_threshold) {
            return Err(ReflowError::Config {
                reason: format!(
                    "fuzzy_threshold must lie in 0..=100, got {}",
                    self.fuzzy_threshold
                ),
            });
        }
        for (name, value) in [
            ("heading_length_stddevs", self.heading_length_stddevs),
            ("vertical_gap_threshold", self.vertical_gap_threshold),
            ("indent_threshold", self.indent_threshold),
            ("font_size_threshold", self.font_size_threshold),
        ] {
            if value < 0.0 {
                return Err(ReflowError::Config {
                    reason: format!("{name} must be non-negative, got {value}"),
                });
            }
        }

        Ok(ReflowConfig {
            line_overlap_ratio: self.line_overlap_ratio,
            sparsity_bias: self.sparsity_bias,
            number_density_bias: self.number_density_bias,
            line_length_bias: self.line_length_bias,
            margin_bias: self.margin_bias,
            degenerate_threshold: self.degenerate_threshold,
            fuzzy_threshold: self.fuzzy_threshold,
            heading_length_stddevs: self.heading_length_stddevs,
            vertical_gap_threshold: self.vertical_gap_threshold,
            indent_threshold: self.indent_threshold,
            font_size_threshold: self.font_size_threshold,
            snapshot_dir: self.snapshot_dir,
        })
    }
}
