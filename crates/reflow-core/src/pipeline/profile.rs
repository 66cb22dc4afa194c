//! Per-page statistical profiling and corpus-wide threshold derivation.
//!
//! For every page the profiler measures sparsity (fraction of the page not
//! covered by span boxes), lone-number density, line-length statistics and
//! the most frequent left-margin positions. The corpus thresholds are then
//! derived from the distribution of those per-page measurements as
//! `((mode - mean) / stddev) + bias`, falling back to a fixed constant for
//! zero-variance distributions. All divisions are guarded; degenerate
//! inputs produce fallback values, never errors.

use crate::config::ReflowConfig;
use crate::types::{Line, PageSpans};
use serde::{Deserialize, Serialize};

/// Per-page aggregate statistics, computed once and read-only afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageProfile {
    /// Page number
    pub page: usize,
    /// Fraction of the page area not covered by span boxes (0 for a
    /// zero-area page)
    pub sparsity: f64,
    /// Lone-number span count divided by sparsity (0 when sparsity is 0;
    /// fully covered pages score zero by policy, not highest)
    pub number_density: f64,
    /// Mean line width on the page
    pub avg_line_length: f64,
    /// Sample standard deviation of line widths on the page
    pub std_line_length: f64,
    /// Four most frequent rounded left-margin positions; missing slots
    /// reuse the page's mean left margin
    pub margin_modes: [f64; 4],
}

/// Corpus-wide decision thresholds, frozen after one pass over the
/// profiles. Carries the aggregates the detector needs alongside the
/// derived thresholds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorpusThresholds {
    /// Normalized-deviation cutoff below which a page is too dense to carry
    /// TOC or heading structure
    pub sparsity: f64,
    /// Number-density cutoff for TOC candidacy
    pub number_density: f64,
    /// Line-length cutoff for TOC/heading candidacy
    pub line_length: f64,
    /// Margin cutoff for TOC/heading candidacy and off-margin outliers
    pub off_margin: f64,
    /// Corpus mean of per-page sparsity
    pub sparsity_mean: f64,
    /// Corpus standard deviation of per-page sparsity
    pub sparsity_std: f64,
    /// Corpus mode of per-page average line length
    pub line_length_mode: f64,
    /// Corpus standard deviation of per-page average line length
    pub line_length_std: f64,
    /// Corpus mode of per-page primary margin position
    pub margin_mode: f64,
}

/// Profile every page: sparsity and number density from the spans, line
/// statistics from the bunched lines.
///
/// Pages with no spans or no lines yield zeroed statistics (sparsity 1 for
/// a non-degenerate empty page) rather than being dropped, so corpus
/// aggregation never divides by a missing population.
#[must_use = "returns the per-page profiles"]
pub fn profile_pages(pages: &[PageSpans], lines: &[Line]) -> Vec<PageProfile> {
    let mut ordered: Vec<&PageSpans> = pages.iter().collect();
    ordered.sort_by_key(|p| p.page);

    ordered
        .into_iter()
        .map(|page| {
            let page_area = page.width * page.height;
            let covered: f64 = page.spans.iter().map(|s| s.bbox.area()).sum();
            let sparsity = if page_area > 0.0 {
                1.0 - covered / page_area
            } else {
                0.0
            };

            let lone_numbers = page.spans.iter().filter(|s| s.is_lone_number()).count();
            // fully covered pages have sparsity 0 and score 0 here, not
            // +inf; preserved intentionally
            let number_density = if sparsity != 0.0 {
                lone_numbers as f64 / sparsity
            } else {
                0.0
            };

            let page_lines: Vec<&Line> = lines.iter().filter(|l| l.page == page.page).collect();
            let lengths: Vec<f64> = page_lines.iter().map(|l| l.length()).collect();
            let avg_line_length = mean(&lengths);
            let std_line_length = sample_std(&lengths, avg_line_length);

            let lefts: Vec<f64> = page_lines.iter().map(|l| l.indent()).collect();
            let margin_modes = top_margin_modes(&lefts, mean(&lefts));

            PageProfile {
                page: page.page,
                sparsity,
                number_density,
                avg_line_length,
                std_line_length,
                margin_modes,
            }
        })
        .collect()
}

/// Derive the frozen corpus thresholds from the page profiles.
#[must_use = "returns the derived corpus thresholds"]
pub fn corpus_thresholds(profiles: &[PageProfile], config: &ReflowConfig) -> CorpusThresholds {
    let sparsity: Vec<f64> = profiles.iter().map(|p| p.sparsity).collect();
    let number_density: Vec<f64> = profiles.iter().map(|p| p.number_density).collect();
    let line_length: Vec<f64> = profiles.iter().map(|p| p.avg_line_length).collect();
    let margin: Vec<f64> = profiles.iter().map(|p| p.margin_modes[0]).collect();

    let sparsity = summarize(&sparsity);
    let number_density = summarize(&number_density);
    let line_length = summarize(&line_length);
    let margin = summarize(&margin);

    let fallback = config.degenerate_threshold;
    CorpusThresholds {
        sparsity: sparsity.threshold(config.sparsity_bias, fallback),
        number_density: number_density.threshold(config.number_density_bias, fallback),
        line_length: line_length.threshold(config.line_length_bias, fallback),
        off_margin: margin.threshold(config.margin_bias, fallback),
        sparsity_mean: sparsity.mean,
        sparsity_std: sparsity.std,
        line_length_mode: line_length.mode,
        line_length_std: line_length.std,
        margin_mode: margin.mode,
    }
}

/// Mean, sample standard deviation and mode of one statistic's
/// distribution across the corpus.
#[derive(Debug, Clone, Copy, PartialEq)]
struct StatSummary {
    mean: f64,
    std: f64,
    mode: f64,
}

impl StatSummary {
    /// `((mode - mean) / stddev) + bias`, or the fixed fallback for a
    /// zero-variance distribution.
    fn threshold(&self, bias: f64, fallback: f64) -> f64 {
        if self.std == 0.0 {
            fallback
        } else {
            (self.mode - self.mean) / self.std + bias
        }
    }
}

fn summarize(values: &[f64]) -> StatSummary {
    let mean_value = mean(values);
    StatSummary {
        mean: mean_value,
        std: sample_std(values, mean_value),
        // an empty population has no mode; reuse the mean
        mode: mode_exact(values).unwrap_or(mean_value),
    }
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

/// Sample standard deviation (n - 1 denominator); 0 for fewer than two
/// values.
fn sample_std(values: &[f64], mean_value: f64) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let sum_sq: f64 = values.iter().map(|v| (v - mean_value).powi(2)).sum();
    (sum_sq / (values.len() - 1) as f64).sqrt()
}

/// Most frequent exact value, ties broken by first-seen order. Values are
/// compared by bit pattern: repeated measurements of the same quantity
/// compare equal, everything else is distinct.
fn mode_exact(values: &[f64]) -> Option<f64> {
    let mut counts: Vec<(u64, f64, usize)> = Vec::new();
    for &value in values {
        let key = value.to_bits();
        match counts.iter_mut().find(|(k, _, _)| *k == key) {
            Some((_, _, count)) => *count += 1,
            None => counts.push((key, value, 1)),
        }
    }
    let mut best: Option<(f64, usize)> = None;
    for (_, value, count) in counts {
        let replace = best.map_or(true, |(_, best_count)| count > best_count);
        if replace {
            best = Some((value, count));
        }
    }
    best.map(|(value, _)| value)
}

/// Four most frequent rounded left positions (count-descending, first-seen
/// tie-break); missing slots are filled with `fill`.
fn top_margin_modes(lefts: &[f64], fill: f64) -> [f64; 4] {
    let mut counts: Vec<(i64, usize)> = Vec::new();
    for &left in lefts {
        let key = left.round() as i64;
        match counts.iter_mut().find(|(value, _)| *value == key) {
            Some((_, count)) => *count += 1,
            None => counts.push((key, 1)),
        }
    }
    let mut indexed: Vec<(usize, i64, usize)> = counts
        .iter()
        .enumerate()
        .map(|(idx, &(value, count))| (idx, value, count))
        .collect();
    indexed.sort_by(|a, b| b.2.cmp(&a.2).then(a.0.cmp(&b.0)));

    let mut modes = [fill; 4];
    for (slot, &(_, value, _)) in indexed.iter().take(4).enumerate() {
        modes[slot] = value as f64;
    }
    modes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{BBox, FontStyle, LineFlags, Span};

    fn span(page: usize, l: f64, t: f64, r: f64, b: f64, text: &str) -> Span {
        Span {
            page,
            bbox: BBox::new(l, t, r, b),
            text: text.to_string(),
            font_size: 12.0,
            font_family: "Serif".to_string(),
            style: FontStyle::default(),
        }
    }

    fn line(page: usize, l: f64, r: f64) -> Line {
        Line {
            page,
            text: "x".to_string(),
            bbox: BBox::new(l, 0.0, r, 10.0),
            font_size: 12.0,
            font_family: "Serif".to_string(),
            style: FontStyle::default(),
            flags: LineFlags::default(),
        }
    }

    fn approx(a: f64, b: f64) {
        assert!((a - b).abs() < 1e-9, "{a} != {b}");
    }

    #[test]
    fn sparsity_is_one_minus_coverage() {
        let pages = vec![PageSpans {
            page: 0,
            width: 100.0,
            height: 100.0,
            spans: vec![span(0, 0.0, 0.0, 50.0, 50.0, "a")],
        }];
        let profiles = profile_pages(&pages, &[]);
        approx(profiles[0].sparsity, 0.75);
    }

    #[test]
    fn zero_area_page_has_zero_sparsity() {
        let pages = vec![PageSpans {
            page: 0,
            width: 0.0,
            height: 100.0,
            spans: vec![span(0, 0.0, 0.0, 10.0, 10.0, "7")],
        }];
        let profiles = profile_pages(&pages, &[]);
        assert_eq!(profiles[0].sparsity, 0.0);
        assert_eq!(profiles[0].number_density, 0.0);
    }

    #[test]
    fn fully_covered_page_scores_zero_number_density() {
        // sparsity 0 means density 0 even with lone numbers present;
        // the densest pages rank lowest by policy
        let pages = vec![PageSpans {
            page: 0,
            width: 10.0,
            height: 10.0,
            spans: vec![span(0, 0.0, 0.0, 10.0, 10.0, "42")],
        }];
        let profiles = profile_pages(&pages, &[]);
        assert_eq!(profiles[0].sparsity, 0.0);
        assert_eq!(profiles[0].number_density, 0.0);
    }

    #[test]
    fn number_density_divides_by_sparsity() {
        let pages = vec![PageSpans {
            page: 0,
            width: 100.0,
            height: 100.0,
            spans: vec![
                span(0, 0.0, 0.0, 50.0, 50.0, "chapter"),
                span(0, 60.0, 0.0, 62.0, 2.0, "5"),
                span(0, 60.0, 10.0, 62.0, 12.0, "12"),
            ],
        }];
        let profiles = profile_pages(&pages, &[]);
        // covered 2500 + 4 + 4 = 2508, sparsity 0.7492
        approx(profiles[0].sparsity, 0.7492);
        approx(profiles[0].number_density, 2.0 / 0.7492);
    }

    #[test]
    fn empty_page_profile_is_zeroed_not_dropped() {
        let pages = vec![PageSpans {
            page: 4,
            width: 100.0,
            height: 100.0,
            spans: Vec::new(),
        }];
        let profiles = profile_pages(&pages, &[]);
        assert_eq!(profiles.len(), 1);
        assert_eq!(profiles[0].sparsity, 1.0);
        assert_eq!(profiles[0].number_density, 0.0);
        assert_eq!(profiles[0].avg_line_length, 0.0);
        assert_eq!(profiles[0].std_line_length, 0.0);
        assert_eq!(profiles[0].margin_modes, [0.0; 4]);
    }

    #[test]
    fn line_statistics_come_from_page_lines() {
        let pages = vec![PageSpans {
            page: 0,
            width: 100.0,
            height: 100.0,
            spans: Vec::new(),
        }];
        let lines = vec![line(0, 10.0, 90.0), line(0, 10.0, 50.0), line(1, 10.0, 70.0)];
        let profiles = profile_pages(&pages, &lines);
        // widths 80 and 40; the page-1 line is ignored
        approx(profiles[0].avg_line_length, 60.0);
        approx(profiles[0].std_line_length, (2.0f64 * 400.0).sqrt());
        assert_eq!(profiles[0].margin_modes[0], 10.0);
    }

    #[test]
    fn margin_modes_rank_by_count_then_first_seen() {
        let lefts = [10.0, 10.0, 20.0, 30.0, 30.0, 30.0, 40.0, 50.0];
        let modes = top_margin_modes(&lefts, 99.0);
        assert_eq!(modes, [30.0, 10.0, 20.0, 40.0]);
    }

    #[test]
    fn margin_modes_fill_missing_slots_with_mean() {
        let lefts = [10.0, 10.0, 12.0];
        let fill = mean(&lefts);
        let modes = top_margin_modes(&lefts, fill);
        assert_eq!(modes[0], 10.0);
        assert_eq!(modes[1], 12.0);
        approx(modes[2], 32.0 / 3.0);
        approx(modes[3], 32.0 / 3.0);
    }

    #[test]
    fn mode_exact_breaks_ties_first_seen() {
        assert_eq!(mode_exact(&[3.0, 5.0, 3.0, 5.0]), Some(3.0));
        assert_eq!(mode_exact(&[5.0, 3.0, 3.0, 5.0]), Some(5.0));
        assert_eq!(mode_exact(&[]), None);
    }

    #[test]
    fn threshold_formula_matches_hand_computation() {
        let summary = summarize(&[2.0, 2.0, 8.0]);
        approx(summary.mean, 4.0);
        approx(summary.std, 12.0f64.sqrt());
        approx(summary.mode, 2.0);
        approx(
            summary.threshold(0.5, 1.0),
            (2.0 - 4.0) / 12.0f64.sqrt() + 0.5,
        );
    }

    #[test]
    fn zero_variance_corpus_uses_fallback_threshold() {
        let profiles: Vec<PageProfile> = (0..5)
            .map(|page| PageProfile {
                page,
                sparsity: 0.5,
                number_density: 2.0,
                avg_line_length: 80.0,
                std_line_length: 0.0,
                margin_modes: [10.0; 4],
            })
            .collect();
        let thresholds = corpus_thresholds(&profiles, &ReflowConfig::default());
        assert_eq!(thresholds.sparsity, 1.0);
        assert_eq!(thresholds.number_density, 1.0);
        assert_eq!(thresholds.line_length, 1.0);
        assert_eq!(thresholds.off_margin, 1.0);
        assert_eq!(thresholds.sparsity_std, 0.0);
    }

    #[test]
    fn empty_corpus_does_not_panic() {
        let thresholds = corpus_thresholds(&[], &ReflowConfig::default());
        assert_eq!(thresholds.sparsity, 1.0);
        assert_eq!(thresholds.sparsity_mean, 0.0);
        assert_eq!(thresholds.line_length_mode, 0.0);
    }

    #[test]
    fn sparsity_stays_in_unit_interval_for_disjoint_spans() {
        let pages = vec![PageSpans {
            page: 0,
            width: 100.0,
            height: 100.0,
            spans: vec![
                span(0, 0.0, 0.0, 100.0, 50.0, "top"),
                span(0, 0.0, 50.0, 100.0, 100.0, "bottom"),
            ],
        }];
        let profiles = profile_pages(&pages, &[]);
        assert!(profiles[0].sparsity >= 0.0);
        assert!(profiles[0].sparsity <= 1.0);
        assert_eq!(profiles[0].sparsity, 0.0);
    }
}
