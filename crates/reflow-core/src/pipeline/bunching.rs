//! Span-to-line bunching.
//!
//! Spans are sorted into geometric reading order (page, top edge, left
//! edge) and scanned once per page. A span joins the current line when its
//! vertical overlap with the previous span, normalized by their average
//! height, exceeds the configured ratio; otherwise the accumulated line is
//! closed and a new one starts.

use crate::config::ReflowConfig;
use crate::types::{Line, LineFlags, PageSpans, Span};

/// Group spans into visual lines, ordered by page and position.
///
/// Pages and spans may arrive in any order; the scan re-sorts with a total
/// ordering so the output is identical for any permutation of the input.
/// A page with zero spans yields zero lines.
#[must_use = "returns the bunched lines"]
pub fn bunch_lines(pages: &[PageSpans], config: &ReflowConfig) -> Vec<Line> {
    let mut ordered: Vec<&PageSpans> = pages.iter().collect();
    ordered.sort_by_key(|p| p.page);

    let mut lines = Vec::new();
    for page in ordered {
        let mut spans: Vec<&Span> = page.spans.iter().collect();
        spans.sort_by(|a, b| a.scan_order(b));

        let mut current: Vec<&Span> = Vec::new();
        let mut previous: Option<&Span> = None;
        for span in spans {
            if let Some(prev) = previous {
                let overlap = prev.bbox.vertical_overlap(&span.bbox);
                let avg_height = (prev.bbox.height() + span.bbox.height()) / 2.0;
                // zero-height pairs cannot overlap meaningfully; close the line
                let same_line =
                    avg_height > 0.0 && overlap / avg_height > config.line_overlap_ratio;
                if !same_line {
                    lines.push(assemble_line(page.page, &current));
                    current.clear();
                }
            }
            current.push(span);
            previous = Some(span);
        }
        if !current.is_empty() {
            lines.push(assemble_line(page.page, &current));
        }
    }
    lines
}

/// Close an accumulated line: bbox is the union of member boxes, text joins
/// members left to right, font attributes take the modal member value.
fn assemble_line(page: usize, members: &[&Span]) -> Line {
    debug_assert!(!members.is_empty(), "lines are closed only when non-empty");

    let mut bbox = members[0].bbox;
    for span in &members[1..] {
        bbox = bbox.union(&span.bbox);
    }

    let mut by_x: Vec<&Span> = members.to_vec();
    by_x.sort_by(|a, b| a.bbox.l.total_cmp(&b.bbox.l));
    let text = by_x
        .iter()
        .map(|s| s.text.as_str())
        .collect::<Vec<_>>()
        .join(" ");

    Line {
        page,
        text,
        bbox,
        font_size: modal(members.iter().map(|s| s.font_size)).unwrap_or_default(),
        font_family: modal(members.iter().map(|s| s.font_family.clone())).unwrap_or_default(),
        style: crate::types::FontStyle {
            bold: modal(members.iter().map(|s| s.style.bold)).unwrap_or_default(),
            italic: modal(members.iter().map(|s| s.style.italic)).unwrap_or_default(),
        },
        flags: LineFlags::default(),
    }
}

/// Most frequent value in scan order; ties go to the first-seen value.
fn modal<T: PartialEq + Clone>(items: impl Iterator<Item = T>) -> Option<T> {
    let mut counts: Vec<(T, usize)> = Vec::new();
    for item in items {
        match counts.iter_mut().find(|(value, _)| *value == item) {
            Some((_, count)) => *count += 1,
            None => counts.push((item, 1)),
        }
    }
    let mut best: Option<(T, usize)> = None;
    for (value, count) in counts {
        let replace = best.as_ref().map_or(true, |(_, best_count)| count > *best_count);
        if replace {
            best = Some((value, count));
        }
    }
    best.map(|(value, _)| value)
}
