//! Paragraph segmentation.
//!
//! One left-to-right, top-to-bottom pass over the flagged line sequence.
//! The carry-state (previous line's bottom edge, indent, font size and
//! page) is an explicit value so each transition is auditable in
//! isolation: TOC and heading lines force singleton paragraphs, page
//! breaks always open a paragraph (marking visual continuations), and
//! within a page a vertical gap, indent jump or font-size change opens
//! one.

use crate::config::ReflowConfig;
use crate::types::{Line, Paragraph};

/// Geometry carried forward from the previously seen line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SegmentCarry {
    /// Bottom edge of the previous line
    pub bottom: f64,
    /// Left margin of the previous line
    pub indent: f64,
    /// Font size of the previous line
    pub font_size: f64,
    /// Page of the previous line
    pub page: usize,
}

/// What the segmenter does with the next line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Append to the current paragraph
    Continue,
    /// Open a new paragraph; `page_continuation` marks a page-break
    /// paragraph whose indent step stays small enough to read as the
    /// continuation of the interrupted paragraph
    Break {
        /// Whether the new paragraph continues one split by the page break
        page_continuation: bool,
    },
}

impl SegmentCarry {
    /// Carry-state derived from a line just processed.
    #[inline]
    #[must_use = "returns the carry-state for the given line"]
    pub fn from_line(line: &Line) -> Self {
        Self {
            bottom: line.bottom(),
            indent: line.indent(),
            font_size: line.font_size,
            page: line.page,
        }
    }

    /// Decide the transition for the next line.
    #[must_use = "returns the transition for the next line"]
    pub fn transition(&self, line: &Line, config: &ReflowConfig) -> Transition {
        if line.page != self.page {
            let page_continuation = line.indent() - self.indent <= config.indent_threshold;
            return Transition::Break { page_continuation };
        }
        let vertical_gap = line.top() - self.bottom;
        let indent_change = line.indent() - self.indent;
        let font_size_change = (line.font_size - self.font_size).abs();
        if vertical_gap > config.vertical_gap_threshold
            || indent_change > config.indent_threshold
            || font_size_change > config.font_size_threshold
        {
            Transition::Break {
                page_continuation: false,
            }
        } else {
            Transition::Continue
        }
    }
}

/// Partition the ordered line sequence into paragraphs.
///
/// TOC and heading lines always close the current paragraph and become
/// singleton paragraphs of their own; their geometry still feeds the
/// carry-state.
#[must_use = "returns the segmented paragraphs"]
pub fn segment_paragraphs(lines: Vec<Line>, config: &ReflowConfig) -> Vec<Paragraph> {
    let mut paragraphs = Vec::new();
    let mut current: Vec<Line> = Vec::new();
    let mut carry: Option<SegmentCarry> = None;

    for mut line in lines {
        let next_carry = SegmentCarry::from_line(&line);

        if line.flags.toc || line.flags.heading {
            if !current.is_empty() {
                paragraphs.push(Paragraph {
                    lines: std::mem::take(&mut current),
                });
            }
            paragraphs.push(Paragraph::singleton(line));
            carry = Some(next_carry);
            continue;
        }

        match carry.map(|c| c.transition(&line, config)) {
            Some(Transition::Break { page_continuation }) => {
                if page_continuation {
                    line.flags.split_paragraph = true;
                }
                if !current.is_empty() {
                    paragraphs.push(Paragraph {
                        lines: std::mem::take(&mut current),
                    });
                }
                current.push(line);
            }
            // the document's first line opens the first paragraph
            Some(Transition::Continue) | None => current.push(line),
        }
        carry = Some(next_carry);
    }

    if !current.is_empty() {
        paragraphs.push(Paragraph { lines: current });
    }
    paragraphs
}
