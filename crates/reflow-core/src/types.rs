//! Core data model: spans, lines, paragraphs and the renderer-facing output.
//!
//! Spans are the immutable input produced by the external extractor. Lines
//! are derived by bunching spans on vertical overlap; paragraphs are ordered
//! line sequences produced by the segmenter. Every type is serializable so
//! that stage outputs can be snapshotted for inspection.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Axis-aligned bounding box with top-left origin (y grows downward).
///
/// Coordinates are in the extractor's page units (typically PDF points).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BBox {
    /// Left x-coordinate
    pub l: f64,
    /// Top y-coordinate
    pub t: f64,
    /// Right x-coordinate
    pub r: f64,
    /// Bottom y-coordinate
    pub b: f64,
}

impl BBox {
    /// Create a new bounding box
    #[inline]
    #[must_use = "returns a new BBox instance"]
    pub const fn new(l: f64, t: f64, r: f64, b: f64) -> Self {
        Self { l, t, r, b }
    }

    /// Width of the box
    #[inline]
    #[must_use = "returns the box width"]
    pub fn width(&self) -> f64 {
        self.r - self.l
    }

    /// Height of the box
    #[inline]
    #[must_use = "returns the box height"]
    pub fn height(&self) -> f64 {
        self.b - self.t
    }

    /// Area of the box (handles inverted coordinates)
    #[inline]
    #[must_use = "returns the box area"]
    pub fn area(&self) -> f64 {
        self.width().abs() * self.height().abs()
    }

    /// Smallest box containing both `self` and `other`
    #[inline]
    #[must_use = "returns the union of the two boxes"]
    pub fn union(&self, other: &Self) -> Self {
        Self {
            l: self.l.min(other.l),
            t: self.t.min(other.t),
            r: self.r.max(other.r),
            b: self.b.max(other.b),
        }
    }

    /// Signed vertical overlap with another box; negative when the vertical
    /// extents are disjoint.
    #[inline]
    #[must_use = "returns the signed vertical overlap"]
    pub fn vertical_overlap(&self, other: &Self) -> f64 {
        self.b.min(other.b) - self.t.max(other.t)
    }
}

/// Bold/italic styling carried by a span or a line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FontStyle {
    /// Whether the text is bold
    #[serde(default)]
    pub bold: bool,
    /// Whether the text is italic
    #[serde(default)]
    pub italic: bool,
}

/// Positioned text fragment with uniform font styling, as produced by the
/// external span extractor. Many spans make up one visual line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Span {
    /// Page number the span appears on
    pub page: usize,
    /// Bounding box on the page
    pub bbox: BBox,
    /// Text content
    pub text: String,
    /// Font size in page units
    pub font_size: f64,
    /// Font family name
    pub font_family: String,
    /// Bold/italic flags
    #[serde(default)]
    pub style: FontStyle,
}

impl Span {
    /// Whether the span's trimmed text is a bare page-style number.
    ///
    /// Lone-number spans feed the per-page number-density statistic used to
    /// spot table-of-contents pages.
    #[inline]
    #[must_use = "returns whether the span is a lone number"]
    pub fn is_lone_number(&self) -> bool {
        let trimmed = self.text.trim();
        !trimmed.is_empty() && trimmed.chars().all(|c| c.is_ascii_digit())
    }

    /// Total order used for the bunching scan: page, then top edge, then
    /// left edge, with the remaining fields as tie-breaks so that equal
    /// positions still order deterministically regardless of input order.
    #[must_use = "returns the scan ordering between two spans"]
    pub fn scan_order(&self, other: &Self) -> Ordering {
        self.page
            .cmp(&other.page)
            .then_with(|| self.bbox.t.total_cmp(&other.bbox.t))
            .then_with(|| self.bbox.l.total_cmp(&other.bbox.l))
            .then_with(|| self.bbox.b.total_cmp(&other.bbox.b))
            .then_with(|| self.bbox.r.total_cmp(&other.bbox.r))
            .then_with(|| self.text.cmp(&other.text))
            .then_with(|| self.font_size.total_cmp(&other.font_size))
            .then_with(|| self.font_family.cmp(&other.font_family))
            .then_with(|| (self.style.bold, self.style.italic).cmp(&(other.style.bold, other.style.italic)))
    }
}

/// One page worth of spans together with the page dimensions.
///
/// This is the unit handed over by the external span source. No ordering is
/// required of the spans; the pipeline re-sorts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageSpans {
    /// Page number
    pub page: usize,
    /// Page width in page units
    pub width: f64,
    /// Page height in page units
    pub height: f64,
    /// Spans on this page, any order
    pub spans: Vec<Span>,
}

/// Classification flags attached to a line by the structure detector.
///
/// Flags are written exactly once (between profiling and segmentation) and
/// read-only afterwards.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LineFlags {
    /// Line sits on a confirmed table-of-contents page
    #[serde(default)]
    pub toc: bool,
    /// Line is a confirmed chapter heading
    #[serde(default)]
    pub heading: bool,
    /// Line opens a paragraph that visually continues one split across a
    /// page break (suppresses first-line indent on render)
    #[serde(default)]
    pub split_paragraph: bool,
}

/// A visual line of text: spans merged on vertical overlap.
///
/// The bbox spans the union of the member spans; the text joins member spans
/// in left-to-right order; font attributes are the modal values among the
/// members (ties broken by first-seen order).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Line {
    /// Page number
    pub page: usize,
    /// Text content, members joined left to right
    pub text: String,
    /// Union of member span boxes
    pub bbox: BBox,
    /// Modal font size among members
    pub font_size: f64,
    /// Modal font family among members
    pub font_family: String,
    /// Modal bold/italic flags among members
    pub style: FontStyle,
    /// Classification flags, set by the structure detector
    #[serde(default)]
    pub flags: LineFlags,
}

impl Line {
    /// Left margin of the line
    #[inline]
    #[must_use = "returns the line's left margin"]
    pub fn indent(&self) -> f64 {
        self.bbox.l
    }

    /// Horizontal extent of the line
    #[inline]
    #[must_use = "returns the line's horizontal extent"]
    pub fn length(&self) -> f64 {
        self.bbox.width()
    }

    /// Top edge of the line
    #[inline]
    #[must_use = "returns the line's top edge"]
    pub fn top(&self) -> f64 {
        self.bbox.t
    }

    /// Bottom edge of the line
    #[inline]
    #[must_use = "returns the line's bottom edge"]
    pub fn bottom(&self) -> f64 {
        self.bbox.b
    }
}

impl fmt::Display for Line {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "p{} [{:.1},{:.1}] {}", self.page, self.bbox.l, self.bbox.t, self.text)
    }
}

/// Ordered sequence of lines bounded by detected breaks.
///
/// TOC and heading lines are always singleton paragraphs. Paragraphs are
/// rebuilt by each post-processing pass rather than mutated in place.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Paragraph {
    /// Member lines in reading order
    pub lines: Vec<Line>,
}

impl Paragraph {
    /// Paragraph holding a single line
    #[inline]
    #[must_use = "returns a singleton paragraph"]
    pub fn singleton(line: Line) -> Self {
        Self { lines: vec![line] }
    }

    /// Whether every member line carries the TOC flag (false when empty)
    #[must_use = "returns whether all lines are TOC lines"]
    pub fn is_all_toc(&self) -> bool {
        !self.lines.is_empty() && self.lines.iter().all(|l| l.flags.toc)
    }

    /// Whether every member line carries the heading flag (false when empty)
    #[must_use = "returns whether all lines are heading lines"]
    pub fn is_all_heading(&self) -> bool {
        !self.lines.is_empty() && self.lines.iter().all(|l| l.flags.heading)
    }
}

/// One renderer-facing line record.
///
/// `indent` is set only on a paragraph's first line when the paragraph is
/// not a page-break continuation; the renderer uses it to decide first-line
/// indentation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineRecord {
    /// Text content
    pub text: String,
    /// Font size in page units
    pub font_size: f64,
    /// Bold/italic flags
    pub style: FontStyle,
    /// Whether the record belongs to a confirmed heading
    pub is_heading: bool,
    /// Whether the record belongs to a TOC page
    pub is_toc: bool,
    /// Whether the renderer should indent this line
    pub indent: bool,
    /// Page number the content originated from
    pub page: usize,
}

/// Renderer-facing paragraph: an ordered sequence of line records.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParagraphRecord {
    /// Member line records in reading order
    pub lines: Vec<LineRecord>,
}

/// Final output of the pipeline: the reconstructed document structure,
/// ready to be re-flowed by an external renderer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StructuredDocument {
    /// Paragraph records in reading order
    pub paragraphs: Vec<ParagraphRecord>,
}

impl StructuredDocument {
    /// Number of paragraph records
    #[inline]
    #[must_use = "returns the number of paragraphs"]
    pub fn len(&self) -> usize {
        self.paragraphs.len()
    }

    /// Whether the document holds no paragraphs
    #[inline]
    #[must_use = "returns whether the document is empty"]
    pub fn is_empty(&self) -> bool {
        self.paragraphs.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn span_at(t: f64, b: f64, text: &str) -> Span {
        Span {
            page: 0,
            bbox: BBox::new(0.0, t, 10.0, b),
            text: text.to_string(),
            font_size: 12.0,
            font_family: "Serif".to_string(),
            style: FontStyle::default(),
        }
    }

    #[test]
    fn bbox_union_covers_both() {
        let a = BBox::new(0.0, 0.0, 10.0, 5.0);
        let b = BBox::new(5.0, 2.0, 20.0, 8.0);
        let u = a.union(&b);
        assert_eq!(u, BBox::new(0.0, 0.0, 20.0, 8.0));
    }

    #[test]
    fn bbox_vertical_overlap_signed() {
        let a = BBox::new(0.0, 0.0, 10.0, 6.0);
        let b = BBox::new(0.0, 4.0, 10.0, 10.0);
        assert_eq!(a.vertical_overlap(&b), 2.0);
        let c = BBox::new(0.0, 8.0, 10.0, 12.0);
        assert_eq!(a.vertical_overlap(&c), -2.0);
    }

    #[test]
    fn lone_number_detection() {
        assert!(span_at(0.0, 1.0, "42").is_lone_number());
        assert!(span_at(0.0, 1.0, "  7 ").is_lone_number());
        assert!(!span_at(0.0, 1.0, "42a").is_lone_number());
        assert!(!span_at(0.0, 1.0, "4.2").is_lone_number());
        assert!(!span_at(0.0, 1.0, "").is_lone_number());
        assert!(!span_at(0.0, 1.0, "   ").is_lone_number());
    }

    #[test]
    fn scan_order_breaks_position_ties() {
        let a = span_at(0.0, 1.0, "alpha");
        let b = span_at(0.0, 1.0, "beta");
        assert_eq!(a.scan_order(&b), Ordering::Less);
        assert_eq!(b.scan_order(&a), Ordering::Greater);
        assert_eq!(a.scan_order(&a.clone()), Ordering::Equal);
    }

    #[test]
    fn paragraph_flag_predicates() {
        let mut line = Line {
            page: 0,
            text: "x".to_string(),
            bbox: BBox::new(0.0, 0.0, 1.0, 1.0),
            font_size: 12.0,
            font_family: "Serif".to_string(),
            style: FontStyle::default(),
            flags: LineFlags::default(),
        };
        let plain = Paragraph::singleton(line.clone());
        assert!(!plain.is_all_toc());
        assert!(!plain.is_all_heading());

        line.flags.toc = true;
        assert!(Paragraph::singleton(line.clone()).is_all_toc());

        assert!(!Paragraph::default().is_all_toc());
        assert!(!Paragraph::default().is_all_heading());
    }
}
