//! Paragraph post-processing: cleaning, hyphen joining, heading merging.
//!
//! Three passes in order. Cleaning explodes all-TOC/all-heading paragraphs
//! into singletons and normalizes body text to printable ASCII with single
//! spaces. Hyphen joining repairs words split across line boundaries
//! inside a paragraph. Heading merging repairs headings that bunching or
//! segmentation fragmented into several singleton paragraphs.

use crate::types::Paragraph;

/// Replace every character outside printable ASCII with `?` and collapse
/// whitespace runs to single spaces. ASCII whitespace survives the first
/// step so the collapse can see it. Running this twice changes nothing.
fn clean_text(text: &str) -> String {
    let ascii: String = text
        .chars()
        .map(|c| {
            if c.is_ascii_whitespace() || (c.is_ascii() && !c.is_ascii_control()) {
                c
            } else {
                '?'
            }
        })
        .collect();
    ascii.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Cleaning pass.
///
/// Paragraphs composed entirely of TOC lines or entirely of heading lines
/// are exploded into one paragraph per line, keeping their flags; all
/// other paragraphs get their line text cleaned in place.
#[must_use = "returns the cleaned paragraphs"]
pub fn clean_paragraphs(paragraphs: Vec<Paragraph>) -> Vec<Paragraph> {
    let mut cleaned = Vec::with_capacity(paragraphs.len());
    for paragraph in paragraphs {
        if paragraph.is_all_toc() || paragraph.is_all_heading() {
            cleaned.extend(paragraph.lines.into_iter().map(Paragraph::singleton));
            continue;
        }
        let lines = paragraph
            .lines
            .into_iter()
            .map(|mut line| {
                line.text = clean_text(&line.text);
                line
            })
            .collect();
        cleaned.push(Paragraph { lines });
    }
    cleaned
}

/// Hyphen-joining pass.
///
/// For every adjacent line pair within a paragraph where the first line's
/// trailing token ends in `-`, the hyphen is dropped, the token is joined
/// with the next line's leading token, and the remaining tokens are
/// redistributed onto the two lines. Never merges across paragraph
/// boundaries.
#[must_use = "returns the de-hyphenated paragraphs"]
pub fn join_hyphenated_words(mut paragraphs: Vec<Paragraph>) -> Vec<Paragraph> {
    for paragraph in &mut paragraphs {
        for i in 0..paragraph.lines.len().saturating_sub(1) {
            let current = paragraph.lines[i].text.trim_end().to_string();
            let next = paragraph.lines[i + 1].text.trim_start().to_string();

            let Some(stripped) = current.strip_suffix('-') else {
                continue;
            };
            let mut current_tokens: Vec<&str> = stripped.split_whitespace().collect();
            let next_tokens: Vec<&str> = next.split_whitespace().collect();
            let (Some(&last), Some(&first)) = (current_tokens.last(), next_tokens.first()) else {
                continue;
            };

            let combined = format!("{last}{first}");
            current_tokens.pop();
            let mut rebuilt: Vec<String> =
                current_tokens.iter().map(|t| (*t).to_string()).collect();
            rebuilt.push(combined);
            paragraph.lines[i].text = rebuilt.join(" ");
            paragraph.lines[i + 1].text = next_tokens[1..].join(" ");
        }
    }
    paragraphs
}

/// Heading-merging pass.
///
/// Maximal runs of consecutive paragraphs whose first line is
/// heading-flagged collapse into one single-line paragraph: texts joined
/// with spaces, flags and page taken from the first line. Empty
/// paragraphs are dropped.
#[must_use = "returns the merged paragraphs"]
pub fn merge_heading_paragraphs(paragraphs: Vec<Paragraph>) -> Vec<Paragraph> {
    let mut merged = Vec::with_capacity(paragraphs.len());
    let mut iter = paragraphs.into_iter().peekable();

    while let Some(paragraph) = iter.next() {
        let starts_heading = paragraph
            .lines
            .first()
            .is_some_and(|line| line.flags.heading);
        if !starts_heading {
            if !paragraph.lines.is_empty() {
                merged.push(paragraph);
            }
            continue;
        }

        let mut texts: Vec<String> = paragraph.lines.iter().map(|l| l.text.clone()).collect();
        let Some(mut first_line) = paragraph.lines.into_iter().next() else {
            continue;
        };
        while iter
            .peek()
            .and_then(|p| p.lines.first())
            .is_some_and(|line| line.flags.heading)
        {
            let Some(next) = iter.next() else { break };
            texts.extend(next.lines.iter().map(|l| l.text.clone()));
        }
        first_line.text = texts.join(" ");
        merged.push(Paragraph::singleton(first_line));
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{BBox, FontStyle, Line, LineFlags};

    fn line(text: &str) -> Line {
        Line {
            page: 1,
            text: text.to_string(),
            bbox: BBox::new(0.0, 0.0, 10.0, 10.0),
            font_size: 12.0,
            font_family: "Serif".to_string(),
            style: FontStyle::default(),
            flags: LineFlags::default(),
        }
    }

    fn heading_line(text: &str, page: usize) -> Line {
        let mut l = line(text);
        l.page = page;
        l.flags.heading = true;
        l
    }

    fn paragraph(texts: &[&str]) -> Paragraph {
        Paragraph {
            lines: texts.iter().map(|t| line(t)).collect(),
        }
    }

    #[test]
    fn clean_replaces_non_ascii_and_collapses_whitespace() {
        let cleaned = clean_paragraphs(vec![paragraph(&["  caf\u{e9}   au \t lait  "])]);
        assert_eq!(cleaned[0].lines[0].text, "caf? au lait");
    }

    #[test]
    fn clean_replaces_control_characters_but_not_whitespace() {
        let cleaned = clean_paragraphs(vec![paragraph(&["bell\u{7}char\tand tab"])]);
        assert_eq!(cleaned[0].lines[0].text, "bell?char and tab");
    }

    #[test]
    fn clean_is_idempotent() {
        let once = clean_paragraphs(vec![paragraph(&["ex\u{2014}tra   spa ce"])]);
        let twice = clean_paragraphs(once.clone());
        assert_eq!(once, twice);
    }

    #[test]
    fn clean_explodes_all_toc_paragraphs() {
        let mut a = line("Chapter One 5");
        a.flags.toc = true;
        let mut b = line("Chapter Two 12");
        b.flags.toc = true;
        let cleaned = clean_paragraphs(vec![Paragraph { lines: vec![a, b] }]);
        assert_eq!(cleaned.len(), 2);
        assert!(cleaned.iter().all(|p| p.lines.len() == 1));
        assert!(cleaned.iter().all(|p| p.lines[0].flags.toc));
        // exploded lines are not cleaned; special status is preserved as-is
        assert_eq!(cleaned[0].lines[0].text, "Chapter One 5");
    }

    #[test]
    fn clean_leaves_mixed_paragraphs_whole() {
        let mut flagged = line("Chapter One");
        flagged.flags.heading = true;
        let cleaned = clean_paragraphs(vec![Paragraph {
            lines: vec![flagged, line("body text")],
        }]);
        assert_eq!(cleaned.len(), 1);
        assert_eq!(cleaned[0].lines.len(), 2);
    }

    #[test]
    fn hyphen_join_combines_the_split_word() {
        let joined = join_hyphenated_words(vec![paragraph(&["exam-", "ple text"])]);
        assert_eq!(joined[0].lines[0].text, "example");
        assert_eq!(joined[0].lines[1].text, "text");
    }

    #[test]
    fn hyphen_join_keeps_leading_tokens() {
        let joined = join_hyphenated_words(vec![paragraph(&["see the exam-", "ple here"])]);
        assert_eq!(joined[0].lines[0].text, "see the example");
        assert_eq!(joined[0].lines[1].text, "here");
    }

    #[test]
    fn hyphen_join_chains_through_consecutive_splits() {
        let joined = join_hyphenated_words(vec![paragraph(&["a b-", "c d-", "e"])]);
        assert_eq!(joined[0].lines[0].text, "a bc");
        assert_eq!(joined[0].lines[1].text, "de");
        assert_eq!(joined[0].lines[2].text, "");
    }

    #[test]
    fn hyphen_join_ignores_unhyphenated_lines() {
        let joined = join_hyphenated_words(vec![paragraph(&["plain text", "more text"])]);
        assert_eq!(joined[0].lines[0].text, "plain text");
        assert_eq!(joined[0].lines[1].text, "more text");
    }

    #[test]
    fn hyphen_join_skips_when_either_side_is_empty() {
        let joined = join_hyphenated_words(vec![paragraph(&["word-", "   "])]);
        assert_eq!(joined[0].lines[0].text, "word-");

        let joined = join_hyphenated_words(vec![paragraph(&["-", "next"])]);
        assert_eq!(joined[0].lines[0].text, "-");
        assert_eq!(joined[0].lines[1].text, "next");
    }

    #[test]
    fn hyphen_join_never_crosses_paragraphs() {
        let joined = join_hyphenated_words(vec![
            paragraph(&["first exam-"]),
            paragraph(&["ple second"]),
        ]);
        assert_eq!(joined[0].lines[0].text, "first exam-");
        assert_eq!(joined[1].lines[0].text, "ple second");
    }

    #[test]
    fn consecutive_heading_singletons_merge() {
        let merged = merge_heading_paragraphs(vec![
            Paragraph::singleton(heading_line("Chapter One:", 7)),
            Paragraph::singleton(heading_line("The Beginning", 7)),
            paragraph(&["body text"]),
        ]);
        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0].lines.len(), 1);
        assert_eq!(merged[0].lines[0].text, "Chapter One: The Beginning");
        assert!(merged[0].lines[0].flags.heading);
        assert_eq!(merged[0].lines[0].page, 7);
        assert_eq!(merged[1].lines[0].text, "body text");
    }

    #[test]
    fn lone_heading_survives_merge_unchanged() {
        let merged = merge_heading_paragraphs(vec![
            Paragraph::singleton(heading_line("Epilogue", 3)),
            paragraph(&["body"]),
        ]);
        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0].lines[0].text, "Epilogue");
    }

    #[test]
    fn merge_drops_empty_paragraphs() {
        let merged = merge_heading_paragraphs(vec![
            Paragraph::default(),
            paragraph(&["body"]),
            Paragraph::default(),
        ]);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].lines[0].text, "body");
    }

    #[test]
    fn separated_headings_do_not_merge() {
        let merged = merge_heading_paragraphs(vec![
            Paragraph::singleton(heading_line("Chapter One", 2)),
            paragraph(&["body between"]),
            Paragraph::singleton(heading_line("Chapter Two", 9)),
        ]);
        assert_eq!(merged.len(), 3);
        assert_eq!(merged[0].lines[0].text, "Chapter One");
        assert_eq!(merged[2].lines[0].text, "Chapter Two");
    }
}
