//! Structure-output assembly.
//!
//! Converts the final paragraphs into the renderer-facing record sequence:
//! TOC paragraphs keep line granularity, headings and body paragraphs
//! become single records with whitespace-normalized prose, and the indent
//! flag is set only on body paragraphs that are not page-break
//! continuations.

use crate::types::{LineRecord, Paragraph, ParagraphRecord, StructuredDocument};

fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Assemble the renderer-facing document from the post-processed
/// paragraphs. Empty paragraphs are dropped.
#[must_use = "returns the assembled document"]
pub fn assemble_document(paragraphs: Vec<Paragraph>) -> StructuredDocument {
    let mut records = Vec::with_capacity(paragraphs.len());

    for paragraph in paragraphs {
        let Some(first) = paragraph.lines.first() else {
            continue;
        };
        let flags = first.flags;

        if flags.toc {
            // TOC entries render line by line, never indented
            for line in &paragraph.lines {
                records.push(ParagraphRecord {
                    lines: vec![LineRecord {
                        text: line.text.clone(),
                        font_size: line.font_size,
                        style: line.style,
                        is_heading: line.flags.heading,
                        is_toc: true,
                        indent: false,
                        page: line.page,
                    }],
                });
            }
            continue;
        }

        let text = normalize_whitespace(
            &paragraph
                .lines
                .iter()
                .map(|l| l.text.as_str())
                .collect::<Vec<_>>()
                .join(" "),
        );
        let indent = !flags.heading && !flags.split_paragraph;
        records.push(ParagraphRecord {
            lines: vec![LineRecord {
                text,
                font_size: first.font_size,
                style: first.style,
                is_heading: flags.heading,
                is_toc: false,
                indent,
                page: first.page,
            }],
        });
    }

    StructuredDocument {
        paragraphs: records,
    }
}
