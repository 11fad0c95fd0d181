//!
//! Per-document parsing context. Built once per lint run, it exposes the
//! image references discovered by pulldown-cmark in document order plus
//! byte-offset to line/column mapping for reporting.

use pulldown_cmark::{Event, LinkType, Options, Parser, Tag, TagEnd};

/// Parsed image information
#[derive(Debug, Clone)]
pub struct ParsedImage {
    /// Line number (1-indexed)
    pub line: usize,
    /// Start column (0-indexed, in characters) in the line
    pub start_col: usize,
    /// End column (0-indexed, in characters) in the line
    pub end_col: usize,
    /// Byte offset in document
    pub byte_offset: usize,
    /// End byte offset in document
    pub byte_end: usize,
    /// Alt text
    pub alt_text: String,
    /// Image URL, resolved through the reference definition if needed
    pub url: String,
    /// Whether this is a reference image `![alt][ref]` vs inline `![alt](url)`
    pub is_reference: bool,
    /// Reference ID for reference images
    pub reference_id: Option<String>,
}

pub struct LintContext<'a> {
    pub content: &'a str,
    /// Byte offset of the start of each line
    pub line_offsets: Vec<usize>,
    /// Images in document order. Images inside code blocks or code spans
    /// never appear here; the event stream does not surface them.
    pub images: Vec<ParsedImage>,
}

impl<'a> LintContext<'a> {
    pub fn new(content: &'a str) -> Self {
        let mut line_offsets = vec![0];
        for (i, c) in content.char_indices() {
            if c == '\n' {
                line_offsets.push(i + 1);
            }
        }
        let images = parse_images(content, &line_offsets);
        Self {
            content,
            line_offsets,
            images,
        }
    }

    /// Map a byte offset to 1-indexed (line, column)
    pub fn offset_to_line_col(&self, offset: usize) -> (usize, usize) {
        let (line_idx, col) = line_col_at(self.content, &self.line_offsets, offset);
        (line_idx + 1, col + 1)
    }
}

/// 0-indexed (line, character column) of a byte offset.
/// Columns count characters, not bytes, so reports line up for non-ASCII text.
fn line_col_at(content: &str, line_offsets: &[usize], offset: usize) -> (usize, usize) {
    let line_idx = line_offsets
        .partition_point(|&start| start <= offset)
        .saturating_sub(1);
    let line_start = line_offsets[line_idx];
    let line_end = line_offsets
        .get(line_idx + 1)
        .copied()
        .unwrap_or(content.len());
    let byte_col = offset.saturating_sub(line_start).min(line_end - line_start);
    let col = content[line_start..line_start + byte_col].chars().count();
    (line_idx, col)
}

fn parse_images(content: &str, line_offsets: &[usize]) -> Vec<ParsedImage> {
    // Quick check before running the parser at all
    if !content.contains("![") {
        return Vec::new();
    }

    struct Pending {
        range: std::ops::Range<usize>,
        url: String,
        is_reference: bool,
        reference_id: Option<String>,
        alt_text: String,
    }

    let mut images = Vec::new();
    // Stack because CommonMark allows an image inside another image's alt text
    let mut pending: Vec<Pending> = Vec::new();

    let parser = Parser::new_ext(content, Options::empty()).into_offset_iter();
    for (event, range) in parser {
        match event {
            Event::Start(Tag::Image {
                link_type,
                dest_url,
                id,
                ..
            }) => {
                let is_reference = matches!(
                    link_type,
                    LinkType::Reference
                        | LinkType::ReferenceUnknown
                        | LinkType::Collapsed
                        | LinkType::CollapsedUnknown
                        | LinkType::Shortcut
                        | LinkType::ShortcutUnknown
                );
                pending.push(Pending {
                    range,
                    url: dest_url.to_string(),
                    is_reference,
                    reference_id: (!id.is_empty()).then(|| id.to_string()),
                    alt_text: String::new(),
                });
            }
            Event::Text(text) | Event::Code(text) => {
                if let Some(p) = pending.last_mut() {
                    p.alt_text.push_str(&text);
                }
            }
            Event::SoftBreak | Event::HardBreak => {
                if let Some(p) = pending.last_mut() {
                    p.alt_text.push(' ');
                }
            }
            Event::End(TagEnd::Image) => {
                if let Some(p) = pending.pop() {
                    let (line_idx, start_col) = line_col_at(content, line_offsets, p.range.start);
                    let (_, end_col) = line_col_at(content, line_offsets, p.range.end);
                    images.push(ParsedImage {
                        line: line_idx + 1,
                        start_col,
                        end_col,
                        byte_offset: p.range.start,
                        byte_end: p.range.end,
                        alt_text: p.alt_text,
                        url: p.url,
                        is_reference: p.is_reference,
                        reference_id: p.reference_id,
                    });
                }
            }
            _ => {}
        }
    }

    // Keep document order even when images nest
    images.sort_by_key(|img| img.byte_offset);

    images
}
