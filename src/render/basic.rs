use anyhow::Result;
use printpdf::{Line, Mm, PdfDocument, Point};
use pulldown_cmark::{Event, Parser, Tag};

use super::{
    draw_line, load_fonts, max_chars_for, wrap_runs, Block, FontOptions, FontSet, PageCursor,
    Section, TextRun, MM_PER_PT, PAGE_HEIGHT, PAGE_WIDTH,
};
use crate::text::markup::HEADER_ARTIFACT;
use crate::PressError;

const MARGIN_LEFT: f64 = 15.0;
const MARGIN_RIGHT: f64 = 15.0;
const MARGIN_TOP: f64 = 30.0;
const MARGIN_BOTTOM: f64 = 18.0;

const HEADER_SIZE: f64 = 12.0;
const TITLE_SIZE: f64 = 14.0;
const BODY_SIZE: f64 = 12.0;
const LIST_INDENT: f64 = 6.0;
const PARAGRAPH_GAP: f64 = 3.0;

/// Render sections as a plain paginated document.
///
/// Each section starts on a fresh page with the page-header line and its
/// title. Content goes through a strict minimal markup conversion; if the
/// conversion rejects the content, the section falls back to plain wrapped
/// text on the same page. The fallback itself cannot fail — the only fatal
/// error left is a font asset that cannot be loaded.
pub fn render_basic(sections: &[Section], fonts_cfg: &FontOptions) -> Result<Vec<u8>> {
    let (doc, first_page, first_layer) = PdfDocument::new(
        HEADER_ARTIFACT,
        Mm(PAGE_WIDTH as f32),
        Mm(PAGE_HEIGHT as f32),
        "content",
    );

    let fonts = load_fonts(&doc, fonts_cfg)?;

    let mut cursor = PageCursor::new(
        &doc,
        doc.get_page(first_page).get_layer(first_layer),
        MARGIN_TOP,
        MARGIN_BOTTOM,
    );

    for (index, section) in sections.iter().enumerate() {
        if index > 0 {
            cursor.new_page();
        }
        draw_page_header(&cursor, &fonts);

        let title = vec![TextRun {
            text: section.title.clone(),
            bold: true,
        }];
        draw_flow(&mut cursor, &fonts, &title, TITLE_SIZE, MARGIN_LEFT, 5.0);

        match convert_markup(&section.content) {
            Ok(blocks) => draw_blocks(&mut cursor, &fonts, &blocks),
            Err(e) => {
                tracing::warn!(
                    "Structured rendering failed for '{}', falling back to plain text: {}",
                    section.title,
                    e
                );
                draw_plain_text(&mut cursor, &fonts, &section.content);
            }
        }
    }

    doc.save_to_bytes()
        .map_err(|e| PressError::RenderFailed(e.to_string()).into())
}

/// The page-header line stamped at the top of every page.
fn draw_page_header(cursor: &PageCursor, fonts: &FontSet) {
    let width = HEADER_ARTIFACT.chars().count() as f64 * super::glyph_advance(HEADER_SIZE);
    let x = (PAGE_WIDTH - width) / 2.0;
    cursor
        .layer
        .use_text(HEADER_ARTIFACT, HEADER_SIZE as f32, Mm(x as f32), Mm((PAGE_HEIGHT - 15.0) as f32), &fonts.bold);
}

fn reserve(cursor: &mut PageCursor, fonts: &FontSet, needed: f64) {
    if cursor.ensure_room(needed) {
        draw_page_header(cursor, fonts);
    }
}

/// Wrap and draw one run sequence, breaking pages as needed.
fn draw_flow(
    cursor: &mut PageCursor,
    fonts: &FontSet,
    runs: &[TextRun],
    size: f64,
    x: f64,
    gap_after: f64,
) {
    let width = PAGE_WIDTH - x - MARGIN_RIGHT;
    let line_height = size * MM_PER_PT * 1.45;

    for line in wrap_runs(runs, max_chars_for(width, size)) {
        reserve(cursor, fonts, line_height);
        cursor.advance(line_height);
        draw_line(&cursor.layer, &line, x, cursor.y, size, fonts);
    }

    cursor.advance(gap_after);
}

fn draw_blocks(cursor: &mut PageCursor, fonts: &FontSet, blocks: &[Block]) {
    for block in blocks {
        match block {
            Block::Heading { level, runs } => {
                let size = match level {
                    1 => 16.0,
                    2 => 14.0,
                    _ => 13.0,
                };
                let emphasized: Vec<TextRun> = runs
                    .iter()
                    .map(|run| TextRun {
                        text: run.text.clone(),
                        bold: true,
                    })
                    .collect();
                draw_flow(cursor, fonts, &emphasized, size, MARGIN_LEFT, 4.0);
            }
            Block::Paragraph(runs) => {
                draw_flow(cursor, fonts, runs, BODY_SIZE, MARGIN_LEFT, PARAGRAPH_GAP);
            }
            Block::Bullet(runs) => {
                let item = prefixed("- ", runs);
                draw_flow(
                    cursor,
                    fonts,
                    &item,
                    BODY_SIZE,
                    MARGIN_LEFT + LIST_INDENT,
                    1.5,
                );
            }
            Block::Numbered(number, runs) => {
                let item = prefixed(&format!("{number}. "), runs);
                draw_flow(
                    cursor,
                    fonts,
                    &item,
                    BODY_SIZE,
                    MARGIN_LEFT + LIST_INDENT,
                    1.5,
                );
            }
            Block::Rule => {
                reserve(cursor, fonts, 8.0);
                cursor.advance(5.0);
                let separator = Line {
                    points: vec![
                        (Point::new(Mm(MARGIN_LEFT as f32), Mm(cursor.y as f32)), false),
                        (Point::new(Mm((PAGE_WIDTH - MARGIN_RIGHT) as f32), Mm(cursor.y as f32)), false),
                    ],
                    is_closed: false,
                };
                cursor.layer.set_outline_thickness(0.5);
                cursor.layer.add_line(separator);
                cursor.advance(3.0);
            }
        }
    }
}

fn prefixed(marker: &str, runs: &[TextRun]) -> Vec<TextRun> {
    let mut item = Vec::with_capacity(runs.len() + 1);
    item.push(TextRun::plain(marker.trim_end()));
    item.extend(runs.iter().cloned());
    item
}

/// Last-resort layout: the raw content as wrapped plain text. No markup
/// interpretation, no failure path.
fn draw_plain_text(cursor: &mut PageCursor, fonts: &FontSet, content: &str) {
    for line in content.lines() {
        if line.trim().is_empty() {
            cursor.advance(4.0);
            continue;
        }
        draw_flow(
            cursor,
            fonts,
            &[TextRun::plain(line)],
            BODY_SIZE,
            MARGIN_LEFT,
            0.0,
        );
    }
}

/// Strict minimal markup conversion: headers, paragraphs, bold, flat lists.
/// Anything outside that set is rejected so the caller can fall back.
fn convert_markup(markup: &str) -> Result<Vec<Block>> {
    let mut blocks: Vec<Block> = Vec::new();
    let mut runs: Vec<TextRun> = Vec::new();
    let mut bold_depth = 0usize;
    let mut heading_level: Option<u8> = None;
    let mut in_item = false;
    let mut list_stack: Vec<Option<u64>> = Vec::new();

    for event in Parser::new(markup) {
        match event {
            Event::Start(Tag::Heading(level, ..)) => {
                runs.clear();
                heading_level = Some(level as u8);
            }
            Event::End(Tag::Heading(..)) => {
                if let Some(level) = heading_level.take() {
                    if !runs.is_empty() {
                        blocks.push(Block::Heading {
                            level,
                            runs: std::mem::take(&mut runs),
                        });
                    }
                }
                runs.clear();
            }
            Event::Start(Tag::Paragraph) => {
                if in_item {
                    if !runs.is_empty() {
                        runs.push(TextRun::plain(" "));
                    }
                } else {
                    runs.clear();
                }
            }
            Event::End(Tag::Paragraph) => {
                if !in_item && !runs.is_empty() {
                    blocks.push(Block::Paragraph(std::mem::take(&mut runs)));
                }
            }
            Event::Start(Tag::List(start)) => {
                if in_item || !list_stack.is_empty() {
                    anyhow::bail!("nested lists are not supported");
                }
                list_stack.push(start);
            }
            Event::End(Tag::List(_)) => {
                list_stack.pop();
            }
            Event::Start(Tag::Item) => {
                in_item = true;
                runs.clear();
            }
            Event::End(Tag::Item) => {
                let item_runs = std::mem::take(&mut runs);
                in_item = false;
                if item_runs.is_empty() {
                    continue;
                }
                match list_stack.last_mut() {
                    Some(Some(number)) => {
                        blocks.push(Block::Numbered(*number, item_runs));
                        *number += 1;
                    }
                    _ => blocks.push(Block::Bullet(item_runs)),
                }
            }
            Event::Start(Tag::Strong) => bold_depth += 1,
            Event::End(Tag::Strong) => bold_depth = bold_depth.saturating_sub(1),
            Event::Start(Tag::Emphasis) | Event::End(Tag::Emphasis) => {}
            Event::Text(text) => runs.push(TextRun {
                text: text.into_string(),
                bold: bold_depth > 0,
            }),
            Event::Code(text) => runs.push(TextRun {
                text: text.into_string(),
                bold: bold_depth > 0,
            }),
            Event::SoftBreak | Event::HardBreak => runs.push(TextRun::plain(" ")),
            Event::Rule => blocks.push(Block::Rule),
            other => anyhow::bail!("unsupported markup construct: {other:?}"),
        }
    }

    Ok(blocks)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn section(content: &str) -> Vec<Section> {
        vec![Section {
            title: "Video: Test".to_string(),
            content: content.to_string(),
        }]
    }

    #[test]
    fn test_convert_supports_minimal_set() {
        let markup = "### Part 1: Intro\n\nSome **bold** prose.\n\n- first\n- second\n\n1. one\n2. two";
        let blocks = convert_markup(markup).unwrap();

        assert!(matches!(blocks[0], Block::Heading { level: 3, .. }));
        assert!(matches!(blocks[1], Block::Paragraph(_)));
        assert!(matches!(blocks[2], Block::Bullet(_)));
        assert!(matches!(blocks[3], Block::Bullet(_)));
        assert!(matches!(blocks[4], Block::Numbered(1, _)));
        assert!(matches!(blocks[5], Block::Numbered(2, _)));
    }

    #[test]
    fn test_convert_marks_bold_runs() {
        let blocks = convert_markup("plain **bold** tail").unwrap();
        let Block::Paragraph(runs) = &blocks[0] else {
            panic!("expected paragraph");
        };
        assert!(runs.iter().any(|run| run.bold && run.text.contains("bold")));
        assert!(runs.iter().any(|run| !run.bold));
    }

    #[test]
    fn test_convert_rejects_html() {
        assert!(convert_markup("before\n\n<div>html island</div>\n\nafter").is_err());
    }

    #[test]
    fn test_convert_rejects_nested_lists() {
        assert!(convert_markup("- outer\n  - inner").is_err());
    }

    #[test]
    fn test_render_valid_markup() {
        let bytes = render_basic(
            &section("### Heading\n\nA paragraph with **bold** text.\n\n- a list item"),
            &FontOptions::default(),
        )
        .unwrap();
        assert!(!bytes.is_empty());
    }

    #[test]
    fn test_render_malformed_markup_falls_back() {
        let malformed = "<div>not closed\n\n- item\n  - nested [link](http://x\n**unclosed";
        let bytes = render_basic(&section(malformed), &FontOptions::default()).unwrap();
        assert!(!bytes.is_empty());
    }

    #[test]
    fn test_render_many_sections_and_pages() {
        let long_paragraph = "word ".repeat(2000);
        let sections: Vec<Section> = (0..3)
            .map(|i| Section {
                title: format!("Video: Part {i}"),
                content: long_paragraph.clone(),
            })
            .collect();

        let bytes = render_basic(&sections, &FontOptions::default()).unwrap();
        assert!(!bytes.is_empty());
    }

    #[test]
    fn test_missing_external_font_is_fatal() {
        let fonts = FontOptions {
            regular: Some(std::path::PathBuf::from("/nonexistent/font.ttf")),
            bold: None,
        };
        assert!(render_basic(&section("text"), &fonts).is_err());
    }
}
