use anyhow::Result;
use printpdf::{Color, Line, Mm, PdfDocument, PdfLayerReference, Point, Rgb};
use pulldown_cmark::{Event, Parser, Tag};

use super::{
    glyph_advance, load_fonts, max_chars_for, wrap_runs, Block, FontOptions, FontSet, PageCursor,
    Section, TextRun, MM_PER_PT, PAGE_HEIGHT, PAGE_WIDTH,
};
use crate::text::markup;
use crate::PressError;

const MARGIN_LEFT: f64 = 20.0;
const MARGIN_RIGHT: f64 = 20.0;
const MARGIN_TOP: f64 = 25.0;
const MARGIN_BOTTOM: f64 = 20.0;

const TITLE_SIZE: f64 = 26.0;
const H2_SIZE: f64 = 20.0;
const H3_SIZE: f64 = 15.0;
const BODY_SIZE: f64 = 11.0;
const LIST_INDENT: f64 = 8.0;

const BODY_LEADING: f64 = 1.7;
const HEADING_LEADING: f64 = 1.3;

/// Theme palette: deep blue for major headings, bright blue accents, dark
/// gray body text, light gray separators.
const DEEP_BLUE: (f64, f64, f64) = (0.0, 0.337, 0.702);
const BRIGHT_BLUE: (f64, f64, f64) = (0.0, 0.494, 1.0);
const BODY_GRAY: (f64, f64, f64) = (0.204, 0.227, 0.251);
const SEPARATOR_GRAY: (f64, f64, f64) = (0.914, 0.925, 0.937);
const BORDER_GRAY: (f64, f64, f64) = (0.871, 0.886, 0.898);
const INK_BLACK: (f64, f64, f64) = (0.0, 0.0, 0.0);

/// Render sections as a styled, themed document.
///
/// Each section's title and content are first repaired by the markup
/// reconstruction rules; the resulting first line becomes the displayed
/// title. Every section after the first starts on a new page. There is no
/// per-section fallback here: any failure aborts the whole render with its
/// cause.
pub fn render_styled(sections: &[Section], fonts_cfg: &FontOptions) -> Result<Vec<u8>> {
    let (doc, first_page, first_layer) = PdfDocument::new(
        "Transcript Press Summary",
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
        let rebuilt = markup::reconstruct(&section.title, &section.content);

        if index > 0 {
            cursor.new_page();
        }

        draw_section_title(&mut cursor, &fonts, &rebuilt.heading);

        let blocks = convert_markup(&rebuilt.markup_body);
        draw_blocks(&mut cursor, &fonts, &blocks);
    }

    doc.save_to_bytes()
        .map_err(|e| PressError::RenderFailed(e.to_string()).into())
}

fn color(rgb: (f64, f64, f64)) -> Color {
    Color::Rgb(Rgb::new(rgb.0 as f32, rgb.1 as f32, rgb.2 as f32, None))
}

fn draw_rule_line(layer: &PdfLayerReference, y: f64, thickness: f64, rgb: (f64, f64, f64)) {
    let line = Line {
        points: vec![
            (Point::new(Mm(MARGIN_LEFT as f32), Mm(y as f32)), false),
            (Point::new(Mm((PAGE_WIDTH - MARGIN_RIGHT) as f32), Mm(y as f32)), false),
        ],
        is_closed: false,
    };
    layer.set_outline_color(color(rgb));
    layer.set_outline_thickness(thickness as f32);
    layer.add_line(line);
}

/// Centered section title with the accent underline the theme calls for.
fn draw_section_title(cursor: &mut PageCursor, fonts: &FontSet, heading: &str) {
    let line_height = TITLE_SIZE * MM_PER_PT * HEADING_LEADING;
    let width = PAGE_WIDTH - MARGIN_LEFT - MARGIN_RIGHT;
    let runs = [TextRun {
        text: heading.to_string(),
        bold: true,
    }];

    for line in wrap_runs(&runs, max_chars_for(width, TITLE_SIZE)) {
        cursor.ensure_room(line_height);
        cursor.advance(line_height);
        cursor.layer.set_fill_color(color(DEEP_BLUE));

        let text: String = line.iter().map(|run| run.text.as_str()).collect();
        let text_width = text.chars().count() as f64 * glyph_advance(TITLE_SIZE);
        let x = ((PAGE_WIDTH - text_width) / 2.0).max(MARGIN_LEFT);
        cursor
            .layer
            .use_text(text, TITLE_SIZE as f32, Mm(x as f32), Mm(cursor.y as f32), &fonts.bold);
    }

    cursor.advance(4.0);
    draw_rule_line(&cursor.layer, cursor.y, 1.2, BRIGHT_BLUE);
    cursor.advance(8.0);
}

fn draw_blocks(cursor: &mut PageCursor, fonts: &FontSet, blocks: &[Block]) {
    for block in blocks {
        match block {
            Block::Heading { level, runs } => match level {
                1 | 2 => {
                    draw_heading(cursor, fonts, runs, H2_SIZE, DEEP_BLUE);
                    cursor.advance(2.0);
                    draw_rule_line(&cursor.layer, cursor.y, 0.4, BORDER_GRAY);
                    cursor.advance(5.0);
                }
                _ => {
                    draw_heading(cursor, fonts, runs, H3_SIZE, BRIGHT_BLUE);
                    cursor.advance(3.0);
                }
            },
            Block::Paragraph(runs) => {
                draw_body_flow(cursor, fonts, runs, MARGIN_LEFT);
                cursor.advance(4.0);
            }
            Block::Bullet(runs) => {
                let item = list_item("\u{2022} ", runs);
                draw_body_flow(cursor, fonts, &item, MARGIN_LEFT + LIST_INDENT);
                cursor.advance(2.5);
            }
            Block::Numbered(number, runs) => {
                let item = list_item(&format!("{number}. "), runs);
                draw_body_flow(cursor, fonts, &item, MARGIN_LEFT + LIST_INDENT);
                cursor.advance(2.5);
            }
            Block::Rule => {
                cursor.ensure_room(24.0);
                cursor.advance(12.0);
                draw_rule_line(&cursor.layer, cursor.y, 0.7, SEPARATOR_GRAY);
                cursor.advance(12.0);
            }
        }
    }
}

fn draw_heading(
    cursor: &mut PageCursor,
    fonts: &FontSet,
    runs: &[TextRun],
    size: f64,
    rgb: (f64, f64, f64),
) {
    let line_height = size * MM_PER_PT * HEADING_LEADING;
    let width = PAGE_WIDTH - MARGIN_LEFT - MARGIN_RIGHT;

    cursor.advance(3.0);
    for line in wrap_runs(runs, max_chars_for(width, size)) {
        cursor.ensure_room(line_height);
        cursor.advance(line_height);
        cursor.layer.set_fill_color(color(rgb));

        let text: String = line.iter().map(|run| run.text.as_str()).collect();
        cursor
            .layer
            .use_text(text, size as f32, Mm(MARGIN_LEFT as f32), Mm(cursor.y as f32), &fonts.bold);
    }
}

/// Body flow with inline weight switches: bold runs render black, the rest
/// in the body gray.
fn draw_body_flow(cursor: &mut PageCursor, fonts: &FontSet, runs: &[TextRun], x: f64) {
    let line_height = BODY_SIZE * MM_PER_PT * BODY_LEADING;
    let width = PAGE_WIDTH - x - MARGIN_RIGHT;

    for line in wrap_runs(runs, max_chars_for(width, BODY_SIZE)) {
        cursor.ensure_room(line_height);
        cursor.advance(line_height);

        let mut run_x = x;
        for run in &line {
            let (font, rgb) = if run.bold {
                (&fonts.bold, INK_BLACK)
            } else {
                (&fonts.regular, BODY_GRAY)
            };
            cursor.layer.set_fill_color(color(rgb));
            cursor
                .layer
                .use_text(run.text.clone(), BODY_SIZE as f32, Mm(run_x as f32), Mm(cursor.y as f32), font);
            run_x += run.text.chars().count() as f64 * glyph_advance(BODY_SIZE);
        }
    }
}

fn list_item(marker: &str, runs: &[TextRun]) -> Vec<TextRun> {
    let mut item = Vec::with_capacity(runs.len() + 1);
    item.push(TextRun::plain(marker.trim_end()));
    item.extend(runs.iter().cloned());
    item
}

/// Tolerant markup conversion. Unknown constructs never fail the render;
/// their text content flows into the surrounding block instead.
fn convert_markup(markup: &str) -> Vec<Block> {
    let mut blocks: Vec<Block> = Vec::new();
    let mut runs: Vec<TextRun> = Vec::new();
    let mut bold_depth = 0usize;
    let mut heading_level: Option<u8> = None;
    let mut item_depth = 0usize;
    let mut list_stack: Vec<Option<u64>> = Vec::new();

    let flush_paragraph = |runs: &mut Vec<TextRun>, blocks: &mut Vec<Block>| {
        if !runs.is_empty() {
            blocks.push(Block::Paragraph(std::mem::take(runs)));
        }
    };

    for event in Parser::new(markup) {
        match event {
            Event::Start(Tag::Heading(level, ..)) => {
                flush_paragraph(&mut runs, &mut blocks);
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
            }
            Event::Start(Tag::Paragraph) => {
                if item_depth > 0 {
                    if !runs.is_empty() {
                        runs.push(TextRun::plain(" "));
                    }
                } else {
                    flush_paragraph(&mut runs, &mut blocks);
                }
            }
            Event::End(Tag::Paragraph) => {
                if item_depth == 0 {
                    flush_paragraph(&mut runs, &mut blocks);
                }
            }
            Event::Start(Tag::List(start)) => {
                if item_depth == 0 {
                    flush_paragraph(&mut runs, &mut blocks);
                }
                list_stack.push(start);
            }
            Event::End(Tag::List(_)) => {
                list_stack.pop();
            }
            Event::Start(Tag::Item) => {
                if item_depth > 0 && !runs.is_empty() {
                    // A nested item begins while its parent is still open;
                    // emit the parent text gathered so far as its own entry.
                    emit_item(&mut blocks, &mut runs, &mut list_stack);
                }
                item_depth += 1;
            }
            Event::End(Tag::Item) => {
                item_depth = item_depth.saturating_sub(1);
                emit_item(&mut blocks, &mut runs, &mut list_stack);
            }
            Event::Start(Tag::Strong) => bold_depth += 1,
            Event::End(Tag::Strong) => bold_depth = bold_depth.saturating_sub(1),
            Event::Text(text) | Event::Code(text) => runs.push(TextRun {
                text: text.into_string(),
                bold: bold_depth > 0,
            }),
            Event::SoftBreak | Event::HardBreak => runs.push(TextRun::plain(" ")),
            Event::Rule => {
                flush_paragraph(&mut runs, &mut blocks);
                blocks.push(Block::Rule);
            }
            // Everything else (emphasis, quotes, links, code fences, raw
            // HTML) degrades to its text content, which arrives as separate
            // Text events.
            _ => {}
        }
    }

    flush_paragraph(&mut runs, &mut blocks);
    blocks
}

fn emit_item(blocks: &mut Vec<Block>, runs: &mut Vec<TextRun>, list_stack: &mut [Option<u64>]) {
    if runs.is_empty() {
        return;
    }
    let item_runs = std::mem::take(runs);
    match list_stack.last_mut() {
        Some(Some(number)) => {
            blocks.push(Block::Numbered(*number, item_runs));
            *number += 1;
        }
        _ => blocks.push(Block::Bullet(item_runs)),
    }
}
