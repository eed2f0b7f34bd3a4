use anyhow::{Context, Result};
use printpdf::{BuiltinFont, IndirectFontRef, Mm, PdfDocumentReference, PdfLayerReference};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub mod basic;
pub mod styled;

use crate::PressError;

/// One document section: a display title plus its (possibly markup) content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub title: String,
    pub content: String,
}

/// The two renderer variants. Selected by configuration, never by type
/// dispatch; each is a standalone `sections -> bytes` function with its own
/// failure policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RendererKind {
    /// Plain layout with a per-section plain-text fallback
    Basic,

    /// Fixed theme, page break per section, no per-section fallback
    Styled,
}

/// Optional external font assets. When unset, the built-in Helvetica
/// metrics family is used and rendering needs no files on disk.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FontOptions {
    /// Path to a regular-weight TTF
    pub regular: Option<PathBuf>,

    /// Path to a bold-weight TTF
    pub bold: Option<PathBuf>,
}

/// Render sections with the selected variant.
pub fn render(kind: RendererKind, sections: &[Section], fonts: &FontOptions) -> Result<Vec<u8>> {
    match kind {
        RendererKind::Basic => basic::render_basic(sections, fonts),
        RendererKind::Styled => styled::render_styled(sections, fonts),
    }
}

/// A4 page geometry, in millimeters.
pub(crate) const PAGE_WIDTH: f64 = 210.0;
pub(crate) const PAGE_HEIGHT: f64 = 297.0;

/// Point-to-millimeter conversion for layout arithmetic.
pub(crate) const MM_PER_PT: f64 = 0.3528;

/// Registered font pair for one document.
pub(crate) struct FontSet {
    pub regular: IndirectFontRef,
    pub bold: IndirectFontRef,
}

/// Register the document's fonts. A configured-but-unreadable font file is
/// the renderer's one fatal error class and aborts the whole operation.
pub(crate) fn load_fonts(doc: &PdfDocumentReference, options: &FontOptions) -> Result<FontSet> {
    let regular = register_font(doc, options.regular.as_deref(), BuiltinFont::Helvetica)?;
    let bold = register_font(doc, options.bold.as_deref(), BuiltinFont::HelveticaBold)?;

    Ok(FontSet { regular, bold })
}

fn register_font(
    doc: &PdfDocumentReference,
    path: Option<&std::path::Path>,
    fallback: BuiltinFont,
) -> Result<IndirectFontRef> {
    match path {
        Some(path) => {
            let file = fs_err::File::open(path)
                .map_err(|e| PressError::FontAssets(format!("{}: {e}", path.display())))?;

            doc.add_external_font(file)
                .map_err(|e| PressError::FontAssets(format!("{}: {e}", path.display())).into())
        }
        None => doc
            .add_builtin_font(fallback)
            .context("failed to register builtin font"),
    }
}

/// A run of words sharing one weight.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct TextRun {
    pub text: String,
    pub bold: bool,
}

impl TextRun {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            bold: false,
        }
    }
}

/// Structural blocks shared by both markup converters.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Block {
    Heading { level: u8, runs: Vec<TextRun> },
    Paragraph(Vec<TextRun>),
    Bullet(Vec<TextRun>),
    Numbered(u64, Vec<TextRun>),
    Rule,
}

/// Greedy word wrap over styled runs. Width is measured in characters; the
/// built-in metrics families have no exposed glyph tables, so layout works
/// from an average advance per glyph.
pub(crate) fn wrap_runs(runs: &[TextRun], max_chars: usize) -> Vec<Vec<TextRun>> {
    let mut lines: Vec<Vec<TextRun>> = Vec::new();
    let mut line: Vec<TextRun> = Vec::new();
    let mut line_len = 0usize;

    for run in runs {
        for word in run.text.split_whitespace() {
            let word_len = word.chars().count();
            let needed = if line_len == 0 { word_len } else { word_len + 1 };

            if line_len > 0 && line_len + needed > max_chars {
                lines.push(std::mem::take(&mut line));
                line_len = 0;
            }

            let chunk = if line_len == 0 {
                word.to_string()
            } else {
                format!(" {word}")
            };

            match line.last_mut() {
                Some(last) if last.bold == run.bold => last.text.push_str(&chunk),
                _ => line.push(TextRun {
                    text: chunk,
                    bold: run.bold,
                }),
            }

            line_len += if line_len == 0 { word_len } else { word_len + 1 };
        }
    }

    if !line.is_empty() {
        lines.push(line);
    }

    lines
}

/// Estimated characters that fit in `width_mm` at `font_size` points.
pub(crate) fn max_chars_for(width_mm: f64, font_size: f64) -> usize {
    let glyph_mm = font_size * 0.5 * MM_PER_PT;
    ((width_mm / glyph_mm) as usize).max(8)
}

/// Estimated advance of one glyph at `font_size` points, in millimeters.
pub(crate) fn glyph_advance(font_size: f64) -> f64 {
    font_size * 0.5 * MM_PER_PT
}

/// Cursor over a growing document: tracks the active layer and baseline,
/// starting fresh pages as content runs out of room.
pub(crate) struct PageCursor<'a> {
    doc: &'a PdfDocumentReference,
    pub layer: PdfLayerReference,
    pub y: f64,
    margin_top: f64,
    margin_bottom: f64,
}

impl<'a> PageCursor<'a> {
    pub fn new(
        doc: &'a PdfDocumentReference,
        layer: PdfLayerReference,
        margin_top: f64,
        margin_bottom: f64,
    ) -> Self {
        Self {
            doc,
            layer,
            y: PAGE_HEIGHT - margin_top,
            margin_top,
            margin_bottom,
        }
    }

    /// Start a fresh page and reset the baseline below the top margin.
    pub fn new_page(&mut self) {
        let (page, layer) = self
            .doc
            .add_page(Mm(PAGE_WIDTH as f32), Mm(PAGE_HEIGHT as f32), "content");
        self.layer = self.doc.get_page(page).get_layer(layer);
        self.y = PAGE_HEIGHT - self.margin_top;
    }

    /// Break the page if fewer than `needed` millimeters remain. Returns
    /// true when a new page was started so callers can redraw page chrome.
    pub fn ensure_room(&mut self, needed: f64) -> bool {
        if self.y - needed < self.margin_bottom {
            self.new_page();
            true
        } else {
            false
        }
    }

    pub fn advance(&mut self, dy: f64) {
        self.y -= dy;
    }
}

/// Draw one wrapped line of runs at the cursor baseline, switching fonts at
/// run boundaries.
pub(crate) fn draw_line(
    layer: &PdfLayerReference,
    runs: &[TextRun],
    x: f64,
    y: f64,
    font_size: f64,
    fonts: &FontSet,
) {
    let mut x = x;
    for run in runs {
        let font = if run.bold { &fonts.bold } else { &fonts.regular };
        layer.use_text(run.text.clone(), font_size as f32, Mm(x as f32), Mm(y as f32), font);
        x += run.text.chars().count() as f64 * glyph_advance(font_size);
    }
}
