//! PDF renderer – takes a [`LayoutConfig`] and produces PDF bytes using
//! `printpdf` (v0.8 ops-based API).
//!
//! Text is set in the standard Times / Helvetica builtin fonts, so nothing is
//! embedded and output size stays small.

use printpdf::*;

use crate::error::ExportError;
use crate::fonts::Typeface;
use crate::layout_config::{Color as Rgba, DrawOp, FilledRect, LayoutConfig, RuleLine, TextRun};

const PT_TO_MM: f32 = 0.352778;

/// Render a LayoutConfig into PDF bytes.
///
/// Content draws are painted before the watermark overlay on each page.
/// Non-finite coordinates are rejected rather than written into the stream.
pub fn render_pdf(config: &LayoutConfig) -> Result<Vec<u8>, ExportError> {
    let page_w = Mm(config.page_width_pt * PT_TO_MM);
    let page_h = Mm(config.page_height_pt * PT_TO_MM);

    let mut doc = PdfDocument::new(&config.title);
    let mut pages = Vec::with_capacity(config.pages.len().max(1));

    for page_layout in &config.pages {
        let mut ops = Vec::new();
        for draw in page_layout.draws.iter().chain(&page_layout.watermark) {
            render_draw(&mut ops, draw, config.page_height_pt).map_err(|e| {
                ExportError::Pdf(format!("page {}: {e}", page_layout.page_index + 1))
            })?;
        }
        pages.push(PdfPage::new(page_w, page_h, ops));
    }

    // Ensure at least one page.
    if pages.is_empty() {
        pages.push(PdfPage::new(page_w, page_h, Vec::new()));
    }

    let page_count = pages.len();
    doc.with_pages(pages);
    let bytes = doc.save(&PdfSaveOptions::default(), &mut Vec::new());
    log::info!("rendered PDF: {page_count} page(s), {} bytes", bytes.len());
    Ok(bytes)
}

fn render_draw(ops: &mut Vec<Op>, draw: &DrawOp, page_height: f32) -> Result<(), String> {
    match draw {
        DrawOp::Text(run) => render_text(ops, run, page_height),
        DrawOp::Rect(rect) => render_rect(ops, rect, page_height),
        DrawOp::Rule(rule) => render_rule(ops, rule, page_height),
    }
}

fn ensure_finite(values: &[f32]) -> Result<(), String> {
    if values.iter().all(|v| v.is_finite()) {
        Ok(())
    } else {
        Err(format!("non-finite coordinate in {values:?}"))
    }
}

/// Pre-multiply opacity against a white page. Builtin-font text has no
/// per-run alpha in the ops API, and every page background here is white.
fn pdf_color(c: Rgba) -> Color {
    let a = c[3].clamp(0.0, 1.0);
    let blend = |v: f32| 1.0 - a * (1.0 - v.clamp(0.0, 1.0));
    Color::Rgb(Rgb {
        r: blend(c[0]),
        g: blend(c[1]),
        b: blend(c[2]),
        icc_profile: None,
    })
}

fn builtin_font(typeface: Typeface, bold: bool, italic: bool) -> BuiltinFont {
    match (typeface, bold, italic) {
        (Typeface::Serif, true, true) => BuiltinFont::TimesBoldItalic,
        (Typeface::Serif, true, false) => BuiltinFont::TimesBold,
        (Typeface::Serif, false, true) => BuiltinFont::TimesItalic,
        (Typeface::Serif, false, false) => BuiltinFont::TimesRoman,
        (Typeface::SansSerif, true, true) => BuiltinFont::HelveticaBoldOblique,
        (Typeface::SansSerif, true, false) => BuiltinFont::HelveticaBold,
        (Typeface::SansSerif, false, true) => BuiltinFont::HelveticaOblique,
        (Typeface::SansSerif, false, false) => BuiltinFont::Helvetica,
    }
}

fn point(x: f32, y: f32) -> LinePoint {
    LinePoint {
        p: Point { x: Pt(x), y: Pt(y) },
        bezier: false,
    }
}

fn render_text(ops: &mut Vec<Op>, run: &TextRun, page_height: f32) -> Result<(), String> {
    ensure_finite(&[run.x, run.y, run.size, run.rotation_deg])?;
    if run.text.is_empty() {
        return Ok(());
    }
    let font = builtin_font(run.typeface, run.bold, run.italic);
    // PDF coordinate system: origin at bottom-left.
    let pdf_y = page_height - run.y;

    ops.push(Op::StartTextSection);
    if run.rotation_deg == 0.0 {
        ops.push(Op::SetTextCursor {
            pos: Point {
                x: Pt(run.x),
                y: Pt(pdf_y),
            },
        });
    } else {
        let (sin, cos) = run.rotation_deg.to_radians().sin_cos();
        ops.push(Op::SetTextMatrix {
            matrix: TextMatrix::Raw([cos, sin, -sin, cos, run.x, pdf_y]),
        });
    }
    ops.push(Op::SetFontSizeBuiltinFont {
        size: Pt(run.size),
        font,
    });
    ops.push(Op::SetFillColor {
        col: pdf_color(run.color),
    });
    ops.push(Op::WriteTextBuiltinFont {
        items: vec![TextItem::Text(to_winlatin(&run.text))],
        font,
    });
    ops.push(Op::EndTextSection);
    Ok(())
}

fn render_rect(ops: &mut Vec<Op>, rect: &FilledRect, page_height: f32) -> Result<(), String> {
    ensure_finite(&[rect.x, rect.y, rect.width, rect.height])?;
    let x1 = rect.x;
    let x2 = rect.x + rect.width;
    let y_top = page_height - rect.y;
    let y_bottom = y_top - rect.height;

    ops.push(Op::SetFillColor {
        col: pdf_color(rect.color),
    });
    ops.push(Op::DrawPolygon {
        polygon: Polygon {
            rings: vec![PolygonRing {
                points: vec![
                    point(x1, y_bottom),
                    point(x2, y_bottom),
                    point(x2, y_top),
                    point(x1, y_top),
                ],
            }],
            mode: PaintMode::Fill,
            winding_order: WindingOrder::NonZero,
        },
    });
    Ok(())
}

fn render_rule(ops: &mut Vec<Op>, rule: &RuleLine, page_height: f32) -> Result<(), String> {
    ensure_finite(&[rule.x1, rule.y1, rule.x2, rule.y2, rule.thickness])?;
    ops.push(Op::SetOutlineColor {
        col: pdf_color(rule.color),
    });
    ops.push(Op::SetOutlineThickness {
        pt: Pt(rule.thickness),
    });
    ops.push(Op::DrawLine {
        line: Line {
            points: vec![
                point(rule.x1, page_height - rule.y1),
                point(rule.x2, page_height - rule.y2),
            ],
            is_closed: false,
        },
    });
    Ok(())
}

/// Convert a UTF-8 string to raw Windows-1252 bytes then wrap in a String so
/// printpdf writes the bytes unchanged into the PDF stream (builtin fonts use
/// WinAnsiEncoding, so each glyph is one byte 0x00–0xFF).
fn to_winlatin(s: &str) -> String {
    let bytes: Vec<u8> = s
        .chars()
        .map(|c| match c {
            '\u{20AC}' => 0x80, // euro
            '\u{2026}' => 0x85, // ellipsis
            '\u{2018}' => 0x91,
            '\u{2019}' => 0x92,
            '\u{201C}' => 0x93,
            '\u{201D}' => 0x94,
            '\u{2022}' => 0x95, // bullet
            '\u{2013}' => 0x96, // en-dash (date ranges)
            '\u{2014}' => 0x97,
            '\u{00A0}' => 0x20,
            c if (c as u32) < 256 => c as u8,
            _ => b'?',
        })
        .collect();
    // SAFETY: intentionally non-UTF-8 for 0x80-0x9F range; printpdf passes
    // these bytes straight to the PDF stream, decoded by WinAnsiEncoding.
    #[allow(unsafe_code)]
    unsafe {
        String::from_utf8_unchecked(bytes)
    }
}
