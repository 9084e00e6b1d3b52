//! Watermark pass – stamps the "preview" overlay on every page of an unpaid
//! export. Runs after pagination, so it sees the final page count.

use crate::fonts::{FontManager, Typeface};
use crate::layout_config::{DrawOp, DrawRole, LayoutConfig, TextRun};

pub const WATERMARK_LABEL: &str = "PREVIEW ONLY";
pub const WATERMARK_OPACITY: f32 = 0.07;
/// Counter-clockwise.
pub const WATERMARK_ANGLE_DEG: f32 = 30.0;
pub const WATERMARK_SIZE_PT: f32 = 32.0;
const ROWS: usize = 6;

/// Vertical centre of row `i` as a fraction of page height.
fn row_fraction(i: usize) -> f32 {
    0.15 + 0.16 * i as f32
}

/// Stamp (`enabled`) or strip (`!enabled`) the overlay on every page.
///
/// The overlay is replaced wholesale, so applying the pass any number of
/// times leaves at most one set of marks per page.
pub fn apply(mut layout: LayoutConfig, enabled: bool) -> LayoutConfig {
    let marks = if enabled {
        overlay(layout.page_width_pt, layout.page_height_pt)
    } else {
        Vec::new()
    };
    for page in &mut layout.pages {
        page.watermark = marks.clone();
    }
    if enabled {
        log::debug!("watermarked {} page(s)", layout.pages.len());
    }
    layout
}

/// The overlay draws for one page. Identical for every page of a given size.
fn overlay(page_width: f32, page_height: f32) -> Vec<DrawOp> {
    let width = FontManager::default().measure_text_width(
        WATERMARK_LABEL,
        WATERMARK_SIZE_PT,
        Typeface::SansSerif,
        true,
    );
    let (sin, cos) = WATERMARK_ANGLE_DEG.to_radians().sin_cos();
    let half = width / 2.0;
    let cx = page_width / 2.0;

    (0..ROWS)
        .map(|i| {
            let cy = page_height * row_fraction(i);
            // Baseline start such that the rotated label is centred on (cx, cy);
            // y grows downward here, so rising text has a larger start y.
            DrawOp::Text(TextRun {
                text: WATERMARK_LABEL.to_string(),
                x: cx - half * cos,
                y: cy + half * sin,
                typeface: Typeface::SansSerif,
                bold: true,
                italic: false,
                size: WATERMARK_SIZE_PT,
                color: [0.0, 0.0, 0.0, WATERMARK_OPACITY],
                rotation_deg: WATERMARK_ANGLE_DEG,
                role: DrawRole::Watermark,
            })
        })
        .collect()
}
