//! Text measurement and word wrapping.
//!
//! Layout uses heuristic advance widths for the two built-in PDF typefaces
//! unless a real TTF/OTF has been registered for a face, in which case glyph
//! advances are read with `ttf-parser`.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ForgeError, Result};

/// Typeface family selector carried by every template and text draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Typeface {
    /// Times-like.
    Serif,
    /// Helvetica-like.
    SansSerif,
}

/// A registered font face with metrics.
#[derive(Clone)]
pub struct FontData {
    /// Raw font bytes (kept alive for ttf-parser's zero-copy API).
    pub bytes: Vec<u8>,
    pub units_per_em: f32,
    pub ascender: f32,
}

#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
pub struct FontKey {
    pub typeface: Typeface,
    pub bold: bool,
}

/// Manages registered fonts. Empty by default: every measurement then uses
/// the built-in heuristics, which keeps layout reproducible across machines.
///
/// A registered face only changes measurement. The PDF backend still sets
/// text in the builtin Times / Helvetica fonts, so centred and right-aligned
/// text is placed for the registered face's widths.
#[derive(Default)]
pub struct FontManager {
    fonts: HashMap<FontKey, FontData>,
}

impl FontManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a TTF/OTF face used for measuring `typeface` at the given weight.
    pub fn load_font(&mut self, typeface: Typeface, bold: bool, bytes: Vec<u8>) -> Result<()> {
        let face =
            ttf_parser::Face::parse(&bytes, 0).map_err(|e| ForgeError::Font(e.to_string()))?;

        let data = FontData {
            units_per_em: face.units_per_em() as f32,
            ascender: face.ascender() as f32,
            bytes,
        };
        log::debug!(
            "registered {:?} (bold={bold}) font, {} units/em",
            typeface,
            data.units_per_em
        );
        self.fonts.insert(FontKey { typeface, bold }, data);
        Ok(())
    }

    /// Read a font file and register it for both weights of `typeface`.
    pub fn load_font_file(&mut self, typeface: Typeface, path: &Path) -> Result<()> {
        let bytes = std::fs::read(path).map_err(|source| ForgeError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        self.load_font(typeface, false, bytes.clone())?;
        self.load_font(typeface, true, bytes)
    }

    pub fn has_real_font(&self, typeface: Typeface, bold: bool) -> bool {
        self.fonts.contains_key(&FontKey { typeface, bold })
    }

    /// Width of `text` in points.
    pub fn measure_text_width(&self, text: &str, font_size: f32, typeface: Typeface, bold: bool) -> f32 {
        let Some(data) = self.fonts.get(&FontKey { typeface, bold }) else {
            return text.chars().count() as f32 * font_size * heuristic_advance(typeface, bold);
        };

        match ttf_parser::Face::parse(&data.bytes, 0) {
            Ok(face) => {
                let scale = font_size / data.units_per_em;
                text.chars()
                    .map(|ch| match face.glyph_index(ch) {
                        Some(gid) => face.glyph_hor_advance(gid).unwrap_or(0) as f32 * scale,
                        // Missing glyph
                        None => font_size * 0.5,
                    })
                    .sum()
            }
            Err(_) => text.chars().count() as f32 * font_size * heuristic_advance(typeface, bold),
        }
    }

    /// Ascender height in points (distance from line top to baseline).
    pub fn ascender(&self, font_size: f32, typeface: Typeface, bold: bool) -> f32 {
        match self.fonts.get(&FontKey { typeface, bold }) {
            Some(data) => data.ascender * font_size / data.units_per_em,
            None => font_size * 0.75,
        }
    }
}

/// Average advance as a fraction of the em. Times sets tighter than Helvetica;
/// bold is ~10 % wider.
fn heuristic_advance(typeface: Typeface, bold: bool) -> f32 {
    match (typeface, bold) {
        (Typeface::SansSerif, false) => 0.5,
        (Typeface::SansSerif, true) => 0.55,
        (Typeface::Serif, false) => 0.45,
        (Typeface::Serif, true) => 0.5,
    }
}

/// Greedy word wrap of `text` to `max_width` points.
///
/// Explicit newlines start a new line. A single word wider than the limit is
/// kept whole on its own line. Always returns at least one line.
pub fn wrap_text(
    text: &str,
    font_size: f32,
    typeface: Typeface,
    bold: bool,
    max_width: f32,
    fonts: &FontManager,
) -> Vec<String> {
    if max_width <= 0.0 || text.is_empty() {
        return vec![text.to_string()];
    }

    let mut lines: Vec<String> = Vec::new();
    for paragraph in text.split('\n') {
        let mut current_line = String::new();
        for word in paragraph.split_whitespace() {
            let candidate = if current_line.is_empty() {
                word.to_string()
            } else {
                format!("{current_line} {word}")
            };
            let w = fonts.measure_text_width(&candidate, font_size, typeface, bold);
            if w > max_width && !current_line.is_empty() {
                lines.push(std::mem::replace(&mut current_line, word.to_string()));
            } else {
                current_line = candidate;
            }
        }
        lines.push(current_line);
    }
    lines
}
