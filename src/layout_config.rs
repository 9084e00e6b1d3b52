//! Layout config – the intermediate representation between pagination and
//! PDF rendering. This is the "frozen" structure that encodes exactly what
//! goes on each page: absolute positions, fonts and colours, nothing left to
//! compute.

use serde::{Deserialize, Serialize};

use crate::fonts::Typeface;

/// RGBA, each channel 0–1. Alpha is draw opacity.
pub type Color = [f32; 4];

pub const BLACK: Color = [0.0, 0.0, 0.0, 1.0];
pub const WHITE: Color = [1.0, 1.0, 1.0, 1.0];

pub fn gray(level: f32) -> Color {
    [level, level, level, 1.0]
}

/// A complete document layout ready for rendering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutConfig {
    /// Document title embedded in the PDF metadata.
    #[serde(default = "LayoutConfig::default_title")]
    pub title: String,
    /// Width of each page in PDF points (1 pt = 1/72 inch).
    pub page_width_pt: f32,
    /// Height of each page in PDF points.
    pub page_height_pt: f32,
    /// Ordered list of pages.
    pub pages: Vec<Page>,
}

/// One physical page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page {
    pub page_index: usize,
    /// Content draws in paint order.
    pub draws: Vec<DrawOp>,
    /// Overlay painted after the content; empty unless the watermark pass ran.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub watermark: Vec<DrawOp>,
}

/// What a draw belongs to. Carried for inspection and tests; rendering
/// ignores it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DrawRole {
    Name,
    Contact,
    Summary,
    Heading,
    EntryTitle,
    EntryDate,
    Organization,
    Hours,
    Bullet,
    Decoration,
    Watermark,
}

/// A single positioned drawing instruction. Coordinates are points from the
/// page's top-left corner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DrawOp {
    Text(TextRun),
    Rect(FilledRect),
    Rule(RuleLine),
}

impl DrawOp {
    pub fn role(&self) -> DrawRole {
        match self {
            DrawOp::Text(t) => t.role,
            DrawOp::Rect(r) => r.role,
            DrawOp::Rule(_) => DrawRole::Decoration,
        }
    }

    pub fn as_text(&self) -> Option<&TextRun> {
        match self {
            DrawOp::Text(t) => Some(t),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextRun {
    pub text: String,
    /// Left end of the baseline.
    pub x: f32,
    /// Baseline position.
    pub y: f32,
    pub typeface: Typeface,
    pub bold: bool,
    pub italic: bool,
    pub size: f32,
    pub color: Color,
    /// Counter-clockwise rotation about (x, y), in degrees.
    #[serde(default)]
    pub rotation_deg: f32,
    pub role: DrawRole,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilledRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub color: Color,
    pub role: DrawRole,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleLine {
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
    pub thickness: f32,
    pub color: Color,
}

impl LayoutConfig {
    pub fn new(page_width_pt: f32, page_height_pt: f32) -> Self {
        Self {
            title: Self::default_title(),
            page_width_pt,
            page_height_pt,
            pages: Vec::new(),
        }
    }

    fn default_title() -> String {
        "Resume".to_string()
    }

    /// Serialise to JSON.
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }

    /// Deserialise from JSON.
    pub fn from_json(json: &str) -> Result<Self, String> {
        serde_json::from_str(json).map_err(|e| e.to_string())
    }

    /// All text runs on every page, content first then overlay, in order.
    pub fn text_runs(&self) -> impl Iterator<Item = (usize, &TextRun)> {
        self.pages.iter().flat_map(|p| {
            p.draws
                .iter()
                .chain(p.watermark.iter())
                .filter_map(DrawOp::as_text)
                .map(move |t| (p.page_index, t))
        })
    }
}

impl Page {
    pub fn new(page_index: usize) -> Self {
        Self {
            page_index,
            draws: Vec::new(),
            watermark: Vec::new(),
        }
    }

    pub fn has_watermark(&self) -> bool {
        !self.watermark.is_empty()
    }
}
