//! Block renderers – turn one logical block (header, summary, section
//! heading, entry head, bullet) into positioned draws.
//!
//! Every renderer is a pure function of `(data, frame, top_y)` and returns
//! the draws together with the height it consumed. Only the paginator moves
//! the cursor.

use crate::document::{EntryView, HeaderRecord};
use crate::fonts::{wrap_text, FontManager};
use crate::layout_config::*;
use crate::templates::{HeaderLayout, HeaderRule, HeadingDecoration, TemplateConfig};

/// Horizontal offset of bullet text from the bullet glyph.
pub const BULLET_INDENT_PT: f32 = 14.0;
/// Gap above each bullet.
pub const BULLET_GAP_PT: f32 = 3.0;

const INK: Color = [0.07, 0.07, 0.07, 1.0];
const BANNER: Color = [0.11, 0.11, 0.11, 1.0];

/// Single-line advance for text that is not body copy.
fn line_advance(size: f32) -> f32 {
    size * 1.3
}

/// Page geometry and font metrics shared by every renderer in one pass.
pub struct Frame<'a> {
    pub template: &'a TemplateConfig,
    pub fonts: &'a FontManager,
    pub page_width: f32,
}

impl<'a> Frame<'a> {
    pub fn new(template: &'a TemplateConfig, fonts: &'a FontManager, page_width: f32) -> Self {
        Self {
            template,
            fonts,
            page_width,
        }
    }

    pub fn left(&self) -> f32 {
        self.template.margin
    }

    pub fn right(&self) -> f32 {
        self.page_width - self.template.margin
    }

    pub fn content_width(&self) -> f32 {
        self.right() - self.left()
    }

    fn width(&self, text: &str, size: f32, bold: bool) -> f32 {
        self.fonts
            .measure_text_width(text, size, self.template.typeface, bold)
    }

    fn baseline(&self, top: f32, size: f32, bold: bool) -> f32 {
        top + self.fonts.ascender(size, self.template.typeface, bold)
    }

    fn text(&self, spec: TextSpec, text: impl Into<String>, x: f32, top: f32) -> DrawOp {
        DrawOp::Text(TextRun {
            text: text.into(),
            x,
            y: self.baseline(top, spec.size, spec.bold),
            typeface: self.template.typeface,
            bold: spec.bold,
            italic: spec.italic,
            size: spec.size,
            color: spec.color,
            rotation_deg: 0.0,
            role: spec.role,
        })
    }

    fn centered(&self, spec: TextSpec, text: &str, top: f32) -> DrawOp {
        let x = (self.page_width - self.width(text, spec.size, spec.bold)) / 2.0;
        self.text(spec, text, x, top)
    }

    fn rule(&self, y: f32, x1: f32, x2: f32, thickness: f32, color: Color) -> DrawOp {
        DrawOp::Rule(RuleLine {
            x1,
            y1: y,
            x2,
            y2: y,
            thickness,
            color,
        })
    }

    fn full_rule(&self, y: f32, thickness: f32, color: Color) -> DrawOp {
        self.rule(y, self.left(), self.right(), thickness, color)
    }
}

#[derive(Clone, Copy)]
struct TextSpec {
    size: f32,
    bold: bool,
    italic: bool,
    color: Color,
    role: DrawRole,
}

impl TextSpec {
    fn new(size: f32, role: DrawRole) -> Self {
        Self {
            size,
            bold: false,
            italic: false,
            color: INK,
            role,
        }
    }

    fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    fn italic(mut self) -> Self {
        self.italic = true;
        self
    }

    fn color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }
}

/// Output of one renderer call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Block {
    pub draws: Vec<DrawOp>,
    pub height: f32,
}

pub type HeaderRenderer = fn(&HeaderRecord, &Frame, f32) -> Block;
pub type HeadingRenderer = fn(&str, &Frame, f32) -> Block;

/// Renderer for a header layout. Exhaustive, so a new layout without a
/// renderer does not compile.
pub const fn header_renderer(layout: HeaderLayout) -> HeaderRenderer {
    match layout {
        HeaderLayout::CenteredStacked => centered_stacked_header,
        HeaderLayout::LeftAccentBar => left_accent_header,
        HeaderLayout::DarkBanner => dark_banner_header,
    }
}

pub const fn heading_renderer(decoration: HeadingDecoration) -> HeadingRenderer {
    match decoration {
        HeadingDecoration::RuledUnderline => ruled_underline_heading,
        HeadingDecoration::TopTickBar => top_tick_heading,
        HeadingDecoration::FilledBand => filled_band_heading,
    }
}

/// The renderer pair selected by a template's two style modes.
#[derive(Clone, Copy)]
pub struct BlockRenderers {
    pub header: HeaderRenderer,
    pub heading: HeadingRenderer,
}

impl BlockRenderers {
    pub fn for_template(template: &TemplateConfig) -> Self {
        Self {
            header: header_renderer(template.header),
            heading: heading_renderer(template.heading),
        }
    }
}

// ---------------------------------------------------------------------------
// Headers
// ---------------------------------------------------------------------------

fn contact_lines(header: &HeaderRecord, joined: bool, separator: &str) -> Vec<String> {
    let parts: Vec<String> = [&header.school, &header.email]
        .into_iter()
        .flatten()
        .cloned()
        .collect();
    if joined && !parts.is_empty() {
        vec![parts.join(separator)]
    } else {
        parts
    }
}

/// Name centered with contact lines stacked beneath and one or two rules.
pub fn centered_stacked_header(header: &HeaderRecord, frame: &Frame, top: f32) -> Block {
    let t = frame.template;
    let mut draws = Vec::new();
    let mut y = top;

    if t.header_rule == HeaderRule::Double {
        draws.push(frame.full_rule(y, 1.5, INK));
        y += 10.0;
    }

    let name = t.display_name(header.name.as_deref());
    draws.push(frame.centered(TextSpec::new(t.sizes.name, DrawRole::Name).bold(), &name, y));
    y += line_advance(t.sizes.name) + 2.0;

    let italic_school = t.header_rule == HeaderRule::Double;
    for (i, line) in contact_lines(header, t.joined_contact, " · ").iter().enumerate() {
        let mut spec = TextSpec::new(t.sizes.meta, DrawRole::Contact).color(gray(0.27));
        if italic_school && i == 0 && header.school.is_some() {
            spec = spec.italic();
        }
        draws.push(frame.centered(spec, line, y));
        y += line_advance(t.sizes.meta);
    }

    y += 6.0;
    let thickness = match t.header_rule {
        HeaderRule::Single => 2.0,
        HeaderRule::Double => 1.5,
    };
    draws.push(frame.full_rule(y, thickness, INK));
    y += 16.0;

    Block {
        draws,
        height: y - top,
    }
}

/// Left-aligned name beside a vertical accent bar.
pub fn left_accent_header(header: &HeaderRecord, frame: &Frame, top: f32) -> Block {
    let t = frame.template;
    let bar_width = 3.0;
    let x = frame.left() + bar_width + 12.0;
    let mut draws = Vec::new();
    let mut y = top;

    let name = t.display_name(header.name.as_deref());
    draws.push(frame.text(TextSpec::new(t.sizes.name, DrawRole::Name).bold(), name, x, y));
    y += line_advance(t.sizes.name);

    if let Some(school) = &header.school {
        let line = match &header.grade {
            Some(grade) => format!("{school} · Grade {grade}"),
            None => school.clone(),
        };
        let spec = TextSpec::new(t.sizes.body.min(10.0), DrawRole::Contact).color(gray(0.33));
        draws.push(frame.text(spec, line, x, y));
        y += line_advance(spec.size);
    }
    if let Some(email) = &header.email {
        let spec = TextSpec::new(t.sizes.meta, DrawRole::Contact).color(gray(0.47));
        draws.push(frame.text(spec, email.as_str(), x, y));
        y += line_advance(spec.size);
    }

    // The bar spans the whole text stack, so it is known only now.
    draws.insert(
        0,
        DrawOp::Rect(FilledRect {
            x: frame.left(),
            y: top,
            width: bar_width,
            height: y - top,
            color: INK,
            role: DrawRole::Decoration,
        }),
    );
    y += 18.0;

    Block {
        draws,
        height: y - top,
    }
}

/// White name on a full-bleed dark band across the top of the page.
///
/// The band always starts at the physical page top, whatever `top` is; the
/// returned height runs from `top` to just below the band.
pub fn dark_banner_header(header: &HeaderRecord, frame: &Frame, top: f32) -> Block {
    let t = frame.template;
    let mut text_draws = Vec::new();
    let mut y = 28.0;

    let name = t.display_name(header.name.as_deref());
    let name_spec = TextSpec::new(t.sizes.name, DrawRole::Name).bold().color(WHITE);
    text_draws.push(frame.text(name_spec, name, frame.left(), y));
    y += line_advance(t.sizes.name);

    if let Some(line) = contact_lines(header, true, "  ·  ").into_iter().next() {
        y += 4.0;
        let spec = TextSpec::new(t.sizes.meta, DrawRole::Contact).color(gray(0.73));
        text_draws.push(frame.text(spec, line, frame.left(), y));
        y += line_advance(t.sizes.meta);
    }
    let band_bottom = y + 22.0;

    let mut draws = vec![DrawOp::Rect(FilledRect {
        x: 0.0,
        y: 0.0,
        width: frame.page_width,
        height: band_bottom,
        color: BANNER,
        role: DrawRole::Decoration,
    })];
    draws.extend(text_draws);

    Block {
        draws,
        height: (band_bottom + 20.0 - top).max(0.0),
    }
}

// ---------------------------------------------------------------------------
// Summary
// ---------------------------------------------------------------------------

/// The GPA / interests line, wrapped to the content width.
pub fn summary_block(summary: &str, frame: &Frame, top: f32) -> Block {
    let t = frame.template;
    let lines = wrap_text(
        summary,
        t.sizes.body,
        t.typeface,
        false,
        frame.content_width(),
        frame.fonts,
    );
    let spec = TextSpec::new(t.sizes.body, DrawRole::Summary);
    let draws = lines
        .iter()
        .enumerate()
        .map(|(i, line)| frame.text(spec, line.as_str(), frame.left(), top + i as f32 * t.line_pitch))
        .collect();
    Block {
        draws,
        height: lines.len() as f32 * t.line_pitch,
    }
}

// ---------------------------------------------------------------------------
// Section headings
// ---------------------------------------------------------------------------

fn heading_spec(frame: &Frame) -> TextSpec {
    TextSpec::new(frame.template.sizes.heading, DrawRole::Heading).bold()
}

/// Bold label with a thin full-width rule beneath.
pub fn ruled_underline_heading(label: &str, frame: &Frame, top: f32) -> Block {
    let spec = heading_spec(frame);
    let y = top + 4.0;
    let rule_y = y + line_advance(spec.size) + 1.0;
    Block {
        draws: vec![
            frame.text(spec, label.to_uppercase(), frame.left(), y),
            frame.full_rule(rule_y, 0.75, gray(0.53)),
        ],
        height: rule_y - top + 8.0,
    }
}

/// Short bold tick above the label, thin rule beneath it.
pub fn top_tick_heading(label: &str, frame: &Frame, top: f32) -> Block {
    let spec = heading_spec(frame);
    let text = label.to_uppercase();
    let tick_end = frame.left() + frame.width(&text, spec.size, true);
    let y = top + 4.0;
    let rule_y = y + 2.0 + line_advance(spec.size) + 2.0;
    Block {
        draws: vec![
            frame.rule(y, frame.left(), tick_end, 2.0, INK),
            frame.text(spec, text, frame.left(), y + 2.0),
            frame.full_rule(rule_y, 0.5, gray(0.8)),
        ],
        height: rule_y - top + 9.0,
    }
}

/// Label on a light filled band spanning the content width.
pub fn filled_band_heading(label: &str, frame: &Frame, top: f32) -> Block {
    let spec = heading_spec(frame);
    let y = top + 4.0;
    let band_height = line_advance(spec.size) + 6.0;
    Block {
        draws: vec![
            DrawOp::Rect(FilledRect {
                x: frame.left(),
                y,
                width: frame.content_width(),
                height: band_height,
                color: gray(0.94),
                role: DrawRole::Decoration,
            }),
            frame.text(spec, label.to_uppercase(), frame.left() + 6.0, y + 3.0),
        ],
        height: y + band_height - top + 9.0,
    }
}

// ---------------------------------------------------------------------------
// Entries
// ---------------------------------------------------------------------------

/// Title (left) and date range (right) on one baseline, then the organisation
/// and hours lines when present.
pub fn entry_head(entry: &EntryView, frame: &Frame, top: f32) -> Block {
    let t = frame.template;
    let mut draws = Vec::new();
    let mut y = top;

    let title_spec = TextSpec::new(t.sizes.entry_title, DrawRole::EntryTitle).bold();
    let date_spec = TextSpec::new(t.sizes.meta, DrawRole::EntryDate).color(gray(0.33));

    let date_width = entry
        .date_range
        .as_deref()
        .map(|d| frame.width(d, date_spec.size, false))
        .unwrap_or(0.0);
    let title_width = (frame.content_width() - date_width - 8.0).max(frame.content_width() / 2.0);
    let title_lines = wrap_text(
        &entry.title,
        title_spec.size,
        t.typeface,
        true,
        title_width,
        frame.fonts,
    );

    if let Some(date) = &entry.date_range {
        // Share the title's baseline.
        let title_baseline = frame.baseline(y, title_spec.size, true);
        let date_top = title_baseline - frame.fonts.ascender(date_spec.size, t.typeface, false);
        draws.push(frame.text(date_spec, date.as_str(), frame.right() - date_width, date_top));
    }
    for line in &title_lines {
        draws.push(frame.text(title_spec, line.as_str(), frame.left(), y));
        y += line_advance(title_spec.size);
    }

    if let Some(org) = &entry.organization {
        let spec = TextSpec::new(t.sizes.body, DrawRole::Organization)
            .italic()
            .color(gray(0.2));
        draws.push(frame.text(spec, org.as_str(), frame.left(), y));
        y += line_advance(spec.size);
    }
    if let Some(hours) = &entry.hours {
        let spec = TextSpec::new(t.sizes.meta, DrawRole::Hours).color(gray(0.4));
        draws.push(frame.text(spec, hours.as_str(), frame.left(), y));
        y += line_advance(spec.size);
    }

    Block {
        draws,
        height: y - top,
    }
}

/// Wrap one bullet to the indented content width.
pub fn wrap_bullet(text: &str, frame: &Frame) -> Vec<String> {
    let t = frame.template;
    wrap_text(
        text,
        t.sizes.body,
        t.typeface,
        false,
        frame.content_width() - BULLET_INDENT_PT,
        frame.fonts,
    )
}

/// Height of a bullet's first line including its top gap – the amount the
/// paginator requires before starting a bullet.
pub fn bullet_first_line_height(template: &TemplateConfig) -> f32 {
    BULLET_GAP_PT + template.line_pitch
}

/// A bullet glyph followed by pre-wrapped lines, all drawn unconditionally.
pub fn bullet_block(lines: &[String], frame: &Frame, top: f32) -> Block {
    let t = frame.template;
    let spec = TextSpec::new(t.sizes.body, DrawRole::Bullet);
    let first = top + BULLET_GAP_PT;
    let mut draws = Vec::with_capacity(lines.len() + 1);
    draws.push(frame.text(
        TextSpec { role: DrawRole::Decoration, ..spec },
        "•",
        frame.left(),
        first,
    ));
    for (i, line) in lines.iter().enumerate() {
        draws.push(frame.text(
            spec,
            line.as_str(),
            frame.left() + BULLET_INDENT_PT,
            first + i as f32 * t.line_pitch,
        ));
    }
    Block {
        draws,
        height: BULLET_GAP_PT + lines.len() as f32 * t.line_pitch,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::templates::{catalog, resolve};

    fn header(name: &str) -> HeaderRecord {
        HeaderRecord {
            name: Some(name.to_string()),
            school: Some("Lincoln High".to_string()),
            email: Some("alex@example.com".to_string()),
            ..Default::default()
        }
    }

    fn texts(block: &Block) -> Vec<&TextRun> {
        block.draws.iter().filter_map(DrawOp::as_text).collect()
    }

    #[test]
    fn renderer_table_follows_template_modes() {
        for t in catalog() {
            let fonts = FontManager::default();
            let frame = Frame::new(t, &fonts, 612.0);
            let r = BlockRenderers::for_template(t);
            let block = (r.heading)("Activities", &frame, 100.0);
            let has_rect = block.draws.iter().any(|d| matches!(d, DrawOp::Rect(_)));
            assert_eq!(has_rect, t.heading == HeadingDecoration::FilledBand, "{}", t.key);
        }
    }

    #[test]
    fn header_dispatch_covers_every_layout() {
        let fonts = FontManager::default();
        for t in catalog() {
            let frame = Frame::new(t, &fonts, 612.0);
            let block = (BlockRenderers::for_template(t).header)(&header("Alex"), &frame, t.margin);
            let first_rect = block.draws.iter().find_map(|d| match d {
                DrawOp::Rect(r) => Some((r.x, r.y, r.width)),
                _ => None,
            });
            let expected = match t.header {
                HeaderLayout::CenteredStacked => None,
                HeaderLayout::LeftAccentBar => Some((t.margin, t.margin, 3.0)),
                HeaderLayout::DarkBanner => Some((0.0, 0.0, 612.0)),
            };
            assert_eq!(first_rect, expected, "{}", t.key);
        }
    }

    #[test]
    fn centered_header_centers_upper_name() {
        let fonts = FontManager::default();
        let t = resolve("classic").unwrap();
        let frame = Frame::new(t, &fonts, 612.0);
        let block = centered_stacked_header(&header("Alex Rivera"), &frame, t.margin);
        let name = texts(&block)
            .into_iter()
            .find(|r| r.role == DrawRole::Name)
            .unwrap();
        assert_eq!(name.text, "ALEX RIVERA");
        let width = fonts.measure_text_width(&name.text, name.size, t.typeface, true);
        assert!((name.x + width / 2.0 - 306.0).abs() < 0.01);
        assert!(block.height > 0.0);
    }

    #[test]
    fn executive_header_has_two_rules() {
        let fonts = FontManager::default();
        let t = resolve("executive").unwrap();
        let frame = Frame::new(t, &fonts, 612.0);
        let block = centered_stacked_header(&header("Alex"), &frame, t.margin);
        let rules = block.draws.iter().filter(|d| matches!(d, DrawOp::Rule(_))).count();
        assert_eq!(rules, 2);
    }

    #[test]
    fn dark_banner_is_full_bleed() {
        let fonts = FontManager::default();
        let t = resolve("split").unwrap();
        let frame = Frame::new(t, &fonts, 612.0);
        let block = dark_banner_header(&header("Alex Rivera"), &frame, t.margin);
        let DrawOp::Rect(band) = &block.draws[0] else {
            panic!("band must be painted first");
        };
        assert_eq!((band.x, band.y, band.width), (0.0, 0.0, 612.0));
        assert!(t.margin + block.height > band.height);
        let name = texts(&block)[0];
        assert_eq!(name.color, WHITE);
        assert_eq!(name.text, "Alex Rivera");
    }

    #[test]
    fn date_is_right_aligned_on_title_baseline() {
        let fonts = FontManager::default();
        let t = resolve("classic").unwrap();
        let frame = Frame::new(t, &fonts, 612.0);
        let entry = EntryView {
            title: "Robotics Captain".into(),
            organization: Some("FRC".into()),
            date_range: Some("Sep 2022 – Present".into()),
            hours: None,
            bullets: vec![],
        };
        let block = entry_head(&entry, &frame, 200.0);
        let runs = texts(&block);
        let date = runs.iter().find(|r| r.role == DrawRole::EntryDate).unwrap();
        let title = runs.iter().find(|r| r.role == DrawRole::EntryTitle).unwrap();
        assert!((date.y - title.y).abs() < 0.01);
        let w = fonts.measure_text_width(&date.text, date.size, t.typeface, false);
        assert!((date.x + w - frame.right()).abs() < 0.01);
        assert!(runs.iter().any(|r| r.role == DrawRole::Organization));
    }

    #[test]
    fn bullet_height_counts_every_line() {
        let fonts = FontManager::default();
        let t = resolve("modern").unwrap();
        let frame = Frame::new(t, &fonts, 612.0);
        let lines = vec!["one".to_string(), "two".to_string(), "three".to_string()];
        let block = bullet_block(&lines, &frame, 0.0);
        assert_eq!(block.height, BULLET_GAP_PT + 3.0 * t.line_pitch);
        assert_eq!(texts(&block).len(), 4);
    }
}
