//! Template registry – the fixed catalog of resume styles.
//!
//! Templates are plain data. The block renderers read the two mode enums to
//! pick a drawing routine, so a new template is a new catalog row.

use serde::Serialize;

use crate::error::ForgeError;
use crate::fonts::Typeface;

/// How the name block at the top of page one is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum HeaderLayout {
    CenteredStacked,
    LeftAccentBar,
    DarkBanner,
}

/// How each section heading is decorated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum HeadingDecoration {
    RuledUnderline,
    TopTickBar,
    FilledBand,
}

/// Rule(s) under a centered header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum HeaderRule {
    Single,
    /// One rule above the name, one below the contact lines.
    Double,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum NameCase {
    Upper,
    AsTyped,
}

/// Font sizes in points, per text role.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FontSizes {
    pub name: f32,
    pub entry_title: f32,
    pub body: f32,
    pub meta: f32,
    pub heading: f32,
}

/// An immutable style record for one visual variant.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TemplateConfig {
    pub key: &'static str,
    pub label: &'static str,
    pub description: &'static str,
    pub typeface: Typeface,
    /// Page margin on all four sides, in points.
    pub margin: f32,
    pub sizes: FontSizes,
    /// Baseline-to-baseline distance for body text.
    pub line_pitch: f32,
    pub entry_spacing: f32,
    pub section_spacing: f32,
    pub heading: HeadingDecoration,
    pub header: HeaderLayout,
    pub header_rule: HeaderRule,
    /// Join school and email on one contact line instead of stacking them.
    pub joined_contact: bool,
    pub name_case: NameCase,
    pub paid_only: bool,
}

impl TemplateConfig {
    /// The name as printed, with the placeholder used for an empty profile.
    pub fn display_name(&self, name: Option<&str>) -> String {
        match (self.name_case, name) {
            (NameCase::Upper, Some(n)) => n.to_uppercase(),
            (NameCase::Upper, None) => "YOUR NAME".to_string(),
            (NameCase::AsTyped, Some(n)) => n.to_string(),
            (NameCase::AsTyped, None) => "Your Name".to_string(),
        }
    }
}

pub const DEFAULT_TEMPLATE: &str = "classic";

static CATALOG: [TemplateConfig; 5] = [
    TemplateConfig {
        key: "classic",
        label: "Classic",
        description: "ATS-friendly · Times · Centered header",
        typeface: Typeface::Serif,
        margin: 48.0,
        sizes: FontSizes { name: 18.0, entry_title: 11.0, body: 10.0, meta: 9.5, heading: 10.5 },
        line_pitch: 14.0,
        entry_spacing: 10.0,
        section_spacing: 16.0,
        heading: HeadingDecoration::RuledUnderline,
        header: HeaderLayout::CenteredStacked,
        header_rule: HeaderRule::Single,
        joined_contact: false,
        name_case: NameCase::Upper,
        paid_only: false,
    },
    TemplateConfig {
        key: "modern",
        label: "Modern",
        description: "Clean sans-serif · Left accent bar · Bold name",
        typeface: Typeface::SansSerif,
        margin: 48.0,
        sizes: FontSizes { name: 22.0, entry_title: 11.0, body: 10.5, meta: 9.5, heading: 9.0 },
        line_pitch: 15.0,
        entry_spacing: 10.0,
        section_spacing: 16.0,
        heading: HeadingDecoration::TopTickBar,
        header: HeaderLayout::LeftAccentBar,
        header_rule: HeaderRule::Single,
        joined_contact: false,
        name_case: NameCase::AsTyped,
        paid_only: false,
    },
    TemplateConfig {
        key: "compact",
        label: "Compact",
        description: "Tight spacing · Fits more on one page · Sans-serif",
        typeface: Typeface::SansSerif,
        margin: 36.0,
        sizes: FontSizes { name: 15.0, entry_title: 9.5, body: 9.0, meta: 8.5, heading: 8.5 },
        line_pitch: 11.5,
        entry_spacing: 6.0,
        section_spacing: 10.0,
        heading: HeadingDecoration::RuledUnderline,
        header: HeaderLayout::CenteredStacked,
        header_rule: HeaderRule::Single,
        joined_contact: true,
        name_case: NameCase::Upper,
        paid_only: true,
    },
    TemplateConfig {
        key: "executive",
        label: "Executive",
        description: "Serif · Double rules · Boxed section headings",
        typeface: Typeface::Serif,
        margin: 48.0,
        sizes: FontSizes { name: 20.0, entry_title: 11.0, body: 10.5, meta: 9.5, heading: 9.5 },
        line_pitch: 15.0,
        entry_spacing: 10.0,
        section_spacing: 16.0,
        heading: HeadingDecoration::FilledBand,
        header: HeaderLayout::CenteredStacked,
        header_rule: HeaderRule::Double,
        joined_contact: false,
        name_case: NameCase::Upper,
        paid_only: true,
    },
    TemplateConfig {
        key: "split",
        label: "Split",
        description: "Dark header band · Clean sans · High contrast",
        typeface: Typeface::SansSerif,
        margin: 48.0,
        sizes: FontSizes { name: 21.0, entry_title: 10.5, body: 10.0, meta: 9.5, heading: 9.0 },
        line_pitch: 14.0,
        entry_spacing: 9.0,
        section_spacing: 16.0,
        heading: HeadingDecoration::TopTickBar,
        header: HeaderLayout::DarkBanner,
        header_rule: HeaderRule::Single,
        joined_contact: true,
        name_case: NameCase::AsTyped,
        paid_only: true,
    },
];

/// All templates, in menu order.
pub fn catalog() -> &'static [TemplateConfig] {
    &CATALOG
}

/// Look a template up by key. Unknown keys are an error, never a fallback.
pub fn resolve(key: &str) -> Result<&'static TemplateConfig, ForgeError> {
    CATALOG
        .iter()
        .find(|t| t.key == key)
        .ok_or_else(|| ForgeError::UnknownTemplate(key.to_string()))
}

/// Entitlement gate for callers. The layout engine itself never checks this.
pub fn ensure_entitled(template: &TemplateConfig, paid: bool) -> Result<(), ForgeError> {
    if template.paid_only && !paid {
        return Err(ForgeError::TemplateLocked(template.key.to_string()));
    }
    Ok(())
}
