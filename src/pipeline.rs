//! Pipeline – ties together the document model, layout, pagination,
//! watermark and the two export backends into single function calls.

use crate::docx::render_structured;
use crate::document::build_document;
use crate::error::Result;
use crate::fonts::FontManager;
use crate::layout_config::LayoutConfig;
use crate::model::ResumeData;
use crate::pagination::paginate;
pub use crate::pagination::PageSize;
use crate::render::render_pdf;
use crate::templates::{resolve, DEFAULT_TEMPLATE};
use crate::watermark;

/// Configuration for one export.
#[derive(Debug, Clone)]
pub struct ExportConfig {
    /// Document title embedded in the PDF metadata (default: "Resume").
    pub title: String,
    /// Physical page size (default: US Letter).
    pub page_size: PageSize,
    /// Template key from the catalog (default: "classic").
    pub template: String,
    /// Entitlement flag. Unpaid output is watermarked (PDF) or carries an
    /// attribution line (Word).
    pub paid: bool,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            title: "Resume".to_string(),
            page_size: PageSize::Letter,
            template: DEFAULT_TEMPLATE.to_string(),
            paid: false,
        }
    }
}

impl ExportConfig {
    pub fn with_template(template: &str) -> Self {
        Self {
            template: template.to_string(),
            ..Self::default()
        }
    }
}

/// Generate only the paginated layout (no PDF rendering).
///
/// The watermark pass always runs, so the result reflects `config.paid`.
pub fn compute_layout(
    data: &ResumeData,
    config: &ExportConfig,
    fonts: &FontManager,
) -> Result<LayoutConfig> {
    let template = resolve(&config.template)?;
    let model = build_document(data);
    log::debug!(
        "laying out {} entries in {} sections with '{}'",
        model.entry_count(),
        model.sections.len(),
        template.key
    );

    let mut layout = paginate(&model, template, fonts, config.page_size);
    layout.title = config.title.clone();
    Ok(watermark::apply(layout, !config.paid))
}

/// Full raster path: data → layout → PDF bytes.
pub fn generate_pdf(
    data: &ResumeData,
    config: &ExportConfig,
    fonts: &FontManager,
) -> Result<(Vec<u8>, LayoutConfig)> {
    let layout = compute_layout(data, config, fonts)?;
    let bytes = render_pdf(&layout)?;
    Ok((bytes, layout))
}

/// Structured path: data → paragraphs → `.docx` package.
///
/// Word reflows the text itself, so the template and page size do not apply.
pub fn generate_docx(data: &ResumeData, config: &ExportConfig) -> Result<Vec<u8>> {
    let model = build_document(data);
    let bytes = render_structured(&model, config.paid).to_docx()?;
    Ok(bytes)
}

/// Outcome of [`export_all`]; each backend reports separately.
#[derive(Debug)]
pub struct ExportOutcome {
    pub pdf: Result<(Vec<u8>, LayoutConfig)>,
    pub docx: Result<Vec<u8>>,
}

/// Run both backends. A failure in one never prevents the other.
pub fn export_all(data: &ResumeData, config: &ExportConfig, fonts: &FontManager) -> ExportOutcome {
    let pdf = generate_pdf(data, config, fonts);
    if let Err(e) = &pdf {
        log::warn!("PDF export failed: {e}");
    }
    let docx = generate_docx(data, config);
    if let Err(e) = &docx {
        log::warn!("Word export failed: {e}");
    }
    ExportOutcome { pdf, docx }
}
