//! Pagination – walks the document model top to bottom with a vertical write
//! cursor and cuts it into fixed-size pages.
//!
//! Handles:
//! - Letter / A4 page boundaries
//! - Keeping a section heading together with its first entry
//! - Breaking before an entry head that would not fit
//! - Breaking before a bullet whose first line would not fit
//!
//! A bullet is never split: once its first line is placed the remaining lines
//! follow on the same page, so a bullet starting low on a page may run past
//! the bottom margin. A bullet taller than a whole page is drawn as-is.

use serde::{Deserialize, Serialize};

use crate::blocks::{
    bullet_block, bullet_first_line_height, entry_head, summary_block, wrap_bullet, Block,
    BlockRenderers, Frame,
};
use crate::document::DocumentModel;
use crate::fonts::FontManager;
use crate::layout_config::{LayoutConfig, Page};
use crate::templates::TemplateConfig;

/// Space a section heading needs below the cursor: the heading itself plus
/// one entry head, so a heading never ends a page alone.
pub const MIN_HEADING_BLOCK_PT: f32 = 72.0;
/// Space an entry needs below the cursor for its title/date line and
/// organisation/hours lines.
pub const MIN_ENTRY_BLOCK_PT: f32 = 40.0;

/// Physical page size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageSize {
    /// 8.5 × 11 in.
    #[default]
    Letter,
    /// 210 × 297 mm.
    A4,
}

impl PageSize {
    pub fn width_pt(self) -> f32 {
        match self {
            PageSize::Letter => 612.0,
            PageSize::A4 => 595.28,
        }
    }

    pub fn height_pt(self) -> f32 {
        match self {
            PageSize::Letter => 792.0,
            PageSize::A4 => 841.89,
        }
    }
}

/// The paginator's cursor for one render call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderState {
    pub page_index: usize,
    /// Distance from the physical page top, in points.
    pub cursor_y: f32,
}

impl RenderState {
    fn start(template: &TemplateConfig) -> Self {
        Self {
            page_index: 0,
            cursor_y: template.margin,
        }
    }

    fn advance(self, dy: f32) -> Self {
        Self {
            cursor_y: self.cursor_y + dy,
            ..self
        }
    }
}

/// Lay `model` out under `template`. The result never has zero pages.
pub fn paginate(
    model: &DocumentModel,
    template: &TemplateConfig,
    fonts: &FontManager,
    page_size: PageSize,
) -> LayoutConfig {
    let mut config = LayoutConfig::new(page_size.width_pt(), page_size.height_pt());
    let frame = Frame::new(template, fonts, config.page_width_pt);
    let renderers = BlockRenderers::for_template(template);
    let bottom = config.page_height_pt - template.margin;

    let mut pages = vec![Page::new(0)];
    let mut state = RenderState::start(template);

    // The header opens a fresh page and is never checked against the bottom.
    let header = (renderers.header)(&model.header, &frame, state.cursor_y);
    state = place(state, header, &mut pages);

    if let Some(summary) = model.header.summary_line() {
        let block = summary_block(&summary, &frame, state.cursor_y);
        state = place(state, block, &mut pages);
    }

    for section in &model.sections {
        state = ensure_room(state, MIN_HEADING_BLOCK_PT, bottom, template, &mut pages);
        let heading = (renderers.heading)(section.label, &frame, state.cursor_y);
        state = place(state, heading, &mut pages);

        for entry in &section.entries {
            state = ensure_room(state, MIN_ENTRY_BLOCK_PT, bottom, template, &mut pages);
            let head = entry_head(entry, &frame, state.cursor_y);
            state = place(state, head, &mut pages);

            for bullet in &entry.bullets {
                let lines = wrap_bullet(bullet, &frame);
                state = ensure_room(
                    state,
                    bullet_first_line_height(template),
                    bottom,
                    template,
                    &mut pages,
                );
                let block = bullet_block(&lines, &frame, state.cursor_y);
                state = place(state, block, &mut pages);
            }
            state = state.advance(template.entry_spacing);
        }
        state = state.advance(template.section_spacing);
    }

    log::debug!(
        "paginated {} sections onto {} page(s) with template '{}'",
        model.sections.len(),
        pages.len(),
        template.key
    );
    config.pages = pages;
    config
}

/// Append a block's draws to the current page and move the cursor past it.
fn place(state: RenderState, block: Block, pages: &mut [Page]) -> RenderState {
    if let Some(page) = pages.last_mut() {
        page.draws.extend(block.draws);
    }
    state.advance(block.height)
}

/// Start a new page when fewer than `needed` points remain above `bottom`.
fn ensure_room(
    state: RenderState,
    needed: f32,
    bottom: f32,
    template: &TemplateConfig,
    pages: &mut Vec<Page>,
) -> RenderState {
    if state.cursor_y + needed <= bottom {
        return state;
    }
    let page_index = state.page_index + 1;
    log::debug!(
        "page break at y={:.1} (needed {needed:.1}, bottom {bottom:.1}) -> page {page_index}",
        state.cursor_y
    );
    pages.push(Page::new(page_index));
    RenderState {
        page_index,
        cursor_y: template.margin,
    }
}
