//! # resume-forge – Template-driven resume layout and export
//!
//! This crate turns a student profile plus a list of entries into a
//! paginated, printable resume. The pipeline stages are:
//!
//! 1. **Model** – group entries into ordered sections and resolve every
//!    printable line ([`model`], [`document`])
//! 2. **Style** – pick a template from the fixed catalog ([`templates`])
//! 3. **Blocks** – per-template renderers emit positioned draws ([`blocks`])
//! 4. **Paginate** – a vertical cursor cuts the blocks into pages ([`pagination`])
//! 5. **Watermark** – unpaid output gets a preview overlay ([`watermark`])
//! 6. **Render** – emit PDF bytes via printpdf ([`render`])
//!
//! The same document model also feeds a Word package backend ([`docx`]) and a
//! plain-text export ([`plain_text`]).

pub mod blocks;
pub mod document;
pub mod docx;
pub mod error;
pub mod fonts;
pub mod layout_config;
pub mod model;
pub mod pagination;
pub mod pipeline;
pub mod plain_text;
pub mod render;
pub mod templates;
pub mod watermark;

// Re-exports for convenience
pub use error::{ExportError, ForgeError};
pub use model::{Category, Entry, ResumeData, StudentProfile};
pub use pipeline::{compute_layout, export_all, generate_docx, generate_pdf, ExportConfig, PageSize};
