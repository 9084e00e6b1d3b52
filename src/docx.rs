//! Structured-document backend – the same document model as a flat sequence
//! of styled paragraphs, serialized as a zipped `.docx` package.
//!
//! There are no page breaks or overlay geometry here; the word processor
//! reflows the text. Unpaid output ends with an attribution paragraph.

use std::fmt::Display;
use std::io::{Cursor, Write};

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, DateTime, ZipWriter};

use crate::document::{DocumentModel, EntryView};
use crate::error::ExportError;

pub const ATTRIBUTION: &str = "Created with Resume Forge";

const CT_NS: &str = "http://schemas.openxmlformats.org/package/2006/content-types";
const W_NS: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";
const RELS_NS: &str = "http://schemas.openxmlformats.org/package/2006/relationships";
const OFFICE_DOC_REL: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument";
const RELS_TYPE: &str = "application/vnd.openxmlformats-package.relationships+xml";
const XML_TYPE: &str = "application/xml";
const DOC_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Alignment {
    #[default]
    Left,
    Center,
}

/// A bottom border, in eighths of a point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BottomBorder {
    pub size: u32,
    pub color: &'static str,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Run {
    pub text: String,
    pub bold: bool,
    pub italic: bool,
    /// Font size in half-points.
    pub size_half_pt: u32,
    /// Hex colour without `#`.
    pub color: Option<&'static str>,
}

impl Run {
    fn new(text: impl Into<String>, size_half_pt: u32) -> Self {
        Self {
            text: text.into(),
            size_half_pt,
            ..Default::default()
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

    fn color(mut self, color: &'static str) -> Self {
        self.color = Some(color);
        self
    }
}

/// Spacing and indent are in twips (1/20 pt).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Paragraph {
    pub alignment: Alignment,
    pub spacing_before: u32,
    pub spacing_after: u32,
    pub indent_left: u32,
    pub border_bottom: Option<BottomBorder>,
    pub runs: Vec<Run>,
}

impl Paragraph {
    fn new(before: u32, after: u32) -> Self {
        Self {
            spacing_before: before,
            spacing_after: after,
            ..Default::default()
        }
    }

    fn centered(mut self) -> Self {
        self.alignment = Alignment::Center;
        self
    }

    fn run(mut self, run: Run) -> Self {
        self.runs.push(run);
        self
    }

    fn divider() -> Self {
        Self {
            border_bottom: Some(BottomBorder {
                size: 4,
                color: "888888",
            }),
            ..Self::new(80, 40)
        }
    }

    /// Concatenated run text.
    pub fn text(&self) -> String {
        self.runs.iter().map(|r| r.text.as_str()).collect()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StructuredDocument {
    pub paragraphs: Vec<Paragraph>,
}

/// Build the paragraph sequence for `model`. `paid` only controls the
/// trailing attribution.
pub fn render_structured(model: &DocumentModel, paid: bool) -> StructuredDocument {
    let header = &model.header;
    let mut paragraphs = Vec::new();

    let name = header
        .name
        .as_deref()
        .map(str::to_uppercase)
        .unwrap_or_else(|| "YOUR NAME".to_string());
    paragraphs.push(Paragraph::new(0, 40).centered().run(Run::new(name, 36).bold()));

    let grade = header.grade.as_ref().map(|g| format!("Grade {g}"));
    let contact: Vec<&str> = [header.school.as_deref(), grade.as_deref(), header.email.as_deref()]
        .into_iter()
        .flatten()
        .collect();
    if !contact.is_empty() {
        paragraphs.push(
            Paragraph::new(0, 20)
                .centered()
                .run(Run::new(contact.join("  ·  "), 20).color("444444")),
        );
    }
    if let Some(gpa) = &header.gpa {
        paragraphs.push(
            Paragraph::new(0, 60)
                .centered()
                .run(Run::new(format!("GPA: {gpa}"), 20).color("444444")),
        );
    }
    paragraphs.push(Paragraph::divider());

    for section in &model.sections {
        paragraphs.push(Paragraph::new(120, 20).run(Run::new(section.label.to_uppercase(), 20).bold()));
        paragraphs.push(Paragraph::divider());
        for entry in &section.entries {
            push_entry(&mut paragraphs, entry);
        }
    }

    if !paid {
        paragraphs.push(Paragraph::new(0, 40));
        paragraphs.push(
            Paragraph::new(120, 0)
                .centered()
                .run(Run::new(ATTRIBUTION, 14).color("AAAAAA")),
        );
    }

    StructuredDocument { paragraphs }
}

fn push_entry(paragraphs: &mut Vec<Paragraph>, entry: &EntryView) {
    let mut title = Paragraph::new(80, 0).run(Run::new(entry.title.as_str(), 22).bold());
    if let Some(dates) = &entry.date_range {
        title = title.run(Run::new(format!("   {dates}"), 18).color("666666"));
    }
    paragraphs.push(title);

    if let Some(org) = &entry.organization {
        paragraphs.push(Paragraph::new(0, 0).run(Run::new(org.as_str(), 20).italic().color("333333")));
    }
    if let Some(hours) = &entry.hours {
        paragraphs.push(Paragraph::new(0, 0).run(Run::new(hours.as_str(), 18).color("777777")));
    }
    for bullet in &entry.bullets {
        paragraphs.push(Paragraph {
            indent_left: 360,
            ..Paragraph::new(20, 0).run(Run::new(format!("• {bullet}"), 20))
        });
    }
    paragraphs.push(Paragraph::new(0, 40));
}

fn doc_err<E: Display>(e: E) -> ExportError {
    ExportError::Document(e.to_string())
}

type XmlWriter = Writer<Vec<u8>>;

fn start(w: &mut XmlWriter, name: &str, attrs: &[(&str, &str)]) -> Result<(), ExportError> {
    let tag = BytesStart::new(name).with_attributes(attrs.iter().copied());
    w.write_event(Event::Start(tag)).map_err(doc_err)
}

fn empty(w: &mut XmlWriter, name: &str, attrs: &[(&str, &str)]) -> Result<(), ExportError> {
    let tag = BytesStart::new(name).with_attributes(attrs.iter().copied());
    w.write_event(Event::Empty(tag)).map_err(doc_err)
}

fn end(w: &mut XmlWriter, name: &str) -> Result<(), ExportError> {
    w.write_event(Event::End(BytesEnd::new(name))).map_err(doc_err)
}

fn xml_writer() -> Result<XmlWriter, ExportError> {
    let mut w = Writer::new(Vec::new());
    w.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("yes"))))
        .map_err(doc_err)?;
    Ok(w)
}

fn content_types_part() -> Result<Vec<u8>, ExportError> {
    let mut w = xml_writer()?;
    start(&mut w, "Types", &[("xmlns", CT_NS)])?;
    empty(&mut w, "Default", &[("Extension", "rels"), ("ContentType", RELS_TYPE)])?;
    empty(&mut w, "Default", &[("Extension", "xml"), ("ContentType", XML_TYPE)])?;
    empty(
        &mut w,
        "Override",
        &[("PartName", "/word/document.xml"), ("ContentType", DOC_TYPE)],
    )?;
    end(&mut w, "Types")?;
    Ok(w.into_inner())
}

fn package_rels_part() -> Result<Vec<u8>, ExportError> {
    let mut w = xml_writer()?;
    start(&mut w, "Relationships", &[("xmlns", RELS_NS)])?;
    empty(
        &mut w,
        "Relationship",
        &[
            ("Id", "rId1"),
            ("Type", OFFICE_DOC_REL),
            ("Target", "word/document.xml"),
        ],
    )?;
    end(&mut w, "Relationships")?;
    Ok(w.into_inner())
}

impl StructuredDocument {
    /// The WordprocessingML body (`word/document.xml`).
    pub fn document_xml(&self) -> Result<Vec<u8>, ExportError> {
        let mut w = xml_writer()?;
        start(&mut w, "w:document", &[("xmlns:w", W_NS)])?;
        start(&mut w, "w:body", &[])?;
        for p in &self.paragraphs {
            write_paragraph(&mut w, p)?;
        }
        empty(&mut w, "w:sectPr", &[])?;
        end(&mut w, "w:body")?;
        end(&mut w, "w:document")?;
        Ok(w.into_inner())
    }

    /// Serialize as a `.docx` zip package.
    ///
    /// Entry timestamps are pinned to the zip epoch so equal documents give
    /// equal bytes.
    pub fn to_docx(&self) -> Result<Vec<u8>, ExportError> {
        let options = SimpleFileOptions::default()
            .compression_method(CompressionMethod::Deflated)
            .last_modified_time(DateTime::default());
        let parts = [
            ("[Content_Types].xml", content_types_part()?),
            ("_rels/.rels", package_rels_part()?),
            ("word/document.xml", self.document_xml()?),
        ];

        let mut package = ZipWriter::new(Cursor::new(Vec::new()));
        for (name, bytes) in &parts {
            package.start_file(*name, options).map_err(doc_err)?;
            package.write_all(bytes)?;
        }
        let bytes = package.finish().map_err(doc_err)?.into_inner();
        log::info!(
            "serialized Word package: {} paragraphs, {} bytes",
            self.paragraphs.len(),
            bytes.len()
        );
        Ok(bytes)
    }
}

fn write_paragraph(w: &mut XmlWriter, p: &Paragraph) -> Result<(), ExportError> {
    start(w, "w:p", &[])?;
    start(w, "w:pPr", &[])?;
    if let Some(border) = &p.border_bottom {
        let size = border.size.to_string();
        start(w, "w:pBdr", &[])?;
        empty(
            w,
            "w:bottom",
            &[
                ("w:val", "single"),
                ("w:sz", size.as_str()),
                ("w:space", "1"),
                ("w:color", border.color),
            ],
        )?;
        end(w, "w:pBdr")?;
    }
    let before = p.spacing_before.to_string();
    let after = p.spacing_after.to_string();
    empty(
        w,
        "w:spacing",
        &[("w:before", before.as_str()), ("w:after", after.as_str())],
    )?;
    if p.indent_left > 0 {
        let left = p.indent_left.to_string();
        empty(w, "w:ind", &[("w:left", left.as_str())])?;
    }
    if p.alignment == Alignment::Center {
        empty(w, "w:jc", &[("w:val", "center")])?;
    }
    end(w, "w:pPr")?;

    for run in &p.runs {
        start(w, "w:r", &[])?;
        start(w, "w:rPr", &[])?;
        if run.bold {
            empty(w, "w:b", &[])?;
        }
        if run.italic {
            empty(w, "w:i", &[])?;
        }
        if let Some(color) = run.color {
            empty(w, "w:color", &[("w:val", color)])?;
        }
        let size = run.size_half_pt.to_string();
        empty(w, "w:sz", &[("w:val", size.as_str())])?;
        end(w, "w:rPr")?;
        start(w, "w:t", &[("xml:space", "preserve")])?;
        w.write_event(Event::Text(BytesText::new(&run.text)))
            .map_err(doc_err)?;
        end(w, "w:t")?;
        end(w, "w:r")?;
    }
    end(w, "w:p")
}
