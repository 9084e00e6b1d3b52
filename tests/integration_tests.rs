//! Integration tests for the resume-forge pipeline.
//!
//! These tests validate:
//! - Layout matches the expected structure for known inputs
//! - Pagination keeps headings with content and bounds the page count
//! - PDF and Word output exist and have a valid format
//! - The CLI writes every requested file

use std::io::{Cursor, Read};
use std::process::Command;

use sha2::{Digest, Sha256};

use resume_forge::blocks::{
    bullet_block, entry_head, summary_block, wrap_bullet, BlockRenderers, Frame,
};
use resume_forge::document::{build_document, DocumentModel};
use resume_forge::docx::ATTRIBUTION;
use resume_forge::fonts::FontManager;
use resume_forge::layout_config::{DrawOp, DrawRole, LayoutConfig};
use resume_forge::pagination::{MIN_ENTRY_BLOCK_PT, MIN_HEADING_BLOCK_PT};
use resume_forge::render::render_pdf;
use resume_forge::templates::{catalog, TemplateConfig};
use resume_forge::{
    compute_layout, export_all, generate_docx, generate_pdf, Category, Entry, ExportConfig,
    ForgeError, ResumeData, StudentProfile,
};

// =====================================================================
// Helpers
// =====================================================================

fn assert_valid_pdf(bytes: &[u8]) {
    assert!(bytes.len() > 100, "PDF too small: {} bytes", bytes.len());
    assert_eq!(&bytes[0..5], b"%PDF-", "Missing PDF header");
}

/// `word/document.xml` from a `.docx` package.
fn word_body(bytes: &[u8]) -> String {
    assert_eq!(&bytes[0..2], b"PK", "Missing zip header");
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
    let mut body = String::new();
    archive
        .by_name("word/document.xml")
        .unwrap()
        .read_to_string(&mut body)
        .unwrap();
    body
}

fn paid(template: &str) -> ExportConfig {
    ExportConfig {
        paid: true,
        ..ExportConfig::with_template(template)
    }
}

fn alex() -> ResumeData {
    ResumeData {
        profile: StudentProfile {
            name: "Alex Rivera".into(),
            ..Default::default()
        },
        entries: vec![Entry::new(Category::Activity, "Robotics Captain")
            .with_bullets(["Led 12 students to regionals"])],
    }
}

/// 40 entries spread over three categories, two short bullets each.
fn forty_entries() -> ResumeData {
    let categories = [Category::Activity, Category::Volunteer, Category::Work];
    let entries = (0..40)
        .map(|i| {
            let mut e = Entry::new(categories[i % 3], format!("Position {i}"))
                .with_dates("2021-06", "2023-05")
                .with_bullets([
                    "Organized weekly sessions for new members",
                    "Raised $2,000 for the spring drive",
                ]);
            e.organization = format!("Organization {i}");
            e.hours_per_week = "4".into();
            e.weeks_per_year = "30".into();
            e
        })
        .collect();
    ResumeData {
        profile: StudentProfile {
            name: "Jordan Lee".into(),
            school: "Lincoln High School".into(),
            email: "jordan@example.com".into(),
            gpa: "3.8".into(),
            ..Default::default()
        },
        entries,
    }
}

fn text_runs_with_role(config: &LayoutConfig, role: DrawRole) -> Vec<(usize, String)> {
    config
        .text_runs()
        .filter(|(_, r)| r.role == role)
        .map(|(p, r)| (p, r.text.clone()))
        .collect()
}

/// Vertical space the paginator consumes for `model`, ignoring page breaks.
fn consumed_height(model: &DocumentModel, t: &TemplateConfig, fonts: &FontManager) -> f32 {
    let frame = Frame::new(t, fonts, 612.0);
    let r = BlockRenderers::for_template(t);
    let mut total = (r.header)(&model.header, &frame, t.margin).height;
    if let Some(summary) = model.header.summary_line() {
        total += summary_block(&summary, &frame, 0.0).height;
    }
    for section in &model.sections {
        total += (r.heading)(section.label, &frame, 0.0).height;
        for entry in &section.entries {
            total += entry_head(entry, &frame, 0.0).height;
            for bullet in &entry.bullets {
                total += bullet_block(&wrap_bullet(bullet, &frame), &frame, 0.0).height;
            }
            total += t.entry_spacing;
        }
        total += t.section_spacing;
    }
    total
}

// =====================================================================
// Layout scenarios
// =====================================================================

#[test]
fn single_activity_scenario() {
    let fonts = FontManager::default();
    let layout = compute_layout(&alex(), &ExportConfig::default(), &fonts).unwrap();
    assert_eq!(layout.pages.len(), 1);

    let names: Vec<_> = layout
        .text_runs()
        .filter(|(_, r)| r.role == DrawRole::Name)
        .map(|(_, r)| r)
        .collect();
    assert_eq!(names.len(), 1);
    let name = names[0];
    assert_eq!(name.text, "ALEX RIVERA");
    let width = fonts.measure_text_width(&name.text, name.size, name.typeface, name.bold);
    assert!((name.x + width / 2.0 - layout.page_width_pt / 2.0).abs() < 0.01);

    assert_eq!(
        text_runs_with_role(&layout, DrawRole::Heading),
        vec![(0, "ACTIVITIES".to_string())]
    );
    assert_eq!(
        text_runs_with_role(&layout, DrawRole::EntryTitle),
        vec![(0, "Robotics Captain".to_string())]
    );
    assert_eq!(
        text_runs_with_role(&layout, DrawRole::Bullet),
        vec![(0, "Led 12 students to regionals".to_string())]
    );
    assert!(layout.pages[0].has_watermark());
}

#[test]
fn sections_follow_catalog_order() {
    // Supplied in reverse catalog order.
    let entries = Category::ALL
        .iter()
        .rev()
        .map(|&c| Entry::new(c, format!("{c} entry")))
        .collect();
    let data = ResumeData {
        entries,
        ..Default::default()
    };
    let fonts = FontManager::default();
    for t in catalog() {
        let layout = compute_layout(&data, &paid(t.key), &fonts).unwrap();
        let headings: Vec<String> = text_runs_with_role(&layout, DrawRole::Heading)
            .into_iter()
            .map(|(_, text)| text)
            .collect();
        let expected: Vec<String> = Category::ALL
            .iter()
            .map(|c| c.label().to_uppercase())
            .collect();
        assert_eq!(headings, expected, "template {}", t.key);
    }
}

#[test]
fn hidden_entries_and_empty_categories_produce_nothing() {
    let mut hidden = Entry::new(Category::Work, "Cashier");
    hidden.hidden = true;
    let data = ResumeData {
        entries: vec![hidden, Entry::new(Category::Skill, "Python")],
        ..Default::default()
    };
    let fonts = FontManager::default();
    let layout = compute_layout(&data, &paid("classic"), &fonts).unwrap();
    assert_eq!(
        text_runs_with_role(&layout, DrawRole::Heading),
        vec![(0, "SKILLS".to_string())]
    );
}

#[test]
fn headings_are_never_orphaned() {
    let fonts = FontManager::default();
    let data = forty_entries();
    for t in catalog() {
        let layout = compute_layout(&data, &paid(t.key), &fonts).unwrap();
        for page in &layout.pages {
            let roles: Vec<DrawRole> = page.draws.iter().map(DrawOp::role).collect();
            for (i, role) in roles.iter().enumerate() {
                if *role == DrawRole::Heading {
                    assert!(
                        roles[i..].contains(&DrawRole::EntryTitle),
                        "{}: heading alone at the bottom of page {}",
                        t.key,
                        page.page_index
                    );
                }
            }
        }
    }
}

#[test]
fn thresholds_leave_room_for_an_entry() {
    assert!(MIN_HEADING_BLOCK_PT > MIN_ENTRY_BLOCK_PT);
}

#[test]
fn forty_entries_page_count_tracks_consumed_height() {
    let fonts = FontManager::default();
    let data = forty_entries();
    let model = build_document(&data);
    for t in catalog() {
        let layout = compute_layout(&data, &paid(t.key), &fonts).unwrap();
        let pages = layout.pages.len() as f32;
        let printable = layout.page_height_pt - 2.0 * t.margin;
        let total = consumed_height(&model, t, &fonts);

        // An entry head placed at the threshold may run past the bottom
        // margin, and spacing is added before the next break check. A break
        // leaves at most the heading threshold unused.
        let overrun = MIN_ENTRY_BLOCK_PT + t.entry_spacing + t.section_spacing;
        let lower = (total / (printable + overrun)).ceil();
        let upper = (total / (printable - MIN_HEADING_BLOCK_PT)).floor() + 1.0;
        assert!(
            (lower..=upper).contains(&pages),
            "{}: {} pages for {:.0}pt of content ({}..={})",
            t.key,
            pages,
            total,
            lower,
            upper
        );
        assert!(pages > 1.0, "{}: 40 entries should not fit one page", t.key);
    }
}

#[test]
fn every_page_is_watermarked_when_unpaid() {
    let fonts = FontManager::default();
    let layout =
        compute_layout(&forty_entries(), &ExportConfig::with_template("split"), &fonts).unwrap();
    assert!(layout.pages.len() > 1);
    for page in &layout.pages {
        assert!(page.has_watermark(), "page {} unmarked", page.page_index);
        assert!(page
            .watermark
            .iter()
            .all(|d| d.role() == DrawRole::Watermark));
    }
}

#[test]
fn unknown_template_is_an_error() {
    let fonts = FontManager::default();
    let result = compute_layout(&alex(), &ExportConfig::with_template("poster"), &fonts);
    assert!(matches!(result, Err(ForgeError::UnknownTemplate(k)) if k == "poster"));
}

#[test]
fn unknown_category_is_rejected_at_input() {
    let json = r#"{"profile":{},"entries":[{"type":"Hobby","title":"Chess"}]}"#;
    assert!(matches!(
        ResumeData::from_json(json),
        Err(ForgeError::InvalidInput(_))
    ));
}

// =====================================================================
// Determinism
// =====================================================================

#[test]
fn layout_is_deterministic() {
    let fonts = FontManager::default();
    for t in catalog() {
        let digest = || {
            let layout = compute_layout(&forty_entries(), &ExportConfig::with_template(t.key), &fonts)
                .unwrap();
            Sha256::digest(layout.to_json().as_bytes())
        };
        assert_eq!(digest(), digest(), "template {}", t.key);
    }
}

#[test]
fn word_package_is_deterministic() {
    let a = generate_docx(&forty_entries(), &ExportConfig::default()).unwrap();
    let b = generate_docx(&forty_entries(), &ExportConfig::default()).unwrap();
    assert_eq!(Sha256::digest(&a), Sha256::digest(&b));
}

// =====================================================================
// Backends
// =====================================================================

#[test]
fn all_templates_render_successfully() {
    let fonts = FontManager::default();
    for t in catalog() {
        let result = generate_pdf(&forty_entries(), &paid(t.key), &fonts);
        assert!(result.is_ok(), "Template '{}' failed: {:?}", t.key, result.err());
        let (bytes, _) = result.unwrap();
        assert_valid_pdf(&bytes);
    }
}

#[test]
fn render_from_layout_json() {
    let fonts = FontManager::default();
    let layout = compute_layout(&alex(), &ExportConfig::default(), &fonts).unwrap();
    let parsed = LayoutConfig::from_json(&layout.to_json()).unwrap();
    assert_eq!(parsed, layout);
    assert_valid_pdf(&render_pdf(&parsed).unwrap());
}

#[test]
fn word_attribution_follows_entitlement() {
    let unpaid = word_body(&generate_docx(&alex(), &ExportConfig::default()).unwrap());
    assert!(unpaid.contains(ATTRIBUTION));

    let paid = word_body(&generate_docx(&alex(), &paid("classic")).unwrap());
    assert!(!paid.contains(ATTRIBUTION));
    assert!(paid.contains("ALEX RIVERA"));
    assert!(paid.contains("• Led 12 students to regionals"));
}

#[test]
fn backends_report_independently() {
    let fonts = FontManager::default();
    let outcome = export_all(&alex(), &paid("classic"), &fonts);
    assert_valid_pdf(&outcome.pdf.unwrap().0);
    assert!(outcome.docx.is_ok());

    let outcome = export_all(&alex(), &ExportConfig::with_template("nope"), &fonts);
    assert!(outcome.pdf.is_err());
    assert!(outcome.docx.is_ok());
}

// =====================================================================
// CLI
// =====================================================================

fn cli() -> Command {
    Command::new(env!("CARGO_BIN_EXE_resume-forge"))
}

#[test]
fn cli_writes_every_requested_output() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("alex.json");
    std::fs::write(&input, alex().to_json()).unwrap();

    let out = dir.path().join("out");
    let status = cli()
        .arg("render")
        .arg(&input)
        .args(["--template", "modern", "--page-size", "a4"])
        .arg("--pdf")
        .arg(out.join("alex.pdf"))
        .arg("--docx")
        .arg(out.join("alex.docx"))
        .arg("--text")
        .arg(out.join("alex.txt"))
        .arg("--layout-json")
        .arg(out.join("alex.layout.json"))
        .status()
        .unwrap();
    assert!(status.success());

    assert_valid_pdf(&std::fs::read(out.join("alex.pdf")).unwrap());
    let text = std::fs::read_to_string(out.join("alex.txt")).unwrap();
    assert!(text.starts_with("ALEX RIVERA"));
    let layout =
        LayoutConfig::from_json(&std::fs::read_to_string(out.join("alex.layout.json")).unwrap())
            .unwrap();
    assert_eq!(layout.page_width_pt, 595.28);
    assert!(layout.pages[0].has_watermark());
    let word = word_body(&std::fs::read(out.join("alex.docx")).unwrap());
    assert!(word.contains("ALEX RIVERA"));
}

#[test]
fn cli_failed_save_does_not_block_other_outputs() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("alex.json");
    std::fs::write(&input, alex().to_json()).unwrap();

    // A directory cannot be overwritten by the PDF.
    let blocked = dir.path().join("taken");
    std::fs::create_dir(&blocked).unwrap();

    let output = cli()
        .arg("render")
        .arg(&input)
        .arg("--pdf")
        .arg(&blocked)
        .arg("--docx")
        .arg(dir.path().join("alex.docx"))
        .arg("--text")
        .arg(dir.path().join("alex.txt"))
        .output()
        .unwrap();
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("I/O error"));

    assert!(blocked.is_dir());
    let word = word_body(&std::fs::read(dir.path().join("alex.docx")).unwrap());
    assert!(word.contains("ALEX RIVERA"));
    assert!(dir.path().join("alex.txt").exists());
}

#[test]
fn cli_defaults_to_pdf_next_to_input() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("alex.json");
    std::fs::write(&input, alex().to_json()).unwrap();

    let status = cli().arg("render").arg(&input).status().unwrap();
    assert!(status.success());
    assert_valid_pdf(&std::fs::read(dir.path().join("alex.pdf")).unwrap());
}

#[test]
fn cli_refuses_locked_template_without_entitlement() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("alex.json");
    std::fs::write(&input, alex().to_json()).unwrap();

    let locked = cli()
        .arg("render")
        .arg(&input)
        .args(["--template", "executive"])
        .output()
        .unwrap();
    assert!(!locked.status.success());
    assert!(String::from_utf8_lossy(&locked.stderr).contains("requires an upgrade"));
    assert!(!dir.path().join("alex.pdf").exists());

    let unlocked = cli()
        .arg("render")
        .arg(&input)
        .args(["--template", "executive", "--paid"])
        .status()
        .unwrap();
    assert!(unlocked.success());
}
