//! resume-forge – command-line resume exporter.
//!
//! Usage:
//!   resume-forge render <input.json> [--template classic] [--paid]
//!                [--pdf out.pdf] [--docx out.docx] [--text out.txt]
//!                [--layout-json out.json] [--page-size letter|a4]
//!                [--measure-font font.ttf]
//!   resume-forge templates
//!
//! With no output flags, the PDF is written next to the input file with the
//! same stem (e.g. `alex.json` → `alex.pdf`). A failed output is reported and
//! the remaining outputs are still written; the exit status is 1 if any
//! output failed.

use std::fs;
use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand, ValueEnum};

use resume_forge::error::{ExportError, ForgeError, Result};
use resume_forge::fonts::FontManager;
use resume_forge::model::ResumeData;
use resume_forge::pipeline::{export_all, generate_docx, generate_pdf, ExportConfig, PageSize};
use resume_forge::plain_text::render_plain_text;
use resume_forge::templates::{catalog, ensure_entitled, resolve, DEFAULT_TEMPLATE};

#[derive(Parser, Debug)]
#[command(name = "resume-forge")]
#[command(about = "Lay out and export resumes as PDF, Word or plain text", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Render a resume backup file
    Render {
        /// Backup JSON with `profile` and `entries`
        input: PathBuf,

        /// Template key (see `templates`)
        #[arg(short, long, default_value = DEFAULT_TEMPLATE)]
        template: String,

        /// Caller is entitled: unlocks paid templates, no watermark or attribution
        #[arg(long)]
        paid: bool,

        /// Write the PDF here
        #[arg(long)]
        pdf: Option<PathBuf>,

        /// Write a Word (.docx) package here
        #[arg(long)]
        docx: Option<PathBuf>,

        /// Write plain text here
        #[arg(long)]
        text: Option<PathBuf>,

        /// Write the paginated layout as JSON here
        #[arg(long)]
        layout_json: Option<PathBuf>,

        #[arg(long, value_enum, default_value_t = PageSizeArg::Letter)]
        page_size: PageSizeArg,

        /// Measure text with this TTF/OTF instead of built-in metrics.
        ///
        /// Only line wrapping and alignment follow the font; the PDF still
        /// draws with the builtin Times/Helvetica faces.
        #[arg(long)]
        measure_font: Option<PathBuf>,

        /// Title embedded in the PDF metadata (default: input file stem)
        #[arg(long)]
        title: Option<String>,
    },

    /// List the template catalog
    Templates,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum PageSizeArg {
    Letter,
    A4,
}

impl From<PageSizeArg> for PageSize {
    fn from(arg: PageSizeArg) -> Self {
        match arg {
            PageSizeArg::Letter => PageSize::Letter,
            PageSizeArg::A4 => PageSize::A4,
        }
    }
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();
    let failures = match cli.command {
        Commands::Templates => {
            list_templates();
            Ok(0)
        }
        Commands::Render {
            input,
            template,
            paid,
            pdf,
            docx,
            text,
            layout_json,
            page_size,
            measure_font,
            title,
        } => {
            let outputs = Outputs {
                pdf,
                docx,
                text,
                layout_json,
            };
            render(&input, &template, paid, outputs, page_size.into(), measure_font, title)
        }
    };

    match failures {
        Ok(0) => {}
        Ok(n) => {
            eprintln!("{n} output{} failed", if n == 1 { "" } else { "s" });
            process::exit(1);
        }
        Err(e) => {
            eprintln!("Error: {e}");
            process::exit(1);
        }
    }
}

fn list_templates() {
    for t in catalog() {
        let gate = if t.paid_only { "paid" } else { "free" };
        println!("{:<10} {:<5} {}", t.key, gate, t.description);
    }
}

struct Outputs {
    pdf: Option<PathBuf>,
    docx: Option<PathBuf>,
    text: Option<PathBuf>,
    layout_json: Option<PathBuf>,
}

impl Outputs {
    fn is_empty(&self) -> bool {
        self.pdf.is_none() && self.docx.is_none() && self.text.is_none() && self.layout_json.is_none()
    }
}

/// Lay out and write every requested output. Returns the number of outputs
/// that failed; errors before any output is attempted are returned as `Err`.
fn render(
    input: &Path,
    template_key: &str,
    paid: bool,
    mut outputs: Outputs,
    page_size: PageSize,
    measure_font: Option<PathBuf>,
    title: Option<String>,
) -> Result<usize> {
    let json = fs::read_to_string(input).map_err(|source| ForgeError::Read {
        path: input.to_path_buf(),
        source,
    })?;
    let data = ResumeData::from_json(&json)?;

    let template = resolve(template_key)?;
    ensure_entitled(template, paid)?;

    let mut fonts = FontManager::new();
    if let Some(path) = &measure_font {
        fonts.load_font_file(template.typeface, path)?;
    }

    if outputs.is_empty() {
        let mut pdf = input.to_path_buf();
        pdf.set_extension("pdf");
        outputs.pdf = Some(pdf);
    }

    // Default title: stem of the input filename.
    let default_title = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("Resume")
        .to_string();
    let config = ExportConfig {
        title: title.unwrap_or(default_title),
        page_size,
        template: template.key.to_string(),
        paid,
    };

    let wants_pdf = outputs.pdf.is_some() || outputs.layout_json.is_some();
    let (pdf, docx) = match (wants_pdf, outputs.docx.is_some()) {
        (true, true) => {
            let outcome = export_all(&data, &config, &fonts);
            (Some(outcome.pdf), Some(outcome.docx))
        }
        (true, false) => (Some(generate_pdf(&data, &config, &fonts)), None),
        (false, true) => (None, Some(generate_docx(&data, &config))),
        (false, false) => (None, None),
    };

    let mut failures = 0;
    let mut report = |label: &str, result: Result<()>| {
        if let Err(e) = result {
            eprintln!("{label}: {e}");
            failures += 1;
        }
    };

    if let Some(pdf) = pdf {
        match pdf {
            Ok((bytes, layout)) => {
                if let Some(path) = &outputs.pdf {
                    let pages = layout.pages.len();
                    report(
                        "PDF",
                        write_output(path, &bytes).map_err(ForgeError::from).map(|()| {
                            eprintln!(
                                "Wrote '{}' ({} bytes, {} page{})",
                                path.display(),
                                bytes.len(),
                                pages,
                                if pages == 1 { "" } else { "s" }
                            );
                        }),
                    );
                }
                if let Some(path) = &outputs.layout_json {
                    report(
                        "Layout",
                        write_output(path, layout.to_json().as_bytes())
                            .map_err(ForgeError::from)
                            .map(|()| eprintln!("Wrote '{}'", path.display())),
                    );
                }
            }
            Err(e) => report("PDF", Err(e)),
        }
    }

    if let (Some(docx), Some(path)) = (docx, &outputs.docx) {
        let saved = docx.and_then(|bytes| {
            write_output(path, &bytes)?;
            eprintln!("Wrote '{}' ({} bytes)", path.display(), bytes.len());
            Ok(())
        });
        report("Word", saved);
    }

    if let Some(path) = &outputs.text {
        report(
            "Text",
            write_output(path, render_plain_text(&data).as_bytes())
                .map_err(ForgeError::from)
                .map(|()| eprintln!("Wrote '{}'", path.display())),
        );
    }

    Ok(failures)
}

/// Write `bytes` to `path`, creating the parent directory if necessary.
fn write_output(path: &Path, bytes: &[u8]) -> std::result::Result<(), ExportError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::write(path, bytes)?;
    Ok(())
}
