use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use docx_reconcile::{Error, ReconcileConfig, write_json};

/// Rewrite the body text of a DOCX section by section from heading-delimited markdown.
#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Source DOCX file
    input: PathBuf,

    /// Markdown with `#`..`######` section headings
    markdown: PathBuf,

    /// Output DOCX path [default: <input>-reconciled.docx]
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Heading detection mode: strict (styles only) or heuristic
    #[arg(long, env = "HEADING_MODE")]
    mode: Option<String>,

    /// `|`-separated normalized heading keys to leave untouched, e.g. "summary|education"
    #[arg(long, env = "PROTECTED_HEADINGS")]
    protect: Option<String>,

    /// Write the classified structure as JSON
    #[arg(long)]
    structure_json: Option<PathBuf>,

    /// Write the reconciliation report as JSON
    #[arg(long)]
    report_json: Option<PathBuf>,

    /// Reconcile and write the JSON artifacts, but do not write the DOCX
    #[arg(long)]
    dry_run: bool,
}

fn default_output(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "document".to_string());
    input.with_file_name(format!("{stem}-reconciled.docx"))
}

fn run(cli: Cli) -> Result<(), Error> {
    let config = ReconcileConfig::from_settings(cli.mode.as_deref(), cli.protect.as_deref())?;

    let reconciliation = if cli.dry_run {
        let paragraphs = docx_reconcile::read_paragraphs(&cli.input)?;
        let markdown = docx_reconcile::read_markdown(&cli.markdown)?;
        docx_reconcile::reconcile_paragraphs(&paragraphs, &markdown, &config)?
    } else {
        let output = cli.output.clone().unwrap_or_else(|| default_output(&cli.input));
        let reconciliation = docx_reconcile::export_docx(&cli.input, &cli.markdown, &output, &config)?;
        println!("Exported docx: {}", output.display());
        reconciliation
    };

    if let Some(path) = &cli.structure_json {
        write_json(path, &reconciliation.structure)?;
        println!("Structure JSON: {}", path.display());
    }
    if let Some(path) = &cli.report_json {
        write_json(path, &reconciliation.report)?;
        println!("Report JSON: {}", path.display());
    }

    let report = &reconciliation.report;
    println!("Heading mode used: {:?}", report.heading_mode_used);
    println!("Paragraphs replaced (content only): {}", report.replaced);
    if !report.missing_sections.is_empty() {
        println!("Sections without heading match in markdown (left intact):");
        println!("{}", report.missing_sections.join(" | "));
    }
    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
