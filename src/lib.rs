pub mod audit;
pub mod blocks;
pub mod classify;
pub mod docx;
mod error;
pub mod markdown;
mod model;
pub mod reconcile;

pub use audit::{ReconciliationReport, StructureAudit, write_json};
pub use docx::DocxSource;
pub use error::Error;
pub use model::{
    ClassificationMode, HeadingKey, HeadingMode, ProtectedHeadings, ReconcileConfig, SectionBlock,
    StructuralParagraph, normalize_heading,
};
pub use reconcile::{EditSet, ReconciliationOutcome};

use std::path::Path;
use std::time::Instant;

/// Everything one run produces: the edit set plus both audit records.
#[derive(Clone, Debug)]
pub struct Reconciliation {
    pub structure: StructureAudit,
    pub report: ReconciliationReport,
    pub edits: EditSet,
}

fn check_indices(paragraphs: &[StructuralParagraph]) -> Result<(), Error> {
    match paragraphs.iter().enumerate().find(|(i, p)| p.index != *i) {
        Some((i, p)) => Err(Error::MalformedInput(format!(
            "paragraph at position {i} has index {}; indices must be contiguous from 0",
            p.index
        ))),
        None => Ok(()),
    }
}

/// Reconcile a paragraph sequence against heading-delimited markdown.
/// Inputs are left untouched; the result carries the edits to apply.
pub fn reconcile_paragraphs(
    paragraphs: &[StructuralParagraph],
    markdown: &str,
    config: &ReconcileConfig,
) -> Result<Reconciliation, Error> {
    check_indices(paragraphs)?;

    let classification = classify::classify_all(paragraphs, config.mode);
    let blocks = blocks::build_blocks(paragraphs, &classification);
    let structure = StructureAudit::new(paragraphs, &classification, &blocks);

    let sections = markdown::parse(markdown);
    let result = reconcile::reconcile(&blocks, &sections, &config.protected);
    let report = ReconciliationReport::new(config, classification.mode_used, &result);

    log::info!(
        "Reconciled {} block(s) using {:?}: {} paragraph(s) replaced, {} section(s) missing",
        blocks.len(),
        classification.mode_used,
        result.replaced,
        result.missing_sections.len(),
    );

    Ok(Reconciliation {
        structure,
        report,
        edits: result.edits,
    })
}

pub fn read_paragraphs(input: &Path) -> Result<Vec<StructuralParagraph>, Error> {
    Ok(docx::parse(input)?.paragraphs().to_vec())
}

pub fn read_paragraphs_bytes(input: &[u8]) -> Result<Vec<StructuralParagraph>, Error> {
    Ok(docx::parse_bytes(input.to_vec())?.paragraphs().to_vec())
}

pub fn read_markdown(path: &Path) -> Result<String, Error> {
    let bytes = std::fs::read(path).map_err(|e| {
        Error::Io(std::io::Error::new(e.kind(), format!("{}: {}", e, path.display())))
    })?;
    String::from_utf8(bytes)
        .map_err(|_| Error::MalformedInput(format!("{} is not valid UTF-8", path.display())))
}

pub fn export_docx_bytes(
    input: &[u8],
    markdown: &str,
    config: &ReconcileConfig,
) -> Result<(Vec<u8>, Reconciliation), Error> {
    let t0 = Instant::now();

    let source = docx::parse_bytes(input.to_vec())?;
    let t_parse = t0.elapsed();

    let reconciliation = reconcile_paragraphs(source.paragraphs(), markdown, config)?;
    let t_reconcile = t0.elapsed();

    let bytes = source.apply_edits(&reconciliation.edits)?;
    let t_total = t0.elapsed();

    log::info!(
        "Timing: parse={:.1}ms, reconcile={:.1}ms, rewrite={:.1}ms, total={:.1}ms (output {} bytes)",
        t_parse.as_secs_f64() * 1000.0,
        (t_reconcile - t_parse).as_secs_f64() * 1000.0,
        (t_total - t_reconcile).as_secs_f64() * 1000.0,
        t_total.as_secs_f64() * 1000.0,
        bytes.len(),
    );

    Ok((bytes, reconciliation))
}

pub fn export_docx(
    input: &Path,
    markdown: &Path,
    output: &Path,
    config: &ReconcileConfig,
) -> Result<Reconciliation, Error> {
    let input_bytes = std::fs::read(input).map_err(|e| {
        Error::Io(std::io::Error::new(e.kind(), format!("{}: {}", e, input.display())))
    })?;
    let markdown_text = read_markdown(markdown)?;

    let (bytes, reconciliation) = export_docx_bytes(&input_bytes, &markdown_text, config)?;
    std::fs::write(output, &bytes).map_err(Error::Io)?;
    Ok(reconciliation)
}
