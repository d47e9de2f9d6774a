//! Inspectable records written alongside the rewritten document.

use std::path::Path;

use serde::Serialize;

use crate::classify::Classification;
use crate::error::Error;
use crate::model::{
    ClassificationMode, HeadingKey, HeadingMode, ReconcileConfig, SectionBlock, StructuralParagraph,
};
use crate::reconcile::{ReconcileResult, ReconciliationOutcome};

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParagraphRecord {
    pub index: usize,
    pub text: String,
    pub style_id: String,
    pub has_list: bool,
    pub is_heading: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockSummary {
    pub key: HeadingKey,
    pub heading_text: String,
    pub content_slots: usize,
}

/// Classified structure and block layout, captured before any edit is applied.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StructureAudit {
    pub heading_mode_used: ClassificationMode,
    pub headings_in_order: Vec<String>,
    pub structure: Vec<ParagraphRecord>,
    pub blocks: Vec<BlockSummary>,
}

impl StructureAudit {
    pub fn new(
        paragraphs: &[StructuralParagraph],
        classification: &Classification,
        blocks: &[SectionBlock],
    ) -> Self {
        let structure: Vec<ParagraphRecord> = paragraphs
            .iter()
            .map(|p| ParagraphRecord {
                index: p.index,
                text: p.text.clone(),
                style_id: p.style_id.clone(),
                has_list: p.has_list_marker,
                is_heading: classification.is_heading(p.index),
            })
            .collect();
        let headings_in_order = structure
            .iter()
            .filter(|r| r.is_heading)
            .map(|r| r.text.clone())
            .collect();
        Self {
            heading_mode_used: classification.mode_used,
            headings_in_order,
            structure,
            blocks: blocks
                .iter()
                .map(|b| BlockSummary {
                    key: b.key.clone(),
                    heading_text: b.heading_text.clone(),
                    content_slots: b.content_slots.len(),
                })
                .collect(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconciliationReport {
    pub strict_mode: bool,
    pub heading_mode_used: ClassificationMode,
    pub protected_headings: Vec<HeadingKey>,
    pub replaced: usize,
    pub missing_sections: Vec<String>,
    pub sections: Vec<ReconciliationOutcome>,
}

impl ReconciliationReport {
    pub fn new(
        config: &ReconcileConfig,
        mode_used: ClassificationMode,
        result: &ReconcileResult,
    ) -> Self {
        Self {
            strict_mode: config.mode == HeadingMode::Strict,
            heading_mode_used: mode_used,
            protected_headings: config.protected.keys().to_vec(),
            replaced: result.replaced,
            missing_sections: result.missing_sections.clone(),
            sections: result.outcomes.clone(),
        }
    }
}

pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), Error> {
    let json = serde_json::to_string_pretty(value)?;
    std::fs::write(path, json)?;
    Ok(())
}
