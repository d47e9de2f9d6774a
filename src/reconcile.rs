use std::collections::{BTreeMap, HashMap};

use serde::Serialize;

use crate::markdown::MarkdownSectionMap;
use crate::model::{HeadingKey, ProtectedHeadings, SectionBlock};

/// Paragraph index → replacement text, for exactly the paragraphs that change.
pub type EditSet = BTreeMap<usize, String>;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconciliationOutcome {
    pub heading: String,
    pub key: HeadingKey,
    pub protected: bool,
    pub slots: usize,
    pub source_lines: usize,
    pub replaced: usize,
    pub overflow_dropped: usize,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ReconcileResult {
    pub edits: EditSet,
    pub outcomes: Vec<ReconciliationOutcome>,
    pub replaced: usize,
    /// Headings with no markdown section at all, de-duplicated, in document order.
    pub missing_sections: Vec<String>,
}

/// Zip each block's content slots with its markdown lines, position by
/// position. Lines are consumed through a per-key cursor, so a second block
/// with the same key picks up where the first one stopped.
pub fn reconcile(
    blocks: &[SectionBlock],
    markdown: &MarkdownSectionMap,
    protected: &ProtectedHeadings,
) -> ReconcileResult {
    let mut result = ReconcileResult::default();
    let mut cursors: HashMap<&HeadingKey, usize> = HashMap::new();

    for block in blocks {
        if !markdown.contains_key(&block.key) && !block.key.is_root() {
            let heading = if block.heading_text.is_empty() {
                block.key.to_string()
            } else {
                block.heading_text.clone()
            };
            log::warn!("No markdown section for heading '{heading}'; leaving it untouched");
            if !result.missing_sections.contains(&heading) {
                result.missing_sections.push(heading);
            }
        }

        let cursor = cursors.entry(&block.key).or_insert(0);
        let lines = markdown
            .get(&block.key)
            .map(|l| &l[(*cursor).min(l.len())..])
            .unwrap_or_default();
        let slots = block.content_slots.len();

        if protected.contains(&block.key) {
            log::debug!("Section '{}' is protected; {} line(s) dropped", block.key, lines.len());
            result.outcomes.push(ReconciliationOutcome {
                heading: block.heading_text.clone(),
                key: block.key.clone(),
                protected: true,
                slots,
                source_lines: lines.len(),
                replaced: 0,
                overflow_dropped: lines.len(),
            });
            continue;
        }

        let limit = slots.min(lines.len());
        for (&index, line) in block.content_slots.iter().zip(lines).take(limit) {
            result.edits.insert(index, line.clone());
        }
        *cursor += limit;
        result.replaced += limit;

        result.outcomes.push(ReconciliationOutcome {
            heading: block.heading_text.clone(),
            key: block.key.clone(),
            protected: false,
            slots,
            source_lines: lines.len(),
            replaced: limit,
            overflow_dropped: lines.len() - limit,
        });
    }

    result
}
