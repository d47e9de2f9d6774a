use crate::classify::Classification;
use crate::model::{HeadingKey, SectionBlock, StructuralParagraph};

/// Partition the paragraph sequence into heading-anchored blocks.
///
/// Blank paragraphs are skipped: they never become content slots. The block
/// before the first heading uses the root key and is always emitted, even
/// when empty.
pub fn build_blocks(
    paragraphs: &[StructuralParagraph],
    classification: &Classification,
) -> Vec<SectionBlock> {
    let mut blocks = Vec::new();
    let mut current = SectionBlock::root();

    for p in paragraphs {
        if classification.is_heading(p.index) {
            blocks.push(std::mem::replace(
                &mut current,
                SectionBlock {
                    key: HeadingKey::from_heading(&p.text),
                    heading_index: Some(p.index),
                    heading_text: p.text.clone(),
                    content_slots: Vec::new(),
                },
            ));
            continue;
        }
        if !p.text.trim().is_empty() {
            current.content_slots.push(p.index);
        }
    }
    blocks.push(current);

    for block in &blocks {
        log::debug!(
            "Block '{}' (heading {:?}): {} content slot(s)",
            block.key,
            block.heading_index,
            block.content_slots.len()
        );
    }
    blocks
}
