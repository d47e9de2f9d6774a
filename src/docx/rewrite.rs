use std::io::{Cursor, Write};
use std::ops::Range;

use zip::CompressionMethod;
use zip::write::SimpleFileOptions;

use super::{DOCUMENT_PART, DocxSource, TextSlot};
use crate::error::Error;
use crate::reconcile::EditSet;

/// XML 1.0 `Char` production; Rust `char` already excludes surrogates.
fn is_xml_char(c: char) -> bool {
    matches!(c, '\t' | '\n' | '\r') || (c >= ' ' && c != '\u{FFFE}' && c != '\u{FFFF}')
}

fn escape_xml_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}

/// Edge or repeated whitespace is only kept by consumers under `xml:space="preserve"`.
fn needs_preserve(text: &str) -> bool {
    text.starts_with(char::is_whitespace)
        || text.ends_with(char::is_whitespace)
        || text.contains("  ")
}

fn fill_slot(xml: &str, slot: &TextSlot, text: &str, splices: &mut Vec<(Range<usize>, String)>) {
    let preserve_attr = needs_preserve(text);
    match slot {
        TextSlot::Content { range, preserve } => {
            if preserve_attr && !preserve {
                let tag_end = range.start - 1;
                splices.push((tag_end..tag_end, r#" xml:space="preserve""#.to_string()));
            }
            splices.push((range.clone(), escape_xml_text(text)));
        }
        TextSlot::SelfClosing { element, qname } => {
            let open = xml[element.start..element.end - 2].trim_end();
            let attr = if preserve_attr && !open.contains("xml:space") {
                r#" xml:space="preserve""#
            } else {
                ""
            };
            splices.push((
                element.clone(),
                format!("{open}{attr}>{}</{qname}>", escape_xml_text(text)),
            ));
        }
    }
}

impl DocxSource {
    /// Rewrite `document.xml` in place: the first text run of each edited
    /// paragraph gets the new text, later runs are emptied. Bytes outside the
    /// touched runs are copied unchanged.
    pub fn rewrite_document_xml(&self, edits: &EditSet) -> Result<String, Error> {
        let xml = self.document_xml.as_str();
        let mut splices: Vec<(Range<usize>, String)> = Vec::new();

        for (&index, text) in edits {
            let slots = self.text_slots.get(index).ok_or_else(|| {
                Error::MalformedInput(format!(
                    "edit targets paragraph {index}, document has {}",
                    self.paragraphs.len()
                ))
            })?;
            let Some((first, rest)) = slots.split_first() else {
                return Err(Error::MalformedInput(format!(
                    "paragraph {index} has no text run to receive replacement text"
                )));
            };
            if let Some(bad) = text.chars().find(|c| !is_xml_char(*c)) {
                return Err(Error::MalformedInput(format!(
                    "replacement text for paragraph {index} contains U+{:04X}, which XML cannot carry",
                    bad as u32
                )));
            }
            fill_slot(xml, first, text, &mut splices);
            for slot in rest {
                if let TextSlot::Content { range, .. } = slot {
                    if !range.is_empty() {
                        splices.push((range.clone(), String::new()));
                    }
                }
            }
        }

        splices.sort_by_key(|(range, _)| range.start);
        let mut out = String::with_capacity(xml.len());
        let mut pos = 0;
        for (range, replacement) in splices {
            out.push_str(&xml[pos..range.start]);
            out.push_str(&replacement);
            pos = range.end;
        }
        out.push_str(&xml[pos..]);
        Ok(out)
    }

    /// Produce the rewritten DOCX. Every part except `document.xml` is copied raw.
    pub fn apply_edits(&self, edits: &EditSet) -> Result<Vec<u8>, Error> {
        let document_xml = self.rewrite_document_xml(edits)?;

        let mut archive = zip::ZipArchive::new(Cursor::new(self.archive.as_slice()))?;
        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

        for i in 0..archive.len() {
            let file = archive.by_index_raw(i)?;
            if file.name() == DOCUMENT_PART {
                drop(file);
                writer.start_file(DOCUMENT_PART, options)?;
                writer.write_all(document_xml.as_bytes())?;
            } else {
                writer.raw_copy_file(file)?;
            }
        }

        let bytes = writer.finish()?.into_inner();
        log::debug!(
            "Rewrote {} paragraph(s); output archive {} bytes",
            edits.len(),
            bytes.len()
        );
        Ok(bytes)
    }
}
