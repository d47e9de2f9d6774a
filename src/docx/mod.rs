mod rewrite;

use std::io::{Cursor, Read};
use std::ops::Range;
use std::path::Path;

use crate::error::Error;
use crate::model::StructuralParagraph;

pub(crate) const WML_NS: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";
const XML_NS: &str = "http://www.w3.org/XML/1998/namespace";
pub(crate) const DOCUMENT_PART: &str = "word/document.xml";

pub(crate) fn is_wml(node: roxmltree::Node, name: &str) -> bool {
    node.tag_name().name() == name && node.tag_name().namespace() == Some(WML_NS)
}

pub(crate) fn wml<'a>(node: roxmltree::Node<'a, 'a>, name: &str) -> Option<roxmltree::Node<'a, 'a>> {
    node.children().find(|n| is_wml(*n, name))
}

pub(crate) fn wml_attr<'a>(node: roxmltree::Node<'a, 'a>, child: &str) -> Option<&'a str> {
    wml(node, child).and_then(|n| n.attribute((WML_NS, "val")))
}

/// Where a `w:t` element's text lives in the raw `document.xml`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum TextSlot {
    /// Byte range of the element's content (empty for `<w:t></w:t>`). The
    /// start tag's `>` sits at `range.start - 1`.
    Content { range: Range<usize>, preserve: bool },
    /// `<w:t/>`: the whole element must be rewritten to receive text.
    SelfClosing { element: Range<usize>, qname: String },
}

/// A source DOCX held in memory: the original archive, its raw
/// `document.xml`, and the paragraph sequence extracted from it.
pub struct DocxSource {
    archive: Vec<u8>,
    document_xml: String,
    paragraphs: Vec<StructuralParagraph>,
    text_slots: Vec<Vec<TextSlot>>,
}

impl DocxSource {
    pub fn paragraphs(&self) -> &[StructuralParagraph] {
        &self.paragraphs
    }

    pub fn document_xml(&self) -> &str {
        &self.document_xml
    }
}

fn collect_block_nodes<'a>(parent: roxmltree::Node<'a, 'a>) -> Vec<roxmltree::Node<'a, 'a>> {
    let mut nodes = Vec::new();
    for child in parent.children() {
        if is_wml(child, "sdt") {
            if let Some(content) = wml(child, "sdtContent") {
                nodes.extend(collect_block_nodes(content));
            }
        } else {
            nodes.push(child);
        }
    }
    nodes
}

fn text_slot(xml: &str, node: roxmltree::Node) -> TextSlot {
    let preserve = node.attribute((XML_NS, "space")) == Some("preserve");
    if let (Some(first), Some(last)) = (node.first_child(), node.last_child()) {
        return TextSlot::Content {
            range: first.range().start..last.range().end,
            preserve,
        };
    }
    let element = node.range();
    let raw = &xml[element.clone()];
    if raw.ends_with("/>") {
        let qname = raw[1..]
            .split(|c: char| c.is_whitespace() || c == '/' || c == '>')
            .next()
            .unwrap_or("w:t")
            .to_string();
        return TextSlot::SelfClosing { element, qname };
    }
    let close = raw.rfind("</").map_or(element.end, |i| element.start + i);
    TextSlot::Content {
        range: close..close,
        preserve,
    }
}

fn read_zip_text<R: Read + std::io::Seek>(
    zip: &mut zip::ZipArchive<R>,
    name: &str,
) -> Result<String, Error> {
    let mut content = String::new();
    zip.by_name(name)
        .map_err(|_| Error::InvalidDocx(format!("missing {name} (is this a DOCX file?)")))?
        .read_to_string(&mut content)
        .map_err(|e| Error::MalformedInput(format!("{name} is not valid UTF-8 text: {e}")))?;
    Ok(content)
}

pub fn parse(path: &Path) -> Result<DocxSource, Error> {
    let bytes = std::fs::read(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound | std::io::ErrorKind::PermissionDenied => Error::Io(
            std::io::Error::new(e.kind(), format!("{}: {}", e, path.display())),
        ),
        _ => Error::Io(e),
    })?;
    parse_bytes(bytes)
}

pub fn parse_bytes(archive: Vec<u8>) -> Result<DocxSource, Error> {
    let mut zip = zip::ZipArchive::new(Cursor::new(archive.as_slice()))
        .map_err(|_| Error::InvalidDocx("file is not a ZIP archive".into()))?;
    let document_xml = read_zip_text(&mut zip, DOCUMENT_PART)?;
    drop(zip);

    let (paragraphs, text_slots) = {
        let xml = roxmltree::Document::parse(&document_xml)?;
        let body = wml(xml.root_element(), "body")
            .ok_or_else(|| Error::InvalidDocx("missing w:body".into()))?;

        let mut paragraphs = Vec::new();
        let mut text_slots = Vec::new();
        for node in collect_block_nodes(body)
            .into_iter()
            .filter(|n| is_wml(*n, "p"))
        {
            let texts: Vec<_> = node.descendants().filter(|n| is_wml(*n, "t")).collect();
            let text: String = texts.iter().filter_map(|t| t.text()).collect();
            let ppr = wml(node, "pPr");
            let style_id = ppr.and_then(|ppr| wml_attr(ppr, "pStyle")).unwrap_or("");
            let has_list = ppr.and_then(|ppr| wml(ppr, "numPr")).is_some();

            paragraphs.push(StructuralParagraph::new(
                paragraphs.len(),
                &text,
                style_id,
                has_list,
            ));
            text_slots.push(texts.iter().map(|t| text_slot(&document_xml, *t)).collect());
        }
        (paragraphs, text_slots)
    };

    log::info!(
        "Read {} body paragraph(s) from {DOCUMENT_PART}",
        paragraphs.len()
    );

    Ok(DocxSource {
        archive,
        document_xml,
        paragraphs,
        text_slots,
    })
}
