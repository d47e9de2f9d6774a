use crate::model::{ClassificationMode, HeadingMode, StructuralParagraph};

/// Below this many style-tagged headings, strict mode falls back to the heuristic.
const MIN_STYLED_HEADINGS: usize = 2;
const MAX_HEADING_CHARS: usize = 45;
const MAX_HEADING_WORDS: usize = 6;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Classification {
    /// `headings[i]` is true when paragraph `i` is a section heading.
    pub headings: Vec<bool>,
    pub mode_used: ClassificationMode,
}

impl Classification {
    pub fn is_heading(&self, index: usize) -> bool {
        self.headings.get(index).copied().unwrap_or(false)
    }

    pub fn heading_count(&self) -> usize {
        self.headings.iter().filter(|h| **h).count()
    }
}

fn has_heading_style(style_id: &str) -> bool {
    let style = style_id.to_ascii_lowercase();
    ["heading", "title", "subtitle"]
        .iter()
        .any(|needle| style.contains(needle))
}

/// Short all-caps line without sentence punctuation, e.g. "WORK EXPERIENCE".
pub fn heuristic_heading(text: &str, has_list_marker: bool) -> bool {
    let t = text.trim();
    if t.is_empty() || has_list_marker {
        return false;
    }
    let letters: Vec<char> = t.chars().filter(|c| c.is_ascii_alphabetic()).collect();
    let all_caps = !letters.is_empty() && letters.iter().all(|c| c.is_ascii_uppercase());
    let short = t.chars().count() <= MAX_HEADING_CHARS
        && t.split_whitespace().count() <= MAX_HEADING_WORDS;
    let no_sentence_punct = !t.contains(['.', ':', ';', '!', '?']);
    all_caps && short && no_sentence_punct
}

pub fn classify(text: &str, style_id: &str, has_list_marker: bool, mode: HeadingMode) -> bool {
    let t = text.trim();
    if t.is_empty() || has_list_marker {
        return false;
    }
    match mode {
        HeadingMode::Strict => has_heading_style(style_id),
        HeadingMode::Heuristic => has_heading_style(style_id) || heuristic_heading(t, false),
    }
}

/// Classify the whole sequence. In strict mode a document with fewer than two
/// styled headings is reclassified from scratch with the heuristic alone.
pub fn classify_all(paragraphs: &[StructuralParagraph], mode: HeadingMode) -> Classification {
    let headings: Vec<bool> = paragraphs
        .iter()
        .map(|p| classify(&p.text, &p.style_id, p.has_list_marker, mode))
        .collect();

    if mode == HeadingMode::Heuristic {
        return Classification {
            headings,
            mode_used: ClassificationMode::Heuristic,
        };
    }

    let styled = headings.iter().filter(|h| **h).count();
    if styled >= MIN_STYLED_HEADINGS {
        return Classification {
            headings,
            mode_used: ClassificationMode::StrictStyle,
        };
    }

    log::warn!(
        "Strict style detection found {styled} heading(s); falling back to all-caps heuristic"
    );
    Classification {
        headings: paragraphs
            .iter()
            .map(|p| heuristic_heading(&p.text, p.has_list_marker))
            .collect(),
        mode_used: ClassificationMode::StrictFallbackHeuristic,
    }
}
