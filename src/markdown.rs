use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;

use crate::model::HeadingKey;

static HEADING_MARKER_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^#{1,6}(\s+|$)").unwrap());
static BULLET_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[-*+]\s+").unwrap());
static ORDINAL_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d+[.)]\s+").unwrap());
static BOLD_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\*\*(.*?)\*\*").unwrap());
static CODE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"`([^`]+)`").unwrap());

/// Section lines keyed by heading, in first-seen order. The root key is
/// always present.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MarkdownSectionMap {
    sections: Vec<(HeadingKey, Vec<String>)>,
    positions: HashMap<HeadingKey, usize>,
}

impl Default for MarkdownSectionMap {
    fn default() -> Self {
        let mut map = Self {
            sections: Vec::new(),
            positions: HashMap::new(),
        };
        map.entry(HeadingKey::root());
        map
    }
}

impl MarkdownSectionMap {
    fn entry(&mut self, key: HeadingKey) -> &mut Vec<String> {
        let pos = match self.positions.get(&key) {
            Some(&pos) => pos,
            None => {
                self.positions.insert(key.clone(), self.sections.len());
                self.sections.push((key, Vec::new()));
                self.sections.len() - 1
            }
        };
        &mut self.sections[pos].1
    }

    /// Lines for `key`, or `None` when the markdown never declared that heading.
    pub fn get(&self, key: &HeadingKey) -> Option<&[String]> {
        self.positions
            .get(key)
            .map(|&pos| self.sections[pos].1.as_slice())
    }

    pub fn contains_key(&self, key: &HeadingKey) -> bool {
        self.positions.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &HeadingKey> {
        self.sections.iter().map(|(k, _)| k)
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }
}

/// Strip heading markers, list bullets, ordinals, bold and inline code.
pub fn clean_line(line: &str) -> String {
    let line = HEADING_MARKER_RE.replace(line, "");
    let line = BULLET_RE.replace(&line, "");
    let line = ORDINAL_RE.replace(&line, "");
    let line = BOLD_RE.replace_all(&line, "$1");
    let line = CODE_RE.replace_all(&line, "$1");
    line.trim().to_string()
}

pub fn parse(text: &str) -> MarkdownSectionMap {
    let mut map = MarkdownSectionMap::default();
    let mut current = HeadingKey::root();
    let mut in_fence = false;

    // `lines()` already strips a trailing `\r`
    for raw in text.lines() {
        let line = raw.trim();
        if line.starts_with("```") {
            in_fence = !in_fence;
            continue;
        }
        if in_fence || line.is_empty() {
            continue;
        }

        if HEADING_MARKER_RE.is_match(line) {
            current = HeadingKey::from_heading(&clean_line(line));
            map.entry(current.clone());
            continue;
        }

        let cleaned = clean_line(line);
        if !cleaned.is_empty() {
            map.entry(current.clone()).push(cleaned);
        }
    }

    log::debug!(
        "Parsed {} markdown section(s): {:?}",
        map.len(),
        map.keys().map(HeadingKey::as_str).collect::<Vec<_>>()
    );
    map
}
