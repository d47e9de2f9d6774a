use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::Error;

const ROOT_KEY: &str = "__root__";

/// One `w:p` from the document body, in document order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StructuralParagraph {
    pub index: usize,
    pub text: String,
    pub style_id: String,
    pub has_list_marker: bool,
}

impl StructuralParagraph {
    pub fn new(index: usize, text: &str, style_id: &str, has_list_marker: bool) -> Self {
        Self {
            index,
            text: text.trim().to_string(),
            style_id: style_id.to_string(),
            has_list_marker,
        }
    }
}

/// Lower-case, collapse every run of characters outside `[a-z0-9]` to a
/// single space, trim.
pub fn normalize_heading(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut pending_space = false;
    for c in text.to_lowercase().chars() {
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            if pending_space && !out.is_empty() {
                out.push(' ');
            }
            pending_space = false;
            out.push(c);
        } else {
            pending_space = true;
        }
    }
    out
}

/// Join key between a document heading and a markdown section.
///
/// Real keys only ever contain `[a-z0-9 ]`, so the reserved root key
/// `__root__` can never collide with a heading.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct HeadingKey(String);

impl HeadingKey {
    pub fn root() -> Self {
        HeadingKey(ROOT_KEY.to_string())
    }

    pub fn from_heading(text: &str) -> Self {
        let normalized = normalize_heading(text);
        if normalized.is_empty() {
            Self::root()
        } else {
            HeadingKey(normalized)
        }
    }

    pub fn is_root(&self) -> bool {
        self.0 == ROOT_KEY
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for HeadingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Requested heading detection mode.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum HeadingMode {
    #[default]
    Strict,
    Heuristic,
}

impl FromStr for HeadingMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "strict" | "true" => Ok(HeadingMode::Strict),
            "heuristic" | "false" => Ok(HeadingMode::Heuristic),
            other => Err(Error::Config(format!(
                "unknown heading mode '{other}' (expected 'strict' or 'heuristic')"
            ))),
        }
    }
}

/// Detection mode that actually produced the classification.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ClassificationMode {
    StrictStyle,
    Heuristic,
    StrictFallbackHeuristic,
}

/// Heading keys whose sections must never be rewritten. Keeps insertion order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ProtectedHeadings(Vec<HeadingKey>);

impl ProtectedHeadings {
    /// Parse a `|`-separated list of already-normalized heading keys.
    pub fn parse(list: &str) -> Result<Self, Error> {
        let mut keys = Vec::new();
        for entry in list.split('|').map(str::trim).filter(|e| !e.is_empty()) {
            let normalized = normalize_heading(entry);
            if normalized != entry {
                return Err(Error::Config(format!(
                    "protected heading '{entry}' is not a normalized key (expected '{normalized}')"
                )));
            }
            let key = HeadingKey(normalized);
            if !keys.contains(&key) {
                keys.push(key);
            }
        }
        Ok(Self(keys))
    }

    pub fn contains(&self, key: &HeadingKey) -> bool {
        self.0.contains(key)
    }

    pub fn keys(&self) -> &[HeadingKey] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[derive(Clone, Debug, Default)]
pub struct ReconcileConfig {
    pub mode: HeadingMode,
    pub protected: ProtectedHeadings,
}

impl ReconcileConfig {
    /// Build from raw string settings, e.g. CLI flags or environment variables.
    pub fn from_settings(mode: Option<&str>, protected: Option<&str>) -> Result<Self, Error> {
        let mode = match mode {
            Some(m) => m.parse()?,
            None => HeadingMode::default(),
        };
        let protected = match protected {
            Some(p) => ProtectedHeadings::parse(p)?,
            None => ProtectedHeadings::default(),
        };
        Ok(Self { mode, protected })
    }
}

/// A run of paragraphs anchored by one heading (or by the start of the body).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SectionBlock {
    pub key: HeadingKey,
    pub heading_index: Option<usize>,
    pub heading_text: String,
    pub content_slots: Vec<usize>,
}

impl SectionBlock {
    pub(crate) fn root() -> Self {
        Self {
            key: HeadingKey::root(),
            heading_index: None,
            heading_text: String::new(),
            content_slots: Vec::new(),
        }
    }
}
