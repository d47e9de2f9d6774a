mod common;

use common::{list_para, para};
use docx_reconcile::classify::{classify, classify_all, heuristic_heading};
use docx_reconcile::{ClassificationMode, HeadingMode, StructuralParagraph};
use proptest::prelude::*;

#[test]
fn strict_mode_uses_style_only() {
    assert!(classify("Summary", "Heading1", false, HeadingMode::Strict));
    assert!(classify("Jane Doe", "Title", false, HeadingMode::Strict));
    assert!(classify("Engineer", "mySubtitleStyle", false, HeadingMode::Strict));
    assert!(!classify("EXPERIENCE", "", false, HeadingMode::Strict));
    assert!(!classify("EXPERIENCE", "Normal", false, HeadingMode::Strict));
}

#[test]
fn empty_text_is_never_a_heading() {
    assert!(!classify("", "Heading1", false, HeadingMode::Strict));
    assert!(!classify("   ", "Heading1", false, HeadingMode::Heuristic));
}

#[test]
fn heuristic_mode_accepts_styles_or_caps() {
    assert!(classify("Summary", "Heading2", false, HeadingMode::Heuristic));
    assert!(classify("WORK HISTORY", "", false, HeadingMode::Heuristic));
    assert!(!classify("Work history", "", false, HeadingMode::Heuristic));
}

#[test]
fn heuristic_rejects_long_or_punctuated_lines() {
    assert!(heuristic_heading("TECHNICAL SKILLS", false));
    assert!(heuristic_heading("C++ / C# 2024", false));
    assert!(!heuristic_heading("NOTE: READ THIS", false));
    assert!(!heuristic_heading("ONE TWO THREE FOUR FIVE SIX SEVEN", false));
    assert!(!heuristic_heading(&"A".repeat(46), false));
    assert!(heuristic_heading(&"A".repeat(45), false));
    assert!(!heuristic_heading("2019 - 2024", false));
    assert!(!heuristic_heading("DONE!", false));
}

#[test]
fn fallback_reclassifies_unstyled_document() {
    let paragraphs = vec![
        para(0, "EXPERIENCE", ""),
        para(1, "Managed a team of five engineers.", ""),
    ];
    let c = classify_all(&paragraphs, HeadingMode::Strict);
    assert_eq!(c.mode_used, ClassificationMode::StrictFallbackHeuristic);
    assert_eq!(c.headings, vec![true, false]);
}

#[test]
fn fallback_replaces_the_strict_result_entirely() {
    // One styled heading is below the threshold; the heuristic alone then
    // rejects the mixed-case styled paragraph.
    let paragraphs = vec![
        para(0, "Summary", "Heading1"),
        para(1, "Some text here.", ""),
        para(2, "EDUCATION", ""),
    ];
    let c = classify_all(&paragraphs, HeadingMode::Strict);
    assert_eq!(c.mode_used, ClassificationMode::StrictFallbackHeuristic);
    assert_eq!(c.headings, vec![false, false, true]);
}

#[test]
fn two_styled_headings_keep_strict_result() {
    let paragraphs = vec![
        para(0, "Summary", "Heading1"),
        para(1, "ALL CAPS BODY LINE", ""),
        para(2, "Education", "Heading1"),
    ];
    let c = classify_all(&paragraphs, HeadingMode::Strict);
    assert_eq!(c.mode_used, ClassificationMode::StrictStyle);
    assert_eq!(c.headings, vec![true, false, true]);
    assert_eq!(c.heading_count(), 2);
}

#[test]
fn heuristic_mode_never_reports_fallback() {
    let paragraphs = vec![para(0, "plain", "")];
    let c = classify_all(&paragraphs, HeadingMode::Heuristic);
    assert_eq!(c.mode_used, ClassificationMode::Heuristic);
    assert_eq!(c.headings, vec![false]);
}

#[test]
fn list_items_are_not_headings_even_after_fallback() {
    let paragraphs = vec![list_para(0, "SKILLS"), para(1, "SKILLS", "")];
    let c = classify_all(&paragraphs, HeadingMode::Strict);
    assert_eq!(c.headings, vec![false, true]);
}

fn paragraph_strategy() -> impl Strategy<Value = (String, String, bool)> {
    (
        prop::sample::select(vec!["SUMMARY", "Summary", "", "Did things.", "EDUCATION", "x"]),
        prop::sample::select(vec!["", "Heading1", "Title", "Normal", "ListParagraph"]),
        any::<bool>(),
    )
        .prop_map(|(t, s, l)| (t.to_string(), s.to_string(), l))
}

proptest! {
    #[test]
    fn list_marker_implies_not_heading(
        raw in prop::collection::vec(paragraph_strategy(), 0..20),
        heuristic in any::<bool>(),
    ) {
        let paragraphs: Vec<StructuralParagraph> = raw
            .iter()
            .enumerate()
            .map(|(i, (t, s, l))| StructuralParagraph::new(i, t, s, *l))
            .collect();
        let mode = if heuristic { HeadingMode::Heuristic } else { HeadingMode::Strict };
        let c = classify_all(&paragraphs, mode);
        prop_assert_eq!(c.headings.len(), paragraphs.len());
        for p in &paragraphs {
            if p.has_list_marker {
                prop_assert!(!c.is_heading(p.index));
            }
        }
    }

    #[test]
    fn fallback_triggers_iff_fewer_than_two_styled_headings(
        raw in prop::collection::vec(paragraph_strategy(), 0..20),
    ) {
        let paragraphs: Vec<StructuralParagraph> = raw
            .iter()
            .enumerate()
            .map(|(i, (t, s, l))| StructuralParagraph::new(i, t, s, *l))
            .collect();
        let styled = paragraphs
            .iter()
            .filter(|p| classify(&p.text, &p.style_id, p.has_list_marker, HeadingMode::Strict))
            .count();
        let c = classify_all(&paragraphs, HeadingMode::Strict);
        if styled < 2 {
            prop_assert_eq!(c.mode_used, ClassificationMode::StrictFallbackHeuristic);
            for p in &paragraphs {
                prop_assert_eq!(c.is_heading(p.index), heuristic_heading(&p.text, p.has_list_marker));
            }
        } else {
            prop_assert_eq!(c.mode_used, ClassificationMode::StrictStyle);
        }
    }
}
