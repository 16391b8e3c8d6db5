// src/grading/sheet.rs

use std::sync::OnceLock;

use regex::Regex;

use super::choice::Choice;
use super::submission::Submission;

/// "12. C", "12-C", "12) c", "12 C" and plain "12C" style lines.
fn line_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^\s*(\d+)\s*[-.):]?\s*([A-Ea-e])\s*$").expect("sheet line pattern")
    })
}

/// Extracts question/choice pairs from text recognized off an answer sheet.
///
/// Line-oriented: a line either matches the pattern above or is skipped
/// silently (recognized sheets are full of headers, names and smudges).
/// Letters are normalized to uppercase; when the same question number appears
/// on several lines the last one wins. No bounds check against the test's
/// question count happens here - the operator reviews the extraction before
/// grading, and out-of-range pairs are rejected at that point.
///
/// An empty result means nothing was recognized at all; callers report that
/// as its own state instead of treating it like a normal partial extraction.
pub fn extract_answers(raw: &str) -> Submission {
    let pattern = line_pattern();
    let mut submission = Submission::new();

    for line in raw.lines() {
        let Some(captures) = pattern.captures(line) else {
            continue;
        };
        // Group 1 is all digits; a number too large for u32 is garbage input
        // and the line is dropped like any other non-match.
        let Ok(number) = captures[1].parse::<u32>() else {
            continue;
        };
        let Some(choice) = Choice::parse(&captures[2]) else {
            continue;
        };
        submission.insert(number, choice);
    }

    submission
}
