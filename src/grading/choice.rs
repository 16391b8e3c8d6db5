// src/grading/choice.rs

use serde::{Deserialize, Serialize};
use std::fmt;

/// One answer alternative from the fixed alphabet.
///
/// Every boundary (manual entry, sheet extraction, answer-key creation) parses
/// into this enum, so malformed letters cannot travel further into the
/// pipeline. Serializes as its uppercase letter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Choice {
    A,
    B,
    C,
    D,
    E,
}

impl Choice {
    /// Case-insensitive parse of a single letter. Returns `None` for anything
    /// outside the alphabet; the caller decides which error kind that is
    /// (bad request at an input boundary, data integrity for a stored key).
    pub fn parse(s: &str) -> Option<Self> {
        let mut chars = s.trim().chars();
        let letter = chars.next()?;
        if chars.next().is_some() {
            return None;
        }
        Self::from_letter(letter)
    }

    pub fn from_letter(letter: char) -> Option<Self> {
        match letter.to_ascii_uppercase() {
            'A' => Some(Choice::A),
            'B' => Some(Choice::B),
            'C' => Some(Choice::C),
            'D' => Some(Choice::D),
            'E' => Some(Choice::E),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Choice::A => "A",
            Choice::B => "B",
            Choice::C => "C",
            Choice::D => "D",
            Choice::E => "E",
        }
    }
}

impl fmt::Display for Choice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
