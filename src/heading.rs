//! The active heading hierarchy.

use serde::{Deserialize, Serialize};

/// Chapter name used before any heading has been seen.
pub const INTRODUCTION: &str = "Introduction";

/// Heading level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum HeadingLevel {
    /// Level 1.
    H1,
    /// Level 2.
    H2,
    /// Level 3.
    H3,
}

/// The current `(h1, h2, h3)` triple.
///
/// Setting a level clears every level below it:
///
/// ```rust
/// use parachunk::{HeadingLevel, HeadingPath};
///
/// let mut path = HeadingPath::default();
/// assert_eq!(path.chapter_name(), "Introduction");
///
/// path.enter(HeadingLevel::H1, "Part One");
/// path.enter(HeadingLevel::H2, "Chapter 1");
/// path.enter(HeadingLevel::H3, "Scene 1");
/// assert_eq!(path.chapter_name(), "Part One | Chapter 1 | Scene 1");
///
/// path.enter(HeadingLevel::H1, "Part Two");
/// assert_eq!(path.h2(), None);
/// assert_eq!(path.h3(), None);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeadingPath {
    h1: Option<String>,
    h2: Option<String>,
    h3: Option<String>,
}

impl HeadingPath {
    /// Record a heading at `level`.
    pub fn enter(&mut self, level: HeadingLevel, text: &str) {
        let text = Some(text.to_string());
        match level {
            HeadingLevel::H1 => {
                self.h1 = text;
                self.h2 = None;
                self.h3 = None;
            }
            HeadingLevel::H2 => {
                self.h2 = text;
                self.h3 = None;
            }
            HeadingLevel::H3 => self.h3 = text,
        }
    }

    /// Current level-1 heading.
    #[must_use]
    pub fn h1(&self) -> Option<&str> {
        self.h1.as_deref()
    }

    /// Current level-2 heading.
    #[must_use]
    pub fn h2(&self) -> Option<&str> {
        self.h2.as_deref()
    }

    /// Current level-3 heading.
    #[must_use]
    pub fn h3(&self) -> Option<&str> {
        self.h3.as_deref()
    }

    /// Set levels joined by `" | "`, or `"Introduction"` if none are set.
    #[must_use]
    pub fn chapter_name(&self) -> String {
        let parts: Vec<&str> = [self.h1(), self.h2(), self.h3()]
            .into_iter()
            .flatten()
            .filter(|s| !s.is_empty())
            .collect();
        if parts.is_empty() {
            INTRODUCTION.to_string()
        } else {
            parts.join(" | ")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_h2_clears_h3_only() {
        let mut p = HeadingPath::default();
        p.enter(HeadingLevel::H1, "A");
        p.enter(HeadingLevel::H2, "B");
        p.enter(HeadingLevel::H3, "C");
        p.enter(HeadingLevel::H2, "D");
        assert_eq!(p.h1(), Some("A"));
        assert_eq!(p.h2(), Some("D"));
        assert_eq!(p.h3(), None);
    }

    #[test]
    fn test_h3_keeps_parents() {
        let mut p = HeadingPath::default();
        p.enter(HeadingLevel::H1, "A");
        p.enter(HeadingLevel::H3, "C");
        assert_eq!(p.chapter_name(), "A | C");
    }

    #[test]
    fn test_h3_without_h1() {
        let mut p = HeadingPath::default();
        p.enter(HeadingLevel::H3, "Only");
        assert_eq!(p.h1(), None);
        assert_eq!(p.chapter_name(), "Only");
    }
}
