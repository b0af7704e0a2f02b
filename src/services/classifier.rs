//! Page classification service.
//!
//! Decides what a region home page links to by matching the visible text of
//! its hyperlinks against a table of language patterns.

use regex::{Regex, RegexBuilder};
use scraper::Selector;

use crate::error::Result;
use crate::models::{Anchor, Page, PatternKind, parse_selector};

/// An anchor whose text matched a pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub pattern: PatternKind,
    pub anchor: Anchor,
}

/// Matches anchor text against a fixed set of patterns.
pub struct PageClassifier {
    patterns: Vec<(PatternKind, Regex)>,
    anchors: Selector,
}

impl PageClassifier {
    /// Compile the pattern table. Matching ignores case.
    pub fn new(patterns: &[(PatternKind, String)]) -> Result<Self> {
        let patterns = patterns
            .iter()
            .map(|(kind, pattern)| {
                let regex = RegexBuilder::new(pattern).case_insensitive(true).build()?;
                Ok((*kind, regex))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            patterns,
            anchors: parse_selector("a")?,
        })
    }

    /// Every (pattern, anchor) match on the page, in document order.
    ///
    /// An anchor may match several patterns and a pattern may match several
    /// anchors; all matches are reported.
    pub fn classify(&self, page: &Page) -> Vec<Classification> {
        let mut found = Vec::new();
        for anchor in page.anchors(&self.anchors) {
            log::trace!("anchor text: {:?}", anchor.text);
            for (kind, regex) in &self.patterns {
                if regex.is_match(&anchor.text) {
                    found.push(Classification {
                        pattern: *kind,
                        anchor: anchor.clone(),
                    });
                }
            }
        }
        found
    }

    /// Patterns with no match among `found`, in table order.
    pub fn missing(&self, found: &[Classification]) -> Vec<PatternKind> {
        self.patterns
            .iter()
            .map(|(kind, _)| *kind)
            .filter(|kind| !found.iter().any(|c| c.pattern == *kind))
            .collect()
    }
}
