//! Rule-based field segmentation over the document's full text.
//!
//! The rules are tuned to one worksheet family and intentionally preserve
//! first-match/shortest-match behavior: documents with repeated "Story"-like
//! headers resolve to the first marker, ambiguity and all. Behavior parity
//! with the rule set is the contract here, not linguistic correctness.

use regex::Regex;

use crate::model::{HeaderFields, StorySection};

/// Applies the header, flow, and story rules to full text.
pub struct FieldSegmenter {
    name_re: Regex,
    date_re: Regex,
    story_re: Regex,
    flow_line_re: Regex,
}

impl FieldSegmenter {
    pub fn new() -> Self {
        Self {
            name_re: Regex::new(r"(?m)^Name\s+(\w+)").unwrap(),
            date_re: Regex::new(r"(?m)^Date\s+(\d{2}/\d{2}/\d{4})").unwrap(),
            // Lazy span from the first line-initial "Story" up to the next
            // "Capitalized Words:" section header or end of text.
            story_re: Regex::new(r"(?ms)^Story\s+(.*?)(?:\n[A-Z][a-zA-Z ]+:|\z)").unwrap(),
            flow_line_re: Regex::new(r"^[A-Z][a-z\s\-]+$").unwrap(),
        }
    }

    /// Extract the name and date header fields; either may be absent
    /// independently, and absence is `None`, never an empty string.
    pub fn header(&self, text: &str) -> HeaderFields {
        HeaderFields {
            name: self
                .name_re
                .captures(text)
                .map(|caps| caps[1].to_string()),
            date: self
                .date_re
                .captures(text)
                .map(|caps| caps[1].to_string()),
        }
    }

    /// Extract the flow step list between the "Mapping the Flow" marker and
    /// the "Story" marker.
    ///
    /// Returns `None` when the marker is never found or no phrase line was
    /// captured, so the section is absent from output rather than empty.
    pub fn flow(&self, text: &str) -> Option<Vec<String>> {
        let mut capture = false;
        let mut steps = Vec::new();

        for line in text.lines() {
            if !capture {
                if line.contains("Mapping the Flow") {
                    capture = true;
                }
                continue;
            }
            let trimmed = line.trim();
            if self.flow_line_re.is_match(trimmed) && !trimmed.starts_with("Story") {
                steps.push(trimmed.to_string());
            }
            if line.contains("Story") {
                break;
            }
        }

        if steps.is_empty() {
            None
        } else {
            Some(steps)
        }
    }

    /// Extract the story section: first non-empty line after the marker is
    /// the message, subsequent non-empty lines (bullets stripped) are the
    /// actions. `None` when no marker matched or the captured span is empty.
    pub fn story(&self, text: &str) -> Option<StorySection> {
        let caps = self.story_re.captures(text)?;
        let span = caps.get(1)?.as_str().trim();
        if span.is_empty() {
            return None;
        }

        let mut lines = span.lines().filter(|line| !line.trim().is_empty());
        let message = lines.next()?.trim().to_string();
        let actions = lines
            .map(|line| {
                line.trim_matches(|c: char| c == '•' || c.is_whitespace())
                    .to_string()
            })
            .collect();

        Some(StorySection { message, actions })
    }
}

impl Default for FieldSegmenter {
    fn default() -> Self {
        Self::new()
    }
}
