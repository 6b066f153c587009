use crate::parsing::classify::{is_newline, is_whitespace};

/// Bounded searches across short runs of blank text.
///
/// Every lookup gives up after `max` blank characters, so the wrapper pass
/// stays linear however the text is shaped.
#[derive(Debug, Clone, Copy)]
pub struct Gap<'a> {
    text: &'a str,
    max: usize,
}

impl<'a> Gap<'a> {
    pub fn new(text: &'a str, max: usize) -> Self {
        Self { text, max }
    }

    /// Walks backward from byte `from` (exclusive) over whitespace and line
    /// breaks, returning the offset of `target` if it comes first.
    pub fn find_back(&self, from: usize, target: char) -> Option<usize> {
        let mut skipped = 0;
        for (i, c) in self.text.get(..from)?.char_indices().rev() {
            if c == target {
                return Some(i);
            }
            if !(is_whitespace(c) || is_newline(c)) {
                return None;
            }
            skipped += 1;
            if skipped > self.max {
                return None;
            }
        }
        None
    }

    /// Walks forward from byte `from` over spaces and tabs, returning the
    /// offset where `target` starts. A line break ends the search.
    pub fn find_forward(&self, from: usize, target: &str) -> Option<usize> {
        if target.is_empty() {
            return None;
        }
        let rest = self.text.get(from..)?;
        let mut skipped = 0;
        for (i, c) in rest.char_indices() {
            if rest[i..].starts_with(target) {
                return Some(from + i);
            }
            if !is_whitespace(c) {
                return None;
            }
            skipped += 1;
            if skipped > self.max {
                return None;
            }
        }
        None
    }

    /// Whether `text[from..to]` is at most `max` characters of whitespace and
    /// line breaks.
    pub fn is_blank(&self, from: usize, to: usize) -> bool {
        match self.text.get(from..to) {
            Some(s) => {
                s.chars().all(|c| is_whitespace(c) || is_newline(c)) && s.chars().count() <= self.max
            }
            None => false,
        }
    }
}
