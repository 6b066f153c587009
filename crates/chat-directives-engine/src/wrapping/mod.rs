//! # Suggestion Wrappers
//!
//! A wrapper is a keyword followed by a bracketed group of directives:
//!
//! ```text
//! suggested: [/routine add title='Gym', /reminder set at=7]
//! ^wrapper_start                                          ^wrapper_end
//! ```
//!
//! Directives inside a wrapper are offered to the user instead of being run.
//! Detection is a second pass over the directives the scanner already found;
//! every lookup between a directive and the surrounding `keyword: [`, `,` or
//! `]` crosses at most a few blank characters (see [`Gap`]).

pub mod gap;

use serde::Serialize;

use crate::models::{Directive, Wrapper};
use crate::parsing::classify::{is_alphanumeric, is_newline};
use crate::parsing::span::Span;

pub use gap::Gap;

/// Default number of blank characters allowed between wrapper punctuation
/// and a directive.
pub const DEFAULT_MAX_GAP: usize = 5;

const OPEN: char = '[';
const CLOSE: &str = "]";
const COLON: char = ':';

/// Directives found inside one wrapper.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WrapperGroup {
    pub keyword: String,
    /// Indices into the directive list the group was detected on.
    pub task_indices: Vec<usize>,
    /// Offset of the keyword's first character.
    pub wrapper_start: usize,
    /// Offset of the closing `]`.
    pub wrapper_end: usize,
}

impl WrapperGroup {
    /// The whole `keyword: [...]` region, closing bracket included.
    pub fn span(&self) -> Span {
        Span::new(self.wrapper_start, self.wrapper_end + CLOSE.len())
    }
}

/// A wrapper whose opening was matched and that continues after a delimiter.
#[derive(Debug, Clone, Copy)]
struct OpenWrapper {
    wrapper_start: usize,
    /// Index of the wrapper's first directive.
    first: usize,
    after_delimiter: usize,
}

/// Finds the directives inside one kind of wrapper.
#[derive(Debug, Clone, Copy)]
pub struct WrapperDetector<'a> {
    text: &'a str,
    wrapper: &'a Wrapper,
    gap: Gap<'a>,
}

impl<'a> WrapperDetector<'a> {
    pub fn new(text: &'a str, wrapper: &'a Wrapper, max_gap: usize) -> Self {
        Self {
            text,
            wrapper,
            gap: Gap::new(text, max_gap),
        }
    }

    /// Groups `directives` by wrapper. Directives whose index is marked in
    /// `claimed` already belong to another wrapper and are skipped.
    pub fn detect(&self, directives: &[Directive], claimed: &[bool]) -> Vec<WrapperGroup> {
        let is_claimed = |i: usize| claimed.get(i).copied().unwrap_or(false);
        let mut groups = Vec::new();
        let mut open: Option<OpenWrapper> = None;
        let mut covered = 0;

        for (index, directive) in directives.iter().enumerate() {
            let slash = directive.removal_span().start;
            if is_claimed(index) || slash < covered {
                open = None;
                continue;
            }
            if self.crosses_line(directive) {
                open = None;
                continue;
            }

            let continued = open
                .take()
                .filter(|o| self.gap.is_blank(o.after_delimiter, slash))
                .map(|o| (o.wrapper_start, o.first));
            let Some((wrapper_start, first)) = continued
                .or_else(|| self.opening(directive).map(|start| (start, index)))
            else {
                continue;
            };

            if let Some(wrapper_end) = self.gap.find_forward(directive.end, CLOSE) {
                // a claimed or skipped directive resets `open`, so members are consecutive
                let task_indices = (first..=index).collect();
                groups.push(WrapperGroup {
                    keyword: self.wrapper.keyword.clone(),
                    task_indices,
                    wrapper_start,
                    wrapper_end,
                });
                covered = wrapper_end + CLOSE.len();
                continue;
            }

            // without a delimiter a wrapper holds exactly one directive
            if let Some(delimiter) = self.wrapper.delimiter.as_deref()
                && let Some(at) = self.gap.find_forward(directive.end, delimiter)
            {
                open = Some(OpenWrapper {
                    wrapper_start,
                    first,
                    after_delimiter: at + delimiter.len(),
                });
            }
        }

        groups
    }

    /// Matches `keyword: [` right before the directive's slash and returns
    /// the keyword's offset.
    fn opening(&self, directive: &Directive) -> Option<usize> {
        let keyword = self.wrapper.keyword.as_str();
        if keyword.is_empty() {
            return None;
        }

        let bracket = self.gap.find_back(directive.removal_span().start, OPEN)?;
        let colon = self.gap.find_back(bracket, COLON)?;
        let before = self.text.get(..colon)?;
        let start = colon.checked_sub(keyword.len())?;
        if !before.ends_with(keyword) {
            return None;
        }
        // the keyword must be a whole word
        if before[..start].chars().next_back().is_some_and(is_alphanumeric) {
            return None;
        }
        Some(start)
    }

    fn crosses_line(&self, directive: &Directive) -> bool {
        directive
            .source(self.text)
            .is_none_or(|s| s.chars().any(is_newline))
    }
}
