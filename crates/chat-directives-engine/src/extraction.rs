//! # Extraction Pipeline
//!
//! ```text
//! text ──▶ scan ──▶ resolve tasks ──▶ wrappers ──▶ validate ──▶ remove spans
//! ```
//!
//! Directives outside any wrapper are meant to run now; directives inside a
//! wrapper are only suggested. Both lists are validated the same way and
//! everything accepted is cut from the text.

use std::collections::BTreeMap;

use log::debug;
use serde::Serialize;

use crate::editing::remove_spans;
use crate::models::{Directive, PropertyValue, TaskCatalog, TaskId, Wrapper};
use crate::parsing::scan;
use crate::validate::Validator;
use crate::wrapping::{DEFAULT_MAX_GAP, WrapperDetector, WrapperGroup};

/// Tunables for one [`extract`] call.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractOptions {
    /// Wrappers to look for, in priority order.
    pub wrappers: Vec<Wrapper>,
    pub max_gap: usize,
    /// Validate every directive against this task instead of the task its
    /// command resolves to.
    pub mode: Option<TaskId>,
    /// Properties the caller already knows.
    pub existing: BTreeMap<String, PropertyValue>,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            wrappers: vec![Wrapper::suggested()],
            max_gap: DEFAULT_MAX_GAP,
            mode: None,
            existing: BTreeMap::new(),
        }
    }
}

impl ExtractOptions {
    #[must_use]
    pub fn with_wrappers(mut self, wrappers: Vec<Wrapper>) -> Self {
        self.wrappers = wrappers;
        self
    }

    #[must_use]
    pub fn with_max_gap(mut self, max_gap: usize) -> Self {
        self.max_gap = max_gap;
        self
    }

    #[must_use]
    pub fn with_mode(mut self, mode: impl Into<TaskId>) -> Self {
        self.mode = Some(mode.into());
        self
    }

    #[must_use]
    pub fn with_existing(mut self, name: impl Into<String>, value: PropertyValue) -> Self {
        self.existing.insert(name.into(), value);
        self
    }
}

/// Result of one [`extract`] call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Extraction {
    /// Accepted directives outside any wrapper.
    pub run: Vec<Directive>,
    /// Accepted directives inside a wrapper.
    pub suggested: Vec<Directive>,
    /// Wrappers with at least one accepted directive; `task_indices` point
    /// into `suggested`.
    pub wrappers: Vec<WrapperGroup>,
    /// The input with every accepted directive and wrapper removed.
    pub text: String,
}

impl Extraction {
    pub fn is_empty(&self) -> bool {
        self.run.is_empty() && self.suggested.is_empty()
    }
}

/// Finds, validates and removes the directives in `text`.
pub fn extract(text: &str, catalog: &impl TaskCatalog, options: &ExtractOptions) -> Extraction {
    let mut candidates = scan(text);
    for directive in &mut candidates {
        directive.task = catalog.resolve(&directive.command, directive.action.as_deref());
    }

    let mut claimed = vec![false; candidates.len()];
    let mut groups = Vec::new();
    for wrapper in &options.wrappers {
        let detector = WrapperDetector::new(text, wrapper, options.max_gap);
        let found = detector.detect(&candidates, &claimed);
        for group in &found {
            for &i in &group.task_indices {
                claimed[i] = true;
            }
        }
        groups.extend(found);
    }

    // candidate index → position in `run` or `suggested`
    let mut placed: Vec<Option<usize>> = vec![None; candidates.len()];
    let mut run = Vec::new();
    let mut suggested = Vec::new();
    for (index, candidate) in candidates.into_iter().enumerate() {
        let Some(directive) = accept(candidate, catalog, options) else {
            continue;
        };
        let list = if claimed[index] { &mut suggested } else { &mut run };
        placed[index] = Some(list.len());
        list.push(directive);
    }

    let wrappers: Vec<WrapperGroup> = groups
        .into_iter()
        .filter_map(|group| {
            let task_indices: Vec<usize> =
                group.task_indices.iter().filter_map(|&i| placed[i]).collect();
            (!task_indices.is_empty()).then_some(WrapperGroup {
                task_indices,
                ..group
            })
        })
        .collect();

    let spans = run
        .iter()
        .map(Directive::removal_span)
        .chain(wrappers.iter().map(WrapperGroup::span));
    let text = remove_spans(text, spans);

    Extraction {
        run,
        suggested,
        wrappers,
        text,
    }
}

/// Validates one candidate against the task it belongs to.
fn accept(
    candidate: Directive,
    catalog: &impl TaskCatalog,
    options: &ExtractOptions,
) -> Option<Directive> {
    let Some(task) = options.mode.clone().or_else(|| candidate.task.clone()) else {
        debug!("dropping /{}: no task handles it", candidate.command);
        return None;
    };
    let Some(config) = catalog.task_config(&task) else {
        debug!("dropping /{}: task {task} is not configured", candidate.command);
        return None;
    };

    let mut directive = Validator::new(config, &options.existing).validate(candidate)?;
    directive.task = catalog
        .resolve(&directive.command, directive.action.as_deref())
        .or(Some(task));
    Some(directive)
}
