//! Turns transition events into [`Directive`] records.

use std::iter;

use uuid::Uuid;

use crate::models::{Directive, Properties, PropertyValue};
use crate::parsing::event::{Commit, Event, Scan};
use crate::parsing::transition::transition;

/// Flushes a directive still open at the end of the text.
const FLUSH: char = '\n';

/// The directive currently being read.
#[derive(Debug)]
struct Pending {
    id: Uuid,
    command: Option<String>,
    action: Option<String>,
    pairs: Vec<(String, PropertyValue)>,
    key: Option<String>,
    start: usize,
    end: usize,
}

impl Pending {
    fn new(start: usize) -> Self {
        Self {
            id: Uuid::new_v4(),
            command: None,
            action: None,
            pairs: Vec::new(),
            key: None,
            start,
            end: start,
        }
    }

    fn into_directive(self) -> Option<Directive> {
        let command = self.command?;
        // an unpaired trailing key never made it into `pairs`
        let properties: Properties = self.pairs.into_iter().collect();
        Some(Directive {
            id: self.id,
            command,
            action: self.action,
            properties,
            task: None,
            start: self.start,
            end: self.end,
        })
    }
}

/// Collects directives while the scanner walks the text.
#[derive(Debug, Default)]
pub struct Driver {
    current: Option<Pending>,
    directives: Vec<Directive>,
}

impl Driver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Scans `text` in one pass and returns the directives in order.
    pub fn run(mut self, text: &str) -> Vec<Directive> {
        let mut scan = Scan::default();
        let mut prev = FLUSH;

        for (index, c) in text.char_indices().chain(iter::once((text.len(), FLUSH))) {
            let step = transition(c, prev, scan);
            for event in step.events {
                self.apply(event, index, c);
            }
            scan = step.scan;
            prev = c;
        }

        // only an unterminated quoted value survives the flush
        self.finish();
        self.directives
    }

    /// Applies one event emitted while reading `c` at byte `index`.
    fn apply(&mut self, event: Event, index: usize, c: char) {
        match event {
            Event::Started => {
                self.finish();
                self.current = Some(Pending::new(index + c.len_utf8()));
            }
            Event::Committed(commit) => {
                let Some(pending) = self.current.as_mut() else {
                    return;
                };
                match commit {
                    Commit::Command(command) => {
                        pending.command = Some(command);
                        pending.end = index;
                    }
                    Commit::Action(action) => {
                        pending.action = Some(action);
                        pending.end = index;
                    }
                    Commit::PropName(name) => pending.key = Some(name),
                    Commit::PropValue(value) => {
                        // a string value is committed on its closing quote
                        pending.end = match value {
                            PropertyValue::String(_) => index + c.len_utf8(),
                            _ => index,
                        };
                        if let Some(key) = pending.key.take() {
                            pending.pairs.push((key, value));
                        }
                    }
                }
            }
            Event::Completed => self.finish(),
            Event::Cancelled => self.current = None,
        }
    }

    fn finish(&mut self) {
        if let Some(directive) = self.current.take().and_then(Pending::into_directive) {
            self.directives.push(directive);
        }
    }
}

/// Extracts candidate directives from `text`.
pub fn scan(text: &str) -> Vec<Directive> {
    Driver::new().run(text)
}
