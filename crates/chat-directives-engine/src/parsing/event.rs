//! # Scanner State and Events
//!
//! The transition function never builds directives itself. Each step returns
//! the next [`Scan`] together with a short list of [`Event`]s, and the driver
//! turns those events into directive records:
//!
//! ```text
//! "/add title='Gym'\n"
//!
//! '/'  Started
//! ' '  Committed(Command("add"))
//! '='  Committed(PropName("title"))
//! '''  Committed(PropValue("Gym"))      <- closing quote
//! '\n' Completed
//! ```
//!
//! `Cancelled` throws the open directive away. It is also emitted when a code
//! block closes, where there is nothing open and the driver ignores it.

use crate::models::PropertyValue;

/// Where the scanner is within the current token.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum State {
    /// Plain prose, no directive open.
    #[default]
    Outside,
    /// Inside inline code, a fenced block or a `<code>` element.
    CodeBlock,
    Command,
    Action,
    PropertyName,
    PropertyValue,
}

/// A finished token of the open directive.
#[derive(Debug, Clone, PartialEq)]
pub enum Commit {
    Command(String),
    Action(String),
    PropName(String),
    /// Quoted values are always `PropertyValue::String`; unquoted values are
    /// numbers or null.
    PropValue(PropertyValue),
}

/// Something the driver must act on after a step.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Started,
    Committed(Commit),
    Completed,
    Cancelled,
}

impl Event {
    pub fn command(s: impl Into<String>) -> Self {
        Event::Committed(Commit::Command(s.into()))
    }

    pub fn action(s: impl Into<String>) -> Self {
        Event::Committed(Commit::Action(s.into()))
    }

    pub fn prop_name(s: impl Into<String>) -> Self {
        Event::Committed(Commit::PropName(s.into()))
    }

    pub fn prop_value(v: PropertyValue) -> Self {
        Event::Committed(Commit::PropValue(v))
    }
}

/// The scanner's owned state between two characters.
///
/// The buffer holds the characters of the token being read. The bracket flag
/// records that the directive was opened right after a `[`, which makes `]`
/// and `,` terminators.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Scan {
    pub state: State,
    pub buffer: Vec<char>,
    pub open_bracket: bool,
    /// The unquoted value in `buffer` already holds a `.`.
    pub decimal_point: bool,
}

impl Scan {
    pub fn new(state: State, buffer: Vec<char>, open_bracket: bool) -> Self {
        Self {
            state,
            buffer,
            open_bracket,
            decimal_point: false,
        }
    }

    pub fn buffer_text(&self) -> String {
        self.buffer.iter().collect()
    }
}

/// The result of feeding one character to the transition function.
#[derive(Debug, Clone, PartialEq)]
pub struct Step {
    pub scan: Scan,
    pub events: Vec<Event>,
}

impl Step {
    /// Moves to `state` without emitting anything.
    pub fn to(state: State, buffer: Vec<char>, open_bracket: bool) -> Self {
        Self {
            scan: Scan::new(state, buffer, open_bracket),
            events: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_decimal_point(mut self, decimal_point: bool) -> Self {
        self.scan.decimal_point = decimal_point;
        self
    }

    #[must_use]
    pub fn with(mut self, event: Event) -> Self {
        self.events.push(event);
        self
    }

    /// Puts `events` in front of the events already emitted.
    #[must_use]
    pub fn after(mut self, events: impl IntoIterator<Item = Event>) -> Self {
        let mut head: Vec<Event> = events.into_iter().collect();
        head.append(&mut self.events);
        self.events = head;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_orders_events() {
        let step = Step::to(State::Outside, Vec::new(), false)
            .with(Event::Completed)
            .after([Event::action("set")]);
        assert_eq!(step.events, vec![Event::action("set"), Event::Completed]);
    }

    #[test]
    fn default_scan_is_outside() {
        let scan = Scan::default();
        assert_eq!(scan.state, State::Outside);
        assert!(scan.buffer.is_empty());
        assert!(!scan.open_bracket);
        assert!(!scan.decimal_point);
    }
}
