//! # Transition Function
//!
//! One pure step of the directive scanner: given the current and previous
//! character and the owned [`Scan`], return the next [`Scan`] plus the events
//! the step produced. Nothing here has side effects, so every rule can be
//! tested by feeding a single character.
//!
//! ## Token rules
//!
//! A directive looks like `/command [action] [name=value ...]`:
//!
//! - it only starts at a `/` preceded by whitespace, a line break or `[`
//! - command, action and property names are ASCII alphanumeric, at most
//!   [`MAX_TOKEN_LEN`] characters
//! - values are quoted strings, numbers or `null`
//! - a line break always ends the directive
//! - after `[`, a `]` ends the directive and a `,` ends it while keeping the
//!   bracket open for a sibling
//!
//! Malformed input never fails. A broken command cancels the directive; a
//! broken action, property name or value completes it with whatever was
//! already committed.

use crate::models::PropertyValue;
use crate::parsing::classify::{is_alphanumeric, is_newline, is_quote, is_whitespace};
use crate::parsing::event::{Event, Scan, State, Step};
use crate::parsing::fence::{CodeFence, Fence, FenceProgress};
use crate::parsing::literal;

/// Longest command, action or property name.
pub const MAX_TOKEN_LEN: usize = 32;

const OPEN_BRACKET: char = '[';
const CLOSE_BRACKET: char = ']';
const COMMA: char = ',';
const SLASH: char = '/';
const EQUALS: char = '=';

/// Feeds `c` to the scanner. `prev` is the character before `c`, or a line
/// break at the start of the text.
pub fn transition(c: char, prev: char, scan: Scan) -> Step {
    let Scan {
        state,
        buffer,
        open_bracket,
        decimal_point,
    } = scan;

    match state {
        State::Outside => outside(c, prev, buffer, open_bracket),
        State::CodeBlock => code_block(c, prev, buffer, open_bracket),
        State::Command => command(c, prev, buffer, open_bracket),
        State::Action => action(c, prev, buffer, open_bracket),
        State::PropertyName => property_name(c, prev, buffer, open_bracket),
        State::PropertyValue => property_value(c, prev, buffer, open_bracket, decimal_point),
    }
}

/// What a terminator character means for the bracket flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Terminator {
    /// A line break: the directive ends and any bracket is forgotten.
    Newline,
    /// `]` after `[`: the directive and the bracket both close.
    CloseBracket,
    /// `,` after `[`: the directive ends, the bracket stays open.
    Comma,
}

impl Terminator {
    fn of(c: char, open_bracket: bool) -> Option<Self> {
        match c {
            _ if is_newline(c) => Some(Terminator::Newline),
            CLOSE_BRACKET if open_bracket => Some(Terminator::CloseBracket),
            COMMA if open_bracket => Some(Terminator::Comma),
            _ => None,
        }
    }

    fn open_bracket_after(self) -> bool {
        matches!(self, Terminator::Comma)
    }
}

fn starts_directive(prev: char) -> bool {
    is_whitespace(prev) || is_newline(prev) || prev == OPEN_BRACKET
}

fn text(buffer: Vec<char>) -> String {
    buffer.into_iter().collect()
}

fn stay(state: State, buffer: Vec<char>, open_bracket: bool) -> Step {
    Step::to(state, buffer, open_bracket)
}

fn outside(c: char, prev: char, mut buffer: Vec<char>, open_bracket: bool) -> Step {
    if c == SLASH && starts_directive(prev) {
        return Step::to(State::Command, Vec::new(), open_bracket || prev == OPEN_BRACKET)
            .with(Event::Started);
    }
    if is_newline(c) {
        return Step::to(State::Outside, Vec::new(), false);
    }
    if is_whitespace(c) {
        return Step::to(State::Outside, Vec::new(), open_bracket);
    }

    buffer.push(c);
    if CodeFence::opens(&buffer) {
        return Step::to(State::CodeBlock, buffer, open_bracket);
    }
    stay(State::Outside, buffer, open_bracket && c != CLOSE_BRACKET)
}

/// Drops the open directive and lets `c` be read as prose.
fn cancel(c: char, prev: char, open_bracket: bool) -> Step {
    outside(c, prev, Vec::new(), open_bracket).after([Event::Cancelled])
}

/// Completes the open directive and lets `c` be read as prose, so a
/// backtick right after a directive still opens a code block.
fn complete(c: char, prev: char, open_bracket: bool) -> Step {
    outside(c, prev, Vec::new(), open_bracket).after([Event::Completed])
}

/// Completes the open directive without looking at `c` again.
fn complete_silently(open_bracket: bool) -> Step {
    Step::to(State::Outside, Vec::new(), open_bracket).with(Event::Completed)
}

/// Completes the open directive and immediately opens the next one at `c`.
fn restart(open_bracket: bool) -> Step {
    Step::to(State::Command, Vec::new(), open_bracket)
        .with(Event::Completed)
        .with(Event::Started)
}

/// Ends the directive on a terminator, committing `pending` first if any.
fn terminate(pending: Option<Event>, terminator: Terminator) -> Step {
    Step::to(State::Outside, Vec::new(), terminator.open_bracket_after())
        .after(pending)
        .with(Event::Completed)
}

fn code_block(c: char, prev: char, mut buffer: Vec<char>, open_bracket: bool) -> Step {
    match CodeFence::progress(&buffer) {
        FenceProgress::Opening => {
            if c == CodeFence::TICK {
                buffer.push(c);
                return stay(State::CodeBlock, buffer, open_bracket);
            }
            if buffer.len() > 1 {
                // `` was an empty inline span, not the start of ```
                return cancel(c, prev, open_bracket);
            }
            if is_newline(c) {
                return Step::to(State::Outside, Vec::new(), false).with(Event::Cancelled);
            }
            buffer.push(c);
            stay(State::CodeBlock, buffer, open_bracket)
        }
        FenceProgress::Open(Fence::Inline) => {
            if c == CodeFence::TICK {
                return Step::to(State::Outside, Vec::new(), open_bracket).with(Event::Cancelled);
            }
            if is_newline(c) {
                return Step::to(State::Outside, Vec::new(), false).with(Event::Cancelled);
            }
            buffer.push(c);
            stay(State::CodeBlock, buffer, open_bracket)
        }
        FenceProgress::Open(fence) => {
            buffer.push(c);
            if CodeFence::closes(fence, &buffer) {
                return Step::to(State::Outside, Vec::new(), open_bracket).with(Event::Cancelled);
            }
            stay(State::CodeBlock, buffer, open_bracket)
        }
    }
}

fn command(c: char, prev: char, mut buffer: Vec<char>, open_bracket: bool) -> Step {
    if c == SLASH {
        return cancel(c, prev, open_bracket);
    }
    if is_whitespace(c) {
        if buffer.is_empty() {
            return cancel(c, prev, open_bracket);
        }
        return Step::to(State::Action, Vec::new(), open_bracket).with(Event::command(text(buffer)));
    }
    if let Some(terminator) = Terminator::of(c, open_bracket) {
        if buffer.is_empty() {
            return cancel(c, prev, open_bracket);
        }
        return terminate(Some(Event::command(text(buffer))), terminator);
    }
    if is_alphanumeric(c) && buffer.len() < MAX_TOKEN_LEN {
        buffer.push(c);
        return stay(State::Command, buffer, open_bracket);
    }
    cancel(c, prev, open_bracket)
}

fn action(c: char, prev: char, mut buffer: Vec<char>, open_bracket: bool) -> Step {
    if c == SLASH {
        if buffer.is_empty() && is_whitespace(prev) {
            return restart(open_bracket);
        }
        return complete_silently(open_bracket);
    }
    if is_whitespace(c) {
        if buffer.is_empty() {
            return stay(State::Action, buffer, open_bracket);
        }
        return Step::to(State::PropertyName, Vec::new(), open_bracket)
            .with(Event::action(text(buffer)));
    }
    if c == EQUALS {
        if buffer.is_empty() {
            return complete(c, prev, open_bracket);
        }
        return Step::to(State::PropertyValue, Vec::new(), open_bracket)
            .with(Event::prop_name(text(buffer)));
    }
    if let Some(terminator) = Terminator::of(c, open_bracket) {
        let pending = (!buffer.is_empty()).then(|| Event::action(text(buffer)));
        return terminate(pending, terminator);
    }
    if is_alphanumeric(c) && buffer.len() < MAX_TOKEN_LEN {
        buffer.push(c);
        return stay(State::Action, buffer, open_bracket);
    }
    complete(c, prev, open_bracket)
}

fn property_name(c: char, prev: char, mut buffer: Vec<char>, open_bracket: bool) -> Step {
    if c == SLASH {
        if buffer.is_empty() && is_whitespace(prev) {
            return restart(open_bracket);
        }
        return complete_silently(open_bracket);
    }
    if c == EQUALS {
        if buffer.is_empty() {
            return complete(c, prev, open_bracket);
        }
        return Step::to(State::PropertyValue, Vec::new(), open_bracket)
            .with(Event::prop_name(text(buffer)));
    }
    if is_whitespace(c) {
        if buffer.is_empty() {
            return stay(State::PropertyName, buffer, open_bracket);
        }
        // a name with no value is dropped
        return complete_silently(open_bracket);
    }
    if let Some(terminator) = Terminator::of(c, open_bracket) {
        return terminate(None, terminator);
    }
    if is_alphanumeric(c) && buffer.len() < MAX_TOKEN_LEN {
        buffer.push(c);
        return stay(State::PropertyName, buffer, open_bracket);
    }
    complete(c, prev, open_bracket)
}

fn property_value(
    c: char,
    prev: char,
    mut buffer: Vec<char>,
    open_bracket: bool,
    decimal_point: bool,
) -> Step {
    if let Some(&quote) = buffer.first().filter(|&&q| is_quote(q)) {
        if c == quote && literal::trailing_backslashes(&buffer) % 2 == 0 {
            let value = literal::unescape(&buffer[1..], quote);
            return Step::to(State::PropertyName, Vec::new(), open_bracket)
                .with(Event::prop_value(PropertyValue::String(value)));
        }
        buffer.push(c);
        return stay(State::PropertyValue, buffer, open_bracket);
    }

    if is_quote(c) && buffer.is_empty() {
        return stay(State::PropertyValue, vec![c], open_bracket);
    }
    if literal::extends_literal(&buffer, decimal_point, c) {
        buffer.push(c);
        return stay(State::PropertyValue, buffer, open_bracket)
            .with_decimal_point(decimal_point || c == literal::DECIMAL_POINT);
    }

    let value = literal::parse_bare(&buffer);
    if is_whitespace(c) {
        return match value {
            Some(v) => {
                Step::to(State::PropertyName, Vec::new(), open_bracket).with(Event::prop_value(v))
            }
            None => complete_silently(open_bracket),
        };
    }
    if let Some(terminator) = Terminator::of(c, open_bracket) {
        return terminate(value.map(Event::prop_value), terminator);
    }
    complete(c, prev, open_bracket)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsing::event::Commit;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn scan(state: State, buffer: &str, open_bracket: bool) -> Scan {
        Scan::new(state, buffer.chars().collect(), open_bracket)
    }

    /// Runs `input` through the transition function from a fresh scan and
    /// returns every event plus the final scan.
    fn run(input: &str) -> (Vec<Event>, Scan) {
        let mut events = Vec::new();
        let mut current = Scan::default();
        let mut prev = '\n';
        for c in input.chars() {
            let step = transition(c, prev, current);
            events.extend(step.events);
            current = step.scan;
            prev = c;
        }
        (events, current)
    }

    #[rstest]
    #[case('\n')]
    #[case(' ')]
    #[case('\t')]
    #[case('[')]
    fn slash_starts_after_boundary(#[case] prev: char) {
        let step = transition('/', prev, Scan::default());
        assert_eq!(step.events, vec![Event::Started]);
        assert_eq!(step.scan.state, State::Command);
        assert_eq!(step.scan.open_bracket, prev == '[');
    }

    #[rstest]
    #[case('a')]
    #[case('/')]
    #[case(':')]
    fn slash_inside_word_is_prose(#[case] prev: char) {
        let step = transition('/', prev, Scan::default());
        assert!(step.events.is_empty());
        assert_eq!(step.scan.state, State::Outside);
    }

    #[test]
    fn newline_clears_bracket_outside() {
        let step = transition('\n', 'x', scan(State::Outside, "abc", true));
        assert_eq!(step.scan, Scan::default());
    }

    #[test]
    fn whitespace_resets_outside_buffer() {
        let step = transition(' ', 'x', scan(State::Outside, "abc", true));
        assert_eq!(step.scan, scan(State::Outside, "", true));
    }

    #[rstest]
    #[case("`")]
    #[case("<code>")]
    fn fences_open_code_blocks(#[case] input: &str) {
        let (_, end) = run(input);
        assert_eq!(end.state, State::CodeBlock);
    }

    #[test]
    fn command_commits_on_whitespace() {
        let step = transition(' ', 'd', scan(State::Command, "add", false));
        assert_eq!(step.events, vec![Event::command("add")]);
        assert_eq!(step.scan.state, State::Action);
    }

    #[test]
    fn command_completes_on_newline() {
        let step = transition('\n', 'd', scan(State::Command, "add", true));
        assert_eq!(step.events, vec![Event::command("add"), Event::Completed]);
        assert_eq!(step.scan, Scan::default());
    }

    #[rstest]
    #[case(']', false)]
    #[case(',', true)]
    fn command_bracket_terminators(#[case] c: char, #[case] still_open: bool) {
        let step = transition(c, 'd', scan(State::Command, "add", true));
        assert_eq!(step.events, vec![Event::command("add"), Event::Completed]);
        assert_eq!(step.scan.state, State::Outside);
        assert_eq!(step.scan.open_bracket, still_open);
    }

    #[rstest]
    #[case('/')]
    #[case('.')]
    #[case(']')]
    #[case('é')]
    fn command_cancels_on_other_characters(#[case] c: char) {
        let step = transition(c, 'd', scan(State::Command, "add", false));
        assert_eq!(step.events, vec![Event::Cancelled]);
        assert_eq!(step.scan.state, State::Outside);
    }

    #[test]
    fn command_cancels_when_empty() {
        let step = transition(' ', '/', scan(State::Command, "", false));
        assert_eq!(step.events, vec![Event::Cancelled]);
    }

    #[test]
    fn command_cancels_past_length_cap() {
        let full = "a".repeat(MAX_TOKEN_LEN);
        let step = transition('b', 'a', scan(State::Command, &full, false));
        assert_eq!(step.events, vec![Event::Cancelled]);
    }

    #[test]
    fn action_ignores_repeated_whitespace() {
        let step = transition(' ', ' ', scan(State::Action, "", false));
        assert!(step.events.is_empty());
        assert_eq!(step.scan.state, State::Action);
    }

    #[test]
    fn action_equals_becomes_property_name() {
        let step = transition('=', 'e', scan(State::Action, "title", false));
        assert_eq!(step.events, vec![Event::prop_name("title")]);
        assert_eq!(step.scan.state, State::PropertyValue);
    }

    #[test]
    fn action_slash_after_space_restarts() {
        let step = transition('/', ' ', scan(State::Action, "", false));
        assert_eq!(step.events, vec![Event::Completed, Event::Started]);
        assert_eq!(step.scan.state, State::Command);
    }

    #[test]
    fn action_slash_inside_word_completes() {
        let step = transition('/', 'o', scan(State::Action, "foo", false));
        assert_eq!(step.events, vec![Event::Completed]);
        assert_eq!(step.scan.state, State::Outside);
    }

    #[test]
    fn action_punctuation_completes_without_action() {
        let step = transition('.', 'n', scan(State::Action, "action", false));
        assert_eq!(step.events, vec![Event::Completed]);
        assert_eq!(step.scan, scan(State::Outside, ".", false));
    }

    #[test]
    fn action_backtick_opens_code_block() {
        let step = transition('`', ' ', scan(State::Action, "", false));
        assert_eq!(step.events, vec![Event::Completed]);
        assert_eq!(step.scan.state, State::CodeBlock);
    }

    #[test]
    fn action_newline_commits_and_completes() {
        let step = transition('\n', 'n', scan(State::Action, "set", false));
        assert_eq!(step.events, vec![Event::action("set"), Event::Completed]);
    }

    #[test]
    fn property_name_without_value_completes() {
        let step = transition(' ', 'e', scan(State::PropertyName, "title", false));
        assert_eq!(step.events, vec![Event::Completed]);
        assert_eq!(step.scan.state, State::Outside);
    }

    #[rstest]
    #[case("123 ", PropertyValue::Number(123.0))]
    #[case("-0.5 ", PropertyValue::Number(-0.5))]
    #[case("null ", PropertyValue::Null)]
    #[case("'a b' ", PropertyValue::String("a b".into()))]
    #[case("\"it's\" ", PropertyValue::String("it's".into()))]
    fn property_values_are_typed(#[case] input: &str, #[case] expected: PropertyValue) {
        let (events, end) = run(&format!("/cmd p={input}"));
        let committed: Vec<_> = events
            .into_iter()
            .filter_map(|e| match e {
                Event::Committed(Commit::PropValue(v)) => Some(v),
                _ => None,
            })
            .collect();
        assert_eq!(committed, vec![expected]);
        assert_eq!(end.state, State::PropertyName);
    }

    #[test]
    fn invalid_bare_value_completes_without_commit() {
        let (events, end) = run("/cmd p=abc");
        assert_eq!(
            events,
            vec![
                Event::Started,
                Event::command("cmd"),
                Event::prop_name("p"),
                Event::Completed,
            ]
        );
        assert_eq!(end.state, State::Outside);
    }

    #[test]
    fn quoted_value_keeps_everything_until_closing_quote() {
        let (events, end) = run("/cmd p='a /b\n\"c\" ] ,");
        assert_eq!(events.last(), Some(&Event::prop_name("p")));
        assert_eq!(end.state, State::PropertyValue);
        assert_eq!(end.buffer_text(), "'a /b\n\"c\" ] ,");
    }

    #[test]
    fn escaped_quote_does_not_close() {
        let step = transition('\'', '\\', scan(State::PropertyValue, r"'a\", false));
        assert!(step.events.is_empty());
        assert_eq!(step.scan.buffer_text(), r"'a\'");
    }

    #[test]
    fn even_backslashes_close() {
        let step = transition('\'', '\\', scan(State::PropertyValue, r"'a\\", false));
        assert_eq!(
            step.events,
            vec![Event::prop_value(PropertyValue::String(r"a\\".into()))]
        );
    }

    #[test]
    fn numeric_value_closes_bracket() {
        let step = transition(']', '5', scan(State::PropertyValue, "5", true));
        assert_eq!(
            step.events,
            vec![
                Event::prop_value(PropertyValue::Number(5.0)),
                Event::Completed
            ]
        );
        assert!(!step.scan.open_bracket);
    }

    #[test]
    fn double_backtick_is_an_empty_span() {
        let (events, end) = run("`` ");
        assert_eq!(events, vec![Event::Cancelled]);
        assert_eq!(end, Scan::default());
    }

    #[test]
    fn triple_backtick_suppresses_directives() {
        let (events, end) = run("```/command action```");
        assert_eq!(events, vec![Event::Cancelled]);
        assert_eq!(end.state, State::Outside);
    }

    #[test]
    fn single_backtick_closes_at_line_end() {
        let (events, end) = run("`/cmd\n");
        assert_eq!(events, vec![Event::Cancelled]);
        assert_eq!(end, Scan::default());
    }

    #[test]
    fn code_tag_suppresses_directives() {
        let (events, end) = run("<code> /cmd </code>");
        assert_eq!(events, vec![Event::Cancelled]);
        assert_eq!(end.state, State::Outside);
    }

    #[rstest]
    #[case(State::Action)]
    #[case(State::PropertyName)]
    fn names_past_length_cap_complete(#[case] state: State) {
        let full = "a".repeat(MAX_TOKEN_LEN);
        let step = transition('b', 'a', scan(state, &full, false));
        assert_eq!(step.events, vec![Event::Completed]);
        assert_eq!(step.scan, scan(State::Outside, "b", false));
    }

    #[rstest]
    #[case("", ']', false)]
    #[case("", ',', true)]
    #[case("ti", ']', false)]
    #[case("ti", ',', true)]
    fn property_name_bracket_terminators(
        #[case] buffer: &str,
        #[case] c: char,
        #[case] still_open: bool,
    ) {
        let step = transition(c, 'e', scan(State::PropertyName, buffer, true));
        assert_eq!(step.events, vec![Event::Completed]);
        assert_eq!(step.scan, scan(State::Outside, "", still_open));
    }

    #[test]
    fn property_name_newline_completes() {
        let step = transition('\n', 'e', scan(State::PropertyName, "ti", true));
        assert_eq!(step.events, vec![Event::Completed]);
        assert_eq!(step.scan, Scan::default());
    }

    #[rstest]
    #[case("<code> /cmd never closed\n/cmd more")]
    #[case("```\n/cmd x=1\n")]
    fn unclosed_code_runs_to_end_of_input(#[case] input: &str) {
        let (events, end) = run(input);
        assert!(events.is_empty());
        assert_eq!(end.state, State::CodeBlock);
    }

    #[test]
    fn decimal_point_is_tracked_while_typing() {
        let (_, end) = run("/cmd p=1.5");
        assert_eq!(end.buffer_text(), "1.5");
        assert!(end.decimal_point);

        let (_, end) = run("/cmd p=15");
        assert!(!end.decimal_point);
    }

    #[test]
    fn second_decimal_point_ends_the_value() {
        let (events, end) = run("/cmd p=1.5.");
        assert_eq!(
            events,
            vec![
                Event::Started,
                Event::command("cmd"),
                Event::prop_name("p"),
                Event::Completed,
            ]
        );
        assert_eq!(end, scan(State::Outside, ".", false));
    }
}
