//! # Directive Scanning
//!
//! A single left-to-right pass over the text finds every
//! `/command [action] [name=value ...]` directive and records where it sits.
//!
//! ## Pipeline
//!
//! ```text
//! chars ──▶ transition() ──▶ Events ──▶ Driver ──▶ Vec<Directive>
//!           (pure step)                 (records, offsets)
//! ```
//!
//! - **`classify`**: ASCII-only character predicates
//! - **`event`**: `State`, the owned `Scan` buffer and the `Event`s a step emits
//! - **`fence`**: code regions (`` ` ``, ```` ``` ````, `<code>`) that hide directives
//! - **`literal`**: number/null/string typing of property values
//! - **`transition`**: the state machine itself
//! - **`driver`**: folds events into directives and flushes the end of input
//! - **`span`**: byte ranges into the scanned text
//!
//! ## Raw Zones
//!
//! Code regions take precedence: `` `/not a directive` `` is skipped whole.

pub mod classify;
pub mod driver;
pub mod event;
pub mod fence;
pub mod literal;
pub mod span;
pub mod transition;

pub use driver::{Driver, scan};
pub use event::{Commit, Event, Scan, State, Step};
pub use span::Span;
pub use transition::{MAX_TOKEN_LEN, transition};
