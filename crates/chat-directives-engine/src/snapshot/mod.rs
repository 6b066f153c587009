//! # Snapshot Testing Support
//!
//! Helpers for asserting on extraction results in tests.
//!
//! - **`normalize`**: turns an [`Extraction`](crate::Extraction) into a
//!   stable `Snap` without random ids, rendered one directive per line for
//!   `insta` snapshots
//! - **`invariants`**: offset checks every scan result must pass (slash right
//!   before `start`, spans in bounds, ordered and disjoint)

pub mod invariants;
pub mod normalize;

pub use invariants::check as invariants;
pub use normalize::{Snap, normalize};
