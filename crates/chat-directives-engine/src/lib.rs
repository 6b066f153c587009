pub mod editing;
pub mod extraction;
pub mod models;
pub mod parsing;
pub mod snapshot;
pub mod validate;
pub mod wrapping;

// Re-export key types for easier usage
pub use editing::remove_spans;
pub use extraction::{ExtractOptions, Extraction, extract};
pub use models::*;
pub use parsing::literal::LiteralError;
pub use parsing::{Span, scan};
pub use validate::Validator;
pub use wrapping::{DEFAULT_MAX_GAP, WrapperDetector, WrapperGroup};
