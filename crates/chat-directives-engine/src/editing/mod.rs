//! # Text Removal
//!
//! Cuts accepted directives and wrappers out of the original text so the
//! rest can be shown to the user.
//!
//! Spans are byte ranges into the original text. They are merged and sorted,
//! then the text between them is copied in one forward pass. Overlapping
//! spans are removed once.

use crate::parsing::span::Span;

/// Removes `spans` from `text` and trims the result.
pub fn remove_spans(text: &str, spans: impl IntoIterator<Item = Span>) -> String {
    let mut out = String::with_capacity(text.len());
    let mut cursor = 0;
    for span in merge(spans) {
        // offsets come from `char_indices`, anything else is skipped
        let (Some(kept), Some(_)) = (text.get(cursor..span.start), span.slice(text)) else {
            log::debug!("skipping span {span:?} off a char boundary");
            continue;
        };
        out.push_str(kept);
        cursor = span.end;
    }
    out.push_str(text.get(cursor..).unwrap_or_default());
    out.trim().to_owned()
}

/// Sorts spans by start and joins the ones that overlap.
fn merge(spans: impl IntoIterator<Item = Span>) -> Vec<Span> {
    let mut spans: Vec<Span> = spans.into_iter().filter(|s| !s.is_empty()).collect();
    spans.sort_by_key(|s| s.start);

    let mut merged: Vec<Span> = Vec::with_capacity(spans.len());
    for span in spans {
        match merged.last_mut() {
            Some(last) if span.start < last.end => last.end = last.end.max(span.end),
            _ => merged.push(span),
        }
    }
    merged
}
