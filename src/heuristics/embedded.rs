use super::ParsedDocument;
use tracing::debug;

/// Some generators append the structured data as a JSON object at the end of
/// the document. Returns it when it parses and carries anything useful.
pub fn extract(text: &str) -> Option<ParsedDocument> {
    let json = extract_json_object(text)?;
    match serde_json::from_str::<ParsedDocument>(json) {
        Ok(doc) if !doc.is_empty() => Some(doc),
        Ok(_) => None,
        Err(e) => {
            debug!(error = %e, "Brace-delimited block is not a document payload");
            None
        }
    }
}

/// The outermost `{ ... }` span of `s`, if any.
fn extract_json_object(s: &str) -> Option<&str> {
    let start = s.find('{')?;
    let end = s.rfind('}')?;
    (end > start).then(|| &s[start..=end])
}
