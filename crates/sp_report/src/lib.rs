//! sp_report: pure offline report model + renderers (text, JSON).
//!
//! - No I/O here. Callers supply artifacts already in memory.
//! - Inputs are accepted as JSON values (`serde_json::Value`) so this crate
//!   does not depend on the pipeline's concrete types.
//! - Stable section order and field names.

#![deny(unsafe_code)]

use std::fmt;

use serde_json::Value;

pub mod render_text;
pub mod structure;

#[cfg(feature = "render_json")]
pub mod render_json;

#[cfg(feature = "render_json")]
pub use render_json::render_json;
pub use render_text::render_text;
pub use structure::{build_model, ReportModel};

/// Serialized `ProjectionResult`.
pub type ResultArtifact = Value;
/// Serialized `RunRecord`.
pub type RunRecordArtifact = Value;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportError {
    MissingField(&'static str),
    Inconsistent(&'static str),
    Serialize(String),
}

impl fmt::Display for ReportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportError::MissingField(p) => write!(f, "report input is missing {p}"),
            ReportError::Inconsistent(m) => write!(f, "report input is inconsistent: {m}"),
            ReportError::Serialize(m) => write!(f, "report serialization failed: {m}"),
        }
    }
}

impl std::error::Error for ReportError {}

// ===== JSON pointer helpers =====
//
// Each returns MissingField(ptr) for an absent or mistyped value; the pointer
// text is the field name the caller sees. Pointers into array elements are
// relative to the element.

pub(crate) fn j_str(root: &Value, ptr: &'static str) -> Result<String, ReportError> {
    root.pointer(ptr)
        .and_then(|v| v.as_str())
        .map(|s| s.to_string())
        .ok_or(ReportError::MissingField(ptr))
}

pub(crate) fn j_u64(root: &Value, ptr: &'static str) -> Result<u64, ReportError> {
    root.pointer(ptr)
        .and_then(|v| v.as_u64())
        .ok_or(ReportError::MissingField(ptr))
}

pub(crate) fn j_f64(root: &Value, ptr: &'static str) -> Result<f64, ReportError> {
    root.pointer(ptr)
        .and_then(|v| v.as_f64())
        .ok_or(ReportError::MissingField(ptr))
}

pub(crate) fn j_bool(root: &Value, ptr: &'static str) -> Result<bool, ReportError> {
    root.pointer(ptr)
        .and_then(|v| v.as_bool())
        .ok_or(ReportError::MissingField(ptr))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn helpers_report_the_pointer() {
        let v = json!({"a": {"b": 3, "s": "x", "f": 1.5, "t": true}});
        assert_eq!(j_u64(&v, "/a/b"), Ok(3));
        assert_eq!(j_str(&v, "/a/s"), Ok("x".to_string()));
        assert_eq!(j_f64(&v, "/a/f"), Ok(1.5));
        assert_eq!(j_bool(&v, "/a/t"), Ok(true));
        assert_eq!(j_u64(&v, "/a/s"), Err(ReportError::MissingField("/a/s")));
        assert_eq!(j_str(&v, "/nope"), Err(ReportError::MissingField("/nope")));
    }
}
