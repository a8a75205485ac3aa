//! Frame and trace data model for captured stacks.
//!
//! `Frame` carries one stack level with its source context and in-app
//! classification; `Stacktrace` is the ordered, immutable frame list handed
//! to an error-reporting payload builder. The serialized field names are the
//! contract that payload builders rely on and must not change.

use serde::Serialize;

/// One level of a captured call stack.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Frame {
    /// Source file path relative to a configured source root, or the
    /// absolute path when no root matches.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub filename: String,
    /// Full filesystem path as reported by the frame resolver.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub absolute_path: String,
    /// Bare function or method name, without its package qualifier.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub function: String,
    /// Package/module qualifier; empty when it could not be derived.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub module: String,
    /// 1-based source line of the call site.
    pub line_number: u32,
    /// Exact source line at `line_number`, or empty if unavailable.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub context_line: String,
    /// Up to N lines immediately preceding `line_number`, oldest first;
    /// shorter near the start of the file.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub pre_context: Vec<String>,
    /// Up to N lines immediately following `line_number`; shorter near the
    /// end of the file.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub post_context: Vec<String>,
    /// Whether this frame belongs to application code rather than
    /// library/vendored/runtime code.
    pub in_app: bool,
}

/// An ordered capture of a call stack: oldest caller first, the most recent
/// call (the error site) last.
///
/// Constructed fully populated by [`Collector::capture`] and never mutated
/// afterwards.
///
/// [`Collector::capture`]: crate::Collector::capture
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Stacktrace {
    frames: Vec<Frame>,
}

impl Stacktrace {
    /// Frames are expected oldest-first; the collector reverses its
    /// innermost-first walk before constructing the trace.
    pub(crate) fn new(frames: Vec<Frame>) -> Self {
        Self { frames }
    }

    /// All frames, oldest caller first.
    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    /// Qualified name of the innermost in-app frame, formatted
    /// `"<module>.<function>"`, used as the headline location for a report.
    ///
    /// Returns an empty string when no frame is in-app.
    pub fn culprit(&self) -> String {
        for frame in self.frames.iter().rev() {
            if frame.in_app {
                return format!("{}.{}", frame.module, frame.function);
            }
        }
        String::new()
    }
}
