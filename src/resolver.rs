//! Stack introspection behind an injectable seam.
//!
//! [`FrameResolver`] abstracts "what is at stack depth N" so the collector
//! can be driven by the live call stack in production and by a deterministic
//! fake in tests. [`NativeResolver`] is the production implementation: one
//! snapshot of the current thread's stack taken through the `backtrace`
//! crate.

use std::path::PathBuf;

/// Hard stop for the raw native stack walk. Headroom above the collector's
/// frame budget to absorb skip offsets and trimmed internal frames.
const RAW_FRAME_LIMIT: usize = 256;

/// Leading frames with these symbol prefixes belong to the capture
/// machinery itself and are trimmed so that depth 0 lands on the caller.
const INTERNAL_PREFIXES: &[&str] = &["backtrace::", concat!(env!("CARGO_PKG_NAME"), "::")];

/// A fully resolved stack level, as reported by runtime introspection.
///
/// All three fields must be known for a depth to count as resolved; the
/// collector stops walking at the first unresolved depth rather than emit a
/// partial frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedFrame {
    /// Absolute path of the source file containing the call site.
    pub file: PathBuf,
    /// 1-based line of the call site.
    pub line: u32,
    /// Fully qualified symbol name.
    pub symbol: String,
}

/// Per-depth stack introspection.
///
/// Depth 0 is the most recent call the resolver is willing to report, and
/// `resolve` returns `None` once the stack is exhausted or a depth cannot
/// be fully symbolized.
pub trait FrameResolver {
    /// Resolve the frame at `depth`, counting outward from the capture
    /// point.
    fn resolve(&self, depth: usize) -> Option<ResolvedFrame>;
}

/// Snapshot of the current thread's call stack, symbolized eagerly.
///
/// Frames missing a file, line, or symbol name are kept as unresolved
/// placeholders so depth numbering still matches the physical stack; the
/// walk a collector performs over this snapshot therefore stops where
/// symbolization stopped.
pub struct NativeResolver {
    frames: Vec<Option<ResolvedFrame>>,
}

impl NativeResolver {
    /// Walk and symbolize the calling thread's stack.
    pub fn capture() -> Self {
        let mut raw = Vec::new();
        backtrace::trace(|frame| {
            raw.push(frame.clone());
            raw.len() < RAW_FRAME_LIMIT
        });

        let mut frames: Vec<Option<ResolvedFrame>> =
            raw.iter().map(resolve_native_frame).collect();

        let internal = frames.iter().take_while(|f| is_internal(f)).count();
        frames.drain(..internal);

        Self { frames }
    }
}

impl FrameResolver for NativeResolver {
    fn resolve(&self, depth: usize) -> Option<ResolvedFrame> {
        self.frames.get(depth).and_then(Clone::clone)
    }
}

/// Symbolize one raw frame, taking the innermost record when inlining
/// produced several. Demangled names keep their full path but drop the
/// trailing hash suffix.
fn resolve_native_frame(frame: &backtrace::Frame) -> Option<ResolvedFrame> {
    let mut resolved = None;
    backtrace::resolve_frame(frame, |symbol| {
        if resolved.is_some() {
            return;
        }
        let (Some(file), Some(line), Some(name)) =
            (symbol.filename(), symbol.lineno(), symbol.name())
        else {
            return;
        };
        resolved = Some(ResolvedFrame {
            file: file.to_path_buf(),
            line,
            symbol: format!("{name:#}"),
        });
    });
    resolved
}

fn is_internal(frame: &Option<ResolvedFrame>) -> bool {
    let Some(frame) = frame else {
        return false;
    };
    // Inherent methods can demangle as `<crate::Type>::method`.
    let symbol = frame.symbol.strip_prefix('<').unwrap_or(&frame.symbol);
    INTERNAL_PREFIXES
        .iter()
        .any(|prefix| symbol.starts_with(prefix))
}
