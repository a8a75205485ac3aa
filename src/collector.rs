//! Stack capture and frame assembly.

use std::env;
use std::path::{Path, PathBuf};

use crate::frame::{Frame, Stacktrace};
use crate::resolver::{FrameResolver, NativeResolver, ResolvedFrame};
use crate::source::SourceCache;
use crate::symbols::{is_in_app, split_symbol};

/// Upper bound on emitted frames per capture. Deep recursion yields the
/// innermost frames up to this count rather than an unbounded payload.
const MAX_FRAMES: usize = 100;

/// Captures the current call stack as a [`Stacktrace`] payload.
///
/// A collector owns the source line cache and the source root list used to
/// relativize file names, so one instance is meant to live as long as the
/// client that reports through it. Capture never fails: whatever cannot be
/// resolved or read degrades to absent fields, and a stack with no usable
/// frames comes back as `None`.
pub struct Collector {
    cache: SourceCache,
    source_roots: Vec<PathBuf>,
}

impl Collector {
    /// Collector rooted at the current working directory.
    pub fn new() -> Self {
        Self {
            cache: SourceCache::new(),
            source_roots: env::current_dir().ok().into_iter().collect(),
        }
    }

    /// Collector with an explicit set of source roots. Frames whose file
    /// path starts with a root are reported relative to it.
    pub fn with_source_roots(source_roots: Vec<PathBuf>) -> Self {
        Self {
            cache: SourceCache::new(),
            source_roots,
        }
    }

    /// Replace the source line cache, e.g. to share one across collectors
    /// or to cap cacheable file size differently.
    pub fn with_cache(mut self, cache: SourceCache) -> Self {
        self.cache = cache;
        self
    }

    /// The collector's source line cache.
    pub fn source_cache(&self) -> &SourceCache {
        &self.cache
    }

    /// Capture the calling thread's stack.
    ///
    /// `skip` drops that many innermost frames (0 keeps the caller of
    /// `capture` as the innermost frame), `context` is the number of source
    /// lines fetched on each side of every frame's line (0 disables source
    /// reading entirely), and `app_packages` lists the module prefixes
    /// considered application code. Returns `None` when no frame survives,
    /// for instance when `skip` exceeds the stack depth.
    pub fn capture(
        &self,
        skip: usize,
        context: usize,
        app_packages: &[String],
    ) -> Option<Stacktrace> {
        self.capture_with(&NativeResolver::capture(), skip, context, app_packages)
    }

    /// Capture from an explicit resolver instead of the live stack.
    pub fn capture_with(
        &self,
        resolver: &dyn FrameResolver,
        skip: usize,
        context: usize,
        app_packages: &[String],
    ) -> Option<Stacktrace> {
        let mut frames = Vec::new();
        for depth in skip..skip.saturating_add(MAX_FRAMES) {
            let Some(resolved) = resolver.resolve(depth) else {
                break;
            };
            if let Some(frame) = self.build_frame(&resolved, context, app_packages) {
                frames.push(frame);
            }
        }

        if frames.is_empty() {
            log::debug!("No stack frames resolved (skip={skip})");
            return None;
        }

        // Innermost-last payload order; the walk produced innermost first.
        frames.reverse();
        Some(Stacktrace::new(frames))
    }

    fn build_frame(
        &self,
        resolved: &ResolvedFrame,
        context: usize,
        app_packages: &[String],
    ) -> Option<Frame> {
        let (module, function) = split_symbol(&resolved.symbol);
        if module == "runtime" && function == "goexit" {
            // The host scheduler's stack terminator, not a call site.
            return None;
        }

        let mut frame = Frame {
            filename: self.relative_filename(&resolved.file),
            absolute_path: resolved.file.display().to_string(),
            in_app: is_in_app(&module, app_packages),
            module,
            function,
            line_number: resolved.line,
            context_line: String::new(),
            pre_context: Vec::new(),
            post_context: Vec::new(),
        };

        if context > 0 {
            let (lines, index) = self.cache.load(&resolved.file, resolved.line, context);
            for (i, line) in lines.into_iter().enumerate() {
                match i.cmp(&index) {
                    std::cmp::Ordering::Less => frame.pre_context.push(line),
                    std::cmp::Ordering::Equal => frame.context_line = line,
                    std::cmp::Ordering::Greater => frame.post_context.push(line),
                }
            }
        }

        Some(frame)
    }

    /// File name with the first matching source root stripped, or the
    /// absolute path when no root matches.
    fn relative_filename(&self, file: &Path) -> String {
        for root in &self.source_roots {
            if let Ok(relative) = file.strip_prefix(root) {
                return relative.display().to_string();
            }
        }
        file.display().to_string()
    }
}

impl Default for Collector {
    fn default() -> Self {
        Self::new()
    }
}
