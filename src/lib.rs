//! Call stack capture with source context for error reporting clients.
//!
//! This crate turns the calling thread's stack into a serializable
//! [`Stacktrace`]: frames ordered oldest to newest, each carrying its
//! module, function, file names, line number, a window of surrounding
//! source lines, and an in-app classification driven by the caller's list
//! of application module prefixes.
//!
//! Capture is best effort. An unreadable source file leaves a frame
//! without context, an unresolvable frame ends the walk, and a skip past
//! the end of the stack yields `None`; nothing in the capture path panics
//! or returns an error, so it is safe to call from an error handler that
//! must not fail.
//!
//! ```
//! use stackshot::Collector;
//!
//! let collector = Collector::new();
//! if let Some(trace) = collector.capture(0, 2, &["my_app".to_string()]) {
//!     println!("culprit: {}", trace.culprit());
//! }
//! ```

mod collector;
mod frame;
mod resolver;
mod source;
mod symbols;

pub use collector::Collector;
pub use frame::{Frame, Stacktrace};
pub use resolver::{FrameResolver, NativeResolver, ResolvedFrame};
pub use source::SourceCache;
pub use symbols::{is_in_app, split_symbol};
