//! End to end captures of the live test stack.
//!
//! These tests exercise the native resolver, so they only assert
//! properties that hold regardless of how the platform symbolizes this
//! binary: frame ordering, the innermost frame's identity, and cache
//! behavior. Exact frame contents are covered by unit tests against a
//! deterministic resolver.

use stackshot::{Collector, Stacktrace};

#[inline(never)]
fn trace(collector: &Collector, app_packages: &[String]) -> Option<Stacktrace> {
    collector.capture(0, 2, app_packages)
}

#[test]
fn test_capture_yields_frames() {
    let collector = Collector::new();
    let stacktrace = trace(&collector, &[]).expect("live capture");

    let innermost = stacktrace.frames().last().expect("at least one frame");
    assert_eq!(innermost.function, "trace");
    assert!(
        innermost
            .absolute_path
            .ends_with("capture_integration_tests.rs"),
        "unexpected path: {}",
        innermost.absolute_path
    );
    assert!(innermost.line_number > 0);

    let mut window = innermost.pre_context.clone();
    window.push(innermost.context_line.clone());
    window.extend(innermost.post_context.iter().cloned());
    assert!(
        window.join("\n").contains("capture(0, 2"),
        "capture call not in context window: {window:?}"
    );
}

#[test]
fn test_skip_beyond_stack_returns_none() {
    let collector = Collector::new();
    assert!(collector.capture(999_999, 0, &[]).is_none());
}

#[test]
fn test_culprit_tracks_app_package() {
    let collector = Collector::new();

    // Learn this test's own module name from a bootstrap capture, then
    // classify against it.
    let bootstrap = collector.capture(0, 0, &[]).expect("live capture");
    let module = bootstrap
        .frames()
        .last()
        .expect("at least one frame")
        .module
        .clone();
    assert!(!module.is_empty());

    let stacktrace = collector.capture(0, 0, &[module]).expect("live capture");
    let innermost = stacktrace.frames().last().expect("at least one frame");
    assert!(innermost.in_app);
    assert_eq!(
        stacktrace.culprit(),
        format!("{}.{}", innermost.module, innermost.function)
    );
}

#[test]
fn test_context_disabled_reads_no_files() {
    let collector = Collector::new();
    collector.capture(0, 0, &[]).expect("live capture");
    assert!(collector.source_cache().is_empty());
}

#[test]
fn test_repeat_captures_reuse_cache() {
    let collector = Collector::new();

    collector.capture(0, 1, &[]).expect("live capture");
    let after_first = collector.source_cache().len();
    assert!(after_first > 0);

    collector.capture(0, 1, &[]).expect("live capture");
    assert_eq!(collector.source_cache().len(), after_first);
}

#[test]
fn test_concurrent_captures_share_collector() {
    let collector = Collector::new();

    std::thread::scope(|scope| {
        for _ in 0..4 {
            scope.spawn(|| {
                let stacktrace = collector.capture(0, 1, &[]);
                assert!(stacktrace.is_some());
            });
        }
    });
}

#[test]
fn test_payload_serializes() {
    let collector = Collector::new();
    let stacktrace = trace(&collector, &[]).expect("live capture");

    let value = serde_json::to_value(&stacktrace).expect("serialize");
    let frames = value["frames"].as_array().expect("frames array");
    let innermost = frames.last().expect("at least one frame");
    assert_eq!(innermost["function"], "trace");
    assert!(innermost["line_number"].as_u64().expect("line_number") > 0);
}
