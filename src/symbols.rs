//! Symbol classification: module/function splitting and the in-app policy.
//!
//! Raw symbols arrive in one of two conventions: slash/dot qualified paths
//! as Go-style runtimes report them (`github.com/org/pkg.Func`,
//! `pkg.(*Type).Method`) and demangled `::` paths (`app::handlers::process`).
//! The split rules are heuristic and deliberately stable. Reporting
//! consumers key on this exact convention, so favor the known split over
//! semantic cleverness.

/// Module substrings marking vendored or third-party code. A module
/// containing one of these is never in-app, regardless of prefix matches.
const VENDORED_MARKERS: &[&str] = &["vendor", "third_party"];

/// Split a fully qualified symbol into `(module, function)`.
///
/// `::`-qualified symbols split at the last `::`, keeping any type or trait
/// path inside the module. Slash/dot symbols treat everything before the
/// first `.` of the last path element as the module's final segment;
/// later dots stay in the function, so method-on-type notation like
/// `pkg.(*Type).Method` keeps `(*Type).Method` intact. A symbol with no
/// separator at all (malformed or empty input) yields two empty strings.
pub fn split_symbol(raw: &str) -> (String, String) {
    if let Some(idx) = raw.rfind("::") {
        return (raw[..idx].to_string(), raw[idx + 2..].to_string());
    }

    let (prefix, last) = match raw.rfind('/') {
        Some(idx) => raw.split_at(idx + 1),
        None => ("", raw),
    };
    match last.find('.') {
        Some(dot) => (
            format!("{prefix}{}", &last[..dot]),
            last[dot + 1..].to_string(),
        ),
        None => (String::new(), String::new()),
    }
}

/// Whether a frame with this module counts as application code.
///
/// True iff `module` starts with one of the caller-supplied application
/// package prefixes and does not contain a vendoring marker. An empty
/// module matches nothing unless the caller explicitly supplies an empty
/// prefix.
pub fn is_in_app(module: &str, app_packages: &[String]) -> bool {
    if VENDORED_MARKERS.iter().any(|marker| module.contains(marker)) {
        return false;
    }
    app_packages
        .iter()
        .any(|package| module.starts_with(package.as_str()))
}
