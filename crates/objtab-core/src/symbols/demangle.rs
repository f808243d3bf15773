//! Symbol name cleanup.
//!
//! The report is requested with demangling enabled, but older binutils
//! releases only understand the Itanium scheme and print Rust v0 names
//! (`_R...`) verbatim. Those go through `rustc-demangle` here. The hash
//! suffix is dropped with the alternate formatter so names stay comparable
//! across builds.

use rustc_demangle::try_demangle;

/// Marker the tool prepends to hidden-visibility names.
pub(crate) const HIDDEN_PREFIX: &str = ".hidden";

/// Strip the hidden marker from a trimmed name.
///
/// Returns the remaining name and whether the marker was present.
pub(crate) fn strip_hidden(name: &str) -> (&str, bool)
{
    match name.strip_prefix(HIDDEN_PREFIX) {
        Some(rest) if rest.is_empty() || rest.starts_with(char::is_whitespace) => (rest.trim(), true),
        _ => (name, false),
    }
}

/// Demangle names the tool left mangled; everything else passes through.
pub(crate) fn normalize_name(name: &str) -> String
{
    if name.starts_with("_R") {
        if let Ok(demangled) = try_demangle(name) {
            return format!("{demangled:#}");
        }
    }
    name.to_string()
}
