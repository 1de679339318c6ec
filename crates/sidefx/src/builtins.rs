//! The static ECMAScript built-in allow-list.
//!
//! This is the single source of truth for "globals known pure": a dotted path
//! not found here is impure by default, no matter how innocuous it looks.

use std::sync::LazyLock;

use rustc_hash::FxHashSet;

/// Dotted global paths known to be free of observable side effects when
/// called, e.g. `Object.keys`, `Math.floor`, `Array.isArray`.
///
/// Entries ending in `.*` match any property access on that namespace
/// (`Math.*` covers `Math.floor`, `Math.max`, ...).
pub static PURE_GLOBAL_CALLS: &[&str] = &[
    // Object
    "Object.keys",
    "Object.values",
    "Object.entries",
    "Object.assign",
    "Object.freeze",
    "Object.isFrozen",
    "Object.create",
    "Object.getPrototypeOf",
    "Object.getOwnPropertyNames",
    "Object.getOwnPropertyDescriptor",
    "Object.fromEntries",
    // Array
    "Array.isArray",
    "Array.from",
    "Array.of",
    // Math (all members are pure)
    "Math.*",
    // Number
    "Number.isInteger",
    "Number.isFinite",
    "Number.isNaN",
    "Number.isSafeInteger",
    "Number.parseFloat",
    "Number.parseInt",
    // String
    "String.fromCharCode",
    "String.fromCodePoint",
    "String.raw",
    // JSON
    "JSON.stringify",
    "JSON.parse",
    // Global functions
    "parseInt",
    "parseFloat",
    "isNaN",
    "isFinite",
    "encodeURIComponent",
    "decodeURIComponent",
    "encodeURI",
    "decodeURI",
    // Symbol
    "Symbol.for",
    "Symbol.keyFor",
];

static PURE_GLOBAL_CALL_SET: LazyLock<FxHashSet<&'static str>> =
    LazyLock::new(|| PURE_GLOBAL_CALLS.iter().copied().collect());

/// True if `dotted_path` (e.g. `"Math.floor"`) is on the static allow-list,
/// either as an exact match or via a `Namespace.*` wildcard entry.
pub fn is_pure_global_path(dotted_path: &str) -> bool {
    if PURE_GLOBAL_CALL_SET.contains(dotted_path) {
        return true;
    }
    if let Some((namespace, _member)) = dotted_path.split_once('.') {
        let wildcard = format!("{namespace}.*");
        if PURE_GLOBAL_CALL_SET.contains(wildcard.as_str()) {
            return true;
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_entries_match() {
        assert!(is_pure_global_path("Object.keys"));
        assert!(is_pure_global_path("Array.isArray"));
    }

    #[test]
    fn wildcard_namespace_matches_any_member() {
        assert!(is_pure_global_path("Math.floor"));
        assert!(is_pure_global_path("Math.random"));
    }

    #[test]
    fn unknown_path_is_impure() {
        assert!(!is_pure_global_path("Object.defineProperty"));
        assert!(!is_pure_global_path("console.log"));
    }
}
