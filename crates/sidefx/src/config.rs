//! User-supplied purity configuration.
//!
//! The host loads this from whatever config surface it owns (JSON, TOML, a
//! `package.json` field, ...); this crate only defines and consumes the
//! resulting struct, never touching disk itself.

use serde::Deserialize;

/// The sentinel `module` value matching any relative/local specifier, as
/// opposed to a bare package name.
pub const LOCAL_MODULE_SENTINEL: &str = "#local";

/// Entry-point options recognized by the engine.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Options {
    /// User-declared purity entries, consulted after the static allow-list
    /// and the inline comment markers (§4.4 decision order).
    pub no_side_effects_when_called: Vec<PurityConfigEntry>,
}

/// One user-configured purity entry.
///
/// Either a single dotted global function path, or a module specifier paired
/// with the export names (or `*`) considered pure when called.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", untagged)]
pub enum PurityConfigEntry {
    /// `{ "function": "some.dotted.path" }` — matches a global.
    Global { function: String },
    /// `{ "module": "lodash-es", "functions": "*" }` or
    /// `{ "module": "#local", "functions": ["identity"] }`.
    Module {
        module: String,
        functions: FunctionSelector,
    },
}

/// Either every export of a module (`"*"`) or an explicit set of names.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum FunctionSelector {
    All(AllMarker),
    Named(Vec<String>),
}

/// Deserializes only from the literal string `"*"`.
#[derive(Debug, Clone)]
pub struct AllMarker;

impl<'de> Deserialize<'de> for AllMarker {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        if s == "*" {
            Ok(AllMarker)
        } else {
            Err(serde::de::Error::custom(format!(
                "expected the wildcard string \"*\", found {s:?}"
            )))
        }
    }
}

impl PurityConfigEntry {
    /// Whether this entry authorizes calling `name` exported from `module`
    /// (or, for [`PurityConfigEntry::Global`], whether it authorizes the
    /// dotted global path `module` — `name` is ignored in that case).
    pub fn matches_module_export(&self, module_specifier: &str, export_name: &str) -> bool {
        match self {
            PurityConfigEntry::Global { .. } => false,
            PurityConfigEntry::Module { module, functions } => {
                let module_matches = module == module_specifier
                    || (module == LOCAL_MODULE_SENTINEL && is_relative_specifier(module_specifier));
                if !module_matches {
                    return false;
                }
                match functions {
                    FunctionSelector::All(_) => true,
                    FunctionSelector::Named(names) => names.iter().any(|n| n == export_name),
                }
            }
        }
    }

    pub fn matches_global_path(&self, dotted_path: &str) -> bool {
        matches!(self, PurityConfigEntry::Global { function } if function == dotted_path)
    }
}

fn is_relative_specifier(specifier: &str) -> bool {
    specifier.starts_with("./") || specifier.starts_with("../") || specifier.starts_with('/')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_global_entry() {
        let json = r#"{"noSideEffectsWhenCalled":[{"function":"lodash.noop"}]}"#;
        let opts: Options = serde_json::from_str(json).unwrap();
        assert_eq!(opts.no_side_effects_when_called.len(), 1);
        assert!(opts.no_side_effects_when_called[0].matches_global_path("lodash.noop"));
    }

    #[test]
    fn deserializes_module_wildcard_entry() {
        let json = r#"{"noSideEffectsWhenCalled":[{"module":"lodash-es","functions":"*"}]}"#;
        let opts: Options = serde_json::from_str(json).unwrap();
        assert!(opts.no_side_effects_when_called[0].matches_module_export("lodash-es", "identity"));
    }

    #[test]
    fn deserializes_local_sentinel() {
        let json = r#"{"noSideEffectsWhenCalled":[{"module":"#local","functions":["identity"]}]}"#;
        let opts: Options = serde_json::from_str(json).unwrap();
        assert!(opts.no_side_effects_when_called[0].matches_module_export("./utils", "identity"));
        assert!(!opts.no_side_effects_when_called[0].matches_module_export("./utils", "other"));
    }

    #[test]
    fn default_options_has_empty_allow_list() {
        let opts = Options::default();
        assert!(opts.no_side_effects_when_called.is_empty());
    }
}
