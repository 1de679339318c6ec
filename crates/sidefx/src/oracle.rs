//! The purity oracle (§4.4): decides whether a callee is known side-effect
//! free, consulting four sources in a fixed priority order.

use oxc_span::Span;

use crate::annotations::CommentIndex;
use crate::builtins;
use crate::config::Options;
use crate::resolver::{ImportInfo, ImportedName};

/// Bundles the two static inputs every purity query needs: the user's
/// configuration and the comment index built once per analysis.
pub struct Oracle<'a, 'c> {
    options: &'c Options,
    comments: &'c CommentIndex<'a>,
}

impl<'a, 'c> Oracle<'a, 'c> {
    pub fn new(options: &'c Options, comments: &'c CommentIndex<'a>) -> Self {
        Self { options, comments }
    }

    /// Rule 1 + rule 4 (global half): is the dotted global path (e.g.
    /// `"Math.floor"`) on the static allow-list or user-configured as pure?
    pub fn is_global_path_pure(&self, dotted_path: &str) -> bool {
        builtins::is_pure_global_path(dotted_path)
            || self
                .options
                .no_side_effects_when_called
                .iter()
                .any(|entry| entry.matches_global_path(dotted_path))
    }

    /// Rule 2 + rule 4 (module half): is this import declared pure, either
    /// via user configuration or a `tree-shaking no-side-effects-when-called`
    /// comment on its declaration?
    pub fn is_import_pure(&self, import_info: &ImportInfo<'_>, declaration_span: Span) -> bool {
        let export_name: &str = match &import_info.imported_name {
            ImportedName::Named(name) => name.as_str(),
            ImportedName::Default => "default",
            ImportedName::Namespace => "*",
        };
        let configured = self.options.no_side_effects_when_called.iter().any(|entry| {
            entry.matches_module_export(import_info.module_specifier.as_str(), export_name)
        });
        configured || self.comments.has_no_side_effects_directive(declaration_span)
    }

    /// Rule 2 for any other declaration-shaped binding (a local function or
    /// variable whose declaration carries the domain directive).
    pub fn is_declaration_pure(&self, declaration_span: Span) -> bool {
        self.comments.has_no_side_effects_directive(declaration_span)
    }

    /// Rule 3: does the call expression itself carry a `@__PURE__` /
    /// `#__PURE__` marker? When true, this overrides everything else —
    /// the call is pure regardless of what the callee turns out to be.
    pub fn is_call_site_pure(&self, call_span: Span) -> bool {
        self.comments.has_pure_call_marker(call_span)
    }
}
