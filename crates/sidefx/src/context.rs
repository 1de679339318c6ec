//! The context threaded through every dispatcher operation (§3 "Context",
//! §4.2 "Termination").

use oxc_semantic::SymbolId;
use oxc_span::Span;
use rustc_hash::FxHashSet;

/// Identity of whatever is being re-entered under a call: either a named
/// binding (the common case — an identifier callee resolving to a local
/// variable or function) or a bare AST span (an anonymous function/class
/// expression reached through some other path, which has no `SymbolId`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum MemoKey {
    Symbol(SymbolId),
    Node(Span),
}

/// Per-analysis bookkeeping: the `hasValidThis`/`calledWithNew` flags
/// threaded through re-entry, plus the two "already re-entered" memo sets
/// (§4.2 Termination). One [`AnalysisContext`] exists per top-level
/// `analyze` call and is discarded at the end (§3 "Lifecycle").
///
/// The flags are conceptually an immutable record duplicated at each
/// re-entry, but the memo sets must stay genuinely shared across the whole
/// walk — two sibling re-entries of the same binding must see each other's
/// visits. Rather than clone a growing hash set at every recursive step, the
/// flags are saved and scoped-restored around the single context instance
/// threaded as `&mut` through the whole dispatcher.
pub struct AnalysisContext {
    has_valid_this: bool,
    called_with_new: bool,
    /// `(binding-or-node identity, calledWithNew)` pairs already re-entered
    /// under report-effects-when-called. Keyed on the pair directly, per the
    /// Design Notes, rather than maintaining two parallel sets.
    called_memo: FxHashSet<(MemoKey, bool)>,
    /// Bindings already re-entered under report-effects-when-mutated —
    /// mutation has no `calledWithNew` axis, so this is a plain symbol set.
    mutated_memo: FxHashSet<SymbolId>,
}

impl AnalysisContext {
    pub fn new() -> Self {
        Self {
            has_valid_this: false,
            called_with_new: false,
            called_memo: FxHashSet::default(),
            mutated_memo: FxHashSet::default(),
        }
    }

    pub fn has_valid_this(&self) -> bool {
        self.has_valid_this
    }

    pub fn called_with_new(&self) -> bool {
        self.called_with_new
    }

    /// Overrides `hasValidThis`, returning the previous value to restore
    /// after the caller's recursive dispatch extent completes.
    pub fn set_valid_this(&mut self, has_valid_this: bool) -> bool {
        std::mem::replace(&mut self.has_valid_this, has_valid_this)
    }

    /// Overrides `calledWithNew`, returning the previous value to restore
    /// after the caller's recursive dispatch extent completes.
    pub fn set_called_with_new(&mut self, called_with_new: bool) -> bool {
        std::mem::replace(&mut self.called_with_new, called_with_new)
    }

    /// Marks `symbol_id` as re-entered under the current `calledWithNew`
    /// mode. Returns `true` if this is the first re-entry (the caller should
    /// proceed), `false` if it was already visited (the caller should skip).
    pub fn enter_call_on_symbol(&mut self, symbol_id: SymbolId) -> bool {
        self.called_memo
            .insert((MemoKey::Symbol(symbol_id), self.called_with_new))
    }

    /// Same as [`Self::enter_call_on_symbol`] but for callees with no stable
    /// binding identity (anonymous function/class expressions), keyed on
    /// their own span instead.
    pub fn enter_call_on_node(&mut self, span: Span) -> bool {
        self.called_memo
            .insert((MemoKey::Node(span), self.called_with_new))
    }

    pub fn enter_mutation(&mut self, symbol_id: SymbolId) -> bool {
        self.mutated_memo.insert(symbol_id)
    }
}

impl Default for AnalysisContext {
    fn default() -> Self {
        Self::new()
    }
}
