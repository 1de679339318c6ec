//! Host-invariant violations.
//!
//! Everything the engine can say about the *analyzed module* is a [`crate::Diagnostic`],
//! never an [`EngineError`]. An `EngineError` only fires when the caller-supplied
//! AST/scope graph itself violates a precondition this engine relies on -- a bug in
//! the host, not in the module under analysis.

use oxc_span::Span;

/// The three host-invariant violations this engine distinguishes from ordinary
/// analysis output. See the component design notes on error handling.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// A function/arrow/class node reached the engine with no scope attached,
    /// i.e. semantic analysis did not run (or ran against a different tree) before
    /// the node was handed to this crate.
    #[error("node at {node_span:?} has no attached scope; was semantic analysis run on this AST?")]
    MissingChildScope { node_span: Span },

    /// A call-expression callee did not match any of the forms enumerated for call
    /// analysis. This indicates a parser/grammar version the engine does not yet
    /// cover.
    #[error("call expression at {node_span:?} has a callee kind this engine does not handle: {kind}")]
    UnhandledCalleeKind { node_span: Span, kind: &'static str },

    /// An assignment target's root expression was neither `Identifier`,
    /// `MemberExpression`, nor `ThisExpression`.
    #[error("assignment at {node_span:?} has a target root this engine does not handle")]
    InvalidAssignmentTargetRoot { node_span: Span },
}

/// Result type for the engine's public entry points.
pub type EngineResult<T> = Result<T, EngineError>;
