//! # sidefx
//!
//! Side-effect inference for ECMAScript modules.
//!
//! Bundlers erase a module-level statement during tree-shaking only when they
//! can prove it has no observable side effect. This crate answers that
//! question for a single already-parsed, already-resolved module: given an
//! `oxc` AST and its `oxc_semantic` scope graph, it reports every statement,
//! call, and mutation whose side-effect-freedom cannot be proven, so a bundler
//! can treat the rest as safe to drop.
//!
//! ## Architecture
//!
//! ```text
//!        oxc_parser + oxc_semantic (host boundary)
//!                      ↓
//!              resolver::Resolver   — binding identity, write history
//!                      ↓
//!   dispatcher::Engine ←→ oracle::Oracle   — purity decisions
//!        ↓         ↓
//! call_analysis  param_flow   — callee classification, parameter flow
//!        ↓
//!   diagnostics::Sink  — collected in source order
//! ```
//!
//! The dispatcher is the sole driver: it walks every statement and
//! expression exactly once, consulting the resolver and oracle as pure
//! queries and emitting into the sink. There is no control-flow graph and no
//! mutable analysis state beyond the memoization caches in
//! [`context::AnalysisContext`] that bound re-entry of a given binding to
//! once per call mode (§4.2 of the design notes).

mod annotations;
mod builtins;
mod call_analysis;
mod config;
mod context;
mod diagnostics;
mod dispatcher;
mod error;
mod oracle;
mod param_flow;
mod resolver;

pub use config::{FunctionSelector, Options, PurityConfigEntry};
pub use diagnostics::{Diagnostic, Message};
pub use error::{EngineError, EngineResult};

use oxc_ast::Comment;
use oxc_ast::ast::Program;
use oxc_semantic::SymbolTable;

use annotations::CommentIndex;
use dispatcher::Engine;
use oracle::Oracle;
use resolver::Resolver;

/// Analyzes one already-parsed, already-resolved module and returns every
/// diagnostic in source order.
///
/// `program` and `source_text` must be the same parse the `symbols` table was
/// built from — this is a host invariant, not something this crate can check
/// (see [`EngineError`]). `comments` is the parser's leading/trailing comment
/// list for the same source, used to recognize `@__PURE__` markers and
/// `tree-shaking no-side-effects-when-called` directives (§6).
pub fn analyze<'a>(
    program: &'a Program<'a>,
    symbols: &SymbolTable,
    source_text: &'a str,
    comments: &'a [Comment],
    options: &Options,
) -> EngineResult<Vec<Diagnostic>> {
    let _span = tracing::debug_span!("analyze_module").entered();

    let resolver = Resolver::build(program, symbols);
    let comment_index = CommentIndex::new(source_text, comments);
    let oracle = Oracle::new(options, &comment_index);
    let mut engine = Engine::new(symbols, &resolver, &oracle);

    engine.report_effects_statements(&program.body)?;

    let diagnostics = engine.into_diagnostics();
    tracing::debug!(diagnostic_count = diagnostics.len(), "analysis complete");
    Ok(diagnostics)
}
