//! Parameter-flow analysis (§4.3): for each parameter of a re-entered
//! function/arrow body, does the body call it (or a `const`-aliased copy of
//! it), or mutate a property reached through it — and if so, which argument
//! expression at the triggering call site supplied that value.

use oxc_ast::ast::*;
use oxc_semantic::SymbolId;
use oxc_span::{GetSpan, Span};
use rustc_hash::{FxHashMap, FxHashSet};

use crate::diagnostics::Message;
use crate::dispatcher::Engine;
use crate::error::EngineResult;

impl<'a, 'c> Engine<'a, 'c> {
    /// Scans `body` for calls/mutations routed through `params`, reporting
    /// *calling-parameter* / *mutating-parameter* at the argument expression
    /// from `arguments` that supplied the flagged parameter's value. Only
    /// plain identifier parameters are tracked — destructuring-bound
    /// parameters are already opaque (`BindingKind::Destructured`) and carry
    /// no useful flow here.
    pub(crate) fn analyze_parameter_flow(
        &mut self,
        params: &FormalParameters<'a>,
        body: &FunctionBody<'a>,
        arguments: &[Argument<'a>],
    ) -> EngineResult<()> {
        let mut tracked: FxHashMap<SymbolId, Span> = FxHashMap::default();
        for (index, param) in params.items.iter().enumerate() {
            let BindingPatternKind::BindingIdentifier(ident) = &param.pattern.kind else {
                continue;
            };
            let Some(symbol_id) = ident.symbol_id.get() else {
                continue;
            };
            let Some(arg_span) = arguments.get(index).and_then(argument_span) else {
                continue;
            };
            tracked.insert(symbol_id, arg_span);
        }
        if tracked.is_empty() {
            return Ok(());
        }

        let mut scanner = ParamFlowScanner {
            symbols: self.symbols,
            roots: tracked.keys().copied().collect(),
            aliases: FxHashMap::default(),
            called: FxHashSet::default(),
            mutated: FxHashSet::default(),
        };
        scanner.visit_statements(&body.statements);

        for symbol_id in &scanner.called {
            if let Some(arg_span) = tracked.get(symbol_id) {
                self.sink.report(*arg_span, Message::CallingParameter);
            }
        }
        for symbol_id in &scanner.mutated {
            if let Some(arg_span) = tracked.get(symbol_id) {
                self.sink.report(*arg_span, Message::MutatingParameter);
            }
        }
        Ok(())
    }
}

fn argument_span(argument: &Argument<'_>) -> Option<Span> {
    match argument {
        Argument::SpreadElement(_) => None,
        expr => expr.as_expression().map(GetSpan::span),
    }
}

/// A narrow, shallow walk — it finds calls/mutations reachable through
/// statement and the common expression forms, mirroring the binder's own
/// scope-narrowing tradeoff (see `resolver::Binder`): it does not recurse
/// into every expression kind, only the ones a parameter's value plausibly
/// flows through before being called or mutated.
struct ParamFlowScanner<'s> {
    symbols: &'s oxc_semantic::SymbolTable,
    /// Parameter symbols under observation, plus any symbol later proven to
    /// alias one of them via `const b = a`.
    roots: FxHashSet<SymbolId>,
    /// Alias symbol -> the root parameter symbol it was assigned from.
    aliases: FxHashMap<SymbolId, SymbolId>,
    called: FxHashSet<SymbolId>,
    mutated: FxHashSet<SymbolId>,
}

impl<'s> ParamFlowScanner<'s> {
    fn resolve_root(&self, symbol_id: SymbolId) -> SymbolId {
        self.aliases.get(&symbol_id).copied().unwrap_or(symbol_id)
    }

    fn reference_root(&self, ident: &IdentifierReference<'_>) -> Option<SymbolId> {
        let symbol_id = self.symbols.get_reference(ident.reference_id()).symbol_id()?;
        let root = self.resolve_root(symbol_id);
        self.roots.contains(&root).then_some(root)
    }

    fn visit_statements(&mut self, statements: &[Statement<'_>]) {
        for statement in statements {
            self.visit_statement(statement);
        }
    }

    fn visit_statement(&mut self, statement: &Statement<'_>) {
        match statement {
            Statement::VariableDeclaration(decl) => {
                for declarator in &decl.declarations {
                    if let (BindingPatternKind::BindingIdentifier(alias_ident), Some(init)) =
                        (&declarator.id.kind, &declarator.init)
                    {
                        if let Expression::Identifier(rhs_ident) = init {
                            if let Some(root) = self.reference_root(rhs_ident) {
                                if let Some(alias_symbol) = alias_ident.symbol_id.get() {
                                    self.aliases.insert(alias_symbol, root);
                                }
                            }
                        }
                        self.visit_expression(init);
                    } else if let Some(init) = &declarator.init {
                        self.visit_expression(init);
                    }
                }
            }
            Statement::ExpressionStatement(s) => self.visit_expression(&s.expression),
            Statement::BlockStatement(s) => self.visit_statements(&s.body),
            Statement::IfStatement(s) => {
                self.visit_expression(&s.test);
                self.visit_statement(&s.consequent);
                if let Some(alternate) = &s.alternate {
                    self.visit_statement(alternate);
                }
            }
            Statement::ForStatement(s) => {
                if let Some(ForStatementInit::VariableDeclaration(decl)) = &s.init {
                    for declarator in &decl.declarations {
                        if let Some(init) = &declarator.init {
                            self.visit_expression(init);
                        }
                    }
                }
                if let Some(test) = &s.test {
                    self.visit_expression(test);
                }
                if let Some(update) = &s.update {
                    self.visit_expression(update);
                }
                self.visit_statement(&s.body);
            }
            Statement::ForOfStatement(s) => self.visit_statement(&s.body),
            Statement::ForInStatement(s) => self.visit_statement(&s.body),
            Statement::WhileStatement(s) => {
                self.visit_expression(&s.test);
                self.visit_statement(&s.body);
            }
            Statement::DoWhileStatement(s) => {
                self.visit_statement(&s.body);
                self.visit_expression(&s.test);
            }
            Statement::TryStatement(s) => {
                self.visit_statements(&s.block.body);
                if let Some(handler) = &s.handler {
                    self.visit_statements(&handler.body.body);
                }
                if let Some(finalizer) = &s.finalizer {
                    self.visit_statements(&finalizer.body);
                }
            }
            Statement::SwitchStatement(s) => {
                for case in &s.cases {
                    self.visit_statements(&case.consequent);
                }
            }
            Statement::ReturnStatement(s) => {
                if let Some(arg) = &s.argument {
                    self.visit_expression(arg);
                }
            }
            Statement::LabeledStatement(s) => self.visit_statement(&s.body),
            Statement::ThrowStatement(s) => self.visit_expression(&s.argument),
            _ => {}
        }
    }

    fn visit_expression(&mut self, expr: &Expression<'_>) {
        match expr {
            Expression::CallExpression(call) => {
                if let Expression::Identifier(ident) = &call.callee {
                    if let Some(root) = self.reference_root(ident) {
                        self.called.insert(root);
                    }
                } else {
                    self.visit_expression(&call.callee);
                }
                for arg in &call.arguments {
                    if let Some(expr) = arg.as_expression() {
                        self.visit_expression(expr);
                    }
                }
            }
            Expression::NewExpression(call) => {
                self.visit_expression(&call.callee);
                for arg in &call.arguments {
                    if let Some(expr) = arg.as_expression() {
                        self.visit_expression(expr);
                    }
                }
            }
            Expression::AssignmentExpression(assignment) => {
                self.visit_expression(&assignment.right);
                self.visit_mutated_target_member(&assignment.left);
            }
            Expression::UpdateExpression(update) => {
                self.visit_mutated_target_member(&update.argument);
            }
            Expression::UnaryExpression(unary) if unary.operator == UnaryOperator::Delete => {
                self.visit_mutated_member_expr(&unary.argument);
            }
            Expression::StaticMemberExpression(member) => self.visit_expression(&member.object),
            Expression::ComputedMemberExpression(member) => {
                self.visit_expression(&member.object);
                self.visit_expression(&member.expression);
            }
            Expression::BinaryExpression(e) => {
                self.visit_expression(&e.left);
                self.visit_expression(&e.right);
            }
            Expression::LogicalExpression(e) => {
                self.visit_expression(&e.left);
                self.visit_expression(&e.right);
            }
            Expression::ConditionalExpression(e) => {
                self.visit_expression(&e.test);
                self.visit_expression(&e.consequent);
                self.visit_expression(&e.alternate);
            }
            Expression::SequenceExpression(e) => {
                for expr in &e.expressions {
                    self.visit_expression(expr);
                }
            }
            Expression::ParenthesizedExpression(e) => self.visit_expression(&e.expression),
            Expression::AwaitExpression(e) => self.visit_expression(&e.argument),
            Expression::UnaryExpression(e) => self.visit_expression(&e.argument),
            _ => {}
        }
    }

    fn visit_mutated_target_member(&mut self, target: &AssignmentTarget<'_>) {
        match target {
            AssignmentTarget::StaticMemberExpression(member) => {
                self.visit_mutated_member_root(&member.object);
            }
            AssignmentTarget::ComputedMemberExpression(member) => {
                self.visit_mutated_member_root(&member.object);
                self.visit_expression(&member.expression);
            }
            AssignmentTarget::PrivateFieldExpression(member) => {
                self.visit_mutated_member_root(&member.object);
            }
            _ => {}
        }
    }

    fn visit_mutated_member_expr(&mut self, expr: &Expression<'_>) {
        match expr {
            Expression::StaticMemberExpression(member) => self.visit_mutated_member_root(&member.object),
            Expression::ComputedMemberExpression(member) => self.visit_mutated_member_root(&member.object),
            Expression::PrivateFieldExpression(member) => self.visit_mutated_member_root(&member.object),
            _ => {}
        }
    }

    fn visit_mutated_member_root(&mut self, object: &Expression<'_>) {
        if let Expression::Identifier(ident) = object {
            if let Some(root) = self.reference_root(ident) {
                self.mutated.insert(root);
            }
        }
    }
}
