//! The dispatcher (§4.1): the sole driver of an analysis, exposing the three
//! operations every other component is consulted from.
//!
//! `report_effects_when_called` and the call-site classification behind it
//! live in [`crate::call_analysis`]; parameter-flow bookkeeping lives in
//! [`crate::param_flow`]. All three share this module's [`Engine`] receiver
//! rather than dispatching dynamically — the Design Notes call for "three
//! functions sharing a `&mut Context`", which in this crate is three `impl
//! Engine` blocks across three files.

use oxc_ast::ast::*;
use oxc_semantic::SymbolTable;
use oxc_span::GetSpan;

use crate::context::AnalysisContext;
use crate::diagnostics::{Message, Sink};
use crate::error::{EngineError, EngineResult};
use crate::oracle::Oracle;
use crate::resolver::{Binding, Resolver};

/// Owns everything a single `analyze()` call needs: the resolved write
/// history, the purity oracle, the diagnostic sink, and the mutable
/// call/mutation context. Constructed once per top-level analysis and
/// threaded by `&mut self` through every recursive dispatch.
pub struct Engine<'a, 'c> {
    pub(crate) symbols: &'c SymbolTable,
    pub(crate) resolver: &'c Resolver<'a>,
    pub(crate) oracle: &'c Oracle<'a, 'c>,
    pub(crate) sink: Sink,
    pub(crate) ctx: AnalysisContext,
}

impl<'a, 'c> Engine<'a, 'c> {
    pub fn new(symbols: &'c SymbolTable, resolver: &'c Resolver<'a>, oracle: &'c Oracle<'a, 'c>) -> Self {
        Self {
            symbols,
            resolver,
            oracle,
            sink: Sink::new(),
            ctx: AnalysisContext::new(),
        }
    }

    pub fn into_diagnostics(self) -> Vec<crate::diagnostics::Diagnostic> {
        self.sink.into_diagnostics()
    }

    /// **report-effects(n)** — §4.1. Emits diagnostics for observable
    /// effects produced by evaluating `n` as written, recursing into every
    /// child the grammar table lists.
    pub fn report_effects_statement(&mut self, stmt: &Statement<'a>) -> EngineResult<()> {
        match stmt {
            Statement::ExpressionStatement(s) => self.report_effects_expr(&s.expression),
            Statement::BlockStatement(s) => self.report_effects_statements(&s.body),
            Statement::VariableDeclaration(decl) => {
                for declarator in &decl.declarations {
                    if let Some(init) = &declarator.init {
                        self.report_effects_expr(init)?;
                    }
                }
                Ok(())
            }
            Statement::IfStatement(s) => {
                self.report_effects_expr(&s.test)?;
                match literal_truthiness(&s.test) {
                    Some(true) => self.report_effects_statement(&s.consequent),
                    Some(false) => {
                        if let Some(alt) = &s.alternate {
                            self.report_effects_statement(alt)
                        } else {
                            Ok(())
                        }
                    }
                    None => {
                        self.report_effects_statement(&s.consequent)?;
                        if let Some(alt) = &s.alternate {
                            self.report_effects_statement(alt)?;
                        }
                        Ok(())
                    }
                }
            }
            Statement::ForStatement(s) => {
                if let Some(init) = &s.init {
                    if let ForStatementInit::VariableDeclaration(decl) = init {
                        for declarator in &decl.declarations {
                            if let Some(expr) = &declarator.init {
                                self.report_effects_expr(expr)?;
                            }
                        }
                    } else if let Some(expr) = init.as_expression() {
                        self.report_effects_expr(expr)?;
                    }
                }
                if let Some(test) = &s.test {
                    self.report_effects_expr(test)?;
                }
                if let Some(update) = &s.update {
                    self.report_effects_expr(update)?;
                }
                self.report_effects_statement(&s.body)
            }
            Statement::ForOfStatement(s) => {
                if !is_spread_free_array_literal(&s.right) {
                    self.sink.report(s.right.span(), Message::IteratingOverIterable);
                }
                self.report_effects_expr(&s.right)?;
                self.report_effects_statement(&s.body)
            }
            Statement::ForInStatement(s) => {
                self.report_effects_expr(&s.right)?;
                self.report_effects_statement(&s.body)
            }
            Statement::WhileStatement(s) => {
                self.report_effects_expr(&s.test)?;
                self.report_effects_statement(&s.body)
            }
            Statement::DoWhileStatement(s) => {
                self.report_effects_statement(&s.body)?;
                self.report_effects_expr(&s.test)
            }
            Statement::TryStatement(s) => {
                self.report_effects_statements(&s.block.body)?;
                if let Some(handler) = &s.handler {
                    self.report_effects_statements(&handler.body.body)?;
                }
                if let Some(finalizer) = &s.finalizer {
                    self.report_effects_statements(&finalizer.body)?;
                }
                Ok(())
            }
            Statement::SwitchStatement(s) => {
                self.report_effects_expr(&s.discriminant)?;
                for case in &s.cases {
                    if let Some(test) = &case.test {
                        self.report_effects_expr(test)?;
                    }
                    self.report_effects_statements(&case.consequent)?;
                }
                Ok(())
            }
            Statement::ThrowStatement(s) => {
                self.sink.report(s.span, Message::Throwing);
                self.report_effects_expr(&s.argument)
            }
            Statement::DebuggerStatement(s) => {
                self.sink.report(s.span, Message::Debugger);
                Ok(())
            }
            Statement::ReturnStatement(s) => {
                if let Some(arg) = &s.argument {
                    self.report_effects_expr(arg)?;
                }
                Ok(())
            }
            Statement::LabeledStatement(s) => self.report_effects_statement(&s.body),
            Statement::FunctionDeclaration(_) => {
                // Function declarations have no effect at the position they
                // appear; their bodies only run when called.
                Ok(())
            }
            Statement::ClassDeclaration(class) => {
                // Unlike a function declaration, a class declaration's
                // superclass expression and computed member keys evaluate
                // immediately (§4.1); only field initializers wait for `new`.
                self.report_effects_class(class)
            }
            Statement::ExportNamedDeclaration(s) => {
                if let Some(decl) = &s.declaration {
                    self.report_effects_declaration(decl)
                } else {
                    Ok(())
                }
            }
            Statement::ExportDefaultDeclaration(s) => match &s.declaration {
                ExportDefaultDeclarationKind::Expression(expr) => self.report_effects_expr(expr),
                ExportDefaultDeclarationKind::ClassDeclaration(class) => self.report_effects_class(class),
                _ => Ok(()),
            },
            _ => Ok(()),
        }
    }

    fn report_effects_declaration(&mut self, decl: &Declaration<'a>) -> EngineResult<()> {
        match decl {
            Declaration::VariableDeclaration(decl) => {
                for declarator in &decl.declarations {
                    if let Some(init) = &declarator.init {
                        self.report_effects_expr(init)?;
                    }
                }
                Ok(())
            }
            Declaration::ClassDeclaration(class) => self.report_effects_class(class),
            // Function declarations have no effect at the position they
            // appear, exported or not.
            Declaration::FunctionDeclaration(_) => Ok(()),
            _ => Ok(()),
        }
    }

    pub fn report_effects_statements(&mut self, statements: &[Statement<'a>]) -> EngineResult<()> {
        for statement in statements {
            self.report_effects_statement(statement)?;
        }
        Ok(())
    }

    pub fn report_effects_expr(&mut self, expr: &Expression<'a>) -> EngineResult<()> {
        match expr {
            Expression::BooleanLiteral(_)
            | Expression::NumericLiteral(_)
            | Expression::StringLiteral(_)
            | Expression::NullLiteral(_)
            | Expression::BigIntLiteral(_)
            | Expression::RegExpLiteral(_)
            | Expression::Identifier(_)
            | Expression::FunctionExpression(_)
            | Expression::ArrowFunctionExpression(_)
            | Expression::ThisExpression(_)
            | Expression::MetaProperty(_) => Ok(()),

            Expression::AssignmentExpression(e) => self.report_effects_assignment(e),
            Expression::UpdateExpression(e) => self.report_effects_update(e),

            Expression::CallExpression(e) => {
                for arg in &e.arguments {
                    if let Some(arg_expr) = arg.as_expression() {
                        self.report_effects_expr(arg_expr)?;
                    }
                }
                self.analyze_call(&e.callee, e.span, false, &e.arguments)
            }
            Expression::NewExpression(e) => {
                for arg in &e.arguments {
                    if let Some(arg_expr) = arg.as_expression() {
                        self.report_effects_expr(arg_expr)?;
                    }
                }
                self.analyze_call(&e.callee, e.span, true, &e.arguments)
            }
            Expression::TaggedTemplateExpression(e) => {
                for expr in &e.quasi.expressions {
                    self.report_effects_expr(expr)?;
                }
                self.analyze_call(&e.tag, e.span, false, &[])
            }

            Expression::BinaryExpression(e) => {
                self.report_effects_expr(&e.left)?;
                self.report_effects_expr(&e.right)
            }
            Expression::LogicalExpression(e) => {
                match literal_truthiness(&e.left) {
                    Some(true) if matches!(e.operator, LogicalOperator::And) => {
                        self.report_effects_expr(&e.left)?;
                        self.report_effects_expr(&e.right)
                    }
                    Some(false) if matches!(e.operator, LogicalOperator::Or) => {
                        self.report_effects_expr(&e.left)?;
                        self.report_effects_expr(&e.right)
                    }
                    Some(_) => self.report_effects_expr(&e.left),
                    None => {
                        self.report_effects_expr(&e.left)?;
                        self.report_effects_expr(&e.right)
                    }
                }
            }
            Expression::SequenceExpression(e) => {
                for expr in &e.expressions {
                    self.report_effects_expr(expr)?;
                }
                Ok(())
            }
            Expression::ConditionalExpression(e) => {
                self.report_effects_expr(&e.test)?;
                match literal_truthiness(&e.test) {
                    Some(true) => self.report_effects_expr(&e.consequent),
                    Some(false) => self.report_effects_expr(&e.alternate),
                    None => {
                        self.report_effects_expr(&e.consequent)?;
                        self.report_effects_expr(&e.alternate)
                    }
                }
            }
            Expression::TemplateLiteral(e) => {
                for expr in &e.expressions {
                    self.report_effects_expr(expr)?;
                }
                Ok(())
            }

            Expression::AwaitExpression(e) => self.report_effects_expr(&e.argument),
            Expression::YieldExpression(e) => {
                if let Some(arg) = &e.argument {
                    self.report_effects_expr(arg)?;
                }
                Ok(())
            }
            Expression::UnaryExpression(e) => {
                if matches!(e.operator, UnaryOperator::Delete) {
                    self.report_effects_delete(&e.argument)
                } else {
                    self.report_effects_expr(&e.argument)
                }
            }

            Expression::ArrayExpression(e) => {
                for element in &e.elements {
                    if let Some(expr) = element.as_expression() {
                        self.report_effects_expr(expr)?;
                    }
                }
                Ok(())
            }
            Expression::ObjectExpression(e) => {
                for property in &e.properties {
                    match property {
                        ObjectPropertyKind::ObjectProperty(prop) => {
                            if prop.computed {
                                if let Some(key_expr) = prop.key.as_expression() {
                                    self.report_effects_expr(key_expr)?;
                                }
                            }
                            self.report_effects_expr(&prop.value)?;
                        }
                        ObjectPropertyKind::SpreadProperty(spread) => {
                            self.report_effects_expr(&spread.argument)?;
                        }
                    }
                }
                Ok(())
            }

            Expression::ClassExpression(class) => self.report_effects_class(class),

            Expression::ParenthesizedExpression(e) => self.report_effects_expr(&e.expression),

            Expression::StaticMemberExpression(e) => self.report_effects_expr(&e.object),
            Expression::ComputedMemberExpression(e) => {
                self.report_effects_expr(&e.object)?;
                self.report_effects_expr(&e.expression)
            }
            Expression::PrivateFieldExpression(e) => self.report_effects_expr(&e.object),

            // JSX: uppercase-starting names are treated as component
            // construction; recurse into attributes/children either way.
            Expression::JSXElement(e) => self.report_effects_jsx_element(e),
            Expression::JSXFragment(e) => {
                for child in &e.children {
                    self.report_effects_jsx_child(child)?;
                }
                Ok(())
            }

            _ => Ok(()),
        }
    }

    fn report_effects_jsx_element(&mut self, element: &JSXElement<'a>) -> EngineResult<()> {
        for attribute in &element.opening_element.attributes {
            match attribute {
                JSXAttributeItem::Attribute(attr) => {
                    if let Some(JSXAttributeValue::ExpressionContainer(container)) = &attr.value {
                        self.report_effects_jsx_expression(&container.expression)?;
                    }
                }
                JSXAttributeItem::SpreadAttribute(spread) => {
                    self.report_effects_expr(&spread.argument)?;
                }
            }
        }
        for child in &element.children {
            self.report_effects_jsx_child(child)?;
        }
        // Uppercase-starting element names denote component construction
        // (§4.1); the parser resolves these as ordinary identifier
        // references, so the existing identifier call path covers them.
        // Lowercase intrinsic tags (`div`, `span`, ...) are never resolved
        // to a binding and are treated as pure.
        if let JSXElementName::IdentifierReference(ident) = &element.opening_element.name {
            self.analyze_call_identifier(ident, element.span, true)?;
        }
        Ok(())
    }

    fn report_effects_jsx_expression(&mut self, expr: &JSXExpression<'a>) -> EngineResult<()> {
        match expr {
            JSXExpression::EmptyExpression(_) => Ok(()),
            expr => match expr.as_expression() {
                Some(expr) => self.report_effects_expr(expr),
                None => Ok(()),
            },
        }
    }

    fn report_effects_jsx_child(&mut self, child: &JSXChild<'a>) -> EngineResult<()> {
        match child {
            JSXChild::ExpressionContainer(container) => {
                self.report_effects_jsx_expression(&container.expression)
            }
            JSXChild::Element(element) => self.report_effects_jsx_element(element),
            JSXChild::Fragment(fragment) => {
                for child in &fragment.children {
                    self.report_effects_jsx_child(child)?;
                }
                Ok(())
            }
            _ => Ok(()),
        }
    }

    fn report_effects_class(&mut self, class: &Class<'a>) -> EngineResult<()> {
        if let Some(super_class) = &class.super_class {
            self.report_effects_expr(super_class)?;
        }
        for element in &class.body.body {
            match element {
                ClassElement::PropertyDefinition(prop) => {
                    // Computed keys execute at declaration; initializer
                    // values execute on `new`, so are not walked here.
                    if prop.computed {
                        if let Some(key_expr) = prop.key.as_expression() {
                            self.report_effects_expr(key_expr)?;
                        }
                    }
                }
                ClassElement::MethodDefinition(method) => {
                    if method.computed {
                        if let Some(key_expr) = method.key.as_expression() {
                            self.report_effects_expr(key_expr)?;
                        }
                    }
                }
                // `static { ... }` blocks run once, immediately, when the
                // class is declared — unlike field initializers, which wait
                // for `new` (§4.1).
                ClassElement::StaticBlock(block) => {
                    self.report_effects_statements(&block.body)?;
                }
                _ => {}
            }
        }
        Ok(())
    }

    fn report_effects_delete(&mut self, target: &Expression<'a>) -> EngineResult<()> {
        match target {
            Expression::StaticMemberExpression(_)
            | Expression::ComputedMemberExpression(_)
            | Expression::PrivateFieldExpression(_) => self.report_effects_mutated(target),
            _ => {
                self.sink.report(target.span(), Message::DeleteNonMember);
                Ok(())
            }
        }
    }

    fn report_effects_update(&mut self, update: &UpdateExpression<'a>) -> EngineResult<()> {
        self.mutate_assignment_target(&update.argument)
    }

    fn report_effects_assignment(&mut self, assignment: &AssignmentExpression<'a>) -> EngineResult<()> {
        self.report_effects_expr(&assignment.right)?;
        match &assignment.left {
            AssignmentTarget::AssignmentTargetIdentifier(ident) => {
                if let Binding::Global = self.resolver.resolve(ident, self.symbols) {
                    self.sink.report(ident.span, Message::AssignmentToGlobal);
                }
                Ok(())
            }
            AssignmentTarget::StaticMemberExpression(member) => {
                self.report_effects_expr(&member.object)?;
                self.report_effects_mutated(&member.object)
            }
            AssignmentTarget::ComputedMemberExpression(member) => {
                self.report_effects_expr(&member.object)?;
                self.report_effects_expr(&member.expression)?;
                self.report_effects_mutated(&member.object)
            }
            AssignmentTarget::PrivateFieldExpression(member) => {
                self.report_effects_expr(&member.object)?;
                self.report_effects_mutated(&member.object)
            }
            _ => Err(EngineError::InvalidAssignmentTargetRoot {
                node_span: assignment.span,
            }),
        }
    }

    /// `++x` / `x--` / `delete x.y` all reduce to "mutate whatever this
    /// target's root denotes" — a plain identifier target has no root to
    /// classify (incrementing a local variable is not itself a side
    /// effect), everything else goes through the same member-root rules as
    /// assignment (§4.1).
    fn mutate_assignment_target(&mut self, target: &AssignmentTarget<'a>) -> EngineResult<()> {
        match target {
            AssignmentTarget::AssignmentTargetIdentifier(_) => Ok(()),
            AssignmentTarget::StaticMemberExpression(member) => {
                self.report_effects_mutated(&member.object)
            }
            AssignmentTarget::ComputedMemberExpression(member) => {
                self.report_effects_mutated(&member.object)
            }
            AssignmentTarget::PrivateFieldExpression(member) => {
                self.report_effects_mutated(&member.object)
            }
            _ => Ok(()),
        }
    }

    /// **report-effects-when-mutated(n)** — §4.1 assignment row: classifies
    /// the root of a mutation target and emits the matching diagnostic.
    pub fn report_effects_mutated(&mut self, root: &Expression<'a>) -> EngineResult<()> {
        match root {
            Expression::Identifier(ident) => match self.resolver.resolve(ident, self.symbols) {
                Binding::Global => {
                    self.sink.report(ident.span, Message::MutatingGlobal);
                    Ok(())
                }
                Binding::Local(symbol_id) => {
                    if !self.ctx.enter_mutation(symbol_id) {
                        return Ok(());
                    }
                    match self.resolver.binding(symbol_id).map(|b| b.kind) {
                        Some(crate::resolver::BindingKind::Import) => {
                            self.sink.report(ident.span, Message::MutatingImport);
                        }
                        // Diagnosed exclusively by `analyze_parameter_flow`
                        // (§4.3), which anchors the diagnostic at the
                        // supplying argument rather than here, inside the
                        // callee's own body — see the matching comment in
                        // `call_analysis::analyze_call_identifier_with_arguments`.
                        Some(crate::resolver::BindingKind::Parameter) => {}
                        Some(crate::resolver::BindingKind::Destructured) => {
                            self.sink.report(ident.span, Message::MutatingDestructured);
                        }
                        _ => {}
                    }
                    Ok(())
                }
            },
            Expression::ThisExpression(this) => {
                if !self.ctx.has_valid_this() {
                    self.sink.report(this.span, Message::MutatingUnknownThis);
                }
                Ok(())
            }
            Expression::CallExpression(call) => {
                self.sink.report(call.span, Message::MutatingCallResult);
                Ok(())
            }
            Expression::StaticMemberExpression(member) => {
                self.sink.report(member.span, Message::MutatingMember);
                Ok(())
            }
            Expression::ComputedMemberExpression(member) => {
                self.sink.report(member.span, Message::MutatingMember);
                Ok(())
            }
            _ => Err(EngineError::InvalidAssignmentTargetRoot {
                node_span: root.span(),
            }),
        }
    }
}

/// `true`/`false` when `expr` is a syntactic boolean literal, `None`
/// otherwise. Drives the literal-truthiness control-flow pruning rule that
/// applies uniformly to `if`, `&&`, `||`, and `?:` (§4.1).
fn literal_truthiness(expr: &Expression<'_>) -> Option<bool> {
    match expr {
        Expression::BooleanLiteral(lit) => Some(lit.value),
        _ => None,
    }
}

fn is_spread_free_array_literal(expr: &Expression<'_>) -> bool {
    match expr {
        Expression::ArrayExpression(array) => {
            array.elements.iter().all(|el| !matches!(el, ArrayExpressionElement::SpreadElement(_)))
        }
        _ => false,
    }
}

