//! Call-site classification (§4.2): what does invoking this callee actually
//! do, and is it worth re-entering the dispatcher over?

use oxc_ast::ast::*;
use oxc_span::Span;

use crate::diagnostics::Message;
use crate::dispatcher::Engine;
use crate::error::{EngineError, EngineResult};
use crate::resolver::{Binding, BindingInfo, BindingKind};

impl<'a, 'c> Engine<'a, 'c> {
    /// Entry point used by the dispatcher for every call-shaped expression
    /// (`CallExpression`, `NewExpression`, tagged templates, and JSX
    /// component construction). Arguments have already been walked by the
    /// caller with `report_effects` — this only classifies the callee.
    pub(crate) fn analyze_call(
        &mut self,
        callee: &Expression<'a>,
        call_span: Span,
        called_with_new: bool,
        arguments: &[Argument<'a>],
    ) -> EngineResult<()> {
        if self.oracle.is_call_site_pure(call_span) {
            return Ok(());
        }
        let previous = self.ctx.set_called_with_new(called_with_new);
        let result = self.dispatch_callee(callee, call_span, called_with_new, arguments);
        self.ctx.set_called_with_new(previous);
        result
    }

    fn dispatch_callee(
        &mut self,
        callee: &Expression<'a>,
        call_span: Span,
        called_with_new: bool,
        arguments: &[Argument<'a>],
    ) -> EngineResult<()> {
        match callee {
            Expression::Identifier(ident) => {
                self.analyze_call_identifier_with_arguments(ident, call_span, called_with_new, arguments)
            }
            Expression::StaticMemberExpression(member) => {
                self.analyze_member_callee(member, call_span)
            }
            Expression::ComputedMemberExpression(_) | Expression::PrivateFieldExpression(_) => {
                self.sink.report(call_span, Message::CallingMember);
                Ok(())
            }
            Expression::FunctionExpression(func) => {
                let has_valid_this = called_with_new;
                self.enter_function_body(func, call_span, called_with_new, has_valid_this, arguments)
            }
            Expression::ArrowFunctionExpression(arrow) => {
                if called_with_new {
                    self.sink.report(call_span, Message::ArrowCalledWithNew);
                }
                self.enter_arrow_body(arrow, call_span, arguments)
            }
            Expression::CallExpression(inner) => {
                self.sink.report(call_span, Message::CallingCallResult);
                self.analyze_call(&inner.callee, inner.span, false, &inner.arguments)
            }
            // A literal `super()` call is always flagged, even when the
            // superclass binding is fully resolvable (§8 scenario 5: `class
            // Y{}` with no explicit constructor of its own still yields
            // calling-super for `class X extends Y { constructor(){
            // super() } }`). The engine does not trace through the
            // superclass's own constructor chain here — only the *implicit*
            // default-constructor forwarding path (no literal `super()` in
            // source, see `enter_class_constructor_by_symbol` below) resolves
            // a known superclass.
            Expression::Super(_) => {
                self.sink.report(call_span, Message::CallingSuper);
                Ok(())
            }
            Expression::ParenthesizedExpression(inner) => {
                self.dispatch_callee(&inner.expression, call_span, called_with_new, arguments)
            }
            Expression::NumericLiteral(_)
            | Expression::StringLiteral(_)
            | Expression::BooleanLiteral(_)
            | Expression::NullLiteral(_)
            | Expression::BigIntLiteral(_)
            | Expression::RegExpLiteral(_)
            | Expression::TemplateLiteral(_) => {
                self.sink.report(call_span, Message::CallingDestructured);
                Ok(())
            }
            other => Err(EngineError::UnhandledCalleeKind {
                node_span: call_span,
                kind: callee_kind_name(other),
            }),
        }
    }

    /// Classifies an identifier callee (§4.2 "Identifier callee"), called
    /// where no outer argument list applies (e.g. JSX component construction).
    pub(crate) fn analyze_call_identifier(
        &mut self,
        ident: &IdentifierReference<'a>,
        call_span: Span,
        called_with_new: bool,
    ) -> EngineResult<()> {
        self.analyze_call_identifier_with_arguments(ident, call_span, called_with_new, &[])
    }

    fn analyze_call_identifier_with_arguments(
        &mut self,
        ident: &IdentifierReference<'a>,
        call_span: Span,
        called_with_new: bool,
        arguments: &[Argument<'a>],
    ) -> EngineResult<()> {
        match self.resolver.resolve(ident, self.symbols) {
            Binding::Global => {
                if !self.oracle.is_global_path_pure(ident.name.as_str()) {
                    self.sink.report(ident.span, Message::CallingGlobal);
                }
                Ok(())
            }
            Binding::Local(symbol_id) => {
                let Some(binding) = self.resolver.binding(symbol_id) else {
                    return Ok(());
                };
                match binding.kind {
                    BindingKind::Function => match binding.function_node {
                        Some(func) => {
                            let has_valid_this = called_with_new;
                            self.enter_function_body(func, call_span, called_with_new, has_valid_this, arguments)
                        }
                        None => Ok(()),
                    },
                    // A reference to a parameter being called is exclusively
                    // diagnosed by `analyze_parameter_flow`, which runs once
                    // per function-body entry and anchors the diagnostic at
                    // the argument that supplied the value (§4.3) rather than
                    // at this reference inside the callee's own body —
                    // reporting here too would double-count the same call.
                    BindingKind::Parameter => Ok(()),
                    BindingKind::Import => {
                        self.analyze_import_callee(binding, ident.span)
                    }
                    BindingKind::Class if called_with_new => {
                        self.enter_class_constructor_by_symbol(symbol_id, call_span, arguments)
                    }
                    BindingKind::Destructured | BindingKind::Class => {
                        // Calling a class without `new` is a TypeError at
                        // runtime in real engines; nothing useful to analyze.
                        self.sink.report(ident.span, Message::CallingDestructured);
                        Ok(())
                    }
                    BindingKind::Const | BindingKind::Let | BindingKind::Var | BindingKind::CatchParameter => {
                        if !self.ctx.enter_call_on_symbol(symbol_id) {
                            return Ok(());
                        }
                        if binding.writes.is_empty() {
                            self.sink.report(ident.span, Message::CallingDestructured);
                            return Ok(());
                        }
                        self.analyze_writes(binding, call_span, called_with_new, arguments)
                    }
                }
            }
        }
    }

    /// Re-enters every expression ever written to a callable binding (§4.2:
    /// a variable can hold different functions depending on control flow, so
    /// every write is analyzed as a possible callee).
    fn analyze_writes(
        &mut self,
        binding: &BindingInfo<'a>,
        call_span: Span,
        called_with_new: bool,
        arguments: &[Argument<'a>],
    ) -> EngineResult<()> {
        let writes: Vec<&Expression<'a>> = binding.writes.clone();
        for write in writes {
            self.dispatch_callee(write, call_span, called_with_new, arguments)?;
        }
        Ok(())
    }

    fn analyze_import_callee(
        &mut self,
        binding: &BindingInfo<'a>,
        reference_span: Span,
    ) -> EngineResult<()> {
        let Some(import_info) = &binding.import_info else {
            return Ok(());
        };
        if !self.oracle.is_import_pure(import_info, import_info.declaration_span) {
            self.sink.report(reference_span, Message::CallingImport);
        }
        Ok(())
    }

    /// A member callee is only eligible for the allow-list when its root is
    /// an identifier resolving to an actual global — a locally shadowed
    /// `Object` (or any other rebound name) never consults the dotted-path
    /// table, per §8 ("shadowing `Object` locally makes it dirty").
    fn analyze_member_callee(
        &mut self,
        member: &StaticMemberExpression<'a>,
        call_span: Span,
    ) -> EngineResult<()> {
        if let Expression::Identifier(ident) = &member.object {
            if matches!(self.resolver.resolve(ident, self.symbols), Binding::Global) {
                let path = format!("{}.{}", ident.name.as_str(), member.property.name.as_str());
                if self.oracle.is_global_path_pure(&path) {
                    return Ok(());
                }
            }
        }
        self.sink.report(call_span, Message::CallingMember);
        Ok(())
    }

    fn enter_function_body(
        &mut self,
        func: &Function<'a>,
        call_span: Span,
        called_with_new: bool,
        has_valid_this: bool,
        arguments: &[Argument<'a>],
    ) -> EngineResult<()> {
        if !self.ctx.enter_call_on_node(func.span) {
            return Ok(());
        }
        if self.oracle.is_declaration_pure(func.span) {
            return Ok(());
        }
        let Some(body) = &func.body else {
            return Ok(());
        };
        self.analyze_parameter_flow(&func.params, body, arguments)?;
        let previous_new = self.ctx.set_called_with_new(called_with_new);
        let result = self.run_body_with_this(has_valid_this, &body.statements);
        self.ctx.set_called_with_new(previous_new);
        result
    }

    fn enter_arrow_body(
        &mut self,
        arrow: &ArrowFunctionExpression<'a>,
        call_span: Span,
        arguments: &[Argument<'a>],
    ) -> EngineResult<()> {
        if !self.ctx.enter_call_on_node(arrow.span) {
            return Ok(());
        }
        let _ = call_span;
        self.analyze_parameter_flow(&arrow.params, &arrow.body, arguments)?;
        // Arrows inherit `this` lexically; the engine conservatively treats
        // every re-entered arrow body as having no valid `this` (Design
        // Notes open question, resolved: kept as specified).
        self.run_body_with_this(false, &arrow.body.statements)
    }

    fn run_body_with_this(&mut self, has_valid_this: bool, statements: &[Statement<'a>]) -> EngineResult<()> {
        let previous = self.ctx.set_valid_this(has_valid_this);
        let result = self.report_effects_statements(statements);
        self.ctx.set_valid_this(previous);
        result
    }

    /// Re-enters a class's constructor under `new` (§4.2 "Class binding"):
    /// called for a direct `new X()` on a locally-declared class, and
    /// recursively when `X` itself has no explicit constructor and must
    /// forward to its superclass's implicit-or-explicit one.
    pub(crate) fn enter_class_constructor_by_symbol(
        &mut self,
        symbol_id: oxc_semantic::SymbolId,
        call_span: Span,
        arguments: &[Argument<'a>],
    ) -> EngineResult<()> {
        if !self.ctx.enter_call_on_symbol(symbol_id) {
            return Ok(());
        }
        let Some(binding) = self.resolver.binding(symbol_id) else {
            return Ok(());
        };
        let Some(class) = binding.class_node else {
            return Ok(());
        };
        if self.oracle.is_declaration_pure(class.span) {
            return Ok(());
        }

        self.report_effects_class_fields_on_construct(class)?;

        let constructor = class.body.body.iter().find_map(|element| match element {
            ClassElement::MethodDefinition(method)
                if matches!(method.kind, MethodDefinitionKind::Constructor) =>
            {
                Some(&method.value)
            }
            _ => None,
        });

        let Some(constructor) = constructor else {
            // No explicit constructor, hence no literal `super()` call to
            // flag in source: the implicit default constructor forwards
            // straight to the superclass, or does nothing for a base class.
            // This is the one place a known superclass binding is actually
            // resolved and recursed into — unlike a textual `super()` call,
            // which is always flagged unconditionally (see the `Super`
            // callee arm in `dispatch_callee`).
            let super_symbol = class.super_class.as_ref().and_then(|super_class| {
                let Expression::Identifier(ident) = super_class else {
                    return None;
                };
                match self.resolver.resolve(ident, self.symbols) {
                    Binding::Local(super_symbol_id) => Some(super_symbol_id),
                    Binding::Global => None,
                }
            });
            return match super_symbol {
                Some(super_symbol_id) => {
                    self.enter_class_constructor_by_symbol(super_symbol_id, call_span, arguments)
                }
                None => Ok(()),
            };
        };
        let Some(body) = &constructor.body else {
            return Ok(());
        };

        self.analyze_parameter_flow(&constructor.params, body, arguments)?;

        let previous_new = self.ctx.set_called_with_new(true);
        let result = self.run_body_with_this(true, &body.statements);
        self.ctx.set_called_with_new(previous_new);
        result
    }

    /// Class field initializer *values* execute once per instance at
    /// construction time, unlike computed keys which execute at declaration
    /// (§4.1). Re-entering a constructor — whether via a direct `new X()` or
    /// a `super()` delegation — must walk them under `hasValidThis=true`,
    /// the same as the constructor body itself.
    fn report_effects_class_fields_on_construct(&mut self, class: &Class<'a>) -> EngineResult<()> {
        let previous_this = self.ctx.set_valid_this(true);
        let mut result = Ok(());
        for element in &class.body.body {
            if let ClassElement::PropertyDefinition(prop) = element {
                if !prop.computed {
                    if let Some(value) = &prop.value {
                        result = self.report_effects_expr(value);
                        if result.is_err() {
                            break;
                        }
                    }
                }
            }
        }
        self.ctx.set_valid_this(previous_this);
        result
    }
}

fn callee_kind_name(expr: &Expression<'_>) -> &'static str {
    match expr {
        Expression::BinaryExpression(_) => "BinaryExpression",
        Expression::LogicalExpression(_) => "LogicalExpression",
        Expression::ConditionalExpression(_) => "ConditionalExpression",
        Expression::SequenceExpression(_) => "SequenceExpression",
        Expression::AssignmentExpression(_) => "AssignmentExpression",
        Expression::AwaitExpression(_) => "AwaitExpression",
        Expression::YieldExpression(_) => "YieldExpression",
        Expression::UnaryExpression(_) => "UnaryExpression",
        Expression::ClassExpression(_) => "ClassExpression",
        _ => "unknown",
    }
}
