//! Identifier resolution and the variable-binding pre-pass (§3 "Variable
//! binding", §4.5 "Scope resolution").
//!
//! The engine never re-implements scope lookup: every [`IdentifierReference`]
//! already carries a resolved [`oxc_semantic::SymbolTable`] reference id. This
//! module's job is narrower — recovering, for each resolved binding, the set
//! of expressions ever written to it, since `oxc_semantic` hands out
//! references but not the grouped-by-binding write history the call and
//! mutation analyses need.

use oxc_ast::ast::*;
use oxc_semantic::{SymbolId, SymbolTable};
use oxc_span::Atom;
use rustc_hash::FxHashMap;

/// What kind of declaration introduced a binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindingKind {
    Const,
    Let,
    Var,
    Function,
    Class,
    Parameter,
    CatchParameter,
    Import,
    /// Bound through an object/array destructuring pattern rather than a
    /// plain identifier — the engine cannot follow which property ended up
    /// where, so these are always treated as opaque at call/mutate sites.
    Destructured,
}

/// The module specifier and imported name backing an [`BindingKind::Import`]
/// binding, consulted by the purity oracle (§4.4 rule 4).
#[derive(Debug, Clone)]
pub struct ImportInfo<'a> {
    pub module_specifier: Atom<'a>,
    pub imported_name: ImportedName<'a>,
    /// Span of the `ImportDeclaration` statement itself, not the call site —
    /// a declaration-pure comment (§4.4 rule 2) sits above the `import`
    /// line, not above whatever later calls the imported name.
    pub declaration_span: oxc_span::Span,
}

#[derive(Debug, Clone)]
pub enum ImportedName<'a> {
    Named(Atom<'a>),
    Default,
    Namespace,
}

/// Everything the engine tracks about one resolved binding.
pub struct BindingInfo<'a> {
    pub kind: BindingKind,
    /// Every expression ever assigned to this binding: the declarator
    /// initializer (if any) followed by each subsequent write's
    /// right-hand-side, in source order.
    pub writes: Vec<&'a Expression<'a>>,
    pub import_info: Option<ImportInfo<'a>>,
    /// Present when `kind` is [`BindingKind::Class`] — the class declaration
    /// itself, so `new X()` call analysis can re-enter its constructor.
    pub class_node: Option<&'a Class<'a>>,
    /// Present when `kind` is [`BindingKind::Function`] — a named function
    /// declaration's node, so calling it by name re-enters its body the same
    /// way a function *expression* written to a variable does.
    pub function_node: Option<&'a Function<'a>>,
}

impl<'a> BindingInfo<'a> {
    fn new(kind: BindingKind) -> Self {
        Self {
            kind,
            writes: Vec::new(),
            import_info: None,
            class_node: None,
            function_node: None,
        }
    }
}

/// Where an identifier reference resolves.
pub enum Binding {
    Local(SymbolId),
    Global,
}

/// Resolves identifier references to bindings and answers "what has ever
/// been written to this binding" queries.
pub struct Resolver<'a> {
    bindings: FxHashMap<SymbolId, BindingInfo<'a>>,
}

impl<'a> Resolver<'a> {
    /// Runs the binder pre-pass over `program`, building the write-history
    /// map every other component queries. `program` must outlive `'a` (it
    /// does: `'a` *is* the arena lifetime of the AST it was parsed into).
    pub fn build(program: &'a Program<'a>, symbols: &SymbolTable) -> Self {
        let mut binder = Binder {
            symbols,
            bindings: FxHashMap::default(),
        };
        binder.visit_statements(&program.body);
        Self {
            bindings: binder.bindings,
        }
    }

    /// Resolves an identifier reference to its binding, falling back to
    /// [`Binding::Global`] when `oxc_semantic` could not resolve it — the
    /// resolver never re-walks the scope chain itself (§4.5).
    pub fn resolve(&self, ident: &IdentifierReference<'a>, symbols: &SymbolTable) -> Binding {
        match symbols.get_reference(ident.reference_id()).symbol_id() {
            Some(symbol_id) => Binding::Local(symbol_id),
            None => Binding::Global,
        }
    }

    pub fn binding(&self, symbol_id: SymbolId) -> Option<&BindingInfo<'a>> {
        self.bindings.get(&symbol_id)
    }
}

/// One-shot recursive walk collecting declarations and write references.
///
/// Mirrors the dispatcher's own node-kind `match` idiom rather than
/// implementing `oxc_ast_visit::Visit`, since this pass needs different
/// bookkeeping (current declaration context) than a generic visitor gives.
/// Every node reference carried through this walk is quantified over `'a`,
/// the arena lifetime, not the shorter lifetime of the enclosing borrow —
/// that's what lets [`BindingInfo::writes`] hold onto expressions found deep
/// inside the tree without cloning them.
struct Binder<'s, 'a> {
    symbols: &'s SymbolTable,
    bindings: FxHashMap<SymbolId, BindingInfo<'a>>,
}

impl<'s, 'a> Binder<'s, 'a> {
    fn visit_statements(&mut self, statements: &'a [Statement<'a>]) {
        for statement in statements {
            self.visit_statement(statement);
        }
    }

    fn visit_statement(&mut self, statement: &'a Statement<'a>) {
        match statement {
            Statement::VariableDeclaration(decl) => self.visit_variable_declaration(decl),
            Statement::FunctionDeclaration(func) => self.visit_function(func),
            Statement::ClassDeclaration(class) => self.visit_class(class),
            Statement::BlockStatement(block) => self.visit_statements(&block.body),
            Statement::ExpressionStatement(expr_stmt) => {
                self.visit_expression(&expr_stmt.expression)
            }
            Statement::IfStatement(if_stmt) => {
                self.visit_expression(&if_stmt.test);
                self.visit_statement(&if_stmt.consequent);
                if let Some(alternate) = &if_stmt.alternate {
                    self.visit_statement(alternate);
                }
            }
            Statement::ForStatement(for_stmt) => {
                if let Some(init) = &for_stmt.init {
                    match init {
                        ForStatementInit::VariableDeclaration(decl) => {
                            self.visit_variable_declaration(decl)
                        }
                        _ => {
                            if let Some(expr) = init.as_expression() {
                                self.visit_expression(expr);
                            }
                        }
                    }
                }
                if let Some(test) = &for_stmt.test {
                    self.visit_expression(test);
                }
                if let Some(update) = &for_stmt.update {
                    self.visit_expression(update);
                }
                self.visit_statement(&for_stmt.body);
            }
            Statement::ForInStatement(for_in) => self.visit_statement(&for_in.body),
            Statement::ForOfStatement(for_of) => self.visit_statement(&for_of.body),
            Statement::WhileStatement(while_stmt) => {
                self.visit_expression(&while_stmt.test);
                self.visit_statement(&while_stmt.body);
            }
            Statement::DoWhileStatement(do_while) => {
                self.visit_statement(&do_while.body);
                self.visit_expression(&do_while.test);
            }
            Statement::TryStatement(try_stmt) => {
                self.visit_statements(&try_stmt.block.body);
                if let Some(handler) = &try_stmt.handler {
                    self.visit_statements(&handler.body.body);
                }
                if let Some(finalizer) = &try_stmt.finalizer {
                    self.visit_statements(&finalizer.body);
                }
            }
            Statement::SwitchStatement(switch_stmt) => {
                for case in &switch_stmt.cases {
                    self.visit_statements(&case.consequent);
                }
            }
            Statement::ReturnStatement(ret) => {
                if let Some(arg) = &ret.argument {
                    self.visit_expression(arg);
                }
            }
            Statement::LabeledStatement(labeled) => self.visit_statement(&labeled.body),
            Statement::ImportDeclaration(import) => self.visit_import_declaration(import),
            Statement::ExportNamedDeclaration(export) => {
                if let Some(decl) = &export.declaration {
                    self.visit_declaration(decl);
                }
            }
            Statement::ExportDefaultDeclaration(export) => match &export.declaration {
                ExportDefaultDeclarationKind::FunctionDeclaration(func) => self.visit_function(func),
                ExportDefaultDeclarationKind::ClassDeclaration(class) => self.visit_class(class),
                _ => {}
            },
            _ => {}
        }
    }

    fn visit_declaration(&mut self, decl: &'a Declaration<'a>) {
        match decl {
            Declaration::VariableDeclaration(decl) => self.visit_variable_declaration(decl),
            Declaration::FunctionDeclaration(func) => self.visit_function(func),
            Declaration::ClassDeclaration(class) => self.visit_class(class),
            _ => {}
        }
    }

    /// Registers every named/default/namespace import specifier as a
    /// [`BindingKind::Import`] binding, so call and mutation analysis can
    /// recognize identifiers bound by `import` statements (§3 "Variable
    /// binding"; the oracle's rule 4 needs the module specifier + export name
    /// this collects).
    fn visit_import_declaration(&mut self, import: &'a ImportDeclaration<'a>) {
        let Some(specifiers) = &import.specifiers else {
            return;
        };
        for specifier in specifiers {
            let (local, imported_name) = match specifier {
                ImportDeclarationSpecifier::ImportSpecifier(s) => {
                    (&s.local, ImportedName::Named(module_export_name_atom(&s.imported)))
                }
                ImportDeclarationSpecifier::ImportDefaultSpecifier(s) => {
                    (&s.local, ImportedName::Default)
                }
                ImportDeclarationSpecifier::ImportNamespaceSpecifier(s) => {
                    (&s.local, ImportedName::Namespace)
                }
            };
            let Some(symbol_id) = local.symbol_id.get() else {
                continue;
            };
            let mut binding = BindingInfo::new(BindingKind::Import);
            binding.import_info = Some(ImportInfo {
                module_specifier: import.source.value.clone(),
                imported_name,
                declaration_span: import.span,
            });
            self.bindings.entry(symbol_id).or_insert(binding);
        }
    }

    fn visit_variable_declaration(&mut self, decl: &'a VariableDeclaration<'a>) {
        let kind = match decl.kind {
            VariableDeclarationKind::Const => BindingKind::Const,
            VariableDeclarationKind::Let => BindingKind::Let,
            VariableDeclarationKind::Var => BindingKind::Var,
        };
        for declarator in &decl.declarations {
            self.bind_pattern(&declarator.id, kind, declarator.init.as_ref());
            if let Some(init) = &declarator.init {
                self.visit_expression(init);
            }
        }
    }

    /// Registers every [`BindingIdentifier`] reachable from `pattern`. A
    /// pattern that is anything but a bare identifier marks every name it
    /// introduces as [`BindingKind::Destructured`], regardless of `kind`.
    fn bind_pattern(
        &mut self,
        pattern: &'a BindingPattern<'a>,
        kind: BindingKind,
        init: Option<&'a Expression<'a>>,
    ) {
        match &pattern.kind {
            BindingPatternKind::BindingIdentifier(ident) => {
                let symbol_id = ident
                    .symbol_id
                    .get()
                    .expect("semantic analysis binds every BindingIdentifier to a symbol");
                let entry = self
                    .bindings
                    .entry(symbol_id)
                    .or_insert_with(|| BindingInfo::new(kind));
                if let Some(init) = init {
                    entry.writes.push(init);
                }
            }
            BindingPatternKind::AssignmentPattern(assignment) => {
                self.bind_pattern(&assignment.left, BindingKind::Destructured, None);
            }
            BindingPatternKind::ObjectPattern(object) => {
                for property in &object.properties {
                    self.bind_pattern(&property.value, BindingKind::Destructured, None);
                }
                if let Some(rest) = &object.rest {
                    self.bind_pattern(&rest.argument, BindingKind::Destructured, None);
                }
            }
            BindingPatternKind::ArrayPattern(array) => {
                for element in array.elements.iter().flatten() {
                    self.bind_pattern(element, BindingKind::Destructured, None);
                }
                if let Some(rest) = &array.rest {
                    self.bind_pattern(&rest.argument, BindingKind::Destructured, None);
                }
            }
        }
    }

    fn visit_function(&mut self, func: &'a Function<'a>) {
        if let Some(ident) = &func.id {
            let symbol_id = ident
                .symbol_id
                .get()
                .expect("semantic analysis binds every function declaration id");
            let binding = self
                .bindings
                .entry(symbol_id)
                .or_insert_with(|| BindingInfo::new(BindingKind::Function));
            binding.function_node = Some(func);
        }
        for param in &func.params.items {
            self.bind_pattern(&param.pattern, BindingKind::Parameter, None);
        }
        if let Some(body) = &func.body {
            self.visit_statements(&body.statements);
        }
    }

    fn visit_class(&mut self, class: &'a Class<'a>) {
        if let Some(ident) = &class.id {
            let symbol_id = ident
                .symbol_id
                .get()
                .expect("semantic analysis binds every class declaration id");
            let binding = self
                .bindings
                .entry(symbol_id)
                .or_insert_with(|| BindingInfo::new(BindingKind::Class));
            binding.class_node = Some(class);
        }
        for element in &class.body.body {
            if let ClassElement::MethodDefinition(method) = element {
                self.visit_function(&method.value);
            }
        }
    }

    fn visit_expression(&mut self, expr: &'a Expression<'a>) {
        match expr {
            Expression::AssignmentExpression(assignment) => {
                self.visit_expression(&assignment.right);
                if let AssignmentTarget::AssignmentTargetIdentifier(ident) = &assignment.left {
                    if let Some(symbol_id) =
                        self.symbols.get_reference(ident.reference_id()).symbol_id()
                    {
                        if let Some(binding) = self.bindings.get_mut(&symbol_id) {
                            binding.writes.push(&assignment.right);
                        }
                    }
                }
            }
            Expression::CallExpression(call) => {
                self.visit_expression(&call.callee);
                for arg in &call.arguments {
                    if let Some(expr) = arg.as_expression() {
                        self.visit_expression(expr);
                    }
                }
            }
            Expression::ArrowFunctionExpression(arrow) => {
                for param in &arrow.params.items {
                    self.bind_pattern(&param.pattern, BindingKind::Parameter, None);
                }
                self.visit_statements(&arrow.body.statements);
            }
            Expression::FunctionExpression(func) => self.visit_function(func),
            _ => {}
        }
    }
}

/// Extracts the textual export name from either side of an import/export
/// specifier clause (`import { a as b }` / `export { a as b }`), whichever
/// form the parser produced.
fn module_export_name_atom<'a>(name: &ModuleExportName<'a>) -> Atom<'a> {
    match name {
        ModuleExportName::IdentifierName(id) => id.name.clone(),
        ModuleExportName::IdentifierReference(id) => id.name.clone(),
        ModuleExportName::StringLiteral(lit) => lit.value.clone(),
    }
}
