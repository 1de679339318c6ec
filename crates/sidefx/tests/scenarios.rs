//! End-to-end scenarios (spec §8) driven through a real `oxc_parser` +
//! `oxc_semantic` pipeline, the way `vize_atelier_sfc`'s
//! `compile_script/tests.rs` builds real ASTs rather than mocking them.

use oxc_allocator::Allocator;
use oxc_parser::Parser;
use oxc_semantic::SemanticBuilder;
use oxc_span::SourceType;

use sidefx::{Message, Options};

fn analyze(source: &str) -> Vec<Message> {
    analyze_with_options(source, &Options::default())
}

fn analyze_with_options(source: &str, options: &Options) -> Vec<Message> {
    let allocator = Allocator::default();
    let source_type = SourceType::default().with_module(true).with_jsx(true);
    let parser_ret = Parser::new(&allocator, source, source_type).parse();
    assert!(
        parser_ret.errors.is_empty(),
        "parse errors for {source:?}: {:?}",
        parser_ret.errors
    );
    let program = parser_ret.program;
    let semantic_ret = SemanticBuilder::new().build(&program);
    assert!(
        semantic_ret.errors.is_empty(),
        "semantic errors for {source:?}: {:?}",
        semantic_ret.errors
    );
    let symbols = semantic_ret.semantic.symbols();

    sidefx::analyze(&program, symbols, source, &program.comments, options)
        .unwrap_or_else(|err| panic!("analysis of {source:?} failed: {err}"))
        .into_iter()
        .map(|diagnostic| diagnostic.message)
        .collect()
}

// --- §8 scenario table -----------------------------------------------------

#[test]
fn scenario_1_pure_declarations_are_clean() {
    let diagnostics = analyze("const x = 1; const y = 2;");
    assert!(diagnostics.is_empty(), "{diagnostics:?}");
}

#[test]
fn scenario_2_calling_a_global_is_flagged_once() {
    let diagnostics = analyze("ext()");
    assert_eq!(diagnostics, vec![Message::CallingGlobal]);
}

#[test]
fn scenario_3_memoized_assignment_to_global_reports_once() {
    let diagnostics = analyze("const x = () => { ext = 1 }; x(); x(); x();");
    assert_eq!(diagnostics, vec![Message::AssignmentToGlobal]);
}

#[test]
fn scenario_4_parameter_called_inside_callee_flags_the_argument() {
    let diagnostics = analyze("function x(a){ a() } x(ext)");
    assert_eq!(diagnostics, vec![Message::CallingParameter]);
}

#[test]
fn scenario_5_bare_super_call_is_flagged() {
    let diagnostics =
        analyze("class Y{} class X extends Y { constructor(){ super() } } new X()");
    assert_eq!(diagnostics, vec![Message::CallingSuper]);
}

#[test]
fn scenario_6_pure_call_marker_on_import_suppresses_diagnostics() {
    let diagnostics = analyze(r#"import {x} from "y"; /*@__PURE__*/ x()"#);
    assert!(diagnostics.is_empty(), "{diagnostics:?}");
}

// --- Boundaries --------------------------------------------------------

#[test]
fn if_true_only_analyzes_the_then_branch() {
    let diagnostics = analyze("if (true) { ext() } else { ext2() }");
    assert_eq!(diagnostics, vec![Message::CallingGlobal]);
}

#[test]
fn if_false_only_analyzes_the_else_branch() {
    let diagnostics = analyze("if (false) { ext() } else { ext2() }");
    assert_eq!(diagnostics, vec![Message::CallingGlobal]);
}

#[test]
fn if_with_unresolved_guard_analyzes_both_branches() {
    let diagnostics = analyze("if (ext) { ext2() } else { ext3() }");
    assert_eq!(diagnostics.len(), 3);
    assert!(diagnostics.iter().all(|m| *m == Message::CallingGlobal));
}

#[test]
fn calling_an_arrow_directly_is_clean() {
    let diagnostics = analyze("(() => {})()");
    assert!(diagnostics.is_empty(), "{diagnostics:?}");
}

#[test]
fn calling_an_arrow_with_new_is_flagged() {
    let diagnostics = analyze("new (() => {})()");
    assert_eq!(diagnostics, vec![Message::ArrowCalledWithNew]);
}

#[test]
fn object_keys_on_unshadowed_global_is_clean() {
    let diagnostics = analyze("Object.keys({})");
    assert!(diagnostics.is_empty(), "{diagnostics:?}");
}

#[test]
fn shadowing_object_locally_makes_it_dirty() {
    let diagnostics = analyze("const Object = { keys: ext }; Object.keys({})");
    assert_eq!(diagnostics, vec![Message::CallingMember]);
}

#[test]
fn calling_a_const_bound_to_global_is_dirty() {
    let diagnostics = analyze("const x = ext; x()");
    assert_eq!(diagnostics, vec![Message::CallingGlobal]);
}

// --- Additional behaviors --------------------------------------------------

#[test]
fn dead_function_addition_introduces_no_diagnostics() {
    let before = analyze("const x = 1;");
    let after = analyze("const x = 1; function unused() { ext(); throw new Error(); }");
    assert!(before.is_empty());
    assert!(after.is_empty(), "{after:?}");
}

#[test]
fn idempotent_across_repeated_runs() {
    let source = "function f(a) { a.prop = 1 } f(ext); ext2();";
    assert_eq!(analyze(source), analyze(source));
}

#[test]
fn mutating_a_parameter_is_flagged_at_the_argument() {
    let diagnostics = analyze("function f(a) { a.prop = 1 } f(ext)");
    assert_eq!(diagnostics, vec![Message::MutatingParameter]);
}

#[test]
fn mutating_a_parameter_through_a_const_alias_is_flagged() {
    let diagnostics = analyze("function f(a) { const b = a; b.prop = 1 } f(ext)");
    assert_eq!(diagnostics, vec![Message::MutatingParameter]);
}

#[test]
fn mutating_a_global_is_flagged() {
    let diagnostics = analyze("ext.prop = 1");
    assert_eq!(diagnostics, vec![Message::MutatingGlobal]);
}

#[test]
fn mutating_an_imported_binding_is_flagged() {
    let diagnostics = analyze(r#"import { x } from "mod"; x.prop = 1;"#);
    assert_eq!(diagnostics, vec![Message::MutatingImport]);
}

#[test]
fn calling_an_unconfigured_import_is_flagged() {
    let diagnostics = analyze(r#"import { x } from "mod"; x();"#);
    assert_eq!(diagnostics, vec![Message::CallingImport]);
}

#[test]
fn exported_function_call_is_analyzed_through_its_body() {
    let diagnostics = analyze("export function foo() { ext(); } foo();");
    assert_eq!(diagnostics, vec![Message::CallingGlobal]);
}

#[test]
fn export_default_class_with_effectful_superclass_is_flagged() {
    let diagnostics = analyze("export default class extends ext() {}");
    assert_eq!(diagnostics, vec![Message::CallingGlobal]);
}

#[test]
fn throw_and_debugger_are_unconditional_effects() {
    let diagnostics = analyze("throw new Error('x'); debugger;");
    assert_eq!(diagnostics, vec![Message::Throwing, Message::Debugger]);
}

#[test]
fn delete_on_non_member_is_flagged() {
    let diagnostics = analyze("let x; delete x;");
    assert_eq!(diagnostics, vec![Message::DeleteNonMember]);
}

#[test]
fn for_of_over_non_literal_iterable_is_flagged() {
    let diagnostics = analyze("for (const x of ext) { }");
    assert_eq!(diagnostics, vec![Message::IteratingOverIterable]);
}

#[test]
fn for_of_over_spread_free_array_literal_is_clean() {
    let diagnostics = analyze("for (const x of [1, 2, 3]) { }");
    assert!(diagnostics.is_empty(), "{diagnostics:?}");
}

#[test]
fn for_of_over_array_with_spread_is_flagged() {
    let diagnostics = analyze("for (const x of [1, ...ext]) { }");
    assert_eq!(diagnostics, vec![Message::IteratingOverIterable]);
}

#[test]
fn calling_call_result_is_flagged() {
    let diagnostics = analyze("ext()()");
    assert!(diagnostics.contains(&Message::CallingGlobal));
    assert!(diagnostics.contains(&Message::CallingCallResult));
}

#[test]
fn bare_super_call_is_flagged_even_with_a_resolvable_superclass() {
    let diagnostics = analyze(
        "class Y { constructor() { ext(); } } class X extends Y { constructor() { super(); } } new X()",
    );
    assert_eq!(diagnostics, vec![Message::CallingSuper]);
}

#[test]
fn implicit_default_constructor_forwards_to_super() {
    let diagnostics =
        analyze("class Y { constructor() { ext(); } } class X extends Y {} new X()");
    assert_eq!(diagnostics, vec![Message::CallingGlobal]);
}

#[test]
fn declaration_pure_comment_suppresses_call_diagnostics() {
    let diagnostics = analyze(
        "// tree-shaking no-side-effects-when-called\nfunction f() { ext(); } f();",
    );
    assert!(diagnostics.is_empty(), "{diagnostics:?}");
}

#[test]
fn configured_module_export_is_treated_as_pure() {
    let options: Options =
        serde_json::from_str(r#"{"noSideEffectsWhenCalled":[{"module":"mod","functions":["x"]}]}"#)
            .unwrap();
    let diagnostics = analyze_with_options(r#"import { x } from "mod"; x();"#, &options);
    assert!(diagnostics.is_empty(), "{diagnostics:?}");
}

#[test]
fn configured_global_function_is_treated_as_pure() {
    let options: Options =
        serde_json::from_str(r#"{"noSideEffectsWhenCalled":[{"function":"ext"}]}"#).unwrap();
    let diagnostics = analyze_with_options("ext()", &options);
    assert!(diagnostics.is_empty(), "{diagnostics:?}");
}

#[test]
fn jsx_uppercase_component_is_treated_as_construction() {
    let diagnostics = analyze("function Comp() { ext(); } const el = <Comp />;");
    assert_eq!(diagnostics, vec![Message::CallingGlobal]);
}

#[test]
fn jsx_lowercase_intrinsic_is_pure() {
    let diagnostics = analyze("const el = <div className=\"x\" />;");
    assert!(diagnostics.is_empty(), "{diagnostics:?}");
}

#[test]
fn jsx_spread_attribute_is_analyzed() {
    let diagnostics = analyze("const el = <div {...ext()} />;");
    assert_eq!(diagnostics, vec![Message::CallingGlobal]);
}

#[test]
fn class_field_initializer_runs_on_construction() {
    let diagnostics = analyze("class X { field = ext(); } new X()");
    assert_eq!(diagnostics, vec![Message::CallingGlobal]);
}

#[test]
fn class_field_initializer_is_not_evaluated_at_declaration() {
    let diagnostics = analyze("class X { field = ext(); }");
    assert!(diagnostics.is_empty(), "{diagnostics:?}");
}

#[test]
fn class_static_block_runs_at_declaration() {
    let diagnostics = analyze("class X { static { ext(); } }");
    assert_eq!(diagnostics, vec![Message::CallingGlobal]);
}

#[test]
fn self_recursive_call_terminates() {
    let diagnostics = analyze("function f(n) { if (n > 0) { f(n - 1) } else { ext() } } f(3)");
    assert_eq!(diagnostics, vec![Message::CallingGlobal]);
}

#[test]
fn mutually_recursive_calls_terminate() {
    let diagnostics = analyze(
        "function a() { ext(); b() } function b() { a() } a()",
    );
    assert_eq!(diagnostics, vec![Message::CallingGlobal]);
}
