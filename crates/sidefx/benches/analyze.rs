//! Benchmark for the side-effect inference engine.

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use oxc_allocator::Allocator;
use oxc_parser::Parser;
use oxc_semantic::SemanticBuilder;
use oxc_span::SourceType;
use sidefx::Options;

fn analyze_source(source: &str) {
    let allocator = Allocator::default();
    let source_type = SourceType::default().with_module(true).with_jsx(true);
    let parser_ret = Parser::new(&allocator, source, source_type).parse();
    let program = parser_ret.program;
    let semantic_ret = SemanticBuilder::new().build(&program);
    let symbols = semantic_ret.semantic.symbols();
    let options = Options::default();
    sidefx::analyze(&program, symbols, source, &program.comments, &options).unwrap();
}

fn bench_small_module(c: &mut Criterion) {
    let source = r#"
        import { ref, computed } from "vue";

        const count = ref(0);
        const doubled = computed(() => count.value * 2);

        export function useCounter() {
            function increment(state) {
                state.value += 1;
            }
            return { count, doubled, increment };
        }
    "#;

    let mut group = c.benchmark_group("analyze");
    group.throughput(Throughput::Bytes(source.len() as u64));
    group.bench_function("small_module", |b| b.iter(|| analyze_source(black_box(source))));
    group.finish();
}

fn bench_large_module(c: &mut Criterion) {
    let mut source = String::from("import { ext } from \"mod\";\n");
    for i in 0..200 {
        source.push_str(&format!(
            "export function fn{i}(a) {{ if (a) {{ ext(); }} else {{ a.prop = {i}; }} return a; }}\n"
        ));
    }
    for i in 0..200 {
        source.push_str(&format!("fn{i}(ext);\n"));
    }

    let mut group = c.benchmark_group("analyze");
    group.throughput(Throughput::Bytes(source.len() as u64));
    group.bench_function("large_module", |b| b.iter(|| analyze_source(black_box(&source))));
    group.finish();
}

criterion_group!(benches, bench_small_module, bench_large_module);
criterion_main!(benches);
