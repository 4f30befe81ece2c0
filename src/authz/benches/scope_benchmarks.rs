/// Benchmarks for the scope compiler
///
/// Measures performance of:
/// - Predicate compilation across schema sizes
/// - Sequential vs parallel fan-out
/// - Tensor assembly
/// - Cell-wise tensor algebra

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use datascope_authz::scope::{DimensionSchema, ScopeIndexCompiler, ScopePredicate};
use datascope_authz::ScopeConfig;

/// `rank` dimensions: one range dimension with `breakpoints` breakpoints,
/// the rest categorical with `width` values each
fn schema(rank: usize, width: usize, breakpoints: i64) -> DimensionSchema {
    let mut builder = DimensionSchema::builder().range("salary", (1..=breakpoints).map(|b| b * 10));
    for d in 1..rank {
        builder = builder.categorical(
            format!("dim{}", d),
            (0..width).map(|v| format!("v{}", v)),
        );
    }
    builder.build().unwrap()
}

fn bench_compile(c: &mut Criterion) {
    let mut group = c.benchmark_group("compile");

    let cases = vec![
        ("rank_2", schema(2, 8, 8)),
        ("rank_3", schema(3, 8, 8)),
        ("rank_4", schema(4, 8, 8)),
    ];

    for (name, schema) in cases {
        let compiler = ScopeIndexCompiler::with_config(schema, ScopeConfig::sequential());

        group.bench_with_input(BenchmarkId::new("membership", name), &compiler, |b, c| {
            b.iter(|| c.compile(black_box(&ScopePredicate::is_in("dim1", ["v1", "v3"]))).unwrap());
        });

        group.bench_with_input(BenchmarkId::new("order", name), &compiler, |b, c| {
            b.iter(|| c.compile(black_box(&ScopePredicate::gte("salary", 40))).unwrap());
        });
    }

    group.finish();
}

fn bench_fan_out(c: &mut Criterion) {
    let mut group = c.benchmark_group("fan_out");

    let schema = schema(4, 16, 16);
    let predicate = ScopePredicate::lt("salary", 120);

    let sequential = ScopeIndexCompiler::with_config(schema.clone(), ScopeConfig::sequential());
    let parallel = ScopeIndexCompiler::with_config(
        schema,
        ScopeConfig {
            parallel_threshold: 1,
            ..ScopeConfig::default()
        },
    );

    group.bench_function("sequential", |b| {
        b.iter(|| sequential.compile(black_box(&predicate)).unwrap());
    });

    group.bench_function("parallel", |b| {
        b.iter(|| parallel.compile(black_box(&predicate)).unwrap());
    });

    group.finish();
}

fn bench_tensor_algebra(c: &mut Criterion) {
    let mut group = c.benchmark_group("tensor_algebra");

    let compiler = ScopeIndexCompiler::new(schema(3, 32, 32));
    let grant = compiler
        .compile_tensor(&ScopePredicate::is_in("dim1", ["v0", "v1", "v2"]))
        .unwrap();
    let senior = compiler
        .compile_tensor(&ScopePredicate::gt("salary", 100))
        .unwrap();
    let request = grant.and(&senior).unwrap();

    group.bench_function("compile_tensor", |b| {
        b.iter(|| {
            compiler
                .compile_tensor(black_box(&ScopePredicate::gt("salary", 100)))
                .unwrap()
        });
    });

    group.bench_function("and", |b| {
        b.iter(|| black_box(&grant).and(black_box(&senior)).unwrap());
    });

    group.bench_function("or", |b| {
        b.iter(|| black_box(&grant).or(black_box(&senior)).unwrap());
    });

    group.bench_function("contains", |b| {
        b.iter(|| black_box(&grant).contains(black_box(&request)).unwrap());
    });

    group.finish();
}

criterion_group!(benches, bench_compile, bench_fan_out, bench_tensor_algebra);
criterion_main!(benches);
