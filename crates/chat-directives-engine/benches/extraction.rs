use chat_directives_engine::{ExtractOptions, extract, scan};
use criterion::{Criterion, criterion_group, criterion_main};
mod common;

fn bench_scan(c: &mut Criterion) {
    let mut group = c.benchmark_group("scan");
    group.sample_size(20);

    for size in [1, 10, 100] {
        let content = common::generate_reply(size);
        group.bench_function(format!("reply_x{size}"), |b| {
            b.iter(|| std::hint::black_box(scan(std::hint::black_box(&content))));
        });
    }

    let prose = common::generate_prose(100);
    group.bench_function("prose_x100", |b| {
        b.iter(|| std::hint::black_box(scan(std::hint::black_box(&prose))));
    });

    group.finish();
}

fn bench_extract(c: &mut Criterion) {
    let mut group = c.benchmark_group("extract");
    group.sample_size(20);

    let catalog = common::catalog();
    let options = ExtractOptions::default();
    for size in [1, 10, 100] {
        let content = common::generate_reply(size);
        group.bench_function(format!("reply_x{size}"), |b| {
            b.iter(|| {
                let out = extract(std::hint::black_box(&content), &catalog, &options);
                std::hint::black_box(out);
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_scan, bench_extract);
criterion_main!(benches);
