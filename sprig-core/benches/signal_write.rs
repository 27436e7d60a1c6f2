//! Benchmarks for signal write fan-out.
//!
//! Run with: cargo bench -p sprig-core --bench signal_write

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use sprig_core::reactive::{signal, Binding};
use sprig_core::view::{div, span};

// =============================================================================
// Raw bindings
// =============================================================================

fn bench_write_fan_out(c: &mut Criterion) {
    let mut group = c.benchmark_group("signal/write");

    for subscribers in [1usize, 16, 256] {
        let value = signal(0u64);
        let bindings: Vec<Binding> = (0..subscribers)
            .map(|_| {
                let source = value.clone();
                Binding::install(move || {
                    black_box(source.read());
                    Ok(())
                })
                .expect("install binding")
            })
            .collect();

        group.throughput(Throughput::Elements(subscribers as u64));
        group.bench_with_input(
            BenchmarkId::new("bindings", subscribers),
            &value,
            |b, value| {
                let mut next = 0u64;
                b.iter(|| {
                    next += 1;
                    value.write(next).expect("write");
                })
            },
        );
        drop(bindings);
    }

    group.finish();
}

// =============================================================================
// Bound text nodes
// =============================================================================

fn bench_text_tree_update(c: &mut Criterion) {
    let mut group = c.benchmark_group("signal/text_tree");

    for nodes in [8usize, 128] {
        let label = signal(String::from("0.00"));
        let tree = div(None)
            .children((0..nodes).map(|_| span(None).child(&label).build().expect("span")))
            .build()
            .expect("tree");

        group.throughput(Throughput::Elements(nodes as u64));
        group.bench_with_input(BenchmarkId::new("spans", nodes), &label, |b, label| {
            b.iter(|| label.write(String::from("1.23")).expect("write"))
        });
        black_box(tree.child_count());
    }

    group.finish();
}

criterion_group!(benches, bench_write_fan_out, bench_text_tree_update);
criterion_main!(benches);
