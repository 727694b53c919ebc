//! Benchmarks for observable record mutation and notification fan-out.
//!
//! Performance budgets:
//! - `set` with 0 observers: < 50ns
//! - `set` with 16 observers: < 1µs
//!
//! Run with: cargo bench -p propwire-runtime --bench notify_bench

use std::cell::Cell;
use std::hint::black_box;
use std::rc::Rc;

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use propwire_runtime::{ObservableRecord, Subscription, observable_record};

observable_record! {
    pub struct Contact: ContactField {
        pub name: String as Name => NAME,
        pub phone: String as Phone => PHONE,
        pub address: String as Address => ADDRESS,
    }
}

fn with_observers(n: usize) -> (ObservableRecord<Contact>, Vec<Subscription>, Rc<Cell<u64>>) {
    let rec = ObservableRecord::<Contact>::default();
    let hits = Rc::new(Cell::new(0u64));
    let subs = (0..n)
        .map(|_| {
            let hits = Rc::clone(&hits);
            rec.subscribe_fn(move |_, _| hits.set(hits.get() + 1))
        })
        .collect();
    (rec, subs, hits)
}

// =============================================================================
// set fan-out
// =============================================================================

fn bench_set_fanout(c: &mut Criterion) {
    let mut group = c.benchmark_group("record/set");

    for n in [0usize, 1, 4, 16, 64] {
        group.throughput(Throughput::Elements(n.max(1) as u64));
        let (rec, _subs, hits) = with_observers(n);
        group.bench_with_input(BenchmarkId::new("observers", n), &n, |b, _| {
            b.iter(|| rec.set(Contact::NAME, black_box(String::from("Peter"))));
        });
        black_box(hits.get());
    }

    group.finish();
}

// =============================================================================
// set vs set_if_changed vs set_by_name
// =============================================================================

fn bench_set_variants(c: &mut Criterion) {
    let mut group = c.benchmark_group("record/variants");
    let (rec, _subs, _hits) = with_observers(4);
    rec.set(Contact::PHONE, "1234567".into());

    group.bench_function("set", |b| {
        b.iter(|| rec.set(Contact::PHONE, black_box(String::from("1234567"))));
    });
    group.bench_function("set_if_changed_equal", |b| {
        b.iter(|| rec.set_if_changed(Contact::PHONE, black_box(String::from("1234567"))));
    });
    group.bench_function("set_by_name", |b| {
        b.iter(|| rec.set_by_name(black_box("phone"), "1234567"));
    });

    group.finish();
}

criterion_group!(benches, bench_set_fanout, bench_set_variants);
criterion_main!(benches);
