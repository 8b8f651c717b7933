use criterion::{black_box, criterion_group, criterion_main, Criterion};
use narsese_kernel::config::NarConfig;
use narsese_kernel::nar::Nar;

fn deduction_chain(c: &mut Criterion) {
    c.bench_function("deduction_chain_30_cycles", |b| {
        b.iter(|| {
            let mut nar = Nar::new(NarConfig::default());
            nar.input("<bird --> animal>. %1.0;0.9%").unwrap();
            nar.input("<robin --> bird>. %1.0;0.9%").unwrap();
            black_box(nar.run(30));
        });
    });
}

fn term_interning(c: &mut Criterion) {
    c.bench_function("intern_1000_atoms", |b| {
        b.iter(|| {
            let mut store = narsese_kernel::term::TermStore::new();
            for i in 0..1000 {
                black_box(store.intern_atomic(&format!("atom{i}")).unwrap());
            }
        });
    });
}

criterion_group!(benches, deduction_chain, term_interning);
criterion_main!(benches);
