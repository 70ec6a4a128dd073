use bookstore_model::Book;
use bookstore_reconcile::{reconcile, resolve_selected};
use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};

fn page(len: i64) -> Vec<Book> {
    (0..len).map(Book::with_id).collect()
}

fn bench_reconcile(c: &mut Criterion) {
    let mut group = c.benchmark_group("reconcile");
    for len in [20i64, 1_000, 10_000] {
        let current: Vec<Book> = (len / 2..len / 2 + 10).chain(len..len + 10).map(Book::with_id).collect();
        group.bench_with_input(BenchmarkId::from_parameter(len), &len, |b, &len| {
            b.iter(|| reconcile(black_box(page(len)), black_box(current.clone())));
        });
    }
    group.finish();
}

fn bench_resolve_selected(c: &mut Criterion) {
    let selected = page(1_000);
    let option = Book::with_id(999);
    c.bench_function("resolve_selected_last_of_1000", |b| {
        b.iter(|| resolve_selected(black_box(&option), Some(black_box(&selected[..]))));
    });
}

criterion_group!(benches, bench_reconcile, bench_resolve_selected);
criterion_main!(benches);
