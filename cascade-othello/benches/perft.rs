use cascade_othello::test_utils::perft;
use cascade_othello::{codec, Board};
use criterion::*;

fn criterion_perft(c: &mut Criterion) {
    let mut group = c.benchmark_group("perft");
    group.sample_size(50);

    for depth in 1..6 {
        group.bench_with_input(BenchmarkId::from_parameter(depth), &depth, |b, &depth| {
            b.iter(|| perft::run_perft(black_box(depth)))
        });
    }

    group.finish();
}

fn criterion_canonical(c: &mut Criterion) {
    let (board, _) =
        codec::decode("X-O------O------OOXX-------XX------XXX-------------------------- O;")
            .unwrap();

    c.bench_function("canonical", |b| b.iter(|| black_box(board).canonical()));
    c.bench_function("get_moves", |b| b.iter(|| black_box(Board::new()).get_moves()));
}

criterion_group!(benches, criterion_perft, criterion_canonical);
criterion_main!(benches);
