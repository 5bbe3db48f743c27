use criterion::{criterion_group, criterion_main, Criterion, black_box};
use rastros::{Board, SearchMode, Searcher};

fn bench_search(c: &mut Criterion) {
    let b = Board::new(7, 7);
    c.bench_function("search_depth_6_7x7_start", |ben| {
        ben.iter(|| {
            let mut s = Searcher::new(true, 6);
            let r = s.search_root(black_box(&b), None, 1, SearchMode::AlphaBeta);
            black_box(r.nodes)
        })
    });
    c.bench_function("search_depth_6_7x7_start_no_tt", |ben| {
        ben.iter(|| {
            let mut s = Searcher::new(true, 6);
            s.set_use_tt(false);
            let r = s.search_root(black_box(&b), None, 1, SearchMode::AlphaBeta);
            black_box(r.nodes)
        })
    });
    c.bench_function("minimax_depth_4_7x7_start", |ben| {
        ben.iter(|| {
            let mut s = Searcher::new(true, 4);
            let r = s.search_root(black_box(&b), None, 1, SearchMode::Minimax);
            black_box(r.nodes)
        })
    });
}

criterion_group!(benches, bench_search);
criterion_main!(benches);
