use autodrop_core::{Board, PieceKind};
use autodrop_eval::Weights;
use autodrop_search::ExhaustiveSearch;
use criterion::{black_box, criterion_group, criterion_main, Criterion};

fn ragged_board() -> Board {
    let mut board = Board::new(10, 20).expect("board");
    for y in 10..20 {
        board.or_row(y, 0x3FF & !(1 << ((y * 3) % 10)));
    }
    board
}

fn bench_solve(c: &mut Criterion) {
    let weights = Weights::REFERENCE;
    let search = ExhaustiveSearch::new(&weights);
    let empty = Board::new(10, 20).expect("board");
    let ragged = ragged_board();

    for kind in PieceKind::ALL {
        c.bench_function(&format!("solve_empty_{}", kind), |b| {
            b.iter(|| search.find_best_placement(black_box(&empty), kind))
        });
    }

    c.bench_function("solve_ragged_T", |b| {
        b.iter(|| search.find_best_placement(black_box(&ragged), PieceKind::T))
    });
}

criterion_group!(benches, bench_solve);
criterion_main!(benches);
