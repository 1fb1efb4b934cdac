use criterion::{black_box, criterion_group, criterion_main, Criterion};
use pathgrid::{Grid, Position, SearchState};

/// Build a maze description of side `m` whose cells are fully open, so the
/// search has the whole corridor lattice to explore.
fn open_maze_text(m: usize) -> String {
    let row = vec!["1111"; m].join(" ");
    vec![row; m].join("\n")
}

fn searchable_grid(m: usize) -> (Grid, Position, Position) {
    let grid = Grid::from_maze(&open_maze_text(m), (800, 800)).unwrap();
    let n = grid.dimension() as i32;
    (grid, Position::new(1, 1), Position::new(n - 2, n - 2))
}

fn bench_maze_search(c: &mut Criterion, m: usize) {
    let (grid, start, goal) = searchable_grid(m);

    c.bench_function(&format!("maze_search_{}", m), |b| {
        b.iter(|| {
            let mut grid = black_box(grid.clone());
            grid.set_start(black_box(start));
            grid.set_end(black_box(goal));
            let state = grid.begin_search().unwrap();
            assert!(matches!(state, SearchState::PathFound(_)));
        })
    });
}

pub fn maze_small(c: &mut Criterion) {
    bench_maze_search(c, 4);
}

pub fn maze_medium(c: &mut Criterion) {
    bench_maze_search(c, 8);
}

pub fn maze_large(c: &mut Criterion) {
    bench_maze_search(c, 16);
}

criterion_group!(benches, maze_small, maze_medium, maze_large);
criterion_main!(benches);
