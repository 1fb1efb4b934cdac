use anyhow::Context;
use pathgrid::{Grid, Position, SearchState};

fn main() -> Result<(), anyhow::Error> {
    env_logger::init();

    let file = std::env::args()
        .nth(1)
        .context("usage: pathgrid <maze-file>")?;
    let text = std::fs::read_to_string(&file).with_context(|| format!("reading {}", file))?;

    let mut grid = Grid::from_maze(&text, (800, 800))?;

    let open_cells: Vec<Position> = scan_order(grid.dimension())
        .filter(|&p| !grid.is_wall(p))
        .collect();
    let start = *open_cells.first().context("maze has no open cells")?;
    let end = *open_cells.last().context("maze has no open cells")?;
    grid.set_start(start);
    grid.set_end(end);

    match grid.begin_search()? {
        SearchState::PathFound(result) => {
            println!("{}", grid);
            let positions: Vec<String> = result.path.iter().map(|p| p.to_string()).collect();
            println!("found path: {}", positions.join(" -> "));
            println!("total cost: {}", result.total_cost);
        }
        SearchState::NoPathFound => {
            println!("{}", grid);
            println!("no path between {} and {}", start, end);
        }
        SearchState::Computing => unreachable!("begin_search runs to completion"),
    }

    Ok(())
}

fn scan_order(n: usize) -> impl Iterator<Item = Position> {
    let n = n as i32;
    (0..n).flat_map(move |y| (0..n).map(move |x| Position::new(x, y)))
}
