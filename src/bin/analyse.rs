use clap::Parser;
use rastros::board::parse_cell;
use rastros::search::{EvalBreakdown, HeuristicCombo};
use rastros::Board;

#[derive(Parser, Debug)]
#[command(name = "rastros-analyse", version, about = "Dump reachability and evaluator terms for a Rastros position as JSON")]
struct Args {
    #[arg(long, default_value_t = 7)]
    rows: usize,

    #[arg(long, default_value_t = 7)]
    cols: usize,

    /// Marker cell as "row,col"; the standard start cell when omitted
    #[arg(long, value_parser = parse_cell)]
    marker: Option<(usize, usize)>,

    /// Extra blocked cell as "row,col" (repeatable)
    #[arg(long = "block", value_parser = parse_cell)]
    blocked: Vec<(usize, usize)>,

    /// Side to move: 1 = MAX, 2 = MIN
    #[arg(long, default_value_t = 1)]
    player: i32,

    /// Also print the board grid to stderr
    #[arg(long, default_value_t = false)]
    show: bool,
}

fn perspective(board: &Board, is_max: bool) -> serde_json::Value {
    let t = EvalBreakdown::compute(board, is_max);
    let combos: serde_json::Map<String, serde_json::Value> = HeuristicCombo::ALL
        .iter()
        .map(|c| (c.to_string(), serde_json::Value::from(c.score(&t))))
        .collect();
    serde_json::json!({
        "terms": t,
        "composite": t.composite(),
        "combos": combos,
    })
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();
    anyhow::ensure!(args.rows >= 2 && args.cols >= 2, "board must be at least 2x2");
    let board = Board::from_puzzle(args.rows, args.cols, args.marker, &args.blocked, args.player);
    if args.show {
        eprint!("{board}");
    }

    let payload = serde_json::json!({
        "rows": board.rows(),
        "cols": board.cols(),
        "marker": [board.marker().0, board.marker().1],
        "active": board.active_player(),
        "outcome": board.outcome().code(),
        "valid_moves": board.valid_moves_flat(),
        "reachability": board.compute_reachability(),
        "max": perspective(&board, true),
        "min": perspective(&board, false),
    });
    println!("{}", serde_json::to_string_pretty(&payload)?);
    Ok(())
}
