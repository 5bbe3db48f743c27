use anyhow::Context;
use clap::Parser;
use rastros::board::parse_cell;
use rastros::search::HeuristicCombo;
use rastros::{Board, EngineConfig, Heuristic, OrderingPolicy, SearchMode, Searcher};
use std::path::PathBuf;
use std::time::Instant;

#[derive(Parser, Debug)]
#[command(name = "rastros-bench", version, about = "Time one Rastros root search and report telemetry")]
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

    /// Side to move and to search for: 1 = MAX, 2 = MIN
    #[arg(long, default_value_t = 1)]
    player: i32,

    /// Fixed search depth
    #[arg(long, default_value_t = 6)]
    depth: u32,

    /// Heuristic level (1..10)
    #[arg(long, default_value_t = 10)]
    level: u8,

    /// Heuristic combo label (A..J), overrides --level
    #[arg(long)]
    combo: Option<HeuristicCombo>,

    /// Ordering policy: deterministic | shuffle | noisy
    #[arg(long, default_value = "deterministic")]
    policy: OrderingPolicy,

    /// Standard deviation for the noisy policy
    #[arg(long, default_value_t = 0.75)]
    sigma: f64,

    #[arg(long, default_value_t = false)]
    shuffle_ties: bool,

    #[arg(long, default_value_t = false)]
    quiescence: bool,

    #[arg(long, default_value_t = false)]
    no_tt: bool,

    /// Run the unpruned reference search instead of alpha-beta
    #[arg(long, default_value_t = false)]
    minimax: bool,

    /// Round passed to the root; 0 triggers the opening pick
    #[arg(long, default_value_t = 1)]
    round: u32,

    #[arg(long, default_value_t = 1u64)]
    seed: u64,

    /// Engine config JSON, applied before the flags above
    #[arg(long)]
    config: Option<PathBuf>,

    /// Log level 0..5 for the engine's own diagnostics
    #[arg(long, default_value_t = 0)]
    debug: u8,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();
    anyhow::ensure!(args.rows >= 2 && args.cols >= 2, "board must be at least 2x2");
    let mut cfg = match args.config.as_deref() {
        Some(path) => {
            let text = std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
            EngineConfig::from_json_str(&text)?
        }
        None => EngineConfig::default(),
    };
    let board = Board::from_puzzle(args.rows, args.cols, args.marker, &args.blocked, args.player);
    cfg.is_max = board.active_player().is_max();
    cfg.max_depth = args.depth;
    cfg.heuristic_level = args.level;
    cfg.ordering_policy = args.policy;
    cfg.order_noise_sigma = args.sigma;
    cfg.shuffle_ties_only |= args.shuffle_ties;
    cfg.quiescence.enabled |= args.quiescence;
    cfg.use_tt = cfg.use_tt && !args.no_tt;
    cfg.debug_level = cfg.debug_level.max(args.debug);
    cfg.seed = Some(args.seed);

    let mut engine = Searcher::from_config(&cfg)?;
    if let Some(c) = args.combo {
        engine.set_heuristic(Heuristic::Combo(c));
    }
    let mode = if args.minimax { SearchMode::Minimax } else { SearchMode::AlphaBeta };

    let t0 = Instant::now();
    let out = engine.search_root(&board, None, args.round, mode);
    let dt = t0.elapsed();
    let nps = if dt.as_secs_f64() > 0.0 { out.nodes as f64 / dt.as_secs_f64() } else { 0.0 };
    let best = out.best.map_or_else(|| "(none)".to_string(), |(r, c)| format!("({r},{c})"));
    println!(
        "bestmove={} score={} nodes={} prunes={} elapsed={:.3}s nps={:.1}",
        best,
        out.score,
        out.nodes,
        out.prunes,
        dt.as_secs_f64(),
        nps
    );
    let stats = engine.stats();
    println!(
        "generated={} tt_lookups={} tt_hits={} tt_inserts={} q_nodes={}",
        stats.generated, stats.tt_lookups, stats.tt_hits, stats.tt_inserts, stats.q_nodes
    );
    println!("ordering MAX: {}", stats.ordering_max);
    println!("ordering MIN: {}", stats.ordering_min);
    Ok(())
}
