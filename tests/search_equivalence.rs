use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use rastros::search::HeuristicCombo;
use rastros::{Board, Heuristic, SearchMode, Searcher};

/// Random non-terminal positions a few plies into a game.
fn midgames(seed: u64, count: usize) -> Vec<Board> {
    let mut rng = SmallRng::seed_from_u64(seed);
    let mut out = Vec::new();
    while out.len() < count {
        let rows = rng.gen_range(5..7);
        let cols = rng.gen_range(5..7);
        let mut b = Board::new(rows, cols);
        let plies = rng.gen_range(0..6);
        for _ in 0..plies {
            let moves = b.valid_moves();
            if b.is_terminal() || moves.is_empty() { break; }
            b.make_move(moves[rng.gen_range(0..moves.len())]);
        }
        if !b.is_terminal() {
            out.push(b);
        }
    }
    out
}

fn heuristics() -> Vec<Heuristic> {
    vec![
        Heuristic::Zero,
        Heuristic::Mobility,
        Heuristic::Composite,
        Heuristic::Combo(HeuristicCombo::I),
    ]
}

#[test]
fn alphabeta_matches_unpruned_minimax() {
    for b in midgames(7, 12) {
        let is_max = b.active_player().is_max();
        for h in heuristics() {
            let mut ab = Searcher::with_heuristic(is_max, 3, h);
            let mut mm = Searcher::with_heuristic(is_max, 3, h);
            let fast = ab.search_root(&b, None, 1, SearchMode::AlphaBeta);
            let slow = mm.search_root(&b, None, 1, SearchMode::Minimax);
            assert_eq!((fast.best, fast.score), (slow.best, slow.score), "{h:?} on\n{b}");
            assert!(fast.nodes <= slow.nodes, "{h:?}: pruned search visited more nodes");
        }
    }
}

#[test]
fn transposition_table_does_not_change_results() {
    for b in midgames(11, 12) {
        let is_max = b.active_player().is_max();
        for h in heuristics() {
            let mut with_tt = Searcher::with_heuristic(is_max, 4, h);
            let mut without = Searcher::with_heuristic(is_max, 4, h);
            without.set_use_tt(false);
            let a = with_tt.search_root(&b, None, 1, SearchMode::AlphaBeta);
            let c = without.search_root(&b, None, 1, SearchMode::AlphaBeta);
            assert_eq!((a.best, a.score), (c.best, c.score), "{h:?} on\n{b}");
        }
    }
}

#[test]
fn clearing_caches_reproduces_the_answer() {
    for b in midgames(23, 8) {
        let is_max = b.active_player().is_max();
        let mut s = Searcher::with_heuristic(is_max, 4, Heuristic::Composite);
        let first = s.search_root(&b, None, 1, SearchMode::AlphaBeta);
        s.clear_all_caches();
        let again = s.search_root(&b, None, 1, SearchMode::AlphaBeta);
        assert_eq!((first.best, first.score), (again.best, again.score));
        assert_eq!(first.nodes, again.nodes);
    }
}

#[test]
fn min_engine_agrees_with_minimax() {
    let mut b = Board::new(6, 6);
    let mv = b.valid_moves()[0];
    b.make_move(mv);
    let mut ab = Searcher::new(false, 4);
    let mut mm = Searcher::new(false, 4);
    let fast = ab.search_root(&b, None, 1, SearchMode::AlphaBeta);
    let slow = mm.search_root(&b, None, 1, SearchMode::Minimax);
    assert_eq!((fast.best, fast.score), (slow.best, slow.score));
}
