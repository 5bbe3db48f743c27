use rastros::search::eval::chebyshev_distance;
use rastros::search::SearchCtx;
use rastros::{Board, Player, SearchMode, Searcher};

#[test]
fn max_takes_adjacent_goal() {
    let mut b = Board::new_empty(7, 7);
    b.set_marker_pos(5, 1, true);
    let mut s = Searcher::new(true, 1);
    assert_eq!(s.choose_move(&b, None, 1), Some((6, 0)));
}

#[test]
fn min_takes_adjacent_goal() {
    let mut b = Board::new_empty(7, 7);
    b.set_marker_pos(1, 5, true);
    b.set_active_player(Player::Min);
    let mut s = Searcher::new(false, 3);
    let out = s.search_root(&b, None, 1, SearchMode::AlphaBeta);
    assert_eq!(out.best, Some((0, 6)));
    assert_eq!(out.score, -999);
}

#[test]
fn max_avoids_handing_min_the_goal() {
    let b = Board::new(7, 7);
    let mut s = Searcher::new(true, 2);
    let mv = s.choose_move(&b, None, 1).expect("move available");
    assert_ne!(mv, (1, 5));
    assert!(chebyshev_distance(&b, mv, false) > 1);
}

#[test]
fn depth_override_zero_is_greedy() {
    let b = Board::new(7, 7);
    let mut s = Searcher::new(true, 8);
    let out = s.search_root(&b, Some(0), 1, SearchMode::AlphaBeta);
    assert!(out.best.is_some());
    assert_eq!(out.nodes as usize, b.valid_moves().len());
}

#[test]
fn opening_keeps_clear_of_opponent_goal() {
    let b = Board::new(5, 5);
    assert_eq!(b.marker(), (1, 3));
    let allowed = [(0, 2), (1, 2), (2, 2), (2, 3), (2, 4)];
    for seed in 0..40u64 {
        let mut s = Searcher::new(true, 4);
        s.reseed(Some(seed));
        let out = s.search_root(&b, None, 0, SearchMode::AlphaBeta);
        let mv = out.best.expect("opening move");
        assert!(allowed.contains(&mv), "seed {seed} picked {mv:?}");
        assert_eq!(out.nodes, 0);
    }
}

#[test]
fn opening_falls_back_to_search_when_every_move_is_close() {
    let mut b = Board::new_empty(4, 4);
    b.set_marker_pos(1, 2, true);
    for (r, c) in [(2, 2), (1, 1), (0, 1), (2, 1), (2, 3)] {
        b.block_cell(r, c);
    }
    let mut s = Searcher::new(true, 2);
    s.reseed(Some(5));
    let out = s.search_root(&b, None, 0, SearchMode::AlphaBeta);
    assert!(out.nodes > 0);
    let mv = out.best.expect("move available");
    assert_ne!(mv, (0, 3));
    assert_eq!(out.score, -999);
}

#[test]
fn no_legal_moves_yields_none() {
    let mut b = Board::new_empty(3, 3);
    b.set_marker_pos(1, 1, true);
    for (r, c) in [(0, 0), (0, 1), (1, 0), (1, 2), (2, 1), (2, 2)] {
        b.block_cell(r, c);
    }
    b.block_cell(0, 2);
    b.block_cell(2, 0);
    let mut s = Searcher::new(true, 3);
    assert_eq!(s.choose_move(&b, None, 1), None);
}

#[test]
fn quicker_wins_score_higher() {
    let mut b = Board::new_empty(7, 7);
    b.set_marker_pos(5, 1, true);
    let ctx = SearchCtx { depth_limit: 4, player_search: 1 };
    let near = Searcher::new(true, 4).search(&b, true, 1, i32::MIN, i32::MAX, ctx);
    let far = Searcher::new(true, 4).search(&b, true, 3, i32::MIN, i32::MAX, ctx);
    assert_eq!(near, 999);
    assert_eq!(far, 997);
    assert!(near > far);
}

#[test]
fn counters_accumulate_across_searches() {
    let b = Board::new(7, 7);
    let mut s = Searcher::new(true, 3);
    let first = s.search_root(&b, None, 1, SearchMode::AlphaBeta);
    let second = s.search_root(&b, None, 1, SearchMode::AlphaBeta);
    assert_eq!(s.eval_successors(), first.nodes + second.nodes);
    assert!(s.generated_successors() > 0);
    s.reset_stats();
    assert_eq!(s.eval_successors(), 0);
}
