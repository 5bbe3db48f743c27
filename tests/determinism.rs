use rastros::{Board, EngineConfig, Move, OrderingPolicy, Player, Searcher};

fn play_game(policy: OrderingPolicy, seed: u64) -> Vec<Move> {
    let mut cfg = EngineConfig { max_depth: 3, ordering_policy: policy, seed: Some(seed), ..EngineConfig::default() };
    let mut max_engine = Searcher::from_config(&cfg).expect("valid config");
    cfg.is_max = false;
    cfg.seed = Some(seed + 1);
    let mut min_engine = Searcher::from_config(&cfg).expect("valid config");

    let mut b = Board::new(7, 7);
    let mut moves = Vec::new();
    while !b.is_terminal() {
        let round = (moves.len() / 2) as u32;
        let engine = if b.active_player() == Player::Max { &mut max_engine } else { &mut min_engine };
        let Some(mv) = engine.choose_move(&b, None, round) else { break };
        b.make_move(mv);
        moves.push(mv);
    }
    moves
}

#[test]
fn seeded_games_repeat_exactly() {
    for policy in [OrderingPolicy::Deterministic, OrderingPolicy::ShuffleAll, OrderingPolicy::NoisyJitter] {
        let a = play_game(policy, 42);
        let b = play_game(policy, 42);
        assert_eq!(a, b, "{policy} diverged");
        assert!(!a.is_empty());
    }
}

#[test]
fn games_end_in_a_decided_outcome() {
    let moves = play_game(OrderingPolicy::Deterministic, 3);
    let mut b = Board::new(7, 7);
    for mv in moves {
        assert!(b.valid_moves().contains(&mv), "illegal move {mv:?}");
        b.make_move(mv);
    }
    assert!(b.is_terminal());
    assert!(b.outcome().winner().is_some());
}
