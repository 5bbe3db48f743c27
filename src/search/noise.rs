use crate::board::{Board, Move};
use crate::search::ordering::MoveScore;
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Normal};

/// Fixed seed for reproducible runs, OS entropy otherwise.
pub fn make_rng(seed: Option<u64>) -> SmallRng {
    match seed {
        Some(s) => SmallRng::seed_from_u64(s),
        None => SmallRng::from_entropy(),
    }
}

/// Opening pick: a uniformly random legal move that does not land within
/// one step (Chebyshev) of `avoid_goal`. `None` when every move is too close.
pub fn choose_opening_move(board: &Board, avoid_goal: Move, rng: &mut SmallRng) -> Option<Move> {
    let pool: Vec<Move> = board
        .valid_moves()
        .into_iter()
        .filter(|&(r, c)| r.abs_diff(avoid_goal.0).max(c.abs_diff(avoid_goal.1)) > 1)
        .collect();
    if pool.is_empty() { return None; }
    let idx = rng.gen_range(0..pool.len());
    Some(pool[idx])
}

/// One Gaussian sample per move, drawn up front so a sort sees a fixed key.
/// `None` if `sigma` is not a usable standard deviation.
pub fn gaussian_jitter(n: usize, sigma: f64, rng: &mut SmallRng) -> Option<Vec<f64>> {
    let normal = Normal::new(0.0, sigma).ok()?;
    Some((0..n).map(|_| normal.sample(rng)).collect())
}

/// Shuffles each contiguous run of equal raw scores, leaving runs in place.
pub fn shuffle_tied_runs(out: &mut [MoveScore], rng: &mut SmallRng) {
    let mut i = 0;
    while i < out.len() {
        let mut j = i + 1;
        while j < out.len() && out[j].score == out[i].score { j += 1; }
        if j - i > 1 { out[i..j].shuffle(rng); }
        i = j;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opening_avoids_opponent_goal() {
        let mut b = Board::new_empty(7, 7);
        b.set_marker_pos(1, 5, true);
        let goal = b.goal(crate::board::Player::Min);
        for seed in 0..32u64 {
            let mut rng = make_rng(Some(seed));
            let mv = choose_opening_move(&b, goal, &mut rng).expect("safe move exists");
            assert!(mv.0.abs_diff(goal.0).max(mv.1.abs_diff(goal.1)) > 1, "seed {seed}: {mv:?}");
        }
    }

    #[test]
    fn jitter_rejects_bad_sigma() {
        let mut rng = make_rng(Some(1));
        assert!(gaussian_jitter(3, f64::NAN, &mut rng).is_none());
        assert_eq!(gaussian_jitter(3, 0.0, &mut rng).unwrap(), vec![0.0; 3]);
    }

    #[test]
    fn tie_shuffle_keeps_score_runs() {
        let mut rng = make_rng(Some(3));
        let mut v: Vec<MoveScore> = [(0, 0, 5), (0, 1, 5), (0, 2, 5), (1, 0, 2), (1, 1, 2), (2, 2, -1)]
            .iter()
            .map(|&(r, c, s)| MoveScore { mv: (r, c), score: s })
            .collect();
        shuffle_tied_runs(&mut v, &mut rng);
        let scores: Vec<i32> = v.iter().map(|m| m.score).collect();
        assert_eq!(scores, vec![5, 5, 5, 2, 2, -1]);
        assert_eq!(v[5].mv, (2, 2));
    }
}
