use crate::board::{Board, Move, Reachability};
use crate::search::alphabeta::Searcher;
use crate::search::eval::{adjust_terminal_score, evaluate_terminal};
use log::trace;

/// Neither goal is within one step.
fn is_quiet(reach: &Reachability) -> bool {
    reach.dmax.abs() > 1 && reach.dmin.abs() > 1
}

impl Searcher {
    /// Quiescence from `board` with a full window, regardless of whether the
    /// extension is enabled for the main search.
    pub fn quiescence_eval(&mut self, board: &Board, is_max: bool) -> i32 {
        self.quiescence(board, is_max, i32::MIN, i32::MAX, 0, 0)
    }

    /// Extends a horizon leaf along noisy moves only. `base_depth` is the ply
    /// of the leaf that started the extension.
    pub(crate) fn quiescence(
        &mut self,
        board: &Board,
        is_max: bool,
        mut alpha: i32,
        mut beta: i32,
        qdepth: u32,
        base_depth: u32,
    ) -> i32 {
        self.stats.q_nodes += 1;
        if board.is_terminal() {
            return adjust_terminal_score(evaluate_terminal(board, is_max), base_depth + qdepth);
        }

        // Stand pat
        let stand = self.heuristic.evaluate(board, is_max);
        if is_max {
            if stand >= beta { return stand; }
            alpha = alpha.max(stand);
        } else {
            if stand <= alpha { return stand; }
            beta = beta.min(stand);
        }

        let reach = board.compute_reachability();
        if qdepth >= self.quiescence.max_plies || is_quiet(&reach) {
            return stand;
        }

        let noisy = self.noisy_moves(board, is_max, &reach);
        if self.debug_level >= 5 {
            trace!("q d={} stand={} noisy={:?}", base_depth + qdepth, stand, noisy);
        }
        let mut best = stand;
        for mv in noisy {
            let mut child = board.clone();
            child.make_move(mv);
            let score = adjust_terminal_score(
                self.quiescence(&child, !is_max, alpha, beta, qdepth + 1, base_depth),
                base_depth + qdepth + 1,
            );
            if is_max {
                best = best.max(score);
                if best >= beta { return best; }
                alpha = alpha.max(best);
            } else {
                best = best.min(score);
                if best <= alpha { return best; }
                beta = beta.min(best);
            }
        }
        best
    }

    /// Moves that land next to a goal, swing a goal distance by at least the
    /// configured delta, or leave the opponent few replies. Best-first for the
    /// mover by `dmax + dmin` of the child.
    fn noisy_moves(&self, board: &Board, is_max: bool, base: &Reachability) -> Vec<Move> {
        let q = self.quiescence;
        let mut noisy: Vec<(i32, Move)> = Vec::new();
        for mv in board.valid_moves() {
            let mut child = board.clone();
            child.make_move(mv);
            let r = child.compute_reachability();
            let near_goal = r.dmax.abs() <= 1 || r.dmin.abs() <= 1;
            let swing = (r.dmax - base.dmax).abs() >= q.swing_delta || (r.dmin - base.dmin).abs() >= q.swing_delta;
            let cramped = child.move_count() <= q.low_mobility;
            if near_goal || swing || cramped {
                let key = if is_max { r.dmax + r.dmin } else { -(r.dmax + r.dmin) };
                noisy.push((key, mv));
            }
        }
        noisy.sort_by(|a, b| b.0.cmp(&a.0));
        noisy.into_iter().map(|(_, mv)| mv).collect()
    }
}
