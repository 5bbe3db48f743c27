use crate::board::{Board, Move, Player, Reachability};
use crate::error::{EngineError, Result};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

// Terminal scoring
pub const WIN_SCORE: i32 = 1000;

// Composite term weights
pub const PARITY_BONUS: i32 = 200;
pub const DIAG_PENALTY: i32 = 40;
const TRAP_PENALTY: i32 = 5;
const CORNER_BONUS: i32 = 10;
const QUADRANT_BONUS: i32 = 10;

/// Levels accepted by [`Heuristic::from_level`].
pub const REGISTERED_LEVELS: [u8; 10] = [1, 2, 3, 4, 5, 6, 7, 8, 9, 10];

/// Fixed value of a finished game. Goal arrivals are absolute (MAX goal
/// `+1000`, MIN goal `-1000`); a stuck side to move loses. Non-terminal
/// boards score 0.
pub fn evaluate_terminal(board: &Board, is_max: bool) -> i32 {
    match board.on_goal() {
        Some(Player::Max) => WIN_SCORE,
        Some(Player::Min) => -WIN_SCORE,
        None if board.move_count() == 0 => if is_max { -WIN_SCORE } else { WIN_SCORE },
        None => 0,
    }
}

/// Prefer quicker wins and slower losses: exact `±WIN_SCORE` values move
/// toward zero by `depth`; everything else passes through.
#[inline]
pub fn adjust_terminal_score(score: i32, depth: u32) -> i32 {
    if score == WIN_SCORE { score - depth as i32 }
    else if score == -WIN_SCORE { score + depth as i32 }
    else { score }
}

// ----------------------------------------------------------------------------
// Primitive measures
// ----------------------------------------------------------------------------

/// Legal move count, positive for MAX and negative for MIN.
pub fn available_choices(board: &Board, is_max: bool) -> i32 {
    let n = board.move_count() as i32;
    if is_max { n } else { -n }
}

/// Chebyshev distance from `pos` to the goal of the side named by `is_max`.
pub fn chebyshev_distance(board: &Board, pos: Move, is_max: bool) -> i32 {
    board.chebyshev_to_goal(pos, Player::from_is_max(is_max)) as i32
}

/// Only fires when both goals are cut off. An even reachable region is
/// worth `+PARITY_BONUS` to the MAX perspective and `-PARITY_BONUS` to the
/// MIN perspective; odd regions flip both signs.
pub fn parity_bonus(reach: &Reachability, is_max: bool) -> i32 {
    if !reach.both_unreachable() { return 0; }
    let even = reach.reachable % 2 == 0;
    match (even, is_max) {
        (true, true) | (false, false) => PARITY_BONUS,
        _ => -PARITY_BONUS,
    }
}

/// Penalises a side whose goal-adjacent diagonal cell is blocked, unless that
/// side is to move and one step from its goal. MAX-signed; 0 on terminal boards.
pub fn diag_block_penalty(board: &Board) -> i32 {
    if board.is_terminal() { return 0; }
    diag_block_penalty_with(board, &board.compute_reachability())
}

pub(crate) fn diag_block_penalty_with(board: &Board, reach: &Reachability) -> i32 {
    if board.is_terminal() { return 0; }
    let max_to_move = board.active_player().is_max();
    let max_wins_next = max_to_move && reach.dmax.abs() == 1;
    let min_wins_next = !max_to_move && reach.dmin.abs() == 1;
    let (rows, cols) = (board.rows(), board.cols());

    let mut score = 0;
    // MAX goal (rows-1, 0) is approached diagonally through (rows-2, 1).
    if cols > 1 && !board.is_free(rows - 2, 1) && !max_wins_next {
        score -= DIAG_PENALTY;
    }
    // MIN goal (0, cols-1) through (1, cols-2).
    if rows > 1 && !board.is_free(1, cols - 2) && !min_wins_next {
        score += DIAG_PENALTY;
    }
    score
}

/// Few replies left: bad for the side to evaluate.
pub fn trap_penalty(board: &Board, is_max: bool) -> i32 {
    if board.move_count() > 2 { return 0; }
    if is_max { -TRAP_PENALTY } else { TRAP_PENALTY }
}

/// Marker in one of the two non-goal corners.
pub fn corner_bonus(board: &Board, pos: Move, is_max: bool) -> i32 {
    let corner = pos == (0, 0) || pos == (board.rows() - 1, board.cols() - 1);
    match (corner, is_max) {
        (false, _) => 0,
        (true, true) => CORNER_BONUS,
        (true, false) => -CORNER_BONUS,
    }
}

/// Marker inside the quadrant of the evaluating side's goal.
pub fn quadrant_bonus(board: &Board, pos: Move, is_max: bool) -> i32 {
    let (mid_r, mid_c) = (board.rows() / 2, board.cols() / 2);
    if is_max && pos.0 > mid_r && pos.1 < mid_c { return QUADRANT_BONUS; }
    if !is_max && pos.0 < mid_r && pos.1 > mid_c { return -QUADRANT_BONUS; }
    0
}

/// How much the real path to each goal exceeds the straight-line distance,
/// once that detour is more than two steps. MAX-signed.
pub fn detour_penalty(board: &Board, reach: &Reachability) -> i32 {
    let pos = board.marker();
    let mut penalty = 0;
    let cheb_max = chebyshev_distance(board, pos, true);
    if reach.max_reachable() && cheb_max + 2 < reach.dmax.abs() {
        penalty -= reach.dmax.abs() - cheb_max;
    }
    let cheb_min = chebyshev_distance(board, pos, false);
    if reach.min_reachable() && cheb_min + 2 < reach.dmin.abs() {
        penalty += reach.dmin.abs() - cheb_min;
    }
    penalty
}

/// Every evaluation term for one board and perspective.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct EvalBreakdown {
    pub dmax: i32,
    pub dmin: i32,
    pub reachable: usize,
    pub parity: i32,
    pub mobility: i32,
    pub diag: i32,
    pub detour: i32,
    pub trap: i32,
    pub corner: i32,
    pub quadrant: i32,
}

impl EvalBreakdown {
    pub fn compute(board: &Board, is_max: bool) -> Self {
        let reach = board.compute_reachability();
        let pos = board.marker();
        Self {
            dmax: reach.dmax,
            dmin: reach.dmin,
            reachable: reach.reachable,
            parity: parity_bonus(&reach, is_max),
            mobility: available_choices(board, is_max),
            diag: diag_block_penalty_with(board, &reach),
            detour: detour_penalty(board, &reach),
            trap: trap_penalty(board, is_max),
            corner: corner_bonus(board, pos, is_max),
            quadrant: quadrant_bonus(board, pos, is_max),
        }
    }

    /// The composite score used by the top levels. Mobility is reported but
    /// not summed in.
    pub fn composite(&self) -> i32 { self.dmax + self.dmin + self.parity + self.diag }
}

/// `Dmax + Dmin + Parity + DiagonalBlock`. Mobility is not a term here;
/// combos E, F, H and I add it.
pub fn composite(board: &Board, is_max: bool) -> i32 {
    let reach = board.compute_reachability();
    reach.dmax + reach.dmin + parity_bonus(&reach, is_max) + diag_block_penalty_with(board, &reach)
}

// ----------------------------------------------------------------------------
// Heuristic combos A..J
// ----------------------------------------------------------------------------

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HeuristicCombo { A, B, C, D, E, F, G, H, I, J }

impl HeuristicCombo {
    pub const ALL: [HeuristicCombo; 10] = [
        HeuristicCombo::A, HeuristicCombo::B, HeuristicCombo::C, HeuristicCombo::D, HeuristicCombo::E,
        HeuristicCombo::F, HeuristicCombo::G, HeuristicCombo::H, HeuristicCombo::I, HeuristicCombo::J,
    ];

    pub fn score(self, t: &EvalBreakdown) -> i32 {
        let paths = t.dmax + t.dmin;
        match self {
            HeuristicCombo::A => t.dmax,
            HeuristicCombo::B => t.dmin,
            HeuristicCombo::C => paths,
            HeuristicCombo::D => paths + t.parity,
            HeuristicCombo::E => paths + t.mobility,
            HeuristicCombo::F => paths + t.parity + t.mobility,
            HeuristicCombo::G => paths + t.parity + t.diag,
            HeuristicCombo::H => paths + t.mobility + t.diag,
            HeuristicCombo::I => paths + t.parity + t.mobility + t.diag,
            HeuristicCombo::J => paths + t.diag,
        }
    }

    pub fn evaluate(self, board: &Board, is_max: bool) -> i32 {
        self.score(&EvalBreakdown::compute(board, is_max))
    }
}

impl fmt::Display for HeuristicCombo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "{self:?}") }
}

impl FromStr for HeuristicCombo {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self> {
        let label = s.trim().to_ascii_uppercase();
        HeuristicCombo::ALL
            .into_iter()
            .find(|c| c.to_string() == label)
            .ok_or(EngineError::UnknownCombo { label: s.to_string() })
    }
}

// ----------------------------------------------------------------------------
// Level registry
// ----------------------------------------------------------------------------

/// Scoring function selected once at engine construction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Heuristic {
    /// Always 0.
    Zero,
    /// Chebyshev distance to the evaluating side's own goal.
    OwnChebyshev,
    /// Chebyshev distance to MIN's goal minus distance to MAX's goal.
    CombinedChebyshev,
    /// BFS distance to the evaluating side's own goal.
    OwnPath,
    /// Raw legal-move count.
    Mobility,
    /// `Dmax + Dmin`.
    PathSum,
    /// `Dmax + Dmin + Parity + DiagonalBlock`.
    Composite,
    Combo(HeuristicCombo),
}

impl Heuristic {
    /// The level factory. Unregistered levels are rejected immediately.
    pub fn from_level(level: u8) -> Result<Self> {
        Ok(match level {
            1 => Heuristic::Zero,
            2 | 3 => Heuristic::OwnChebyshev,
            4 => Heuristic::CombinedChebyshev,
            5 => Heuristic::OwnPath,
            6 => Heuristic::Mobility,
            7 => Heuristic::PathSum,
            8..=10 => Heuristic::Composite,
            _ => return Err(EngineError::UnknownHeuristicLevel { level }),
        })
    }

    /// Score `board` from the perspective named by `is_max`; higher favours MAX.
    pub fn evaluate(&self, board: &Board, is_max: bool) -> i32 {
        match *self {
            Heuristic::Zero => 0,
            Heuristic::OwnChebyshev => {
                let d = chebyshev_distance(board, board.marker(), is_max);
                if is_max { -d } else { d }
            }
            Heuristic::CombinedChebyshev => {
                let pos = board.marker();
                chebyshev_distance(board, pos, false) - chebyshev_distance(board, pos, true)
            }
            Heuristic::OwnPath => {
                let d = board.shortest_path_to_goal(Player::from_is_max(is_max)).abs();
                if is_max { -d } else { d }
            }
            Heuristic::Mobility => board.move_count() as i32,
            Heuristic::PathSum => {
                let r = board.compute_reachability();
                r.dmax + r.dmin
            }
            Heuristic::Composite => composite(board, is_max),
            Heuristic::Combo(c) => c.evaluate(board, is_max),
        }
    }
}

impl Default for Heuristic {
    fn default() -> Self { Heuristic::Composite }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terminal_scores() {
        let mut b = Board::new_empty(5, 5);
        b.set_marker_pos(4, 0, true);
        assert_eq!(evaluate_terminal(&b, false), WIN_SCORE);
        b.set_marker_pos(0, 4, true);
        assert_eq!(evaluate_terminal(&b, true), -WIN_SCORE);
        b.set_marker_pos(2, 2, false);
        assert_eq!(evaluate_terminal(&b, true), 0);
    }

    #[test]
    fn adjustment_only_touches_exact_wins() {
        assert_eq!(adjust_terminal_score(WIN_SCORE, 3), 997);
        assert_eq!(adjust_terminal_score(-WIN_SCORE, 3), -997);
        assert_eq!(adjust_terminal_score(999, 3), 999);
        assert_eq!(adjust_terminal_score(-12, 3), -12);
    }

    #[test]
    fn combo_labels_parse() {
        assert_eq!("g".parse::<HeuristicCombo>().unwrap(), HeuristicCombo::G);
        assert!("Z".parse::<HeuristicCombo>().is_err());
    }

    #[test]
    fn registry_covers_levels() {
        for lvl in REGISTERED_LEVELS {
            assert!(Heuristic::from_level(lvl).is_ok(), "level {lvl}");
        }
        assert!(Heuristic::from_level(0).is_err());
        assert!(Heuristic::from_level(11).is_err());
    }
}
