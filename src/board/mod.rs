//! Bit-packed Rastros board.
//!
//! The grid is `rows x cols`; a set bit marks a free cell. Coordinates are
//! `(row, col)` with `(0, 0)` in the top-left corner. MAX wins on reaching
//! `(rows - 1, 0)` and MIN on reaching `(0, cols - 1)`. The shared marker
//! moves to any of its eight free neighbours and the cell it leaves becomes
//! blocked.

use crate::error::{EngineError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

pub mod reach;
pub mod zobrist;

pub use reach::{Reachability, UNREACHABLE};

/// A target cell `(row, col)`.
pub type Move = (usize, usize);

/// Neighbour offsets in generation order: orthogonals first, then diagonals.
pub(crate) const DIRS: [(isize, isize); 8] = [
    (-1, 0), (1, 0), (0, -1), (0, 1),
    (-1, -1), (-1, 1), (1, -1), (1, 1),
];

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Player {
    /// Player 1, racing to the bottom-left corner.
    Max,
    /// Player 2, racing to the top-right corner.
    Min,
}

impl Player {
    pub fn from_is_max(is_max: bool) -> Self { if is_max { Player::Max } else { Player::Min } }
    pub fn is_max(self) -> bool { self == Player::Max }
    pub fn opponent(self) -> Self { if self.is_max() { Player::Min } else { Player::Max } }
}

/// Game result, carrying the legacy integer codes through [`Outcome::code`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    Ongoing,
    MaxReachedGoal,
    MinReachedGoal,
    /// MAX is to move with no legal move: MIN wins.
    MaxBlocked,
    /// MIN is to move with no legal move: MAX wins.
    MinBlocked,
}

impl Outcome {
    pub fn code(self) -> i32 {
        match self {
            Outcome::Ongoing => 0,
            Outcome::MaxReachedGoal => 1,
            Outcome::MinReachedGoal => 2,
            Outcome::MaxBlocked => 3,
            Outcome::MinBlocked => 6,
        }
    }

    pub fn winner(self) -> Option<Player> {
        match self {
            Outcome::Ongoing => None,
            Outcome::MaxReachedGoal | Outcome::MinBlocked => Some(Player::Max),
            Outcome::MinReachedGoal | Outcome::MaxBlocked => Some(Player::Min),
        }
    }
}

/// What [`Board::apply_move`] needs to put the board back.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Undo {
    marker: Move,
    vacated_was_free: bool,
    active: Player,
    hash: u64,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Board {
    rows: usize,
    cols: usize,
    words_per_row: usize,
    bits: Vec<u64>,
    marker: Move,
    active: Player,
    hash: u64,
}

impl Default for Board {
    fn default() -> Self { Board::new(7, 7) }
}

/// Starting marker cell for a `rows x cols` board.
pub fn start_position(rows: usize, cols: usize) -> Move {
    let col = if cols % 2 == 0 { cols / 2 } else { cols / 2 + 1 };
    (rows / 2 - 1, col.min(cols - 1))
}

/// Parses `"row,col"`.
pub fn parse_cell(s: &str) -> Result<Move> {
    let bad = |reason: String| EngineError::BadCell { input: s.to_string(), reason };
    let (r, c) = s.split_once(',').ok_or_else(|| bad("expected row,col".to_string()))?;
    let r = r.trim().parse::<usize>().map_err(|e| bad(format!("row: {e}")))?;
    let c = c.trim().parse::<usize>().map_err(|e| bad(format!("col: {e}")))?;
    Ok((r, c))
}

impl Board {
    /// Standard game start: marker on the start cell, which is blocked, MAX to move.
    ///
    /// Panics if either dimension is below 2.
    pub fn new(rows: usize, cols: usize) -> Self {
        let mut b = Board::new_empty(rows, cols);
        b.reset_board(rows, cols, true);
        b
    }

    /// All cells free, marker at `(0, 0)`, MAX to move. Meant for loading
    /// puzzles: the caller places the marker and blocks cells afterwards.
    pub fn new_empty(rows: usize, cols: usize) -> Self {
        assert!(rows >= 2 && cols >= 2, "board must be at least 2x2, got {rows}x{cols}");
        let words_per_row = cols.div_ceil(64);
        let mut b = Board {
            rows,
            cols,
            words_per_row,
            bits: vec![0; rows * words_per_row],
            marker: (0, 0),
            active: Player::Max,
            hash: 0,
        };
        b.fill_free();
        b.hash = zobrist::compute(&b);
        b
    }

    fn fill_free(&mut self) {
        let tail = self.cols % 64;
        for r in 0..self.rows {
            for w in 0..self.words_per_row {
                let last = w + 1 == self.words_per_row;
                self.bits[r * self.words_per_row + w] =
                    if last && tail != 0 { (1u64 << tail) - 1 } else { u64::MAX };
            }
        }
    }

    pub fn rows(&self) -> usize { self.rows }
    pub fn cols(&self) -> usize { self.cols }
    pub fn marker(&self) -> Move { self.marker }
    pub fn active_player(&self) -> Player { self.active }
    pub fn hash(&self) -> u64 { self.hash }

    pub fn goal(&self, player: Player) -> Move {
        match player {
            Player::Max => (self.rows - 1, 0),
            Player::Min => (0, self.cols - 1),
        }
    }

    #[inline]
    pub fn in_bounds(&self, r: isize, c: isize) -> bool {
        r >= 0 && c >= 0 && (r as usize) < self.rows && (c as usize) < self.cols
    }

    #[inline]
    fn word_bit(&self, r: usize, c: usize) -> (usize, u64) {
        (r * self.words_per_row + c / 64, 1u64 << (c % 64))
    }

    #[inline]
    fn get_bit(&self, r: usize, c: usize) -> bool {
        let (w, m) = self.word_bit(r, c);
        self.bits[w] & m != 0
    }

    #[inline]
    fn set_bit(&mut self, r: usize, c: usize, free: bool) {
        let (w, m) = self.word_bit(r, c);
        if free { self.bits[w] |= m; } else { self.bits[w] &= !m; }
    }

    /// Changes a cell and folds the change into the hash.
    #[inline]
    fn set_cell(&mut self, r: usize, c: usize, free: bool) {
        let was = self.get_bit(r, c);
        if was == free { return; }
        let idx = r * self.cols + c;
        self.hash ^= zobrist::cell_key(idx, was) ^ zobrist::cell_key(idx, free);
        self.set_bit(r, c, free);
    }

    #[inline]
    fn place_marker(&mut self, to: Move) {
        let from = self.marker.0 * self.cols + self.marker.1;
        let dest = to.0 * self.cols + to.1;
        self.hash ^= zobrist::marker_key(from) ^ zobrist::marker_key(dest);
        self.marker = to;
    }

    /// Free-cell test; out-of-bounds cells read as blocked.
    pub fn is_free(&self, r: usize, c: usize) -> bool {
        r < self.rows && c < self.cols && self.get_bit(r, c)
    }

    #[inline]
    pub(crate) fn neighbours(&self, (r, c): Move) -> impl Iterator<Item = Move> + '_ {
        DIRS.iter().filter_map(move |&(dr, dc)| {
            let nr = r as isize + dr;
            let nc = c as isize + dc;
            if self.in_bounds(nr, nc) { Some((nr as usize, nc as usize)) } else { None }
        })
    }

    /// Free neighbours of the marker, at most eight.
    pub fn valid_moves(&self) -> Vec<Move> {
        self.neighbours(self.marker).filter(|&(r, c)| self.get_bit(r, c)).collect()
    }

    /// Same count as `valid_moves().len()` without allocating.
    pub fn move_count(&self) -> usize {
        self.neighbours(self.marker).filter(|&(r, c)| self.get_bit(r, c)).count()
    }

    /// Blocks the marker's cell, moves the marker to `target` and passes the turn.
    ///
    /// `target` is trusted to come from [`Board::valid_moves`]; an illegal
    /// target silently produces an inconsistent position.
    pub fn make_move(&mut self, target: Move) {
        let (r, c) = self.marker;
        self.set_cell(r, c, false);
        self.place_marker(target);
        self.active = self.active.opponent();
    }

    /// [`Board::make_move`] that also returns what is needed to reverse it.
    pub fn apply_move(&mut self, target: Move) -> Undo {
        let undo = Undo {
            marker: self.marker,
            vacated_was_free: self.get_bit(self.marker.0, self.marker.1),
            active: self.active,
            hash: self.hash,
        };
        self.make_move(target);
        undo
    }

    /// Reverses the matching [`Board::apply_move`]. Undo records must be
    /// replayed in reverse order of application.
    pub fn undo_move(&mut self, undo: Undo) {
        self.set_bit(undo.marker.0, undo.marker.1, undo.vacated_was_free);
        self.marker = undo.marker;
        self.active = undo.active;
        self.hash = undo.hash;
    }

    pub fn switch_player(&mut self) { self.active = self.active.opponent(); }

    pub fn on_goal(&self) -> Option<Player> {
        if self.marker == self.goal(Player::Max) {
            Some(Player::Max)
        } else if self.marker == self.goal(Player::Min) {
            Some(Player::Min)
        } else {
            None
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.on_goal().is_some() || self.move_count() == 0
    }

    pub fn outcome(&self) -> Outcome {
        match self.on_goal() {
            Some(Player::Max) => Outcome::MaxReachedGoal,
            Some(Player::Min) => Outcome::MinReachedGoal,
            None if self.move_count() > 0 => Outcome::Ongoing,
            None => match self.active {
                Player::Max => Outcome::MaxBlocked,
                Player::Min => Outcome::MinBlocked,
            },
        }
    }

    /// Chebyshev distance from `pos` to `player`'s goal.
    pub fn chebyshev_to_goal(&self, pos: Move, player: Player) -> usize {
        let (gr, gc) = self.goal(player);
        gr.abs_diff(pos.0).max(gc.abs_diff(pos.1))
    }

    // ------------------------------------------------------------------
    // Puzzle loading. Structural edits recompute or patch the hash.
    // ------------------------------------------------------------------

    /// Reinitialises the board to `rows x cols` with the standard start
    /// cell, optionally blocked, and MAX to move.
    pub fn reset_board(&mut self, rows: usize, cols: usize, block_initial: bool) {
        assert!(rows >= 2 && cols >= 2, "board must be at least 2x2, got {rows}x{cols}");
        self.rows = rows;
        self.cols = cols;
        self.words_per_row = cols.div_ceil(64);
        self.bits = vec![0; rows * self.words_per_row];
        self.fill_free();
        self.marker = start_position(rows, cols);
        if block_initial {
            let (r, c) = self.marker;
            self.set_bit(r, c, false);
        }
        self.active = Player::Max;
        self.hash = zobrist::compute(self);
    }

    /// Moves the marker without playing a move. Out-of-bounds targets are ignored.
    pub fn set_marker_pos(&mut self, r: usize, c: usize, also_block_here: bool) {
        if r >= self.rows || c >= self.cols { return; }
        self.place_marker((r, c));
        if also_block_here { self.set_cell(r, c, false); }
    }

    /// Out-of-bounds cells are ignored.
    pub fn block_cell(&mut self, r: usize, c: usize) {
        if r >= self.rows || c >= self.cols { return; }
        self.set_cell(r, c, false);
    }

    pub fn set_active_player(&mut self, player: Player) { self.active = player; }

    /// UI convention: `1` is MAX, anything else MIN.
    pub fn set_current_player_from_int(&mut self, player: i32) {
        self.active = if player == 1 { Player::Max } else { Player::Min };
    }

    pub fn recompute_hash(&self) -> u64 { zobrist::compute(self) }

    /// Puzzle position: marker on `marker` (blocked) or the standard start
    /// when `None`, extra `blocked` cells, then `player` to move (1 = MAX).
    pub fn from_puzzle(rows: usize, cols: usize, marker: Option<Move>, blocked: &[Move], player: i32) -> Self {
        let mut board = match marker {
            Some((r, c)) => {
                let mut b = Board::new_empty(rows, cols);
                b.set_marker_pos(r, c, true);
                b
            }
            None => Board::new(rows, cols),
        };
        for &(r, c) in blocked {
            board.block_cell(r, c);
        }
        board.set_current_player_from_int(player);
        board
    }

    // ------------------------------------------------------------------
    // Presentation accessors
    // ------------------------------------------------------------------

    /// `1` free, `0` blocked, one inner vector per row.
    pub fn grid(&self) -> Vec<Vec<u8>> {
        (0..self.rows).map(|r| (0..self.cols).map(|c| self.get_bit(r, c) as u8).collect()).collect()
    }

    pub fn flat_grid(&self) -> Vec<u8> {
        self.grid().into_iter().flatten().collect()
    }

    pub fn valid_moves_flat(&self) -> Vec<[usize; 2]> {
        self.valid_moves().into_iter().map(|(r, c)| [r, c]).collect()
    }

    pub fn free_count(&self) -> usize {
        self.bits.iter().map(|w| w.count_ones() as usize).sum()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for r in 0..self.rows {
            write!(f, "{r:>2}|")?;
            for c in 0..self.cols {
                let ch = if self.marker == (r, c) { 'M' } else if self.get_bit(r, c) { '1' } else { '.' };
                write!(f, "{ch} ")?;
            }
            writeln!(f)?;
        }
        write!(f, "   ")?;
        for c in 0..self.cols { write!(f, "{} ", c % 10)?; }
        writeln!(f)
    }
}
