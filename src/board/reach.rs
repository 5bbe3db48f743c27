use crate::board::{Board, Move, Player};
use serde::Serialize;
use std::collections::VecDeque;

/// Distance magnitude reported for a goal the marker cannot reach.
pub const UNREACHABLE: i32 = 900;

/// One BFS worth of distance information from the marker.
///
/// `dmax` is the negated distance to MAX's goal and `dmin` the positive
/// distance to MIN's goal, so `dmax + dmin` already reads as "higher is
/// better for MAX". Unreachable goals report `-UNREACHABLE` / `+UNREACHABLE`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Reachability {
    pub dmax: i32,
    pub dmin: i32,
    /// Cells in the marker's component, the marker cell included.
    pub reachable: usize,
}

impl Reachability {
    pub fn max_reachable(&self) -> bool { self.dmax.abs() != UNREACHABLE }
    pub fn min_reachable(&self) -> bool { self.dmin.abs() != UNREACHABLE }
    pub fn both_unreachable(&self) -> bool { !self.max_reachable() && !self.min_reachable() }

    /// Unsigned distance to `player`'s goal, or `UNREACHABLE`.
    pub fn distance(&self, player: Player) -> i32 {
        match player {
            Player::Max => self.dmax.abs(),
            Player::Min => self.dmin.abs(),
        }
    }
}

impl Board {
    /// Single BFS from the marker over free cells.
    pub fn compute_reachability(&self) -> Reachability {
        let goal_max = self.goal(Player::Max);
        let goal_min = self.goal(Player::Min);
        let mut dmax = UNREACHABLE;
        let mut dmin = UNREACHABLE;
        let mut count = 0usize;

        let mut visited = vec![false; self.rows() * self.cols()];
        let mut queue: VecDeque<(Move, i32)> = VecDeque::with_capacity(64);
        let (mr, mc) = self.marker();
        visited[mr * self.cols() + mc] = true;
        queue.push_back((self.marker(), 0));

        while let Some((pos, dist)) = queue.pop_front() {
            count += 1;
            if pos == goal_max { dmax = dmax.min(dist); }
            if pos == goal_min { dmin = dmin.min(dist); }
            for (nr, nc) in self.neighbours(pos) {
                let idx = nr * self.cols() + nc;
                if !visited[idx] && self.is_free(nr, nc) {
                    visited[idx] = true;
                    queue.push_back(((nr, nc), dist + 1));
                }
            }
        }

        Reachability { dmax: -dmax, dmin, reachable: count }
    }

    /// Signed BFS distance to one goal: `-d` for MAX, `+d` for MIN,
    /// `∓UNREACHABLE` when cut off. Stops as soon as the goal is found.
    pub fn shortest_path_to_goal(&self, player: Player) -> i32 {
        let sign = if player.is_max() { -1 } else { 1 };
        let goal = self.goal(player);
        let mut visited = vec![false; self.rows() * self.cols()];
        let mut queue: VecDeque<(Move, i32)> = VecDeque::with_capacity(64);
        let (mr, mc) = self.marker();
        visited[mr * self.cols() + mc] = true;
        queue.push_back((self.marker(), 0));

        while let Some((pos, dist)) = queue.pop_front() {
            if pos == goal { return sign * dist; }
            for (nr, nc) in self.neighbours(pos) {
                let idx = nr * self.cols() + nc;
                if !visited[idx] && self.is_free(nr, nc) {
                    visited[idx] = true;
                    queue.push_back(((nr, nc), dist + 1));
                }
            }
        }
        sign * UNREACHABLE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_board_distances_are_chebyshev() {
        let mut b = Board::new_empty(7, 7);
        b.set_marker_pos(2, 4, true);
        let r = b.compute_reachability();
        assert_eq!(r.dmax, -4);
        assert_eq!(r.dmin, 2);
        assert_eq!(r.reachable, 49);
    }

    #[test]
    fn walled_off_goal_reports_sentinel() {
        let mut b = Board::new_empty(5, 5);
        b.set_marker_pos(0, 2, true);
        // Cut the bottom-left corner off with a diagonal-proof wall.
        b.block_cell(3, 0);
        b.block_cell(3, 1);
        b.block_cell(4, 1);
        let r = b.compute_reachability();
        assert_eq!(r.dmax, -UNREACHABLE);
        assert_eq!(r.dmin, 2);
        assert_eq!(r.reachable, 25 - 3 - 1);
        assert_eq!(b.shortest_path_to_goal(Player::Max), -UNREACHABLE);
        assert_eq!(b.shortest_path_to_goal(Player::Min), 2);
    }

    #[test]
    fn marker_on_goal_is_distance_zero() {
        let mut b = Board::new_empty(4, 4);
        b.set_marker_pos(0, 3, true);
        let r = b.compute_reachability();
        assert_eq!(r.dmin, 0);
        assert!(r.max_reachable());
    }
}
