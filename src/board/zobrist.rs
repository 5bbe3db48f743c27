use crate::board::Board;

// Keys are derived on demand, so board size is unbounded.
const CELL_SEED: u64 = 0xF00D_F00D_DEAD_BEEF;
const MARKER_SEED: u64 = 0xABCD_EF12_3456_7890;

pub(crate) fn splitmix64(mut x: u64) -> u64 {
    x = x.wrapping_add(0x9E3779B97F4A7C15);
    let mut z = x;
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58476D1CE4E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D049BB133111EB);
    z ^ (z >> 31)
}

/// Key contributed by cell `index` (row-major) in the given free/blocked state.
#[inline]
pub fn cell_key(index: usize, free: bool) -> u64 {
    splitmix64(CELL_SEED ^ (((index as u64) << 1) | free as u64))
}

/// Key contributed by the marker standing on cell `index`.
#[inline]
pub fn marker_key(index: usize) -> u64 {
    splitmix64(MARKER_SEED ^ (index as u64).wrapping_mul(0x2545_F491_4F6C_DD1D))
}

/// Full recomputation; the incrementally maintained value must always match this.
pub fn compute(board: &Board) -> u64 {
    let cols = board.cols();
    let mut key = 0u64;
    for r in 0..board.rows() {
        for c in 0..cols {
            key ^= cell_key(r * cols + c, board.is_free(r, c));
        }
    }
    let (mr, mc) = board.marker();
    key ^ marker_key(mr * cols + mc)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cell_states_have_distinct_keys() {
        for i in 0..128 {
            assert_ne!(cell_key(i, true), cell_key(i, false));
            assert_ne!(cell_key(i, true), cell_key(i + 1, true));
        }
    }

    #[test]
    fn marker_keys_differ_from_cell_keys() {
        assert_ne!(marker_key(3), cell_key(3, true));
        assert_ne!(marker_key(3), cell_key(3, false));
        assert_ne!(marker_key(3), marker_key(4));
    }
}
