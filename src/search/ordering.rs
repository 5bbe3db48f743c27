use crate::board::{Board, Move};
use crate::error::{EngineError, Result};
use crate::search::eval::Heuristic;
use crate::search::noise;
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderingPolicy {
    /// Best-first by heuristic score, ties by (row, col).
    #[default]
    #[serde(rename = "deterministic")]
    Deterministic,
    /// Uniform random permutation.
    #[serde(rename = "shuffle")]
    ShuffleAll,
    /// Heuristic score plus Gaussian noise.
    #[serde(rename = "noisy")]
    NoisyJitter,
}

impl OrderingPolicy {
    pub fn name(self) -> &'static str {
        match self {
            OrderingPolicy::Deterministic => "deterministic",
            OrderingPolicy::ShuffleAll => "shuffle",
            OrderingPolicy::NoisyJitter => "noisy",
        }
    }
}

impl fmt::Display for OrderingPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.name()) }
}

impl FromStr for OrderingPolicy {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "deterministic" | "d" => Ok(OrderingPolicy::Deterministic),
            "shuffle" | "shuffleall" | "s" => Ok(OrderingPolicy::ShuffleAll),
            "noisy" | "noisyjitter" | "n" => Ok(OrderingPolicy::NoisyJitter),
            _ => Err(EngineError::UnknownPolicy { name: s.to_string() }),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MoveScore {
    pub mv: Move,
    /// Heuristic of the child from the mover's perspective.
    pub score: i32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct OrderKey {
    pub board_hash: u64,
    pub depth: u32,
    pub is_max: bool,
    pub player_search: u8,
    pub policy: OrderingPolicy,
    pub marker: Move,
}

/// Best-first for the mover: descending for MAX, ascending for MIN.
pub fn sort_deterministic(out: &mut [MoveScore], is_max: bool) {
    out.sort_by(|a, b| {
        let primary = if is_max { b.score.cmp(&a.score) } else { a.score.cmp(&b.score) };
        primary.then(a.mv.cmp(&b.mv))
    });
}

/// Scores every legal child with `heuristic`, in generation order.
pub fn score_children(board: &Board, is_max: bool, heuristic: &Heuristic) -> Vec<MoveScore> {
    board
        .valid_moves()
        .into_iter()
        .map(|mv| {
            let mut child = board.clone();
            child.make_move(mv);
            MoveScore { mv, score: heuristic.evaluate(&child, is_max) }
        })
        .collect()
}

/// Orders children per policy and memoises the result for the current root.
#[derive(Debug)]
pub struct MoveOrderer {
    policy: OrderingPolicy,
    noise_sigma: f64,
    shuffle_ties_only: bool,
    cache: HashMap<OrderKey, Vec<MoveScore>>,
}

impl Default for MoveOrderer {
    fn default() -> Self { Self::new(OrderingPolicy::Deterministic, 0.75, false) }
}

impl MoveOrderer {
    pub fn new(policy: OrderingPolicy, noise_sigma: f64, shuffle_ties_only: bool) -> Self {
        Self { policy, noise_sigma: noise_sigma.max(0.0), shuffle_ties_only, cache: HashMap::new() }
    }

    pub fn policy(&self) -> OrderingPolicy { self.policy }
    pub fn noise_sigma(&self) -> f64 { self.noise_sigma }
    pub fn shuffle_ties_only(&self) -> bool { self.shuffle_ties_only }

    pub fn set_policy(&mut self, policy: OrderingPolicy) { self.policy = policy; }
    /// Negative or NaN sigma becomes 0.
    pub fn set_noise_sigma(&mut self, sigma: f64) { self.noise_sigma = sigma.max(0.0); }
    pub fn set_shuffle_ties_only(&mut self, on: bool) { self.shuffle_ties_only = on; }

    pub fn clear(&mut self) { self.cache.clear(); }
    pub fn cached_len(&self) -> usize { self.cache.len() }

    pub fn ordered_children(
        &mut self,
        board: &Board,
        is_max: bool,
        depth: u32,
        player_search: u8,
        heuristic: &Heuristic,
        rng: &mut SmallRng,
    ) -> Vec<MoveScore> {
        let key = OrderKey {
            board_hash: board.hash(),
            depth,
            is_max,
            player_search,
            policy: self.policy,
            marker: board.marker(),
        };
        if let Some(hit) = self.cache.get(&key) {
            return hit.clone();
        }

        let mut out = score_children(board, is_max, heuristic);
        match self.policy {
            OrderingPolicy::Deterministic => sort_deterministic(&mut out, is_max),
            OrderingPolicy::ShuffleAll => out.shuffle(rng),
            OrderingPolicy::NoisyJitter => match noise::gaussian_jitter(out.len(), self.noise_sigma, rng) {
                Some(jitter) => {
                    let mut keyed: Vec<(f64, MoveScore)> =
                        out.iter().zip(jitter).map(|(ms, n)| (ms.score as f64 + n, *ms)).collect();
                    keyed.sort_by(|a, b| {
                        let primary = if is_max { b.0.total_cmp(&a.0) } else { a.0.total_cmp(&b.0) };
                        primary.then(a.1.mv.cmp(&b.1.mv))
                    });
                    out = keyed.into_iter().map(|(_, ms)| ms).collect();
                }
                None => sort_deterministic(&mut out, is_max),
            },
        }
        if self.shuffle_ties_only {
            noise::shuffle_tied_runs(&mut out, rng);
        }

        self.cache.insert(key, out.clone());
        out
    }
}
