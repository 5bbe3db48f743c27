use crate::board::{Board, Move, Player};
use crate::config::{EngineConfig, QuiescenceConfig};
use crate::error::Result;
use crate::search::eval::{adjust_terminal_score, evaluate_terminal, Heuristic};
use crate::search::noise;
use crate::search::ordering::{MoveOrderer, MoveScore, OrderingPolicy};
use crate::search::stats::{OrderingStats, SearchStats};
use crate::search::tt::{Bound, Entry, HeuristicKey, StateKey, Tt};
use log::{debug, info, trace};
use rand::rngs::SmallRng;
use std::collections::HashMap;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SearchMode {
    #[default]
    AlphaBeta,
    /// Full-width minimax: no pruning, no TT. Reference for testing.
    Minimax,
}

/// Fixed for the duration of one root search.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SearchCtx {
    pub depth_limit: u32,
    /// 1 when the root engine plays MAX, 2 when it plays MIN.
    pub player_search: u8,
}

#[derive(Default, Debug, Clone, PartialEq, Eq)]
pub struct SearchOutcome {
    pub best: Option<Move>,
    pub score: i32,
    /// Nodes searched by this call.
    pub nodes: u64,
    /// Cutoffs taken by this call.
    pub prunes: u64,
}

/// One engine instance: side, depth, heuristic and every cache it owns.
pub struct Searcher {
    pub(crate) is_max: bool,
    pub(crate) max_depth: u32,
    pub(crate) heuristic: Heuristic,
    pub(crate) orderer: MoveOrderer,
    pub(crate) tt: Tt,
    pub(crate) heuristic_cache: HashMap<HeuristicKey, i32>,
    pub(crate) quiescence: QuiescenceConfig,
    pub(crate) use_tt: bool,
    pub(crate) debug_level: u8,
    pub(crate) rng: SmallRng,
    pub(crate) stats: SearchStats,
}

impl Default for Searcher {
    fn default() -> Self { Self::new(true, 6) }
}

impl Searcher {
    /// Composite heuristic, deterministic ordering, entropy-seeded RNG.
    pub fn new(is_max: bool, max_depth: u32) -> Self {
        Self::with_heuristic(is_max, max_depth, Heuristic::default())
    }

    pub fn with_heuristic(is_max: bool, max_depth: u32, heuristic: Heuristic) -> Self {
        Self {
            is_max,
            max_depth,
            heuristic,
            orderer: MoveOrderer::default(),
            tt: Tt::new(),
            heuristic_cache: HashMap::new(),
            quiescence: QuiescenceConfig::default(),
            use_tt: true,
            debug_level: 0,
            rng: noise::make_rng(None),
            stats: SearchStats::default(),
        }
    }

    /// Level factory entry point. Fails on an unregistered level.
    pub fn with_level(is_max: bool, max_depth: u32, level: u8, debug_level: u8) -> Result<Self> {
        let mut s = Self::with_heuristic(is_max, max_depth, Heuristic::from_level(level)?);
        s.set_debug_level(debug_level);
        Ok(s)
    }

    pub fn from_config(cfg: &EngineConfig) -> Result<Self> {
        let mut s = Self::with_heuristic(cfg.is_max, cfg.max_depth, Heuristic::from_level(cfg.heuristic_level)?);
        s.orderer = MoveOrderer::new(cfg.ordering_policy, cfg.order_noise_sigma, cfg.shuffle_ties_only);
        s.quiescence = cfg.quiescence;
        s.use_tt = cfg.use_tt;
        s.set_debug_level(cfg.debug_level);
        s.rng = noise::make_rng(cfg.seed);
        Ok(s)
    }

    pub fn is_max(&self) -> bool { self.is_max }
    pub fn max_depth(&self) -> u32 { self.max_depth }
    pub fn heuristic(&self) -> Heuristic { self.heuristic }
    pub fn debug_level(&self) -> u8 { self.debug_level }
    pub fn ordering_policy(&self) -> OrderingPolicy { self.orderer.policy() }
    pub fn quiescence_config(&self) -> QuiescenceConfig { self.quiescence }

    pub fn set_max_depth(&mut self, depth: u32) { self.max_depth = depth; }
    pub fn set_heuristic(&mut self, heuristic: Heuristic) {
        self.heuristic = heuristic;
        self.clear_all_caches();
    }
    pub fn set_ordering_policy(&mut self, policy: OrderingPolicy) { self.orderer.set_policy(policy); }
    pub fn set_order_noise(&mut self, sigma: f64) { self.orderer.set_noise_sigma(sigma); }
    pub fn set_shuffle_ties_only(&mut self, on: bool) { self.orderer.set_shuffle_ties_only(on); }
    pub fn set_use_tt(&mut self, on: bool) { self.use_tt = on; }
    /// 0 silent .. 5 most verbose.
    pub fn set_debug_level(&mut self, level: u8) { self.debug_level = level.min(5); }

    pub fn set_quiescence(&mut self, enabled: bool, max_plies: u32, swing_delta: i32, low_mobility: usize) {
        self.quiescence = QuiescenceConfig { enabled, max_plies, swing_delta, low_mobility };
    }

    pub fn set_quiescence_config(&mut self, cfg: QuiescenceConfig) { self.quiescence = cfg; }

    /// Reseeds the engine RNG; `None` draws fresh entropy.
    pub fn reseed(&mut self, seed: Option<u64>) { self.rng = noise::make_rng(seed); }

    pub fn clear_tt(&mut self) { self.tt.clear(); }
    pub fn clear_order_caches(&mut self) { self.orderer.clear(); }
    pub fn clear_heuristic_caches(&mut self) { self.heuristic_cache.clear(); }
    pub fn clear_all_caches(&mut self) {
        self.clear_tt();
        self.clear_order_caches();
        self.clear_heuristic_caches();
    }

    pub fn stats(&self) -> &SearchStats { &self.stats }
    pub fn eval_successors(&self) -> u64 { self.stats.nodes }
    pub fn generated_successors(&self) -> u64 { self.stats.generated }
    pub fn prunes(&self) -> u64 { self.stats.prunes }
    pub fn ordering_stats(&self, is_max: bool) -> OrderingStats {
        if is_max { self.stats.ordering_max } else { self.stats.ordering_min }
    }
    pub fn reset_ordering_stats(&mut self) { self.stats.reset_ordering(); }
    pub fn reset_stats(&mut self) { self.stats = SearchStats::default(); }

    pub fn log_ordering_stats(&self) {
        info!("[ordering] MAX {}", self.stats.ordering_max);
        info!("[ordering] MIN {}", self.stats.ordering_min);
    }

    pub fn tt_len(&self) -> usize { self.tt.len() }

    /// Looks up `board` as this engine's own search would key it.
    pub fn tt_probe(&self, board: &Board, is_max: bool) -> Option<(u32, Bound, i32)> {
        self.tt.get(&StateKey::new(board, is_max, self.player_search_tag())).map(|e| (e.depth, e.bound, e.value))
    }

    pub fn player_search_tag(&self) -> u8 { if self.is_max { 1 } else { 2 } }

    fn side_label(&self) -> &'static str { if self.is_max { "MAX" } else { "MIN" } }

    /// Best move for this engine's side, or `None` when it has no legal move.
    pub fn choose_move(&mut self, board: &Board, depth_override: Option<u32>, round: u32) -> Option<Move> {
        self.search_root(board, depth_override, round, SearchMode::AlphaBeta).best
    }

    pub fn search_root(
        &mut self,
        board: &Board,
        depth_override: Option<u32>,
        round: u32,
        mode: SearchMode,
    ) -> SearchOutcome {
        let nodes0 = self.stats.nodes;
        let prunes0 = self.stats.prunes;

        if round == 0 {
            let avoid = board.goal(Player::from_is_max(self.is_max).opponent());
            if let Some(mv) = noise::choose_opening_move(board, avoid, &mut self.rng) {
                if self.debug_level >= 1 {
                    info!("[{}] opening move ({}, {})", self.side_label(), mv.0, mv.1);
                }
                return self.outcome(Some(mv), 0, nodes0, prunes0);
            }
        }

        self.clear_order_caches();
        self.clear_heuristic_caches();
        self.tt.bump_generation();
        let ctx = SearchCtx {
            depth_limit: depth_override.unwrap_or(self.max_depth),
            player_search: self.player_search_tag(),
        };

        let root = self.ordered_children(board, self.is_max, 0, ctx.player_search);
        if root.is_empty() {
            return self.outcome(None, evaluate_terminal(board, self.is_max), nodes0, prunes0);
        }
        if self.debug_level >= 2 {
            let listed: Vec<String> = root.iter().map(|m| format!("({},{})={}", m.mv.0, m.mv.1, m.score)).collect();
            debug!("[{}] depth={} root order: {}", self.side_label(), ctx.depth_limit, listed.join(" "));
        }

        let mut best_move = root[0].mv;
        let mut best_score = if self.is_max { i32::MIN } else { i32::MAX };
        for ms in &root {
            let mut child = board.clone();
            child.make_move(ms.mv);
            if child.is_terminal() {
                let v = adjust_terminal_score(evaluate_terminal(&child, !self.is_max), 1);
                if (self.is_max && v > 0) || (!self.is_max && v < 0) {
                    if self.debug_level >= 1 {
                        info!("[{}] immediate win ({}, {}) score={}", self.side_label(), ms.mv.0, ms.mv.1, v);
                    }
                    return self.outcome(Some(ms.mv), v, nodes0, prunes0);
                }
            }
            let score = match mode {
                SearchMode::AlphaBeta => self.search(&child, !self.is_max, 1, i32::MIN, i32::MAX, ctx),
                SearchMode::Minimax => self.minimax(&mut child, !self.is_max, 1, ctx),
            };
            if self.debug_level >= 2 {
                debug!("[{}] root ({}, {}) -> {}", self.side_label(), ms.mv.0, ms.mv.1, score);
            }
            if (self.is_max && score > best_score) || (!self.is_max && score < best_score) {
                best_score = score;
                best_move = ms.mv;
            }
        }

        if self.debug_level >= 1 {
            info!(
                "[{}] best ({}, {}) score={} nodes={} prunes={}",
                self.side_label(),
                best_move.0,
                best_move.1,
                best_score,
                self.stats.nodes - nodes0,
                self.stats.prunes - prunes0
            );
        }
        self.outcome(Some(best_move), best_score, nodes0, prunes0)
    }

    fn outcome(&self, best: Option<Move>, score: i32, nodes0: u64, prunes0: u64) -> SearchOutcome {
        SearchOutcome { best, score, nodes: self.stats.nodes - nodes0, prunes: self.stats.prunes - prunes0 }
    }

    /// Fail-soft alpha-beta. `is_max` is the side to move at `board`, `depth`
    /// the ply from the root.
    pub fn search(&mut self, board: &Board, is_max: bool, depth: u32, mut alpha: i32, mut beta: i32, ctx: SearchCtx) -> i32 {
        self.stats.nodes += 1;
        let key = StateKey::new(board, is_max, ctx.player_search);
        let required = ctx.depth_limit.saturating_sub(depth);

        if self.use_tt {
            self.stats.tt_lookups += 1;
            if let Some(en) = self.tt.get(&key) {
                if en.depth >= required {
                    let usable = match en.bound {
                        Bound::Exact => true,
                        Bound::Lower => en.value >= beta,
                        Bound::Upper => en.value <= alpha,
                    };
                    if usable {
                        self.stats.tt_hits += 1;
                        if self.debug_level >= 5 {
                            trace!("{:w$}tt hit d={} {:?} value={}", "", depth, en.bound, en.value, w = 2 * depth as usize);
                        }
                        return en.value;
                    }
                }
            }
        }

        if board.is_terminal() {
            let v = evaluate_terminal(board, is_max);
            if self.debug_level >= 4 {
                trace!("{:w$}terminal d={} value={}", "", depth, v, w = 2 * depth as usize);
            }
            self.tt_store(key, 0, v, Bound::Exact);
            return v;
        }

        if depth >= ctx.depth_limit {
            if self.quiescence.enabled {
                // Window-dependent, so never stored
                return self.quiescence(board, is_max, alpha, beta, 0, depth);
            }
            let v = self.leaf_value(board, is_max, ctx);
            self.tt_store(key, 0, v, Bound::Exact);
            return v;
        }

        let children = self.ordered_children(board, is_max, depth, ctx.player_search);
        if children.is_empty() {
            return self.leaf_value(board, is_max, ctx);
        }
        self.stats.ordering_for(is_max).nodes += 1;

        let orig_alpha = alpha;
        let orig_beta = beta;
        let mut best = if is_max { i32::MIN } else { i32::MAX };
        let mut best_idx = 0usize;
        for (idx, ms) in children.iter().enumerate() {
            let mut child = board.clone();
            child.make_move(ms.mv);
            let score = adjust_terminal_score(self.search(&child, !is_max, depth + 1, alpha, beta, ctx), depth);
            if self.debug_level >= 3 {
                trace!("{:w$}d={} ({}, {}) -> {} [{}, {}]", "", depth, ms.mv.0, ms.mv.1, score, alpha, beta, w = 2 * depth as usize);
            }
            if is_max {
                if score > best { best = score; best_idx = idx; }
                alpha = alpha.max(best);
            } else {
                if score < best { best = score; best_idx = idx; }
                beta = beta.min(best);
            }
            if beta <= alpha {
                self.stats.prunes += 1;
                self.stats.ordering_for(is_max).record_cutoff(idx);
                if self.debug_level >= 4 {
                    trace!("{:w$}cutoff at child {} d={} value={}", "", idx, depth, best, w = 2 * depth as usize);
                }
                self.tt_store(key, required, best, if is_max { Bound::Lower } else { Bound::Upper });
                return best;
            }
        }

        self.stats.ordering_for(is_max).record_no_cutoff(best_idx);
        let bound = if is_max && best <= orig_alpha {
            Bound::Upper
        } else if !is_max && best >= orig_beta {
            Bound::Lower
        } else {
            Bound::Exact
        };
        self.tt_store(key, required, best, bound);
        best
    }

    /// Plain minimax over raw generation order with apply/undo on one board.
    pub fn minimax(&mut self, board: &mut Board, is_max: bool, depth: u32, ctx: SearchCtx) -> i32 {
        self.stats.nodes += 1;
        if board.is_terminal() {
            return evaluate_terminal(board, is_max);
        }
        if depth >= ctx.depth_limit {
            return self.leaf_value(board, is_max, ctx);
        }
        let moves = board.valid_moves();
        self.stats.generated += moves.len() as u64;
        let mut best = if is_max { i32::MIN } else { i32::MAX };
        for mv in moves {
            let undo = board.apply_move(mv);
            let score = adjust_terminal_score(self.minimax(board, !is_max, depth + 1, ctx), depth);
            board.undo_move(undo);
            best = if is_max { best.max(score) } else { best.min(score) };
        }
        best
    }

    fn leaf_value(&mut self, board: &Board, is_max: bool, ctx: SearchCtx) -> i32 {
        let hkey = HeuristicKey::new(board, is_max, ctx.depth_limit, ctx.player_search);
        if let Some(&v) = self.heuristic_cache.get(&hkey) {
            return v;
        }
        let v = self.heuristic.evaluate(board, is_max);
        self.heuristic_cache.insert(hkey, v);
        v
    }

    fn ordered_children(&mut self, board: &Board, is_max: bool, depth: u32, player_search: u8) -> Vec<MoveScore> {
        let children = self.orderer.ordered_children(board, is_max, depth, player_search, &self.heuristic, &mut self.rng);
        self.stats.generated += children.len() as u64;
        children
    }

    fn tt_store(&mut self, key: StateKey, depth: u32, value: i32, bound: Bound) {
        if !self.use_tt { return; }
        self.stats.tt_inserts += 1;
        if self.debug_level >= 5 {
            trace!("tt store depth={} {:?} value={}", depth, bound, value);
        }
        self.tt.put(Entry { key, depth, value, bound, gen: 0 });
    }
}
