use serde::Serialize;
use std::fmt;

/// Move-ordering quality counters for one side to move. Telemetry only.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct OrderingStats {
    pub nodes: u64,
    pub cutoffs: u64,
    pub cutoff_first_child: u64,
    pub cutoff_idx_sum: u64,
    pub no_cutoff_nodes: u64,
    pub best_idx_sum: u64,
}

impl OrderingStats {
    pub fn record_cutoff(&mut self, child_idx: usize) {
        self.cutoffs += 1;
        self.cutoff_idx_sum += child_idx as u64;
        if child_idx == 0 { self.cutoff_first_child += 1; }
    }

    pub fn record_no_cutoff(&mut self, best_idx: usize) {
        self.no_cutoff_nodes += 1;
        self.best_idx_sum += best_idx as u64;
    }

    pub fn avg_cutoff_index(&self) -> Option<f64> {
        (self.cutoffs > 0).then(|| self.cutoff_idx_sum as f64 / self.cutoffs as f64)
    }

    pub fn first_child_cutoff_pct(&self) -> Option<f64> {
        (self.cutoffs > 0).then(|| 100.0 * self.cutoff_first_child as f64 / self.cutoffs as f64)
    }

    pub fn avg_best_index(&self) -> Option<f64> {
        (self.no_cutoff_nodes > 0).then(|| self.best_idx_sum as f64 / self.no_cutoff_nodes as f64)
    }
}

impl fmt::Display for OrderingStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "nodes={} cutoffs={}", self.nodes, self.cutoffs)?;
        if let (Some(avg), Some(pct)) = (self.avg_cutoff_index(), self.first_child_cutoff_pct()) {
            write!(f, " avgCutIdx={avg:.3} firstChildCut={pct:.1}%")?;
        }
        if let Some(avg) = self.avg_best_index() {
            write!(f, " avgBestIdx(no-cut)={avg:.3}")?;
        }
        Ok(())
    }
}

/// Per-engine counters, for external reporting.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct SearchStats {
    /// Calls into the recursive search.
    pub nodes: u64,
    /// Successors produced by move generation.
    pub generated: u64,
    pub prunes: u64,
    pub q_nodes: u64,
    pub tt_lookups: u64,
    pub tt_hits: u64,
    pub tt_inserts: u64,
    pub ordering_max: OrderingStats,
    pub ordering_min: OrderingStats,
}

impl SearchStats {
    pub fn ordering_for(&mut self, is_max: bool) -> &mut OrderingStats {
        if is_max { &mut self.ordering_max } else { &mut self.ordering_min }
    }

    pub fn reset_ordering(&mut self) {
        self.ordering_max = OrderingStats::default();
        self.ordering_min = OrderingStats::default();
    }
}
