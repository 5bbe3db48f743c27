pub mod alphabeta;
pub mod eval;
pub mod noise;
pub mod ordering;
pub mod qsearch;
pub mod stats;
pub mod tt;

pub use alphabeta::{SearchCtx, SearchMode, SearchOutcome, Searcher};
pub use eval::{EvalBreakdown, Heuristic, HeuristicCombo};
pub use ordering::{MoveOrderer, MoveScore, OrderingPolicy};
pub use stats::{OrderingStats, SearchStats};
