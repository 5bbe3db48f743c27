// Rastros pursuit game: board model, evaluation and alpha-beta search
pub mod board;
pub mod config;
pub mod error;
pub mod search;

pub use board::{Board, Move, Outcome, Player, Reachability};
pub use config::{EngineConfig, QuiescenceConfig};
pub use error::{EngineError, Result};
pub use search::{Heuristic, HeuristicCombo, OrderingPolicy, SearchMode, SearchOutcome, Searcher};
