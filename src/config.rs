use crate::error::Result;
use crate::search::eval::Heuristic;
use crate::search::ordering::OrderingPolicy;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuiescenceConfig {
    pub enabled: bool,
    /// Extension plies beyond the horizon.
    pub max_plies: u32,
    /// Goal-distance change that makes a move noisy.
    pub swing_delta: i32,
    /// Opponent reply count at or below which a move is noisy.
    pub low_mobility: usize,
}

impl Default for QuiescenceConfig {
    fn default() -> Self { Self { enabled: false, max_plies: 4, swing_delta: 2, low_mobility: 2 } }
}

/// Every engine tunable in one place. Missing JSON fields take the defaults.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub is_max: bool,
    pub max_depth: u32,
    pub heuristic_level: u8,
    pub ordering_policy: OrderingPolicy,
    pub order_noise_sigma: f64,
    pub shuffle_ties_only: bool,
    pub quiescence: QuiescenceConfig,
    pub use_tt: bool,
    pub debug_level: u8,
    /// Fixed RNG seed for reproducible runs; `None` draws from OS entropy.
    pub seed: Option<u64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            is_max: true,
            max_depth: 6,
            heuristic_level: 10,
            ordering_policy: OrderingPolicy::Deterministic,
            order_noise_sigma: 0.75,
            shuffle_ties_only: false,
            quiescence: QuiescenceConfig::default(),
            use_tt: true,
            debug_level: 0,
            seed: None,
        }
    }
}

impl EngineConfig {
    /// Parses and validates; an unregistered heuristic level is rejected here.
    pub fn from_json_str(s: &str) -> Result<Self> {
        let cfg: EngineConfig = serde_json::from_str(s)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<()> {
        Heuristic::from_level(self.heuristic_level).map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EngineError;

    #[test]
    fn partial_json_fills_defaults() {
        let cfg = EngineConfig::from_json_str(r#"{ "max_depth": 3, "seed": 7 }"#).unwrap();
        assert_eq!(cfg.max_depth, 3);
        assert_eq!(cfg.seed, Some(7));
        assert_eq!(cfg.heuristic_level, 10);
        assert!(!cfg.quiescence.enabled);
    }

    #[test]
    fn unknown_level_fails_fast() {
        let err = EngineConfig::from_json_str(r#"{ "heuristic_level": 99 }"#).unwrap_err();
        assert!(matches!(err, EngineError::UnknownHeuristicLevel { level: 99 }));
    }

    #[test]
    fn round_trips_policy_names() {
        let mut cfg = EngineConfig::default();
        cfg.ordering_policy = OrderingPolicy::NoisyJitter;
        let text = cfg.to_json_string().unwrap();
        assert!(text.contains("\"noisy\""));
        assert_eq!(EngineConfig::from_json_str(&text).unwrap(), cfg);
    }
}
