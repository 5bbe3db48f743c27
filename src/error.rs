//! Error types for engine construction and configuration.

/// Everything that can go wrong before a search starts. The search itself
/// never fails.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// The heuristic level factory was asked for a level that is not registered.
    #[error("heuristic level {level} is not registered")]
    UnknownHeuristicLevel {
        level: u8,
    },
    #[error("unknown heuristic combo \"{label}\" (expected A..J)")]
    UnknownCombo {
        label: String,
    },
    #[error("unknown ordering policy \"{name}\" (expected deterministic, shuffle or noisy)")]
    UnknownPolicy {
        name: String,
    },
    #[error("bad cell {input:?}: {reason}")]
    BadCell {
        input: String,
        reason: String,
    },
    #[error("invalid engine configuration: {0}")]
    Config(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::EngineError;

    #[test]
    fn unknown_level_display() {
        let err = EngineError::UnknownHeuristicLevel { level: 42 };
        assert_eq!(format!("{err}"), "heuristic level 42 is not registered");
    }

    #[test]
    fn json_error_converts() {
        let bad = serde_json::from_str::<u32>("nope").unwrap_err();
        let err: EngineError = bad.into();
        assert!(matches!(err, EngineError::Config(_)));
    }
}
