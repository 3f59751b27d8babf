//! Error types for the engine binary.
//!
//! [`EngineError`] wraps every failure mode of a run so `main` can
//! propagate with `?`.

/// Top-level error for the engine binary.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Configuration loading or validation failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: aurapnl_core::ConfigError,
    },

    /// The timeline could not be built.
    #[error("simulation error: {source}")]
    Simulation {
        /// The underlying simulation error.
        #[from]
        source: aurapnl_core::SimulationError,
    },

    /// The wallet history could not be parsed or summarized.
    #[error("history error: {source}")]
    History {
        /// The underlying history error.
        #[from]
        source: aurapnl_history::HistoryError,
    },

    /// Reading or writing a file failed.
    #[error("I/O error on {path}: {source}")]
    Io {
        /// The file involved.
        path: String,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// Frame export serialization failed.
    #[error("frame export error: {source}")]
    Export {
        /// The underlying JSON error.
        #[from]
        source: serde_json::Error,
    },

    /// The blocking timeline build task panicked or was cancelled.
    #[error("timeline task failed: {source}")]
    Join {
        /// The underlying join error.
        #[from]
        source: tokio::task::JoinError,
    },
}
