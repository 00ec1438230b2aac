//! Benchmark error taxonomy.

use thiserror::Error;

/// Errors that abort a single command's benchmark.
///
/// No variant is ever retried: repeating a run after an unknown failure
/// could skew the collected statistics, so the whole per-command benchmark
/// is abandoned instead. One command failing does not stop other commands
/// in the same batch.
#[derive(Debug, Error)]
pub enum BenchError {
    /// The command could not be started at all.
    #[error("failed to launch '{command}': {source}")]
    Launch {
        /// The executable that failed to start.
        command: String,
        /// Underlying OS error.
        #[source]
        source: std::io::Error,
    },

    /// The platform timing query failed after the process ran. A result
    /// without real numbers must not be emitted, so this propagates.
    #[error("timing query failed after execution: {0}")]
    Accounting(#[source] std::io::Error),

    /// The requested configuration cannot produce a result.
    #[error("invalid benchmark configuration: {0}")]
    Config(String),

    /// Cancellation was requested; partial samples are discarded.
    #[error("benchmark cancelled")]
    Cancelled,
}
