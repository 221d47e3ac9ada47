//! CLI error types.

use summzy_config::ConfigError;
use summzy_format::ChunkError;

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Chunk(#[from] ChunkError),
}
