use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// 致命错误: 任何一种都会中止本次运行 (行级与引用级缺陷只计数, 不走这里)
#[derive(Debug, Error)]
pub enum EtlError {
    #[error("cannot access '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("JSON error in '{artifact}': {source}")]
    Json {
        artifact: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("database statement on '{table}' timed out")]
    DatabaseTimeout { table: &'static str },
}

impl EtlError {
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T, E = EtlError> = std::result::Result<T, E>;
