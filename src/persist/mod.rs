//! Store adapter errors and the SQLite sheet adapter.

/// SQLite-backed sheets.
pub mod sqlite;

/// Store adapter I/O failure.
#[derive(Debug, thiserror::Error)]
pub enum PersistError {
    /// SQLite rejected a statement.
    #[error("sqlite: {0}")]
    Sqlite(#[from] rusqlite::Error),
    /// Row payload failed to encode or decode.
    #[error("serde: {0}")]
    Serde(#[from] serde_json::Error),
    /// Store refused the operation.
    #[error("store unavailable: {0}")]
    Unavailable(String),
    /// Any other adapter failure.
    #[error("{0}")]
    Message(String),
}

/// Result alias for store adapter calls.
pub type PersistResult<T> = Result<T, PersistError>;
