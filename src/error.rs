// =============================================================================
// error.rs — WAYS THE PIPELINE CAN ACTUALLY FAIL
// =============================================================================
//
// Short list, on purpose. A document that won't parse is NOT an error — it
// degrades to sentinel fields and the batch keeps going. The only things
// allowed to stop a run are the ones where continuing would produce a lie:
// inputs we can't open, tables we can't write.
// =============================================================================

use thiserror::Error;

/// The typed error for table and corpus I/O. Extraction never produces one
/// of these; per-document failure is a sentinel, not an error.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Filesystem trouble on a specific path.
    #[error("i/o failure on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// A table we couldn't serialize or deserialize.
    #[error("csv failure on {path}: {source}")]
    Csv {
        path: String,
        #[source]
        source: csv::Error,
    },

    /// A configured input that simply isn't there.
    #[error("missing input: {0}")]
    MissingInput(String),
}

impl EngineError {
    pub fn io(path: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn csv(path: impl Into<String>, source: csv::Error) -> Self {
        Self::Csv {
            path: path.into(),
            source,
        }
    }
}

pub type EngineResult<T> = Result<T, EngineError>;
