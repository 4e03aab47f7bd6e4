//! Sink trait and error types

use crate::extract::FetchResult;
use thiserror::Error;

/// Errors that can occur while writing a result
///
/// The engine treats any of these as fatal: a successfully extracted
/// result that cannot be persisted aborts the run rather than being
/// silently dropped.
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Write rejected: {0}")]
    Rejected(String),
}

/// Result type for sink operations
pub type SinkResult<T> = Result<T, SinkError>;

/// Durable, append-only destination for crawl results
///
/// `write` is called once per successfully extracted URL, possibly from
/// interleaved completions; implementations must tolerate concurrent
/// callers. The engine never reads back what it wrote.
pub trait ResultSink<P>: Send + Sync {
    fn write(&self, result: &FetchResult<P>) -> SinkResult<()>;
}

/// Adapter turning a closure into a sink, so a one-off destination does
/// not need a named type.
pub struct FnSink<F>(pub F);

impl<P, F> ResultSink<P> for FnSink<F>
where
    F: Fn(&FetchResult<P>) -> SinkResult<()> + Send + Sync,
{
    fn write(&self, result: &FetchResult<P>) -> SinkResult<()> {
        (self.0)(result)
    }
}
