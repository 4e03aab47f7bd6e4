//! Result sinks
//!
//! A sink is the durable, append-only destination for crawl results. The
//! engine writes each result exactly once and never reads back; everything
//! about the storage format is the sink's business.

mod jsonl;
mod sqlite;
mod traits;

pub use jsonl::JsonlSink;
pub use sqlite::SqliteSink;
pub use traits::{FnSink, ResultSink, SinkError, SinkResult};
