//! JSON Lines sink
//!
//! Appends one serialized result per line. Each write is flushed before
//! returning; a result the engine was told is durable must survive the
//! process.

use crate::extract::FetchResult;
use crate::sink::traits::{ResultSink, SinkResult};
use serde::Serialize;
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::Path;
use std::sync::Mutex;

/// File-backed JSON Lines result sink
pub struct JsonlSink {
    writer: Mutex<BufWriter<File>>,
}

impl JsonlSink {
    /// Creates (or appends to) a JSON Lines file at the given path
    pub fn new(path: &Path) -> SinkResult<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            writer: Mutex::new(BufWriter::new(file)),
        })
    }
}

impl<P: Serialize + Send + Sync> ResultSink<P> for JsonlSink {
    fn write(&self, result: &FetchResult<P>) -> SinkResult<()> {
        let line = serde_json::to_string(result)?;
        let mut writer = self.writer.lock().unwrap();
        writeln!(writer, "{}", line)?;
        writer.flush()?;
        Ok(())
    }
}
