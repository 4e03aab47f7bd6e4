//! SQLite sink
//!
//! Appends one row per crawl result to a `documents` table. The connection
//! lives behind a mutex, so interleaved completions serialize their writes
//! here rather than in the engine.

use crate::extract::{FetchResult, HtmlPage};
use crate::sink::traits::{ResultSink, SinkError, SinkResult};
use chrono::Utc;
use rusqlite::{params, Connection};
use std::path::Path;
use std::sync::Mutex;

/// SQL schema for the sink database
const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS documents (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    url TEXT NOT NULL UNIQUE,
    title TEXT,
    body TEXT NOT NULL,
    outlink_count INTEGER NOT NULL,
    fetched_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_documents_url ON documents(url);
"#;

/// SQLite-backed result sink
pub struct SqliteSink {
    conn: Mutex<Connection>,
}

impl SqliteSink {
    /// Opens (or creates) the sink database at the given path
    pub fn new(path: &Path) -> SinkResult<Self> {
        let conn = Connection::open(path)?;

        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA temp_store = MEMORY;
        ",
        )?;
        conn.execute_batch(SCHEMA_SQL)?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Creates an in-memory sink (for testing)
    pub fn new_in_memory() -> SinkResult<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(SCHEMA_SQL)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn append(
        &self,
        url: &str,
        title: Option<&str>,
        body: &str,
        outlink_count: usize,
    ) -> SinkResult<()> {
        let now = Utc::now().to_rfc3339();
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO documents (url, title, body, outlink_count, fetched_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![url, title, body, outlink_count as i64, now],
        )?;
        Ok(())
    }

    /// Returns the number of stored documents
    pub fn count_documents(&self) -> SinkResult<u64> {
        let conn = self.conn.lock().unwrap();
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM documents", [], |row| row.get(0))?;
        Ok(count as u64)
    }

    /// Returns the stored body for a URL, if present
    pub fn get_body(&self, url: &str) -> SinkResult<Option<String>> {
        use rusqlite::OptionalExtension;

        let conn = self.conn.lock().unwrap();
        let body = conn
            .query_row(
                "SELECT body FROM documents WHERE url = ?1",
                params![url],
                |row| row.get(0),
            )
            .optional()?;
        Ok(body)
    }
}

impl ResultSink<HtmlPage> for SqliteSink {
    fn write(&self, result: &FetchResult<HtmlPage>) -> SinkResult<()> {
        self.append(
            &result.url,
            result.payload.title.as_deref(),
            &result.payload.html,
            result.outlinks.len(),
        )
    }
}

impl ResultSink<String> for SqliteSink {
    fn write(&self, result: &FetchResult<String>) -> SinkResult<()> {
        self.append(&result.url, None, &result.payload, result.outlinks.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn html_result(url: &str, title: Option<&str>, html: &str) -> FetchResult<HtmlPage> {
        FetchResult {
            url: url.to_string(),
            outlinks: HashSet::from(["https://example.com/next".to_string()]),
            payload: HtmlPage {
                title: title.map(String::from),
                html: html.to_string(),
            },
        }
    }

    #[test]
    fn test_write_and_count() {
        let sink = SqliteSink::new_in_memory().unwrap();

        sink.write(&html_result("https://example.com/", Some("Home"), "<html/>"))
            .unwrap();
        sink.write(&html_result("https://example.com/a", None, "<html/>"))
            .unwrap();

        assert_eq!(sink.count_documents().unwrap(), 2);
    }

    #[test]
    fn test_body_round_trip() {
        let sink = SqliteSink::new_in_memory().unwrap();
        sink.write(&html_result("https://example.com/", None, "<p>hi</p>"))
            .unwrap();

        assert_eq!(
            sink.get_body("https://example.com/").unwrap(),
            Some("<p>hi</p>".to_string())
        );
        assert_eq!(sink.get_body("https://example.com/missing").unwrap(), None);
    }

    #[test]
    fn test_duplicate_url_is_rejected() {
        let sink = SqliteSink::new_in_memory().unwrap();
        let result = html_result("https://example.com/", None, "<html/>");

        sink.write(&result).unwrap();
        assert!(sink.write(&result).is_err());
    }

    #[test]
    fn test_plain_text_payload() {
        let sink = SqliteSink::new_in_memory().unwrap();
        let result = FetchResult {
            url: "https://example.com/".to_string(),
            outlinks: HashSet::new(),
            payload: "just text".to_string(),
        };

        sink.write(&result).unwrap();
        assert_eq!(
            sink.get_body("https://example.com/").unwrap(),
            Some("just text".to_string())
        );
    }
}
