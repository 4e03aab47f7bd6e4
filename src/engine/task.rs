//! Task wrapper binding one URL to one extractor invocation
//!
//! The wrapper is the isolation boundary of the engine: whatever the
//! extractor does with a URL, the task resolves to a `TaskOutcome` and the
//! pool keeps running. Failures are logged once and converted, never
//! re-raised.

use crate::extract::{Extractor, FetchResult};
use std::sync::Arc;
use std::time::Duration;

/// Maximum length of an extractor error message in the diagnostic line
const MAX_ERROR_MESSAGE_LEN: usize = 150;

/// Outcome of one crawl task
///
/// The success/empty/failure split is explicit in the type so the engine
/// never has to catch anything coming out of a worker.
#[derive(Debug)]
pub enum TaskOutcome<P> {
    /// The extractor produced a result for this URL
    Fetched(FetchResult<P>),

    /// The extractor declined the URL (invalid, wrong content type, ...)
    Empty { url: String },

    /// Extraction failed or timed out; already logged
    Failed { url: String },
}

impl<P> TaskOutcome<P> {
    /// The URL this outcome belongs to
    pub fn url(&self) -> &str {
        match self {
            TaskOutcome::Fetched(result) => &result.url,
            TaskOutcome::Empty { url } | TaskOutcome::Failed { url } => url,
        }
    }
}

/// Runs one extraction under the per-task timeout.
///
/// Invoked exactly once per submitted URL, inside a worker task. An `Err`
/// from the extractor and a timeout both degrade to `Failed` after a
/// one-line diagnostic; neither aborts the pool or the run.
pub(crate) async fn run_task<E: Extractor>(
    extractor: Arc<E>,
    url: String,
    task_timeout: Duration,
) -> TaskOutcome<E::Payload> {
    match tokio::time::timeout(task_timeout, extractor.extract(&url)).await {
        Ok(Ok(Some(result))) => TaskOutcome::Fetched(result),
        Ok(Ok(None)) => {
            tracing::debug!("No result for {}", url);
            TaskOutcome::Empty { url }
        }
        Ok(Err(e)) => {
            tracing::warn!(
                "{} >>> URL was: \"{}\"",
                truncate_message(&e.to_string()),
                url
            );
            TaskOutcome::Failed { url }
        }
        Err(_) => {
            tracing::warn!(
                "Extraction timed out after {:?} >>> URL was: \"{}\"",
                task_timeout,
                url
            );
            TaskOutcome::Failed { url }
        }
    }
}

/// Flattens an error message to a single bounded line
fn truncate_message(message: &str) -> String {
    let flat = message.replace('\n', " ");
    match flat.char_indices().nth(MAX_ERROR_MESSAGE_LEN) {
        Some((idx, _)) => flat[..idx].to_string(),
        None => flat,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::ExtractError;
    use async_trait::async_trait;
    use std::collections::HashSet;

    /// Extractor scripted per URL prefix: "ok" fetches, "skip" declines,
    /// "fail" errors, "hang" never returns.
    struct ScriptedExtractor;

    #[async_trait]
    impl Extractor for ScriptedExtractor {
        type Payload = ();

        async fn extract(
            &self,
            url: &str,
        ) -> Result<Option<FetchResult<()>>, ExtractError> {
            if url.starts_with("hang") {
                std::future::pending::<()>().await;
            }
            if url.starts_with("fail") {
                return Err(ExtractError::Status {
                    url: url.to_string(),
                    status: 500,
                });
            }
            if url.starts_with("skip") {
                return Ok(None);
            }
            Ok(Some(FetchResult {
                url: url.to_string(),
                outlinks: HashSet::new(),
                payload: (),
            }))
        }
    }

    fn timeout() -> Duration {
        Duration::from_millis(200)
    }

    #[tokio::test]
    async fn test_success_maps_to_fetched() {
        let outcome = run_task(Arc::new(ScriptedExtractor), "ok://a".into(), timeout()).await;
        assert!(matches!(outcome, TaskOutcome::Fetched(_)));
        assert_eq!(outcome.url(), "ok://a");
    }

    #[tokio::test]
    async fn test_none_maps_to_empty() {
        let outcome = run_task(Arc::new(ScriptedExtractor), "skip://a".into(), timeout()).await;
        assert!(matches!(outcome, TaskOutcome::Empty { .. }));
    }

    #[tokio::test]
    async fn test_error_maps_to_failed() {
        let outcome = run_task(Arc::new(ScriptedExtractor), "fail://a".into(), timeout()).await;
        assert!(matches!(outcome, TaskOutcome::Failed { .. }));
        assert_eq!(outcome.url(), "fail://a");
    }

    #[tokio::test]
    async fn test_timeout_maps_to_failed() {
        let outcome = run_task(Arc::new(ScriptedExtractor), "hang://a".into(), timeout()).await;
        assert!(matches!(outcome, TaskOutcome::Failed { .. }));
    }

    #[test]
    fn test_truncate_message_short() {
        assert_eq!(truncate_message("boom"), "boom");
    }

    #[test]
    fn test_truncate_message_strips_newlines() {
        assert_eq!(truncate_message("a\nb\nc"), "a b c");
    }

    #[test]
    fn test_truncate_message_bounds_length() {
        let long = "x".repeat(400);
        let truncated = truncate_message(&long);
        assert_eq!(truncated.len(), MAX_ERROR_MESSAGE_LEN);
    }
}
