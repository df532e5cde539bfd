//! Autocomplete request throttling.
//!
//! Suggestions are only requested once the query is at least two characters
//! long and the input has been quiet for 300 ms. Each keystroke replaces the
//! pending query and restarts the quiet period.

use std::time::Duration;

use tokio::time::{sleep_until, Instant};

pub const MIN_QUERY_CHARS: usize = 2;
pub const QUIET_PERIOD: Duration = Duration::from_millis(300);

/// True when `query` is long enough to be worth a request.
pub fn is_searchable(query: &str) -> bool {
    query.trim().chars().count() >= MIN_QUERY_CHARS
}

#[derive(Debug)]
pub struct QueryDebouncer {
    quiet: Duration,
    pending: Option<(String, Instant)>,
    last_sent: Option<String>,
}

impl Default for QueryDebouncer {
    fn default() -> Self {
        Self::new(QUIET_PERIOD)
    }
}

impl QueryDebouncer {
    pub fn new(quiet: Duration) -> Self {
        Self {
            quiet,
            pending: None,
            last_sent: None,
        }
    }

    /// Record the latest input text.
    pub fn push(&mut self, query: &str) {
        self.pending = Some((query.trim().to_string(), Instant::now()));
    }

    /// When the pending query's quiet period ends.
    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|(_, at)| *at + self.quiet)
    }

    /// Take the pending query if it has been quiet long enough, is
    /// searchable and differs from the last query sent.
    pub fn ready(&mut self) -> Option<String> {
        let (query, at) = self.pending.as_ref()?;
        if at.elapsed() < self.quiet {
            return None;
        }
        let query = query.clone();
        self.pending = None;
        if !is_searchable(&query) || self.last_sent.as_deref() == Some(query.as_str()) {
            return None;
        }
        self.last_sent = Some(query.clone());
        Some(query)
    }

    /// Wait out the quiet period of the pending query, then behave like
    /// [`ready`](Self::ready). Returns immediately when nothing is pending.
    pub async fn settle(&mut self) -> Option<String> {
        sleep_until(self.deadline()?).await;
        self.ready()
    }
}
