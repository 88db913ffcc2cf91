//! Trace store abstraction and the real ClickHouse client
//!
//! Provides a trait-based abstraction over the profile source so the HTTP
//! handler can be tested without a running ClickHouse. The real client talks
//! to the ClickHouse HTTP interface and parses its `TabSeparated` output.

use crate::config::ClickHouseConfig;
use crate::error::{Error, Result};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::debug;

/// One distinct call stack and how many profiler samples hit it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StackSample {
    /// Root-first frames joined with `;`
    pub stack: String,
    /// Number of samples grouped into this stack
    pub samples: u64,
}

/// Source of sampled call stacks for a query id
#[async_trait]
pub trait TraceStore: Send + Sync {
    /// Fetch the grouped stack samples recorded for `query_id`.
    ///
    /// Returns an empty vector when the id exists but produced no samples;
    /// an unknown id also comes back empty rather than as an error.
    async fn sample_stacks(&self, query_id: &str) -> Result<Vec<StackSample>>;
}

/// Grouping query over `system.trace_log`. The query id is bound server-side
/// through the `{query_id:String}` parameter, never interpolated.
const STACKS_SQL: &str = "\
SELECT
    arrayStringConcat(arrayReverse(arrayMap(x -> demangle(addressToSymbol(x)), trace)), ';') AS stack,
    count() AS samples
FROM system.trace_log
WHERE query_id = {query_id:String}
GROUP BY trace
FORMAT TabSeparated";

/// Client for the ClickHouse HTTP interface
pub struct ClickHouseClient {
    client: reqwest::Client,
    url: String,
}

impl ClickHouseClient {
    pub fn new(config: &ClickHouseConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .map_err(|e| Error::Config(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            url: config.url(),
        })
    }
}

#[async_trait]
impl TraceStore for ClickHouseClient {
    async fn sample_stacks(&self, query_id: &str) -> Result<Vec<StackSample>> {
        debug!("Fetching trace samples for query id {query_id}");

        // addressToSymbol/demangle are gated behind this setting; the HTTP
        // interface takes settings as URL parameters instead of a SET.
        let response = self
            .client
            .post(&self.url)
            .query(&[
                ("allow_introspection_functions", "1"),
                ("param_query_id", query_id),
            ])
            .body(STACKS_SQL)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(Error::ClickHouse(body.trim_end().to_string()));
        }

        parse_tab_separated(&body)
    }
}

/// Parse `TabSeparated` rows of `(stack String, samples UInt64)`
fn parse_tab_separated(body: &str) -> Result<Vec<StackSample>> {
    body.lines()
        .map(|line| {
            let (stack, samples) = line
                .rsplit_once('\t')
                .ok_or_else(|| Error::ClickHouse(format!("Malformed row: {line:?}")))?;
            let samples = samples
                .parse::<u64>()
                .map_err(|_| Error::ClickHouse(format!("Malformed sample count: {line:?}")))?;
            Ok(StackSample {
                stack: unescape(stack),
                samples,
            })
        })
        .collect()
}

/// Undo the escaping ClickHouse applies to String columns in `TabSeparated`
fn unescape(field: &str) -> String {
    let mut out = String::with_capacity(field.len());
    let mut chars = field.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('t') => out.push('\t'),
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('0') => out.push('\0'),
            Some('b') => out.push('\u{8}'),
            Some('f') => out.push('\u{c}'),
            Some('\'') => out.push('\''),
            Some('\\') => out.push('\\'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}

/// Scripted trace store for handler tests
pub struct MockTraceStore {
    responses: Mutex<Vec<Result<Vec<StackSample>>>>,
    /// Query ids the handler asked for, in order
    pub requested_ids: Arc<Mutex<Vec<String>>>,
}

impl MockTraceStore {
    pub fn new() -> Self {
        Self {
            responses: Mutex::new(Vec::new()),
            requested_ids: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Queue the response for the next `sample_stacks` call
    pub async fn add_response(&self, response: Result<Vec<StackSample>>) {
        self.responses.lock().await.push(response);
    }
}

impl Default for MockTraceStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TraceStore for MockTraceStore {
    async fn sample_stacks(&self, query_id: &str) -> Result<Vec<StackSample>> {
        self.requested_ids.lock().await.push(query_id.to_string());
        let mut responses = self.responses.lock().await;
        if responses.is_empty() {
            return Ok(Vec::new());
        }
        responses.remove(0)
    }
}
