use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::Value as JsonValue;

use crate::config::{HTTP_CONNECT_TIMEOUT, HTTP_READ_TIMEOUT, HTTP_USER_AGENT};
use crate::error::SourceError;

// ---------------------------------------------------------------------------
// Response shape
// ---------------------------------------------------------------------------

/// Expected search response (only the parts we read):
///
/// ```json
/// { "result": { "hits": { "hit": [
///     { "info": { "authors": { "author": [ { "text": "Alice" }, ... ] } } }
/// ] } } }
/// ```
///
/// `author` may also be a single object instead of a list.
#[derive(Debug, Deserialize)]
struct SearchResponse {
    result: SearchResult,
}

#[derive(Debug, Deserialize)]
struct SearchResult {
    hits: Hits,
}

#[derive(Debug, Deserialize)]
struct Hits {
    /// Absent or `null` when the search has no results.
    #[serde(default)]
    hit: Option<Vec<Hit>>,
}

#[derive(Debug, Deserialize)]
struct Hit {
    #[serde(default)]
    info: Option<HitInfo>,
}

#[derive(Debug, Deserialize)]
struct HitInfo {
    #[serde(default)]
    authors: Option<HitAuthors>,
}

#[derive(Debug, Deserialize)]
struct HitAuthors {
    #[serde(default)]
    author: Option<OneOrMany>,
}

/// Entries are kept as raw JSON so a malformed one only skips itself.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    Many(Vec<JsonValue>),
    One(JsonValue),
}

impl OneOrMany {
    fn into_vec(self) -> Vec<JsonValue> {
        match self {
            OneOrMany::Many(entries) => entries,
            OneOrMany::One(entry) => vec![entry],
        }
    }
}

// ---------------------------------------------------------------------------
// Remote source adapter
// ---------------------------------------------------------------------------

/// Author names read from one response.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RemoteAuthors {
    pub names: Vec<String>,
    /// Entries without a usable `text` field.
    pub skipped: usize,
}

/// Collect author names from a parsed search response.
///
/// Names are trimmed but never split: each `text` is one author. A response
/// without `result.hits` is rejected as a whole; a missing or null `hit`
/// list, hits without authors, and malformed author entries are tolerated.
pub fn extract_authors(response: JsonValue) -> Result<RemoteAuthors, SourceError> {
    let response: SearchResponse = serde_json::from_value(response)
        .map_err(|e| SourceError::UnexpectedShape(e.to_string()))?;

    let mut out = RemoteAuthors::default();

    let entries = response
        .result
        .hits
        .hit
        .unwrap_or_default()
        .into_iter()
        .filter_map(|hit| hit.info?.authors?.author)
        .flat_map(OneOrMany::into_vec);

    for entry in entries {
        match author_text(&entry) {
            Some(name) => out.names.push(name.to_string()),
            None => {
                log::warn!("Skipping author entry without usable text: {entry}");
                out.skipped += 1;
            }
        }
    }

    Ok(out)
}

fn author_text(entry: &JsonValue) -> Option<&str> {
    let name = entry.get("text")?.as_str()?.trim();
    (!name.is_empty()).then_some(name)
}

// ---------------------------------------------------------------------------
// Transport
// ---------------------------------------------------------------------------

/// HTTP agent with the configured timeouts.
pub fn agent() -> ureq::Agent {
    ureq::AgentBuilder::new()
        .timeout_connect(HTTP_CONNECT_TIMEOUT)
        .timeout_read(HTTP_READ_TIMEOUT)
        .user_agent(HTTP_USER_AGENT)
        .build()
}

/// GET `url` and parse the body as JSON.
pub fn fetch_json(agent: &ureq::Agent, url: &str) -> Result<JsonValue> {
    let response = agent
        .get(url)
        .call()
        .with_context(|| format!("request failed for {url}"))?;

    response
        .into_json::<JsonValue>()
        .with_context(|| format!("decoding JSON from {url}"))
}
