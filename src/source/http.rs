//! HTTP implementation of [`LogSource`].

use crate::model::{Cursor, EntryDocument, FetchError, Page, SearchQuery, TimeRange};
use crate::source::streams::{StreamSummary, StreamsResponse};
use crate::source::LogSource;
use reqwest::Url;
use serde::Deserialize;
use serde_json::json;
use std::sync::{PoisonError, RwLock};
use std::time::Duration;
use tracing::debug;

/// Connection settings for [`HttpSource`].
#[derive(Clone, PartialEq, Eq)]
pub struct HttpSourceConfig {
    /// Service base URL, e.g. `https://app.tailstream.io`.
    pub base_url: String,
    /// Bearer token.
    pub token: String,
    /// Stream identifier.
    pub stream_id: String,
    /// Entries per page (`limit` parameter).
    pub per_page: u32,
    /// Sort direction (`direction` parameter).
    pub direction: String,
    /// Level filters applied to every request.
    pub levels: Vec<String>,
    /// Time range of the initial query.
    pub range: TimeRange,
    /// Request timeout.
    pub timeout: Duration,
}

/// Wire shape of a log page.
#[derive(Debug, Deserialize)]
struct LogResponse {
    #[serde(default)]
    data: Vec<EntryDocument>,
    #[serde(default)]
    meta: LogMeta,
}

#[derive(Debug, Default, Deserialize)]
struct LogMeta {
    #[serde(default)]
    has_more: bool,
    #[serde(default)]
    next_cursor: Option<String>,
    #[serde(default)]
    total: Option<u64>,
}

impl From<LogResponse> for Page {
    fn from(response: LogResponse) -> Self {
        Page {
            entries: response.data,
            has_more: response.meta.has_more,
            total: response.meta.total,
            next_cursor: response.meta.next_cursor.and_then(Cursor::new),
        }
    }
}

/// Blocking HTTP client for `GET {base}/api/streams/{id}/logs`.
///
/// Continuation and search requests use the range of the last successful
/// reload, so paging after a date filter stays inside the filter.
pub struct HttpSource {
    client: reqwest::blocking::Client,
    endpoint: Url,
    config: HttpSourceConfig,
    active_range: RwLock<TimeRange>,
}

impl HttpSource {
    /// Build a client for the configured stream.
    ///
    /// # Errors
    ///
    /// Returns `FetchError::InvalidUrl` for an unusable base URL and
    /// `FetchError::Request` if the HTTP client cannot be constructed.
    pub fn new(config: HttpSourceConfig) -> Result<Self, FetchError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(config.timeout)
            .build()?;
        let endpoint = api_url(
            &config.base_url,
            &["api", "streams", config.stream_id.trim(), "logs"],
        )?;
        let active_range = RwLock::new(config.range);
        Ok(Self {
            client,
            endpoint,
            config,
            active_range,
        })
    }

    /// Range applied to `fetch` requests.
    pub fn active_range(&self) -> TimeRange {
        *self
            .active_range
            .read()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Query parameters for a request. Pure, so it is testable without a server.
    fn query_params(
        &self,
        range: &TimeRange,
        cursor: Option<&Cursor>,
        search: Option<&SearchQuery>,
    ) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("limit", self.config.per_page.to_string()),
            ("direction", self.config.direction.clone()),
        ];
        if let Some(start) = range.start {
            params.push(("start_time", start.timestamp_millis().to_string()));
        }
        if let Some(end) = range.end {
            params.push(("end_time", end.timestamp_millis().to_string()));
        }
        if let Some(cursor) = cursor {
            params.push(("cursor", cursor.as_str().to_string()));
        }

        let mut filters: Vec<serde_json::Value> = self
            .config
            .levels
            .iter()
            .map(|level| json!({"field": "level", "operator": "=", "value": level}))
            .collect();
        if let Some(search) = search {
            filters.push(json!({"field": "q", "value": search.as_str()}));
        }
        if !filters.is_empty() {
            params.push(("filters", serde_json::Value::Array(filters).to_string()));
        }

        params
    }

    fn get_page(&self, params: &[(&'static str, String)]) -> Result<Page, FetchError> {
        debug!(endpoint = %self.endpoint, ?params, "requesting log page");
        let response = self
            .client
            .get(self.endpoint.clone())
            .query(params)
            .header(reqwest::header::ACCEPT, "application/json")
            .bearer_auth(&self.config.token)
            .send()?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(FetchError::Status {
                status: status.to_string(),
                body: body.trim().to_string(),
            });
        }

        let body = response.text()?;
        let payload: LogResponse = serde_json::from_str(&body)?;
        Ok(payload.into())
    }

    /// Streams readable with `token`, from `GET {base}/api/user/streams`.
    ///
    /// # Errors
    ///
    /// Returns `FetchError` on an invalid base URL, transport, status, or
    /// decode failure.
    pub fn list_streams(
        base_url: &str,
        token: &str,
        timeout: Duration,
    ) -> Result<Vec<StreamSummary>, FetchError> {
        let url = api_url(base_url, &["api", "user", "streams"])?;
        debug!(%url, "requesting stream list");
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()?;
        let response = client
            .get(url)
            .header(reqwest::header::ACCEPT, "application/json")
            .bearer_auth(token)
            .send()?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(FetchError::Status {
                status: status.to_string(),
                body: body.trim().to_string(),
            });
        }

        let body = response.text()?;
        let payload: StreamsResponse = serde_json::from_str(&body)?;
        Ok(payload.streams)
    }
}

/// `base_url` with `segments` appended, each percent-encoded as one path segment.
fn api_url(base_url: &str, segments: &[&str]) -> Result<Url, FetchError> {
    let invalid = || FetchError::InvalidUrl(base_url.to_string());
    let mut url = Url::parse(base_url.trim()).map_err(|_| invalid())?;
    url.path_segments_mut()
        .map_err(|()| invalid())?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

impl LogSource for HttpSource {
    fn fetch(
        &self,
        cursor: Option<&Cursor>,
        query: Option<&SearchQuery>,
    ) -> Result<Page, FetchError> {
        let params = self.query_params(&self.active_range(), cursor, query);
        self.get_page(&params)
    }

    fn reload(&self, range: &TimeRange) -> Result<Page, FetchError> {
        let params = self.query_params(range, None, None);
        let page = self.get_page(&params)?;
        *self
            .active_range
            .write()
            .unwrap_or_else(PoisonError::into_inner) = *range;
        Ok(page)
    }
}
