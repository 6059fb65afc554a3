use crate::{
    Config,
    config::parse_base_url,
    error::{LookupError, NOT_FOUND_MESSAGE},
    model::WeatherRecord,
};
use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::Deserialize;
use std::{fmt::Debug, sync::Arc};

/// Anything that can resolve an identifier to a stored weather record.
#[async_trait]
pub trait RecordSource: Send + Sync + Debug {
    /// Fetch the record stored under `id`. The id is used as given; callers
    /// are responsible for trimming and rejecting empty input.
    async fn fetch_record(&self, id: &str) -> Result<WeatherRecord, LookupError>;
}

/// Reads records from the storage service's `GET /weather/{id}` endpoint.
///
/// One request per call. No retries, no timeout beyond the transport's own,
/// no caching.
#[derive(Debug, Clone)]
pub struct HttpRecordClient {
    base_url: Url,
    http: Client,
}

impl HttpRecordClient {
    pub fn new(base_url: &str) -> anyhow::Result<Self> {
        Ok(Self { base_url: parse_base_url(base_url)?, http: Client::new() })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// `{base}/weather/{id}` with `id` percent-encoded as a single path segment.
    ///
    /// Returns `None` for `.` and `..`: URL parsing collapses dot segments in
    /// any spelling, so no request could be addressed by them.
    pub fn record_url(&self, id: &str) -> Option<Url> {
        if matches!(id, "." | "..") {
            return None;
        }

        let mut url = self.base_url.clone();
        let path = format!(
            "{}/weather/{}",
            self.base_url.path().trim_end_matches('/'),
            urlencoding::encode(id)
        );
        url.set_path(&path);
        Some(url)
    }
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    detail: Option<serde_json::Value>,
}

/// The service's own explanation for a rejection, if it sent a usable one.
fn rejection_detail(body: &str) -> Option<String> {
    let parsed: ErrorBody = serde_json::from_str(body).ok()?;
    match parsed.detail? {
        serde_json::Value::String(detail) if !detail.is_empty() => Some(detail),
        _ => None,
    }
}

fn truncate_body(body: &str) -> &str {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => &body[..idx],
        None => body,
    }
}

#[async_trait]
impl RecordSource for HttpRecordClient {
    async fn fetch_record(&self, id: &str) -> Result<WeatherRecord, LookupError> {
        let url = self.record_url(id).ok_or_else(|| {
            tracing::warn!(id, "identifier cannot be used as a path segment");
            LookupError::Unaddressable(id.to_string())
        })?;
        tracing::debug!(%url, "requesting weather record");

        let res = self.http.get(url).send().await.map_err(|err| {
            tracing::warn!(error = %err, "weather record request failed");
            LookupError::transport(err)
        })?;

        let status = res.status();
        let body = res.text().await.map_err(|err| {
            tracing::warn!(%status, error = %err, "failed to read weather record body");
            LookupError::transport(err)
        })?;

        if !status.is_success() {
            let message = rejection_detail(&body).unwrap_or_else(|| NOT_FOUND_MESSAGE.to_string());
            tracing::warn!(%status, %message, body = truncate_body(&body), "weather record lookup rejected");
            return Err(LookupError::Rejected { status: status.as_u16(), message });
        }

        serde_json::from_str(&body).map_err(|err| {
            tracing::warn!(error = %err, body = truncate_body(&body), "failed to decode weather record");
            LookupError::transport(err)
        })
    }
}

/// Build the record source described by `config`.
pub fn record_source_from_config(config: &Config) -> anyhow::Result<Arc<dyn RecordSource>> {
    let client = HttpRecordClient::new(config.service_base_url())?;
    tracing::debug!(base_url = %client.base_url(), "using weather storage service");
    Ok(Arc::new(client))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_url_appends_weather_segment() {
        let client = HttpRecordClient::new("http://localhost:8000").unwrap();
        assert_eq!(client.record_url("abc123").unwrap().as_str(), "http://localhost:8000/weather/abc123");
    }

    #[test]
    fn record_url_keeps_base_path_and_tolerates_trailing_slash() {
        let client = HttpRecordClient::new("https://example.com/api/").unwrap();
        assert_eq!(client.record_url("x1").unwrap().as_str(), "https://example.com/api/weather/x1");
    }

    #[test]
    fn record_url_encodes_id_as_one_segment() {
        let client = HttpRecordClient::new("http://localhost:8000").unwrap();
        assert_eq!(
            client.record_url("a/b c").unwrap().as_str(),
            "http://localhost:8000/weather/a%2Fb%20c"
        );
    }

    #[test]
    fn record_url_keeps_dots_inside_ids_and_encodes_control_chars() {
        let client = HttpRecordClient::new("http://localhost:8000").unwrap();
        assert_eq!(client.record_url("...").unwrap().as_str(), "http://localhost:8000/weather/...");
        assert_eq!(client.record_url("v1.2").unwrap().as_str(), "http://localhost:8000/weather/v1.2");
        assert_eq!(client.record_url("a\tb").unwrap().as_str(), "http://localhost:8000/weather/a%09b");
    }

    #[test]
    fn record_url_refuses_dot_segment_ids() {
        let client = HttpRecordClient::new("http://localhost:8000/api").unwrap();
        assert_eq!(client.record_url("."), None);
        assert_eq!(client.record_url(".."), None);
    }

    #[tokio::test]
    async fn dot_segment_id_fails_without_request() {
        // nothing listens on the discard port; a request would be a transport error
        let client = HttpRecordClient::new("http://127.0.0.1:9").unwrap();

        for id in [".", ".."] {
            let err = client.fetch_record(id).await.unwrap_err();
            assert_eq!(err, LookupError::Unaddressable(id.to_string()));
        }
    }

    #[test]
    fn rejection_detail_uses_string_detail() {
        assert_eq!(rejection_detail(r#"{"detail":"Weather data gone"}"#).as_deref(), Some("Weather data gone"));
    }

    #[test]
    fn rejection_detail_ignores_missing_empty_or_structured_detail() {
        assert_eq!(rejection_detail(r#"{"error":"nope"}"#), None);
        assert_eq!(rejection_detail(r#"{"detail":""}"#), None);
        assert_eq!(rejection_detail(r#"{"detail":[{"msg":"bad"}]}"#), None);
        assert_eq!(rejection_detail("<html>502</html>"), None);
        assert_eq!(rejection_detail(""), None);
    }

    #[test]
    fn record_source_from_default_config() {
        let source = record_source_from_config(&Config::default());
        assert!(source.is_ok());
    }

    #[test]
    fn truncate_body_respects_char_boundaries() {
        let long = "é".repeat(300);
        assert_eq!(truncate_body(&long).chars().count(), 200);
        assert_eq!(truncate_body("short"), "short");
    }
}
