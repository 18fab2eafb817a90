//! HTTP request stage

use std::time::{Duration, Instant};

use indexmap::IndexMap;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, Method};
use tracing::debug;

use super::store::{LastResponse, RunContext};
use crate::config::GlobalConfig;
use crate::errors::{ScenaristError, StageError};
use crate::scenario::RequestSpec;

/// Sends scenario requests over one shared client
#[derive(Debug, Clone)]
pub struct HttpExecutor {
    client: Client,
    base_url: String,
    default_headers: IndexMap<String, String>,
    timeout: Option<Duration>,
}

impl HttpExecutor {
    pub fn new(config: &GlobalConfig) -> Result<Self, ScenaristError> {
        let client = Client::builder()
            .user_agent(concat!("scenarist/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            default_headers: config.headers.clone(),
            timeout: config.request_timeout(),
        })
    }

    /// Full URL for a scenario path
    pub fn url_for(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Send the scenario request, if any, and replace the last response
    ///
    /// Any HTTP status counts as success here; judging the status is the
    /// validation stage's job.
    pub async fn execute(
        &self,
        spec: Option<&RequestSpec>,
        ctx: &mut RunContext,
    ) -> Result<(), StageError> {
        let Some(spec) = spec else {
            return Ok(());
        };

        let method =
            Method::from_bytes(spec.method.trim().to_uppercase().as_bytes()).map_err(|_| {
                StageError::RequestConstructionFailed(format!(
                    "invalid HTTP method '{}'",
                    spec.method
                ))
            })?;

        let full_url = self.url_for(&spec.url);
        let url = url::Url::parse(&full_url).map_err(|e| {
            StageError::RequestConstructionFailed(format!("invalid URL '{}': {}", full_url, e))
        })?;

        let headers = self.build_headers(&spec.headers)?;

        let mut request = self.client.request(method.clone(), url).headers(headers);
        if let Some(timeout) = self.timeout {
            request = request.timeout(timeout);
        }
        if let Some(ref body) = spec.body {
            request = request.body(body.clone());
        }

        debug!(%method, url = %full_url, "Sending request");

        let start = Instant::now();
        let response = request.send().await.map_err(StageError::RequestFailed)?;
        let status = response.status().as_u16();
        let headers = join_headers(response.headers());
        let body = response.text().await.map_err(StageError::RequestFailed)?;
        let elapsed = start.elapsed();

        debug!(
            status,
            elapsed_ms = elapsed.as_millis() as u64,
            bytes = body.len(),
            "Received response"
        );

        ctx.last_response = Some(LastResponse {
            status,
            headers,
            body,
            elapsed,
        });
        Ok(())
    }

    /// Default headers first, then scenario headers set over them
    fn build_headers(
        &self,
        scenario_headers: &IndexMap<String, String>,
    ) -> Result<HeaderMap, StageError> {
        let mut headers = HeaderMap::new();
        for (key, value) in self.default_headers.iter().chain(scenario_headers.iter()) {
            let name = HeaderName::try_from(key.as_str()).map_err(|e| {
                StageError::RequestConstructionFailed(format!(
                    "invalid header name '{}': {}",
                    key, e
                ))
            })?;
            let val = HeaderValue::from_str(value).map_err(|e| {
                StageError::RequestConstructionFailed(format!(
                    "invalid value for header '{}': {}",
                    key, e
                ))
            })?;
            headers.insert(name, val);
        }
        Ok(headers)
    }
}

/// Flatten a header map, joining repeated headers with ", "
pub fn join_headers(headers: &HeaderMap) -> IndexMap<String, String> {
    let mut joined: IndexMap<String, String> = IndexMap::new();
    for name in headers.keys() {
        let values: Vec<String> = headers
            .get_all(name)
            .iter()
            .map(|v| String::from_utf8_lossy(v.as_bytes()).into_owned())
            .collect();
        if !values.is_empty() {
            joined.insert(name.as_str().to_string(), values.join(", "));
        }
    }
    joined
}

#[cfg(test)]
mod tests {
    use super::*;

    fn executor(base_url: &str) -> HttpExecutor {
        HttpExecutor::new(&GlobalConfig {
            base_url: base_url.to_string(),
            ..Default::default()
        })
        .unwrap()
    }

    fn request(method: &str, url: &str) -> RequestSpec {
        RequestSpec {
            method: method.to_string(),
            url: url.to_string(),
            body: None,
            headers: IndexMap::new(),
        }
    }

    #[test]
    fn test_join_repeated_headers() {
        let mut headers = HeaderMap::new();
        headers.append("set-cookie", HeaderValue::from_static("a=1"));
        headers.append("set-cookie", HeaderValue::from_static("b=2"));
        headers.insert("content-type", HeaderValue::from_static("text/plain"));

        let joined = join_headers(&headers);
        assert_eq!(joined["set-cookie"], "a=1, b=2");
        assert_eq!(joined["content-type"], "text/plain");
    }

    #[test]
    fn test_scenario_headers_override_defaults() {
        let mut config = GlobalConfig::default();
        config.headers.insert("Accept".into(), "text/plain".into());
        config.headers.insert("X-Env".into(), "test".into());
        let executor = HttpExecutor::new(&config).unwrap();

        let mut scenario_headers = IndexMap::new();
        scenario_headers.insert("accept".to_string(), "application/json".to_string());
        let headers = executor.build_headers(&scenario_headers).unwrap();

        assert_eq!(headers.get("accept").unwrap(), "application/json");
        assert_eq!(headers.get("x-env").unwrap(), "test");
        assert_eq!(headers.len(), 2);
    }

    #[tokio::test]
    async fn test_no_request_is_noop() {
        let mut ctx = RunContext::new();
        executor("http://localhost").execute(None, &mut ctx).await.unwrap();
        assert!(ctx.last_response.is_none());
    }

    #[tokio::test]
    async fn test_invalid_method() {
        let mut ctx = RunContext::new();
        let err = executor("http://localhost")
            .execute(Some(&request("GE T", "/")), &mut ctx)
            .await
            .unwrap_err();
        assert!(matches!(err, StageError::RequestConstructionFailed(_)));
    }

    #[tokio::test]
    async fn test_invalid_url() {
        let mut ctx = RunContext::new();
        let err = executor("not a base url")
            .execute(Some(&request("GET", "/users")), &mut ctx)
            .await
            .unwrap_err();
        assert!(matches!(err, StageError::RequestConstructionFailed(_)));
        assert!(ctx.last_response.is_none());
    }

    #[tokio::test]
    async fn test_invalid_header_value() {
        let mut ctx = RunContext::new();
        let mut spec = request("GET", "/");
        spec.headers.insert("X-Bad".into(), "line\nbreak".into());
        let err = executor("http://localhost")
            .execute(Some(&spec), &mut ctx)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("X-Bad"));
    }

    #[tokio::test]
    async fn test_connection_failure_is_request_failed() {
        let mut ctx = RunContext::new();
        // Port 9 (discard) is closed on test machines
        let err = executor("http://127.0.0.1:9")
            .execute(Some(&request("GET", "/")), &mut ctx)
            .await
            .unwrap_err();
        assert!(matches!(err, StageError::RequestFailed(_)));
    }
}
