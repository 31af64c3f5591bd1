//! HTTP implementation of the tool client

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Url;

use super::traits::{ToolClient, ToolClientError, ToolClientResult};
use crate::config::ClientSettings;
use crate::logging::Logger;
use crate::types::ToolArguments;

/// Add `http://` when no scheme is given and drop trailing slashes
pub fn normalize_base_url(base_url: &str) -> String {
    let trimmed = base_url.trim();
    let with_scheme = if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        trimmed.to_string()
    } else {
        format!("http://{}", trimmed)
    };
    with_scheme.trim_end_matches('/').to_string()
}

/// reqwest-backed [`ToolClient`]
///
/// Certificates and hostnames are verified unless `dev_mode` is set in the
/// settings, in which case self-signed certificates and any hostname are
/// accepted.
pub struct HttpToolClient {
    http: reqwest::Client,
    logger: Arc<dyn Logger>,
}

impl HttpToolClient {
    pub fn new(settings: &ClientSettings, logger: Arc<dyn Logger>) -> ToolClientResult<Self> {
        let timeout = settings.timeout();
        let mut builder = reqwest::Client::builder()
            .connect_timeout(timeout)
            .timeout(timeout);

        if settings.dev_mode {
            logger.warn(
                "[HttpToolClient] dev_mode is on: accepting invalid certificates and hostnames",
            );
            builder = builder
                .danger_accept_invalid_certs(true)
                .danger_accept_invalid_hostnames(true);
        }

        Ok(Self {
            http: builder.build()?,
            logger,
        })
    }

    /// `{base}/{segments...}` with each segment percent-encoded
    fn endpoint(&self, base_url: &str, segments: &[&str]) -> ToolClientResult<Url> {
        let base = normalize_base_url(base_url);
        let mut url = Url::parse(&base).map_err(|e| ToolClientError::InvalidUrl {
            url: base.clone(),
            message: e.to_string(),
        })?;
        url.path_segments_mut()
            .map_err(|_| ToolClientError::InvalidUrl {
                url: base.clone(),
                message: "cannot be a base".to_string(),
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn fetch_tools(&self, base_url: &str, server_id: &str) -> ToolClientResult<Vec<String>> {
        let url = self.endpoint(base_url, &[server_id, "tools"])?;
        self.logger.debug(&format!("[HttpToolClient] GET {}", url));

        let response = self.http.get(url).send().await?.error_for_status()?;
        Ok(response.json::<Vec<String>>().await?)
    }
}

#[async_trait]
impl ToolClient for HttpToolClient {
    async fn ping(&self, base_url: &str) -> bool {
        let url = normalize_base_url(base_url);
        match self.http.get(&url).send().await {
            Ok(response) => {
                self.logger.debug(&format!(
                    "[HttpToolClient] Ping {} -> {}",
                    url,
                    response.status()
                ));
                response.status().is_success()
            }
            Err(e) => {
                self.logger.warn(&format!("[HttpToolClient] Ping {} failed: {}", url, e));
                false
            }
        }
    }

    async fn list_tools(&self, base_url: &str, server_id: &str) -> Vec<String> {
        match self.fetch_tools(base_url, server_id).await {
            Ok(tools) => {
                self.logger.info(&format!(
                    "[HttpToolClient] {} tool(s) from {}: {:?}",
                    tools.len(),
                    server_id,
                    tools
                ));
                tools
            }
            Err(e) => {
                self.logger.warn(&format!(
                    "[HttpToolClient] Listing tools on {} failed: {}",
                    server_id, e
                ));
                Vec::new()
            }
        }
    }

    async fn try_invoke(
        &self,
        base_url: &str,
        server_id: &str,
        tool_name: &str,
        arguments: &ToolArguments,
    ) -> ToolClientResult<String> {
        let url = self.endpoint(base_url, &[server_id, "call", tool_name])?;
        self.logger.info(&format!(
            "[HttpToolClient] Calling {} with {:?}",
            url, arguments
        ));

        let mut request = self.http.get(url);
        if !arguments.is_empty() {
            request = request.query(arguments);
        }

        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            self.logger.warn(&format!(
                "[HttpToolClient] {} answered {}",
                tool_name, status
            ));
        }
        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::NoOpLogger;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client() -> HttpToolClient {
        let settings = ClientSettings::default().with_timeout_secs(5);
        HttpToolClient::new(&settings, Arc::new(NoOpLogger)).unwrap()
    }

    #[test]
    fn test_normalize_base_url() {
        assert_eq!(normalize_base_url("localhost:5010"), "http://localhost:5010");
        assert_eq!(normalize_base_url("https://api.example.com/"), "https://api.example.com");
        assert_eq!(normalize_base_url("http://host//"), "http://host");
    }

    #[test]
    fn test_endpoint_encodes_segments() {
        let url = client()
            .endpoint("localhost:5010/", &["weather_service", "call", "get forecast"])
            .unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:5010/weather_service/call/get%20forecast"
        );
    }

    #[tokio::test]
    async fn test_ping() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/"))
            .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
            .mount(&server)
            .await;

        assert!(client().ping(&server.uri()).await);
        assert!(!client().ping("http://127.0.0.1:1").await);
    }

    #[tokio::test]
    async fn test_ping_non_success() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        assert!(!client().ping(&server.uri()).await);
    }

    #[tokio::test]
    async fn test_list_tools() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/weather_service/tools"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!(["get_forecast", "get_alerts"])),
            )
            .mount(&server)
            .await;

        let tools = client().list_tools(&server.uri(), "weather_service").await;
        assert_eq!(tools, vec!["get_forecast", "get_alerts"]);
    }

    #[tokio::test]
    async fn test_list_tools_failures_are_empty() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/bad_json/tools"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/missing/tools"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let client = client();
        assert!(client.list_tools(&server.uri(), "bad_json").await.is_empty());
        assert!(client.list_tools(&server.uri(), "missing").await.is_empty());
        assert!(client.list_tools("http://127.0.0.1:1", "x").await.is_empty());
    }

    #[tokio::test]
    async fn test_invoke_passes_arguments_as_query() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/weather_service/call/get_forecast"))
            .and(query_param("city", "Chiba"))
            .respond_with(ResponseTemplate::new(200).set_body_string("晴れ 22℃"))
            .mount(&server)
            .await;

        let mut args = ToolArguments::new();
        args.insert("city".to_string(), "Chiba".to_string());

        let body = client()
            .invoke(&server.uri(), "weather_service", "get_forecast", &args)
            .await;
        assert_eq!(body, "晴れ 22℃");
    }

    #[tokio::test]
    async fn test_invoke_returns_error_bodies_verbatim() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500).set_body_string("{\"error\":\"boom\"}"))
            .mount(&server)
            .await;

        let body = client()
            .try_invoke(&server.uri(), "s", "t", &ToolArguments::new())
            .await
            .unwrap();
        assert_eq!(body, "{\"error\":\"boom\"}");
    }

    #[tokio::test]
    async fn test_invoke_transport_failure_is_text() {
        let body = client()
            .invoke("http://127.0.0.1:1", "s", "t", &ToolArguments::new())
            .await;
        assert!(body.starts_with("Error calling tool:"));
    }

    #[test]
    fn test_dev_mode_client_builds() {
        let settings = ClientSettings::default().with_dev_mode(true);
        assert!(HttpToolClient::new(&settings, Arc::new(NoOpLogger)).is_ok());
    }
}
