//! Transport to the detection endpoint.

use serde::Serialize;

use crate::config::PARSE_WEBSITE_PATH;
use crate::detection::{DetectionMode, ParserResult};
use crate::error_handling::ClientError;

/// Issues one detection request.
#[async_trait::async_trait]
pub trait ParserApi: Send + Sync {
    async fn parse_website(
        &self,
        url: &str,
        mode: DetectionMode,
    ) -> Result<ParserResult, ClientError>;
}

#[derive(Serialize)]
struct ParseWebsiteBody<'a> {
    url: &'a str,
    mode: DetectionMode,
}

/// `ParserApi` posting JSON to a running endpoint.
#[derive(Debug, Clone)]
pub struct HttpParserApi {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpParserApi {
    /// `base_url` is the endpoint origin, e.g. `http://127.0.0.1:3000`.
    pub fn new(client: reqwest::Client, base_url: &str) -> Self {
        Self {
            client,
            endpoint: format!("{}{}", base_url.trim_end_matches('/'), PARSE_WEBSITE_PATH),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait::async_trait]
impl ParserApi for HttpParserApi {
    async fn parse_website(
        &self,
        url: &str,
        mode: DetectionMode,
    ) -> Result<ParserResult, ClientError> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(&ParseWebsiteBody { url, mode })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::Status(status.as_u16()));
        }

        Ok(response.json::<ParserResult>().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use crate::signatures::{DetectedService, SignatureCatalog};

    #[test]
    fn test_endpoint_joins_base_url() {
        let api = HttpParserApi::new(reqwest::Client::new(), "http://localhost:3000/");
        assert_eq!(api.endpoint(), "http://localhost:3000/api/parse-website");
    }

    #[tokio::test]
    async fn test_posts_url_and_mode() {
        let jivo = SignatureCatalog::builtin().get("jivo").expect("jivo");
        let expected = ParserResult::from_detected("https://example.ru", vec![DetectedService::from(jivo)]);

        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/parse-website"))
            .and(body_json(serde_json::json!({
                "url": "https://example.ru",
                "mode": "widgets"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(&expected))
            .expect(1)
            .mount(&server)
            .await;

        let api = HttpParserApi::new(reqwest::Client::new(), &server.uri());
        let result = api
            .parse_website("https://example.ru", DetectionMode::Widgets)
            .await
            .expect("request should succeed");
        assert_eq!(result, expected);
    }

    #[tokio::test]
    async fn test_non_2xx_is_status_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(400))
            .mount(&server)
            .await;

        let api = HttpParserApi::new(reqwest::Client::new(), &server.uri());
        let err = api
            .parse_website("not a url", DetectionMode::All)
            .await
            .expect_err("400 should fail");
        assert!(matches!(err, ClientError::Status(400)));
    }

    #[tokio::test]
    async fn test_undecodable_body_is_transport_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
            .mount(&server)
            .await;

        let api = HttpParserApi::new(reqwest::Client::new(), &server.uri());
        let err = api
            .parse_website("https://example.ru", DetectionMode::All)
            .await
            .expect_err("html is not a result");
        assert!(matches!(err, ClientError::Transport(_)));
    }
}
