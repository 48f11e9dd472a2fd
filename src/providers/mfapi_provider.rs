use crate::core::config::MfApiProviderConfig;
use crate::core::error::{PortfolioError, PortfolioResult};
use crate::core::nav::{MAX_HISTORY_ENTRIES, NavProvider, NavQuote, RawNavPoint};
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

/// NAV provider for the public mfapi.in scheme endpoint.
pub struct MfApiProvider {
    base_url: String,
    client: reqwest::Client,
}

impl MfApiProvider {
    pub fn new(config: &MfApiProviderConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent("navfolio/1.0")
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .context("Failed to build HTTP client")?;
        Ok(MfApiProvider {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    async fn fetch_scheme(&self, scheme_code: &str) -> PortfolioResult<MfApiResponse> {
        let unavailable = |reason: String| PortfolioError::UpstreamUnavailable {
            scheme_code: scheme_code.to_string(),
            reason,
        };
        let malformed = |reason: String| PortfolioError::MalformedResponse {
            scheme_code: scheme_code.to_string(),
            reason,
        };

        let url = format!("{}/mf/{}", self.base_url, scheme_code);
        debug!("Requesting NAV data from {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| unavailable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(unavailable(format!("HTTP {status}")));
        }

        let response_text = response
            .text()
            .await
            .map_err(|e| unavailable(e.to_string()))?;
        if response_text.trim().is_empty() {
            return Err(malformed("empty response".to_string()));
        }

        let parsed: MfApiResponse = serde_json::from_str(&response_text)
            .map_err(|e| malformed(format!("{e}. Response: '{response_text}'")))?;

        if let Some(status) = &parsed.status
            && !status.eq_ignore_ascii_case("SUCCESS")
        {
            return Err(malformed(format!("upstream status '{status}'")));
        }

        debug!(
            "Fetched {} NAV point(s) for scheme {}",
            parsed.data.len(),
            scheme_code
        );
        Ok(parsed)
    }
}

#[derive(Debug, Deserialize)]
struct MfApiResponse {
    #[serde(default)]
    meta: MfApiMeta,
    #[serde(default)]
    data: Vec<RawNavPoint>,
    status: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct MfApiMeta {
    #[serde(default)]
    scheme_name: String,
}

#[async_trait]
impl NavProvider for MfApiProvider {
    async fn fetch_latest_nav(&self, scheme_code: &str) -> PortfolioResult<NavQuote> {
        let response = self.fetch_scheme(scheme_code).await?;
        let latest = response
            .data
            .into_iter()
            .next()
            .ok_or_else(|| PortfolioError::MalformedResponse {
                scheme_code: scheme_code.to_string(),
                reason: "no NAV data published".to_string(),
            })?;

        Ok(NavQuote {
            name: response.meta.scheme_name,
            nav: latest.nav,
            date: latest.date,
        })
    }

    async fn fetch_nav_history(&self, scheme_code: &str) -> PortfolioResult<Vec<RawNavPoint>> {
        let mut data = self.fetch_scheme(scheme_code).await?.data;
        data.truncate(MAX_HISTORY_ENTRIES);
        Ok(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const SCHEME: &str = "119551";

    async fn create_mfapi_mock_server(
        scheme_code: &str,
        mock_response: &str,
        status_code: u16,
    ) -> MockServer {
        let mock_server = MockServer::start().await;
        let expected_path = format!("/mf/{scheme_code}");

        Mock::given(method("GET"))
            .and(path(&expected_path))
            .respond_with(ResponseTemplate::new(status_code).set_body_string(mock_response))
            .mount(&mock_server)
            .await;
        mock_server
    }

    fn provider_for(server: &MockServer) -> MfApiProvider {
        MfApiProvider::new(&MfApiProviderConfig {
            base_url: server.uri(),
            timeout_secs: 5,
        })
        .unwrap()
    }

    const MOCK_JSON: &str = r#"{
        "meta": {
            "fund_house": "Aditya Birla Sun Life Mutual Fund",
            "scheme_type": "Open Ended Schemes",
            "scheme_category": "Debt Scheme - Banking and PSU Fund",
            "scheme_code": 119551,
            "scheme_name": "Aditya Birla Sun Life Banking & PSU Debt Fund - DIRECT - IDCW"
        },
        "data": [
            {"date": "26-10-2024", "nav": "103.12340"},
            {"date": "25-10-2024", "nav": "103.01210"},
            {"date": "24-10-2024", "nav": "102.98760"}
        ],
        "status": "SUCCESS"
    }"#;

    #[tokio::test]
    async fn test_fetch_latest_nav() {
        let server = create_mfapi_mock_server(SCHEME, MOCK_JSON, 200).await;
        let quote = provider_for(&server).fetch_latest_nav(SCHEME).await.unwrap();

        assert_eq!(
            quote.name,
            "Aditya Birla Sun Life Banking & PSU Debt Fund - DIRECT - IDCW"
        );
        assert_eq!(quote.nav, "103.12340");
        assert_eq!(quote.date, "26-10-2024");
    }

    #[tokio::test]
    async fn test_fetch_nav_history_keeps_upstream_order() {
        let server = create_mfapi_mock_server(SCHEME, MOCK_JSON, 200).await;
        let history = provider_for(&server).fetch_nav_history(SCHEME).await.unwrap();

        assert_eq!(history.len(), 3);
        assert_eq!(history[0].date, "26-10-2024");
        assert_eq!(history[2].date, "24-10-2024");
    }

    #[tokio::test]
    async fn test_fetch_nav_history_is_capped() {
        let points: Vec<String> = (0..400)
            .map(|i| format!(r#"{{"date": "01-01-2000", "nav": "{i}.0"}}"#))
            .collect();
        let body = format!(
            r#"{{"meta": {{"scheme_name": "Long Fund"}}, "data": [{}], "status": "SUCCESS"}}"#,
            points.join(",")
        );
        let server = create_mfapi_mock_server(SCHEME, &body, 200).await;

        let history = provider_for(&server).fetch_nav_history(SCHEME).await.unwrap();
        assert_eq!(history.len(), 365);
        assert_eq!(history[0].nav, "0.0");
    }

    #[tokio::test]
    async fn test_unknown_scheme_has_no_data() {
        let body = r#"{"meta": {}, "data": [], "status": "SUCCESS"}"#;
        let server = create_mfapi_mock_server(SCHEME, body, 200).await;
        let provider = provider_for(&server);

        let latest = provider.fetch_latest_nav(SCHEME).await;
        assert!(matches!(
            latest,
            Err(PortfolioError::MalformedResponse { .. })
        ));

        let history = provider.fetch_nav_history(SCHEME).await.unwrap();
        assert!(history.is_empty());
    }

    #[tokio::test]
    async fn test_server_error_is_upstream_unavailable() {
        let server = create_mfapi_mock_server(SCHEME, "Server Error", 500).await;
        let result = provider_for(&server).fetch_latest_nav(SCHEME).await;

        match result {
            Err(PortfolioError::UpstreamUnavailable {
                scheme_code,
                reason,
            }) => {
                assert_eq!(scheme_code, SCHEME);
                assert!(reason.contains("500"), "{reason}");
            }
            other => panic!("Expected upstream error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_malformed_response() {
        let server = create_mfapi_mock_server(SCHEME, r#"{ "data": "abc" }"#, 200).await;
        let result = provider_for(&server).fetch_nav_history(SCHEME).await;

        let error_message = result.unwrap_err().to_string();
        assert!(error_message.contains("Malformed NAV response"));
        assert!(error_message.contains(SCHEME));
    }

    #[tokio::test]
    async fn test_empty_response() {
        let server = create_mfapi_mock_server(SCHEME, "", 200).await;
        let result = provider_for(&server).fetch_latest_nav(SCHEME).await;

        assert_eq!(
            result.unwrap_err().to_string(),
            format!("Malformed NAV response for scheme {SCHEME}: empty response")
        );
    }

    #[tokio::test]
    async fn test_unreachable_upstream() {
        let provider = MfApiProvider::new(&MfApiProviderConfig {
            base_url: "http://127.0.0.1:1".to_string(),
            timeout_secs: 2,
        })
        .unwrap();

        let result = provider.fetch_latest_nav(SCHEME).await;
        assert!(matches!(
            result,
            Err(PortfolioError::UpstreamUnavailable { .. })
        ));
    }
}
