use crate::domain::ports::{ConfigProvider, TextFetcher};
use crate::utils::error::Result;
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// reqwest 實作的 [`TextFetcher`]；非 2xx 回應視為錯誤
#[derive(Debug, Clone)]
pub struct HttpTextFetcher {
    client: Client,
}

impl HttpTextFetcher {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    pub fn from_config<C: ConfigProvider + ?Sized>(config: &C) -> Result<Self> {
        let mut builder =
            Client::builder().timeout(config.request_timeout().unwrap_or(DEFAULT_TIMEOUT));

        if let Some(user_agent) = config.user_agent() {
            builder = builder.user_agent(user_agent.to_string());
        }

        Ok(Self::new(builder.build()?))
    }
}

#[async_trait]
impl TextFetcher for HttpTextFetcher {
    async fn fetch_text(&self, uri: &str) -> Result<String> {
        let response = self.client.get(uri).send().await?;
        tracing::debug!("Response status for {}: {}", uri, response.status());

        // 非 2xx 的錯誤頁不當成 XML 解析，視為網路錯誤
        let response = response.error_for_status()?;
        Ok(response.text().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::error::{DatesError, ErrorCategory};
    use httpmock::prelude::*;

    #[tokio::test]
    async fn test_fetch_text_returns_body() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(GET)
                .path("/wms")
                .query_param("request", "GetCapabilities");
            then.status(200)
                .header("Content-Type", "text/xml")
                .body("<WMS_Capabilities/>");
        });

        let fetcher = HttpTextFetcher::new(Client::new());
        let body = fetcher
            .fetch_text(&server.url("/wms?request=GetCapabilities"))
            .await
            .unwrap();

        api_mock.assert();
        assert_eq!(body, "<WMS_Capabilities/>");
    }

    #[tokio::test]
    async fn test_error_status_is_a_network_error() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(GET).path("/wcs");
            then.status(503).body("maintenance");
        });

        let fetcher = HttpTextFetcher::new(Client::new());
        let err = fetcher.fetch_text(&server.url("/wcs")).await.unwrap_err();

        api_mock.assert();
        assert!(matches!(err, DatesError::HttpError(_)));
        assert_eq!(err.category(), ErrorCategory::Network);
    }
}
