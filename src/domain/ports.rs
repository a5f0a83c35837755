use crate::utils::error::Result;
use async_trait::async_trait;
use std::time::Duration;

/// 以 GET 取得 URL 的回應本文
#[async_trait]
pub trait TextFetcher: Send + Sync {
    async fn fetch_text(&self, uri: &str) -> Result<String>;
}

pub trait ConfigProvider: Send + Sync {
    fn wms_server_urls(&self) -> &[String];
    fn wcs_server_urls(&self) -> &[String];
    fn request_timeout(&self) -> Option<Duration>;
    fn user_agent(&self) -> Option<&str>;
}
