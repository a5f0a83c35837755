use crate::adapters::http::HttpTextFetcher;
use crate::core::fetchers::{get_wcs_coverage, get_wms_capabilities};
use crate::domain::model::AvailableDates;
use crate::domain::ports::{ConfigProvider, TextFetcher};
use crate::utils::error::Result;
use futures::future::join_all;

/// 同時向所有設定的 WMS / WCS 伺服器查詢，合併成單一 mapping
pub struct AvailableDatesAggregator<F: TextFetcher, C: ConfigProvider> {
    fetcher: F,
    config: C,
}

impl<F: TextFetcher, C: ConfigProvider> AvailableDatesAggregator<F, C> {
    pub fn new(fetcher: F, config: C) -> Self {
        Self { fetcher, config }
    }

    /// 永遠成功；單一伺服器失敗只會讓它的貢獻是空的
    pub async fn get_layers_available_dates(&self) -> AvailableDates {
        let wms_urls = self.config.wms_server_urls();
        let wcs_urls = self.config.wcs_server_urls();

        tracing::info!(
            "🚀 Querying {} WMS and {} WCS servers",
            wms_urls.len(),
            wcs_urls.len()
        );

        let wms_requests = wms_urls
            .iter()
            .map(|url| get_wms_capabilities(&self.fetcher, url));
        let wcs_requests = wcs_urls
            .iter()
            .map(|url| get_wcs_coverage(&self.fetcher, url));

        let (wms_results, wcs_results) =
            futures::join!(join_all(wms_requests), join_all(wcs_requests));

        let combined = AvailableDates::merge_all(wms_results.into_iter().chain(wcs_results));

        tracing::info!("✅ Collected available dates for {} layers", combined.len());
        combined
    }
}

/// 以預設 HTTP fetcher 查詢 `config` 中的所有伺服器
pub async fn get_layers_available_dates<C: ConfigProvider>(config: C) -> Result<AvailableDates> {
    let fetcher = HttpTextFetcher::from_config(&config)?;
    let aggregator = AvailableDatesAggregator::new(fetcher, config);
    Ok(aggregator.get_layers_available_dates().await)
}
