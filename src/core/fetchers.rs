use crate::core::capabilities::{as_node_list, format_capabilities_info, lookup_path};
use crate::core::uri::format_server_uri;
use crate::core::xml::xml_to_tree;
use crate::domain::model::AvailableDates;
use crate::domain::ports::TextFetcher;
use crate::utils::error::Result;
use serde_json::Value;

/// 各協定的請求參數與欄位路徑
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServerProtocol {
    Wms,
    Wcs,
}

impl ServerProtocol {
    pub fn request(&self) -> &'static str {
        match self {
            ServerProtocol::Wms => "GetCapabilities",
            ServerProtocol::Wcs => "DescribeCoverage",
        }
    }

    fn layers_path(&self) -> &'static str {
        match self {
            ServerProtocol::Wms => "WMS_Capabilities.Capability.Layer",
            ServerProtocol::Wcs => "CoverageDescription.CoverageOffering",
        }
    }

    fn layer_id_path(&self) -> &'static str {
        match self {
            ServerProtocol::Wms => "Name._text",
            ServerProtocol::Wcs => "name._text",
        }
    }

    fn dates_path(&self) -> &'static str {
        match self {
            ServerProtocol::Wms => "Dimension._text",
            ServerProtocol::Wcs => "domainSet.temporalDomain.gml:timePosition",
        }
    }

    /// WMS 的圖層可以巢狀，攤平一層；WCS 不會巢狀
    fn collect_layers<'a>(&self, tree: &'a Value) -> Vec<&'a Value> {
        let raw_layers = lookup_path(tree, self.layers_path());
        match self {
            ServerProtocol::Wms => match raw_layers {
                Some(Value::Array(groups)) => groups
                    .iter()
                    .flat_map(|group| as_node_list(lookup_path(group, "Layer")))
                    .collect(),
                other => as_node_list(other.and_then(|root| lookup_path(root, "Layer"))),
            },
            ServerProtocol::Wcs => as_node_list(raw_layers),
        }
    }
}

impl std::fmt::Display for ServerProtocol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ServerProtocol::Wms => write!(f, "WMS"),
            ServerProtocol::Wcs => write!(f, "WCS"),
        }
    }
}

/// 列出 WMS 伺服器各圖層的可用日期；失敗時記錄錯誤並回傳空 mapping
pub async fn get_wms_capabilities<F>(fetcher: &F, server_uri: &str) -> AvailableDates
where
    F: TextFetcher + ?Sized,
{
    get_available_dates(fetcher, server_uri, ServerProtocol::Wms).await
}

/// 列出 WCS 伺服器各 coverage 的可用日期；失敗時記錄錯誤並回傳空 mapping
pub async fn get_wcs_coverage<F>(fetcher: &F, server_uri: &str) -> AvailableDates
where
    F: TextFetcher + ?Sized,
{
    get_available_dates(fetcher, server_uri, ServerProtocol::Wcs).await
}

pub async fn get_available_dates<F>(
    fetcher: &F,
    server_uri: &str,
    protocol: ServerProtocol,
) -> AvailableDates
where
    F: TextFetcher + ?Sized,
{
    let request_uri = match format_server_uri(server_uri, &[("request", protocol.request().into())]) {
        Ok(uri) => uri,
        Err(e) => {
            tracing::error!(
                server_uri = %server_uri,
                category = ?e.category(),
                "Invalid {} server URI {}, error: {}",
                protocol,
                server_uri,
                e
            );
            return AvailableDates::new();
        }
    };

    match fetch_layers(fetcher, &request_uri, protocol).await {
        Ok(dates) => {
            tracing::info!(
                "📡 {} {}: {} layers with available dates",
                protocol,
                server_uri,
                dates.len()
            );
            dates
        }
        Err(e) => {
            tracing::error!(
                request_uri = %request_uri,
                category = ?e.category(),
                "Server returned an error for request GET/{}, error: {}",
                request_uri,
                e
            );
            AvailableDates::new()
        }
    }
}

async fn fetch_layers<F>(
    fetcher: &F,
    request_uri: &str,
    protocol: ServerProtocol,
) -> Result<AvailableDates>
where
    F: TextFetcher + ?Sized,
{
    tracing::debug!("Making {} request to: {}", protocol, request_uri);
    let response_text = fetcher.fetch_text(request_uri).await?;
    let tree = xml_to_tree(&response_text)?;

    let layers = protocol.collect_layers(&tree);
    tracing::debug!("{} response contains {} layers", protocol, layers.len());

    Ok(format_capabilities_info(
        &layers,
        protocol.layer_id_path(),
        protocol.dates_path(),
    ))
}
