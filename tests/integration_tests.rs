use available_dates::config::{HttpConfig, ServersUrls};
use available_dates::{get_layers_available_dates, ServersConfig, Timestamp};
use httpmock::prelude::*;
use tempfile::TempDir;

const JAN_1_2020: i64 = 1_577_836_800_000;
const JAN_2_2020: i64 = 1_577_923_200_000;
const JAN_3_2020: i64 = 1_578_009_600_000;

const WMS_CAPABILITIES: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<WMS_Capabilities version="1.3.0" xmlns="http://www.opengis.net/wms">
  <Service><Name>WMS</Name></Service>
  <Capability>
    <Layer>
      <Title>Prism layers</Title>
      <Layer queryable="1">
        <Name>precip_blended_dekad</Name>
        <Dimension name="time" units="ISO8601">2020-01-01T00:00:00Z,2020-01-02T00:00:00Z</Dimension>
      </Layer>
      <Layer queryable="1">
        <Name>admin_boundaries</Name>
      </Layer>
    </Layer>
  </Capability>
</WMS_Capabilities>"#;

const WCS_DESCRIBE_COVERAGE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<CoverageDescription version="1.0.0" xmlns="http://www.opengis.net/wcs" xmlns:gml="http://www.opengis.net/gml">
  <CoverageOffering>
    <name>precip_blended_dekad</name>
    <domainSet>
      <temporalDomain>
        <gml:timePosition>2020-01-02T00:00:00Z</gml:timePosition>
        <gml:timePosition>2020-01-03T00:00:00Z</gml:timePosition>
      </temporalDomain>
    </domainSet>
  </CoverageOffering>
</CoverageDescription>"#;

fn config(wms: Vec<String>, wcs: Vec<String>) -> ServersConfig {
    ServersConfig {
        servers_urls: ServersUrls { wms, wcs },
        http: Some(HttpConfig {
            timeout_seconds: Some(5),
            user_agent: Some("available-dates-tests".to_string()),
        }),
    }
}

fn millis(dates: &[Timestamp]) -> Vec<Option<i64>> {
    dates.iter().map(Timestamp::millis).collect()
}

#[tokio::test]
async fn test_end_to_end_wms_and_wcs() {
    let server = MockServer::start();

    let wms_mock = server.mock(|when, then| {
        when.method(GET)
            .path("/geoserver/wms")
            .query_param("service", "WMS")
            .query_param("request", "GetCapabilities");
        then.status(200)
            .header("Content-Type", "text/xml")
            .body(WMS_CAPABILITIES);
    });

    let wcs_mock = server.mock(|when, then| {
        when.method(GET)
            .path("/geoserver/wcs")
            .query_param("request", "DescribeCoverage");
        then.status(200)
            .header("Content-Type", "text/xml")
            .body(WCS_DESCRIBE_COVERAGE);
    });

    let config = config(
        vec![server.url("/geoserver/wms?service=WMS&request=GetMap")],
        vec![server.url("/geoserver/wcs")],
    );

    let dates = get_layers_available_dates(config).await.unwrap();

    wms_mock.assert();
    wcs_mock.assert();

    assert_eq!(dates.len(), 2);
    assert_eq!(
        millis(dates.get("precip_blended_dekad").unwrap()),
        vec![Some(JAN_1_2020), Some(JAN_2_2020), Some(JAN_3_2020)]
    );
    assert!(dates.get("admin_boundaries").unwrap().is_empty());
}

#[tokio::test]
async fn test_server_error_keeps_other_results() {
    let server = MockServer::start();

    let wms_mock = server.mock(|when, then| {
        when.method(GET).path("/wms");
        then.status(200).body(WMS_CAPABILITIES);
    });

    let broken_mock = server.mock(|when, then| {
        when.method(GET).path("/broken-wcs");
        then.status(500).body("Internal Server Error");
    });

    let garbage_mock = server.mock(|when, then| {
        when.method(GET).path("/garbage-wms");
        then.status(200).body("<html><body>oops</html>");
    });

    let config = config(
        vec![server.url("/wms"), server.url("/garbage-wms")],
        vec![server.url("/broken-wcs")],
    );

    let dates = get_layers_available_dates(config).await.unwrap();

    wms_mock.assert();
    broken_mock.assert();
    garbage_mock.assert();

    assert_eq!(
        dates.layer_ids().collect::<Vec<_>>(),
        vec!["admin_boundaries", "precip_blended_dekad"]
    );
    assert_eq!(
        millis(dates.get("precip_blended_dekad").unwrap()),
        vec![Some(JAN_1_2020), Some(JAN_2_2020)]
    );
}

#[tokio::test]
async fn test_connection_refused_resolves_to_empty_mapping() {
    // 綁定後立即釋放，取得一個沒有人監聽的埠
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };

    let config = config(
        vec![format!("http://127.0.0.1:{}/wms", port)],
        vec![format!("http://127.0.0.1:{}/wcs", port)],
    );

    let dates = get_layers_available_dates(config).await.unwrap();

    assert!(dates.is_empty());
}

#[tokio::test]
async fn test_config_file_to_json_output() -> anyhow::Result<()> {
    let server = MockServer::start();
    let wcs_mock = server.mock(|when, then| {
        when.method(GET)
            .path("/wcs")
            .query_param("request", "DescribeCoverage");
        then.status(200).body(WCS_DESCRIBE_COVERAGE);
    });

    let temp_dir = TempDir::new()?;
    let config_path = temp_dir.path().join("servers.toml");
    tokio::fs::write(
        &config_path,
        format!(
            "[servers_urls]\nwcs = [\"{}\"]\n\n[http]\ntimeout_seconds = 5\n",
            server.url("/wcs")
        ),
    )
    .await?;

    let config = ServersConfig::from_file(&config_path)?;
    let dates = get_layers_available_dates(config).await?;

    wcs_mock.assert();

    let json = serde_json::to_value(&dates)?;
    assert_eq!(
        json,
        serde_json::json!({"precip_blended_dekad": [JAN_2_2020, JAN_3_2020]})
    );

    Ok(())
}
