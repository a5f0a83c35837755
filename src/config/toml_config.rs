use crate::core::ConfigProvider;
use crate::utils::error::{DatesError, Result};
use crate::utils::validation::{
    validate_non_empty_string, validate_positive_number, validate_urls, Validate,
};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::OnceLock;
use std::time::Duration;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServersConfig {
    #[serde(default, alias = "serversUrls")]
    pub servers_urls: ServersUrls,
    pub http: Option<HttpConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServersUrls {
    #[serde(default)]
    pub wms: Vec<String>,
    #[serde(default)]
    pub wcs: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    #[serde(alias = "timeoutSeconds")]
    pub timeout_seconds: Option<u64>,
    #[serde(alias = "userAgent")]
    pub user_agent: Option<String>,
}

impl ServersConfig {
    /// 從檔案載入配置；`.json` 結尾以 JSON 解析，其餘以 TOML 解析
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(DatesError::IoError)?;

        let is_json = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.eq_ignore_ascii_case("json"))
            .unwrap_or(false);

        if is_json {
            Self::from_json_str(&content)
        } else {
            Self::from_toml_str(&content)
        }
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| DatesError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    pub fn from_json_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);
        Ok(serde_json::from_str(&processed_content)?)
    }

    /// 替換環境變數 (例如 ${WMS_HOST})；未定義的變數保持原樣
    fn substitute_env_vars(content: &str) -> String {
        static ENV_VAR: OnceLock<Regex> = OnceLock::new();
        let re = ENV_VAR.get_or_init(|| {
            Regex::new(r"\$\{([^}]+)\}").expect("env var pattern is a valid regex")
        });

        re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        })
        .into_owned()
    }

    pub fn validate_config(&self) -> Result<()> {
        validate_urls("servers_urls.wms", &self.servers_urls.wms)?;
        validate_urls("servers_urls.wcs", &self.servers_urls.wcs)?;

        if let Some(http) = &self.http {
            if let Some(timeout) = http.timeout_seconds {
                validate_positive_number("http.timeout_seconds", timeout, 1)?;
            }
            if let Some(user_agent) = &http.user_agent {
                validate_non_empty_string("http.user_agent", user_agent)?;
            }
        }

        if self.servers_urls.wms.is_empty() && self.servers_urls.wcs.is_empty() {
            tracing::warn!("⚠️ No WMS or WCS servers configured");
        }

        Ok(())
    }

    pub fn server_count(&self) -> usize {
        self.servers_urls.wms.len() + self.servers_urls.wcs.len()
    }
}

impl ConfigProvider for ServersConfig {
    fn wms_server_urls(&self) -> &[String] {
        &self.servers_urls.wms
    }

    fn wcs_server_urls(&self) -> &[String] {
        &self.servers_urls.wcs
    }

    fn request_timeout(&self) -> Option<Duration> {
        self.http
            .as_ref()
            .and_then(|http| http.timeout_seconds)
            .map(Duration::from_secs)
    }

    fn user_agent(&self) -> Option<&str> {
        self.http.as_ref().and_then(|http| http.user_agent.as_deref())
    }
}

impl Validate for ServersConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
