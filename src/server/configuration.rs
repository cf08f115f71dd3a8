use serde::{Deserialize, Serialize};
use url::Url;

use crate::credentials::CredentialStore;
use crate::infrastructure::error::ReviewBoardError;
use crate::review::parameters::parse_server_url;

/// 找不到凭据时使用的占位 token
pub const UNKNOWN_API_TOKEN: &str = "UNKNOWN";

/// 单个 Review Board 服务器的配置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfiguration {
    #[serde(rename = "serverURL")]
    server_url: String,
    #[serde(rename = "credentialId")]
    credential_id: String,
}

impl ServerConfiguration {
    pub fn new(server_url: impl Into<String>, credential_id: impl Into<String>) -> Self {
        Self {
            server_url: server_url.into(),
            credential_id: credential_id.into(),
        }
    }

    pub fn server_url(&self) -> &str {
        &self.server_url
    }

    pub fn credential_id(&self) -> &str {
        &self.credential_id
    }

    /// 按 URI 等价比较，存储的地址无法解析时视为不匹配
    pub fn matches(&self, candidate: &Url) -> bool {
        match Url::parse(&self.server_url) {
            Ok(url) => &url == candidate,
            Err(e) => {
                tracing::warn!(
                    server_url = %self.server_url,
                    error = %e,
                    "skipping server configuration with malformed URL"
                );
                false
            }
        }
    }

    /// 解析 API token
    ///
    /// 找不到凭据时返回 `UNKNOWN`，请求照常发出并由服务器拒绝。
    pub fn api_token(&self, credentials: &dyn CredentialStore) -> String {
        match credentials.resolve(&self.credential_id, &self.server_url) {
            Some(token) => token,
            None => {
                tracing::warn!(
                    credential_id = %self.credential_id,
                    server_url = %self.server_url,
                    "no matching credential, sending placeholder token"
                );
                UNKNOWN_API_TOKEN.to_string()
            }
        }
    }

    /// 拼出状态更新资源的完整地址
    pub fn status_update_url(&self, review_id: i64, status_update_id: i64) -> String {
        format!(
            "{}/api/review-requests/{}/status-updates/{}/",
            self.server_url.trim_end_matches('/'),
            review_id,
            status_update_id
        )
    }
}

/// 校验配置表单中填写的服务器地址，只接受带主机名的 http/https URL
pub fn validate_server_url(value: &str) -> Result<(), ReviewBoardError> {
    let url = parse_server_url(value)?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(ReviewBoardError::invalid_server_url(format!(
            "unsupported scheme '{}'",
            url.scheme()
        )));
    }
    if url.host_str().map_or(true, str::is_empty) {
        return Err(ReviewBoardError::invalid_server_url("missing host"));
    }

    Ok(())
}

/// 解析 `URL=CREDENTIAL_ID` 形式的服务器配置
impl std::str::FromStr for ServerConfiguration {
    type Err = ReviewBoardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (url, credential_id) = s.rsplit_once('=').ok_or_else(|| {
            ReviewBoardError::invalid_argument(format!(
                "server configuration '{}' must be written as URL=CREDENTIAL_ID",
                s
            ))
        })?;

        if credential_id.trim().is_empty() {
            return Err(ReviewBoardError::invalid_argument(format!(
                "server configuration '{}' has an empty credential id",
                s
            )));
        }

        validate_server_url(url)?;
        Ok(ServerConfiguration::new(url, credential_id.trim()))
    }
}
