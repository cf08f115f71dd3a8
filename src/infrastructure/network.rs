use reqwest::{Client, ClientBuilder};
use std::time::Duration;
use crate::infrastructure::error::ReviewBoardError;

/// 网络客户端配置
///
/// 状态更新请求不做重试，默认也不设置超时，沿用底层传输的默认行为。
#[derive(Debug, Clone)]
pub struct NetworkConfig {
    pub timeout: Option<Duration>,
    pub connect_timeout: Option<Duration>,
    pub user_agent: String,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            timeout: None,
            connect_timeout: None,
            user_agent: format!("rb-ci/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl NetworkConfig {
    pub fn with_timeout_secs(mut self, seconds: Option<u64>) -> Self {
        self.timeout = seconds.map(Duration::from_secs);
        self
    }

    /// 根据配置构建 HTTP 客户端
    pub fn build_client(&self) -> Result<Client, ReviewBoardError> {
        let mut builder = ClientBuilder::new().user_agent(&self.user_agent);

        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }
        if let Some(connect_timeout) = self.connect_timeout {
            builder = builder.connect_timeout(connect_timeout);
        }

        builder.build().map_err(|e| {
            ReviewBoardError::invalid_argument(format!("Failed to create HTTP client: {}", e))
        })
    }
}
