use std::sync::Arc;

use async_trait::async_trait;
use reqwest::StatusCode;

use crate::credentials::CredentialStore;
use crate::infrastructure::error::ReviewBoardError;
use crate::infrastructure::network::NetworkConfig;
use crate::review::request::{ReviewRequest, StatusUpdateState};
use crate::server::registry::ServerRegistry;

/// 一次状态更新请求的内容
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusUpdate {
    pub state: StatusUpdateState,
    pub description: String,
    pub link_url: Option<String>,
    pub link_text: Option<String>,
}

impl StatusUpdate {
    pub fn new(state: StatusUpdateState, description: impl Into<String>) -> Self {
        Self {
            state,
            description: description.into(),
            link_url: None,
            link_text: None,
        }
    }

    pub fn with_link(mut self, url: impl Into<String>, text: impl Into<String>) -> Self {
        self.link_url = Some(url.into());
        self.link_text = Some(text.into());
        self
    }

    /// 按 `application/x-www-form-urlencoded` 编码请求体
    pub fn form_body(&self) -> String {
        let mut fields = vec![
            ("state", self.state.as_str()),
            ("description", self.description.as_str()),
        ];
        if let Some(url) = &self.link_url {
            fields.push(("url", url.as_str()));
        }
        if let Some(text) = &self.link_text {
            fields.push(("url_text", text.as_str()));
        }

        fields
            .iter()
            .map(|(key, value)| format!("{}={}", key, urlencoding::encode(value)))
            .collect::<Vec<_>>()
            .join("&")
    }
}

/// 状态更新发送接口
#[async_trait]
pub trait StatusUpdateSender: Send + Sync {
    async fn update_status_update(
        &self,
        request: &ReviewRequest,
        update: &StatusUpdate,
    ) -> Result<(), ReviewBoardError>;
}

/// Review Board 状态更新客户端
///
/// 每次调用恰好发出一个 PUT 请求，不做重试。
pub struct StatusSyncClient {
    registry: Arc<ServerRegistry>,
    credentials: Arc<dyn CredentialStore>,
    client: Arc<reqwest::Client>,
}

impl StatusSyncClient {
    pub fn new(
        registry: Arc<ServerRegistry>,
        credentials: Arc<dyn CredentialStore>,
        network: &NetworkConfig,
    ) -> Result<Self, ReviewBoardError> {
        Ok(Self {
            registry,
            credentials,
            client: Arc::new(network.build_client()?),
        })
    }

    pub fn registry(&self) -> &ServerRegistry {
        &self.registry
    }

    /// 发送状态更新
    pub async fn send(
        &self,
        request: &ReviewRequest,
        state: StatusUpdateState,
        description: &str,
        link_url: Option<&str>,
        link_text: Option<&str>,
    ) -> Result<(), ReviewBoardError> {
        let mut update = StatusUpdate::new(state, description);
        update.link_url = link_url.map(str::to_string);
        update.link_text = link_text.map(str::to_string);
        self.update_status_update(request, &update).await
    }

    async fn put_status_update(
        &self,
        request: &ReviewRequest,
        update: &StatusUpdate,
    ) -> Result<(), ReviewBoardError> {
        let target = request.status_update_target()?;
        let server = self.registry.resolve(target.server_url)?;
        let token = server.api_token(self.credentials.as_ref());
        let url = server.status_update_url(target.review_id, target.status_update_id);

        tracing::debug!(
            review_id = target.review_id,
            status_update_id = target.status_update_id,
            state = %update.state,
            %url,
            "updating status update"
        );

        let response = self
            .client
            .put(&url)
            .header("Authorization", format!("token {}", token))
            .header("Content-Type", "application/x-www-form-urlencoded")
            .body(update.form_body())
            .send()
            .await
            .map_err(|e| ReviewBoardError::ServerUnreachable {
                url: url.clone(),
                message: e.to_string(),
            })?;

        interpret_status(response.status(), &url)
    }
}

/// 将响应状态码映射为结果
pub fn interpret_status(status: StatusCode, url: &str) -> Result<(), ReviewBoardError> {
    match status {
        StatusCode::OK => Ok(()),
        StatusCode::NOT_FOUND => Err(ReviewBoardError::ResourceNotFound { url: url.to_string() }),
        StatusCode::FORBIDDEN => Err(ReviewBoardError::Forbidden { url: url.to_string() }),
        StatusCode::UNAUTHORIZED => Err(ReviewBoardError::Unauthorized { url: url.to_string() }),
        other => Err(ReviewBoardError::UnexpectedResponse { code: other.as_u16() }),
    }
}

#[async_trait]
impl StatusUpdateSender for StatusSyncClient {
    async fn update_status_update(
        &self,
        request: &ReviewRequest,
        update: &StatusUpdate,
    ) -> Result<(), ReviewBoardError> {
        match self.put_status_update(request, update).await {
            Ok(()) => {
                tracing::info!(state = %update.state, "Review Board status update sent");
                Ok(())
            }
            Err(e) => {
                // 面向用户的报错由调用方通过构建监听器输出
                tracing::debug!(error = %e, state = %update.state, "Review Board status update failed");
                Err(e)
            }
        }
    }
}
