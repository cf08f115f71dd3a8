use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use url::Url;

use crate::infrastructure::error::ReviewBoardError;

/// 凭据存储，按凭据 ID 和服务器地址解析出 API token
pub trait CredentialStore: Send + Sync {
    fn resolve(&self, credential_id: &str, scope_url: &str) -> Option<String>;
}

/// 单条凭据
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialEntry {
    pub id: String,
    pub secret: String,
    /// 只对该服务器地址生效，为空时适用于所有服务器
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
}

impl CredentialEntry {
    fn matches(&self, credential_id: &str, scope_url: &str) -> bool {
        if self.id != credential_id {
            return false;
        }

        match &self.scope {
            None => true,
            Some(scope) => match (Url::parse(scope), Url::parse(scope_url)) {
                (Ok(scope), Ok(target)) => scope == target,
                _ => false,
            },
        }
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct CredentialsFile {
    #[serde(default)]
    credentials: Vec<CredentialEntry>,
}

/// 从 TOML 文件加载的凭据存储
#[derive(Debug, Clone)]
pub struct FileCredentialStore {
    path: PathBuf,
    entries: Vec<CredentialEntry>,
}

impl FileCredentialStore {
    /// 加载凭据文件，文件不存在时得到空存储
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ReviewBoardError> {
        let path = path.as_ref().to_path_buf();

        let entries = if path.exists() {
            let content = std::fs::read_to_string(&path).map_err(|e| credentials_error(&path, e))?;
            toml::from_str::<CredentialsFile>(&content)
                .map_err(|e| credentials_error(&path, e))?
                .credentials
        } else {
            tracing::debug!(path = %path.display(), "credentials file not found, using empty store");
            Vec::new()
        };

        Ok(Self { path, entries })
    }

    /// 加载失败时记录警告并退回空存储
    ///
    /// 之后的请求会带着 `UNKNOWN` token 发出，由服务器拒绝。
    pub fn load_or_empty(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Self::load(path) {
            Ok(store) => store,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "ignoring unreadable credentials file");
                Self {
                    path: path.to_path_buf(),
                    entries: Vec::new(),
                }
            }
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl CredentialStore for FileCredentialStore {
    fn resolve(&self, credential_id: &str, scope_url: &str) -> Option<String> {
        self.entries
            .iter()
            .find(|entry| entry.matches(credential_id, scope_url))
            .map(|entry| entry.secret.clone())
    }
}

fn credentials_error(path: &Path, error: impl std::fmt::Display) -> ReviewBoardError {
    ReviewBoardError::CredentialsUnavailable {
        message: format!("{}: {}", path.display(), error),
    }
}

/// 内存中的凭据存储，不区分服务器地址
#[derive(Debug, Clone, Default)]
pub struct StaticCredentialStore {
    secrets: HashMap<String, String>,
}

impl StaticCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_secret(mut self, credential_id: impl Into<String>, secret: impl Into<String>) -> Self {
        self.secrets.insert(credential_id.into(), secret.into());
        self
    }
}

impl CredentialStore for StaticCredentialStore {
    fn resolve(&self, credential_id: &str, _scope_url: &str) -> Option<String> {
        self.secrets.get(credential_id).cloned()
    }
}
