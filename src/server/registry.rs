use std::sync::{Arc, Mutex, MutexGuard};

use url::Url;

use crate::infrastructure::error::ReviewBoardError;
use crate::server::configuration::ServerConfiguration;
use crate::server::store::ConfigurationStore;

/// 进程内共享的服务器配置表
///
/// 读写都在同一把互斥锁内完成，只在遍历或替换列表期间持有，
/// 不会跨越网络请求。
pub struct ServerRegistry {
    configurations: Mutex<Option<Vec<ServerConfiguration>>>,
    store: Arc<dyn ConfigurationStore>,
}

impl ServerRegistry {
    /// 创建尚未加载配置的注册表
    pub fn new(store: Arc<dyn ConfigurationStore>) -> Self {
        Self {
            configurations: Mutex::new(None),
            store,
        }
    }

    /// 从持久化存储加载配置，存储中没有内容时保持未加载状态
    pub fn load(store: Arc<dyn ConfigurationStore>) -> Result<Self, ReviewBoardError> {
        let loaded = store.load()?;
        if let Some(configurations) = &loaded {
            tracing::debug!(count = configurations.len(), "loaded server configurations");
        }

        Ok(Self {
            configurations: Mutex::new(loaded),
            store,
        })
    }

    /// 使用给定配置创建注册表，不写入存储
    pub fn with_configurations(
        store: Arc<dyn ConfigurationStore>,
        configurations: Vec<ServerConfiguration>,
    ) -> Self {
        Self {
            configurations: Mutex::new(Some(configurations)),
            store,
        }
    }

    fn guard(&self) -> MutexGuard<'_, Option<Vec<ServerConfiguration>>> {
        // 锁内只做整表替换或遍历，中毒后的数据依然完整
        self.configurations.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn is_loaded(&self) -> bool {
        self.guard().is_some()
    }

    /// 整表替换并持久化
    pub fn replace_all(&self, configurations: Vec<ServerConfiguration>) -> Result<(), ReviewBoardError> {
        let mut guard = self.guard();
        self.store.save(&configurations)?;
        tracing::info!(count = configurations.len(), "replaced server configurations");
        *guard = Some(configurations);
        Ok(())
    }

    /// 当前配置列表的快照
    pub fn get_all(&self) -> Vec<ServerConfiguration> {
        self.guard().clone().unwrap_or_default()
    }

    /// 按 URI 等价查找配置，返回第一个匹配项
    pub fn lookup(&self, server_url: &Url) -> Option<ServerConfiguration> {
        self.guard()
            .as_ref()
            .and_then(|configurations| configurations.iter().find(|c| c.matches(server_url)).cloned())
    }

    /// 查找配置并区分"从未加载"与"没有匹配项"
    pub fn resolve(&self, server_url: &Url) -> Result<ServerConfiguration, ReviewBoardError> {
        let guard = self.guard();
        let configurations = guard
            .as_ref()
            .ok_or(ReviewBoardError::NoServerConfigurationsLoaded)?;

        configurations
            .iter()
            .find(|c| c.matches(server_url))
            .cloned()
            .ok_or_else(|| ReviewBoardError::NoServerConfiguration {
                server_url: server_url.to_string(),
            })
    }

    /// 检查是否已经配置了至少一个服务器
    pub fn check_servers_configured(&self) -> Result<(), ReviewBoardError> {
        match self.guard().as_ref() {
            Some(configurations) if !configurations.is_empty() => Ok(()),
            _ => Err(ReviewBoardError::NoServerConfigurationsLoaded),
        }
    }
}
