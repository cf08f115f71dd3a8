use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde::{Deserialize, Serialize};

use crate::infrastructure::error::ReviewBoardError;
use crate::server::configuration::ServerConfiguration;

/// 服务器配置列表的持久化
pub trait ConfigurationStore: Send + Sync {
    /// 读取已保存的配置，从未保存过时返回 `None`
    fn load(&self) -> Result<Option<Vec<ServerConfiguration>>, ReviewBoardError>;
    fn save(&self, configurations: &[ServerConfiguration]) -> Result<(), ReviewBoardError>;
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct ServersFile {
    #[serde(default)]
    servers: Vec<ServerConfiguration>,
}

/// 以 TOML 文件保存服务器配置
#[derive(Debug, Clone)]
pub struct TomlConfigurationStore {
    path: PathBuf,
}

impl TomlConfigurationStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ConfigurationStore for TomlConfigurationStore {
    fn load(&self) -> Result<Option<Vec<ServerConfiguration>>, ReviewBoardError> {
        if !self.path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(&self.path)?;
        let file: ServersFile = toml::from_str(&content)?;
        Ok(Some(file.servers))
    }

    fn save(&self, configurations: &[ServerConfiguration]) -> Result<(), ReviewBoardError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let file = ServersFile {
            servers: configurations.to_vec(),
        };
        let content = toml::to_string_pretty(&file)?;

        // 先写临时文件再改名，避免留下写了一半的配置
        let tmp_path = self.path.with_extension("toml.tmp");
        std::fs::write(&tmp_path, content)?;
        std::fs::rename(&tmp_path, &self.path)?;

        tracing::debug!(path = %self.path.display(), count = configurations.len(), "saved server configurations");
        Ok(())
    }
}

/// 内存存储，用于测试和不需要落盘的场景
#[derive(Debug, Default)]
pub struct MemoryConfigurationStore {
    saved: Mutex<Option<Vec<ServerConfiguration>>>,
}

impl MemoryConfigurationStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_configurations(configurations: Vec<ServerConfiguration>) -> Self {
        Self {
            saved: Mutex::new(Some(configurations)),
        }
    }

    pub fn saved(&self) -> Option<Vec<ServerConfiguration>> {
        self.saved.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

impl ConfigurationStore for MemoryConfigurationStore {
    fn load(&self) -> Result<Option<Vec<ServerConfiguration>>, ReviewBoardError> {
        Ok(self.saved())
    }

    fn save(&self, configurations: &[ServerConfiguration]) -> Result<(), ReviewBoardError> {
        *self.saved.lock().unwrap_or_else(|e| e.into_inner()) = Some(configurations.to_vec());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_toml_store_missing_file() {
        let dir = TempDir::new().unwrap();
        let store = TomlConfigurationStore::new(dir.path().join("servers.toml"));
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn test_toml_store_save_and_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("servers.toml");
        let store = TomlConfigurationStore::new(&path);

        let configurations = vec![
            ServerConfiguration::new("http://localhost", "api_token"),
            ServerConfiguration::new("https://rb.example.com", "rb"),
        ];
        store.save(&configurations).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("serverURL = \"http://localhost\""));
        assert!(content.contains("credentialId = \"rb\""));

        assert_eq!(store.load().unwrap(), Some(configurations));
    }

    #[test]
    fn test_toml_store_empty_list() {
        let dir = TempDir::new().unwrap();
        let store = TomlConfigurationStore::new(dir.path().join("servers.toml"));
        store.save(&[]).unwrap();
        assert_eq!(store.load().unwrap(), Some(vec![]));
    }

    #[test]
    fn test_memory_store() {
        let store = MemoryConfigurationStore::new();
        assert!(store.load().unwrap().is_none());

        store.save(&[ServerConfiguration::new("http://localhost", "rb")]).unwrap();
        assert_eq!(store.saved().unwrap().len(), 1);
    }
}
