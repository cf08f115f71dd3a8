use std::env;
use std::path::PathBuf;

use crate::infrastructure::logging::parse_level;

#[derive(Debug, Clone)]
pub struct Config {
    pub servers_file: PathBuf,
    pub credentials_file: PathBuf,
    pub http_timeout_secs: Option<u64>,
    pub log_level: String,
    pub debug: bool,
}

impl Config {
    pub fn new() -> Self {
        let mut config = Self::defaults();

        // 加载配置文件
        #[cfg(not(test))]
        config.load_from_env_file();
        // 加载环境变量（覆盖配置文件）
        config.load_from_env();

        config
    }

    /// 默认配置，文件放在 ~/.rb-ci 下
    pub fn defaults() -> Self {
        let base = config_dir();
        Config {
            servers_file: base.join("servers.toml"),
            credentials_file: base.join("credentials.toml"),
            http_timeout_secs: None,
            log_level: "info".to_string(),
            debug: false,
        }
    }

    pub fn load_from_env_file(&mut self) {
        // 尝试从用户主目录加载
        let user_env_path = config_dir().join(".env");
        if user_env_path.exists() {
            dotenvy::from_path(user_env_path).ok();
        }

        // 尝试从当前目录加载
        dotenvy::dotenv().ok();
    }

    pub fn load_from_env(&mut self) {
        self.load_from_vars(|name| env::var(name).ok());
    }

    pub fn load_from_vars<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(path) = lookup("RB_CI_SERVERS_FILE") {
            self.servers_file = PathBuf::from(path);
        }
        if let Some(path) = lookup("RB_CI_CREDENTIALS_FILE") {
            self.credentials_file = PathBuf::from(path);
        }
        if let Some(timeout) = lookup("RB_CI_HTTP_TIMEOUT") {
            match timeout.trim().parse::<u64>() {
                Ok(seconds) => self.http_timeout_secs = Some(seconds),
                Err(_) => tracing::warn!(value = %timeout, "ignoring invalid RB_CI_HTTP_TIMEOUT"),
            }
        }
        if let Some(level) = lookup("RB_CI_LOG_LEVEL") {
            self.log_level = level;
        }
        if let Some(debug) = lookup("RB_CI_DEBUG") {
            self.debug = matches!(debug.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes");
        }
    }

    pub fn update_from_args(&mut self, args: &crate::cli::args::Args) {
        // 命令行参数优先级最高
        if let Some(path) = &args.servers_file {
            self.servers_file = path.clone();
        }
        if let Some(path) = &args.credentials_file {
            self.credentials_file = path.clone();
        }
        if let Some(timeout) = args.timeout {
            self.http_timeout_secs = Some(timeout);
        }
        if let Some(level) = &args.log_level {
            self.log_level = level.clone();
        }
        if args.debug {
            self.debug = true;
        }
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if parse_level(&self.log_level).is_none() {
            anyhow::bail!(
                "Unsupported log level '{}'. Expected one of: trace, debug, info, warn, error",
                self.log_level
            );
        }
        if self.http_timeout_secs == Some(0) {
            anyhow::bail!("HTTP timeout must be greater than zero seconds");
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

fn config_dir() -> PathBuf {
    env::var("HOME")
        .map(|home| PathBuf::from(home).join(".rb-ci"))
        .unwrap_or_else(|_| PathBuf::from(".rb-ci"))
}
