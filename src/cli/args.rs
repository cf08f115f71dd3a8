use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "rb-ci",
    version,
    about = "Report CI build results to Review Board status updates",
    long_about = "rb-ci 在 CI 构建中与 Review Board 协作：构建前应用审查请求的补丁并把状态标记为 pending，构建后把构建结果回写到对应的状态更新。"
)]
pub struct Args {
    /// 服务器配置文件路径（默认 ~/.rb-ci/servers.toml）
    #[arg(long = "servers-file", value_name = "PATH", global = true)]
    pub servers_file: Option<PathBuf>,

    /// 凭据文件路径（默认 ~/.rb-ci/credentials.toml）
    #[arg(long = "credentials-file", value_name = "PATH", global = true)]
    pub credentials_file: Option<PathBuf>,

    /// HTTP 请求超时秒数，不指定时使用传输层默认值
    #[arg(long, value_name = "SECS", global = true)]
    pub timeout: Option<u64>,

    /// 日志级别 (trace, debug, info, warn, error)
    #[arg(long = "log-level", value_name = "LEVEL", global = true)]
    pub log_level: Option<String>,

    /// 调试模式
    #[arg(long, default_value_t = false, global = true)]
    pub debug: bool,

    #[command(flatten)]
    pub params: ParamArgs,

    #[command(subcommand)]
    pub command: Command,
}

/// 额外的构建参数，可重复，例如 -p REVIEWBOARD_REVIEW_ID=42
///
/// 子命令前后都可以给出，按出现顺序合并。
#[derive(clap::Args, Debug, Clone, Default)]
pub struct ParamArgs {
    #[arg(short = 'p', long = "param", value_name = "NAME=VALUE")]
    pub params: Vec<String>,
}

impl Args {
    /// 子命令之前的参数在前，之后的在后
    pub fn parameter_assignments(&self) -> Vec<&str> {
        let trailing: &[String] = match &self.command {
            Command::Notify { params, .. }
            | Command::Setup { params, .. }
            | Command::Update { params, .. } => params.params.as_slice(),
            Command::Servers { .. } => &[],
        };

        self.params
            .params
            .iter()
            .chain(trailing)
            .map(String::as_str)
            .collect()
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// 构建结束后回写构建结果（永远不会让构建失败）
    Notify {
        /// 构建结果: success, unstable, failure, not-built, aborted
        #[arg(short, long, value_name = "RESULT")]
        result: String,

        #[command(flatten)]
        params: ParamArgs,
    },

    /// 构建前安装 rbtools、应用补丁并把状态标记为 pending
    Setup {
        /// 只下载补丁到 patch.diff，不应用
        #[arg(long = "download-only", default_value_t = false)]
        download_only: bool,

        /// 跳过 pip install rbtools
        #[arg(long = "skip-install", default_value_t = false)]
        skip_install: bool,

        /// 构建页面地址，默认读取 $BUILD_URL
        #[arg(long = "build-url", value_name = "URL")]
        build_url: Option<String>,

        /// 工作目录，默认读取 $WORKSPACE，再退回当前目录
        #[arg(long, value_name = "DIR")]
        workspace: Option<PathBuf>,

        #[command(flatten)]
        params: ParamArgs,
    },

    /// 直接发送任意状态
    Update {
        /// pending, done-success, done-failure, error, timed-out
        #[arg(short, long, value_name = "STATE")]
        state: String,

        #[arg(short, long, value_name = "TEXT")]
        description: String,

        #[arg(long, value_name = "URL")]
        url: Option<String>,

        #[arg(long = "url-text", value_name = "TEXT")]
        url_text: Option<String>,

        #[command(flatten)]
        params: ParamArgs,
    },

    /// 管理 Review Board 服务器配置
    Servers {
        #[command(subcommand)]
        action: ServersAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum ServersAction {
    /// 列出当前配置
    List {
        /// 以 JSON 输出
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// 用给定列表整体替换配置，格式 URL=CREDENTIAL_ID
    Set {
        #[arg(value_name = "URL=CREDENTIAL_ID", required = true)]
        servers: Vec<String>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notify_args() {
        let args = Args::parse_from([
            "rb-ci",
            "-p",
            "REVIEWBOARD_REVIEW_ID=1",
            "notify",
            "--result",
            "success",
            "--param",
            "REVIEWBOARD_STATUS_UPDATE_ID=2",
        ]);

        assert_eq!(
            args.parameter_assignments(),
            vec!["REVIEWBOARD_REVIEW_ID=1", "REVIEWBOARD_STATUS_UPDATE_ID=2"]
        );
        match args.command {
            Command::Notify { result, .. } => assert_eq!(result, "success"),
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_setup_args() {
        let args = Args::parse_from([
            "rb-ci",
            "--servers-file",
            "/tmp/servers.toml",
            "setup",
            "--download-only",
            "--skip-install",
            "--build-url",
            "http://ci/job/1/",
        ]);

        assert_eq!(args.servers_file, Some(PathBuf::from("/tmp/servers.toml")));
        match args.command {
            Command::Setup {
                download_only,
                skip_install,
                build_url,
                workspace,
                ..
            } => {
                assert!(download_only);
                assert!(skip_install);
                assert_eq!(build_url.as_deref(), Some("http://ci/job/1/"));
                assert!(workspace.is_none());
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_params_keep_order_on_both_sides() {
        let args = Args::parse_from([
            "rb-ci",
            "-p",
            "REVIEWBOARD_REVIEW_ID=1",
            "-p",
            "REVIEWBOARD_SERVER=http://localhost",
            "update",
            "--state",
            "pending",
            "--description",
            "queued",
            "-p",
            "REVIEWBOARD_REVIEW_ID=7",
        ]);

        assert_eq!(
            args.parameter_assignments(),
            vec![
                "REVIEWBOARD_REVIEW_ID=1",
                "REVIEWBOARD_SERVER=http://localhost",
                "REVIEWBOARD_REVIEW_ID=7",
            ]
        );
    }

    #[test]
    fn test_servers_set_requires_values() {
        assert!(Args::try_parse_from(["rb-ci", "servers", "set"]).is_err());

        let args = Args::parse_from(["rb-ci", "servers", "list", "--json"]);
        assert!(matches!(
            args.command,
            Command::Servers {
                action: ServersAction::List { json: true }
            }
        ));

        let args = Args::parse_from(["rb-ci", "servers", "set", "http://localhost=rb"]);
        match args.command {
            Command::Servers {
                action: ServersAction::Set { servers },
            } => assert_eq!(servers, vec!["http://localhost=rb".to_string()]),
            other => panic!("unexpected command: {:?}", other),
        }
    }
}
