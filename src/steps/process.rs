use std::collections::HashMap;
use std::path::Path;
use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;

use crate::infrastructure::error::ReviewBoardError;

/// 掩码后显示的占位文本
pub const MASK: &str = "********";

/// 进程被信号终止或无法启动时使用的退出码
pub const UNKNOWN_EXIT_CODE: i32 = -1;

/// 外部进程执行接口
#[async_trait]
pub trait ProcessExecutor: Send + Sync {
    /// 运行命令并返回退出码
    ///
    /// `masks[i]` 为 true 的参数不能出现在任何输出中。
    async fn run(
        &self,
        command: &[String],
        masks: &[bool],
        cwd: &Path,
        env: &HashMap<String, String>,
    ) -> Result<i32, ReviewBoardError>;
}

/// 生成用于显示的命令行，敏感参数替换为掩码
pub fn mask_command(command: &[String], masks: &[bool]) -> String {
    command
        .iter()
        .enumerate()
        .map(|(i, arg)| {
            if masks.get(i).copied().unwrap_or(false) {
                MASK
            } else {
                arg.as_str()
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// 基于 tokio::process 的执行器，子进程输出直接继承到构建控制台
#[derive(Debug, Default, Clone, Copy)]
pub struct CommandExecutor;

#[async_trait]
impl ProcessExecutor for CommandExecutor {
    async fn run(
        &self,
        command: &[String],
        masks: &[bool],
        cwd: &Path,
        env: &HashMap<String, String>,
    ) -> Result<i32, ReviewBoardError> {
        let shown = mask_command(command, masks);
        let (program, args) = command.split_first().ok_or_else(|| {
            ReviewBoardError::invalid_argument("cannot run an empty command")
        })?;

        tracing::debug!(command = %shown, cwd = %cwd.display(), "launching process");

        let status = Command::new(program)
            .args(args)
            .current_dir(cwd)
            .envs(env)
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .await
            .map_err(|e| ReviewBoardError::ExternalProcessFailed {
                exit_code: UNKNOWN_EXIT_CODE,
                message: format!("failed to launch '{}': {}", shown, e),
            })?;

        Ok(status.code().unwrap_or(UNKNOWN_EXIT_CODE))
    }
}
