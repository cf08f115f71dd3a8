use std::collections::HashMap;
use std::path::PathBuf;

use crate::credentials::CredentialStore;
use crate::infrastructure::error::ReviewBoardError;
use crate::notification::client::{StatusUpdate, StatusUpdateSender};
use crate::review::parameters::BuildParameters;
use crate::review::request::{ReviewRequest, StatusUpdateState, SETUP_PARAMETERS_MISSING};
use crate::server::configuration::ServerConfiguration;
use crate::server::registry::ServerRegistry;
use crate::steps::listener::BuildListener;
use crate::steps::process::{mask_command, ProcessExecutor};
use crate::steps::INVALID_SERVER_URL_MESSAGE;

pub const BUILD_RUNNING: &str = "build running";
pub const SEE_BUILD: &str = "See build";

/// 补丁命令中 API token 所在的参数下标
const API_TOKEN_INDEX: usize = 3;

/// 一条待执行的命令及其掩码
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedCommand {
    pub args: Vec<String>,
    pub masks: Vec<bool>,
}

impl PlannedCommand {
    fn plain(args: &[&str]) -> Self {
        Self {
            args: args.iter().map(|a| a.to_string()).collect(),
            masks: vec![false; args.len()],
        }
    }

    pub fn display(&self) -> String {
        mask_command(&self.args, &self.masks)
    }
}

/// 预构建步骤运行所需的宿主环境
pub struct SetupContext<'a> {
    pub parameters: &'a BuildParameters,
    pub registry: &'a ServerRegistry,
    pub credentials: &'a dyn CredentialStore,
    pub executor: &'a dyn ProcessExecutor,
    pub sender: &'a dyn StatusUpdateSender,
    pub listener: &'a dyn BuildListener,
    pub workspace: PathBuf,
    pub env: HashMap<String, String>,
    pub build_url: Option<String>,
}

/// 安装 rbtools 并应用审查请求中的补丁，成功后把状态标记为 pending
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReviewBoardSetup {
    pub download_only: bool,
    pub install_rbtools: bool,
}

impl Default for ReviewBoardSetup {
    fn default() -> Self {
        Self {
            download_only: false,
            install_rbtools: true,
        }
    }
}

impl ReviewBoardSetup {
    pub fn new(download_only: bool, install_rbtools: bool) -> Self {
        Self {
            download_only,
            install_rbtools,
        }
    }

    /// 返回 `Err` 表示本次构建应当失败，pending 通知失败只记录不返回错误
    pub async fn perform(&self, ctx: SetupContext<'_>) -> Result<(), ReviewBoardError> {
        let listener = ctx.listener;

        let request = match ctx.parameters.parse_review_request() {
            Ok(request) => request,
            Err(e @ ReviewBoardError::InvalidServerUrl { .. }) => {
                listener.error(INVALID_SERVER_URL_MESSAGE);
                return Err(e);
            }
            Err(e) => {
                listener.error(&e.to_string());
                return Err(e);
            }
        };

        let server = match self.resolve_server(&request, ctx.registry) {
            Ok(server) => server,
            Err(e) => {
                listener.error(&e.to_string());
                return Err(e);
            }
        };

        let token = server.api_token(ctx.credentials);
        for command in self.commands(&request, &server, &token)? {
            listener.info(&format!("$ {}", command.display()));

            let exit_code = ctx
                .executor
                .run(&command.args, &command.masks, &ctx.workspace, &ctx.env)
                .await
                .map_err(|e| {
                    listener.error(&e.to_string());
                    e
                })?;

            if exit_code != 0 {
                let e = ReviewBoardError::ExternalProcessFailed {
                    exit_code,
                    message: command.display(),
                };
                listener.error(&e.to_string());
                return Err(e);
            }
        }

        let mut update = StatusUpdate::new(StatusUpdateState::Pending, BUILD_RUNNING);
        if let Some(build_url) = &ctx.build_url {
            update = update.with_link(build_url.as_str(), SEE_BUILD);
        }

        if let Err(e) = ctx.sender.update_status_update(&request, &update).await {
            listener.error(&format!("Unable to notify Review Board of the build: {}", e));
        }

        Ok(())
    }

    fn resolve_server(
        &self,
        request: &ReviewRequest,
        registry: &ServerRegistry,
    ) -> Result<ServerConfiguration, ReviewBoardError> {
        if !request.is_complete_for_patch() {
            return Err(ReviewBoardError::incomplete(SETUP_PARAMETERS_MISSING));
        }

        let server_url = request
            .server_url()
            .ok_or_else(|| ReviewBoardError::incomplete(SETUP_PARAMETERS_MISSING))?;
        registry.resolve(server_url)
    }

    /// 生成要执行的命令列表
    pub fn commands(
        &self,
        request: &ReviewRequest,
        server: &ServerConfiguration,
        token: &str,
    ) -> Result<Vec<PlannedCommand>, ReviewBoardError> {
        let (Some(review_id), Some(revision)) = (request.review_id(), request.revision()) else {
            return Err(ReviewBoardError::incomplete(SETUP_PARAMETERS_MISSING));
        };

        let mut commands = Vec::new();
        if self.install_rbtools {
            commands.push(PlannedCommand::plain(&["pip", "install", "--user", "rbtools"]));
        }

        let mut args = vec![
            "rbt".to_string(),
            "patch".to_string(),
            "--api-token".to_string(),
            token.to_string(),
            "--server".to_string(),
            server.server_url().to_string(),
            "--diff-revision".to_string(),
            revision.to_string(),
        ];
        if self.download_only {
            args.push("--write".to_string());
            args.push("patch.diff".to_string());
        }
        args.push(review_id.to_string());

        let mut masks = vec![false; args.len()];
        masks[API_TOKEN_INDEX] = true;
        commands.push(PlannedCommand { args, masks });

        Ok(commands)
    }
}
