use std::collections::HashMap;
use std::path::PathBuf;

use crate::commands::AppContext;
use crate::review::parameters::BuildParameters;
use crate::steps::listener::ConsoleListener;
use crate::steps::process::CommandExecutor;
use crate::steps::setup::{ReviewBoardSetup, SetupContext};

#[derive(Debug, Clone)]
pub struct SetupOptions {
    pub download_only: bool,
    pub install_rbtools: bool,
    pub build_url: Option<String>,
    pub workspace: Option<PathBuf>,
}

/// 构建前准备，失败时返回非零退出码让构建失败
pub async fn handle_setup(
    context: &AppContext,
    parameters: &BuildParameters,
    options: SetupOptions,
) -> anyhow::Result<i32> {
    let env: HashMap<String, String> = std::env::vars().collect();

    let workspace = match options.workspace {
        Some(dir) => dir,
        None => match env.get("WORKSPACE") {
            Some(dir) => PathBuf::from(dir),
            None => std::env::current_dir()?,
        },
    };
    let build_url = options.build_url.or_else(|| env.get("BUILD_URL").cloned());

    let step = ReviewBoardSetup::new(options.download_only, options.install_rbtools);
    let ctx = SetupContext {
        parameters,
        registry: &context.registry,
        credentials: context.credentials.as_ref(),
        executor: &CommandExecutor,
        sender: &context.client,
        listener: &ConsoleListener,
        workspace,
        env,
        build_url,
    };

    match step.perform(ctx).await {
        Ok(()) => Ok(0),
        Err(e) => {
            tracing::debug!(error = %e, "setup step failed the build");
            Ok(1)
        }
    }
}
