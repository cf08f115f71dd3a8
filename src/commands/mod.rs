pub mod notify;
pub mod servers;
pub mod setup;
pub mod update;

use std::sync::Arc;

use crate::cli::args::{Args, Command};
use crate::config::Config;
use crate::credentials::FileCredentialStore;
use crate::infrastructure::network::NetworkConfig;
use crate::notification::client::StatusSyncClient;
use crate::review::parameters::BuildParameters;
use crate::server::registry::ServerRegistry;
use crate::server::store::TomlConfigurationStore;

/// 命令运行时共享的组件
pub struct AppContext {
    pub registry: Arc<ServerRegistry>,
    pub credentials: Arc<FileCredentialStore>,
    pub client: StatusSyncClient,
}

impl AppContext {
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let store = Arc::new(TomlConfigurationStore::new(&config.servers_file));
        let registry = Arc::new(ServerRegistry::load(store)?);
        let credentials = Arc::new(FileCredentialStore::load_or_empty(&config.credentials_file));

        let network = NetworkConfig::default().with_timeout_secs(config.http_timeout_secs);
        let client = StatusSyncClient::new(registry.clone(), credentials.clone(), &network)?;

        Ok(Self {
            registry,
            credentials,
            client,
        })
    }
}

/// 环境变量中的构建参数在前，命令行 -p 参数在后，后出现的覆盖先出现的
pub fn collect_parameters(args: &Args) -> anyhow::Result<BuildParameters> {
    let mut parameters = BuildParameters::from_env();
    for assignment in args.parameter_assignments() {
        parameters.push_assignment(assignment)?;
    }
    Ok(parameters)
}

/// 命令路由器，返回进程退出码
pub async fn route_command(args: &Args, config: &Config) -> anyhow::Result<i32> {
    let context = AppContext::from_config(config)?;

    match &args.command {
        Command::Notify { result, .. } => {
            let parameters = collect_parameters(args)?;
            notify::handle_notify(&context, &parameters, result).await
        }
        Command::Setup {
            download_only,
            skip_install,
            build_url,
            workspace,
            ..
        } => {
            let parameters = collect_parameters(args)?;
            let options = setup::SetupOptions {
                download_only: *download_only,
                install_rbtools: !*skip_install,
                build_url: build_url.clone(),
                workspace: workspace.clone(),
            };
            setup::handle_setup(&context, &parameters, options).await
        }
        Command::Update {
            state,
            description,
            url,
            url_text,
            ..
        } => {
            let parameters = collect_parameters(args)?;
            let request = update::UpdateRequest {
                state: state.clone(),
                description: description.clone(),
                url: url.clone(),
                url_text: url_text.clone(),
            };
            update::handle_update(&context, &parameters, request).await
        }
        Command::Servers { action } => servers::handle_servers(&context, action),
    }
}
