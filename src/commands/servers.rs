use crate::cli::args::ServersAction;
use crate::commands::AppContext;
use crate::server::configuration::ServerConfiguration;

pub fn handle_servers(context: &AppContext, action: &ServersAction) -> anyhow::Result<i32> {
    match action {
        ServersAction::List { json } => {
            if *json {
                println!("{}", serde_json::to_string_pretty(&context.registry.get_all())?);
                return Ok(0);
            }

            if context.registry.check_servers_configured().is_err() {
                println!("No Review Board servers configured");
                return Ok(0);
            }

            println!("Configured Review Board servers:");
            for server in context.registry.get_all() {
                println!("  {} -> credential '{}'", server.server_url(), server.credential_id());
            }
            Ok(0)
        }
        ServersAction::Set { servers } => {
            let configurations = servers
                .iter()
                .map(|entry| entry.parse::<ServerConfiguration>())
                .collect::<Result<Vec<_>, _>>()?;

            let count = configurations.len();
            context.registry.replace_all(configurations)?;
            println!("✓ Saved {} Review Board server configuration(s)", count);
            Ok(0)
        }
    }
}
