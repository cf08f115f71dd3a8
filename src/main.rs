use clap::Parser;
use reviewboard_ci::cli::args::{Args, Command};
use reviewboard_ci::commands;
use reviewboard_ci::config::Config;
use reviewboard_ci::infrastructure::logging::{setup_logging, LoggingConfig};

async fn run(args: &Args) -> anyhow::Result<i32> {
    let mut config = Config::new();
    config.update_from_args(args);
    config.validate()?;

    setup_logging(
        LoggingConfig::default()
            .with_level_name(&config.log_level)
            .debug(config.debug),
    )?;

    if config.debug {
        tracing::debug!(?config, "loaded configuration");
    }

    commands::route_command(args, &config).await
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let exit_code = match run(&args).await {
        Ok(code) => code,
        // 构建后通知是尽力而为的，任何错误都不能让构建失败
        Err(e) if matches!(args.command, Command::Notify { .. }) => {
            eprintln!("ERROR: Unable to notify Review Board of the result of the build: {:#}", e);
            0
        }
        Err(e) => return Err(e),
    };

    if exit_code != 0 {
        std::process::exit(exit_code);
    }

    Ok(())
}
