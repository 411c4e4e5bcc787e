use anyhow::Result;
use clap::Parser;
use meetprep::{
    app,
    cli::{apply_serve_args, handle_ask_command, handle_config_command, Cli, CliCommand},
    config::Config,
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let log_level = if cli.verbose { "debug" } else { "info" };
    let env_filter = EnvFilter::try_new(log_level).unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let serve_args = match cli.command {
        Some(CliCommand::Version) => {
            println!("meetprep {}", env!("CARGO_PKG_VERSION"));
            return Ok(());
        }
        Some(CliCommand::Config) => {
            handle_config_command()?;
            return Ok(());
        }
        Some(CliCommand::Ask(args)) => {
            handle_ask_command(args).await?;
            return Ok(());
        }
        Some(CliCommand::Serve(args)) => args,
        None => Default::default(),
    };

    let mut config = Config::load()?;
    apply_serve_args(&mut config, &serve_args);
    app::run_service(config).await
}
