use crate::app;
use crate::config::Config;
use anyhow::{Context, Result};

mod args;

pub use args::{AskCliArgs, Cli, CliCommand, ServeCliArgs};

/// Apply command-line overrides on top of the loaded config.
pub fn apply_serve_args(config: &mut Config, args: &ServeCliArgs) {
    if let Some(host) = &args.host {
        config.server.host = host.clone();
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }
}

pub async fn handle_ask_command(args: AskCliArgs) -> Result<()> {
    let config = Config::load()?;
    let answer = app::ask_once(&config, &args.query()).await?;
    println!("{}", answer);
    Ok(())
}

pub fn handle_config_command() -> Result<()> {
    let path = Config::config_path()?;
    let config = Config::load()?;

    println!("Config file: {}", path.display());
    println!();
    let rendered =
        toml::to_string_pretty(&config.redacted()).context("Failed to render config")?;
    println!("{}", rendered);
    Ok(())
}
