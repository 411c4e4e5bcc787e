use clap::{Args as ClapArgs, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "meetprep")]
#[command(about = "Meeting briefings from your calendar", long_about = None)]
pub struct Cli {
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<CliCommand>,
}

#[derive(Subcommand, Debug)]
pub enum CliCommand {
    /// Run the HTTP server (default)
    Serve(ServeCliArgs),
    /// Ask the calendar agent a question and print the answer
    Ask(AskCliArgs),
    /// Show the config file location and effective settings
    Config,
    /// Print version information
    Version,
}

#[derive(ClapArgs, Debug, Default)]
pub struct ServeCliArgs {
    /// Address to bind (overrides config)
    #[arg(long)]
    pub host: Option<String>,
    /// Port to listen on (overrides config)
    #[arg(short, long)]
    pub port: Option<u16>,
}

#[derive(ClapArgs, Debug)]
pub struct AskCliArgs {
    /// The question, e.g. "Who is my next meeting with?"
    #[arg(required = true, num_args = 1..)]
    pub query: Vec<String>,
}

impl AskCliArgs {
    pub fn query(&self) -> String {
        self.query.join(" ")
    }
}
