//! `toolchat` binary

mod cli;
mod commands;

use clap::Parser;

use cli::{Cli, Command};
use commands::{CliResult, Session};

async fn run(cli: Cli) -> CliResult<()> {
    let session = Session::open(&cli).await?;
    match &cli.command {
        Command::Ask { message } => session.ask(&Cli::message(message)).await,
        Command::Chat => session.chat().await,
        Command::Servers { action } => session.servers(action).await,
        Command::Ping { url } => session.ping(url).await,
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    if let Err(e) = run(cli).await {
        eprintln!("toolchat: {}", e);
        std::process::exit(1);
    }
}
