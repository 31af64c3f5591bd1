//! Command-line definition

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Chat with an LLM that can call out to local tool servers
#[derive(Parser, Debug)]
#[command(name = "toolchat")]
#[command(version, about = "Chat with an LLM that routes questions to tool servers")]
pub struct Cli {
    /// Directory holding config.yaml and servers.json
    #[arg(long = "config-dir", global = true, env = "TOOLCHAT_CONFIG_DIR")]
    pub config_dir: Option<PathBuf>,

    /// Preferred LLM provider (gemini, anthropic, mock)
    #[arg(long, global = true, env = "TOOLCHAT_PROVIDER")]
    pub provider: Option<String>,

    /// Show info and debug logs
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Answer a single message
    Ask {
        /// The message, words are joined with spaces
        #[arg(required = true, num_args = 1..)]
        message: Vec<String>,
    },

    /// Read messages from stdin, one per line
    Chat,

    /// Manage tool servers
    Servers {
        #[command(subcommand)]
        action: ServersAction,
    },

    /// Check whether a tool server answers
    Ping {
        /// Base URL, scheme optional
        url: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum ServersAction {
    /// Show every server and the configured providers
    List,
    /// Print the custom servers as JSON
    Export,
    /// Print an example server list
    Sample,
    /// Replace the custom servers with the list in FILE and save it
    Import {
        file: PathBuf,
    },
}

impl Cli {
    pub fn message(words: &[String]) -> String {
        words.join(" ")
    }
}
