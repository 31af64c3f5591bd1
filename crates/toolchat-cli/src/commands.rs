//! Command handlers

use std::path::Path;
use std::sync::Arc;

use thiserror::Error;
use tokio::io::{AsyncBufReadExt, BufReader};

use toolchat_core::config::{apply_servers_to_registry, persist_custom_servers};
use toolchat_core::logging::{file_logger, FileLogger, LogLevel};
use toolchat_core::providers::available_providers;
use toolchat_core::{
    select_provider, ClientSettings, ConfigError, ConfigProvider, ConsoleLogger, EnvSecretStore,
    FileConfigProvider, HttpToolClient, LlmProvider, Logger, OrchestratorReply, RegistryError,
    ServerRegistry, ToolClient, ToolClientError, ToolOrchestrator,
};

use crate::cli::{Cli, ServersAction};

#[derive(Error, Debug)]
pub enum CliError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Invalid server list: {0}")]
    Registry(#[from] RegistryError),

    #[error("Tool client error: {0}")]
    ToolClient(#[from] ToolClientError),

    #[error("Could not read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type CliResult<T> = Result<T, CliError>;

/// Console logger, or the debug file when `TOOLCHAT_DEBUG` is set
fn session_logger(verbose: bool, file_log: bool) -> Arc<dyn Logger> {
    if file_log {
        return Arc::new(FileLogger::new("toolchat"));
    }
    let min_level = if verbose { LogLevel::Debug } else { LogLevel::Warn };
    Arc::new(ConsoleLogger::new().with_min_level(min_level))
}

/// Log line for replies that carry a notice instead of tool output
fn fallback_warning(reply: &OrchestratorReply) -> Option<String> {
    reply
        .fallback_reason()
        .filter(|reason| reason.has_notice())
        .map(|reason| format!("[toolchat] Answered without tools: {:?}", reason))
}

/// Everything a command needs, wired from the config directory
pub struct Session {
    config: FileConfigProvider,
    settings: ClientSettings,
    registry: Arc<ServerRegistry>,
    tools: Arc<HttpToolClient>,
    logger: Arc<dyn Logger>,
}

impl Session {
    pub async fn open(cli: &Cli) -> CliResult<Self> {
        let file_log = file_logger::is_enabled();
        let logger = session_logger(cli.verbose, file_log);
        if file_log && cli.verbose {
            eprintln!("Logging to {}", file_logger::log_file_path().display());
        }

        let config = match &cli.config_dir {
            Some(dir) => FileConfigProvider::new(dir.clone()),
            None => FileConfigProvider::user(),
        };

        let mut settings = config.load_settings().await?;
        if let Some(provider) = &cli.provider {
            settings = settings.with_provider(provider.clone());
        }

        let registry = Arc::new(ServerRegistry::new(logger.clone()));
        match apply_servers_to_registry(&config, &registry).await {
            Ok(applied) => logger.debug(&format!("[toolchat] Loaded {} custom server(s)", applied)),
            Err(e) => logger.warn(&format!(
                "[toolchat] Ignoring {}: {}; using built-in servers only",
                config.servers_path().display(),
                e
            )),
        }

        let tools = Arc::new(HttpToolClient::new(&settings, logger.clone())?);

        Ok(Self {
            config,
            settings,
            registry,
            tools,
            logger,
        })
    }

    fn orchestrator(&self) -> ToolOrchestrator {
        ToolOrchestrator::new(self.registry.clone(), self.tools.clone(), self.logger.clone())
    }

    pub async fn ask(&self, message: &str) -> CliResult<()> {
        let provider = select_provider(&EnvSecretStore::new(), &self.settings, self.logger.clone());
        let reply = self.orchestrator().respond_detailed(message, provider.as_ref()).await;
        self.report(&reply);
        println!("{}", reply.text);
        Ok(())
    }

    /// Line-oriented chat; the provider lives for the whole session so
    /// providers that keep history see every turn
    pub async fn chat(&self) -> CliResult<()> {
        let provider = select_provider(&EnvSecretStore::new(), &self.settings, self.logger.clone());
        let orchestrator = self.orchestrator();

        println!("toolchat ({}). Type 'exit' to quit.", provider.name());
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        while let Some(line) = lines.next_line().await? {
            let message = line.trim();
            if message.is_empty() {
                continue;
            }
            if matches!(message, "exit" | "quit") {
                break;
            }
            let reply = orchestrator.respond_detailed(message, provider.as_ref()).await;
            self.report(&reply);
            println!("{}\n", reply.text);
        }
        Ok(())
    }

    fn report(&self, reply: &OrchestratorReply) {
        if let Some(warning) = fallback_warning(reply) {
            self.logger.warn(&warning);
        }
    }

    pub async fn servers(&self, action: &ServersAction) -> CliResult<()> {
        match action {
            ServersAction::List => {
                print!("{}", self.status_summary());
                Ok(())
            }
            ServersAction::Export => {
                println!("{}", self.registry.export_custom()?);
                Ok(())
            }
            ServersAction::Sample => {
                println!("{}", ServerRegistry::sample_config());
                Ok(())
            }
            ServersAction::Import { file } => self.import(file).await,
        }
    }

    async fn import(&self, file: &Path) -> CliResult<()> {
        let json = std::fs::read_to_string(file).map_err(|source| CliError::Read {
            path: file.display().to_string(),
            source,
        })?;

        let imported = self.registry.import_all(&json)?;
        if let Some(backup) = self.config.backup()? {
            println!("Previous list saved to {}", backup.display());
        }
        persist_custom_servers(&self.config, &self.registry).await?;
        println!(
            "Imported {} server(s) into {}",
            imported,
            self.config.servers_path().display()
        );
        Ok(())
    }

    pub async fn ping(&self, url: &str) -> CliResult<()> {
        if self.tools.ping(url).await {
            println!("✅ {} is reachable", url);
        } else {
            println!("❌ {} did not answer", url);
        }
        Ok(())
    }

    /// Enabled services and configured providers, as shown by `servers list`
    pub fn status_summary(&self) -> String {
        let mut out = String::from("Tool servers:\n");
        for server in self.registry.list_all() {
            let mark = if server.enabled { "✅" } else { "⏸️" };
            out.push_str(&format!(
                "  {} {} ({}) {}\n",
                mark, server.name, server.id, server.base_url
            ));
            if !server.description.is_empty() {
                out.push_str(&format!("      {}\n", server.description));
            }
        }

        let enabled = self.registry.list_enabled().len();
        out.push_str(&format!("{} of {} server(s) enabled\n", enabled, self.registry.list_all().len()));

        let providers = available_providers(&EnvSecretStore::new());
        if providers.is_empty() {
            out.push_str("No LLM provider key found (set GEMINI_API_KEY or ANTHROPIC_API_KEY)\n");
        } else {
            let names: Vec<&str> = providers.iter().map(|kind| kind.display_name()).collect();
            out.push_str(&format!("LLM providers: {}\n", names.join(", ")));
        }
        out
    }
}
