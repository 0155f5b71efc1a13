//! CLI runner - executes commands

use crate::auth::StaticToken;
use crate::cli::commands::{Cli, Commands, OutputFormat};
use crate::client::Client;
use crate::config::ClientConfig;
use crate::error::{Error, Result};
use crate::types::{JsonValue, NextLinkPolicy};
use std::io::Write;
use std::time::Instant;
use tracing::{error, info};

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        match &self.cli.command {
            Commands::Get { path } => self.get(path).await,
            Commands::List { path, .. } => self.list(path).await,
        }
    }

    /// Build the client configuration from the config file and flags
    pub fn client_config(&self) -> Result<ClientConfig> {
        let mut config = match &self.cli.config {
            Some(path) => ClientConfig::from_file(path).inspect_err(|e| {
                error!(path = %path.display(), error = %e, "Failed to load client config");
            })?,
            None => ClientConfig::default(),
        };

        if let Some(host) = &self.cli.host {
            config.host.clone_from(host);
        }
        if let Some(version) = &self.cli.api_version {
            config.version.clone_from(version);
        }
        if let Commands::List {
            max_pages,
            any_host,
            ..
        } = &self.cli.command
        {
            if let Some(max_pages) = max_pages {
                config.limits.max_pages = Some(*max_pages);
            }
            if *any_host {
                config.limits.next_link_policy = NextLinkPolicy::Any;
            }
        }

        config.validate()?;
        Ok(config)
    }

    fn client(&self) -> Result<Client> {
        let token = self
            .cli
            .token
            .as_deref()
            .ok_or_else(|| Error::auth("No token provided (use --token or GRAPH_CLIENT_TOKEN)"))?;
        Client::with_config(self.client_config()?, StaticToken::new(token))
    }

    async fn get(&self, path: &str) -> Result<()> {
        let client = self.client()?;
        let entity: JsonValue = client.get(path).await?;
        self.emit(&entity)
    }

    async fn list(&self, path: &str) -> Result<()> {
        let client = self.client()?;
        let started = Instant::now();
        let mut count = 0u64;

        // Elements are written as they arrive so output streams page by page
        let result = client
            .try_get_all(path, |item: JsonValue| {
                self.emit(&item)?;
                count += 1;
                Ok(())
            })
            .await;

        info!(
            items = count,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "List complete"
        );
        result
    }

    fn emit(&self, value: &JsonValue) -> Result<()> {
        let line = match self.cli.format {
            OutputFormat::Json => serde_json::to_string(value)?,
            OutputFormat::Pretty => serde_json::to_string_pretty(value)?,
        };
        let mut stdout = std::io::stdout().lock();
        writeln!(stdout, "{line}")?;
        Ok(())
    }
}
