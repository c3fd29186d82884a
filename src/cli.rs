use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::{error, info};
use serde::Serialize;
use std::path::PathBuf;
use std::time::Duration;

use crate::auth::Token;
use crate::config::{Config, EnvOverrides};
use crate::output::{self, FetchProgress};
use crate::providers::concourse::ConcourseClient;
use crate::providers::ConcourseProvider;
use crate::summary::SummaryService;

#[derive(Parser)]
#[command(name = "concourse-summary")]
#[command(author, version, about = "Concourse pipeline health summary", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file (TOML, JSON or YAML)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Write JSON output to this file instead of stdout
    #[arg(short, long, global = true)]
    output: Option<PathBuf>,

    /// Emit JSON instead of tables
    #[arg(long, global = true, default_value_t = false)]
    json: bool,

    #[arg(short, long, global = true, default_value_t = false)]
    pretty: bool,

    /// Refresh every `refresh-interval` seconds until interrupted
    #[arg(short, long, global = true, default_value_t = false)]
    watch: bool,

    #[arg(long, env = "CONCOURSE_TOKEN", global = true, hide_env_values = true)]
    token: Option<String>,

    #[arg(long, env = "REFRESH_INTERVAL", global = true)]
    refresh_interval: Option<String>,

    /// JSON list of summary groups
    #[arg(long = "groups", env = "CS_GROUPS", global = true)]
    groups_json: Option<String>,

    /// JSON list of hosts
    #[arg(long = "hosts", env = "HOSTS", global = true)]
    hosts_json: Option<String>,

    #[arg(long, env = "SKIP_SSL_VALIDATION", global = true)]
    skip_ssl_validation: Option<String>,

    #[arg(long, env = "TEAM", global = true)]
    team: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// List configured hosts and groups
    Index,
    /// Summarise every pipeline of one host
    Host { host: String },
    /// Summarise the hosts of a configured group
    Group { group: String },
}

impl Cli {
    fn env_overrides(&self) -> EnvOverrides {
        EnvOverrides {
            refresh_interval: self.refresh_interval.clone(),
            groups_json: self.groups_json.clone(),
            hosts_json: self.hosts_json.clone(),
            skip_ssl_validation: self.skip_ssl_validation.clone(),
            team: self.team.clone(),
        }
    }

    fn build_service(&self, config: &Config) -> Result<SummaryService<ConcourseProvider>> {
        let token = self.token.as_deref().map(Token::from);
        let client = ConcourseClient::new(&config.protocol, config.skip_ssl_validation, token)
            .context("Failed to create HTTP client")?;

        Ok(SummaryService::new(
            ConcourseProvider::new(client),
            config.team.clone(),
            config.groups.clone(),
        ))
    }

    fn write_json<T: Serialize>(&self, value: &T) -> Result<()> {
        if let Some(output_path) = &self.output {
            let mut file = std::fs::File::create(output_path)
                .with_context(|| format!("Failed to create {}", output_path.display()))?;
            output::export_json(value, self.pretty, &mut file)?;
            info!("Summary written to: {}", output_path.display());
        } else {
            output::export_json(value, self.pretty, &mut std::io::stdout().lock())?;
        }
        Ok(())
    }

    fn refresh_label(&self, config: &Config) -> Option<u64> {
        self.watch.then_some(config.refresh_interval)
    }

    /// Sleeps until the next refresh; returns `false` when not watching.
    async fn wait_for_refresh(&self, config: &Config) -> bool {
        if !self.watch {
            return false;
        }
        tokio::time::sleep(Duration::from_secs(config.refresh_interval)).await;
        true
    }

    /// In watch mode a failed cycle is logged and the next one still runs.
    fn handle_cycle(&self, result: Result<()>) -> Result<()> {
        match result {
            Err(e) if self.watch => {
                error!("{e:#}");
                Ok(())
            }
            other => other,
        }
    }

    async fn show_host(
        &self,
        service: &SummaryService<ConcourseProvider>,
        config: &Config,
        host: &str,
    ) -> Result<()> {
        let progress = FetchProgress::start(host);
        let summary = match service.host_summary(host).await {
            Ok(summary) => {
                progress.finish(summary.records.len());
                summary
            }
            Err(e) => {
                progress.fail();
                return Err(e.into());
            }
        };

        if self.json {
            self.write_json(&summary)
        } else {
            output::print_host_summary(&summary, self.refresh_label(config));
            Ok(())
        }
    }

    async fn show_group(
        &self,
        service: &SummaryService<ConcourseProvider>,
        config: &Config,
        group: &str,
    ) -> Result<()> {
        let progress = FetchProgress::start(&format!("group {group}"));
        let summaries = match service.group_summary(group).await {
            Ok(summaries) => {
                progress.finish(summaries.iter().map(|s| s.records.len()).sum());
                summaries
            }
            Err(e) => {
                progress.fail();
                return Err(e.into());
            }
        };

        if self.json {
            self.write_json(&summaries)
        } else {
            output::print_group_summary(group, &summaries, self.refresh_label(config));
            Ok(())
        }
    }

    pub async fn execute(&self) -> Result<()> {
        let config = Config::load(self.config.as_deref())?.apply_overrides(&self.env_overrides())?;

        match &self.command {
            Commands::Index => {
                if self.json {
                    self.write_json(&config)
                } else {
                    output::print_index(&config);
                    Ok(())
                }
            }
            Commands::Host { host } => {
                info!("Summarising host: {host}");
                let service = self.build_service(&config)?;
                loop {
                    self.handle_cycle(self.show_host(&service, &config, host).await)?;
                    if !self.wait_for_refresh(&config).await {
                        return Ok(());
                    }
                }
            }
            Commands::Group { group } => {
                info!("Summarising group: {group}");
                let service = self.build_service(&config)?;
                loop {
                    self.handle_cycle(self.show_group(&service, &config, group).await)?;
                    if !self.wait_for_refresh(&config).await {
                        return Ok(());
                    }
                }
            }
        }
    }
}
