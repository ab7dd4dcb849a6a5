use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use log::info;

use crate::buildkite::{BuildkiteClient, DEFAULT_BASE_URL};
use crate::config::Config;
use crate::output::{self, ReportOptions};

#[derive(Parser)]
#[command(name = "bkwatch")]
#[command(author, version, about = "Buildkite build and agent status viewer", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// List scheduled, running and canceling builds
    Builds {
        /// Print build summaries only, without per-job lines
        #[arg(long, conflicts_with = "only_pending")]
        no_jobs: bool,

        /// Print only jobs still waiting to be scheduled
        #[arg(long)]
        only_pending: bool,
    },
    /// Cancel a running build
    Cancel,
    /// Show detailed agent status
    Agents,
    /// Print the resolved configuration as a reusable template
    Config,
}

/// What a command invocation produced. Stubbed commands report themselves
/// explicitly instead of silently doing nothing.
#[derive(Debug, PartialEq, Eq)]
pub enum CommandOutcome {
    Completed,
    NotImplemented(&'static str),
}

fn cancel_build() -> CommandOutcome {
    CommandOutcome::NotImplemented("build cancellation")
}

fn agent_details() -> CommandOutcome {
    CommandOutcome::NotImplemented("agent status listing")
}

impl Cli {
    async fn execute_builds(&self, config: &Config, options: ReportOptions) -> Result<()> {
        info!("Listing active builds for organization: {}", config.org);

        let client = BuildkiteClient::new(DEFAULT_BASE_URL, config.org.clone(), &config.token)?;
        output::report_builds(&client, options).await?;

        Ok(())
    }

    pub async fn execute(&self) -> Result<()> {
        let config = Config::load()?;

        let outcome = match &self.command {
            None => {
                Self::command().print_help()?;
                CommandOutcome::Completed
            }
            Some(Commands::Builds {
                no_jobs,
                only_pending,
            }) => {
                let options = ReportOptions {
                    show_jobs: !*no_jobs,
                    scheduled_only: *only_pending,
                };
                self.execute_builds(&config, options).await?;
                CommandOutcome::Completed
            }
            Some(Commands::Cancel) => cancel_build(),
            Some(Commands::Agents) => agent_details(),
            Some(Commands::Config) => {
                print!("{}", config.render_template());
                CommandOutcome::Completed
            }
        };

        if let CommandOutcome::NotImplemented(feature) = outcome {
            println!("{feature} is not implemented yet");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cancel_is_explicitly_unimplemented() {
        assert_eq!(
            cancel_build(),
            CommandOutcome::NotImplemented("build cancellation")
        );
    }

    #[test]
    fn test_agent_listing_is_explicitly_unimplemented() {
        assert_eq!(
            agent_details(),
            CommandOutcome::NotImplemented("agent status listing")
        );
    }

    #[test]
    fn test_builds_flags_are_mutually_exclusive() {
        let result = Cli::try_parse_from(["bkwatch", "builds", "--no-jobs", "--only-pending"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_builds_defaults_show_all_jobs() {
        let cli = Cli::try_parse_from(["bkwatch", "builds"]).unwrap();
        match cli.command {
            Some(Commands::Builds {
                no_jobs,
                only_pending,
            }) => {
                assert!(!no_jobs);
                assert!(!only_pending);
            }
            _ => panic!("expected builds command"),
        }
    }
}
