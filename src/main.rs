use std::process::ExitCode;

use clap::Parser;
use tracing::error;

use jira_deploy::cli::Args;
use jira_deploy::config::Config;
use jira_deploy::github::GitHubClient;
use jira_deploy::jira::JiraClient;
use jira_deploy::ui::{ActionsReporter, Reporter};
use jira_deploy::{app, logging, Error};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let args = Args::parse();
    logging::init(args.log_format);

    let reporter = ActionsReporter;

    let config = match Config::from_args(&args) {
        Ok(config) => config,
        Err(err) => {
            error!(error = %err, "Invalid configuration");
            reporter.failure(&err.to_string());
            return ExitCode::FAILURE;
        }
    };

    let github = match GitHubClient::new(&config.github_api_url, &config.github_token) {
        Ok(client) => client,
        Err(err) => {
            let err = Error::Client(err);
            error!(error = %err, "Could not build the GitHub client");
            reporter.failure(&err.to_string());
            return ExitCode::FAILURE;
        }
    };
    let jira = JiraClient::new(config.jira.clone());

    match app::execute(&config, &github, &jira, &reporter).await {
        Ok(_) => ExitCode::SUCCESS,
        Err(_) => ExitCode::FAILURE,
    }
}
