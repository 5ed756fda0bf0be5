use chrono::Utc;
use tracing::{info, warn};

use crate::config::Config;
use crate::deployment::Deployment;
use crate::error::{ApiError, Error, Result};
use crate::github::SourceControl;
use crate::issues;
use crate::jira::DeploymentTracker;
use crate::ui::{self, Reporter};

/// Message of the annotated tag created for every deployment
pub const TAG_MESSAGE: &str = "Deployment to production";

pub const NO_ISSUE_KEYS_WARNING: &str = "There are no issue keys found. Aborting...";
pub const SUCCESS_HEADER: &str =
    "Successfully informed Jira about production deployment for issue-keys: ";

/// How a run that did not fail ended
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// Jira was informed and the tag now points at `commit`
    Deployed {
        issue_keys: Vec<String>,
        commit: String,
    },
    /// No commit since the tag mentions an issue; nothing was reported
    NoIssueKeys,
    /// Dry run; the deployment was built but neither sent nor tagged
    DryRun { deployment: Deployment },
}

/// Run the pipeline and report its outcome
pub async fn execute(
    config: &Config,
    scm: &dyn SourceControl,
    tracker: &dyn DeploymentTracker,
    reporter: &dyn Reporter,
) -> Result<Outcome> {
    let result = run(config, scm, tracker).await;
    report(&result, reporter);
    result
}

/// Fetch commits, extract issue keys, inform Jira, then tag the deployed head
///
/// Every stage only starts once the previous one finished. A failing stage
/// stops the run; whatever earlier stages did stays done.
pub async fn run(
    config: &Config,
    scm: &dyn SourceControl,
    tracker: &dyn DeploymentTracker,
) -> Result<Outcome> {
    let messages = fetch_commit_messages(config, scm)
        .await
        .map_err(Error::Retrieval)?;

    let issue_keys = issues::extract_issue_keys(&messages);
    if issue_keys.is_empty() {
        return Ok(Outcome::NoIssueKeys);
    }
    info!(count = issue_keys.len(), keys = ?issue_keys, "Found issue keys");

    let deployment = Deployment::for_run(config, issue_keys.clone(), Utc::now());

    if config.dry_run {
        info!("Dry run, skipping Jira and tagging");
        return Ok(Outcome::DryRun { deployment });
    }

    notify_jira(tracker, &deployment)
        .await
        .map_err(Error::Notification)?;

    let commit = create_tag_for_head(config, scm)
        .await
        .map_err(Error::Tagging)?;

    Ok(Outcome::Deployed { issue_keys, commit })
}

/// Commit messages between the release tag and the deployed branch
async fn fetch_commit_messages(
    config: &Config,
    scm: &dyn SourceControl,
) -> std::result::Result<Vec<String>, ApiError> {
    info!(
        repository = %config.repository.full_name,
        base = %config.tag_name,
        head = %config.branch,
        "Fetching commit messages"
    );

    let messages = scm
        .compare_commits(&config.repository.to_ref(), &config.tag_name, &config.branch)
        .await?;
    info!(count = messages.len(), "Fetched commit messages");

    Ok(messages)
}

async fn notify_jira(
    tracker: &dyn DeploymentTracker,
    deployment: &Deployment,
) -> std::result::Result<(), ApiError> {
    info!(
        sequence = deployment.deployment_sequence_number,
        environment = %deployment.environment.id,
        "Sending deployment info to Jira"
    );

    tracker.report_deployment(deployment).await?;
    info!("Jira accepted the deployment");

    Ok(())
}

/// Point the release tag at the head of the deployed branch, returning the commit SHA
async fn create_tag_for_head(
    config: &Config,
    scm: &dyn SourceControl,
) -> std::result::Result<String, ApiError> {
    if config.head_repository_differs() {
        warn!(
            head_repository = %config.head_repository,
            repository = %config.repository.full_name,
            "Tagged commit is resolved from a different repository than the one being tagged"
        );
    }

    let commit = scm
        .commit_sha(&config.head_repository, &config.branch)
        .await?;

    let repo = config.repository.to_ref();
    let tag_object = scm
        .create_tag(&repo, &config.tag_name, TAG_MESSAGE, &commit)
        .await?;
    scm.set_tag_ref(&repo, &config.tag_name, &tag_object).await?;

    info!(tag = %config.tag_name, %commit, "Tag moved");
    Ok(commit)
}

fn report(result: &Result<Outcome>, reporter: &dyn Reporter) {
    match result {
        Ok(Outcome::Deployed { issue_keys, commit }) => {
            reporter.line(SUCCESS_HEADER);
            reporter.line(&issue_keys.join("\n"));
            reporter.line(&ui::highlight("Tagged commit", commit));
        }
        Ok(Outcome::NoIssueKeys) => reporter.warning(NO_ISSUE_KEYS_WARNING),
        Ok(Outcome::DryRun { deployment }) => {
            reporter.line(&ui::highlight("Issue keys", &deployment.issue_keys.join(", ")));
            match serde_json::to_string_pretty(deployment) {
                Ok(payload) => reporter.line(&payload),
                Err(err) => warn!(error = %err, "Could not render deployment payload"),
            }
        }
        Err(err) => {
            warn!(error = %err, "Run failed");
            reporter.failure(&err.to_string());
        }
    }
}
