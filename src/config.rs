//! Run configuration for jira-deploy
//!
//! Everything the pipeline needs is gathered once into [`Config`] and handed
//! to each stage, so no stage reads the process environment on its own.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::Deserialize;

use crate::cli::Args;
use crate::error::{Error, Result};

/// A repository addressed as `owner/name`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryRef {
    pub owner: String,
    pub name: String,
}

impl RepositoryRef {
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for RepositoryRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

impl FromStr for RepositoryRef {
    type Err = Error;

    fn from_str(slug: &str) -> Result<Self> {
        match slug.trim().split_once('/') {
            Some((owner, name)) if !owner.is_empty() && !name.is_empty() && !name.contains('/') => {
                Ok(Self::new(owner, name))
            }
            _ => Err(Error::Config(format!(
                "Invalid repository '{}', expected owner/name",
                slug
            ))),
        }
    }
}

/// Identity of the repository that triggered the run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Repository {
    pub owner: String,
    pub name: String,
    /// `owner/name`
    pub full_name: String,
    /// Browser URL of the repository, used to link back to the CI run
    pub html_url: String,
}

impl Repository {
    /// Read the repository identity from a GitHub event payload file
    ///
    /// Some events (`schedule`, `workflow_dispatch` from another repository)
    /// carry no repository; those yield `None`.
    pub fn from_event_file<P: AsRef<Path>>(path: P) -> Result<Option<Self>> {
        let contents = std::fs::read_to_string(path)?;
        let payload: EventPayload = serde_json::from_str(&contents)?;

        Ok(payload.repository.map(|repository| Self {
            owner: repository.owner.login,
            name: repository.name,
            full_name: repository.full_name,
            html_url: repository.html_url,
        }))
    }

    /// Derive the repository identity from an `owner/name` slug
    pub fn from_slug(slug: &str, server_url: &str) -> Result<Self> {
        let repo: RepositoryRef = slug.parse()?;
        let full_name = repo.to_string();

        Ok(Self {
            html_url: format!("{}/{}", server_url.trim_end_matches('/'), full_name),
            owner: repo.owner,
            name: repo.name,
            full_name,
        })
    }

    pub fn to_ref(&self) -> RepositoryRef {
        RepositoryRef::new(&self.owner, &self.name)
    }
}

#[derive(Deserialize)]
struct EventPayload {
    repository: Option<PayloadRepository>,
}

#[derive(Deserialize)]
struct PayloadRepository {
    name: String,
    full_name: String,
    html_url: String,
    owner: PayloadOwner,
}

#[derive(Deserialize)]
struct PayloadOwner {
    login: String,
}

/// Jira OAuth and tenant resolution settings
#[derive(Debug, Clone, Default)]
pub struct JiraSettings {
    /// e.g. `https://acme.atlassian.net`
    pub cloud_instance_base_url: String,
    pub client_id: String,
    pub client_secret: String,
    /// Base URL of the Atlassian platform API (token exchange, deployment ingestion)
    pub api_url: String,
}

/// Metadata copied onto the deployment event
#[derive(Debug, Clone, Default)]
pub struct DeploymentSettings {
    pub display_name: String,
    pub description: String,
    pub label: String,
    pub environment_id: String,
    pub environment_display_name: String,
    pub environment_type: String,
}

/// The CI run being reported
#[derive(Debug, Clone, Default)]
pub struct CiRun {
    /// Unique, increasing run identifier; doubles as the deployment sequence number
    pub id: u64,
    pub number: String,
    pub workflow: String,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub tag_name: String,
    pub branch: String,
    pub repository: Repository,
    pub head_repository: RepositoryRef,
    pub github_token: String,
    pub github_api_url: String,
    pub jira: JiraSettings,
    pub deployment: DeploymentSettings,
    pub run: CiRun,
    pub dry_run: bool,
}

impl Config {
    /// Build the run configuration from parsed arguments
    ///
    /// The triggering repository comes from the event payload when it names
    /// one, otherwise from the `owner/name` slug.
    pub fn from_args(args: &Args) -> Result<Self> {
        if args.tag_name.trim().is_empty() {
            return Err(Error::Config("tag-name must not be empty".to_string()));
        }

        let from_event = match &args.event_path {
            Some(path) => Repository::from_event_file(path)?,
            None => None,
        };

        let repository = match (from_event, &args.repository) {
            (Some(repository), _) => repository,
            (None, Some(slug)) => Repository::from_slug(slug, &args.server_url)?,
            (None, None) => return Err(Error::EnvVar("GITHUB_REPOSITORY".to_string())),
        };

        let head_repository = match &args.head_repository {
            Some(slug) if !slug.trim().is_empty() => slug.parse()?,
            _ => repository.to_ref(),
        };

        let run_id = args.run_id.trim().parse::<u64>().map_err(|_| {
            Error::Config(format!("Run id '{}' is not a number", args.run_id))
        })?;

        Ok(Self {
            tag_name: args.tag_name.trim().to_string(),
            branch: args.branch.clone(),
            repository,
            head_repository,
            github_token: args.github_token.clone(),
            github_api_url: args.github_api_url.trim_end_matches('/').to_string(),
            jira: JiraSettings {
                cloud_instance_base_url: args
                    .cloud_instance_base_url
                    .trim_end_matches('/')
                    .to_string(),
                client_id: args.client_id.clone(),
                client_secret: args.client_secret.clone(),
                api_url: args.atlassian_api_url.trim_end_matches('/').to_string(),
            },
            deployment: DeploymentSettings {
                display_name: args.display_name.clone(),
                description: args.description.clone(),
                label: args.label.clone(),
                environment_id: args.environment_id.clone(),
                environment_display_name: args.environment_display_name.clone(),
                environment_type: args.environment_type.clone(),
            },
            run: CiRun {
                id: run_id,
                number: args.run_number.clone(),
                workflow: args.workflow.clone(),
            },
            dry_run: args.dry_run,
        })
    }

    /// Whether the tagged head is resolved from a repository other than the
    /// one that triggered the run
    pub fn head_repository_differs(&self) -> bool {
        self.head_repository != self.repository.to_ref()
    }

    /// Link to the CI run in the repository's web UI
    pub fn run_url(&self) -> String {
        format!(
            "{}/actions/runs/{}",
            self.repository.html_url.trim_end_matches('/'),
            self.run.id
        )
    }
}
