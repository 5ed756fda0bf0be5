use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::Config;

const SCHEMA_VERSION: &str = "1.0";

/// Every reported deployment is a finished production rollout
pub const STATE_SUCCESSFUL: &str = "successful";

/// A deployment event as ingested by Jira's deployment tracking
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct Deployment {
    pub schema_version: String,
    pub deployment_sequence_number: u64,
    pub update_sequence_number: u64,
    /// Jira issues shipped by this deployment (e.g. "TRACK-123")
    pub issue_keys: Vec<String>,
    pub display_name: String,
    /// Link back to the CI run
    pub url: String,
    pub description: String,
    /// `yyyy-mm-ddTHH:MM:SSZ`
    pub last_updated: String,
    pub label: String,
    pub state: String,
    pub pipeline: Pipeline,
    pub environment: Environment,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct Pipeline {
    pub id: String,
    pub display_name: String,
    pub url: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct Environment {
    pub id: String,
    pub display_name: String,
    #[serde(rename = "type")]
    pub kind: String,
}

/// Request body of the bulk ingestion endpoint
#[derive(Serialize, Debug)]
pub struct DeploymentBatch<'a> {
    pub deployments: [&'a Deployment; 1],
}

impl Deployment {
    /// Describe the current CI run as a successful deployment of `issue_keys`
    pub fn for_run(config: &Config, issue_keys: Vec<String>, now: DateTime<Utc>) -> Self {
        let run_url = config.run_url();
        let settings = &config.deployment;

        Self::new(config.run.id)
            .with_issue_keys(issue_keys)
            .with_display_name(&settings.display_name)
            .with_url(&run_url)
            .with_description(&settings.description)
            .with_last_updated(now)
            .with_label(&settings.label)
            .with_pipeline(Pipeline {
                id: format!("{} {}", config.repository.full_name, config.run.workflow),
                display_name: format!(
                    "Workflow: {} (#{})",
                    config.run.workflow, config.run.number
                ),
                url: run_url,
            })
            .with_environment(Environment {
                id: settings.environment_id.clone(),
                display_name: settings.environment_display_name.clone(),
                kind: settings.environment_type.clone(),
            })
    }

    /// Creates a successful deployment with the given sequence number
    pub fn new(sequence_number: u64) -> Self {
        Self {
            schema_version: SCHEMA_VERSION.to_string(),
            deployment_sequence_number: sequence_number,
            update_sequence_number: sequence_number,
            state: STATE_SUCCESSFUL.to_string(),
            ..Self::default()
        }
    }

    pub fn with_issue_keys(mut self, issue_keys: Vec<String>) -> Self {
        self.issue_keys = issue_keys;
        self
    }

    pub fn with_display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = display_name.into();
        self
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_last_updated(mut self, at: DateTime<Utc>) -> Self {
        self.last_updated = at.format("%Y-%m-%dT%H:%M:%SZ").to_string();
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn with_pipeline(mut self, pipeline: Pipeline) -> Self {
        self.pipeline = pipeline;
        self
    }

    pub fn with_environment(mut self, environment: Environment) -> Self {
        self.environment = environment;
        self
    }

    /// Wrap this deployment into a single-entry bulk request body
    pub fn as_batch(&self) -> DeploymentBatch<'_> {
        DeploymentBatch { deployments: [self] }
    }
}
