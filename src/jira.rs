//! Jira Cloud deployment tracking
//!
//! Reporting a deployment takes three round-trips:
//! - exchange the OAuth client credentials for a bearer token
//! - look up the tenant's cloud id from the instance's `/_edge/tenant_info`
//! - post the deployment to the bulk ingestion endpoint of that cloud id
//!
//! Nothing is cached between runs. A deployment Jira refuses is an error,
//! even though the ingestion call itself answers with a success status.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::JiraSettings;
use crate::deployment::Deployment;
use crate::error::{check_status, ApiError};

const SERVICE: &str = "Jira";
const AUDIENCE: &str = "api.atlassian.com";

/// Somewhere deployments can be reported to
#[async_trait]
pub trait DeploymentTracker: Send + Sync {
    async fn report_deployment(&self, deployment: &Deployment) -> Result<(), ApiError>;
}

#[derive(Serialize)]
struct TokenRequest<'a> {
    audience: &'a str,
    grant_type: &'a str,
    client_id: &'a str,
    client_secret: &'a str,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct TenantInfo {
    cloud_id: String,
}

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentResponse {
    #[serde(default)]
    pub rejected_deployments: Vec<RejectedDeployment>,
}

#[derive(Deserialize, Debug)]
pub struct RejectedDeployment {
    #[serde(default)]
    pub errors: Vec<RejectionError>,
}

#[derive(Deserialize, Debug)]
pub struct RejectionError {
    #[serde(default)]
    pub message: String,
}

impl DeploymentResponse {
    /// Decode an ingestion response; an empty body means nothing was rejected
    pub fn from_body(body: &str) -> Result<Self, ApiError> {
        if body.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_json::from_str(body)?)
    }

    /// The comma-joined reasons of the first rejected deployment, if any was rejected
    pub fn rejection(&self) -> Option<String> {
        self.rejected_deployments.first().map(|rejected| {
            rejected
                .errors
                .iter()
                .map(|error| error.message.as_str())
                .collect::<Vec<_>>()
                .join(",")
        })
    }
}

/// Client for the Atlassian identity, tenant and deployment APIs
#[derive(Debug, Clone)]
pub struct JiraClient {
    client: reqwest::Client,
    settings: JiraSettings,
}

impl JiraClient {
    pub fn new(settings: JiraSettings) -> Self {
        Self {
            client: reqwest::Client::new(),
            settings,
        }
    }

    /// Exchange the configured client credentials for a bearer token
    pub async fn access_token(&self) -> Result<String, ApiError> {
        let url = format!("{}/oauth/token", self.settings.api_url);
        debug!(%url, "Requesting Jira access token");

        let request = TokenRequest {
            audience: AUDIENCE,
            grant_type: "client_credentials",
            client_id: &self.settings.client_id,
            client_secret: &self.settings.client_secret,
        };

        let response = self.client.post(&url).json(&request).send().await?;
        let token: TokenResponse = check_status(SERVICE, response).await?.json().await?;

        Ok(token.access_token)
    }

    /// Resolve the tenant identifier of the configured Jira instance
    pub async fn cloud_id(&self) -> Result<String, ApiError> {
        let url = format!("{}/_edge/tenant_info", self.settings.cloud_instance_base_url);
        debug!(%url, "Resolving Jira cloud id");

        let response = self.client.get(&url).send().await?;
        let tenant: TenantInfo = check_status(SERVICE, response).await?.json().await?;

        Ok(tenant.cloud_id)
    }

    /// Submit a deployment, failing when Jira rejects it
    pub async fn submit_deployment(
        &self,
        token: &str,
        cloud_id: &str,
        deployment: &Deployment,
    ) -> Result<(), ApiError> {
        let url = format!(
            "{}/jira/deployments/0.1/cloud/{}/bulk",
            self.settings.api_url, cloud_id
        );
        debug!(%url, "Submitting deployment");

        let response = self
            .client
            .post(&url)
            .bearer_auth(token)
            .json(&deployment.as_batch())
            .send()
            .await?;
        let body = check_status(SERVICE, response).await?.text().await?;
        let result = DeploymentResponse::from_body(&body)?;

        match result.rejection() {
            Some(message) => Err(ApiError::Rejected(message)),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl DeploymentTracker for JiraClient {
    async fn report_deployment(&self, deployment: &Deployment) -> Result<(), ApiError> {
        let token = self.access_token().await?;
        let cloud_id = self.cloud_id().await?;
        info!(%cloud_id, "Resolved Jira tenant");

        self.submit_deployment(&token, &cloud_id, deployment).await
    }
}
