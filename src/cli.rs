use std::path::PathBuf;

use clap::{Parser, ValueEnum};

/// Log output format
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Every action input is also read from the `INPUT_<NAME>` variable the
/// GitHub Actions runner exports for it.
#[derive(Parser, Debug, Default)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// Release tag used as the comparison base and moved to the deployed commit
    #[clap(long, env = "INPUT_TAG-NAME")]
    pub tag_name: String,

    #[clap(long, env = "INPUT_CLOUD-INSTANCE-BASE-URL", default_value = "")]
    pub cloud_instance_base_url: String,

    #[clap(long, env = "INPUT_CLIENT-ID", default_value = "")]
    pub client_id: String,

    #[clap(long, env = "INPUT_CLIENT-SECRET", default_value = "", hide_env_values = true)]
    pub client_secret: String,

    #[clap(long, env = "INPUT_DISPLAY-NAME", default_value = "")]
    pub display_name: String,

    #[clap(long, env = "INPUT_DESCRIPTION", default_value = "")]
    pub description: String,

    #[clap(long, env = "INPUT_LABEL", default_value = "")]
    pub label: String,

    #[clap(long, env = "INPUT_ENVIRONMENT-ID", default_value = "")]
    pub environment_id: String,

    #[clap(long, env = "INPUT_ENVIRONMENT-DISPLAY-NAME", default_value = "")]
    pub environment_display_name: String,

    #[clap(long, env = "INPUT_ENVIRONMENT-TYPE", default_value = "")]
    pub environment_type: String,

    /// Branch that was deployed
    #[clap(long, env = "INPUT_BRANCH", default_value = "master")]
    pub branch: String,

    /// Repository (owner/name) whose branch head gets tagged. Defaults to the
    /// triggering repository.
    #[clap(long, env = "INPUT_HEAD-REPOSITORY")]
    pub head_repository: Option<String>,

    #[clap(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    pub github_token: String,

    #[clap(long, env = "GITHUB_RUN_ID")]
    pub run_id: String,

    #[clap(long, env = "GITHUB_RUN_NUMBER")]
    pub run_number: String,

    #[clap(long, env = "GITHUB_WORKFLOW", default_value = "")]
    pub workflow: String,

    /// Path to the JSON payload of the triggering event
    #[clap(long, env = "GITHUB_EVENT_PATH")]
    pub event_path: Option<PathBuf>,

    /// Triggering repository (owner/name), used when no event payload is available
    #[clap(long, env = "GITHUB_REPOSITORY")]
    pub repository: Option<String>,

    #[clap(long, env = "GITHUB_SERVER_URL", default_value = "https://github.com")]
    pub server_url: String,

    #[clap(long, env = "GITHUB_API_URL", default_value = "https://api.github.com")]
    pub github_api_url: String,

    #[clap(long, env = "ATLASSIAN_API_URL", default_value = "https://api.atlassian.com")]
    pub atlassian_api_url: String,

    /// Read commits and print the deployment payload without calling Jira or tagging
    #[clap(short, long, value_parser, default_value_t = false)]
    pub dry_run: bool,

    #[clap(long, env = "LOG_FORMAT", value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,
}
