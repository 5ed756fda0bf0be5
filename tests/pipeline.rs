use jira_deploy::app::{self, Outcome};
use jira_deploy::cli::Args;
use jira_deploy::config::Config;
use jira_deploy::github::GitHubClient;
use jira_deploy::jira::JiraClient;
use jira_deploy::Error;
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn config(server: &MockServer) -> Config {
    let args = Args {
        tag_name: "production".to_string(),
        cloud_instance_base_url: server.uri(),
        client_id: "client".to_string(),
        client_secret: "secret".to_string(),
        display_name: "Shop".to_string(),
        environment_id: "prod".to_string(),
        environment_display_name: "Production".to_string(),
        environment_type: "production".to_string(),
        branch: "master".to_string(),
        github_token: "ghs_token".to_string(),
        run_id: "1658821493".to_string(),
        run_number: "42".to_string(),
        workflow: "Deploy".to_string(),
        repository: Some("acme/shop".to_string()),
        server_url: "https://github.com".to_string(),
        github_api_url: server.uri(),
        atlassian_api_url: server.uri(),
        ..Args::default()
    };
    Config::from_args(&args).unwrap()
}

async fn mount_compare(server: &MockServer, messages: &[&str]) {
    let commits: Vec<_> = messages
        .iter()
        .map(|m| json!({"sha": "x", "commit": {"message": m}}))
        .collect();

    Mock::given(method("GET"))
        .and(path("/repos/acme/shop/compare/production...master"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "commits": commits })))
        .expect(1)
        .mount(server)
        .await;
}

async fn mount_jira(server: &MockServer, expected_calls: u64) {
    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"access_token": "t"})))
        .expect(expected_calls)
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/_edge/tenant_info"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"cloudId": "cloud-1"})))
        .expect(expected_calls)
        .mount(server)
        .await;

    Mock::given(method("POST"))
        .and(path("/jira/deployments/0.1/cloud/cloud-1/bulk"))
        .respond_with(ResponseTemplate::new(202).set_body_json(json!({"rejectedDeployments": []})))
        .expect(expected_calls)
        .mount(server)
        .await;
}

async fn mount_tagging(server: &MockServer, expected_calls: u64) {
    Mock::given(method("GET"))
        .and(path("/repos/acme/shop/commits/master"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"sha": "c0ffee"})))
        .expect(expected_calls)
        .mount(server)
        .await;

    Mock::given(method("POST"))
        .and(path("/repos/acme/shop/git/tags"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"sha": "7a9"})))
        .expect(expected_calls)
        .mount(server)
        .await;

    Mock::given(method("PATCH"))
        .and(path("/repos/acme/shop/git/refs/tags/production"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ref": "refs/tags/production"})))
        .expect(expected_calls)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_full_run() {
    let server = MockServer::start().await;
    mount_compare(&server, &["fix: ABC-1 broken", "chore: release", "ABC-1 follow-up"]).await;
    mount_jira(&server, 1).await;
    mount_tagging(&server, 1).await;

    let config = config(&server);
    let github = GitHubClient::new(&config.github_api_url, &config.github_token).unwrap();
    let jira = JiraClient::new(config.jira.clone());

    let outcome = app::run(&config, &github, &jira).await.unwrap();

    assert_eq!(
        outcome,
        Outcome::Deployed {
            issue_keys: vec!["ABC-1".to_string()],
            commit: "c0ffee".to_string(),
        }
    );
}

#[tokio::test]
async fn test_run_without_keys_touches_nothing_else() {
    let server = MockServer::start().await;
    mount_compare(&server, &[]).await;
    mount_jira(&server, 0).await;
    mount_tagging(&server, 0).await;

    let config = config(&server);
    let github = GitHubClient::new(&config.github_api_url, &config.github_token).unwrap();
    let jira = JiraClient::new(config.jira.clone());

    let outcome = app::run(&config, &github, &jira).await.unwrap();

    assert_eq!(outcome, Outcome::NoIssueKeys);
}

#[tokio::test]
async fn test_run_with_missing_tag() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/repos/acme/shop/compare/production...master"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"message": "Not Found"})))
        .mount(&server)
        .await;
    mount_jira(&server, 0).await;
    mount_tagging(&server, 0).await;

    let config = config(&server);
    let github = GitHubClient::new(&config.github_api_url, &config.github_token).unwrap();
    let jira = JiraClient::new(config.jira.clone());

    let err = app::run(&config, &github, &jira).await.unwrap_err();

    assert!(matches!(err, Error::Retrieval(_)));
    assert!(err
        .to_string()
        .starts_with("An error occurred while retrieving commit messages: GitHub returned 404"));
}
