//! GitHubApiClient against a mock GitHub REST API

use assert_matches::assert_matches;
use prgate_core::{
    ClientConfig, Error, GitHubApiClient, MergeableState, Pagination, PermissionLevel,
    PullRequestApi, PullRequestRef, RepoRef,
};
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn pr() -> PullRequestRef {
    PullRequestRef::new(RepoRef::new("strongbox", "strongbox"), 1567)
}

fn client(server: &MockServer, pagination: Pagination) -> GitHubApiClient {
    let config = ClientConfig::new(server.uri(), Some("test-token".to_string()))
        .with_pagination(pagination);
    GitHubApiClient::new(config).unwrap()
}

fn files_page(names: &[&str]) -> serde_json::Value {
    json!(names
        .iter()
        .map(|n| json!({ "filename": n, "status": "modified" }))
        .collect::<Vec<_>>())
}

fn pull_body(state: &str) -> serde_json::Value {
    json!({
        "number": 1567,
        "mergeable_state": state,
        "head": {
            "label": "steve-todorov:feature",
            "ref": "feature",
            "sha": "0123456789abcdef0123456789abcdef01234567",
            "user": { "login": "steve-todorov", "id": 1 },
            "repo": { "full_name": "steve-todorov/strongbox" }
        }
    })
}

const FILES_PATH: &str = "/repos/strongbox/strongbox/pulls/1567/files";

#[tokio::test]
async fn test_list_files_stops_on_short_page() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(FILES_PATH))
        .and(query_param("page", "1"))
        .and(query_param("per_page", "2"))
        .and(header("authorization", "Bearer test-token"))
        .and(header("accept", "application/vnd.github+json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(files_page(&[
            "infra/cs-d/base/main.tf",
            "infra/cs-d/ecr/main.tf",
        ])))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path(FILES_PATH))
        .and(query_param("page", "2"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(files_page(&["infra/cs-p/route53/main.tf"])),
        )
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path(FILES_PATH))
        .and(query_param("page", "3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(0)
        .mount(&server)
        .await;

    let api = client(&server, Pagination::new(2, 10).unwrap());
    let files = api.list_files(&pr()).await.unwrap();
    assert_eq!(
        files,
        vec![
            "infra/cs-d/base/main.tf",
            "infra/cs-d/ecr/main.tf",
            "infra/cs-p/route53/main.tf"
        ]
    );
}

#[tokio::test]
async fn test_list_files_stops_on_empty_page() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(FILES_PATH))
        .and(query_param("page", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(files_page(&["a/b.tf", "a/c.tf"])))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path(FILES_PATH))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let api = client(&server, Pagination::new(2, 10).unwrap());
    assert_eq!(api.list_files(&pr()).await.unwrap(), vec!["a/b.tf", "a/c.tf"]);
}

#[tokio::test]
async fn test_list_files_respects_page_cap() {
    let server = MockServer::start().await;

    // Every page is full, so only the cap ends the loop
    Mock::given(method("GET"))
        .and(path(FILES_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(files_page(&["x/1.tf"])))
        .expect(3)
        .mount(&server)
        .await;

    let api = client(&server, Pagination::new(1, 3).unwrap());
    let files = api.list_files(&pr()).await.unwrap();
    assert_eq!(files.len(), 3);
}

#[tokio::test]
async fn test_list_files_api_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(FILES_PATH))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "message": "Not Found",
            "documentation_url": "https://docs.github.com/rest"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let api = client(&server, Pagination::default());
    let err = api.list_files(&pr()).await.unwrap_err();
    assert_matches!(err, Error::Api { status: 404, ref message } if message == "Not Found");
}

#[tokio::test]
async fn test_api_error_with_plain_body() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/repos/strongbox/strongbox/pulls/1567"))
        .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
        .mount(&server)
        .await;

    let api = client(&server, Pagination::default());
    let err = api.pull_request(&pr()).await.unwrap_err();
    assert_eq!(err.status(), Some(502));
    assert_eq!(err.message(), "bad gateway");
}

#[tokio::test]
async fn test_rate_limit_is_reported() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(FILES_PATH))
        .respond_with(
            ResponseTemplate::new(403)
                .insert_header("x-ratelimit-remaining", "0")
                .set_body_json(json!({ "message": "API rate limit exceeded" })),
        )
        .mount(&server)
        .await;

    let api = client(&server, Pagination::default());
    let err = api.list_files(&pr()).await.unwrap_err();
    assert_matches!(err, Error::RateLimitExceeded(_));
    assert!(!err.to_string().contains("test-token"));
}

#[tokio::test]
async fn test_forbidden_without_rate_limit_is_api_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(FILES_PATH))
        .respond_with(
            ResponseTemplate::new(403)
                .insert_header("x-ratelimit-remaining", "4999")
                .set_body_json(json!({ "message": "Resource not accessible by integration" })),
        )
        .mount(&server)
        .await;

    let api = client(&server, Pagination::default());
    let err = api.list_files(&pr()).await.unwrap_err();
    assert_matches!(err, Error::Api { status: 403, .. });
}

#[tokio::test]
async fn test_pull_request_and_head() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/repos/strongbox/strongbox/pulls/1567"))
        .respond_with(ResponseTemplate::new(200).set_body_json(pull_body("clean")))
        .mount(&server)
        .await;

    let api = client(&server, Pagination::default());

    let pull = api.pull_request(&pr()).await.unwrap();
    assert_eq!(pull.number, 1567);
    assert_eq!(pull.mergeable_state, MergeableState::Clean);

    let head = api.head(&pr()).await.unwrap();
    assert_eq!(head.ref_name, "feature");
    assert_eq!(head.label, "steve-todorov:feature");
    assert_eq!(head.user.unwrap().login, "steve-todorov");

    assert_eq!(api.sha(&pr(), Some(7)).await.unwrap(), "0123456");
    assert_eq!(
        api.sha(&pr(), None).await.unwrap(),
        "0123456789abcdef0123456789abcdef01234567"
    );
    assert!(api.is_mergeable(&pr()).await.unwrap());
}

#[tokio::test]
async fn test_is_mergeable_only_when_clean() {
    for (state, expected) in [
        ("clean", true),
        ("dirty", false),
        ("blocked", false),
        ("behind", false),
        ("unstable", false),
        ("unknown", false),
    ] {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/repos/strongbox/strongbox/pulls/1567"))
            .respond_with(ResponseTemplate::new(200).set_body_json(pull_body(state)))
            .mount(&server)
            .await;

        let api = client(&server, Pagination::default());
        assert_eq!(api.is_mergeable(&pr()).await.unwrap(), expected, "state {}", state);
    }
}

#[tokio::test]
async fn test_missing_mergeable_state_is_unknown() {
    let server = MockServer::start().await;
    let mut body = pull_body("clean");
    body.as_object_mut().unwrap().remove("mergeable_state");

    Mock::given(method("GET"))
        .and(path("/repos/strongbox/strongbox/pulls/1567"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(&server)
        .await;

    let api = client(&server, Pagination::default());
    let pull = api.pull_request(&pr()).await.unwrap();
    assert_eq!(pull.mergeable_state, MergeableState::Unknown);
}

#[tokio::test]
async fn test_collaborator_permission() {
    let server = MockServer::start().await;

    for (user, permission) in [("admin-user", "admin"), ("writer", "write"), ("odd", "maintain")] {
        Mock::given(method("GET"))
            .and(path(format!(
                "/repos/strongbox/strongbox/collaborators/{}/permission",
                user
            )))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "permission": permission,
                "user": { "login": user, "id": 7 }
            })))
            .mount(&server)
            .await;
    }

    let api = client(&server, Pagination::default());
    let repo = RepoRef::new("strongbox", "strongbox");
    assert_eq!(
        api.collaborator_permission(&repo, "admin-user").await.unwrap(),
        PermissionLevel::Admin
    );
    assert_eq!(
        api.collaborator_permission(&repo, "writer").await.unwrap(),
        PermissionLevel::Write
    );
    assert_eq!(
        api.collaborator_permission(&repo, "odd").await.unwrap(),
        PermissionLevel::None
    );
}

#[tokio::test]
async fn test_create_comment() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/repos/strongbox/strongbox/issues/1567/comments"))
        .and(body_json(json!({ "body": "@octocat hello" })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": 99,
            "html_url": "https://github.com/strongbox/strongbox/pull/1567#issuecomment-99",
            "body": "@octocat hello"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let api = client(&server, Pagination::default());
    let comment = api.create_comment(&pr(), "@octocat hello").await.unwrap();
    assert_eq!(comment.id, 99);
    assert!(comment.html_url.ends_with("#issuecomment-99"));
}

#[tokio::test]
async fn test_workflow_jobs() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/repos/strongbox/strongbox/actions/runs/42/jobs"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "total_count": 2,
            "jobs": [
                { "id": 1, "name": "plan (cs-d/base)", "html_url": "https://github.com/strongbox/strongbox/runs/1" },
                { "id": 2, "name": "plan (cs-d/ecr)", "html_url": null }
            ]
        })))
        .mount(&server)
        .await;

    let api = client(&server, Pagination::default());
    let jobs = api
        .workflow_jobs(&RepoRef::new("strongbox", "strongbox"), 42)
        .await
        .unwrap();
    assert_eq!(jobs.len(), 2);
    assert_eq!(jobs[0].name, "plan (cs-d/base)");
    assert_eq!(jobs[1].html_url, "");
}

#[tokio::test]
async fn test_undecodable_body() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/repos/strongbox/strongbox/pulls/1567"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let api = client(&server, Pagination::default());
    assert_matches!(api.pull_request(&pr()).await, Err(Error::Decode(_)));
}

#[tokio::test]
async fn test_unreachable_server_is_http_error() {
    let config = ClientConfig::new("http://127.0.0.1:1", None);
    let api = GitHubApiClient::new(config).unwrap();
    assert_matches!(api.list_files(&pr()).await, Err(Error::Http(_)));
}
