//! Drives the object model over real HTTP against a wiremock server.

use std::io::Cursor;
use std::sync::Arc;

use dirgraph_core::{DeleteOutcome, DirectMemberships, DirectoryContext, Group, HasMembers, User};
use dirgraph_domain::{Config, ObjectType};
use dirgraph_infra::{connect_with_prompt, ConsolePrompt};
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TENANT: &str = "contoso";

fn config(server: &MockServer) -> Config {
    let mut config = Config::default();
    config.api.base_url = server.uri();
    config.api.tenant = TENANT.into();
    config.api.access_token = "e2e-token".into();
    config.http.max_attempts = 2;
    config.http.base_backoff_ms = 1;
    config
}

fn context(server: &MockServer, answer: &str) -> Arc<DirectoryContext> {
    let prompt = ConsolePrompt::new(Cursor::new(answer.as_bytes().to_vec()), Vec::new());
    connect_with_prompt(&config(server), Arc::new(prompt)).expect("context")
}

#[tokio::test]
async fn fetch_update_and_sync_a_user() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/contoso/users/u1"))
        .and(header("authorization", "Bearer e2e-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "odata.type": "Microsoft.DirectoryServices.User",
            "id": "u1",
            "displayName": "Ada",
            "city": "Paris"
        })))
        .mount(&server)
        .await;
    Mock::given(method("PATCH"))
        .and(path("/contoso/users/u1"))
        .and(body_json(json!({
            "odata.type": "Microsoft.DirectoryServices.User",
            "id": "u1",
            "displayName": "Ada",
            "city": "London"
        })))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let ctx = context(&server, "");
    let mut user: User = ctx.fetch("u1").await.unwrap();

    let patch = json!({ "city": "London" }).as_object().cloned().unwrap();
    user.update(patch).await.unwrap();
    assert_eq!(user.as_string("city"), Some("London"));

    user.sync_fields().await.unwrap();
    assert_eq!(user.as_string("city"), Some("Paris"));
}

#[tokio::test]
async fn paged_members_follow_relative_links() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/contoso/groups/g1/members"))
        .and(query_param("$skiptoken", "page2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "value": [{ "id": "d1", "@odata.type": "#microsoft.graph.device" }]
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/contoso/groups/g1/members"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "value": [
                { "id": "u1", "@odata.type": "#microsoft.graph.user" },
                { "id": "u2", "@odata.type": "#microsoft.graph.user" }
            ],
            "@odata.nextLink": "groups/g1/members?$skiptoken=page2"
        })))
        .mount(&server)
        .await;

    let ctx = context(&server, "");
    let group = Group::from_properties(Arc::clone(&ctx), json!({ "id": "g1" }).as_object().cloned().unwrap());

    let members = group.list_members(None).await.unwrap();
    let ids: Vec<_> = members.iter().map(|m| m.id().unwrap()).collect();
    assert_eq!(ids, vec!["u1", "u2", "d1"]);
    assert_eq!(members[2].object_type(), ObjectType::Device);

    let users = group.list_members(Some(&[ObjectType::User][..])).await.unwrap();
    assert_eq!(users.len(), 2);
}

#[tokio::test]
async fn direct_memberships_issue_a_single_request() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/contoso/users/u1/memberOf"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "value": [
                { "id": "g1", "displayName": "Engineering", "@odata.type": "#microsoft.graph.group" }
            ]
        })))
        .expect(2)
        .mount(&server)
        .await;

    let ctx = context(&server, "");
    let user = User::from_properties(Arc::clone(&ctx), json!({ "id": "u1" }).as_object().cloned().unwrap());

    let ids = user.list_direct_memberships(true).await.unwrap();
    assert_eq!(ids.ids(), vec!["g1"]);

    let DirectMemberships::Groups(groups) = user.list_direct_memberships(false).await.unwrap() else {
        panic!("expected groups");
    };
    assert_eq!(groups["Engineering"][0].id(), Some("g1"));
}

#[tokio::test]
async fn delete_respects_the_console_answer() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/contoso/devices/d1"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let declined = context(&server, "n\n");
    let device = declined.construct(json!({ "id": "d1" }).as_object().cloned().unwrap(), Some(ObjectType::Device));
    assert_eq!(device.delete(true).await.unwrap(), DeleteOutcome::Declined);

    let confirmed = context(&server, "yes\n");
    let device = confirmed.construct(json!({ "id": "d1" }).as_object().cloned().unwrap(), Some(ObjectType::Device));
    assert_eq!(device.delete(true).await.unwrap(), DeleteOutcome::Deleted);
}

#[tokio::test]
async fn error_status_and_body_reach_the_caller() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/contoso/groups/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_string(r#"{"odata.error":{"code":"Request_ResourceNotFound"}}"#))
        .expect(1)
        .mount(&server)
        .await;

    let ctx = context(&server, "");
    let err = ctx.get_object(ObjectType::Group, "missing").await.unwrap_err();

    assert!(err.is_not_found());
    assert!(err.body().unwrap().contains("Request_ResourceNotFound"));
}

#[tokio::test]
async fn server_errors_are_retried_by_the_transport_only() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/contoso/applications/a1"))
        .respond_with(ResponseTemplate::new(503).set_body_string("busy"))
        .expect(2)
        .mount(&server)
        .await;

    let ctx = context(&server, "");
    let err = ctx.get_object(ObjectType::Application, "a1").await.unwrap_err();
    assert_eq!(err.status(), Some(503));
}

#[tokio::test]
async fn failed_creates_reach_the_service_once() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/contoso/groups"))
        .respond_with(ResponseTemplate::new(500).set_body_string("try later"))
        .expect(1)
        .mount(&server)
        .await;

    let ctx = context(&server, "");
    let properties = json!({ "displayName": "Team" }).as_object().cloned().unwrap();
    let err = ctx.create_object(ObjectType::Group, properties).await.unwrap_err();

    assert_eq!(err.status(), Some(500));
    assert_eq!(err.body(), Some("try later"));
}
