//! End-to-end lifecycle scenarios using wiremock
//!
//! These drive the public entry points the host runtime dispatches, with a
//! mocked Tower API on the other side: relationship-based foreign-key
//! resolution, externally managed resources, idempotent delete, the job
//! launch flow and role grants.

use awx_lifecycle::error::Error;
use awx_lifecycle::lifecycle::{job, organization, role, team, user};
use awx_lifecycle::node::{NodeContext, NodeProperties, Relationship};
use awx_lifecycle::resource::ResourceKind;
use serde_json::{json, Value};
use std::rc::Rc;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_config(endpoint: &str) -> Value {
    json!({
        "endpoint": endpoint,
        "access_token": "test-token"
    })
}

fn node(endpoint: &str, resource_config: Value) -> NodeContext {
    NodeContext::new(NodeProperties {
        client_config: client_config(endpoint),
        resource_config,
        ..Default::default()
    })
}

#[tokio::test(flavor = "multi_thread")]
async fn organization_create_persists_resource_and_id() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v2/organizations/"))
        .and(body_json(json!({"name": "engineering"})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": 1,
            "name": "engineering"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let uri = server.uri();
    let (resource, resource_id) = tokio::task::spawn_blocking(move || {
        let ctx = node(&uri, json!({"name": "engineering"}));
        organization::create(&ctx)?;
        Ok::<_, Error>((
            ctx.runtime_get("resource").unwrap(),
            ctx.runtime_get("resource_id").unwrap(),
        ))
    })
    .await
    .unwrap()
    .unwrap();

    assert_eq!(resource["name"], "engineering");
    assert_eq!(resource_id, json!(1));
}

#[tokio::test(flavor = "multi_thread")]
async fn team_create_uses_related_organization_without_lookup() {
    let server = MockServer::start().await;
    // The relationship supplies the organization id directly; the collection
    // must never be listed.
    Mock::given(method("GET"))
        .and(path("/api/v2/organizations/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"results": []})))
        .expect(0)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/v2/organizations/"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": 1})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/v2/teams/"))
        .and(body_json(json!({"name": "team-a", "organization": 1})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": 2})))
        .expect(1)
        .mount(&server)
        .await;

    let uri = server.uri();
    let team_id = tokio::task::spawn_blocking(move || {
        let org_ctx = Rc::new(node(&uri, json!({"name": "engineering"})));
        organization::create(&org_ctx)?;

        let team_ctx = node(&uri, json!({"name": "team-a"})).with_relationship(
            Relationship::new("contained_in_organization", Rc::clone(&org_ctx)),
        );
        team::create(&team_ctx)?;
        Ok::<_, Error>(team_ctx.runtime_get("resource_id").unwrap())
    })
    .await
    .unwrap()
    .unwrap();

    assert_eq!(team_id, json!(2));
}

#[tokio::test(flavor = "multi_thread")]
async fn team_create_falls_back_to_lookup_by_name() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v2/organizations/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [{"id": 3, "name": "Engineering", "url": "/api/v2/organizations/3/"}]
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/v2/teams/"))
        .and(body_json(json!({"name": "team-b", "organization": 3})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": 4})))
        .expect(1)
        .mount(&server)
        .await;

    let uri = server.uri();
    tokio::task::spawn_blocking(move || {
        let ctx = node(&uri, json!({"name": "team-b", "organization": "Engineering"}));
        team::create(&ctx)
    })
    .await
    .unwrap()
    .expect("team create should resolve the organization by name");
}

#[tokio::test(flavor = "multi_thread")]
async fn delete_is_idempotent_when_resource_is_absent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v2/organizations/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [{"id": 42, "name": "gone"}]
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v2/organizations/42/"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(204))
        .expect(0)
        .mount(&server)
        .await;

    let uri = server.uri();
    let runtime = tokio::task::spawn_blocking(move || {
        let ctx = node(&uri, json!({"name": "gone"}));
        ctx.runtime_set("resource_id", json!(42));
        organization::delete(&ctx)?;
        Ok::<_, Error>(ctx.runtime_snapshot())
    })
    .await
    .unwrap()
    .unwrap();

    assert!(runtime.is_empty(), "runtime properties must be cleared");
}

#[tokio::test(flavor = "multi_thread")]
async fn delete_removes_existing_resource_and_clears_state() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v2/organizations/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [{"id": 42, "name": "doomed"}]
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v2/organizations/42/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 42})))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/v2/organizations/42/"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let uri = server.uri();
    let runtime = tokio::task::spawn_blocking(move || {
        let ctx = node(&uri, json!({"name": "doomed"}));
        ctx.runtime_set("resource", json!({"id": 42}));
        ctx.runtime_set("resource_id", json!(42));
        organization::delete(&ctx)?;
        Ok::<_, Error>(ctx.runtime_snapshot())
    })
    .await
    .unwrap()
    .unwrap();

    assert!(runtime.is_empty());
}

#[tokio::test(flavor = "multi_thread")]
async fn externally_managed_resource_is_never_mutated() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v2/organizations/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [{"id": 9, "name": "prod-org"}]
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v2/organizations/9/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 9,
            "name": "prod-org"
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(204))
        .expect(0)
        .mount(&server)
        .await;

    let uri = server.uri();
    let resource_id = tokio::task::spawn_blocking(move || {
        let ctx = NodeContext::new(NodeProperties {
            client_config: client_config(&uri),
            resource_config: json!({"name": "prod-org"}),
            use_external_resource: true,
            resource_id: Some(json!("prod-org")),
        });
        organization::create(&ctx)?;
        organization::delete(&ctx)?;
        Ok::<_, Error>(ctx.runtime_get("resource_id").unwrap())
    })
    .await
    .unwrap()
    .unwrap();

    assert_eq!(resource_id, json!(9));
}

#[tokio::test(flavor = "multi_thread")]
async fn user_create_joins_related_team() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v2/users/"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": 5,
            "username": "alice"
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v2/teams/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [{"id": 2, "name": "team-a"}]
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v2/users/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [{"id": 5, "username": "alice"}]
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/v2/teams/2/users/"))
        .and(body_json(json!({"id": 5})))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let uri = server.uri();
    tokio::task::spawn_blocking(move || {
        let team_ctx = Rc::new(node(&uri, json!({"name": "team-a"})));
        team_ctx.runtime_set("resource_id", json!(2));

        let user_ctx = node(&uri, json!({"username": "alice"}))
            .with_relationship(Relationship::new("connected_to_team", team_ctx));
        user::create(&user_ctx)
    })
    .await
    .unwrap()
    .expect("user create should join the related team");
}

#[tokio::test(flavor = "multi_thread")]
async fn launched_job_persists_the_spawned_job_id() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v2/job_templates/5/launch/"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "job": 42,
            "status": "pending"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let uri = server.uri();
    let job_id = tokio::task::spawn_blocking(move || {
        let template_ctx = Rc::new(node(&uri, json!({"name": "deploy"})));
        template_ctx.runtime_set("resource_id", json!(5));

        let job_ctx = node(&uri, json!({})).with_relationship(Relationship::new(
            "job_contained_in_job_template",
            template_ctx,
        ));
        job::create(&job_ctx)?;
        Ok::<_, Error>(job_ctx.runtime_get("resource_id").unwrap())
    })
    .await
    .unwrap()
    .unwrap();

    assert_eq!(job_id, json!(42));
}

#[tokio::test(flavor = "multi_thread")]
async fn role_grant_posts_to_the_related_users_url() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v2/job_templates/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [{"id": 5, "name": "deploy"}]
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v2/job_templates/5/object_roles/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [
                {"id": 11, "name": "Admin", "related": {
                    "users": "/api/v2/roles/11/users/",
                    "teams": "/api/v2/roles/11/teams/"
                }}
            ]
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v2/users/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [{"id": 7, "username": "alice"}]
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/v2/roles/11/users/"))
        .and(body_json(json!({"id": 7})))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let uri = server.uri();
    tokio::task::spawn_blocking(move || {
        let template_ctx = node(&uri, json!({"name": "deploy"}));
        template_ctx.runtime_set("resource_id", json!(5));
        let user_ctx = node(&uri, json!({"username": "alice"}));
        user_ctx.runtime_set("resource_id", json!(7));
        role::add_user(ResourceKind::JobTemplate, &template_ctx, &user_ctx, "Admin")
    })
    .await
    .unwrap()
    .expect("role grant should succeed");
}

#[tokio::test(flavor = "multi_thread")]
async fn role_operations_reject_unsupported_kinds() {
    let server = MockServer::start().await;
    let uri = server.uri();
    let err = tokio::task::spawn_blocking(move || {
        let source = node(&uri, json!({}));
        let target = node(&uri, json!({}));
        role::add_user(ResourceKind::Organization, &source, &target, "Admin")
    })
    .await
    .unwrap()
    .unwrap_err();

    assert!(matches!(err, Error::NonRecoverable(_)));
}
