//! Store behaviour against a mock backend.

mod common;

use admindesk_core::api::ResponseStatus;
use admindesk_core::models::{ArticlePayload, NewRole, RegisterPayload, RelatedEntity, TagPayload};
use admindesk_core::stores::{
    fetch_advisors, ArticleStore, AuthStore, RoleStore, TagStore, TeamStore,
};
use admindesk_core::ApiError;
use common::{article_json, failure, harness, success, tag_json};
use serde_json::json;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, ResponseTemplate};

fn page(items: serde_json::Value, current: u32, total_pages: u32, total_items: u64) -> serde_json::Value {
    success(json!({
        "items": items,
        "currentPage": current,
        "totalPages": total_pages,
        "totalItems": total_items
    }))
}

#[tokio::test]
async fn test_fetch_tags_flattens_parents() {
    let h = harness().await;
    Mock::given(method("GET"))
        .and(path("/tags"))
        .respond_with(ResponseTemplate::new(200).set_body_json(success(json!([
            tag_json("1", "Study abroad", None),
            tag_json("2", "Canada", Some("1")),
            tag_json("3", "Orphan", Some("missing")),
        ]))))
        .mount(&h.server)
        .await;

    let mut store = TagStore::new(h.client.clone());
    let tags = store.fetch_tags().await;

    assert_eq!(tags.len(), 3);
    assert_eq!(tags[1].parent.as_deref(), Some("Study abroad"));
    assert_eq!(tags[2].parent, None);
    assert_eq!(store.raw_tags()[1].parent_id.as_deref(), Some("1"));
    assert!(store.error().is_none());
    assert!(!store.is_loading());
}

#[tokio::test]
async fn test_fetch_tags_failure_is_recorded() {
    let h = harness().await;
    Mock::given(method("GET"))
        .and(path("/tags"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&h.server)
        .await;

    let mut store = TagStore::new(h.client.clone());
    assert!(store.fetch_tags().await.is_empty());
    assert_eq!(store.error(), Some("Failed to load tags"));
}

#[tokio::test]
async fn test_tag_writes_update_local_list() {
    let h = harness().await;
    Mock::given(method("GET"))
        .and(path("/tags"))
        .respond_with(ResponseTemplate::new(200).set_body_json(success(json!([tag_json(
            "1",
            "Study abroad",
            None
        )]))))
        .mount(&h.server)
        .await;
    Mock::given(method("POST"))
        .and(path("/tags"))
        .and(body_json(json!({ "name": "Canada", "parentId": "1" })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(success(tag_json("2", "Canada", Some("1")))),
        )
        .expect(1)
        .mount(&h.server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/tags/1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(success(json!(null))))
        .expect(1)
        .mount(&h.server)
        .await;

    let mut store = TagStore::new(h.client.clone());
    store.fetch_tags().await;

    let created = store
        .create_tag(&TagPayload {
            name: Some("Canada".to_string()),
            parent_id: Some("1".to_string()),
        })
        .await
        .unwrap();
    assert_eq!(created.id, "2");
    assert_eq!(store.tags()[1].parent.as_deref(), Some("Study abroad"));

    store.delete_tag("1").await.unwrap();
    assert_eq!(store.tags().len(), 1);
    assert_eq!(store.tags()[0].parent, None);
}

#[tokio::test]
async fn test_tag_write_failure_returns_message() {
    let h = harness().await;
    Mock::given(method("PUT"))
        .and(path("/tags/9"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(failure("Tag not found", "no tag 9")),
        )
        .mount(&h.server)
        .await;

    let mut store = TagStore::new(h.client.clone());
    let err = store
        .update_tag("9", &TagPayload {
            name: Some("Renamed".to_string()),
            parent_id: None,
        })
        .await
        .unwrap_err();

    assert_eq!(err.message, "Failed to update tag");
    assert!(matches!(err.cause, ApiError::Application { ref message, .. } if message == "Tag not found"));
    assert_eq!(store.error(), Some("Failed to update tag"));
}

#[tokio::test]
async fn test_fetch_articles_merges_tags_without_duplicates() {
    let h = harness().await;
    Mock::given(method("GET"))
        .and(path("/articles"))
        .and(query_param("tag", "visa"))
        .and(query_param("page", "1"))
        .and(query_param("limit", "10"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(
            json!([article_json("a1", "Visa guide"), article_json("a2", "Work permits")]),
            1,
            2,
            14,
        )))
        .expect(1)
        .mount(&h.server)
        .await;
    Mock::given(method("GET"))
        .and(path("/articles"))
        .and(query_param("tag", "study"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(
            json!([article_json("a1", "Visa guide (updated)"), article_json("a3", "Scholarships")]),
            1,
            4,
            37,
        )))
        .expect(1)
        .mount(&h.server)
        .await;

    let mut store = ArticleStore::new(h.client.clone());
    let tags = vec!["visa".to_string(), "study".to_string()];
    let articles = store.fetch_articles(&tags, 1, 10).await;

    let ids: Vec<&str> = articles.iter().map(|a| a.id.as_str()).collect();
    assert_eq!(ids, vec!["a1", "a2", "a3"]);
    assert_eq!(articles[0].title, "Visa guide (updated)");
    assert_eq!(store.total_pages(), 4);
    assert_eq!(store.total_items(), 0);
    assert!(store.error().is_none());
}

#[tokio::test]
async fn test_article_pagination_bounds() {
    let h = harness().await;
    Mock::given(method("GET"))
        .and(path("/articles"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(
            json!([article_json("a1", "Visa guide")]),
            2,
            3,
            25,
        )))
        .mount(&h.server)
        .await;

    let mut store = ArticleStore::new(h.client.clone());
    store.fetch_articles(&[], 2, 10).await;
    assert_eq!(store.current_page(), 2);

    assert!(store.next_page());
    assert!(!store.next_page());
    assert_eq!(store.current_page(), 3);

    assert!(store.go_to_page(1));
    assert!(!store.prev_page());
    assert!(!store.go_to_page(0));
    assert!(!store.go_to_page(4));
    assert_eq!(store.current_page(), 1);
}

#[tokio::test]
async fn test_article_detail_and_writes() {
    let h = harness().await;
    Mock::given(method("GET"))
        .and(path("/articles/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&h.server)
        .await;
    Mock::given(method("POST"))
        .and(path("/articlesManagement"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(failure("Slug taken", "duplicate slug")),
        )
        .mount(&h.server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/api/schools/a1"))
        .and(body_json(json!({ "name": "UBC" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(success(json!({ "id": "s1" }))))
        .expect(1)
        .mount(&h.server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/articlesManagement/visa-guide"))
        .respond_with(ResponseTemplate::new(200).set_body_json(success(json!(null))))
        .expect(1)
        .mount(&h.server)
        .await;

    let mut store = ArticleStore::new(h.client.clone());

    assert!(store.get_article_by_slug("missing").await.is_none());
    assert_eq!(store.error(), Some("Failed to load article details!"));

    let payload = ArticlePayload {
        title: "Visa guide".to_string(),
        slug: store.generate_slug("Visa guide"),
        ..Default::default()
    };
    let err = store.create_article(&payload).await.unwrap_err();
    assert_eq!(err.message, "Failed to create article!");

    let linked = store
        .manage_related_entity("a1", RelatedEntity::School, &json!({ "name": "UBC" }))
        .await
        .unwrap();
    assert_eq!(linked["id"], "s1");

    store.delete_article("visa-guide").await.unwrap();
}

#[tokio::test]
async fn test_team_members_and_roles() {
    let h = harness().await;
    Mock::given(method("GET"))
        .and(path("/users"))
        .respond_with(ResponseTemplate::new(200).set_body_json(success(json!([{
            "id": "u1",
            "fullName": "Mai Tran",
            "title": "Editor",
            "email": "mai@example.com",
            "roleId": 2
        }]))))
        .mount(&h.server)
        .await;
    Mock::given(method("GET"))
        .and(path("/roles"))
        .respond_with(ResponseTemplate::new(500))
        .up_to_n_times(1)
        .mount(&h.server)
        .await;
    Mock::given(method("POST"))
        .and(path("/roles"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(success(json!({ "id": 3, "name": "Reviewer" }))),
        )
        .mount(&h.server)
        .await;

    let mut team = TeamStore::new(h.client.clone());
    let members = team.fetch_team_members().await;
    assert_eq!(members[0].full_name, "Mai Tran");
    assert_eq!(members[0].role_id, Some(2));

    let mut roles = RoleStore::new(h.client.clone());
    let err = roles.fetch_roles().await.unwrap_err();
    assert_eq!(err.message, "Failed to load roles");

    let created = roles
        .create_role(&NewRole {
            name: "Reviewer".to_string(),
            permissions: None,
        })
        .await
        .unwrap();
    assert_eq!(created.id, 3);
    assert_eq!(roles.roles().len(), 1);
}

#[tokio::test]
async fn test_register_reports_server_message() {
    let h = harness().await;
    Mock::given(method("POST"))
        .and(path("/auth/register"))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(json!({ "message": "Email already in use" })),
        )
        .mount(&h.server)
        .await;

    let store = AuthStore::new(h.client.clone());
    let err = store
        .register(&RegisterPayload {
            email: "mai@example.com".to_string(),
            password: "hunter22".to_string(),
            role: "editor".to_string(),
        })
        .await
        .unwrap_err();

    assert_eq!(err.message, "Email already in use");
}

#[tokio::test]
async fn test_login_stores_token_pair() {
    let h = harness().await;
    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .and(body_json(json!({ "email": "mai@example.com", "password": "hunter22" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "accessToken": "access-1",
            "refreshToken": "refresh-1"
        })))
        .mount(&h.server)
        .await;

    let store = AuthStore::new(h.client.clone());
    store.login("mai@example.com", "hunter22").await.unwrap();

    assert_eq!(h.tokens.access_token().as_deref(), Some("access-1"));
    assert_eq!(h.tokens.refresh_token().as_deref(), Some("refresh-1"));
}

#[tokio::test]
async fn test_login_rejected_credentials() {
    let h = harness().await;
    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&h.server)
        .await;

    let store = AuthStore::new(h.client.clone());
    let err = store.login("mai@example.com", "wrong").await.unwrap_err();

    assert_eq!(err.message, "Invalid email or password");
    assert!(!h.client.session().is_authenticated());
}

#[tokio::test]
async fn test_advisors_envelope() {
    let h = harness().await;
    Mock::given(method("GET"))
        .and(path("/advisors"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "id": "ad1",
            "title": "Senior advisor",
            "fullName": "Linh Pham",
            "createdAt": "2025-02-01T00:00:00Z",
            "articleId": "a1"
        }])))
        .up_to_n_times(1)
        .mount(&h.server)
        .await;
    Mock::given(method("GET"))
        .and(path("/advisors"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&h.server)
        .await;

    let ok = fetch_advisors(&h.client).await;
    assert_eq!(ok.response_status, ResponseStatus::Success);
    assert_eq!(ok.status, Some(200));
    assert_eq!(ok.data.unwrap()[0].full_name, "Linh Pham");

    let failed = fetch_advisors(&h.client).await;
    assert_eq!(failed.response_status, ResponseStatus::Error);
    assert_eq!(failed.status, Some(404));
    assert_eq!(failed.message.as_deref(), Some("Failed to retrieve advisors"));
    assert!(failed.data.unwrap().is_empty());
}

#[tokio::test]
async fn test_advisors_envelope_keeps_http_status() {
    let h = harness().await;
    Mock::given(method("GET"))
        .and(path("/advisors"))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(json!({ "message": "Bad filter" })),
        )
        .up_to_n_times(1)
        .mount(&h.server)
        .await;
    Mock::given(method("GET"))
        .and(path("/advisors"))
        .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
        .up_to_n_times(1)
        .mount(&h.server)
        .await;
    Mock::given(method("GET"))
        .and(path("/advisors"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>not json</html>"))
        .mount(&h.server)
        .await;

    let bad_request = fetch_advisors(&h.client).await;
    assert_eq!(bad_request.status, Some(400));
    assert_eq!(bad_request.message.as_deref(), Some("Failed to retrieve advisors"));

    let unavailable = fetch_advisors(&h.client).await;
    assert_eq!(unavailable.status, Some(503));
    assert_eq!(unavailable.message.as_deref(), Some("Failed to retrieve advisors"));
    assert_eq!(unavailable.response_status, ResponseStatus::Error);

    let unreadable = fetch_advisors(&h.client).await;
    assert_eq!(unreadable.status, Some(500));
    assert_eq!(unreadable.message.as_deref(), Some("An unknown error occurred"));
}
