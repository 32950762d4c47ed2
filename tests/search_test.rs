//! Service-level tests for the user search façade against a mock engine

use mockito::{Matcher, Server, ServerGuard};
use serde_json::json;
use user_directory_search::search::*;

/// Helper to create a service pointed at the mock engine
fn create_test_service(server: &ServerGuard) -> UserSearchService {
    let config = SearchConfigBuilder::new()
        .node(server.url())
        .index("users")
        .build();

    UserSearchService::new(&config).unwrap()
}

fn hits_body(total: serde_json::Value, hits: serde_json::Value) -> String {
    json!({ "took": 3, "hits": { "total": total, "hits": hits } }).to_string()
}

#[tokio::test]
async fn test_ensure_index_creates_missing_index() {
    let mut server = Server::new_async().await;
    let exists = server
        .mock("HEAD", "/users")
        .with_status(404)
        .create_async()
        .await;
    let create = server
        .mock("PUT", "/users")
        .match_body(Matcher::PartialJson(json!({
            "mappings": {
                "properties": {
                    "avatar": { "type": "keyword", "index": false },
                    "status": { "type": "keyword" },
                    "created_at": { "type": "date" }
                }
            }
        })))
        .with_status(200)
        .with_body(r#"{"acknowledged":true}"#)
        .create_async()
        .await;

    let service = create_test_service(&server);
    service.ensure_index().await.unwrap();

    exists.assert_async().await;
    create.assert_async().await;
}

#[tokio::test]
async fn test_ensure_index_is_idempotent() {
    let mut server = Server::new_async().await;
    let exists = server
        .mock("HEAD", "/users")
        .with_status(200)
        .expect(2)
        .create_async()
        .await;
    let create = server
        .mock("PUT", "/users")
        .expect(0)
        .create_async()
        .await;

    let service = create_test_service(&server);
    service.ensure_index().await.unwrap();
    service.ensure_index().await.unwrap();

    exists.assert_async().await;
    create.assert_async().await;
}

#[tokio::test]
async fn test_ensure_index_failure_is_provisioning_error() {
    let mut server = Server::new_async().await;
    server
        .mock("HEAD", "/users")
        .with_status(503)
        .create_async()
        .await;

    let service = create_test_service(&server);
    let err = service.ensure_index().await.unwrap_err();

    assert!(matches!(err, SearchError::Provisioning(_)));
    assert!(err.to_string().starts_with("Failed to ensure index"));
}

#[tokio::test]
async fn test_index_user_omits_phone_and_defaults_created_at() {
    let mut server = Server::new_async().await;
    let put = server
        .mock("PUT", "/users/_doc/u1")
        .match_query(Matcher::UrlEncoded("refresh".into(), "false".into()))
        .match_body(Matcher::PartialJson(json!({
            "user_id": "u1",
            "name": "Nguyen Van A",
            "email": "a@example.com"
        })))
        .with_status(201)
        .with_body(r#"{"result":"created"}"#)
        .create_async()
        .await;

    let record = UserRecord {
        user_id: "u1".into(),
        name: Some("Nguyen Van A".into()),
        email: Some("a@example.com".into()),
        phone: Some("+84900000000".into()),
        ..Default::default()
    };

    let service = create_test_service(&server);
    service.index_user(&IndexedUser::from(&record)).await.unwrap();
    put.assert_async().await;

    let document =
        serde_json::to_value(IndexedUser::from(&record).to_document(chrono::Utc::now())).unwrap();
    assert!(document.get("phone").is_none());
    assert!(document["created_at"].is_string());
}

#[tokio::test]
async fn test_delete_missing_user_is_deletion_error() {
    let mut server = Server::new_async().await;
    server
        .mock("DELETE", "/users/_doc/ghost")
        .with_status(404)
        .with_body(r#"{"result":"not_found"}"#)
        .create_async()
        .await;

    let service = create_test_service(&server);
    let err = service.delete_user("ghost").await.unwrap_err();

    assert!(matches!(err, SearchError::Deletion(_)));
}

#[tokio::test]
async fn test_blank_queries_issue_no_request() {
    let mut server = Server::new_async().await;
    let search = server
        .mock("POST", "/users/_search")
        .expect(0)
        .create_async()
        .await;

    let service = create_test_service(&server);
    for query in ["", "   ", "\t\n"] {
        assert_eq!(
            service.search_email_exact(query, 0, 10).await.unwrap(),
            PaginatedResult::empty()
        );
        assert_eq!(
            service.search_text(query, 0, 10).await.unwrap(),
            PaginatedResult::empty()
        );
        assert!(service.search_by_name(query, 10).await.unwrap().is_empty());
        assert!(service
            .search_by_name_paged(query, 1, 10)
            .await
            .unwrap()
            .is_empty());
    }

    search.assert_async().await;
}

#[tokio::test]
async fn test_email_exact_body_and_normalization() {
    let mut server = Server::new_async().await;
    let search = server
        .mock("POST", "/users/_search")
        .match_body(Matcher::PartialJson(json!({
            "from": 0,
            "size": 5,
            "query": {
                "bool": {
                    "should": [
                        { "term": { "email.raw": "a@example.com" } },
                        { "match": { "email": { "query": "A@Example.com", "operator": "and" } } }
                    ],
                    "minimum_should_match": 1
                }
            }
        })))
        .with_status(200)
        .with_body(hits_body(
            json!({ "value": 1, "relation": "eq" }),
            json!([{
                "_id": "u1",
                "_score": 2.5,
                "_source": { "name": "Nguyen Van A", "avatar": "https://cdn/a.png" }
            }]),
        ))
        .create_async()
        .await;

    let service = create_test_service(&server);
    let result = service
        .search_email_exact("  A@Example.com ", 0, 5)
        .await
        .unwrap();

    search.assert_async().await;
    assert_eq!(result.total, 1);
    assert_eq!(result.data[0].id, "u1");
    assert_eq!(result.data[0].name, "Nguyen Van A");
    assert_eq!(result.data[0].avatar.as_deref(), Some("https://cdn/a.png"));
}

#[tokio::test]
async fn test_search_text_collects_highlights() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/users/_search")
        .match_body(Matcher::PartialJson(json!({
            "from": 20,
            "size": 10,
            "highlight": { "pre_tags": ["<em>"], "post_tags": ["</em>"] }
        })))
        .with_status(200)
        .with_body(hits_body(
            json!(7),
            json!([{
                "_id": "u1",
                "_source": { "name": "Nguyen Van A" },
                "highlight": { "name": ["<em>Nguyen</em> Van A"] }
            }]),
        ))
        .create_async()
        .await;

    let service = create_test_service(&server);
    let result = service.search_text("nguy", 20, 10).await.unwrap();

    assert_eq!(result.total, 7);
    assert_eq!(result.data[0].avatar, None);
    assert_eq!(
        result.data[0].highlights.get("name"),
        Some(&vec!["<em>Nguyen</em> Van A".to_string()])
    );
}

#[tokio::test]
async fn test_paged_search_clamps_page_and_limit() {
    let mut server = Server::new_async().await;
    let search = server
        .mock("POST", "/users/_search")
        .match_body(Matcher::PartialJson(json!({ "from": 0, "size": 100 })))
        .with_status(200)
        .with_body(hits_body(json!(0), json!([])))
        .create_async()
        .await;

    let service = create_test_service(&server);
    let result = service.search_by_name_paged("an", -3, 1000).await.unwrap();

    search.assert_async().await;
    assert_eq!(result, PaginatedResult::empty());
}

#[tokio::test]
async fn test_paged_search_offset() {
    let mut server = Server::new_async().await;
    let search = server
        .mock("POST", "/users/_search")
        .match_body(Matcher::PartialJson(json!({ "from": 20, "size": 10 })))
        .with_status(200)
        .with_body(hits_body(json!(25), json!([])))
        .create_async()
        .await;

    let service = create_test_service(&server);
    let result = service.search_by_name_paged("an", 3, 0).await.unwrap();

    search.assert_async().await;
    assert_eq!(result.total, 25);
}

#[tokio::test]
async fn test_missing_total_falls_back_to_hit_count() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/users/_search")
        .with_status(200)
        .with_body(
            json!({
                "hits": {
                    "hits": [
                        { "_id": "u1", "_source": { "name": "A" } },
                        { "_id": "u2", "_source": { "name": "B" } }
                    ]
                }
            })
            .to_string(),
        )
        .create_async()
        .await;

    let service = create_test_service(&server);
    let result = service.search_by_name("a", 5).await.unwrap();

    assert_eq!(result.total, 2);
    assert_eq!(result.ids().collect::<Vec<_>>(), vec!["u1", "u2"]);
}

#[tokio::test]
async fn test_engine_failure_names_the_strategy() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/users/_search")
        .with_status(400)
        .with_body(
            json!({ "error": { "type": "parsing_exception", "reason": "bad query" } }).to_string(),
        )
        .create_async()
        .await;

    let service = create_test_service(&server);
    let err = service.search_text("x", 0, 10).await.unwrap_err();

    assert!(matches!(err, SearchError::Query { .. }));
    let message = err.to_string();
    assert!(message.starts_with("Failed to search text"));
    assert!(message.contains("bad query"));
}
