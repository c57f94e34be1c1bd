//! Integration tests for the etcd store gateway, using httpmock.

use httpmock::prelude::*;
use togglekit_common::test_utils::init_test_logging;
use togglekit_store::{EtcdStore, StoreError, StoreGateway};

const TREE_BODY: &str = r#"{
    "action": "get",
    "node": {
        "key": "/v1/toggles/checkout",
        "dir": true,
        "nodes": [
            {"key": "/v1/toggles/checkout/featureA", "value": "true", "modifiedIndex": 20, "createdIndex": 18},
            {"key": "/v1/toggles/checkout/featureB", "value": "false", "modifiedIndex": 21, "createdIndex": 19}
        ],
        "modifiedIndex": 21,
        "createdIndex": 5
    }
}"#;

#[tokio::test]
async fn test_fetch_tree_requests_recursive_listing() {
    init_test_logging();
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/v2/keys/v1/toggles/checkout")
                .query_param("recursive", "true");
            then.status(200)
                .header("content-type", "application/json")
                .body(TREE_BODY);
        })
        .await;

    let store = EtcdStore::new([server.base_url()]).unwrap();
    let tree = store.fetch_tree("/v1/toggles/checkout").await.unwrap();

    mock.assert_async().await;
    assert!(tree.dir);
    let leaves = tree.leaves();
    assert_eq!(leaves.len(), 2);
    assert_eq!(leaves[0].key, "/v1/toggles/checkout/featureA");
    assert_eq!(leaves[0].value.as_deref(), Some("true"));
}

#[tokio::test]
async fn test_store_error_body_is_mapped() {
    init_test_logging();
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/v2/keys/v1/toggles/missing");
            then.status(404)
                .header("content-type", "application/json")
                .body(r#"{"errorCode": 100, "message": "Key not found", "cause": "/v1/toggles/missing", "index": 42}"#);
        })
        .await;

    let store = EtcdStore::new([server.base_url()]).unwrap();
    let err = store.fetch_tree("/v1/toggles/missing").await.unwrap_err();

    match err {
        StoreError::Store {
            code,
            message,
            cause,
        } => {
            assert_eq!(code, 100);
            assert_eq!(message, "Key not found");
            assert_eq!(cause.as_deref(), Some("/v1/toggles/missing"));
        }
        other => panic!("expected StoreError::Store, got {other:?}"),
    }
}

#[tokio::test]
async fn test_non_store_error_status_is_mapped() {
    init_test_logging();
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/v2/keys/v1/toggles/checkout");
            then.status(502).body("bad gateway");
        })
        .await;

    let store = EtcdStore::new([server.base_url()]).unwrap();
    let err = store.fetch_tree("/v1/toggles/checkout").await.unwrap_err();

    match err {
        StoreError::Store { code, .. } => assert_eq!(code, 502),
        other => panic!("expected StoreError::Store, got {other:?}"),
    }
}

#[tokio::test]
async fn test_transport_failure_falls_through_to_next_endpoint() {
    init_test_logging();
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/v2/keys/v1/toggles/checkout")
                .query_param("recursive", "true");
            then.status(200)
                .header("content-type", "application/json")
                .body(TREE_BODY);
        })
        .await;

    // Port 1 refuses connections; the gateway must move on to the live one.
    let store = EtcdStore::new(["http://127.0.0.1:1".to_string(), server.base_url()]).unwrap();
    let tree = store.fetch_tree("/v1/toggles/checkout").await.unwrap();

    mock.assert_async().await;
    assert_eq!(tree.leaves().len(), 2);
}

#[tokio::test]
async fn test_all_endpoints_unreachable_returns_last_error() {
    init_test_logging();
    let store = EtcdStore::new(["http://127.0.0.1:1", "http://127.0.0.1:2"]).unwrap();
    let err = store.fetch_tree("/v1/toggles/checkout").await.unwrap_err();
    assert!(matches!(err, StoreError::Transport(_)));
}

#[tokio::test]
async fn test_malformed_success_body_is_a_decode_error() {
    init_test_logging();
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/v2/keys/v1/toggles/checkout");
            then.status(200).body("not json");
        })
        .await;

    let store = EtcdStore::new([server.base_url()]).unwrap();
    let err = store.fetch_tree("/v1/toggles/checkout").await.unwrap_err();
    assert!(matches!(err, StoreError::Decode(_)));
}
