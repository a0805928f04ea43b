//! Chat API Tests

use axum::http::{Method, StatusCode};
use bson::oid::ObjectId;
use pretty_assertions::assert_eq;
use serde_json::json;

use crate::common::TestApp;

#[tokio::test]
async fn test_new_chat_links_both_users() {
    let app = TestApp::new();
    let (alice_id, alice) = app.signed_up("alice").await;
    let (bob_id, _) = app.signed_up("bob").await;

    let response = app
        .put_json("/api/chat/new", json!({ "name": "lunch", "username": "bob" }), &alice)
        .await;

    assert_eq!(response.status, StatusCode::CREATED);
    let chat = response.json();
    assert_eq!(chat["name"], "lunch");
    assert_eq!(chat["users"], json!([alice_id, bob_id]));
    assert_eq!(chat["lastMessage"], serde_json::Value::Null);

    let chat_id = ObjectId::parse_str(chat["id"].as_str().unwrap()).unwrap();
    assert!(app.store.user_named("alice").unwrap().is_in_chat(&chat_id));
    assert!(app.store.user_named("bob").unwrap().is_in_chat(&chat_id));
}

#[tokio::test]
async fn test_new_chat_is_idempotent_in_either_direction() {
    let app = TestApp::new();
    let (_, alice) = app.signed_up("alice").await;
    let (_, bob) = app.signed_up("bob").await;

    let first = app.new_chat(&alice, "bob").await;
    let again = app.new_chat(&alice, "bob").await;
    let swapped = app.new_chat(&bob, "alice").await;

    assert_eq!(first, again);
    assert_eq!(first, swapped);
    assert_eq!(app.store.chats.lock().unwrap().len(), 1);
    assert_eq!(app.store.user_named("alice").unwrap().chats.len(), 1);
}

#[tokio::test]
async fn test_new_chat_with_unknown_user_is_not_found() {
    let app = TestApp::new();
    let (_, alice) = app.signed_up("alice").await;

    let response = app
        .put_json("/api/chat/new", json!({ "name": "void", "username": "nonexistent" }), &alice)
        .await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert!(app.store.chats.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_new_chat_with_self_is_rejected() {
    let app = TestApp::new();
    let (_, alice) = app.signed_up("alice").await;

    let response = app
        .put_json("/api/chat/new", json!({ "name": "me", "username": "alice" }), &alice)
        .await;

    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_chat_list_shows_last_message_most_recent_first() {
    let app = TestApp::new();
    let (_, alice) = app.signed_up("alice").await;
    app.register("bob").await;
    app.register("carol").await;

    let with_bob = app.new_chat(&alice, "bob").await;
    let with_carol = app.new_chat(&alice, "carol").await;

    tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    let sent = app.send(&alice, &with_bob, "hi bob").await;
    assert_eq!(sent.status, StatusCode::CREATED);

    let chats = app.get("/api/chat/list", &alice).await.json();
    let chats = chats.as_array().unwrap();
    assert_eq!(chats.len(), 2);
    assert_eq!(chats[0]["id"], with_bob);
    assert_eq!(chats[0]["lastMessage"]["text"], "hi bob");
    assert_eq!(chats[0]["lastMessage"]["id"], sent.json()["id"]);
    assert_eq!(chats[1]["id"], with_carol);
    assert_eq!(chats[1]["lastMessage"], serde_json::Value::Null);

    let member_names = |chat: &serde_json::Value| -> Vec<String> {
        chat["users"]
            .as_array()
            .unwrap()
            .iter()
            .map(|u| u["name"].as_str().unwrap().to_string())
            .collect()
    };
    assert_eq!(member_names(&chats[0]), vec!["alice", "bob"]);
    assert_eq!(member_names(&chats[1]), vec!["alice", "carol"]);
    assert!(!serde_json::Value::Array(chats.clone()).to_string().contains("\"hash\""));

    let first_only = app.get("/api/chat/list?limit=1", &alice).await.json();
    assert_eq!(first_only.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_clear_chat_removes_messages_and_last_message() {
    let app = TestApp::new();
    let (_, alice) = app.signed_up("alice").await;
    let (_, bob) = app.signed_up("bob").await;
    let chat_id = app.new_chat(&alice, "bob").await;

    app.send(&alice, &chat_id, "one").await;
    app.send(&bob, &chat_id, "two").await;
    let oid = ObjectId::parse_str(&chat_id).unwrap();
    assert_eq!(app.store.message_count(oid), 2);

    let response = app
        .request(Method::DELETE, &format!("/api/chat/{}/clear", chat_id), None, Some(&alice))
        .await;
    assert_eq!(response.status, StatusCode::NO_CONTENT);

    assert_eq!(app.store.message_count(oid), 0);
    assert!(app.store.chat(oid).unwrap().last_message.is_none());

    let messages = app
        .get(&format!("/api/message/{}/list/all", chat_id), &alice)
        .await
        .json();
    assert_eq!(messages, json!([]));
}

#[tokio::test]
async fn test_clear_chat_requires_membership() {
    let app = TestApp::new();
    let (_, alice) = app.signed_up("alice").await;
    let (_, mallory) = app.signed_up("mallory").await;
    app.register("bob").await;
    let chat_id = app.new_chat(&alice, "bob").await;
    app.send(&alice, &chat_id, "private").await;

    let response = app
        .request(Method::DELETE, &format!("/api/chat/{}/clear", chat_id), None, Some(&mallory))
        .await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(app.store.message_count(ObjectId::parse_str(&chat_id).unwrap()), 1);
}

#[tokio::test]
async fn test_clear_chat_with_malformed_id() {
    let app = TestApp::new();
    let (_, alice) = app.signed_up("alice").await;

    let response = app
        .request(Method::DELETE, "/api/chat/not-an-id/clear", None, Some(&alice))
        .await;

    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
}
