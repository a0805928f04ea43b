//! Contact API Tests

use axum::http::StatusCode;
use bson::oid::ObjectId;
use pretty_assertions::assert_eq;
use serde_json::json;

use crate::common::TestApp;

#[tokio::test]
async fn test_add_contact_is_one_directional() {
    let app = TestApp::new();
    let (alice_id, alice) = app.signed_up("alice").await;
    let (bob_id, bob) = app.signed_up("bob").await;

    let response = app
        .put_json("/api/user/contact/add", json!({ "username": "bob" }), &alice)
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.json(), json!({}));

    let (alice_oid, bob_oid) = (
        ObjectId::parse_str(&alice_id).unwrap(),
        ObjectId::parse_str(&bob_id).unwrap(),
    );
    assert!(app.store.user_named("alice").unwrap().has_contact(&bob_oid));
    assert!(!app.store.user_named("bob").unwrap().has_contact(&alice_oid));

    let alice_contacts = app.get("/api/user/contact/list/all", &alice).await.json();
    assert_eq!(alice_contacts.as_array().unwrap().len(), 1);
    assert_eq!(alice_contacts[0]["id"], bob_id);
    assert_eq!(alice_contacts[0]["name"], "bob");
    assert!(alice_contacts[0].get("hash").is_none());

    let bob_contacts = app.get("/api/user/contact/list/all", &bob).await.json();
    assert_eq!(bob_contacts, json!([]));
}

#[tokio::test]
async fn test_add_contact_twice_keeps_one_entry() {
    let app = TestApp::new();
    let (_, alice) = app.signed_up("alice").await;
    app.register("bob").await;

    for _ in 0..2 {
        let response = app
            .put_json("/api/user/contact/add", json!({ "username": "bob" }), &alice)
            .await;
        assert_eq!(response.status, StatusCode::OK);
    }

    assert_eq!(app.store.user_named("alice").unwrap().contacts.len(), 1);
}

#[tokio::test]
async fn test_add_unknown_contact_is_not_found() {
    let app = TestApp::new();
    let (_, alice) = app.signed_up("alice").await;

    let response = app
        .put_json("/api/user/contact/add", json!({ "username": "ghost" }), &alice)
        .await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_add_self_as_contact_is_rejected() {
    let app = TestApp::new();
    let (_, alice) = app.signed_up("alice").await;

    let response = app
        .put_json("/api/user/contact/add", json!({ "username": "alice" }), &alice)
        .await;

    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_contacts_are_sorted_and_paginated() {
    let app = TestApp::new();
    let (_, alice) = app.signed_up("alice").await;
    for name in ["dave", "bob", "carol"] {
        app.register(name).await;
        app.put_json("/api/user/contact/add", json!({ "username": name }), &alice)
            .await;
    }

    let names = |body: serde_json::Value| -> Vec<String> {
        body.as_array()
            .unwrap()
            .iter()
            .map(|u| u["name"].as_str().unwrap().to_string())
            .collect()
    };

    let all = app.get("/api/user/contact/list/all", &alice).await.json();
    assert_eq!(names(all), vec!["bob", "carol", "dave"]);

    let second_page = app
        .get("/api/user/contact/list?page=2&limit=2", &alice)
        .await
        .json();
    assert_eq!(names(second_page), vec!["dave"]);

    // Out of range values fall back to page 1, limit 10
    let clamped = app
        .get("/api/user/contact/list?page=-1&limit=500", &alice)
        .await
        .json();
    assert_eq!(names(clamped), vec!["bob", "carol", "dave"]);
}

#[tokio::test]
async fn test_contact_of_deleted_user_is_skipped() {
    let app = TestApp::new();
    let (_, alice) = app.signed_up("alice").await;
    app.register("bob").await;
    app.put_json("/api/user/contact/add", json!({ "username": "bob" }), &alice)
        .await;

    let ghost = ObjectId::new();
    app.store
        .users
        .lock()
        .unwrap()
        .iter_mut()
        .find(|u| u.name == "alice")
        .unwrap()
        .contacts
        .push(ghost);

    let contacts = app.get("/api/user/contact/list/all", &alice).await.json();
    assert_eq!(contacts.as_array().unwrap().len(), 1);
}
