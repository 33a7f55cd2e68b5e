// End-to-end tests of the HTTP surface, driving the router in-process.

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

use murmur_api::{AppStateInner, router};
use murmur_store::Store;

fn app() -> Router {
    router(AppStateInner::new(Store::new()))
}

async fn call(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn login(app: &Router, name: &str) -> String {
    let (status, body) = call(app, "POST", "/session", None, Some(json!({ "name": name }))).await;
    assert_eq!(status, StatusCode::CREATED);
    body["identifier"].as_str().unwrap().to_string()
}

async fn send(app: &Router, token: &str, conversation: &str, content: &str) -> Value {
    let (status, body) = call(
        app,
        "POST",
        &format!("/conversations/{}/messages", conversation),
        Some(token),
        Some(json!({ "content": content })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body
}

fn contents(conversation: &Value) -> Vec<&str> {
    conversation["messages"]
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["content"].as_str().unwrap())
        .collect()
}

#[tokio::test]
async fn health_is_public() {
    let app = app();
    let (status, body) = call(&app, "GET", "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "status": "ok" }));
}

#[tokio::test]
async fn login_is_idempotent_and_validated() {
    let app = app();
    let first = login(&app, "alice").await;
    let second = login(&app, "alice").await;
    assert_eq!(first, second);

    let (status, body) = call(&app, "POST", "/session", None, Some(json!({ "name": "al" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid username");

    let (status, _) = call(
        &app,
        "POST",
        "/session",
        None,
        Some(json!({ "name": "alice", "extra": true })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn protected_routes_require_a_known_bearer() {
    let app = app();
    let (status, body) = call(&app, "GET", "/conversations", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, json!({ "error": "Unauthorized" }));

    let (status, _) = call(&app, "GET", "/conversations", Some("not-a-user"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let id = login(&app, "alice").await;
    let request = Request::builder()
        .uri("/conversations")
        .header(header::AUTHORIZATION, format!("Basic {}", id))
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let (status, body) = call(&app, "GET", "/conversations", Some(&id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "conversations": [] }));
}

#[tokio::test]
async fn username_changes() {
    let app = app();
    let alice = login(&app, "alice").await;
    login(&app, "bob").await;

    let (status, body) = call(&app, "POST", "/user/username", Some(&alice), Some(json!({ "name": "bob" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Username 'bob' is already taken");

    let (status, body) = call(&app, "POST", "/user/username", Some(&alice), Some(json!({ "name": "alice" }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "message": "OK" }));

    // Accepted by login, refused by the stricter rename rule.
    let (status, _) = call(&app, "POST", "/user/username", Some(&alice), Some(json!({ "name": "al ice" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = call(&app, "POST", "/user/username", Some(&alice), Some(json!({ "name": "alicia" }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(login(&app, "alicia").await, alice);
    assert_ne!(login(&app, "alice").await, alice);
}

#[tokio::test]
async fn two_users_chat_in_one_conversation() {
    let app = app();
    let alice = login(&app, "alice").await;
    let bob = login(&app, "bob").await;

    let hi = send(&app, &alice, "c1", "hi").await;
    assert_eq!(hi["conversationId"], "c1");
    assert_eq!(hi["sender"], alice.as_str());
    assert_eq!(hi["type"], "text");
    assert_eq!(hi["status"], "delivered");
    assert!(hi["messageId"].as_str().unwrap().starts_with("msg_"));

    let (status, _) = call(&app, "POST", "/groups/c1/members", Some(&alice), Some(json!({ "id": &bob }))).await;
    assert_eq!(status, StatusCode::OK);
    send(&app, &bob, "c1", "yo").await;

    let (status, body) = call(&app, "GET", "/conversations/c1", Some(&alice), None).await;
    assert_eq!(status, StatusCode::OK);
    let conversation = &body["conversation"];
    assert_eq!(contents(conversation), vec!["hi", "yo"]);
    assert_eq!(conversation["lastMessage"], "yo");
    assert_eq!(conversation["participants"], json!([&alice, &bob]));

    let (_, listing) = call(&app, "GET", "/conversations", Some(&bob), None).await;
    let summaries = listing["conversations"].as_array().unwrap();
    assert_eq!(summaries.len(), 1);
    assert_eq!(summaries[0]["id"], "c1");
    assert!(summaries[0].get("messages").is_none());
}

#[tokio::test]
async fn message_type_is_kept() {
    let app = app();
    let alice = login(&app, "alice").await;
    let (status, body) = call(
        &app,
        "POST",
        "/conversations/c1/messages",
        Some(&alice),
        Some(json!({ "content": "https://img/cat.png", "type": "image" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["type"], "image");

    let (status, _) = call(
        &app,
        "POST",
        "/conversations/c1/messages",
        Some(&alice),
        Some(json!({ "content": "   " })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn foreign_and_missing_conversations_are_indistinguishable() {
    let app = app();
    let alice = login(&app, "alice").await;
    let mallory = login(&app, "mallory").await;
    send(&app, &alice, "c1", "secret").await;

    let hidden = call(&app, "GET", "/conversations/c1", Some(&mallory), None).await;
    let missing = call(&app, "GET", "/conversations/nope", Some(&mallory), None).await;
    assert_eq!(hidden.0, StatusCode::NOT_FOUND);
    assert_eq!(hidden, missing);
}

#[tokio::test]
async fn forwarding_creates_the_destination() {
    let app = app();
    let alice = login(&app, "alice").await;
    let bob = login(&app, "bob").await;
    let original = send(&app, &alice, "c1", "x").await;
    let message_id = original["messageId"].as_str().unwrap();

    let (status, copy) = call(
        &app,
        "POST",
        &format!("/messages/{}/forward", message_id),
        Some(&bob),
        Some(json!({ "conversationId": "c2" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_ne!(copy["messageId"], original["messageId"]);
    assert_eq!(copy["sender"], bob.as_str());
    assert_eq!(copy["content"], "x");
    assert_eq!(copy["conversationId"], "c2");

    let (_, body) = call(&app, "GET", "/conversations/c2", Some(&bob), None).await;
    assert_eq!(body["conversation"]["participants"], json!([&bob]));
    assert_eq!(contents(&body["conversation"]), vec!["x"]);

    let (_, body) = call(&app, "GET", "/conversations/c1", Some(&alice), None).await;
    assert_eq!(body["conversation"]["messages"][0]["sender"], alice.as_str());

    let (status, _) = call(
        &app,
        "POST",
        "/messages/msg_unknown/forward",
        Some(&bob),
        Some(json!({ "conversationId": "c2" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = call(
        &app,
        "POST",
        &format!("/messages/{}/forward", message_id),
        Some(&bob),
        Some(json!({})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn forwarding_into_an_existing_conversation_moves_its_summary() {
    let app = app();
    let alice = login(&app, "alice").await;
    let bob = login(&app, "bob").await;
    send(&app, &alice, "c1", "a").await;
    let from_bob = send(&app, &bob, "c2", "b").await;
    let uri = format!("/messages/{}/forward", from_bob["messageId"].as_str().unwrap());

    let (status, _) = call(&app, "POST", &uri, Some(&alice), Some(json!({ "conversationId": "c1" }))).await;
    assert_eq!(status, StatusCode::OK);
    let (_, body) = call(&app, "GET", "/conversations/c1", Some(&alice), None).await;
    assert_eq!(body["conversation"]["lastMessage"], "b");

    send(&app, &alice, "c1", "c").await;
    let (_, body) = call(&app, "GET", "/conversations/c1", Some(&alice), None).await;
    assert_eq!(body["conversation"]["lastMessage"], "c");

    for _ in 0..2 {
        let (status, _) = call(&app, "POST", &uri, Some(&bob), Some(json!({ "conversationId": "c1" }))).await;
        assert_eq!(status, StatusCode::OK);
    }
    let (_, body) = call(&app, "GET", "/conversations/c1", Some(&bob), None).await;
    assert_eq!(body["conversation"]["participants"], json!([&alice, &bob]));
    assert_eq!(contents(&body["conversation"]), vec!["a", "b", "c", "b", "b"]);
}

#[tokio::test]
async fn oversized_bodies_are_rejected_with_413() {
    let app = app();
    let alice = login(&app, "alice").await;

    let (status, body) = call(
        &app,
        "POST",
        "/conversations/c1/messages",
        Some(&alice),
        Some(json!({ "content": "x".repeat(70_000) })),
    )
    .await;
    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    assert!(body["error"].is_string());

    // Nothing was stored.
    let (status, _) = call(&app, "GET", "/conversations/c1", Some(&alice), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn reactions_can_be_added_and_removed_once() {
    let app = app();
    let alice = login(&app, "alice").await;
    let message = send(&app, &alice, "c1", "x").await;
    let message_id = message["messageId"].as_str().unwrap();

    let (status, body) = call(
        &app,
        "POST",
        &format!("/messages/{}/reactions", message_id),
        Some(&alice),
        Some(json!({ "reaction": "👍" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let reaction_id = body["reactionId"].as_str().unwrap().to_string();

    let (_, body) = call(&app, "GET", "/conversations/c1", Some(&alice), None).await;
    let reactions = &body["conversation"]["messages"][0]["reactions"];
    assert_eq!(reactions[0]["reactionId"], reaction_id.as_str());
    assert_eq!(reactions[0]["reaction"], "👍");

    let uri = format!("/messages/{}/reactions/{}", message_id, reaction_id);
    let (status, _) = call(&app, "DELETE", &uri, Some(&alice), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = call(&app, "DELETE", &uri, Some(&alice), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = call(
        &app,
        "POST",
        "/messages/msg_unknown/reactions",
        Some(&alice),
        Some(json!({ "reaction": "👍" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn any_user_may_delete_any_message() {
    let app = app();
    let alice = login(&app, "alice").await;
    let bob = login(&app, "bob").await;
    let message = send(&app, &alice, "c1", "oops").await;
    let uri = format!("/messages/{}", message["messageId"].as_str().unwrap());

    let (status, body) = call(&app, "DELETE", &uri, Some(&bob), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(body, Value::Null);

    let (status, _) = call(&app, "DELETE", &uri, Some(&bob), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, body) = call(&app, "GET", "/conversations/c1", Some(&alice), None).await;
    assert!(contents(&body["conversation"]).is_empty());
}

#[tokio::test]
async fn group_management() {
    let app = app();
    let alice = login(&app, "alice").await;
    let bob = login(&app, "bob").await;

    let (status, _) = call(&app, "POST", "/groups/g1/name", Some(&alice), Some(json!({ "name": "Friends" }))).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = call(&app, "POST", "/groups/g1/name", Some(&alice), Some(json!({ "name": "ab" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = call(
        &app,
        "POST",
        "/groups/g1/photo",
        Some(&alice),
        Some(json!({ "mediaUrl": "https://img/g1.png" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    call(&app, "POST", "/groups/g1/members", Some(&alice), Some(json!({ "id": &bob }))).await;

    let (_, listing) = call(&app, "GET", "/conversations", Some(&bob), None).await;
    let group = &listing["conversations"][0];
    assert_eq!(group["name"], "Friends");
    assert_eq!(group["photo"], "https://img/g1.png");
    assert_eq!(group["participants"], json!([&alice, &bob]));

    let (status, _) = call(&app, "POST", "/groups/g1/leave", Some(&bob), None).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = call(&app, "POST", "/groups/g1/leave", Some(&bob), None).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = call(&app, "GET", "/conversations/g1", Some(&bob), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = call(&app, "POST", "/groups/unknown/leave", Some(&bob), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn user_photo_requires_a_url() {
    let app = app();
    let alice = login(&app, "alice").await;

    let (status, body) = call(&app, "POST", "/user/photo", Some(&alice), Some(json!({ "mediaUrl": "https://img/a.png" }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "OK");

    let (status, _) = call(&app, "POST", "/user/photo", Some(&alice), Some(json!({ "mediaUrl": "" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = call(&app, "POST", "/user/photo", Some(&alice), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
