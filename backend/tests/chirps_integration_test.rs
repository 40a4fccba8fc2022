//! Integration tests for chirp endpoints

mod common;

use axum::http::StatusCode;
use common::TestApp;
use serde_json::{json, Value};

#[tokio::test]
async fn test_create_and_fetch_chirp() {
    let app = TestApp::new();
    let session = app.login_new_user().await;

    let (status, body) = app
        .post_bearer(
            "/api/chirps",
            &session.token,
            Some(json!({ "body": "This is a kerfuffle opinion I need to share with the world" })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let chirp: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(
        chirp["body"],
        "This is a **** opinion I need to share with the world"
    );
    assert_eq!(chirp["user_id"], session.user_id.as_str());

    let path = format!("/api/chirps/{}", chirp["id"].as_str().unwrap());
    let (status, body) = app.get(&path).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(serde_json::from_str::<Value>(&body).unwrap()["id"], chirp["id"]);
}

#[tokio::test]
async fn test_chirp_too_long() {
    let app = TestApp::new();
    let session = app.login_new_user().await;

    let (status, body) = app
        .post_bearer(
            "/api/chirps",
            &session.token,
            Some(json!({ "body": "a".repeat(141) })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.contains("Chirp is too long"));
}

#[tokio::test]
async fn test_list_chirps_in_creation_order() {
    let app = TestApp::new();
    let session = app.login_new_user().await;

    for body in ["first", "second", "third"] {
        let (status, _) = app
            .post_bearer("/api/chirps", &session.token, Some(json!({ "body": body })))
            .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, body) = app.get("/api/chirps").await;
    assert_eq!(status, StatusCode::OK);

    let chirps: Vec<Value> = serde_json::from_str(&body).unwrap();
    let bodies: Vec<&str> = chirps.iter().map(|c| c["body"].as_str().unwrap()).collect();
    assert_eq!(bodies, vec!["first", "second", "third"]);
}

#[tokio::test]
async fn test_get_missing_chirp() {
    let app = TestApp::new();
    let (status, _) = app
        .get(&format!("/api/chirps/{}", uuid::Uuid::new_v4()))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_requires_ownership() {
    let app = TestApp::new();
    let author = app.login_new_user().await;
    let other = app.login_new_user().await;

    let (_, body) = app
        .post_bearer("/api/chirps", &author.token, Some(json!({ "body": "mine" })))
        .await;
    let chirp: Value = serde_json::from_str(&body).unwrap();
    let path = format!("/api/chirps/{}", chirp["id"].as_str().unwrap());

    let (status, _) = app.delete_bearer(&path, &other.token).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app.request("DELETE", &path, None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = app.delete_bearer(&path, &author.token).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = app.get(&path).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
