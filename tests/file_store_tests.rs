// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Credentials persisted to disk survive a restart of the client.

use serde_json::json;
use video_client::store::TokenKey;
use video_client::AppContext;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

mod common;
use common::{auth_json, test_config, user_json};

#[tokio::test]
async fn test_session_restored_after_restart() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(auth_json("u@x.com", "acc", "ref")))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/auth/me"))
        .and(header("authorization", "Bearer acc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"user": user_json("u@x.com")})))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let config = test_config(&server).with_token_store_path(dir.path().join("credentials.json"));

    let first = AppContext::with_file_store(config.clone()).unwrap();
    first.session.login("u@x.com", "pw").await.unwrap();
    drop(first);

    let second = AppContext::with_file_store(config).unwrap();
    assert_eq!(second.store.read(TokenKey::Refresh).await.as_deref(), Some("ref"));
    second.session.restore().await;
    assert_eq!(second.session.current_user().unwrap().email, "u@x.com");
}
