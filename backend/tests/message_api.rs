//! End-to-end HTTP tests: handlers, auth extractor, message service, and the
//! in-memory scan store wired together the way the server assembles them.

use std::sync::Arc;

use actix_web::http::{StatusCode, header};
use actix_web::{App, test, web};
use geonote::domain::ports::FixtureTokenVerifier;
use geonote::domain::{AuthenticatedUser, DisplayName, NearbyPolicy, UserId};
use geonote::inbound::http::messages::{delete_message, nearby_messages, post_message};
use geonote::inbound::http::state::HttpState;
use geonote::outbound::memory::MemoryScanStore;
use geonote::server::build_http_state;
use serde_json::{Value, json};

mod support;

const ALICE_TOKEN: &str = "alice-token";
const BOB_TOKEN: &str = "bob-token";

fn user(name: &str) -> AuthenticatedUser {
    AuthenticatedUser {
        user_id: UserId::random(),
        display_name: DisplayName::new(name).expect("valid name"),
    }
}

fn app_state() -> web::Data<HttpState> {
    let verifier = FixtureTokenVerifier::default()
        .with_token(ALICE_TOKEN, user("Alice"))
        .with_token(BOB_TOKEN, user("Bob"));
    web::Data::new(build_http_state(
        Arc::new(MemoryScanStore::new()),
        NearbyPolicy::default(),
        Arc::new(verifier),
    ))
}

macro_rules! stack_app {
    ($state:expr) => {
        test::init_service(
            App::new().app_data($state.clone()).service(
                web::scope("/api/v1")
                    .service(post_message)
                    .service(nearby_messages)
                    .service(delete_message),
            ),
        )
        .await
    };
}

fn authorized(request: test::TestRequest, token: &str) -> test::TestRequest {
    request.insert_header((header::AUTHORIZATION, format!("Bearer {token}")))
}

fn post_body(content: &str, position: (f64, f64)) -> Value {
    json!({ "content": content, "latitude": position.0, "longitude": position.1 })
}

#[actix_web::test]
async fn posted_messages_come_back_from_nearby_newest_first() {
    let state = app_state();
    let app = stack_app!(state);

    for content in ["posted first", "posted second"] {
        let request = authorized(test::TestRequest::post(), ALICE_TOKEN)
            .uri("/api/v1/messages")
            .set_json(post_body(content, support::CENTER))
            .to_request();
        let response = test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::CREATED);
        tokio::time::sleep(std::time::Duration::from_millis(10)).await;
    }

    let request = authorized(test::TestRequest::get(), BOB_TOKEN)
        .uri("/api/v1/messages/nearby?latitude=52.52&longitude=13.405")
        .to_request();
    let response = test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = test::read_body_json(response).await;
    let contents: Vec<&str> = body["messages"]
        .as_array()
        .expect("messages array")
        .iter()
        .filter_map(|message| message["content"].as_str())
        .collect();
    assert_eq!(contents, vec!["posted second", "posted first"]);
}

#[actix_web::test]
async fn far_away_messages_stay_out_of_nearby_results() {
    let state = app_state();
    let app = stack_app!(state);

    let request = authorized(test::TestRequest::post(), ALICE_TOKEN)
        .uri("/api/v1/messages")
        .set_json(post_body("too far away", support::FAR))
        .to_request();
    assert_eq!(
        test::call_service(&app, request).await.status(),
        StatusCode::CREATED
    );

    let request = authorized(test::TestRequest::get(), ALICE_TOKEN)
        .uri("/api/v1/messages/nearby?latitude=52.52&longitude=13.405")
        .to_request();
    let response = test::call_service(&app, request).await;
    let body: Value = test::read_body_json(response).await;
    assert_eq!(body["messages"], json!([]));
}

#[actix_web::test]
async fn only_the_owner_may_delete_a_message() {
    let state = app_state();
    let app = stack_app!(state);

    let request = authorized(test::TestRequest::post(), ALICE_TOKEN)
        .uri("/api/v1/messages")
        .set_json(post_body("mine alone", support::CENTER))
        .to_request();
    let created: Value = test::call_and_read_body_json(&app, request).await;
    let id = created["id"].as_str().expect("created id").to_owned();

    let request = authorized(test::TestRequest::delete(), BOB_TOKEN)
        .uri(&format!("/api/v1/messages/{id}"))
        .to_request();
    let refused = test::call_service(&app, request).await;
    assert_eq!(refused.status(), StatusCode::FORBIDDEN);

    let request = authorized(test::TestRequest::delete(), ALICE_TOKEN)
        .uri(&format!("/api/v1/messages/{id}"))
        .to_request();
    let deleted = test::call_service(&app, request).await;
    assert_eq!(deleted.status(), StatusCode::OK);
    let body: Value = test::read_body_json(deleted).await;
    assert_eq!(body["id"].as_str(), Some(id.as_str()));

    let request = authorized(test::TestRequest::get(), ALICE_TOKEN)
        .uri("/api/v1/messages/nearby?latitude=52.52&longitude=13.405")
        .to_request();
    let response = test::call_service(&app, request).await;
    let body: Value = test::read_body_json(response).await;
    assert_eq!(body["messages"], json!([]));
}

#[actix_web::test]
async fn requests_without_a_token_are_rejected() {
    let state = app_state();
    let app = stack_app!(state);

    let request = test::TestRequest::get()
        .uri("/api/v1/messages/nearby?latitude=52.52&longitude=13.405")
        .to_request();
    let response = test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn out_of_range_coordinates_are_a_bad_request() {
    let state = app_state();
    let app = stack_app!(state);

    let request = authorized(test::TestRequest::post(), ALICE_TOKEN)
        .uri("/api/v1/messages")
        .set_json(post_body("off the map", (97.0, 13.405)))
        .to_request();
    let response = test::call_service(&app, request).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(response).await;
    assert_eq!(body["code"].as_str(), Some("invalid_request"));
    assert_eq!(body["details"]["field"].as_str(), Some("latitude"));
}

#[actix_web::test]
async fn oversized_content_is_a_bad_request() {
    let state = app_state();
    let app = stack_app!(state);

    let request = authorized(test::TestRequest::post(), ALICE_TOKEN)
        .uri("/api/v1/messages")
        .set_json(post_body(&"x".repeat(501), support::CENTER))
        .to_request();
    let response = test::call_service(&app, request).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(response).await;
    assert_eq!(body["details"]["field"].as_str(), Some("content"));
}
