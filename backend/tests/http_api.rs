//! End-to-end HTTP tests over the in-memory adapters.
//!
//! These run the same routing table as the server binary via
//! `configure_api` and talk to it exclusively through HTTP, so they cover
//! serialization, extraction, authorization, and error mapping together.

use actix_web::http::StatusCode;
use actix_web::{test, web, App};
use chrono::Duration;
use serde_json::{json, Value};
use uuid::Uuid;

use backend::domain::auth::AccessClaims;
use backend::domain::user::Role;
use backend::inbound::http::{configure_api, state::HttpState};

fn state() -> HttpState {
    HttpState::in_memory(
        b"integration-secret",
        Duration::minutes(15),
        Duration::days(14),
        4,
    )
}

macro_rules! api_app {
    ($state:expr) => {
        test::init_service(
            App::new()
                .app_data(web::Data::new($state.clone()))
                .configure(configure_api),
        )
        .await
    };
}

/// Register an account over HTTP and return the signup body.
macro_rules! signup {
    ($app:expr, $email:expr, $role:expr) => {{
        let response = test::call_service(
            &$app,
            test::TestRequest::post()
                .uri("/api/v1/users")
                .set_json(json!({
                    "username": $email.split('@').next().unwrap(),
                    "email": $email,
                    "password": "correct horse",
                    "role": $role,
                }))
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);
        let body: Value = test::read_body_json(response).await;
        body
    }};
}

fn access_token(signup_body: &Value) -> String {
    signup_body["tokens"]["access"]
        .as_str()
        .expect("access token")
        .to_owned()
}

fn user_id(signup_body: &Value) -> Uuid {
    signup_body["user"]["id"]
        .as_str()
        .and_then(|raw| Uuid::parse_str(raw).ok())
        .expect("user id")
}

fn bearer(token: &str) -> (&'static str, String) {
    ("Authorization", format!("Bearer {token}"))
}

#[actix_web::test]
async fn catalogue_crud_round_trip() {
    let state = state();
    let app = api_app!(state);
    let editor = signup!(app, "editor@example.com", "editor");
    let token = access_token(&editor);

    // Create with nested pages supplied out of order.
    let response = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/books")
            .insert_header(bearer(&token))
            .set_json(json!({
                "title": "Dune",
                "author": "Frank Herbert",
                "pages": [
                    { "pageNumber": 2, "content": "second" },
                    { "pageNumber": 1, "content": "first" },
                ],
            }))
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let created: Value = test::read_body_json(response).await;
    assert_eq!(created["title"], "Dune");
    assert_eq!(created["pages"][0]["pageNumber"], 1);
    assert_eq!(created["pages"][1]["pageNumber"], 2);
    let book_id = created["id"].as_str().expect("book id").to_owned();

    let response = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/api/v1/books")
            .insert_header(bearer(&token))
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let listing: Value = test::read_body_json(response).await;
    assert_eq!(listing["count"], 1);
    assert_eq!(listing["results"][0]["id"].as_str(), Some(book_id.as_str()));

    // Append a page through the nested collection.
    let response = test::call_service(
        &app,
        test::TestRequest::post()
            .uri(&format!("/api/v1/books/{book_id}/pages"))
            .insert_header(bearer(&token))
            .set_json(json!({ "pageNumber": 3, "content": "third" }))
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    // A second page 3 collides.
    let response = test::call_service(
        &app,
        test::TestRequest::post()
            .uri(&format!("/api/v1/books/{book_id}/pages"))
            .insert_header(bearer(&token))
            .set_json(json!({ "pageNumber": 3, "content": "again" }))
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let response = test::call_service(
        &app,
        test::TestRequest::get()
            .uri(&format!("/api/v1/books/{book_id}/pages"))
            .insert_header(bearer(&token))
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let pages: Value = test::read_body_json(response).await;
    assert_eq!(pages["count"], 3);
    assert_eq!(pages["results"][2]["pageNumber"], 3);

    let response = test::call_service(
        &app,
        test::TestRequest::put()
            .uri(&format!("/api/v1/books/{book_id}"))
            .insert_header(bearer(&token))
            .set_json(json!({ "title": "Dune Messiah", "author": "Frank Herbert" }))
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let updated: Value = test::read_body_json(response).await;
    assert_eq!(updated["title"], "Dune Messiah");

    let response = test::call_service(
        &app,
        test::TestRequest::delete()
            .uri(&format!("/api/v1/books/{book_id}"))
            .insert_header(bearer(&token))
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    // The catalogue is empty again, which lists as 204.
    let response = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/api/v1/books")
            .insert_header(bearer(&token))
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
}

#[actix_web::test]
async fn catalogue_requires_authentication_and_editor_role() {
    let state = state();
    let app = api_app!(state);

    let response = test::call_service(
        &app,
        test::TestRequest::get().uri("/api/v1/books").to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body: Value = test::read_body_json(response).await;
    assert_eq!(body["code"], "unauthorized");

    let reader = signup!(app, "reader@example.com", "reader");
    let token = access_token(&reader);

    let response = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/books")
            .insert_header(bearer(&token))
            .set_json(json!({ "title": "Nope", "author": "Nobody" }))
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let body: Value = test::read_body_json(response).await;
    assert_eq!(body["code"], "forbidden");

    // Reads stay open to readers.
    let response = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/api/v1/books")
            .insert_header(bearer(&token))
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
}

#[actix_web::test]
async fn login_and_logout_lifecycle() {
    let state = state();
    let app = api_app!(state);
    let signup_body = signup!(app, "casey@example.com", "reader");

    // Duplicate registration is rejected.
    let response = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/users")
            .set_json(json!({
                "username": "casey2",
                "email": "casey@example.com",
                "password": "correct horse",
            }))
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let response = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/users/login")
            .set_json(json!({ "email": "casey@example.com", "password": "correct horse" }))
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let tokens: Value = test::read_body_json(response).await;
    let refresh = tokens["refresh"].as_str().expect("refresh token").to_owned();

    let response = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/users/login")
            .set_json(json!({ "email": "casey@example.com", "password": "wrong" }))
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(response).await;
    assert_eq!(body["message"], "invalid credentials");

    let response = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/users/login")
            .set_json(json!({ "email": "nobody@example.com", "password": "correct horse" }))
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(response).await;
    assert_eq!(body["message"], "user not found");

    // Revocation succeeds once.
    let access = access_token(&signup_body);
    for expected in [StatusCode::OK, StatusCode::BAD_REQUEST] {
        let response = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/v1/users/logout")
                .insert_header(bearer(&access))
                .set_json(json!({ "refresh": refresh }))
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), expected);
    }
}

#[actix_web::test]
async fn user_management_visibility_rules() {
    let state = state();
    let app = api_app!(state);
    let casey = signup!(app, "casey@example.com", "reader");
    let robin = signup!(app, "robin@example.com", "editor");
    let casey_token = access_token(&casey);
    let casey_id = user_id(&casey);
    let robin_id = user_id(&robin);

    // The collection is closed to regular accounts.
    let response = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/api/v1/users")
            .insert_header(bearer(&casey_token))
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // Signup never grants the staff flag; staff-only access is exercised
    // with a directly issued token.
    let staff_token = state
        .tokens
        .issue_access(&AccessClaims {
            user_id: casey_id,
            role: Role::Reader,
            is_staff: true,
        })
        .expect("issued");

    let response = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/api/v1/users")
            .insert_header(bearer(&staff_token))
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let listing: Value = test::read_body_json(response).await;
    assert_eq!(listing["count"], 2);
    assert!(listing["results"][0].get("passwordHash").is_none());

    // A record is visible to its owner but not to other accounts.
    let response = test::call_service(
        &app,
        test::TestRequest::get()
            .uri(&format!("/api/v1/users/{casey_id}"))
            .insert_header(bearer(&casey_token))
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = test::call_service(
        &app,
        test::TestRequest::get()
            .uri(&format!("/api/v1/users/{robin_id}"))
            .insert_header(bearer(&casey_token))
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // Updates are strictly self-service, even for staff.
    let response = test::call_service(
        &app,
        test::TestRequest::put()
            .uri(&format!("/api/v1/users/{robin_id}"))
            .insert_header(bearer(&staff_token))
            .set_json(json!({ "username": "hijacked" }))
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = test::call_service(
        &app,
        test::TestRequest::put()
            .uri(&format!("/api/v1/users/{casey_id}"))
            .insert_header(bearer(&casey_token))
            .set_json(json!({ "username": "casey-renamed" }))
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let updated: Value = test::read_body_json(response).await;
    assert_eq!(updated["username"], "casey-renamed");

    // Deletion is staff-only.
    let response = test::call_service(
        &app,
        test::TestRequest::delete()
            .uri(&format!("/api/v1/users/{robin_id}"))
            .insert_header(bearer(&casey_token))
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = test::call_service(
        &app,
        test::TestRequest::delete()
            .uri(&format!("/api/v1/users/{robin_id}"))
            .insert_header(bearer(&staff_token))
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
}
