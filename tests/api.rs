use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode, header},
};
use serde_json::{Value, json};
use tower::ServiceExt; // for `app.oneshot()`

use flashcards_app::auth::{JwtConfig, create_admin};
use flashcards_app::models::SchedulerConfig;
use flashcards_app::{AppState, Store, router};

const PASSWORD: &str = "password123";

struct TestApp {
    app: Router,
    state: AppState,
}

impl TestApp {
    fn new() -> Self {
        let store = Store::open_in_memory().expect("in-memory store");
        let state = AppState::new(
            store,
            JwtConfig::new("integration-test-secret-0123456789"),
            SchedulerConfig::default(),
        );
        Self {
            app: router(state.clone()),
            state,
        }
    }

    async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string())),
            None => builder.body(Body::empty()),
        }
        .unwrap();

        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, json)
    }

    async fn register(&self, email: &str) -> (StatusCode, Value) {
        self.send(
            Method::POST,
            "/api/auth/register",
            None,
            Some(json!({ "email": email, "password": PASSWORD })),
        )
        .await
    }

    /// Logs in and returns the session payload (tokens and user)
    async fn login(&self, email: &str) -> Value {
        let (status, body) = self
            .send(
                Method::POST,
                "/api/auth/login",
                None,
                Some(json!({ "email": email, "password": PASSWORD })),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "login failed: {body}");
        body["data"].clone()
    }

    async fn user_token(&self, email: &str) -> String {
        let (status, _) = self.register(email).await;
        assert_eq!(status, StatusCode::CREATED);
        access_token(&self.login(email).await)
    }

    async fn admin_token(&self, email: &str) -> (i64, String) {
        let admin = create_admin(&self.state.store, email, PASSWORD).unwrap();
        (admin.id, access_token(&self.login(email).await))
    }

    async fn create_card(&self, token: &str, front: &str, back: &str) -> Value {
        let (status, body) = self
            .send(
                Method::POST,
                "/api/flashcards",
                Some(token),
                Some(json!({ "front": front, "back": back })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "create failed: {body}");
        body["data"].clone()
    }
}

fn access_token(session: &Value) -> String {
    session["access_token"].as_str().unwrap().to_string()
}

fn assert_error(body: &Value, code: &str) {
    assert_eq!(body["success"], json!(false), "body: {body}");
    assert_eq!(body["error"], json!(code), "body: {body}");
    assert!(body["message"].is_string());
}

#[tokio::test]
async fn test_health() {
    let app = TestApp::new();
    let response = app
        .app
        .clone()
        .oneshot(Request::builder().uri("/healthz").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_register_and_me() {
    let app = TestApp::new();
    let (status, body) = app.register("Ada@Example.org").await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["data"]["email"], json!("ada@example.org"));
    assert_eq!(body["data"]["role"], json!("user"));
    assert!(body["data"].get("password_hash").is_none());

    let token = access_token(&app.login("ada@example.org").await);
    let (status, body) = app.send(Method::GET, "/api/users/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["email"], json!("ada@example.org"));
}

#[tokio::test]
async fn test_register_same_email_twice_is_duplicate() {
    let app = TestApp::new();
    assert_eq!(app.register("ada@example.org").await.0, StatusCode::CREATED);

    let (status, body) = app.register("ada@example.org").await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_error(&body, "DUPLICATE_EMAIL");
}

#[tokio::test]
async fn test_register_validation_lists_fields() {
    let app = TestApp::new();
    let (status, body) = app
        .send(
            Method::POST,
            "/api/auth/register",
            None,
            Some(json!({ "email": "not-an-email", "password": "short" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_error(&body, "VALIDATION_ERROR");
    let fields: Vec<&str> = body["fields"]
        .as_array()
        .unwrap()
        .iter()
        .map(|f| f["field"].as_str().unwrap())
        .collect();
    assert_eq!(fields, vec!["email", "password"]);
}

#[tokio::test]
async fn test_malformed_body_is_validation_error() {
    let app = TestApp::new();
    let (status, body) = app
        .send(
            Method::POST,
            "/api/auth/register",
            None,
            Some(json!({ "email": "ada@example.org" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_error(&body, "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_login_wrong_password() {
    let app = TestApp::new();
    app.register("ada@example.org").await;
    let (status, body) = app
        .send(
            Method::POST,
            "/api/auth/login",
            None,
            Some(json!({ "email": "ada@example.org", "password": "wrong-password" })),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_error(&body, "INVALID_CREDENTIALS");
}

#[tokio::test]
async fn test_login_unknown_email_matches_wrong_password() {
    let app = TestApp::new();
    let (status, body) = app
        .send(
            Method::POST,
            "/api/auth/login",
            None,
            Some(json!({ "email": "nobody@example.org", "password": PASSWORD })),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_error(&body, "INVALID_CREDENTIALS");
}

#[tokio::test]
async fn test_missing_or_bad_token_is_unauthorized() {
    let app = TestApp::new();
    let (status, body) = app.send(Method::GET, "/api/flashcards", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_error(&body, "UNAUTHORIZED");

    let (status, _) = app
        .send(Method::GET, "/api/flashcards", Some("garbage"), None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_refresh_token_flow() {
    let app = TestApp::new();
    app.register("ada@example.org").await;
    let session = app.login("ada@example.org").await;
    let refresh_token = session["refresh_token"].as_str().unwrap();

    // A refresh token is not an access token
    let (status, _) = app
        .send(Method::GET, "/api/users/me", Some(refresh_token), None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = app
        .send(
            Method::POST,
            "/api/auth/refresh",
            None,
            Some(json!({ "refresh_token": refresh_token })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    let fresh = access_token(&body["data"]);
    let (status, _) = app.send(Method::GET, "/api/users/me", Some(&fresh), None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_logout_revokes_tokens() {
    let app = TestApp::new();
    let token = app.user_token("ada@example.org").await;

    let (status, _) = app
        .send(Method::POST, "/api/auth/logout", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app.send(Method::GET, "/api/users/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_change_password() {
    let app = TestApp::new();
    let token = app.user_token("ada@example.org").await;

    let (status, body) = app
        .send(
            Method::PUT,
            "/api/users/me/password",
            Some(&token),
            Some(json!({ "current_password": PASSWORD, "new_password": "another-password" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    let fresh = access_token(&body["data"]);

    let (status, _) = app.send(Method::GET, "/api/users/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    let (status, _) = app.send(Method::GET, "/api/users/me", Some(&fresh), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app
        .send(
            Method::POST,
            "/api/auth/login",
            None,
            Some(json!({ "email": "ada@example.org", "password": "another-password" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_update_email_conflict() {
    let app = TestApp::new();
    app.register("taken@example.org").await;
    let token = app.user_token("ada@example.org").await;

    let (status, body) = app
        .send(
            Method::PUT,
            "/api/users/me",
            Some(&token),
            Some(json!({ "email": "TAKEN@example.org" })),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_error(&body, "DUPLICATE_EMAIL");

    let (status, body) = app
        .send(
            Method::PUT,
            "/api/users/me",
            Some(&token),
            Some(json!({ "email": "ada.l@example.org" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["email"], json!("ada.l@example.org"));
}

#[tokio::test]
async fn test_flashcard_crud() {
    let app = TestApp::new();
    let token = app.user_token("ada@example.org").await;

    let card = app.create_card(&token, "cześć", "hello").await;
    let id = card["id"].as_i64().unwrap();
    assert_eq!(card["deck"], json!("default"));
    assert_eq!(card["difficulty"], json!("medium"));
    assert_eq!(card["review"]["repetitions"], json!(0));
    assert_eq!(card["review"]["ease_factor"], json!(2.5));

    let uri = format!("/api/flashcards/{id}");
    let (status, body) = app
        .send(
            Method::PUT,
            &uri,
            Some(&token),
            Some(json!({ "back": "hi", "difficulty": "easy" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["front"], json!("cześć"));
    assert_eq!(body["data"]["back"], json!("hi"));
    assert_eq!(body["data"]["difficulty"], json!("easy"));

    let (status, body) = app.send(Method::GET, "/api/flashcards", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 1);

    let (status, _) = app.send(Method::DELETE, &uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    let (status, body) = app.send(Method::GET, &uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_error(&body, "FLASHCARD_NOT_FOUND");
}

#[tokio::test]
async fn test_flashcard_validation() {
    let app = TestApp::new();
    let token = app.user_token("ada@example.org").await;
    let (status, body) = app
        .send(
            Method::POST,
            "/api/flashcards",
            Some(&token),
            Some(json!({ "front": "  ", "back": "ok" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_error(&body, "VALIDATION_ERROR");
    assert_eq!(body["fields"][0]["field"], json!("front"));
}

#[tokio::test]
async fn test_users_cannot_touch_each_others_cards() {
    let app = TestApp::new();
    let alice = app.user_token("alice@example.org").await;
    let bob = app.user_token("bob@example.org").await;

    let card = app.create_card(&alice, "secret", "answer").await;
    let uri = format!("/api/flashcards/{}", card["id"]);

    for method in [Method::GET, Method::DELETE] {
        let (status, body) = app.send(method, &uri, Some(&bob), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_error(&body, "FLASHCARD_NOT_FOUND");
    }
    let (status, _) = app
        .send(
            Method::POST,
            &format!("{uri}/review"),
            Some(&bob),
            Some(json!({ "quality": 5 })),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, body) = app.send(Method::GET, "/api/flashcards", Some(&bob), None).await;
    assert!(body["data"].as_array().unwrap().is_empty());

    let alice_id = card["user_id"].as_i64().unwrap();
    let (status, body) = app
        .send(
            Method::GET,
            &format!("/api/flashcards?user_id={alice_id}"),
            Some(&bob),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_error(&body, "FORBIDDEN");

    let (status, _) = app.send(Method::GET, &uri, Some(&alice), None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_admin_can_read_any_card() {
    let app = TestApp::new();
    let alice = app.user_token("alice@example.org").await;
    let (_, admin) = app.admin_token("root@example.org").await;

    let card = app.create_card(&alice, "front", "back").await;
    let (status, _) = app
        .send(
            Method::GET,
            &format!("/api/flashcards/{}", card["id"]),
            Some(&admin),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app
        .send(
            Method::GET,
            &format!("/api/flashcards?user_id={}", card["user_id"]),
            Some(&admin),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_admin_can_modify_any_card() {
    let app = TestApp::new();
    let alice = app.user_token("alice@example.org").await;
    let (_, admin) = app.admin_token("root@example.org").await;

    let card = app.create_card(&alice, "front", "back").await;
    let uri = format!("/api/flashcards/{}", card["id"]);

    let (status, body) = app
        .send(Method::PUT, &uri, Some(&admin), Some(json!({ "back": "fixed" })))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["back"], json!("fixed"));
    assert_eq!(body["data"]["user_id"], card["user_id"]);

    let (status, body) = app
        .send(
            Method::POST,
            &format!("{uri}/review"),
            Some(&admin),
            Some(json!({ "quality": 5 })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["review"]["repetitions"], json!(1));

    let (status, _) = app.send(Method::DELETE, &uri, Some(&admin), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app.send(Method::GET, &uri, Some(&alice), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_malformed_path_and_query_use_error_envelope() {
    let app = TestApp::new();
    let (_, admin) = app.admin_token("root@example.org").await;

    for uri in [
        "/api/flashcards/abc",
        "/api/flashcards?user_id=abc",
        "/api/admin/users/xyz",
    ] {
        let (status, body) = app.send(Method::GET, uri, Some(&admin), None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "uri: {uri}");
        assert_error(&body, "VALIDATION_ERROR");
    }
}

#[tokio::test]
async fn test_review_pass_then_fail() {
    let app = TestApp::new();
    let token = app.user_token("ada@example.org").await;
    let card = app.create_card(&token, "dziękuję", "thank you").await;
    let uri = format!("/api/flashcards/{}/review", card["id"]);

    let (_, due) = app.send(Method::GET, "/api/flashcards/due", Some(&token), None).await;
    assert_eq!(due["data"].as_array().unwrap().len(), 1);

    let (status, body) = app
        .send(Method::POST, &uri, Some(&token), Some(json!({ "quality": 5 })))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["review"]["repetitions"], json!(1));
    assert_eq!(body["data"]["review"]["interval_days"], json!(1));

    let (_, due) = app.send(Method::GET, "/api/flashcards/due", Some(&token), None).await;
    assert!(due["data"].as_array().unwrap().is_empty());

    let (status, body) = app
        .send(Method::POST, &uri, Some(&token), Some(json!({ "correct": true })))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["review"]["repetitions"], json!(2));
    assert_eq!(body["data"]["review"]["interval_days"], json!(6));

    let (status, body) = app
        .send(Method::POST, &uri, Some(&token), Some(json!({ "quality": 1 })))
        .await;
    assert_eq!(status, StatusCode::OK);
    let review = &body["data"]["review"];
    assert_eq!(review["repetitions"], json!(0));
    assert_eq!(review["interval_days"], json!(1));
    assert!(review["ease_factor"].as_f64().unwrap() >= 1.3);
}

#[tokio::test]
async fn test_review_rejects_bad_grade() {
    let app = TestApp::new();
    let token = app.user_token("ada@example.org").await;
    let card = app.create_card(&token, "a", "b").await;
    let uri = format!("/api/flashcards/{}/review", card["id"]);

    for body in [json!({ "quality": 6 }), json!({}), json!({ "quality": -1 })] {
        let (status, response) = app.send(Method::POST, &uri, Some(&token), Some(body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_error(&response, "VALIDATION_ERROR");
    }
}

#[tokio::test]
async fn test_deck_export_and_import() {
    let app = TestApp::new();
    let token = app.user_token("ada@example.org").await;

    let deck = json!({
        "name": "Polish Vocabulary",
        "flashcards": [
            { "front": "cześć", "back": "hello", "difficulty": "easy" },
            { "front": "proszę", "back": "please" }
        ]
    });
    let (status, body) = app
        .send(Method::POST, "/api/flashcards/import", Some(&token), Some(deck))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["imported"], json!(2));

    let (status, body) = app
        .send(
            Method::GET,
            "/api/flashcards/export?deck=Polish%20Vocabulary",
            Some(&token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["name"], json!("Polish Vocabulary"));
    assert_eq!(body["data"]["flashcards"][0]["front"], json!("cześć"));
    assert_eq!(body["data"]["flashcards"][1]["difficulty"], json!("medium"));

    let (_, body) = app
        .send(
            Method::GET,
            "/api/flashcards?deck=Polish%20Vocabulary",
            Some(&token),
            None,
        )
        .await;
    assert_eq!(body["data"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_non_admin_gets_forbidden_on_admin_routes() {
    let app = TestApp::new();
    let token = app.user_token("ada@example.org").await;

    let (status, body) = app
        .send(Method::GET, "/api/admin/users", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_error(&body, "FORBIDDEN");

    let (status, body) = app
        .send(Method::DELETE, "/api/admin/users/1", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_error(&body, "FORBIDDEN");

    let (status, _) = app.send(Method::GET, "/api/admin/users", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_admin_cannot_delete_self() {
    let app = TestApp::new();
    let (admin_id, admin) = app.admin_token("root@example.org").await;

    let (status, body) = app
        .send(
            Method::DELETE,
            &format!("/api/admin/users/{admin_id}"),
            Some(&admin),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_error(&body, "CANNOT_DELETE_SELF");
}

#[tokio::test]
async fn test_admin_delete_unknown_user() {
    let app = TestApp::new();
    let (_, admin) = app.admin_token("root@example.org").await;
    let (status, body) = app
        .send(Method::DELETE, "/api/admin/users/424242", Some(&admin), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_error(&body, "USER_NOT_FOUND");
}

#[tokio::test]
async fn test_delete_user_cascades_to_flashcards() {
    let app = TestApp::new();
    let (_, admin) = app.admin_token("root@example.org").await;
    let victim = app.user_token("ada@example.org").await;

    let first = app.create_card(&victim, "one", "1").await;
    app.create_card(&victim, "two", "2").await;
    let victim_id = first["user_id"].as_i64().unwrap();

    let (status, body) = app
        .send(
            Method::DELETE,
            &format!("/api/admin/users/{victim_id}"),
            Some(&admin),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["flashcards_deleted"], json!(2));

    // The deleted user's token no longer authenticates
    let (status, body) = app
        .send(Method::GET, "/api/flashcards", Some(&victim), None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_error(&body, "UNAUTHORIZED");

    // And nothing they owned survives, even for an admin
    let (status, _) = app
        .send(
            Method::GET,
            &format!("/api/flashcards/{}", first["id"]),
            Some(&admin),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(app.state.store.count_flashcards(victim_id).unwrap(), 0);
}

#[tokio::test]
async fn test_admin_role_management() {
    let app = TestApp::new();
    let (_, admin) = app.admin_token("root@example.org").await;
    let user_token = app.user_token("ada@example.org").await;

    let (status, body) = app
        .send(Method::GET, "/api/admin/users", Some(&admin), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    let users = body["data"].as_array().unwrap();
    assert_eq!(users.len(), 2);
    let ada_id = users
        .iter()
        .find(|u| u["email"] == json!("ada@example.org"))
        .unwrap()["id"]
        .as_i64()
        .unwrap();

    let (status, body) = app
        .send(
            Method::PUT,
            &format!("/api/admin/users/{ada_id}/role"),
            Some(&admin),
            Some(json!({ "role": "admin" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["role"], json!("admin"));

    // Tokens issued under the old role are revoked
    let (status, _) = app
        .send(Method::GET, "/api/users/me", Some(&user_token), None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let promoted = access_token(&app.login("ada@example.org").await);
    let (status, _) = app
        .send(Method::GET, "/api/admin/users", Some(&promoted), None)
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app
        .send(
            Method::PUT,
            &format!("/api/admin/users/{ada_id}/role"),
            Some(&admin),
            Some(json!({ "role": "superuser" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_error(&body, "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_admin_cannot_demote_self() {
    let app = TestApp::new();
    let (admin_id, admin) = app.admin_token("root@example.org").await;

    let (status, body) = app
        .send(
            Method::PUT,
            &format!("/api/admin/users/{admin_id}/role"),
            Some(&admin),
            Some(json!({ "role": "user" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_error(&body, "VALIDATION_ERROR");
    assert_eq!(body["fields"][0]["field"], json!("role"));

    // Still an admin, and the token was not revoked
    let (status, _) = app
        .send(Method::GET, "/api/admin/users", Some(&admin), None)
        .await;
    assert_eq!(status, StatusCode::OK);
}
