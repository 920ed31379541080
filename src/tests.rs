//! Integration tests for the dashboard backend.

use std::str::FromStr;
use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde_json::{json, Value};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode};
use sqlx::ConnectOptions;
use tempfile::TempDir;

use crate::client::{ApiClient, ClientError};
use crate::config::{AdminBootstrap, Config, LogFormat};
use crate::db::{init_database, Repository};
use crate::models::*;
use crate::{bootstrap_admin, create_router, AppState};

/// Test fixture: a server on an ephemeral port over a fresh SQLite file, with
/// one admin and one regular user already signed in.
struct TestFixture {
    base_url: String,
    http: Client,
    admin: ApiClient,
    user: ApiClient,
    anonymous: ApiClient,
    admin_token: String,
    user_token: String,
    state: AppState,
    _temp_dir: TempDir,
}

impl TestFixture {
    async fn new() -> Self {
        Self::with_timeout(Duration::from_secs(10)).await
    }

    async fn with_timeout(request_timeout: Duration) -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let database_url = format!("sqlite:{}", temp_dir.path().join("test.sqlite").display());

        let pool = init_database(&database_url)
            .await
            .expect("Failed to init DB");
        let repo = Repository::new(pool);

        let config = Config {
            bind_addr: "127.0.0.1:0".parse().unwrap(),
            database_url,
            cors_origins: None,
            jwt_secret: "test-secret".to_string(),
            jwt_expires_in_secs: 3600,
            request_timeout,
            log_level: "warn".to_string(),
            log_format: LogFormat::Pretty,
            admin_bootstrap: None,
        };
        let state = AppState::new(repo, config);

        // Seeded accounts only ever use issued tokens, so the hash is never checked.
        let admin = seed_user(&state, "Admin", "admin@example.com", Role::Admin).await;
        let user = seed_user(&state, "Editor", "editor@example.com", Role::User).await;
        let admin_token = state.tokens.issue(&admin.id, admin.role).unwrap();
        let user_token = state.tokens.issue(&user.id, user.role).unwrap();

        let app = create_router(state.clone());

        // Bind to random port
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind");
        let addr = listener.local_addr().expect("Failed to get addr");
        let base_url = format!("http://{}", addr);

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        // Wait for server to start
        tokio::time::sleep(Duration::from_millis(100)).await;

        let anonymous = ApiClient::new(&base_url).unwrap();
        TestFixture {
            admin: anonymous.clone().with_token(admin_token.clone()),
            user: anonymous.clone().with_token(user_token.clone()),
            anonymous,
            http: Client::new(),
            base_url,
            admin_token,
            user_token,
            state,
            _temp_dir: temp_dir,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

async fn seed_user(state: &AppState, name: &str, email: &str, role: Role) -> User {
    state
        .repo
        .create_user(&NewUser {
            name: name.to_string(),
            email: email.to_string(),
            password_hash: "unused".to_string(),
            role,
        })
        .await
        .unwrap()
}

fn api_error(err: ClientError) -> (u16, String) {
    match err {
        ClientError::Api { status, message } => (status, message),
        other => panic!("expected API error, got {:?}", other),
    }
}

fn quiz(question: &str, answer: &str) -> CreateQuizRequest {
    CreateQuizRequest {
        question: question.to_string(),
        answer: answer.to_string(),
        ..Default::default()
    }
}

fn post(title: &str, slug: &str) -> CreatePostRequest {
    CreatePostRequest {
        title: title.to_string(),
        slug: slug.to_string(),
        content: "<p>Body</p>".to_string(),
        ..Default::default()
    }
}

fn link(title: &str, url: &str, order: Option<i64>) -> CreateLinkRequest {
    CreateLinkRequest {
        title: title.to_string(),
        url: url.to_string(),
        order,
        ..Default::default()
    }
}

fn setting(key: &str, value: &str) -> CreateSettingRequest {
    CreateSettingRequest {
        key: key.to_string(),
        value: Some(value.to_string()),
        ..Default::default()
    }
}

// ============================================================================
// Gateway
// ============================================================================

#[tokio::test]
async fn test_health_and_root() {
    let fixture = TestFixture::new().await;

    let resp = fixture.http.get(fixture.url("/health")).send().await.unwrap();
    assert_eq!(resp.status(), 200);
    assert_eq!(resp.text().await.unwrap(), "OK");

    let resp = fixture.http.get(fixture.url("/")).send().await.unwrap();
    assert_eq!(resp.status(), 200);
    assert_eq!(resp.text().await.unwrap(), "Admin Dashboard API is running");
}

#[tokio::test]
async fn test_malformed_body_is_a_validation_error() {
    let fixture = TestFixture::new().await;

    let resp = fixture
        .http
        .post(fixture.url("/api/links"))
        .bearer_auth(&fixture.user_token)
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = resp.json().await.unwrap();
    assert!(body["message"].is_string());
}

#[tokio::test]
async fn test_request_timeout_uses_error_body() {
    let fixture = TestFixture::with_timeout(Duration::from_millis(300)).await;

    // Hold the write lock so the insert below waits until the deadline passes
    let mut conn = SqliteConnectOptions::from_str(&fixture.state.config.database_url)
        .unwrap()
        .journal_mode(SqliteJournalMode::Wal)
        .connect()
        .await
        .unwrap();
    sqlx::query("BEGIN EXCLUSIVE")
        .execute(&mut conn)
        .await
        .unwrap();

    let resp = fixture
        .http
        .post(fixture.url("/api/settings"))
        .bearer_auth(&fixture.user_token)
        .json(&json!({"key": "siteTitle", "value": "Quiz App"}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::REQUEST_TIMEOUT);
    assert_eq!(resp.headers()["content-type"], "application/json");
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body, json!({"message": "Request timed out"}));

    sqlx::query("ROLLBACK").execute(&mut conn).await.unwrap();
}

// ============================================================================
// Authorization
// ============================================================================

#[tokio::test]
async fn test_admin_routes_require_admin() {
    let fixture = TestFixture::new().await;

    for path in [
        "/api/quizzes",
        "/api/quiz-categories",
        "/api/posts",
        "/api/post-categories",
    ] {
        let resp = fixture.http.get(fixture.url(path)).send().await.unwrap();
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED, "{}", path);
        let body: Value = resp.json().await.unwrap();
        assert_eq!(body["message"], "Not authorized, no token");

        let resp = fixture
            .http
            .get(fixture.url(path))
            .bearer_auth("not-a-token")
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED, "{}", path);

        let resp = fixture
            .http
            .get(fixture.url(path))
            .bearer_auth(&fixture.user_token)
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::FORBIDDEN, "{}", path);
        let body: Value = resp.json().await.unwrap();
        assert_eq!(body["message"], "Not authorized as an admin");

        let resp = fixture
            .http
            .get(fixture.url(path))
            .bearer_auth(&fixture.admin_token)
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK, "{}", path);
    }
}

#[tokio::test]
async fn test_rejected_admin_create_does_not_persist() {
    let fixture = TestFixture::new().await;

    let err = fixture
        .user
        .create_quiz(&quiz("Capital of France?", "Paris"))
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(403));

    assert!(fixture.admin.list_quizzes().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_authenticated_routes_require_token() {
    let fixture = TestFixture::new().await;

    assert_eq!(
        fixture.anonymous.list_links().await.unwrap_err().status(),
        Some(401)
    );
    assert_eq!(
        fixture.anonymous.list_settings().await.unwrap_err().status(),
        Some(401)
    );

    assert!(fixture.user.list_links().await.unwrap().is_empty());
    assert!(fixture.user.list_settings().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_stored_role_overrides_token_role() {
    let fixture = TestFixture::new().await;

    // A token claiming admin for an account stored as a regular user
    let user = fixture
        .state
        .repo
        .find_user_by_email("editor@example.com")
        .await
        .unwrap()
        .unwrap()
        .user;
    let forged = fixture.state.tokens.issue(&user.id, Role::Admin).unwrap();

    let err = fixture
        .anonymous
        .clone()
        .with_token(forged)
        .list_quizzes()
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(403));
}

#[tokio::test]
async fn test_token_for_unknown_user_is_rejected() {
    let fixture = TestFixture::new().await;

    let token = fixture.state.tokens.issue("ghost", Role::Admin).unwrap();
    let (status, message) = api_error(
        fixture
            .anonymous
            .clone()
            .with_token(token)
            .list_links()
            .await
            .unwrap_err(),
    );
    assert_eq!(status, 401);
    assert_eq!(message, "Not authorized, user not found");
}

// ============================================================================
// Quizzes
// ============================================================================

#[tokio::test]
async fn test_quiz_crud() {
    let fixture = TestFixture::new().await;

    let resp = fixture
        .http
        .post(fixture.url("/api/quizzes"))
        .bearer_auth(&fixture.admin_token)
        .json(&json!({"question": "Capital of France?", "answer": "Paris", "category": "geo"}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["question"], "Capital of France?");
    assert_eq!(body["status"], "active");
    let id = body["_id"].as_str().unwrap().to_string();

    let fetched = fixture.admin.get_quiz(&id).await.unwrap();
    assert_eq!(fetched.answer, "Paris");
    assert_eq!(fetched.category.as_deref(), Some("geo"));

    let updated = fixture
        .admin
        .update_quiz(
            &id,
            &UpdateQuizRequest {
                answer: Some("Paris, France".to_string()),
                status: Some("inactive".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.question, "Capital of France?");
    assert_eq!(updated.answer, "Paris, France");
    assert_eq!(updated.status, Status::Inactive);

    let deleted = fixture.admin.delete_quiz(&id).await.unwrap();
    assert_eq!(deleted.message, "Quiz removed");

    let (status, message) = api_error(fixture.admin.get_quiz(&id).await.unwrap_err());
    assert_eq!(status, 404);
    assert_eq!(message, "Quiz not found");
}

#[tokio::test]
async fn test_quiz_requires_question_and_answer() {
    let fixture = TestFixture::new().await;

    let err = fixture
        .admin
        .create_quiz(&quiz("", "Paris"))
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(400));

    let err = fixture
        .admin
        .create_quiz(&quiz("Capital of France?", "   "))
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(400));

    assert!(fixture.admin.list_quizzes().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_quiz_empty_update_is_noop() {
    let fixture = TestFixture::new().await;

    let created = fixture
        .admin
        .create_quiz(&CreateQuizRequest {
            category: Some("geo".to_string()),
            ..quiz("Capital of France?", "Paris")
        })
        .await
        .unwrap();

    let updated = fixture
        .admin
        .update_quiz(&created.id, &UpdateQuizRequest::default())
        .await
        .unwrap();
    assert_eq!(updated, created);

    // Empty strings count as not provided
    let updated = fixture
        .admin
        .update_quiz(
            &created.id,
            &UpdateQuizRequest {
                question: Some(String::new()),
                answer: Some(String::new()),
                category: Some(String::new()),
                status: Some(String::new()),
            },
        )
        .await
        .unwrap();
    assert_eq!(updated, created);
    assert_eq!(fixture.admin.get_quiz(&created.id).await.unwrap(), created);
}

#[tokio::test]
async fn test_invalid_status_is_rejected() {
    let fixture = TestFixture::new().await;

    let err = fixture
        .admin
        .create_quiz(&CreateQuizRequest {
            status: Some("archived".to_string()),
            ..quiz("Q", "A")
        })
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(400));

    let created = fixture.admin.create_quiz(&quiz("Q", "A")).await.unwrap();
    let err = fixture
        .admin
        .update_quiz(
            &created.id,
            &UpdateQuizRequest {
                status: Some("draft".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(400));
    assert_eq!(
        fixture.admin.get_quiz(&created.id).await.unwrap().status,
        Status::Active
    );
}

#[tokio::test]
async fn test_delete_missing_quiz_leaves_collection_unchanged() {
    let fixture = TestFixture::new().await;

    fixture.admin.create_quiz(&quiz("Q1", "A1")).await.unwrap();
    fixture.admin.create_quiz(&quiz("Q2", "A2")).await.unwrap();

    let (status, message) = api_error(fixture.admin.delete_quiz("missing").await.unwrap_err());
    assert_eq!(status, 404);
    assert_eq!(message, "Quiz not found");

    let quizzes = fixture.admin.list_quizzes().await.unwrap();
    assert_eq!(quizzes.len(), 2);
    assert_eq!(quizzes[0].question, "Q1");
    assert_eq!(quizzes[1].question, "Q2");
}

#[tokio::test]
async fn test_update_missing_quiz_is_not_found() {
    let fixture = TestFixture::new().await;

    let err = fixture
        .admin
        .update_quiz(
            "missing",
            &UpdateQuizRequest {
                question: Some("Q".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(404));
}

// ============================================================================
// Quiz categories
// ============================================================================

#[tokio::test]
async fn test_quiz_category_duplicate_name() {
    let fixture = TestFixture::new().await;

    let resp = fixture
        .http
        .post(fixture.url("/api/quiz-categories"))
        .bearer_auth(&fixture.admin_token)
        .json(&json!({"name": "Geography"}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["name"], "Geography");
    assert_eq!(body["icon"], PLACEHOLDER_IMAGE);
    assert!(body["createdAt"].is_string());

    let resp = fixture
        .http
        .post(fixture.url("/api/quiz-categories"))
        .bearer_auth(&fixture.admin_token)
        .json(&json!({"name": "Geography"}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body, json!({"message": "Category already exists"}));

    assert_eq!(fixture.admin.list_quiz_categories().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_quiz_category_update_and_delete() {
    let fixture = TestFixture::new().await;

    let created = fixture
        .admin
        .create_quiz_category(&CreateQuizCategoryRequest {
            name: "History".to_string(),
            icon: Some("/icons/history.svg".to_string()),
            description: Some("Dates and events".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();

    let updated = fixture
        .admin
        .update_quiz_category(
            &created.id,
            &UpdateQuizCategoryRequest {
                description: Some("Past events".to_string()),
                icon: Some(String::new()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.name, "History");
    assert_eq!(updated.icon, "/icons/history.svg");
    assert_eq!(updated.description.as_deref(), Some("Past events"));
    assert_eq!(updated.created_at, created.created_at);

    let deleted = fixture
        .admin
        .delete_quiz_category(&created.id)
        .await
        .unwrap();
    assert_eq!(deleted.message, "Category removed");

    let (status, message) =
        api_error(fixture.admin.get_quiz_category(&created.id).await.unwrap_err());
    assert_eq!(status, 404);
    assert_eq!(message, "Category not found");
}

#[tokio::test]
async fn test_quiz_category_empty_update_is_noop() {
    let fixture = TestFixture::new().await;

    let created = fixture
        .admin
        .create_quiz_category(&CreateQuizCategoryRequest {
            name: "Science".to_string(),
            description: Some("Physics and chemistry".to_string()),
            status: Some("inactive".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();

    let updated = fixture
        .admin
        .update_quiz_category(&created.id, &UpdateQuizCategoryRequest::default())
        .await
        .unwrap();
    assert_eq!(updated.name, created.name);
    assert_eq!(updated.icon, created.icon);
    assert_eq!(updated.description, created.description);
    assert_eq!(updated.status, Status::Inactive);

    let updated = fixture
        .admin
        .update_quiz_category(
            &created.id,
            &UpdateQuizCategoryRequest {
                name: Some(String::new()),
                icon: Some(String::new()),
                description: Some(String::new()),
                status: Some(String::new()),
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.name, "Science");
    assert_eq!(updated.icon, PLACEHOLDER_IMAGE);
    assert_eq!(updated.description.as_deref(), Some("Physics and chemistry"));
    assert_eq!(updated.status, Status::Inactive);
    assert_eq!(updated.created_at, created.created_at);
}

// ============================================================================
// Posts
// ============================================================================

#[tokio::test]
async fn test_post_empty_update_is_noop() {
    let fixture = TestFixture::new().await;

    let created = fixture
        .admin
        .create_post(&CreatePostRequest {
            short_description: Some("Intro".to_string()),
            thumbnail: Some("/images/hello.png".to_string()),
            category: Some("news".to_string()),
            status: Some("inactive".to_string()),
            ..post("Hello", "hello")
        })
        .await
        .unwrap();

    let updated = fixture
        .admin
        .update_post(&created.id, &UpdatePostRequest::default())
        .await
        .unwrap();
    assert_eq!(updated.title, created.title);
    assert_eq!(updated.slug, created.slug);
    assert_eq!(updated.content, created.content);
    assert_eq!(updated.short_description, created.short_description);
    assert_eq!(updated.thumbnail, created.thumbnail);
    assert_eq!(updated.category, created.category);
    assert_eq!(updated.status, created.status);
    assert_eq!(updated.created_at, created.created_at);

    let updated = fixture
        .admin
        .update_post(
            &created.id,
            &UpdatePostRequest {
                title: Some(String::new()),
                slug: Some(String::new()),
                content: Some(String::new()),
                short_description: Some(String::new()),
                thumbnail: Some(String::new()),
                category: Some(String::new()),
                status: Some(String::new()),
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.title, "Hello");
    assert_eq!(updated.slug, "hello");
    assert_eq!(updated.content, "<p>Body</p>");
    assert_eq!(updated.short_description.as_deref(), Some("Intro"));
    assert_eq!(updated.thumbnail, "/images/hello.png");
    assert_eq!(updated.category.as_deref(), Some("news"));
    assert_eq!(updated.status, Status::Inactive);
}

#[tokio::test]
async fn test_post_create_defaults_and_duplicate_slug() {
    let fixture = TestFixture::new().await;

    let created = fixture
        .admin
        .create_post(&post("Hello", "hello"))
        .await
        .unwrap();
    assert_eq!(created.title, "Hello");
    assert_eq!(created.thumbnail, PLACEHOLDER_IMAGE);
    assert_eq!(created.status, Status::Active);
    assert_eq!(created.created_at, created.updated_at);

    let (status, message) = api_error(
        fixture
            .admin
            .create_post(&post("Hello again", "hello"))
            .await
            .unwrap_err(),
    );
    assert_eq!(status, 400);
    assert_eq!(message, "Post with this slug already exists");

    let posts = fixture.admin.list_posts().await.unwrap();
    assert_eq!(posts.len(), 1);
    assert_eq!(posts[0].title, "Hello");
}

#[tokio::test]
async fn test_post_requires_title_slug_and_content() {
    let fixture = TestFixture::new().await;

    let missing_content = CreatePostRequest {
        content: String::new(),
        ..post("Hello", "hello")
    };
    let err = fixture
        .admin
        .create_post(&missing_content)
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(400));

    let err = fixture.admin.create_post(&post("Hello", "")).await.unwrap_err();
    assert_eq!(err.status(), Some(400));
}

#[tokio::test]
async fn test_post_update_refreshes_timestamp() {
    let fixture = TestFixture::new().await;

    let created = fixture
        .admin
        .create_post(&CreatePostRequest {
            short_description: Some("Intro".to_string()),
            category: Some("news".to_string()),
            ..post("Hello", "hello")
        })
        .await
        .unwrap();

    tokio::time::sleep(Duration::from_millis(5)).await;

    let updated = fixture
        .admin
        .update_post(
            &created.id,
            &UpdatePostRequest {
                title: Some("Hello, world".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.title, "Hello, world");
    assert_eq!(updated.slug, "hello");
    assert_eq!(updated.short_description.as_deref(), Some("Intro"));
    assert_eq!(updated.category.as_deref(), Some("news"));
    assert_eq!(updated.created_at, created.created_at);
    assert_ne!(updated.updated_at, created.updated_at);

    let fetched = fixture.admin.get_post(&created.id).await.unwrap();
    assert_eq!(fetched, updated);

    let deleted = fixture.admin.delete_post(&created.id).await.unwrap();
    assert_eq!(deleted.message, "Post removed");
    assert_eq!(
        fixture.admin.get_post(&created.id).await.unwrap_err().status(),
        Some(404)
    );
}

#[tokio::test]
async fn test_post_update_to_taken_slug_is_conflict() {
    let fixture = TestFixture::new().await;

    fixture.admin.create_post(&post("A", "a")).await.unwrap();
    let b = fixture.admin.create_post(&post("B", "b")).await.unwrap();

    let (status, message) = api_error(
        fixture
            .admin
            .update_post(
                &b.id,
                &UpdatePostRequest {
                    slug: Some("a".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err(),
    );
    assert_eq!(status, 400);
    assert_eq!(message, "Post with this slug already exists");
    assert_eq!(fixture.admin.get_post(&b.id).await.unwrap().slug, "b");
}

// ============================================================================
// Post categories
// ============================================================================

#[tokio::test]
async fn test_post_category_crud_and_duplicate_slug() {
    let fixture = TestFixture::new().await;

    let request = CreatePostCategoryRequest {
        name: "News".to_string(),
        slug: "news".to_string(),
        ..Default::default()
    };
    let created = fixture.admin.create_post_category(&request).await.unwrap();
    assert_eq!(created.status, Status::Active);

    let (status, message) = api_error(
        fixture
            .admin
            .create_post_category(&CreatePostCategoryRequest {
                name: "More news".to_string(),
                ..request.clone()
            })
            .await
            .unwrap_err(),
    );
    assert_eq!(status, 400);
    assert_eq!(message, "Category with this slug already exists");
    assert_eq!(fixture.admin.list_post_categories().await.unwrap().len(), 1);

    let updated = fixture
        .admin
        .update_post_category(
            &created.id,
            &UpdatePostCategoryRequest {
                description: Some("Announcements".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.name, "News");
    assert_eq!(updated.slug, "news");
    assert_eq!(updated.description.as_deref(), Some("Announcements"));

    let deleted = fixture
        .admin
        .delete_post_category(&created.id)
        .await
        .unwrap();
    assert_eq!(deleted.message, "Category removed");
    assert_eq!(
        fixture
            .admin
            .delete_post_category(&created.id)
            .await
            .unwrap_err()
            .status(),
        Some(404)
    );
}

#[tokio::test]
async fn test_post_category_empty_update_is_noop() {
    let fixture = TestFixture::new().await;

    let created = fixture
        .admin
        .create_post_category(&CreatePostCategoryRequest {
            name: "News".to_string(),
            slug: "news".to_string(),
            description: Some("Announcements".to_string()),
            status: Some("inactive".to_string()),
        })
        .await
        .unwrap();

    let updated = fixture
        .admin
        .update_post_category(&created.id, &UpdatePostCategoryRequest::default())
        .await
        .unwrap();
    assert_eq!(updated, created);

    let updated = fixture
        .admin
        .update_post_category(
            &created.id,
            &UpdatePostCategoryRequest {
                name: Some(String::new()),
                slug: Some(String::new()),
                description: Some(String::new()),
                status: Some(String::new()),
            },
        )
        .await
        .unwrap();
    assert_eq!(updated, created);
    assert_eq!(
        fixture.admin.get_post_category(&created.id).await.unwrap(),
        created
    );
}

// ============================================================================
// Links
// ============================================================================

#[tokio::test]
async fn test_link_default_order_is_zero() {
    let fixture = TestFixture::new().await;

    let resp = fixture
        .http
        .post(fixture.url("/api/links"))
        .bearer_auth(&fixture.user_token)
        .json(&json!({"title": "Home", "url": "https://x.com"}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["order"], 0);
    assert_eq!(body["url"], "https://x.com");
}

#[tokio::test]
async fn test_links_listed_by_order() {
    let fixture = TestFixture::new().await;

    fixture
        .user
        .create_link(&link("Third", "https://c.example.com", Some(3)))
        .await
        .unwrap();
    fixture
        .user
        .create_link(&link("First", "https://a.example.com", Some(1)))
        .await
        .unwrap();
    fixture
        .user
        .create_link(&link("Second", "https://b.example.com", Some(2)))
        .await
        .unwrap();

    let titles: Vec<String> = fixture
        .user
        .list_links()
        .await
        .unwrap()
        .into_iter()
        .map(|l| l.title)
        .collect();
    assert_eq!(titles, vec!["First", "Second", "Third"]);
}

#[tokio::test]
async fn test_link_validation() {
    let fixture = TestFixture::new().await;

    for request in [
        link("", "https://x.com", None),
        link("Home", "", None),
        link("Home", "/relative", None),
    ] {
        let err = fixture.user.create_link(&request).await.unwrap_err();
        assert_eq!(err.status(), Some(400));
    }
    assert!(fixture.user.list_links().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_link_update_treats_zero_order_as_missing() {
    let fixture = TestFixture::new().await;

    let created = fixture
        .user
        .create_link(&link("Docs", "https://docs.example.com", Some(5)))
        .await
        .unwrap();

    let updated = fixture
        .user
        .update_link(
            &created.id,
            &UpdateLinkRequest {
                title: Some("Documentation".to_string()),
                order: Some(0),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.title, "Documentation");
    assert_eq!(updated.order, 5);
    assert_eq!(updated.url, "https://docs.example.com");

    let err = fixture
        .user
        .update_link(
            &created.id,
            &UpdateLinkRequest {
                url: Some("nope".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(400));

    let deleted = fixture.user.delete_link(&created.id).await.unwrap();
    assert_eq!(deleted.message, "Link deleted successfully");
    let (status, message) = api_error(fixture.user.get_link(&created.id).await.unwrap_err());
    assert_eq!(status, 404);
    assert_eq!(message, "Link not found");
}

// ============================================================================
// Settings
// ============================================================================

#[tokio::test]
async fn test_setting_update_by_key() {
    let fixture = TestFixture::new().await;

    let created = fixture
        .user
        .create_setting(&setting("siteTitle", "Quiz App"))
        .await
        .unwrap();
    assert_eq!(created.value.as_deref(), Some("Quiz App"));

    fixture
        .user
        .update_setting(
            "siteTitle",
            &UpdateSettingRequest {
                value: Some("New Title".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let resp = fixture
        .http
        .get(fixture.url("/api/settings/siteTitle"))
        .bearer_auth(&fixture.user_token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["key"], "siteTitle");
    assert_eq!(body["value"], "New Title");
    assert_eq!(body["_id"], created.id.as_str());
}

#[tokio::test]
async fn test_settings_listed_by_key_and_unique() {
    let fixture = TestFixture::new().await;

    for key in ["theme", "footerText", "siteTitle"] {
        fixture.user.create_setting(&setting(key, "x")).await.unwrap();
    }

    let (status, message) = api_error(
        fixture
            .user
            .create_setting(&setting("theme", "dark"))
            .await
            .unwrap_err(),
    );
    assert_eq!(status, 400);
    assert_eq!(message, "Setting with this key already exists");

    let keys: Vec<String> = fixture
        .user
        .list_settings()
        .await
        .unwrap()
        .into_iter()
        .map(|s| s.key)
        .collect();
    assert_eq!(keys, vec!["footerText", "siteTitle", "theme"]);
}

#[tokio::test]
async fn test_setting_not_found_and_delete() {
    let fixture = TestFixture::new().await;

    let (status, message) = api_error(fixture.user.get_setting("missing").await.unwrap_err());
    assert_eq!(status, 404);
    assert_eq!(message, "Setting not found");

    fixture
        .user
        .create_setting(&setting("siteTitle", "Quiz App"))
        .await
        .unwrap();

    let unchanged = fixture
        .user
        .update_setting("siteTitle", &UpdateSettingRequest::default())
        .await
        .unwrap();
    assert_eq!(unchanged.value.as_deref(), Some("Quiz App"));

    let deleted = fixture.user.delete_setting("siteTitle").await.unwrap();
    assert_eq!(deleted.message, "Setting deleted successfully");
    assert_eq!(
        fixture.user.get_setting("siteTitle").await.unwrap_err().status(),
        Some(404)
    );
    assert_eq!(
        fixture.user.delete_setting("siteTitle").await.unwrap_err().status(),
        Some(404)
    );
}

// ============================================================================
// Accounts
// ============================================================================

#[tokio::test]
async fn test_register_login_and_profile() {
    let fixture = TestFixture::new().await;
    let mut client = fixture.anonymous.clone();

    let registered = client
        .register(&RegisterRequest {
            name: "Jane".to_string(),
            email: "jane@example.com".to_string(),
            password: "correct horse".to_string(),
        })
        .await
        .unwrap();
    assert_eq!(registered.user.role, Role::User);
    assert!(!registered.token.is_empty());

    let profile = client.get_profile().await.unwrap();
    assert_eq!(profile.email, "jane@example.com");

    // Regular users cannot reach content routes
    assert_eq!(client.list_posts().await.unwrap_err().status(), Some(403));

    let mut other = fixture.anonymous.clone();
    let (status, message) = api_error(
        other
            .login("jane@example.com", "wrong password")
            .await
            .unwrap_err(),
    );
    assert_eq!(status, 401);
    assert_eq!(message, "Invalid email or password");
    assert!(other.token().is_none());

    let (status, message) = api_error(
        other
            .login("nobody@example.com", "correct horse")
            .await
            .unwrap_err(),
    );
    assert_eq!(status, 401);
    assert_eq!(message, "Invalid email or password");

    let logged_in = other.login("jane@example.com", "correct horse").await.unwrap();
    assert_eq!(logged_in.user.id, registered.user.id);
    assert_eq!(other.get_profile().await.unwrap().name, "Jane");

    other.logout();
    assert_eq!(other.get_profile().await.unwrap_err().status(), Some(401));
}

#[tokio::test]
async fn test_register_duplicate_email() {
    let fixture = TestFixture::new().await;
    let mut client = fixture.anonymous.clone();

    let (status, message) = api_error(
        client
            .register(&RegisterRequest {
                name: "Someone".to_string(),
                email: "editor@example.com".to_string(),
                password: "secret".to_string(),
            })
            .await
            .unwrap_err(),
    );
    assert_eq!(status, 400);
    assert_eq!(message, "User already exists");

    let err = client
        .register(&RegisterRequest {
            name: "Someone".to_string(),
            ..Default::default()
        })
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(400));
}

#[tokio::test]
async fn test_update_profile_and_change_password() {
    let fixture = TestFixture::new().await;
    let mut client = fixture.anonymous.clone();

    client
        .register(&RegisterRequest {
            name: "Jane".to_string(),
            email: "jane@example.com".to_string(),
            password: "first-password".to_string(),
        })
        .await
        .unwrap();

    let updated = client
        .update_profile(&UpdateProfileRequest {
            name: Some("Jane Doe".to_string()),
            photo: Some("/avatars/jane.png".to_string()),
            email: Some(String::new()),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(updated.user.name, "Jane Doe");
    assert_eq!(updated.user.email, "jane@example.com");
    assert_eq!(updated.user.photo, "/avatars/jane.png");
    assert_eq!(client.token(), Some(updated.token.as_str()));

    let err = client
        .update_profile(&UpdateProfileRequest {
            email: Some("admin@example.com".to_string()),
            ..Default::default()
        })
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(400));

    let (status, _) = api_error(
        client
            .change_password("not-my-password", "second-password")
            .await
            .unwrap_err(),
    );
    assert_eq!(status, 401);

    let changed = client
        .change_password("first-password", "second-password")
        .await
        .unwrap();
    assert_eq!(changed.message, "Password updated successfully");

    let mut fresh = fixture.anonymous.clone();
    assert_eq!(
        fresh
            .login("jane@example.com", "first-password")
            .await
            .unwrap_err()
            .status(),
        Some(401)
    );
    fresh
        .login("jane@example.com", "second-password")
        .await
        .unwrap();
}

#[tokio::test]
async fn test_bootstrap_admin_is_idempotent() {
    let fixture = TestFixture::new().await;
    let admin = AdminBootstrap {
        name: "Root".to_string(),
        email: "root@example.com".to_string(),
        password: "bootstrap-password".to_string(),
    };

    assert!(bootstrap_admin(&fixture.state.repo, &admin).await.unwrap());
    assert!(!bootstrap_admin(&fixture.state.repo, &admin).await.unwrap());

    // An existing account with the same email is left alone
    let existing = AdminBootstrap {
        email: "editor@example.com".to_string(),
        ..admin.clone()
    };
    assert!(!bootstrap_admin(&fixture.state.repo, &existing).await.unwrap());

    let mut client = fixture.anonymous.clone();
    let logged_in = client
        .login("root@example.com", "bootstrap-password")
        .await
        .unwrap();
    assert_eq!(logged_in.user.role, Role::Admin);
    assert!(client.list_quizzes().await.unwrap().is_empty());
}
