// tests/api_tests.rs

use std::sync::Arc;

use nextmimo::{
    catalog::LessonRegistry,
    config::Config,
    routes,
    session::SessionLocks,
    state::AppState,
    storage::SqliteStorage,
};
use serde_json::Value;
use sqlx::sqlite::SqlitePoolOptions;

/// Helper function to spawn the app on a random port for testing.
/// Returns the base URL (e.g., "http://127.0.0.1:12345").
async fn spawn_app() -> String {
    // 1. Create an in-memory pool that outlives idle periods
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await
        .expect("Failed to open in-memory SQLite");

    // 2. Run migrations
    let storage = SqliteStorage::new(pool);
    storage.migrate().await.expect("Failed to migrate database");

    // 3. Create test configuration and state
    let config = Config {
        database_url: "sqlite::memory:".to_string(),
        session_secret: "test_secret_for_integration_tests".to_string(),
        session_ttl: 600, // 10 minutes for tests
        content_dir: None,
        admin_email: None,
        bind_addr: "127.0.0.1:0".to_string(),
        log_dir: "logs".to_string(),
        rust_log: "error".to_string(),
    };

    let registry = LessonRegistry::load_bundled().expect("Bundled content must load");
    let state = AppState {
        registry: Arc::new(registry),
        storage: Arc::new(storage),
        locks: SessionLocks::new(),
        config,
    };

    // 4. Create the router with the app state
    let app = routes::create_router(state);

    // 5. Bind to port 0 to get a random available port
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind random port");

    let port = listener.local_addr().unwrap().port();
    let address = format!("http://127.0.0.1:{}", port);

    // 6. Spawn the server in the background
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    address
}

#[tokio::test]
async fn health_check_404() {
    // Arrange
    let address = spawn_app().await;
    let client = reqwest::Client::new();

    // Act
    let response = client
        .get(&format!("{}/random_path_that_does_not_exist", address))
        .send()
        .await
        .expect("Failed to execute request");

    // Assert
    assert_eq!(response.status().as_u16(), 404);
}

#[tokio::test]
async fn lessons_are_listed_in_key_order() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();

    let response = client
        .get(&format!("{}/api/lessons", address))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status().as_u16(), 200);

    let lessons: Vec<Value> = response.json().await.unwrap();
    assert_eq!(lessons.len(), 50);

    let ids: Vec<&str> = lessons.iter().map(|l| l["id"].as_str().unwrap()).collect();
    assert_eq!(&ids[..3], ["1-1", "1-2", "1-3"]);
    // Module 10 sorts after module 9, not after module 1.
    let nine = ids.iter().position(|id| *id == "9-3").unwrap();
    assert_eq!(ids[nine + 1], "10-1");
    assert_eq!(*ids.last().unwrap(), "16-3");

    // Answers never leave the server.
    let quiz = &lessons[0]["quiz"];
    assert!(quiz["questions"][0].get("correctAnswer").is_none());
    assert_eq!(lessons[0]["hasQuiz"], true);
}

#[tokio::test]
async fn lessons_can_be_filtered() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();

    let lessons: Vec<Value> = client
        .get(&format!("{}/api/lessons?difficulty=intermediate", address))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(!lessons.is_empty());
    assert!(lessons.iter().all(|l| l["difficulty"] == "intermediate"));

    let lessons: Vec<Value> = client
        .get(&format!("{}/api/lessons?tag=next.js&q=introduction", address))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(lessons.iter().any(|l| l["id"] == "1-1"));
}

#[tokio::test]
async fn anonymous_module_list_has_no_progress() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();

    let response = client
        .get(&format!("{}/api/modules", address))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 200);

    let modules: Vec<Value> = response.json().await.unwrap();
    assert_eq!(modules.len(), 16);
    assert_eq!(modules[0]["id"], "1");
    assert_eq!(modules[0]["lessons"], serde_json::json!(["1-1", "1-2", "1-3"]));
    assert_eq!(modules[0]["totalLessons"], 3);
    assert_eq!(modules[15]["id"], "16");
    assert!(modules.iter().all(|m| m["progress"] == 0 && m["isCompleted"] == false));
}

#[tokio::test]
async fn module_detail_locks_lessons_behind_prerequisites() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();

    let detail: Value = client
        .get(&format!("{}/api/modules/1", address))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(detail["id"], "1");
    let lessons = detail["lessonProgress"].as_array().unwrap();
    assert_eq!(lessons.len(), 3);
    assert_eq!(lessons[0]["locked"], false);
    assert_eq!(lessons[1]["locked"], true);
    assert!(lessons.iter().all(|l| l["completed"] == false));
}

#[tokio::test]
async fn unknown_module_is_404() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();

    let response = client
        .get(&format!("{}/api/modules/99", address))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 404);

    // Unknown modules simply have no lessons.
    let lessons: Vec<Value> = client
        .get(&format!("{}/api/modules/99/lessons", address))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(lessons.is_empty());
}

#[tokio::test]
async fn lesson_view_has_navigation() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();

    let lesson: Value = client
        .get(&format!("{}/api/modules/1/lessons/2", address))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(lesson["id"], "1-2");
    assert_eq!(lesson["moduleId"], "1");
    assert_eq!(lesson["previous"]["id"], "1-1");
    assert_eq!(lesson["next"]["id"], "1-3");
    assert_eq!(lesson["completed"], false);
    assert_eq!(lesson["prerequisiteLessons"][0]["id"], "1-1");
    assert_eq!(lesson["prerequisiteLessons"][0]["known"], true);

    let first: Value = client
        .get(&format!("{}/api/modules/1/lessons/1", address))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(first["previous"].is_null());

    let response = client
        .get(&format!("{}/api/modules/1/lessons/9", address))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 404);

    let response = client
        .get(&format!("{}/api/modules/1/lessons/abc", address))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 404);
}

#[tokio::test]
async fn quiz_is_graded_against_stored_answers() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();

    let registry = LessonRegistry::load_bundled().unwrap();
    let quiz = registry.get_lesson("1", "1").unwrap().quiz.clone().unwrap();
    let mut answers: Vec<String> = quiz
        .questions
        .iter()
        .map(|q| q.correct_answer.clone())
        .collect();

    let grade: Value = client
        .post(&format!("{}/api/modules/1/lessons/1/quiz", address))
        .json(&serde_json::json!({ "answers": answers }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(grade["correct"], quiz.questions.len());
    assert_eq!(grade["accuracy"], 1.0);

    answers[0] = "definitely not an option".to_string();
    let grade: Value = client
        .post(&format!("{}/api/modules/1/lessons/1/quiz", address))
        .json(&serde_json::json!({ "answers": answers }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(grade["correct"], quiz.questions.len() - 1);
    assert_eq!(grade["results"][0], false);
}

#[tokio::test]
async fn quiz_rejects_bad_submissions() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();

    // Empty answer list
    let response = client
        .post(&format!("{}/api/modules/1/lessons/1/quiz", address))
        .json(&serde_json::json!({ "answers": [] }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 400);

    // More answers than questions
    let too_many: Vec<String> = (0..60).map(|i| i.to_string()).collect();
    let response = client
        .post(&format!("{}/api/modules/1/lessons/1/quiz", address))
        .json(&serde_json::json!({ "answers": too_many }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 400);

    let response = client
        .post(&format!("{}/api/modules/42/lessons/1/quiz", address))
        .json(&serde_json::json!({ "answers": ["a"] }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 404);
}

#[tokio::test]
async fn malformed_requests_get_json_errors() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();

    let response = client
        .get(&format!("{}/api/lessons?difficulty=impossible", address))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 400);
    let body: Value = response.json().await.unwrap();
    assert!(body["error"].is_string());

    let response = client
        .post(&format!("{}/api/session", address))
        .header("content-type", "application/json")
        .body("{\"name\": ")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 400);
    let body: Value = response.json().await.unwrap();
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn non_canonical_lesson_numbers_are_404() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();

    for path in ["1/lessons/01", "1/lessons/+1"] {
        let response = client
            .get(&format!("{}/api/modules/{}", address, path))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status().as_u16(), 404, "{path}");
    }
}
