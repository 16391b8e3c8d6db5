// tests/api_tests.rs

use provafacil::{config::Config, grading::vision::VisionGrader, routes, state::AppState};
use serde_json::{Value, json};
use sqlx::sqlite::SqlitePoolOptions;

/// Helper function to spawn the app on a random port for testing.
/// Returns the base URL (e.g., "http://127.0.0.1:12345").
///
/// Each test gets its own in-memory SQLite database; a single pooled
/// connection keeps it alive for the test's lifetime.
async fn spawn_app_with_grader(grader_url: Option<String>) -> String {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("Failed to open in-memory SQLite");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to migrate database");

    let config = Config {
        database_url: "sqlite::memory:".to_string(),
        rust_log: "error".to_string(),
        grader_url,
        grader_api_key: None,
    };

    let grader = VisionGrader::new(&config);
    let state = AppState {
        pool,
        config,
        grader,
    };

    let app = routes::create_router(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind random port");

    let port = listener.local_addr().unwrap().port();
    let address = format!("http://127.0.0.1:{}", port);

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    address
}

async fn spawn_app() -> String {
    spawn_app_with_grader(None).await
}

/// A stand-in for the AI vision-grading service: always returns the same
/// judgment (4 of 5 correct, 80%).
async fn spawn_mock_grader() -> String {
    use axum::{Json, Router, routing::post};

    let app = Router::new().route(
        "/grade",
        post(|Json(_input): Json<Value>| async {
            Json(json!({
                "corrections": [
                    {"questionId": "1", "correct": true},
                    {"questionId": "2", "correct": true},
                    {"questionId": "3", "correct": false},
                    {"questionId": "4", "correct": true},
                    {"questionId": "5", "correct": true}
                ],
                "results": {"correctCount": 4, "incorrectCount": 1, "accuracy": 80.0}
            }))
        }),
    );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind mock grader port");
    let port = listener.local_addr().unwrap().port();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://127.0.0.1:{}", port)
}

/// A vision service that always fails, to check verbatim error surfacing.
async fn spawn_failing_grader() -> String {
    use axum::{Router, http::StatusCode, routing::post};

    let app = Router::new().route(
        "/grade",
        post(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "model refused to grade") }),
    );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind mock grader port");
    let port = listener.local_addr().unwrap().port();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://127.0.0.1:{}", port)
}

// -- fixtures ---------------------------------------------------------------

async fn seed_class(client: &reqwest::Client, address: &str) -> (i64, i64) {
    let unique = &uuid::Uuid::new_v4().to_string()[..8];

    let school: Value = client
        .post(format!("{}/api/schools", address))
        .json(&json!({"name": format!("Escola {}", unique), "address": "Rua A, 123"}))
        .send()
        .await
        .expect("Failed to create school")
        .json()
        .await
        .expect("Invalid school body");
    let school_id = school["id"].as_i64().unwrap();

    let class: Value = client
        .post(format!("{}/api/classes", address))
        .json(&json!({"name": "7B", "year": 2026, "school_id": school_id}))
        .send()
        .await
        .expect("Failed to create class")
        .json()
        .await
        .expect("Invalid class body");

    (school_id, class["id"].as_i64().unwrap())
}

async fn seed_student(
    client: &reqwest::Client,
    address: &str,
    school_id: i64,
    class_id: i64,
) -> i64 {
    let student: Value = client
        .post(format!("{}/api/students", address))
        .json(&json!({
            "name": "Maria Silva",
            "birth_date": "2013-04-02",
            "school_id": school_id,
            "class_group_id": class_id
        }))
        .send()
        .await
        .expect("Failed to create student")
        .json()
        .await
        .expect("Invalid student body");

    student["id"].as_i64().unwrap()
}

/// Creates a five-question test with the key A,B,C,D,A.
async fn seed_test(client: &reqwest::Client, address: &str, class_id: i64) -> i64 {
    let test: Value = client
        .post(format!("{}/api/tests", address))
        .json(&json!({
            "title": "Prova de Matemática",
            "applied_on": "2026-08-01",
            "class_group_id": class_id,
            "question_count": 5,
            "answer_key": ["A", "B", "C", "D", "A"]
        }))
        .send()
        .await
        .expect("Failed to create test")
        .json()
        .await
        .expect("Invalid test body");

    test["id"].as_i64().unwrap()
}

// -- tests ------------------------------------------------------------------

#[tokio::test]
async fn health_check_404() {
    // Arrange
    let address = spawn_app().await;
    let client = reqwest::Client::new();

    // Act
    let response = client
        .get(format!("{}/random_path_that_does_not_exist", address))
        .send()
        .await
        .expect("Failed to execute request");

    // Assert
    assert_eq!(response.status().as_u16(), 404);
}

#[tokio::test]
async fn school_crud_works() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();

    // Create
    let response = client
        .post(format!("{}/api/schools", address))
        .json(&json!({"name": "Escola Municipal", "address": "Av. Brasil, 1"}))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status().as_u16(), 201);
    let school: Value = response.json().await.unwrap();
    let id = school["id"].as_i64().unwrap();

    // Update
    let response = client
        .put(format!("{}/api/schools/{}", address, id))
        .json(&json!({"name": "Escola Estadual", "address": "Av. Brasil, 1"}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 200);

    // Delete
    let response = client
        .delete(format!("{}/api/schools/{}", address, id))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 204);

    // Gone
    let response = client
        .get(format!("{}/api/schools/{}", address, id))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 404);
}

#[tokio::test]
async fn create_test_rejects_key_length_mismatch() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();
    let (_school_id, class_id) = seed_class(&client, &address).await;

    let response = client
        .post(format!("{}/api/tests", address))
        .json(&json!({
            "title": "Prova",
            "applied_on": "2026-08-01",
            "class_group_id": class_id,
            "question_count": 5,
            "answer_key": ["A", "B"]
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 400);
}

#[tokio::test]
async fn create_test_rejects_bad_choice_letter() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();
    let (_school_id, class_id) = seed_class(&client, &address).await;

    let response = client
        .post(format!("{}/api/tests", address))
        .json(&json!({
            "title": "Prova",
            "applied_on": "2026-08-01",
            "class_group_id": class_id,
            "question_count": 2,
            "answer_key": ["A", "X"]
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 400);
}

#[tokio::test]
async fn manual_grading_full_flow() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();
    let (school_id, class_id) = seed_class(&client, &address).await;
    let student_id = seed_student(&client, &address, school_id, class_id).await;
    let test_id = seed_test(&client, &address, class_id).await;

    let response = client
        .post(format!("{}/api/tests/{}/grade", address, test_id))
        .json(&json!({
            "student_id": student_id,
            "answers": {"1": "A", "2": "B", "3": "C", "4": "D", "5": "A"}
        }))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status().as_u16(), 200);

    let body: Value = response.json().await.unwrap();
    let result = &body["result"];
    assert_eq!(result["correct_count"].as_i64(), Some(5));
    assert_eq!(result["incorrect_count"].as_i64(), Some(0));
    assert_eq!(result["score_pct"].as_f64(), Some(100.0));
    assert_eq!(result["judgment"].as_str(), Some("local"));
    assert_eq!(
        result["id"].as_str(),
        Some(format!("{}_{}", test_id, student_id).as_str())
    );
    // The raw submission is retained for audit
    assert_eq!(result["answers"]["1"].as_str(), Some("A"));
    assert_eq!(body["breakdown"].as_array().map(|a| a.len()), Some(5));
}

#[tokio::test]
async fn manual_grading_blocks_incomplete_submission() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();
    let (school_id, class_id) = seed_class(&client, &address).await;
    let student_id = seed_student(&client, &address, school_id, class_id).await;
    let test_id = seed_test(&client, &address, class_id).await;

    let response = client
        .post(format!("{}/api/tests/{}/grade", address, test_id))
        .json(&json!({
            "student_id": student_id,
            "answers": {"1": "A", "2": "B"}
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 400);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["code"].as_str(), Some("incomplete_submission"));

    // Nothing was written
    let results: Value = client
        .get(format!("{}/api/tests/{}/results", address, test_id))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(results["results"].as_array().map(|a| a.len()), Some(0));
}

#[tokio::test]
async fn manual_grading_rejects_out_of_range_question() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();
    let (school_id, class_id) = seed_class(&client, &address).await;
    let student_id = seed_student(&client, &address, school_id, class_id).await;
    let test_id = seed_test(&client, &address, class_id).await;

    let response = client
        .post(format!("{}/api/tests/{}/grade", address, test_id))
        .json(&json!({
            "student_id": student_id,
            "answers": {"1": "A", "2": "B", "3": "C", "4": "D", "9": "C"}
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 400);
}

#[tokio::test]
async fn regrading_overwrites_instead_of_duplicating() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();
    let (school_id, class_id) = seed_class(&client, &address).await;
    let student_id = seed_student(&client, &address, school_id, class_id).await;
    let test_id = seed_test(&client, &address, class_id).await;

    // First grading: everything A -> 2 of 5 correct
    let response = client
        .post(format!("{}/api/tests/{}/grade", address, test_id))
        .json(&json!({
            "student_id": student_id,
            "answers": {"1": "A", "2": "A", "3": "A", "4": "A", "5": "A"}
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["result"]["correct_count"].as_i64(), Some(2));
    assert_eq!(body["result"]["score_pct"].as_f64(), Some(40.0));

    // Re-grade with the corrected sheet
    let response = client
        .post(format!("{}/api/tests/{}/grade", address, test_id))
        .json(&json!({
            "student_id": student_id,
            "answers": {"1": "A", "2": "B", "3": "C", "4": "D", "5": "A"}
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 200);

    // Exactly one stored row, equal to the second write
    let results: Value = client
        .get(format!("{}/api/tests/{}/results", address, test_id))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let rows = results["results"].as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["correct_count"].as_i64(), Some(5));
    assert_eq!(results["stats"]["students_graded"].as_i64(), Some(1));
    assert_eq!(results["stats"]["mean_score_pct"].as_f64(), Some(100.0));
}

#[tokio::test]
async fn sheet_extraction_reports_partial_result() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();
    let (_school_id, class_id) = seed_class(&client, &address).await;
    let test_id = seed_test(&client, &address, class_id).await;

    let response = client
        .post(format!("{}/api/tests/{}/sheet", address, test_id))
        .json(&json!({"text": "1. A\n2-B\n9 C\nnot a line\n"}))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["recognized_count"].as_i64(), Some(3));
    assert_eq!(body["answers"]["1"].as_str(), Some("A"));
    assert_eq!(body["answers"]["2"].as_str(), Some("B"));
    // Out of range but well-formed: kept, grading will reject it later
    assert_eq!(body["answers"]["9"].as_str(), Some("C"));
    assert_eq!(body["missing"], json!([3, 4, 5]));
}

#[tokio::test]
async fn sheet_extraction_empty_is_a_distinct_state() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();
    let (_school_id, class_id) = seed_class(&client, &address).await;
    let test_id = seed_test(&client, &address, class_id).await;

    let response = client
        .post(format!("{}/api/tests/{}/sheet", address, test_id))
        .json(&json!({"text": "nome: Maria\nturma 7B\n"}))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 422);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["code"].as_str(), Some("recognition_empty"));
}

#[tokio::test]
async fn results_of_ungraded_test_are_zeroed() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();
    let (_school_id, class_id) = seed_class(&client, &address).await;
    let test_id = seed_test(&client, &address, class_id).await;

    let results: Value = client
        .get(format!("{}/api/tests/{}/results", address, test_id))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(results["results"].as_array().map(|a| a.len()), Some(0));
    assert_eq!(results["stats"]["students_graded"].as_i64(), Some(0));
    assert_eq!(results["stats"]["total_correct"].as_i64(), Some(0));
    assert_eq!(results["stats"]["mean_score_pct"].as_f64(), Some(0.0));
}

#[tokio::test]
async fn vision_grading_stores_the_trusted_judgment() {
    let grader_url = spawn_mock_grader().await;
    let address = spawn_app_with_grader(Some(grader_url)).await;
    let client = reqwest::Client::new();
    let (school_id, class_id) = seed_class(&client, &address).await;
    let student_id = seed_student(&client, &address, school_id, class_id).await;
    let test_id = seed_test(&client, &address, class_id).await;

    let response = client
        .post(format!("{}/api/tests/{}/grade/vision", address, test_id))
        .json(&json!({
            "student_id": student_id,
            "photo_data_uri": "data:image/png;base64,aGVsbG8=",
            "answer_key_data_uri": "data:image/jpeg;base64,d29ybGQ="
        }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status().as_u16(), 200);
    let body: Value = response.json().await.unwrap();
    let result = &body["result"];
    assert_eq!(result["correct_count"].as_i64(), Some(4));
    assert_eq!(result["incorrect_count"].as_i64(), Some(1));
    assert_eq!(result["score_pct"].as_f64(), Some(80.0));
    assert_eq!(result["judgment"].as_str(), Some("vision"));
    // The vision path never sees individual letters
    assert!(result["answers"].is_null());
    assert_eq!(body["corrections"].as_array().map(|a| a.len()), Some(5));

    // Persisted under the same deterministic key as local grading
    let results: Value = client
        .get(format!("{}/api/tests/{}/results", address, test_id))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let rows = results["results"].as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["judgment"].as_str(), Some("vision"));
}

#[tokio::test]
async fn vision_failure_is_surfaced_and_nothing_is_stored() {
    let grader_url = spawn_failing_grader().await;
    let address = spawn_app_with_grader(Some(grader_url)).await;
    let client = reqwest::Client::new();
    let (school_id, class_id) = seed_class(&client, &address).await;
    let student_id = seed_student(&client, &address, school_id, class_id).await;
    let test_id = seed_test(&client, &address, class_id).await;

    let response = client
        .post(format!("{}/api/tests/{}/grade/vision", address, test_id))
        .json(&json!({
            "student_id": student_id,
            "photo_data_uri": "data:image/png;base64,aGVsbG8=",
            "answer_key_data_uri": "data:image/jpeg;base64,d29ybGQ="
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 502);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["code"].as_str(), Some("remote_failure"));
    // The remote's own words come through
    assert!(body["error"].as_str().unwrap().contains("model refused"));

    let results: Value = client
        .get(format!("{}/api/tests/{}/results", address, test_id))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(results["results"].as_array().map(|a| a.len()), Some(0));
}

#[tokio::test]
async fn vision_grading_rejects_plain_urls() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();
    let (school_id, class_id) = seed_class(&client, &address).await;
    let student_id = seed_student(&client, &address, school_id, class_id).await;
    let test_id = seed_test(&client, &address, class_id).await;

    let response = client
        .post(format!("{}/api/tests/{}/grade/vision", address, test_id))
        .json(&json!({
            "student_id": student_id,
            "photo_data_uri": "https://example.com/sheet.png",
            "answer_key_data_uri": "data:image/jpeg;base64,d29ybGQ="
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 400);
}

#[tokio::test]
async fn result_deletion_is_explicit_only() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();
    let (school_id, class_id) = seed_class(&client, &address).await;
    let student_id = seed_student(&client, &address, school_id, class_id).await;
    let test_id = seed_test(&client, &address, class_id).await;

    client
        .post(format!("{}/api/tests/{}/grade", address, test_id))
        .json(&json!({
            "student_id": student_id,
            "answers": {"1": "A", "2": "B", "3": "C", "4": "D", "5": "A"}
        }))
        .send()
        .await
        .unwrap();

    let result_id = format!("{}_{}", test_id, student_id);
    let response = client
        .delete(format!("{}/api/results/{}", address, result_id))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 204);

    // Second delete finds nothing
    let response = client
        .delete(format!("{}/api/results/{}", address, result_id))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 404);
}

#[tokio::test]
async fn grading_rejects_student_from_another_class() {
    let address = spawn_app().await;
    let client = reqwest::Client::new();
    let (school_id, class_id) = seed_class(&client, &address).await;
    let (_other_school, other_class) = seed_class(&client, &address).await;
    let student_id = seed_student(&client, &address, school_id, class_id).await;
    let test_id = seed_test(&client, &address, other_class).await;

    let response = client
        .post(format!("{}/api/tests/{}/grade", address, test_id))
        .json(&json!({
            "student_id": student_id,
            "answers": {"1": "A", "2": "B", "3": "C", "4": "D", "5": "A"}
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 400);
}
