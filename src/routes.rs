// src/routes.rs

use axum::{
    Router,
    http::Method,
    routing::{delete, get, post, put},
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::handlers::{class_groups, grading, questions, results, schools, students, tests};
use crate::state::AppState;

/// Assembles the main application router.
///
/// * Merges all sub-routers (schools, classes, students, tests, results).
/// * Applies global middleware (Trace, CORS).
/// * Injects global state (pool, config, vision grader).
pub fn create_router(state: AppState) -> Router {
    let origins = [
        "http://localhost:3000".parse().unwrap(),
        "http://127.0.0.1:3000".parse().unwrap(),
    ];

    let cors = CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([
            axum::http::header::AUTHORIZATION,
            axum::http::header::CONTENT_TYPE,
        ]);

    let school_routes = Router::new()
        .route("/", get(schools::list_schools).post(schools::create_school))
        .route(
            "/{id}",
            get(schools::get_school)
                .put(schools::update_school)
                .delete(schools::delete_school),
        );

    let class_routes = Router::new()
        .route(
            "/",
            get(class_groups::list_class_groups).post(class_groups::create_class_group),
        )
        .route(
            "/{id}",
            get(class_groups::get_class_group)
                .put(class_groups::update_class_group)
                .delete(class_groups::delete_class_group),
        );

    let student_routes = Router::new()
        .route(
            "/",
            get(students::list_students).post(students::create_student),
        )
        .route(
            "/{id}",
            get(students::get_student)
                .put(students::update_student)
                .delete(students::delete_student),
        );

    let test_routes = Router::new()
        .route("/", get(tests::list_tests).post(tests::create_test))
        .route("/{id}", get(tests::get_test).delete(tests::delete_test))
        .route(
            "/{id}/questions",
            get(questions::list_questions).post(questions::create_question),
        )
        .route(
            "/{id}/questions/{question_id}",
            put(questions::update_question).delete(questions::delete_question),
        )
        // The three submission sources
        .route("/{id}/grade", post(grading::grade_manual))
        .route("/{id}/sheet", post(grading::extract_sheet))
        .route("/{id}/grade/vision", post(grading::grade_vision))
        // Results dashboard
        .route("/{id}/results", get(results::test_results));

    let result_routes = Router::new().route("/{id}", delete(results::delete_result));

    Router::new()
        .nest("/api/schools", school_routes)
        .nest("/api/classes", class_routes)
        .nest("/api/students", student_routes)
        .nest("/api/tests", test_routes)
        .nest("/api/results", result_routes)
        // Global Middleware (applied from outside in)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
