// src/routes.rs

use axum::{
    Router,
    http::Method,
    middleware,
    routing::{get, post},
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    handlers::{lessons, modules, progress, session},
    state::AppState,
    utils::jwt::{optional_session_middleware, session_middleware},
};

/// Assembles the main application router.
///
/// * Merges all sub-routers (lessons, modules, session, progress).
/// * Applies global middleware (Trace, CORS).
/// * Injects global state (registry, client storage, config).
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

    let lesson_routes = Router::new().route("/", get(lessons::list_lessons));

    // Progress is computed against the caller's session when one is presented.
    let module_routes = Router::new()
        .route("/", get(modules::list_modules))
        .route("/{module_id}", get(modules::get_module))
        .route("/{module_id}/lessons", get(lessons::list_module_lessons))
        .route(
            "/{module_id}/lessons/{lesson_id}",
            get(lessons::get_lesson),
        )
        .route(
            "/{module_id}/lessons/{lesson_id}/quiz",
            post(lessons::submit_quiz),
        )
        .layer(middleware::from_fn_with_state(
            state.clone(),
            optional_session_middleware,
        ));

    let session_routes = Router::new()
        .route("/", post(session::start_session))
        // Protected session routes
        .merge(
            Router::new()
                .route(
                    "/",
                    get(session::get_session)
                        .put(session::update_session)
                        .delete(session::end_session),
                )
                .layer(middleware::from_fn_with_state(
                    state.clone(),
                    session_middleware,
                )),
        );

    let progress_routes = Router::new()
        .route("/", get(progress::get_progress))
        .route("/{module_id}/{lesson_id}", post(progress::complete_lesson))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            session_middleware,
        ));

    Router::new()
        .nest("/api/lessons", lesson_routes)
        .nest("/api/modules", module_routes)
        .nest("/api/session", session_routes)
        .nest("/api/progress", progress_routes)
        // Global Middleware (applied from outside in)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
