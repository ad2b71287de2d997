pub mod error;
pub mod extractors;
pub mod routes;
pub mod state;

use axum::{
    Router,
    http::HeaderValue,
    routing::{delete, get, patch, post, put},
};
use state::AppState;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

fn cors_layer(origins: &[String]) -> CorsLayer {
    let cors = CorsLayer::new().allow_methods(Any).allow_headers(Any);

    if origins.is_empty() || origins.iter().any(|o| o == "*") {
        return cors.allow_origin(Any);
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|o| HeaderValue::from_str(o).ok())
        .collect();
    cors.allow_origin(allowed)
}

pub fn build_router(state: AppState) -> Router {
    let cors = cors_layer(&state.settings.app.cors_origins);

    let realtor_auth_routes = Router::new()
        .route("/register", post(routes::realtor_auth::register))
        .route("/login", post(routes::realtor_auth::login))
        .route("/me", get(routes::realtor_auth::me))
        .route("/profile", put(routes::realtor_auth::update_profile));

    let admin_auth_routes = Router::new()
        .route("/login", post(routes::admin_auth::login))
        .route("/me", get(routes::admin_auth::me))
        .route("/admins", post(routes::admin_auth::create_admin));

    let student_auth_routes = Router::new()
        .route("/register", post(routes::student_auth::register))
        .route("/login", post(routes::student_auth::login))
        .route("/me", get(routes::student_auth::me));

    let admin_panel_routes = Router::new()
        .route("/overview", get(routes::admin_panel::overview))
        .route("/realtors", get(routes::admin_panel::list_realtors))
        .route("/realtors/{realtor_id}", get(routes::admin_panel::get_realtor))
        .route(
            "/realtors/{realtor_id}/approve",
            put(routes::admin_panel::approve),
        )
        .route(
            "/realtors/{realtor_id}/suspend",
            put(routes::admin_panel::toggle_suspension),
        )
        .route(
            "/realtors/{realtor_id}/reject",
            delete(routes::admin_panel::reject),
        )
        .route(
            "/hostels/{hostel_id}",
            delete(routes::admin_panel::delete_hostel),
        );

    let hostel_routes = Router::new()
        .route("/", get(routes::hostel::list).post(routes::hostel::create))
        .route("/mine", get(routes::hostel::mine))
        .route(
            "/{hostel_id}",
            get(routes::hostel::get)
                .put(routes::hostel::update)
                .delete(routes::hostel::delete),
        )
        .route(
            "/{hostel_id}/availability",
            patch(routes::hostel::toggle_availability),
        );

    let application_routes = Router::new()
        .route("/submit", post(routes::application::submit))
        .route("/realtor/list", get(routes::application::realtor_list))
        .route("/realtor/stats", get(routes::application::realtor_stats))
        .route("/student/mine", get(routes::application::student_mine))
        .route(
            "/{application_id}",
            get(routes::application::get).delete(routes::application::cancel),
        )
        .route(
            "/{application_id}/status",
            patch(routes::application::update_status),
        )
        .route(
            "/{application_id}/messages",
            post(routes::application::student_message),
        )
        .route(
            "/{application_id}/realtor-messages",
            post(routes::application::realtor_message),
        );

    let api = Router::new()
        .nest("/realtor-auth", realtor_auth_routes)
        .nest("/admin-auth", admin_auth_routes)
        .nest("/student-auth", student_auth_routes)
        .nest("/admin-panel", admin_panel_routes)
        .nest("/hostels", hostel_routes)
        .nest("/applications", application_routes);

    let health = Router::new().route("/health", get(health_check));

    Router::new()
        .nest("/api", api)
        .merge(health)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

async fn health_check() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
