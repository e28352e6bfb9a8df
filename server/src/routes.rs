use std::sync::Arc;

use axum::{
    Router,
    Json,
    extract::{DefaultBodyLimit, State, rejection::JsonRejection},
    http::{Method, StatusCode, Uri},
    response::IntoResponse,
    routing::{get, post},
};
use chrono::{SecondsFormat, Utc};
use common::{Registered, API_ROOT_PATH, DEBUG_POST_PATH, HEALTH_PATH, REGISTER_PATH, ROUTES_PATH, TEST_PATH};
use serde_json::{json, Map, Value};

use crate::error::ServerError;
use crate::state::AppState;
use crate::store::NewUser;
use crate::validation::validate_registration;

pub const BODY_LIMIT: usize = 10 * 1024 * 1024;

pub const AVAILABLE_ROUTES: [&str; 6] = [
    "GET /api/health",
    "GET /api",
    "GET /api/test",
    "GET /api/routes",
    "POST /api/debug-post",
    "POST /api/auth/register",
];

/// Known paths hit with another method get the same 404 as unknown paths.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route(HEALTH_PATH, get(health).fallback(not_found))
        .route(API_ROOT_PATH, get(api_info).fallback(not_found))
        .route(TEST_PATH, get(env_test).fallback(not_found))
        .route(ROUTES_PATH, get(routes_list).fallback(not_found))
        .route(DEBUG_POST_PATH, post(debug_post).fallback(not_found))
        .route(REGISTER_PATH, post(register).fallback(not_found))
        .fallback(not_found)
        .with_state(state)
        .layer(DefaultBodyLimit::max(BODY_LIMIT))
}

fn timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

async fn health(State(state): State<Arc<AppState>>) -> Json<Value> {
    log::info!("health request");

    Json(json!({
        "status": "OK",
        "timestamp": timestamp(),
        "environment": state.environment,
    }))
}

async fn api_info(State(state): State<Arc<AppState>>) -> Json<Value> {
    Json(json!({
        "message": "Backend API is running",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": timestamp(),
        "environment": state.environment,
    }))
}

/// reports which settings are present, never their values
async fn env_test(State(state): State<Arc<AppState>>) -> Json<Value> {
    Json(json!({
        "message": "Test endpoint working",
        "timestamp": timestamp(),
        "environment": state.environment,
        "envVars": {
            "hasMongoUri": state.has_mongo_uri,
            "hasJwtSecret": state.has_jwt_secret,
            "appEnv": state.environment,
        }
    }))
}

async fn routes_list() -> Json<Value> {
    Json(json!({
        "availableRoutes": AVAILABLE_ROUTES,
        "timestamp": timestamp(),
    }))
}

async fn debug_post(payload: Result<Json<Value>, JsonRejection>) -> Result<Json<Value>, ServerError> {
    let Json(received) = payload.map_err(|rejection| {
        ServerError::Validation(rejection.body_text().into_boxed_str())
    })?;

    log::debug!("debug post received {}", received);

    Ok(Json(json!({
        "message": "Debug POST endpoint working",
        "receivedData": received,
        "timestamp": timestamp(),
    })))
}

async fn register(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<Value>, JsonRejection>
) -> Result<impl IntoResponse, ServerError> {
    log::info!("register request");

    let store = state.storage.ready()
        .inspect_err(|err| log::error!("register rejected {}", err))?;

    let body = match payload {
        Ok(Json(body)) => body,
        // a body that is not declared as json is read as no fields at all
        Err(JsonRejection::MissingJsonContentType(_)) => Value::Object(Map::new()),
        Err(rejection) => {
            log::warn!("register unreadable body {}", rejection.body_text());

            return Err(ServerError::Validation(rejection.body_text().into_boxed_str()));
        }
    };

    let req = validate_registration(&body).map_err(|violation| {
        log::warn!("register failed validation {}", violation);

        ServerError::Validation(violation.to_string().into_boxed_str())
    })?;

    let new_user = NewUser {
        username: req.username,
        password: req.password,
    };

    let record = match store.create_user(new_user).await {
        Ok(record) => record,
        Err(err) => {
            log::warn!("register failed to create user {}", err);

            return Err(err.into());
        }
    };

    log::info!("registered user {} ({})", record.username, record.id);

    Ok((StatusCode::CREATED, Json(Registered {
        message: "User registered successfully".into(),
        user: record.public(),
    })))
}

async fn not_found(method: Method, uri: Uri) -> impl IntoResponse {
    log::info!("no route for {} {}", method, uri.path());

    (StatusCode::NOT_FOUND, Json(json!({
        "message": "Route not found",
        "requestedPath": uri.path(),
        "method": method.as_str(),
        "availableRoutes": AVAILABLE_ROUTES,
    })))
}
