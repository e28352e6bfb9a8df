use chrono::{DateTime, Utc};
use serde::{Serialize, Deserialize};
use uuid::Uuid;

pub const API_ROOT_PATH: &str = "/api";
pub const HEALTH_PATH: &str = "/api/health";
pub const TEST_PATH: &str = "/api/test";
pub const ROUTES_PATH: &str = "/api/routes";
pub const DEBUG_POST_PATH: &str = "/api/debug-post";
pub const REGISTER_PATH: &str = "/api/auth/register";

/// body of `POST /api/auth/register`
///
/// only the username and password are ever transmitted. the sign-up form
/// also collects an email and a password confirmation but those stay on the
/// client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrationRequest {
    pub username: Box<str>,
    pub password: Box<str>,
}

/// public view of a stored user, the password is never part of it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisteredUser {
    pub id: Uuid,
    pub username: Box<str>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Registered {
    pub message: Box<str>,
    pub user: RegisteredUser,
}

/// json envelope carried by every non 2xx response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub message: Box<str>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<Box<str>>,
}
