//! HTTP API request/response DTOs for the relay.

use serde::{Deserialize, Serialize};

/// Response of `GET /online`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OnlineUsersDto {
    pub online_users: Vec<String>,
    pub count: usize,
}

/// Response of `GET /api/users/{id}/pending`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PendingCountDto {
    pub user_id: String,
    pub pending: usize,
}

/// Successful status response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusDto {
    pub status: String,
}

/// Error response body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDto {
    pub error: String,
}
