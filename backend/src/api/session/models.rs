use serde::{Deserialize, Serialize};

/// Body of `POST /api/sessions/revoke-all`. The whole body may be omitted.
#[derive(Debug, Default, Deserialize)]
pub struct RevokeAllRequest {
    /// Refresh token of the session to keep, usually the caller's own
    pub except_token: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RevokeAllResponse {
    pub revoked_count: u64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CleanupResponse {
    pub deleted_count: u64,
}
