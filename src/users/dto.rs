use serde::Deserialize;

/// Admin-side user update. Unlike self-update this may also move the
/// target between roles.
#[derive(Debug, Deserialize)]
pub struct UpdateUserRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub role: Option<String>,
}
