use serde::Serialize;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AuthState {
    pub logged_in: bool,
    pub username: String,
    pub gravatar: String,
    pub auth_token: String,
}

impl AuthState {
    pub fn signed_in(username: impl Into<String>, gravatar: impl Into<String>) -> Self {
        Self {
            logged_in: true,
            username: username.into(),
            gravatar: gravatar.into(),
            auth_token: String::new(),
        }
    }

    pub fn signed_out() -> Self {
        Self::default()
    }
}
