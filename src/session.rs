use std::env;

/// An authenticated identity handed to us by the auth provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub user_id: String,
    pub access_token: String,
}

pub trait SessionProvider {
    fn current_session(&self) -> Option<Session>;
}

/// Reads `SPIDER_LOG_USER_ID` and `SPIDER_LOG_ACCESS_TOKEN`.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvSessionProvider;

pub const USER_ID_VAR: &str = "SPIDER_LOG_USER_ID";
pub const ACCESS_TOKEN_VAR: &str = "SPIDER_LOG_ACCESS_TOKEN";

impl SessionProvider for EnvSessionProvider {
    fn current_session(&self) -> Option<Session> {
        let user_id = non_empty_var(USER_ID_VAR)?;
        let access_token = non_empty_var(ACCESS_TOKEN_VAR)?;
        Some(Session {
            user_id,
            access_token,
        })
    }
}

/// A provider that never has a session; forces the local backend.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoSession;

impl SessionProvider for NoSession {
    fn current_session(&self) -> Option<Session> {
        None
    }
}

impl SessionProvider for Option<Session> {
    fn current_session(&self) -> Option<Session> {
        self.clone()
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}
