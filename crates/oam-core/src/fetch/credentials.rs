//! Optional HTTP Basic credentials for private sources.

use std::fmt;

/// Username and token pair. Only constructed when both are non-empty.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    username: String,
    token: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, token: impl Into<String>) -> Option<Self> {
        let username = username.into();
        let token = token.into();
        if username.is_empty() || token.is_empty() {
            return None;
        }
        Some(Self { username, token })
    }

    /// Read credentials from the named environment variables.
    pub fn from_env(username_var: &str, token_var: &str) -> Option<Self> {
        Self::from_lookup(|key| std::env::var(key).ok(), username_var, token_var)
    }

    /// Like `from_env` with a custom variable lookup.
    pub fn from_lookup<F>(lookup: F, username_var: &str, token_var: &str) -> Option<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        Self::new(lookup(username_var)?, lookup(token_var)?)
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn token(&self) -> &str {
        &self.token
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("token", &"<redacted>")
            .finish()
    }
}
