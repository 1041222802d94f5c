//! Opaque bearer credential.

use secrecy::{ExposeSecret, SecretString};

use super::id::UserId;

/// An authenticated user's bearer credential.
///
/// Issued by the login/register endpoints and forwarded verbatim on every
/// authenticated call. The token is opaque: nothing in the client inspects
/// its structure, and `Debug` redacts it.
#[derive(Clone)]
pub struct Credential {
    user_id: UserId,
    token: SecretString,
}

impl Credential {
    /// Create a credential from a user id and bearer token.
    #[must_use]
    pub fn new(user_id: UserId, token: SecretString) -> Self {
        Self { user_id, token }
    }

    /// The authenticated user's id.
    #[must_use]
    pub const fn user_id(&self) -> UserId {
        self.user_id
    }

    /// Expose the bearer token for an `Authorization` header.
    #[must_use]
    pub fn bearer_token(&self) -> &str {
        self.token.expose_secret()
    }
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credential")
            .field("user_id", &self.user_id)
            .field("token", &"[REDACTED]")
            .finish()
    }
}
