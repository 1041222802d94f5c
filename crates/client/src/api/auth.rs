//! Credential-source endpoints: registration and login.
//!
//! The rest of the client treats the issued token as opaque; these are the
//! only two calls that run without a credential.

use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use furima_core::{Credential, UserId};

use super::types::{AuthenticatedUser, RegisteredUser};
use super::MarketClient;
use crate::transport::ApiError;

impl MarketClient {
    /// Register a new user.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server rejects the
    /// registration.
    #[instrument(skip(self, password), fields(name = %name))]
    pub async fn register(&self, name: &str, password: &str) -> Result<RegisteredUser, ApiError> {
        #[derive(Serialize)]
        struct RegisterRequest<'a> {
            name: &'a str,
            password: &'a str,
        }

        self.transport()
            .post_json(
                "/register",
                None,
                &RegisterRequest { name, password },
            )
            .await
    }

    /// Log in and obtain a bearer credential.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the password is rejected.
    #[instrument(skip(self, password), fields(user_id = %user_id))]
    pub async fn login(
        &self,
        user_id: UserId,
        password: &str,
    ) -> Result<AuthenticatedUser, ApiError> {
        #[derive(Serialize)]
        struct LoginRequest<'a> {
            user_id: UserId,
            password: &'a str,
        }

        #[derive(Deserialize)]
        struct LoginResponse {
            id: UserId,
            name: String,
            token: String,
        }

        let response: LoginResponse = self
            .transport()
            .post_json("/login", None, &LoginRequest { user_id, password })
            .await?;

        Ok(AuthenticatedUser {
            credential: Credential::new(response.id, SecretString::from(response.token)),
            user: RegisteredUser {
                id: response.id,
                name: response.name,
            },
        })
    }
}
