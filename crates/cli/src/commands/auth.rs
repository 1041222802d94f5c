//! Account commands: register and login.

use super::{CliError, client};

/// Register a new account and print the issued user id.
pub async fn register(name: &str, password: &str) -> Result<(), CliError> {
    let user = client()?.register(name, password).await?;
    tracing::info!("Registered {} with user id {}", user.name, user.id);
    tracing::info!("Log in with: furima login -u {} -p <password>", user.id);
    Ok(())
}

/// Log in and print the credential environment variables to export.
pub async fn login(user_id: i64, password: &str) -> Result<(), CliError> {
    let authenticated = client()?
        .login(furima_core::UserId::new(user_id), password)
        .await?;

    tracing::info!("Logged in as {}", authenticated.user.name);
    tracing::info!("export FURIMA_USER_ID={}", authenticated.user.id);
    tracing::info!(
        "export FURIMA_TOKEN={}",
        authenticated.credential.bearer_token()
    );
    Ok(())
}
