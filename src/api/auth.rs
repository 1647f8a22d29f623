use serde::Deserialize;
use serde_json::json;
use tracing::info;

use crate::client::{ApiRequest, Gateway, Payload};
use crate::error::ApiError;

#[derive(Debug, Deserialize)]
struct LoginResponse {
    access_token: String,
}

#[derive(Debug, Deserialize)]
struct RegisterResponse {
    #[serde(default)]
    message: String,
}

/// Authentication and account registration.
///
/// `login` is the only writer that ever sets a session token; the gateway
/// and `logout` only clear it.
#[derive(Debug, Clone)]
pub struct AuthApi {
    gateway: Gateway,
}

impl AuthApi {
    pub fn new(gateway: Gateway) -> Self {
        Self { gateway }
    }

    /// Exchange credentials for a session token and store it.
    ///
    /// Credentials go out form-urlencoded; the call itself is exempt from
    /// the bearer header. On success the token is immediately retrievable
    /// from the session store and attached to the next dispatched call.
    pub async fn login(&self, username: &str, password: &str) -> Result<(), ApiError> {
        require_credentials(username, password)?;

        let request = ApiRequest::post("/login", "login failed").with_payload(Payload::Form(vec![
            ("username".to_string(), username.to_string()),
            ("password".to_string(), password.to_string()),
        ]));

        let response: LoginResponse = self.gateway.send_json(request).await?;
        self.gateway.session().set_token(response.access_token);
        info!(username, "logged in");
        Ok(())
    }

    /// Create an account. Returns the service's acknowledgment message.
    pub async fn register(&self, username: &str, password: &str) -> Result<String, ApiError> {
        require_credentials(username, password)?;

        let request = ApiRequest::post("/register", "registration failed").with_payload(
            Payload::Json(json!({ "username": username, "password": password })),
        );

        let response: RegisterResponse = self.gateway.send_json(request).await?;
        Ok(response.message)
    }

    /// Drop the current session. Purely local; idempotent.
    pub fn logout(&self) {
        self.gateway.session().clear_token();
        info!("logged out");
    }
}

fn require_credentials(username: &str, password: &str) -> Result<(), ApiError> {
    if username.trim().is_empty() {
        return Err(ApiError::Validation("username must not be empty".to_string()));
    }
    if password.is_empty() {
        return Err(ApiError::Validation("password must not be empty".to_string()));
    }
    Ok(())
}
