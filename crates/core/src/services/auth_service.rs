use crate::backend::traits::RentalBackend;
use crate::errors::CoreError;
use crate::models::user::{Credentials, Session};

/// Shown for any login the backend refuses, whatever the reason it gives.
pub const INVALID_LOGIN_MESSAGE: &str = "Invalid email or password.";

/// Signs users in against the backend.
pub struct AuthService;

impl AuthService {
    pub fn new() -> Self {
        Self
    }

    /// Validate the credentials, exchange them for a token and open a session.
    ///
    /// A 4xx answer is reported as a uniform "Invalid email or password." so
    /// the message never reveals which half was wrong.
    pub async fn login(
        &self,
        backend: &dyn RentalBackend,
        credentials: &Credentials,
    ) -> Result<Session, CoreError> {
        credentials.validate()?;

        let token = backend.login(credentials).await.map_err(|e| match e {
            CoreError::Api { status, .. } if (400..500).contains(&status) => CoreError::Api {
                status,
                message: INVALID_LOGIN_MESSAGE.to_string(),
            },
            other => other,
        })?;

        tracing::info!(email = %credentials.email, backend = backend.name(), "signed in");
        Ok(Session::new(credentials.email.clone(), token))
    }
}

impl Default for AuthService {
    fn default() -> Self {
        Self::new()
    }
}
