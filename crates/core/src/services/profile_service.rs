use crate::backend::traits::RentalBackend;
use crate::errors::CoreError;
use crate::models::preferences::ProfilePreferences;
use crate::models::user::{RequestContext, User};

/// Reads the signed-in user and stores their rental preferences.
pub struct ProfileService;

impl ProfileService {
    pub fn new() -> Self {
        Self
    }

    pub async fn current_user(
        &self,
        backend: &dyn RentalBackend,
        ctx: &RequestContext,
    ) -> Result<User, CoreError> {
        backend.get_profile(ctx).await
    }

    /// Validate the form and post it. Nothing is sent when validation fails.
    pub async fn save_preferences(
        &self,
        backend: &dyn RentalBackend,
        ctx: &RequestContext,
        preferences: &ProfilePreferences,
    ) -> Result<(), CoreError> {
        preferences.validate()?;
        backend.save_preferences(ctx, preferences).await?;
        tracing::info!(
            apartment_size = %preferences.apartment_size,
            "preferences saved"
        );
        Ok(())
    }
}

impl Default for ProfileService {
    fn default() -> Self {
        Self::new()
    }
}
