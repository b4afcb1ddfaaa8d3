use async_trait::async_trait;

use crate::errors::CoreError;
use crate::models::checkout::{PaymentReceipt, PaymentRequest};
use crate::models::furniture::Furniture;
use crate::models::preferences::ProfilePreferences;
use crate::models::transaction::Transaction;
use crate::models::user::{Credentials, RequestContext, User};

/// Every call the client makes to the rental REST backend.
///
/// The HTTP implementation lives in [`super::http::HttpBackend`]. Tests and
/// alternative transports implement this trait directly; nothing above this
/// layer knows about URLs or status codes.
///
/// Authenticated calls receive their credentials through `ctx`; no
/// implementation may fall back to ambient state.
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
pub trait RentalBackend: Send + Sync {
    /// Human-readable name of this backend (for logs/errors).
    fn name(&self) -> &str;

    /// Exchange credentials for a bearer token.
    async fn login(&self, credentials: &Credentials) -> Result<String, CoreError>;

    /// The user the token in `ctx` belongs to.
    async fn get_profile(&self, ctx: &RequestContext) -> Result<User, CoreError>;

    /// The full furniture catalog, in server order.
    async fn list_furniture(&self, ctx: &RequestContext) -> Result<Vec<Furniture>, CoreError>;

    /// Submit a checkout.
    async fn process_payment(
        &self,
        ctx: &RequestContext,
        request: &PaymentRequest,
    ) -> Result<PaymentReceipt, CoreError>;

    /// Store the user's rental preferences.
    async fn save_preferences(
        &self,
        ctx: &RequestContext,
        preferences: &ProfilePreferences,
    ) -> Result<(), CoreError>;

    /// A user's purchase history, in server order.
    async fn get_transaction_history(
        &self,
        ctx: &RequestContext,
        email: &str,
    ) -> Result<Vec<Transaction>, CoreError>;
}
