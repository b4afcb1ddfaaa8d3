use crate::backend::traits::RentalBackend;
use crate::errors::CoreError;
use crate::models::metrics::Dashboard;
use crate::models::transaction::Transaction;
use crate::models::user::RequestContext;
use crate::services::metrics_service;

/// Fetches a user's purchase history and turns it into dashboard data.
///
/// One fetch per call, no retry and no caching: the caller decides whether to
/// show the error and try again.
pub struct DashboardService;

impl DashboardService {
    pub fn new() -> Self {
        Self
    }

    /// Fetch the transaction history for `email`, in server order.
    ///
    /// A blank email is rejected before any request is made.
    pub async fn fetch_history(
        &self,
        backend: &dyn RentalBackend,
        ctx: &RequestContext,
        email: &str,
    ) -> Result<Vec<Transaction>, CoreError> {
        let email = email.trim();
        if email.is_empty() {
            return Err(CoreError::Validation(
                "email: An email address is required to load transaction history.".into(),
            ));
        }

        let transactions = backend.get_transaction_history(ctx, email).await?;
        tracing::debug!(count = transactions.len(), "fetched transaction history");
        Ok(transactions)
    }

    /// Fetch the history and aggregate it.
    pub async fn load_dashboard(
        &self,
        backend: &dyn RentalBackend,
        ctx: &RequestContext,
        email: &str,
    ) -> Result<Dashboard, CoreError> {
        let transactions = self.fetch_history(backend, ctx, email).await?;
        let metrics = metrics_service::aggregate(&transactions);
        tracing::info!(
            transactions = transactions.len(),
            total_spent = %metrics.total_spent,
            months = metrics.monthly_spending.len(),
            "dashboard ready"
        );
        Ok(Dashboard {
            transactions,
            metrics,
        })
    }
}

impl Default for DashboardService {
    fn default() -> Self {
        Self::new()
    }
}
