use crate::backend::traits::RentalBackend;
use crate::errors::CoreError;
use crate::models::category::FurnitureCategory;
use crate::models::checkout::{PaymentReceipt, PaymentRequest};
use crate::models::furniture::Furniture;
use crate::models::user::{RequestContext, Session};

/// Catalog listing and checkout.
pub struct MarketplaceService;

impl MarketplaceService {
    pub fn new() -> Self {
        Self
    }

    /// The catalog, optionally narrowed to one category. Server order is kept.
    pub async fn list_furniture(
        &self,
        backend: &dyn RentalBackend,
        ctx: &RequestContext,
        filter: Option<&FurnitureCategory>,
    ) -> Result<Vec<Furniture>, CoreError> {
        let catalog = backend.list_furniture(ctx).await?;
        Ok(filter_by_category(catalog, filter))
    }

    /// Buy `quantity` units of one piece of furniture with the session's
    /// account, paying by card.
    pub async fn checkout(
        &self,
        backend: &dyn RentalBackend,
        session: &Session,
        furniture_id: &str,
        quantity: u32,
    ) -> Result<PaymentReceipt, CoreError> {
        let request = PaymentRequest::single(session.email.clone(), furniture_id.trim(), quantity);
        request.validate()?;

        let receipt = backend
            .process_payment(&session.context(), &request)
            .await
            .inspect_err(|e| tracing::warn!(furniture = furniture_id, error = %e, "payment failed"))?;

        tracing::info!(furniture = furniture_id, quantity, "payment processed");
        Ok(receipt)
    }
}

impl Default for MarketplaceService {
    fn default() -> Self {
        Self::new()
    }
}

/// Keep only items in `filter`; `None` keeps everything.
pub fn filter_by_category(catalog: Vec<Furniture>, filter: Option<&FurnitureCategory>) -> Vec<Furniture> {
    match filter {
        Some(category) => catalog
            .into_iter()
            .filter(|f| &f.category == category)
            .collect(),
        None => catalog,
    }
}
