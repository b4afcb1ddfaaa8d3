pub mod ai;
pub mod backend;
pub mod errors;
pub mod models;
pub mod services;
pub mod storage;
pub mod validation;

use ai::gemini::GeminiModel;
use ai::traits::LanguageModel;
use backend::http::HttpBackend;
use backend::traits::RentalBackend;
use models::{
    category::FurnitureCategory,
    checkout::PaymentReceipt,
    furniture::Furniture,
    metrics::Dashboard,
    preferences::ProfilePreferences,
    recommendation::{RecommendationRequest, Recommendations, StyleAssessment, StyleAssessmentRequest},
    settings::Settings,
    transaction::Transaction,
    user::{Credentials, RequestContext, Session, User},
};
use services::{
    auth_service::AuthService,
    dashboard_service::DashboardService,
    marketplace_service::MarketplaceService,
    profile_service::ProfileService,
    recommendation_service::RecommendationService,
    report_service::{DashboardReport, ReportService},
};
use storage::vault;

use errors::CoreError;

/// Main entry point for the Rental Furnish client library.
/// Holds the backend, the in-memory session and all services that use them.
#[must_use]
pub struct RentalFurnish {
    backend: Box<dyn RentalBackend>,
    session: Option<Session>,
    auth_service: AuthService,
    profile_service: ProfileService,
    marketplace_service: MarketplaceService,
    dashboard_service: DashboardService,
    report_service: ReportService,
    recommendation_service: Option<RecommendationService>,
}

impl std::fmt::Debug for RentalFurnish {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RentalFurnish")
            .field("backend", &self.backend.name())
            .field("session", &self.session)
            .field(
                "model",
                &self.recommendation_service.as_ref().map(|r| r.model_name()),
            )
            .finish()
    }
}

impl RentalFurnish {
    /// Client for the HTTP backend described by `settings`, with Gemini
    /// recommendations enabled when a model API key is configured.
    pub fn from_settings(settings: &Settings) -> Result<Self, CoreError> {
        let backend = HttpBackend::new(settings)?;
        let client = Self::with_backend(Box::new(backend));
        Ok(match &settings.model {
            Some(model) => client.with_language_model(Box::new(GeminiModel::new(model)?)),
            None => client,
        })
    }

    /// Client over any backend implementation (tests, alternative transports).
    pub fn with_backend(backend: Box<dyn RentalBackend>) -> Self {
        Self {
            backend,
            session: None,
            auth_service: AuthService::new(),
            profile_service: ProfileService::new(),
            marketplace_service: MarketplaceService::new(),
            dashboard_service: DashboardService::new(),
            report_service: ReportService::new(),
            recommendation_service: None,
        }
    }

    /// Enable the recommendation flows with `model`.
    pub fn with_language_model(mut self, model: Box<dyn LanguageModel>) -> Self {
        self.recommendation_service = Some(RecommendationService::new(model));
        self
    }

    // ── Session ─────────────────────────────────────────────────────

    /// Sign in and keep the session in memory. Replaces any previous session.
    pub async fn login(&mut self, email: &str, password: &str) -> Result<&Session, CoreError> {
        let credentials = Credentials::new(email, password);
        let session = self
            .auth_service
            .login(self.backend.as_ref(), &credentials)
            .await?;
        Ok(self.session.insert(session))
    }

    /// Drop the current session. Returns whether one existed.
    pub fn logout(&mut self) -> bool {
        self.session.take().is_some()
    }

    #[must_use]
    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    #[must_use]
    pub fn is_logged_in(&self) -> bool {
        self.session.is_some()
    }

    /// Seal the current session with `passphrase` so it can be written to disk.
    pub fn export_session(&self, passphrase: &str) -> Result<Vec<u8>, CoreError> {
        let session = self.require_session("export_session")?;
        vault::seal_session(session, passphrase)
    }

    /// Open a sealed session and make it current.
    pub fn restore_session(&mut self, sealed: &[u8], passphrase: &str) -> Result<&Session, CoreError> {
        let session = vault::open_session(sealed, passphrase)?;
        Ok(self.session.insert(session))
    }

    // ── Profile ─────────────────────────────────────────────────────

    /// The signed-in user as the backend knows them.
    pub async fn current_user(&self) -> Result<User, CoreError> {
        let session = self.require_session("current_user")?;
        self.profile_service
            .current_user(self.backend.as_ref(), &session.context())
            .await
    }

    /// Validate and store rental preferences for the signed-in user.
    pub async fn save_preferences(&self, preferences: &ProfilePreferences) -> Result<(), CoreError> {
        let session = self.require_session("save_preferences")?;
        self.profile_service
            .save_preferences(self.backend.as_ref(), &session.context(), preferences)
            .await
    }

    // ── Marketplace ─────────────────────────────────────────────────

    /// The furniture catalog, optionally filtered to one category.
    /// Works signed out; the token is sent when a session exists.
    pub async fn list_furniture(
        &self,
        filter: Option<&FurnitureCategory>,
    ) -> Result<Vec<Furniture>, CoreError> {
        self.marketplace_service
            .list_furniture(self.backend.as_ref(), &self.context(), filter)
            .await
    }

    /// Buy furniture with the signed-in account.
    pub async fn checkout(&self, furniture_id: &str, quantity: u32) -> Result<PaymentReceipt, CoreError> {
        let session = self.require_session("checkout")?;
        self.marketplace_service
            .checkout(self.backend.as_ref(), session, furniture_id, quantity)
            .await
    }

    // ── Dashboard ───────────────────────────────────────────────────

    /// The signed-in user's purchases, in server order.
    pub async fn transaction_history(&self) -> Result<Vec<Transaction>, CoreError> {
        let session = self.require_session("transaction_history")?;
        self.dashboard_service
            .fetch_history(self.backend.as_ref(), &session.context(), &session.email)
            .await
    }

    /// Fetch the history and compute the spending metrics.
    pub async fn dashboard(&self) -> Result<Dashboard, CoreError> {
        let session = self.require_session("dashboard")?;
        self.dashboard_service
            .load_dashboard(self.backend.as_ref(), &session.context(), &session.email)
            .await
    }

    /// Format a dashboard for display.
    #[must_use]
    pub fn dashboard_report(&self, dashboard: &Dashboard) -> DashboardReport {
        self.report_service.build(dashboard)
    }

    /// Plain-text rendering of a dashboard report.
    #[must_use]
    pub fn render_dashboard(&self, report: &DashboardReport) -> String {
        self.report_service.render_text(report)
    }

    // ── Recommendations ─────────────────────────────────────────────

    #[must_use]
    pub fn recommendations_enabled(&self) -> bool {
        self.recommendation_service.is_some()
    }

    /// Assess the style of a room photo and suggest matching furniture.
    pub async fn assess_style(&self, request: &StyleAssessmentRequest) -> Result<StyleAssessment, CoreError> {
        self.require_model()?.assess_style(request).await
    }

    /// Personalised recommendations from preferences, budget and size.
    pub async fn generate_recommendations(
        &self,
        request: &RecommendationRequest,
    ) -> Result<Recommendations, CoreError> {
        self.require_model()?.generate_recommendations(request).await
    }

    // ── Internal ────────────────────────────────────────────────────

    fn context(&self) -> RequestContext {
        self.session
            .as_ref()
            .map(Session::context)
            .unwrap_or_else(RequestContext::anonymous)
    }

    fn require_session(&self, operation: &str) -> Result<&Session, CoreError> {
        self.session
            .as_ref()
            .ok_or_else(|| CoreError::NotLoggedIn(operation.to_string()))
    }

    fn require_model(&self) -> Result<&RecommendationService, CoreError> {
        self.recommendation_service.as_ref().ok_or_else(|| {
            CoreError::Config(
                "No language model configured; set GEMINI_API_KEY to enable recommendations".into(),
            )
        })
    }
}
