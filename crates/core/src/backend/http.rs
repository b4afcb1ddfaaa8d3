use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, Url};
use serde::de::DeserializeOwned;
#[cfg(not(target_arch = "wasm32"))]
use std::time::Duration;

use super::traits::RentalBackend;
use crate::errors::{redact_query, CoreError};
use crate::models::checkout::{PaymentReceipt, PaymentRequest};
use crate::models::furniture::Furniture;
use crate::models::preferences::ProfilePreferences;
use crate::models::settings::Settings;
use crate::models::transaction::Transaction;
use crate::models::user::{Credentials, LoginResponse, ProfileResponse, RequestContext, User};

const HISTORY_FALLBACK: &str = "Failed to fetch transaction history";
const LOGIN_FALLBACK: &str = "Invalid email or password.";
const PAYMENT_FALLBACK: &str = "Payment failed. Please try again later.";
const PREFERENCES_FALLBACK: &str = "Failed to update preferences";
const PROFILE_FALLBACK: &str = "Failed to load profile";
const FURNITURE_FALLBACK: &str = "Failed to load furniture";

/// `reqwest` client for the rental REST backend.
///
/// - **Auth**: `Authorization: Bearer <token>` taken from the per-call
///   [`RequestContext`].
/// - **Timeout**: `Settings::request_timeout_secs` (10 s by default).
/// - **Errors**: non-2xx responses become `CoreError::Api` carrying the
///   backend's `message` when it sends one.
pub struct HttpBackend {
    client: Client,
    base_url: Url,
}

impl HttpBackend {
    pub fn new(settings: &Settings) -> Result<Self, CoreError> {
        settings.validate()?;
        let base_url = Url::parse(settings.api_base_url.trim())
            .map_err(|e| CoreError::Config(format!("Invalid API base URL: {e}")))?;

        let builder = Client::builder();
        #[cfg(not(target_arch = "wasm32"))]
        let builder = builder.timeout(Duration::from_secs(settings.request_timeout_secs));
        let client = builder
            .build()
            .map_err(|e| CoreError::Config(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Join path segments onto the base URL. Each segment is percent-encoded,
    /// so user data (an email) can never escape its segment.
    pub fn endpoint(&self, segments: &[&str]) -> Result<Url, CoreError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| CoreError::Config(format!("API base URL '{}' cannot have a path", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn authorize(&self, request: RequestBuilder, ctx: &RequestContext) -> RequestBuilder {
        match ctx.bearer_token() {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn send(&self, request: RequestBuilder, what: &str) -> Result<Response, CoreError> {
        let response = request.send().await.inspect_err(|e| {
            tracing::warn!(backend = self.name(), request = what, error = %redact_query(&e.to_string()), "request failed");
        })?;
        tracing::debug!(request = what, status = response.status().as_u16(), "backend responded");
        Ok(response)
    }

    async fn decode<T: DeserializeOwned>(response: Response, fallback: &str) -> Result<T, CoreError> {
        let response = Self::check_status(response, fallback).await?;
        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes)
            .map_err(|e| CoreError::Deserialization(format!("{fallback}: unexpected response body: {e}")))
    }

    async fn check_status(response: Response, fallback: &str) -> Result<Response, CoreError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(CoreError::from_response_body(status.as_u16(), &body, fallback))
    }
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl RentalBackend for HttpBackend {
    fn name(&self) -> &str {
        "RentalHttp"
    }

    async fn login(&self, credentials: &Credentials) -> Result<String, CoreError> {
        let url = self.endpoint(&["auth", "login"])?;
        let response = self.send(self.client.post(url).json(credentials), "login").await?;
        let body: LoginResponse = Self::decode(response, LOGIN_FALLBACK).await?;
        if body.token.trim().is_empty() {
            return Err(CoreError::Api {
                status: 200,
                message: "Login succeeded but no token was returned".into(),
            });
        }
        Ok(body.token)
    }

    async fn get_profile(&self, ctx: &RequestContext) -> Result<User, CoreError> {
        let url = self.endpoint(&["profile"])?;
        let response = self
            .send(self.authorize(self.client.get(url), ctx), "profile")
            .await?;
        let body: ProfileResponse = Self::decode(response, PROFILE_FALLBACK).await?;
        Ok(body.data)
    }

    async fn list_furniture(&self, ctx: &RequestContext) -> Result<Vec<Furniture>, CoreError> {
        let url = self.endpoint(&["furniture"])?;
        let response = self
            .send(self.authorize(self.client.get(url), ctx), "furniture")
            .await?;
        Self::decode(response, FURNITURE_FALLBACK).await
    }

    async fn process_payment(
        &self,
        ctx: &RequestContext,
        request: &PaymentRequest,
    ) -> Result<PaymentReceipt, CoreError> {
        let url = self.endpoint(&["payment", "process"])?;
        let response = self
            .send(
                self.authorize(self.client.post(url).json(request), ctx),
                "payment",
            )
            .await?;
        let response = Self::check_status(response, PAYMENT_FALLBACK).await?;
        let bytes = response.bytes().await?;
        if bytes.is_empty() {
            return Ok(PaymentReceipt(serde_json::Value::Null));
        }
        Ok(PaymentReceipt(
            serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null),
        ))
    }

    async fn save_preferences(
        &self,
        ctx: &RequestContext,
        preferences: &ProfilePreferences,
    ) -> Result<(), CoreError> {
        let url = self.endpoint(&["profile", "preferences"])?;
        let response = self
            .send(
                self.authorize(self.client.post(url).json(preferences), ctx),
                "preferences",
            )
            .await?;
        Self::check_status(response, PREFERENCES_FALLBACK).await?;
        Ok(())
    }

    async fn get_transaction_history(
        &self,
        ctx: &RequestContext,
        email: &str,
    ) -> Result<Vec<Transaction>, CoreError> {
        let url = self.endpoint(&["payment", "history", email])?;
        let response = self
            .send(self.authorize(self.client.get(url), ctx), "transaction history")
            .await?;
        Self::decode(response, HISTORY_FALLBACK).await
    }
}
