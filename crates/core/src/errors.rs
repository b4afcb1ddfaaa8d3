use thiserror::Error;

/// Unified error type for the entire rental-furnish-core library.
/// Every public function returns `Result<T, CoreError>`.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Backend / Network ───────────────────────────────────────────
    #[error("Network error: {0}")]
    Network(String),

    #[error("Request failed with status {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Not logged in — sign in before calling {0}")]
    NotLoggedIn(String),

    // ── Validation ──────────────────────────────────────────────────
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Invalid photo data URI: {0}")]
    InvalidDataUri(String),

    // ── Language model ──────────────────────────────────────────────
    #[error("Model error ({provider}): {message}")]
    Model { provider: String, message: String },

    // ── Encoding ────────────────────────────────────────────────────
    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Deserialization error: {0}")]
    Deserialization(String),

    // ── Session envelope ────────────────────────────────────────────
    #[error("Invalid session file: {0}")]
    InvalidFileFormat(String),

    #[error("Unsupported session file version: {0}")]
    UnsupportedVersion(u16),

    #[error("Encryption failed: {0}")]
    Encryption(String),

    #[error("Decryption failed — wrong passphrase or corrupted session file")]
    Decryption,

    #[error("File I/O error: {0}")]
    FileIO(String),

    // ── Configuration ───────────────────────────────────────────────
    #[error("Configuration error: {0}")]
    Config(String),
}

impl CoreError {
    /// Build an `Api` error from a failed response body.
    ///
    /// Uses the backend's `message` field when the body is JSON that carries
    /// one, otherwise falls back to `fallback`.
    pub fn from_response_body(status: u16, body: &str, fallback: &str) -> Self {
        let message = serde_json::from_str::<serde_json::Value>(body)
            .ok()
            .and_then(|v| {
                v.get("message")
                    .and_then(|m| m.as_str())
                    .map(str::to_string)
            })
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| fallback.to_string());
        CoreError::Api { status, message }
    }

    /// True for failures where the backend answered but refused the credentials.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, CoreError::Api { status: 401 | 403, .. })
    }
}

// ── Conversion helpers (From impls) ─────────────────────────────────

impl From<std::io::Error> for CoreError {
    fn from(e: std::io::Error) -> Self {
        CoreError::FileIO(e.to_string())
    }
}

impl From<bincode::Error> for CoreError {
    fn from(e: bincode::Error) -> Self {
        CoreError::Serialization(e.to_string())
    }
}

impl From<serde_json::Error> for CoreError {
    fn from(e: serde_json::Error) -> Self {
        CoreError::Deserialization(e.to_string())
    }
}

impl From<reqwest::Error> for CoreError {
    fn from(e: reqwest::Error) -> Self {
        CoreError::Network(redact_query(&e.to_string()))
    }
}

impl From<aes_gcm::Error> for CoreError {
    fn from(_: aes_gcm::Error) -> Self {
        CoreError::Decryption
    }
}

/// Strip query strings from any URL embedded in a message so API keys
/// passed as parameters never reach logs or the user.
pub(crate) fn redact_query(msg: &str) -> String {
    match msg.find('?') {
        Some(idx) => {
            let tail = &msg[idx..];
            let end = tail
                .find(|c: char| c.is_whitespace() || c == ')')
                .unwrap_or(tail.len());
            format!("{}?<query redacted>{}", &msg[..idx], &tail[end..])
        }
        None => msg.to_string(),
    }
}
