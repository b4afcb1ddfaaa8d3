use std::path::{Path, PathBuf};

use rental_furnish_core::RentalFurnish;

use crate::errors::{CliError, Result};

pub const PASSPHRASE_ENV: &str = "RENTAL_FURNISH_SESSION_KEY";
pub const SESSION_FILE_ENV: &str = "RENTAL_FURNISH_SESSION_FILE";
pub const DEFAULT_SESSION_FILE: &str = ".rental-furnish-session";

/// Where the sealed session lives, and how to unlock it.
pub struct SessionStore {
    path: PathBuf,
    passphrase: Option<String>,
}

impl SessionStore {
    /// `path` overrides `RENTAL_FURNISH_SESSION_FILE`, which overrides the default.
    pub fn new(path: Option<PathBuf>) -> Self {
        let path = path
            .or_else(|| std::env::var_os(SESSION_FILE_ENV).map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SESSION_FILE));
        Self {
            path,
            passphrase: std::env::var(PASSPHRASE_ENV).ok().filter(|p| !p.is_empty()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Resume the stored session into `client`, if there is one.
    pub fn restore(&mut self, client: &mut RentalFurnish) -> Result<bool> {
        if !self.exists() {
            return Ok(false);
        }
        let sealed = std::fs::read(&self.path).map_err(|source| CliError::ReadFile {
            path: self.path.clone(),
            source,
        })?;
        let passphrase = self.passphrase()?;
        let session = client.restore_session(&sealed, &passphrase)?;
        tracing::debug!(email = %session.email, "resumed stored session");
        Ok(true)
    }

    /// Seal the client's current session to disk.
    pub fn save(&mut self, client: &RentalFurnish) -> Result<()> {
        if !client.is_logged_in() {
            return Err(CliError::Usage("no session to save".into()));
        }
        let passphrase = self.passphrase()?;
        let sealed = client.export_session(&passphrase)?;
        std::fs::write(&self.path, sealed).map_err(|source| CliError::WriteFile {
            path: self.path.clone(),
            source,
        })?;
        tracing::info!(path = %self.path.display(), "session saved");
        Ok(())
    }

    /// Delete the session file. Returns whether one existed.
    pub fn clear(&self) -> Result<bool> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(source) => Err(CliError::RemoveSession {
                path: self.path.clone(),
                source,
            }),
        }
    }

    fn passphrase(&mut self) -> Result<String> {
        if let Some(p) = &self.passphrase {
            return Ok(p.clone());
        }
        let entered =
            rpassword::prompt_password("Session passphrase: ").map_err(CliError::Prompt)?;
        self.passphrase = Some(entered.clone());
        Ok(entered)
    }
}
