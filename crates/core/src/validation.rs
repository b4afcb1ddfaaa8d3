use crate::errors::CoreError;

/// Collects per-field validation messages so a form reports every problem
/// at once instead of stopping at the first.
#[derive(Debug, Default)]
pub struct FieldErrors {
    errors: Vec<(&'static str, String)>,
}

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.errors.push((field, message.into()));
    }

    /// Record `message` for `field` unless `ok` holds.
    pub fn check(&mut self, ok: bool, field: &'static str, message: impl Into<String>) {
        if !ok {
            self.add(field, message);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn fields(&self) -> Vec<&'static str> {
        self.errors.iter().map(|(f, _)| *f).collect()
    }

    /// `Ok(())` when nothing was recorded, otherwise a `Validation` error
    /// listing `field: message` pairs separated by `; `.
    pub fn into_result(self) -> Result<(), CoreError> {
        if self.errors.is_empty() {
            return Ok(());
        }
        let joined = self
            .errors
            .iter()
            .map(|(field, msg)| format!("{field}: {msg}"))
            .collect::<Vec<_>>()
            .join("; ");
        Err(CoreError::Validation(joined))
    }
}

/// Character length bounds used by the free-text preference fields.
pub const PREFERENCES_MIN_CHARS: usize = 10;
pub const PREFERENCES_MAX_CHARS: usize = 500;

pub(crate) fn check_preferences_text(errors: &mut FieldErrors, field: &'static str, text: &str) {
    let len = text.trim().chars().count();
    if len < PREFERENCES_MIN_CHARS {
        errors.add(
            field,
            format!("Please describe your preferences in at least {PREFERENCES_MIN_CHARS} characters."),
        );
    } else if len > PREFERENCES_MAX_CHARS {
        errors.add(
            field,
            format!("Preferences cannot be longer than {PREFERENCES_MAX_CHARS} characters."),
        );
    }
}

/// Loose email shape check: something before and after a single `@`,
/// and a dot in the domain.
pub(crate) fn looks_like_email(email: &str) -> bool {
    let email = email.trim();
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && !email.contains(char::is_whitespace)
        }
        None => false,
    }
}
