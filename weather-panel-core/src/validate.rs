//! Location field validation.
//!
//! The field only ever holds letters, digits, whitespace and `,.'-`. Anything else
//! is stripped on every keystroke.

use std::borrow::Cow;

use crate::error::PanelError;

/// Minimum trimmed length (in characters) a location must have before it is sent.
pub const MIN_LOCATION_LEN: usize = 2;

/// Visual validity state of the location field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Validity {
    Valid,
    Invalid,
    #[default]
    Neutral,
}

impl Validity {
    /// CSS class applied to the field, if any.
    pub fn css_class(&self) -> Option<&'static str> {
        match self {
            Validity::Valid => Some("is-valid"),
            Validity::Invalid => Some("is-invalid"),
            Validity::Neutral => None,
        }
    }
}

pub fn is_allowed_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c.is_whitespace() || matches!(c, ',' | '.' | '\'' | '-')
}

/// Strip disallowed characters. Borrows when nothing had to be removed.
pub fn sanitize_location(raw: &str) -> Cow<'_, str> {
    if raw.chars().all(is_allowed_char) {
        Cow::Borrowed(raw)
    } else {
        Cow::Owned(raw.chars().filter(|c| is_allowed_char(*c)).collect())
    }
}

pub fn classify(value: &str) -> Validity {
    match value.trim().chars().count() {
        0 => Validity::Neutral,
        n if n < MIN_LOCATION_LEN => Validity::Invalid,
        _ => Validity::Valid,
    }
}

/// Precondition for issuing a weather request. Returns the trimmed location.
pub fn require_location(value: &str) -> Result<&str, PanelError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(PanelError::EmptyLocation);
    }
    if trimmed.chars().count() < MIN_LOCATION_LEN {
        return Err(PanelError::LocationTooShort);
    }
    Ok(trimmed)
}
