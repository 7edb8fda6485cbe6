use thiserror::Error;

/// Fallback shown when the backend reports failure without a message.
pub const FETCH_FALLBACK: &str = "Failed to fetch weather data";

/// Everything that can end up in the error panel.
///
/// The `Display` text is exactly what the user sees.
#[derive(Debug, Error)]
pub enum PanelError {
    #[error("Please enter a location!")]
    EmptyLocation,

    #[error("Location must be at least 2 characters long!")]
    LocationTooShort,

    #[error("{}", .0.as_deref().unwrap_or(FETCH_FALLBACK))]
    Backend(Option<String>),

    #[error("Network error. Please check your connection and try again.")]
    Transport(#[source] anyhow::Error),

    #[error(
        "Could not detect your location automatically. Please enter your location manually."
    )]
    DetectionUnavailable,

    #[error("Location detection failed. Please enter your location manually.")]
    DetectionFailed(#[source] anyhow::Error),
}

impl PanelError {
    /// True for errors raised before any request was issued.
    pub fn is_validation(&self) -> bool {
        matches!(self, PanelError::EmptyLocation | PanelError::LocationTooShort)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backend_message_passes_through() {
        let err = PanelError::Backend(Some("City not found".into()));
        assert_eq!(err.to_string(), "City not found");
    }

    #[test]
    fn backend_without_message_uses_fallback() {
        assert_eq!(PanelError::Backend(None).to_string(), FETCH_FALLBACK);
    }

    #[test]
    fn transport_hides_underlying_cause() {
        let err = PanelError::Transport(anyhow::anyhow!("connection refused"));
        assert!(!err.to_string().contains("refused"));
        assert!(std::error::Error::source(&err).is_some());
    }
}
