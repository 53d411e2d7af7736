use thiserror::Error;

use crate::transport::TransportError;

/// Errors raised while checking a link.
///
/// A link that no provider understands is not an error; it resolves to
/// [`LinkStatus::Invalid`](crate::providers::LinkStatus::Invalid).
#[derive(Debug, Error)]
pub enum CheckError {
    /// A provider operation was called on a link the provider does not
    /// recognize. This is a caller bug and is never downgraded to a status.
    #[error("{provider} does not recognize the link {link}")]
    NotRecognized {
        provider: &'static str,
        link: String,
    },

    /// The probe request could not be completed.
    #[error("connection failed: {0}")]
    ConnectionFailed(#[from] TransportError),
}

impl CheckError {
    pub(crate) fn not_recognized(provider: &'static str, link: &str) -> Self {
        Self::NotRecognized {
            provider,
            link: link.to_string(),
        }
    }

    /// Whether batch mode may record this failure as `Unknown` and move on.
    #[must_use]
    pub fn is_connection_failure(&self) -> bool {
        matches!(self, Self::ConnectionFailed(_))
    }
}
