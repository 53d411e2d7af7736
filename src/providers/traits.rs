use std::fmt;

use async_trait::async_trait;
use regex::Regex;
use serde::Serialize;

use crate::error::CheckError;
use crate::transport::Transport;

/// Liveness verdict for a link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkStatus {
    /// The resource still exists.
    Online,
    /// The provider reports the resource as gone.
    Offline,
    /// No provider recognizes the link.
    Invalid,
    /// The probe failed and the caller chose to continue.
    Unknown,
}

impl LinkStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Online => "online",
            Self::Offline => "offline",
            Self::Invalid => "invalid",
            Self::Unknown => "unknown",
        }
    }

    pub(crate) const fn from_online(online: bool) -> Self {
        if online {
            Self::Online
        } else {
            Self::Offline
        }
    }
}

impl fmt::Display for LinkStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind of resource a link points to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceType {
    File,
    Folder,
}

impl ResourceType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::File => "file",
            Self::Folder => "folder",
        }
    }
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identifying fields extracted from a link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResourceIdentity {
    /// Resource id within the provider. Never empty.
    pub id: String,
    /// Decryption or access key carried in the link, if any.
    pub key: Option<String>,
}

impl ResourceIdentity {
    #[must_use]
    pub fn new(id: impl Into<String>, key: Option<String>) -> Self {
        Self {
            id: id.into(),
            key: key.filter(|k| !k.is_empty()),
        }
    }
}

/// A cloud storage host whose shared links can be checked.
///
/// `classify`, `identify` and `probe` fail with
/// [`CheckError::NotRecognized`] when `recognizes` is false for the link.
#[async_trait]
pub trait Provider: Send + Sync {
    /// Unique identifier for this provider.
    fn provider_id(&self) -> &'static str;

    /// Link grammars this provider accepts. Each pattern must be anchored at
    /// both ends so a match consumes the whole link.
    fn url_patterns(&self) -> &[Regex];

    /// Check if the whole link matches one of this provider's grammars.
    fn recognizes(&self, link: &str) -> bool {
        let link = link.trim();
        self.url_patterns().iter().any(|p| p.is_match(link))
    }

    /// The trimmed link, if this provider recognizes it.
    ///
    /// # Errors
    ///
    /// Returns [`CheckError::NotRecognized`] if the link is not recognized.
    fn recognized<'a>(&self, link: &'a str) -> Result<&'a str, CheckError> {
        let trimmed = link.trim();
        if self.recognizes(trimmed) {
            Ok(trimmed)
        } else {
            Err(CheckError::not_recognized(self.provider_id(), link))
        }
    }

    /// Resource type encoded in the link.
    ///
    /// # Errors
    ///
    /// Returns [`CheckError::NotRecognized`] if the link is not recognized.
    fn classify(&self, link: &str) -> Result<ResourceType, CheckError>;

    /// Resource id and optional key encoded in the link.
    ///
    /// # Errors
    ///
    /// Returns [`CheckError::NotRecognized`] if the link is not recognized.
    fn identify(&self, link: &str) -> Result<ResourceIdentity, CheckError>;

    /// Ask the provider whether the resource still exists.
    ///
    /// # Errors
    ///
    /// Returns [`CheckError::NotRecognized`] if the link is not recognized and
    /// [`CheckError::ConnectionFailed`] if no response could be obtained.
    async fn probe(&self, link: &str, transport: &dyn Transport) -> Result<LinkStatus, CheckError>;
}

/// Path segment `index` of a link split on `/` (`0` is the scheme).
pub(crate) fn path_segment(link: &str, index: usize) -> Option<&str> {
    link.split('/').nth(index)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_key_is_none() {
        let identity = ResourceIdentity::new("abc", Some(String::new()));
        assert_eq!(identity.key, None);

        let identity = ResourceIdentity::new("abc", Some("k".to_string()));
        assert_eq!(identity.key.as_deref(), Some("k"));
    }

    #[test]
    fn test_status_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&LinkStatus::Offline).unwrap(),
            "\"offline\""
        );
        assert_eq!(LinkStatus::Unknown.to_string(), "unknown");
    }

    #[test]
    fn test_recognized_trims_or_reports_provider() {
        let mediafire = crate::providers::MediaFireProvider::new();

        assert_eq!(
            mediafire.recognized(" https://www.mediafire.com/folder/xxxxxxxxx \n").unwrap(),
            "https://www.mediafire.com/folder/xxxxxxxxx"
        );

        let err = mediafire.recognized("https://mega.nz/file/xxxxxxxx").unwrap_err();
        assert!(matches!(
            err,
            CheckError::NotRecognized { provider: "mediafire", .. }
        ));
    }

    #[test]
    fn test_path_segment() {
        let link = "https://mega.nz/file/xxxxxxxx#key";
        assert_eq!(path_segment(link, 2), Some("mega.nz"));
        assert_eq!(path_segment(link, 3), Some("file"));
        assert_eq!(path_segment(link, 4), Some("xxxxxxxx#key"));
        assert_eq!(path_segment(link, 5), None);
    }
}
