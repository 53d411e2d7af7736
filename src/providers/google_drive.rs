use async_trait::async_trait;
use regex::Regex;
use tracing::debug;

use super::traits::{path_segment, LinkStatus, Provider, ResourceIdentity, ResourceType};
use crate::config::Endpoints;
use crate::constants::DRIVE_UNTRUSTED_CONTENT_MARKER;
use crate::error::CheckError;
use crate::transport::{HeaderMultiMap, ProbeRequest, Transport};

const PROVIDER_ID: &str = "google_drive";

static PATTERNS: std::sync::LazyLock<Vec<Regex>> = std::sync::LazyLock::new(|| {
    vec![Regex::new(
        r"^https?://(www\.)?drive\.google\.com/(file/d|drive/folders)/[a-zA-Z0-9_-]+((/(view|edit)?)?(\?[a-zA-Z0-9=_-]*)?)?$",
    )
    .unwrap()]
});

/// Link prefix up to and including the resource id; the rest is display metadata.
static ID_PREFIX: std::sync::LazyLock<Regex> = std::sync::LazyLock::new(|| {
    Regex::new(r"^https?://(www\.)?drive\.google\.com/(file/d|drive/folders)/[a-zA-Z0-9_-]+")
        .unwrap()
});

/// Google Drive, probed through its direct download and folder endpoints.
pub struct GoogleDriveProvider {
    file_url: String,
    folder_url: String,
}

impl GoogleDriveProvider {
    #[must_use]
    pub fn new(file_url: impl Into<String>, folder_url: impl Into<String>) -> Self {
        Self {
            file_url: file_url.into(),
            folder_url: folder_url.into(),
        }
    }

    #[must_use]
    pub fn from_endpoints(endpoints: &Endpoints) -> Self {
        Self::new(&endpoints.drive_file_url, &endpoints.drive_folder_url)
    }
}

impl Default for GoogleDriveProvider {
    fn default() -> Self {
        Self::from_endpoints(&Endpoints::default())
    }
}

#[async_trait]
impl Provider for GoogleDriveProvider {
    fn provider_id(&self) -> &'static str {
        PROVIDER_ID
    }

    fn url_patterns(&self) -> &[Regex] {
        &PATTERNS
    }

    fn classify(&self, link: &str) -> Result<ResourceType, CheckError> {
        let link = self.recognized(link)?;
        Ok(if path_segment(link, 3) == Some("file") {
            ResourceType::File
        } else {
            ResourceType::Folder
        })
    }

    fn identify(&self, link: &str) -> Result<ResourceIdentity, CheckError> {
        let link = self.recognized(link)?;
        ID_PREFIX
            .find(link)
            .and_then(|m| path_segment(m.as_str(), 5))
            .map(|id| ResourceIdentity::new(id, None))
            .ok_or_else(|| CheckError::not_recognized(PROVIDER_ID, link))
    }

    async fn probe(&self, link: &str, transport: &dyn Transport) -> Result<LinkStatus, CheckError> {
        let kind = self.classify(link)?;
        let identity = self.identify(link)?;

        let status = match kind {
            ResourceType::Folder => {
                let url = format!("{}{}", self.folder_url, identity.id);
                let response = transport.request(&ProbeRequest::get(url)).await?;
                LinkStatus::from_online(response.status != 404)
            }
            ResourceType::File => {
                let url = format!("{}{}", self.file_url, identity.id);
                let response = transport.request(&ProbeRequest::get(url)).await?;
                match response.status {
                    404 => LinkStatus::Offline,
                    // Redirect to the download itself
                    303 => LinkStatus::Online,
                    code => {
                        if !has_download_signal(&response.headers) {
                            debug!(
                                id = %identity.id,
                                code,
                                "No Drive download signal, assuming online"
                            );
                        }
                        LinkStatus::Online
                    }
                }
            }
        };

        Ok(status)
    }
}

/// A `location` header, or the marker Drive sets when a file is too large to
/// virus scan, both mean the file exists.
fn has_download_signal(headers: &HeaderMultiMap) -> bool {
    let untrusted = |name: &str| {
        headers
            .first(name)
            .is_some_and(|v| v.contains(DRIVE_UNTRUSTED_CONTENT_MARKER))
    };

    headers.contains("location")
        || untrusted("cross-origin-opener-policy")
        || untrusted("content-security-policy")
}
