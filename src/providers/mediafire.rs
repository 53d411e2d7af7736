use async_trait::async_trait;
use regex::Regex;

use super::traits::{path_segment, LinkStatus, Provider, ResourceIdentity, ResourceType};
use crate::constants::MEDIAFIRE_REDIRECT_MARKER;
use crate::error::CheckError;
use crate::transport::{ProbeRequest, Transport};

const PROVIDER_ID: &str = "mediafire";

static PATTERNS: std::sync::LazyLock<Vec<Regex>> = std::sync::LazyLock::new(|| {
    vec![
        // Files, optionally followed by the file name and a display segment
        Regex::new(
            r"^https?://(www\.)?mediafire\.com/file/[a-zA-Z0-9_-]+(/[a-zA-Z0-9_.+-]*(/[a-zA-Z0-9_]*)?)?$",
        )
        .unwrap(),
        // Folders, optionally followed by the folder name
        Regex::new(
            r"^https?://(www\.)?mediafire\.com/folder/[a-zA-Z0-9_-]+/?[a-zA-Z0-9_.-]*(/[a-zA-Z0-9_]*)?$",
        )
        .unwrap(),
    ]
});

/// MediaFire, probed by fetching the shared page itself.
pub struct MediaFireProvider;

impl MediaFireProvider {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Default for MediaFireProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Provider for MediaFireProvider {
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
        path_segment(link, 4)
            .filter(|id| !id.is_empty())
            .map(|id| ResourceIdentity::new(id, None))
            .ok_or_else(|| CheckError::not_recognized(PROVIDER_ID, link))
    }

    async fn probe(&self, link: &str, transport: &dyn Transport) -> Result<LinkStatus, CheckError> {
        let kind = self.classify(link)?;
        let link = self.recognized(link)?;

        let response = transport.request(&ProbeRequest::get(link)).await?;
        if response.status == 404 {
            return Ok(LinkStatus::Offline);
        }

        Ok(match kind {
            ResourceType::Folder => LinkStatus::Online,
            // Live file pages bounce the browser to the download
            ResourceType::File => {
                LinkStatus::from_online(response.body.contains(MEDIAFIRE_REDIRECT_MARKER))
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::stub::StubTransport;

    #[test]
    fn test_recognizes() {
        let mediafire = MediaFireProvider::new();

        for link in [
            "https://www.mediafire.com/file/5td2knb1d0n6tkh/kakaotalk_2.7.6.2046.zip/file",
            "https://www.mediafire.com/file/5td2knb1d0n6tkh/kakaotalk_2.7.6.2046.zip/",
            "https://www.mediafire.com/file/5td2knb1d0n6tkh/kakaotalk_2.7.6.2046.zip",
            "https://mediafire.com/file/5td2knb1d0n6tkh/kakaotalk_2.7.6.2046.zip/file",
            "https://mediafire.com/file/5td2knb1d0n6tkh/",
            "https://mediafire.com/file/5td2knb1d0n6tkh",
            "https://mediafire.com/file/5td2knb1d0n6tkh/kakaotalk_2.7.6.2046.zip/anythinghereisvalid",
            "https://www.mediafire.com/folder/xxxxxxxxx/myfoldername",
            "https://www.mediafire.com/folder/xxxxxxxxx/",
            "https://www.mediafire.com/folder/xxxxxxxxx",
        ] {
            assert!(mediafire.recognizes(link), "{link}");
        }

        for link in [
            "https://mediafire.co/file/5td2knb1d0n6tkh/kakaotalk_2.7.6.2046.zip/file",
            "https://mediafire.com/kakaotalk_2.7.6.2046.zip/file",
            "https://mediafire.com/file5td2knb1d0n6tkh/kakaotalk_2.7.6.2046.zip/file",
            "https://www.mediafire.com/xxxxxxxxx/myfoldername",
            "https://www.mediafire.com/xxxxxxxxx",
            "https://www.mediafire.com/ffile/xxxxxxxxxx",
        ] {
            assert!(!mediafire.recognizes(link), "{link}");
        }
    }

    #[test]
    fn test_classify() {
        let mediafire = MediaFireProvider::new();
        let cases = [
            ("https://mediafire.com/file/xxxxxxxxxx/filename.txt/anythinghereisvalid", ResourceType::File),
            ("https://mediafire.com/file/xxxxxxxxxx/filename.txt/", ResourceType::File),
            ("https://mediafire.com/file/xxxxxxxxxx/filename.txt", ResourceType::File),
            ("https://www.mediafire.com/folder/xxxxxxxxx/myfoldername", ResourceType::Folder),
            ("https://www.mediafire.com/folder/xxxxxxxxx/", ResourceType::Folder),
            ("https://www.mediafire.com/folder/xxxxxxxxx", ResourceType::Folder),
        ];
        for (link, expected) in cases {
            assert_eq!(mediafire.classify(link).unwrap(), expected, "{link}");
        }
    }

    #[test]
    fn test_identify() {
        let mediafire = MediaFireProvider::new();
        assert_eq!(
            mediafire
                .identify("https://www.mediafire.com/file/5td2knb1d0n6tkh/kakaotalk_2.7.6.2046.zip/file")
                .unwrap(),
            ResourceIdentity::new("5td2knb1d0n6tkh", None)
        );
        assert_eq!(
            mediafire.identify("https://www.mediafire.com/folder/xxxxxxxxx/").unwrap(),
            ResourceIdentity::new("xxxxxxxxx", None)
        );
        assert!(mediafire.identify("https://www.mediafire.com/ffile/xxxxxxxxxx").is_err());
    }

    #[tokio::test]
    async fn test_probe_file() {
        let mediafire = MediaFireProvider::new();
        let link = "https://www.mediafire.com/file/5td2knb1d0n6tkh/kakaotalk_2.7.6.2046.zip/file";

        let transport = StubTransport::responding(
            200,
            "<script>window.location.href = 'https://download.mediafire.com/x';</script>",
        );
        assert_eq!(mediafire.probe(link, &transport).await.unwrap(), LinkStatus::Online);
        assert_eq!(transport.requests()[0].url, link);

        let transport = StubTransport::responding(200, "<html>File removed</html>");
        assert_eq!(mediafire.probe(link, &transport).await.unwrap(), LinkStatus::Offline);

        let transport = StubTransport::responding(404, "window.location.href");
        assert_eq!(mediafire.probe(link, &transport).await.unwrap(), LinkStatus::Offline);
    }

    #[tokio::test]
    async fn test_probe_folder() {
        let mediafire = MediaFireProvider::new();
        let link = "https://www.mediafire.com/folder/xxxxxxxxx/myfoldername";

        let transport = StubTransport::responding(200, "");
        assert_eq!(mediafire.probe(link, &transport).await.unwrap(), LinkStatus::Online);

        let transport = StubTransport::responding(404, "");
        assert_eq!(mediafire.probe(link, &transport).await.unwrap(), LinkStatus::Offline);
    }

    #[tokio::test]
    async fn test_probe_transport_failure() {
        let mediafire = MediaFireProvider::new();
        let err = mediafire
            .probe("https://www.mediafire.com/folder/xxxxxxxxx", &StubTransport::failing())
            .await
            .unwrap_err();
        assert!(err.is_connection_failure());
    }
}
