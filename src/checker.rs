//! Link dispatcher: picks the provider for each link and reports its status.

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::CheckError;
use crate::providers::{LinkStatus, ProviderRegistry};
use crate::transport::{HttpTransport, Transport};

/// Status of one link in a batch, keyed by the trimmed link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LinkReport {
    pub link: String,
    pub status: LinkStatus,
}

/// Batch result in input order, one entry per input link.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct CheckReport {
    pub entries: Vec<LinkReport>,
}

impl CheckReport {
    /// Status of the first entry for `link`.
    #[must_use]
    pub fn status_of(&self, link: &str) -> Option<LinkStatus> {
        self.entries
            .iter()
            .find(|e| e.link == link)
            .map(|e| e.status)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Resolves links against an ordered provider registry.
///
/// Links are checked one at a time; providers hold no state between checks.
pub struct LinkChecker<T = HttpTransport> {
    registry: ProviderRegistry,
    transport: T,
}

impl LinkChecker<HttpTransport> {
    /// Build a checker with the standard providers and a real HTTP transport.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn from_config(config: &Config) -> Result<Self, reqwest::Error> {
        Ok(Self::new(
            ProviderRegistry::standard(&config.endpoints),
            HttpTransport::from_config(config)?,
        ))
    }
}

impl<T: Transport> LinkChecker<T> {
    #[must_use]
    pub fn new(registry: ProviderRegistry, transport: T) -> Self {
        Self {
            registry,
            transport,
        }
    }

    #[must_use]
    pub fn registry(&self) -> &ProviderRegistry {
        &self.registry
    }

    /// Check a single link.
    ///
    /// Links no provider recognizes resolve to [`LinkStatus::Invalid`].
    ///
    /// # Errors
    ///
    /// Returns an error if the probe could not reach the provider.
    pub async fn resolve(&self, link: &str) -> Result<LinkStatus, CheckError> {
        let link = link.trim();

        let Some(provider) = self.registry.find_provider(link) else {
            debug!(link = %link, "No provider recognizes link");
            return Ok(LinkStatus::Invalid);
        };

        let status = provider.probe(link, &self.transport).await?;
        debug!(link = %link, provider = provider.provider_id(), status = %status, "Link checked");
        Ok(status)
    }

    /// Check every link in order.
    ///
    /// With `continue_on_error`, a link whose probe cannot reach its provider
    /// is reported as [`LinkStatus::Unknown`] and the batch carries on.
    ///
    /// # Errors
    ///
    /// Returns the first connection failure when `continue_on_error` is false,
    /// and any misuse error regardless.
    pub async fn resolve_all<I, S>(
        &self,
        links: I,
        continue_on_error: bool,
    ) -> Result<CheckReport, CheckError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut report = CheckReport::default();

        for link in links {
            let link = link.as_ref().trim();
            let status = match self.resolve(link).await {
                Ok(status) => status,
                Err(e) if continue_on_error && e.is_connection_failure() => {
                    warn!(link = %link, "Probe failed, marking unknown: {e}");
                    LinkStatus::Unknown
                }
                Err(e) => return Err(e),
            };
            report.entries.push(LinkReport {
                link: link.to_string(),
                status,
            });
        }

        info!(links = report.len(), "Batch check finished");
        Ok(report)
    }
}
