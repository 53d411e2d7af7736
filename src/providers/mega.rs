use async_trait::async_trait;
use rand::Rng;
use regex::Regex;
use serde_json::json;
use tracing::debug;

use super::traits::{path_segment, LinkStatus, Provider, ResourceIdentity, ResourceType};
use crate::constants::MEGA_API_URL;
use crate::error::CheckError;
use crate::transport::{ProbeRequest, Transport, TransportError};

const PROVIDER_ID: &str = "mega";

/// Current grammar: `https://mega.nz/file/<id>#<key>`.
static NEW_FORMAT: std::sync::LazyLock<Regex> = std::sync::LazyLock::new(|| {
    Regex::new(r"^https?://(www\.)?mega\.nz/(file|folder)/[a-zA-Z0-9]{8}(#[a-zA-Z0-9_-]*)?$")
        .unwrap()
});

/// Legacy grammar: `https://mega.nz/#!<id>!<key>`, `#F!` for folders.
static OLD_FORMAT: std::sync::LazyLock<Regex> = std::sync::LazyLock::new(|| {
    Regex::new(r"^https?://(www\.)?mega\.nz/#F?![a-zA-Z0-9]{8}(![a-zA-Z0-9_-]*)?$").unwrap()
});

static PATTERNS: std::sync::LazyLock<Vec<Regex>> =
    std::sync::LazyLock::new(|| vec![NEW_FORMAT.clone(), OLD_FORMAT.clone()]);

/// Both grammars with a mandatory, non-empty key.
static WITH_KEY: std::sync::LazyLock<Vec<Regex>> = std::sync::LazyLock::new(|| {
    vec![
        Regex::new(r"^https?://(www\.)?mega\.nz/(file|folder)/[a-zA-Z0-9]{8}#[a-zA-Z0-9_-]+$")
            .unwrap(),
        Regex::new(r"^https?://(www\.)?mega\.nz/#F?![a-zA-Z0-9]{8}![a-zA-Z0-9_-]+$").unwrap(),
    ]
});

/// Mega file sync host, probed through its JSON RPC API.
pub struct MegaProvider {
    api_url: String,
}

impl MegaProvider {
    #[must_use]
    pub fn new(api_url: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into(),
        }
    }

    /// Whether the link uses the current `/file/` or `/folder/` grammar.
    ///
    /// # Errors
    ///
    /// Returns an error if the link is not a Mega link.
    pub fn is_new_format(&self, link: &str) -> Result<bool, CheckError> {
        let link = self.recognized(link)?;
        Ok(NEW_FORMAT.is_match(link))
    }

    /// Whether the link carries a non-empty decryption key.
    ///
    /// # Errors
    ///
    /// Returns an error if the link is not a Mega link.
    pub fn contains_key(&self, link: &str) -> Result<bool, CheckError> {
        let link = self.recognized(link)?;
        Ok(WITH_KEY.iter().any(|p| p.is_match(link)))
    }

    /// Rewrite a legacy link into the current grammar.
    ///
    /// Links already in the current grammar are returned trimmed but
    /// otherwise unchanged, so the conversion is idempotent.
    ///
    /// # Errors
    ///
    /// Returns an error if the link is not a Mega link.
    pub fn convert_from_old_format(&self, link: &str) -> Result<String, CheckError> {
        let link = self.recognized(link)?;
        if NEW_FORMAT.is_match(link) {
            return Ok(link.to_string());
        }

        let mut parts = link.split('!');
        let kind = if link.contains("/#F!") {
            ResourceType::Folder
        } else {
            ResourceType::File
        };
        let id = parts.nth(1).unwrap_or_default();
        let key = parts.next().filter(|k| !k.is_empty());

        let mut converted = format!("https://mega.nz/{kind}/{id}");
        if let Some(key) = key {
            converted.push('#');
            converted.push_str(key);
        }
        Ok(converted)
    }
}

impl Default for MegaProvider {
    fn default() -> Self {
        Self::new(MEGA_API_URL)
    }
}

#[async_trait]
impl Provider for MegaProvider {
    fn provider_id(&self) -> &'static str {
        PROVIDER_ID
    }

    fn url_patterns(&self) -> &[Regex] {
        &PATTERNS
    }

    fn classify(&self, link: &str) -> Result<ResourceType, CheckError> {
        let canonical = self.convert_from_old_format(link)?;
        match path_segment(&canonical, 3) {
            Some("file") => Ok(ResourceType::File),
            Some("folder") => Ok(ResourceType::Folder),
            _ => Err(CheckError::not_recognized(PROVIDER_ID, link)),
        }
    }

    fn identify(&self, link: &str) -> Result<ResourceIdentity, CheckError> {
        let canonical = self.convert_from_old_format(link)?;
        let last = path_segment(&canonical, 4)
            .ok_or_else(|| CheckError::not_recognized(PROVIDER_ID, link))?;

        Ok(match last.split_once('#') {
            Some((id, key)) => ResourceIdentity::new(id, Some(key.to_string())),
            None => ResourceIdentity::new(last, None),
        })
    }

    async fn probe(&self, link: &str, transport: &dyn Transport) -> Result<LinkStatus, CheckError> {
        let kind = self.classify(link)?;
        let identity = self.identify(link)?;

        let command = match kind {
            ResourceType::File => json!({ "a": "g", "p": identity.id }),
            ResourceType::Folder => json!({ "a": "f", "c": 1, "r": 1, "ca": 1 }),
        };
        let url = format!(
            "{}/cs?id={}&n={}",
            self.api_url.trim_end_matches('/'),
            request_nonce(),
            identity.id
        );

        let response = transport
            .request(&ProbeRequest::post_json(&url, json!([command])))
            .await?;

        if response.body.trim().is_empty() {
            return Err(TransportError::NoResponse {
                url,
                message: format!("empty body with status {}", response.status),
            }
            .into());
        }

        let missing = is_error_code(&response.body);
        debug!(id = %identity.id, kind = %kind, body = %response.body.trim(), missing, "Mega API answered");
        Ok(LinkStatus::from_online(!missing))
    }
}

/// Mega answers a bare non-positive number when the node does not exist.
fn is_error_code(body: &str) -> bool {
    let body = body.trim();
    let numeric = !body.is_empty()
        && body
            .chars()
            .all(|c| c.is_ascii_digit() || matches!(c, '+' | '-' | '.' | 'e' | 'E'));
    numeric && body.parse::<f64>().is_ok_and(|code| code <= 0.0)
}

/// Ten digit request id. Only shapes the request, not security relevant.
fn request_nonce() -> String {
    let nonce: u64 = rand::thread_rng().gen_range(0..10_000_000_000);
    format!("{nonce:010}")
}
