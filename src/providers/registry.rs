use super::google_drive::GoogleDriveProvider;
use super::mediafire::MediaFireProvider;
use super::mega::MegaProvider;
use super::traits::Provider;
use crate::config::Endpoints;

/// Ordered list of providers. The first provider that recognizes a link owns it.
pub struct ProviderRegistry {
    providers: Vec<Box<dyn Provider>>,
}

impl ProviderRegistry {
    /// Create a new empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            providers: Vec::new(),
        }
    }

    /// The built-in providers in lookup order: Mega, Google Drive, MediaFire.
    #[must_use]
    pub fn standard(endpoints: &Endpoints) -> Self {
        let mut registry = Self::new();
        registry.register(Box::new(MegaProvider::new(&endpoints.mega_api_url)));
        registry.register(Box::new(GoogleDriveProvider::from_endpoints(endpoints)));
        registry.register(Box::new(MediaFireProvider::new()));
        registry
    }

    /// Register a provider after every provider already registered.
    pub fn register(&mut self, provider: Box<dyn Provider>) {
        self.providers.push(provider);
    }

    /// Find the first registered provider that recognizes the link.
    #[must_use]
    pub fn find_provider(&self, link: &str) -> Option<&dyn Provider> {
        self.providers
            .iter()
            .find(|p| p.recognizes(link))
            .map(AsRef::as_ref)
    }

    /// Get all registered providers in lookup order.
    #[must_use]
    pub fn providers(&self) -> &[Box<dyn Provider>] {
        &self.providers
    }
}

impl Default for ProviderRegistry {
    fn default() -> Self {
        Self::standard(&Endpoints::default())
    }
}
