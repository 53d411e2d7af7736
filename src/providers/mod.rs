mod registry;
mod traits;

// Providers
mod google_drive;
mod mediafire;
mod mega;

pub use google_drive::GoogleDriveProvider;
pub use mediafire::MediaFireProvider;
pub use mega::MegaProvider;
pub use registry::ProviderRegistry;
pub use traits::{LinkStatus, Provider, ResourceIdentity, ResourceType};
