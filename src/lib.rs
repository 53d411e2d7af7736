//! Cloud link checker library.
//!
//! Recognizes shared Mega, Google Drive and MediaFire links, extracts what they
//! point to, and asks each host whether the resource is still online.

pub mod checker;
pub mod config;
pub mod constants;
pub mod error;
pub mod providers;
pub mod transport;

pub use checker::{CheckReport, LinkChecker, LinkReport};
pub use error::CheckError;
pub use providers::{LinkStatus, Provider, ProviderRegistry, ResourceIdentity, ResourceType};
