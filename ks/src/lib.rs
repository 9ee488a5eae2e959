//! KeyStore - local credential slots
//!
//! Holds the two independent API credentials the trip planner needs: one for
//! the itinerary (generative text) service and one for the flight search
//! service. Values are opaque strings; nothing here validates their format
//! or talks to the network.
//!
//! # Layout
//!
//! ```text
//! ~/.local/share/wayfarer/
//! └── credentials.yml    # slot name -> secret
//! ```
//!
//! # Example
//!
//! ```ignore
//! use keystore::{CredentialStore, FileKeyStore, Service};
//!
//! let store = FileKeyStore::open(FileKeyStore::default_path())?;
//! store.set(Service::Flights, "serp-...")?;
//! assert!(store.has(Service::Flights)?);
//! ```

mod service;
mod store;

pub use service::Service;
pub use store::{CredentialStore, FileKeyStore, MemoryKeyStore};

/// Characters kept visible at the start of a masked secret
pub const MASK_PREFIX: usize = 5;

/// Characters kept visible at the end of a masked secret
pub const MASK_SUFFIX: usize = 4;

/// Mask a secret for display.
///
/// Keeps the first five and last four characters and replaces the rest with
/// bullets. Secrets too short to keep both ends are bulleted entirely.
pub fn mask(secret: &str) -> String {
    let chars: Vec<char> = secret.chars().collect();
    if chars.len() <= MASK_PREFIX + MASK_SUFFIX {
        return "•".repeat(chars.len());
    }

    let hidden = chars.len() - MASK_PREFIX - MASK_SUFFIX;
    let mut masked: String = chars[..MASK_PREFIX].iter().collect();
    masked.push_str(&"•".repeat(hidden));
    masked.extend(&chars[chars.len() - MASK_SUFFIX..]);
    masked
}
