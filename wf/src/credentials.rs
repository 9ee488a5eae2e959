//! Credential lookups shared by the service clients
//!
//! Keys are read from the store on every call; nothing here caches them.

use keystore::{CredentialStore, Service};
use tracing::debug;

use crate::error::TripError;

/// Read the key for `service`, treating a blank value as unset
pub fn optional_key(store: &dyn CredentialStore, service: Service) -> Result<Option<String>, TripError> {
    debug!(%service, "optional_key: called");
    let value = store.get(service)?;
    Ok(value.filter(|v| !v.trim().is_empty()))
}

/// Read the key for `service` or fail with [`TripError::MissingCredential`]
pub fn require_key(store: &dyn CredentialStore, service: Service) -> Result<String, TripError> {
    debug!(%service, "require_key: called");
    optional_key(store, service)?.ok_or(TripError::MissingCredential { service })
}

#[cfg(test)]
mod tests {
    use super::*;
    use keystore::MemoryKeyStore;

    #[test]
    fn test_require_key_present() {
        let store = MemoryKeyStore::with(&[(Service::Itinerary, "gm-key")]);
        assert_eq!(require_key(&store, Service::Itinerary).unwrap(), "gm-key");
    }

    #[test]
    fn test_require_key_missing() {
        let store = MemoryKeyStore::with(&[(Service::Itinerary, "gm-key")]);
        assert_eq!(
            require_key(&store, Service::Flights),
            Err(TripError::MissingCredential {
                service: Service::Flights
            })
        );
    }

    #[test]
    fn test_blank_key_is_unset() {
        let store = MemoryKeyStore::with(&[(Service::Flights, "   ")]);
        assert_eq!(optional_key(&store, Service::Flights).unwrap(), None);
    }
}
