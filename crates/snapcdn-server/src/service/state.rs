//! Application state and dependency injection.

use snapcdn_storage::AssetStore;

use crate::service::ServiceConfig;

/// Application state.
///
/// Used for the [`State`] extraction (dependency injection).
///
/// [`State`]: axum::extract::State
#[must_use = "state does nothing unless you use it"]
#[derive(Clone)]
pub struct ServiceState {
    asset_store: AssetStore,
}

impl ServiceState {
    /// Initializes application state from configuration.
    ///
    /// Opens the asset store, creating the storage root and staging
    /// directory if absent.
    pub async fn from_config(config: &ServiceConfig) -> snapcdn_core::Result<Self> {
        let asset_store = AssetStore::open(config.storage_config()).await?;

        Ok(Self { asset_store })
    }

    /// Returns the asset store.
    pub fn asset_store(&self) -> &AssetStore {
        &self.asset_store
    }
}

macro_rules! impl_di {
    ($($f:ident: $t:ty),+) => {$(
        impl axum::extract::FromRef<ServiceState> for $t {
            fn from_ref(state: &ServiceState) -> Self {
                state.$f.clone()
            }
        }
    )+};
}

impl_di!(asset_store: AssetStore);
