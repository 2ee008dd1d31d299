//! All `axum::`[`Router`]s with related `axum::`[`Handler`]s.
//!
//! [`Router`]: axum::routing::Router
//! [`Handler`]: axum::handler::Handler

mod assets;
mod error;
mod monitors;
mod removals;
mod request;
mod response;
mod uploads;

use axum::Router;

pub use crate::handler::error::{Error, ErrorKind, Result};
pub use crate::handler::request::{DeleteProductRequest, DeleteSupplierRequest};
pub use crate::handler::response::{
    DeleteResponse, ErrorResponse, HealthResponse, UploadResponse,
};
use crate::service::ServiceState;

/// Returns a [`Router`] with all application routes.
///
/// [`Router`]: axum::routing::Router
pub fn routes() -> Router<ServiceState> {
    Router::new()
        .merge(monitors::routes())
        .merge(uploads::routes())
        .merge(removals::routes())
        .merge(assets::routes())
}

#[cfg(test)]
pub(crate) mod test {
    use axum_test::TestServer;
    use tempfile::TempDir;
    use url::Url;

    use crate::service::{ServiceConfig, ServiceState};

    /// Returns a new [`TestServer`] over a fresh temporary storage root.
    ///
    /// The [`TempDir`] must stay alive for the duration of the test; the
    /// storage root is deleted when it drops.
    pub async fn create_test_server() -> anyhow::Result<(TempDir, TestServer)> {
        let temp = tempfile::tempdir()?;
        let config = ServiceConfig {
            storage_root: temp.path().to_path_buf(),
            public_base_url: Url::parse("https://cdn.example.test")?,
        };

        let state = ServiceState::from_config(&config).await?;
        let app = super::routes().with_state(state);
        let server = TestServer::new(app)?;
        Ok((temp, server))
    }

    #[tokio::test]
    async fn handlers() -> anyhow::Result<()> {
        let (_temp, server) = create_test_server().await?;
        assert!(server.is_running());
        Ok(())
    }
}
