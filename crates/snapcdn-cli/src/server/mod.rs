//! HTTP/HTTPS server startup with lifecycle management.
//!
//! This module provides a clean API for starting HTTP and HTTPS servers
//! with graceful shutdown. Protocol selection is automatic: when the
//! `tls` feature is enabled and certificate paths are configured, the
//! server speaks HTTPS; otherwise plain HTTP.

mod error;
mod http_server;
#[cfg(feature = "tls")]
mod https_server;
mod lifecycle;
mod shutdown;

use axum::Router;

pub use self::error::{ServerError, ServerResult};
use self::http_server::serve_http;
#[cfg(feature = "tls")]
use self::https_server::serve_https;
use self::shutdown::shutdown_signal;
use crate::config::ServerConfig;

/// Starts a server with automatic protocol selection (HTTP/HTTPS) based
/// on configuration.
///
/// # Errors
///
/// Returns an error if:
/// - TLS certificates cannot be loaded (HTTPS mode)
/// - Cannot bind to the specified address/port
/// - Server encounters a fatal error during operation
pub async fn serve(app: Router, config: ServerConfig) -> ServerResult<()> {
    #[cfg(feature = "tls")]
    if let Some((cert_path, key_path)) = config.tls_paths() {
        let (cert_path, key_path) = (cert_path.to_path_buf(), key_path.to_path_buf());
        return serve_https(app, config, cert_path, key_path).await;
    }

    serve_http(app, config).await
}
