//! Shared server lifecycle: readiness logging and shutdown handling.

use std::future::Future;
use std::io;

use crate::config::ServerConfig;
use crate::server::{ServerError, ServerResult};
use crate::{TRACING_TARGET_SERVER_SHUTDOWN, TRACING_TARGET_SERVER_STARTUP};

/// Common server startup logic with graceful shutdown handling.
///
/// This function encapsulates the common pattern of:
/// 1. Logging server readiness
/// 2. Warning about security implications
/// 3. Running the server with error handling
/// 4. Logging shutdown status
pub(crate) async fn serve_with_shutdown<F>(
    server_config: &ServerConfig,
    serve_fn: impl FnOnce() -> F,
) -> ServerResult<()>
where
    F: Future<Output = io::Result<()>>,
{
    tracing::info!(
        target: TRACING_TARGET_SERVER_STARTUP,
        addr = %server_config.server_addr(),
        "Server is ready and listening for connections"
    );

    if server_config.binds_to_all_interfaces() {
        tracing::warn!(
            target: TRACING_TARGET_SERVER_STARTUP,
            "Server is bound to all interfaces. Ensure firewall rules are properly configured."
        );
    }

    serve_fn().await.map_err(|err| {
        let error = ServerError::Runtime(err);
        tracing::error!(
            target: TRACING_TARGET_SERVER_SHUTDOWN,
            error = %error,
            recoverable = error.is_recoverable(),
            "Server encountered an error"
        );
        error
    })?;

    tracing::info!(
        target: TRACING_TARGET_SERVER_SHUTDOWN,
        "Server shut down gracefully"
    );
    Ok(())
}
