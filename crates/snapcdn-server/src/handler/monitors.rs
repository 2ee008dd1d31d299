//! Liveness check handlers.

use axum::routing::get;
use axum::{Json, Router};

use crate::handler::response::HealthResponse;
use crate::service::ServiceState;

/// Answers the liveness probe.
async fn ping() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}

/// Returns a [`Router`] with all liveness routes.
///
/// [`Router`]: axum::routing::Router
pub fn routes() -> Router<ServiceState> {
    Router::new().route("/ping", get(ping))
}

#[cfg(test)]
mod tests {
    use crate::handler::test::create_test_server;

    #[tokio::test]
    async fn ping_reports_ok() -> anyhow::Result<()> {
        let (_temp, server) = create_test_server().await?;

        let response = server.get("/ping").await;
        response.assert_status_ok();
        response.assert_json(&serde_json::json!({"status": "ok"}));
        Ok(())
    }
}
