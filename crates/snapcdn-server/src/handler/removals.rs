//! Deletion handlers.

use axum::extract::State;
use axum::routing::delete;
use axum::{Json, Router};
use snapcdn_core::namespace::Category;
use snapcdn_storage::AssetStore;

use crate::handler::Result;
use crate::handler::request::{DeleteProductRequest, DeleteSupplierRequest};
use crate::handler::response::DeleteResponse;
use crate::service::ServiceState;

/// Tracing target for deletion operations.
const TRACING_TARGET: &str = "snapcdn_server::handler::removals";

/// Removes a supplier's entire asset subtree.
///
/// Deleting a subtree that does not exist is a successful no-op, so the
/// route is idempotent.
#[tracing::instrument(skip_all)]
async fn delete_supplier(
    State(store): State<AssetStore>,
    Json(request): Json<DeleteSupplierRequest>,
) -> Result<Json<DeleteResponse>> {
    store
        .delete_subtree(Category::Supplier, &request.identifiers())
        .await?;

    tracing::debug!(target: TRACING_TARGET, "supplier subtree deleted");
    Ok(Json(DeleteResponse::acknowledged()))
}

/// Removes every product-directory file whose stored name contains the
/// product identifier.
///
/// The sweep is best-effort: files that match but cannot be removed are
/// logged and the route still reports success with the removed count.
#[tracing::instrument(skip_all)]
async fn delete_product(
    State(store): State<AssetStore>,
    Json(request): Json<DeleteProductRequest>,
) -> Result<Json<DeleteResponse>> {
    let sweep = store.delete_by_product(&request.identifiers()).await?;

    if !sweep.is_clean() {
        tracing::warn!(
            target: TRACING_TARGET,
            failed = ?sweep.failed,
            "some matched files could not be removed"
        );
    }

    Ok(Json(DeleteResponse::swept(sweep.removed_count())))
}

/// Returns a [`Router`] with all deletion routes.
///
/// [`Router`]: axum::routing::Router
pub fn routes() -> Router<ServiceState> {
    Router::new()
        .route("/supplier", delete(delete_supplier))
        .route("/product", delete(delete_product))
}

#[cfg(test)]
mod tests {
    use axum_test::multipart::{MultipartForm, Part};

    use crate::handler::test::create_test_server;

    fn upload_form(user_id: &str, supplier_id: &str) -> MultipartForm {
        MultipartForm::new()
            .add_text("userId", user_id.to_string())
            .add_text("supplierId", supplier_id.to_string())
            .add_part(
                "image",
                Part::bytes(b"img".as_slice())
                    .file_name("a.png")
                    .mime_type("image/png"),
            )
    }

    #[tokio::test]
    async fn supplier_delete_is_idempotent() -> anyhow::Result<()> {
        let (_temp, server) = create_test_server().await?;
        let body = serde_json::json!({"userId": "u1", "supplierId": "s1"});

        // Deleting something that never existed succeeds, twice.
        for _ in 0..2 {
            let response = server.delete("/supplier").json(&body).await;
            response.assert_status_ok();
            response.assert_json(&serde_json::json!({"success": true}));
        }
        Ok(())
    }

    #[tokio::test]
    async fn supplier_delete_removes_stored_assets() -> anyhow::Result<()> {
        let (_temp, server) = create_test_server().await?;

        let uploaded = server
            .post("/upload/supplier")
            .multipart(upload_form("u1", "s1"))
            .await;
        uploaded.assert_status_ok();
        let body: serde_json::Value = uploaded.json();
        let file_url = body["fileUrl"].as_str().unwrap().to_string();
        let path = file_url.strip_prefix("https://cdn.example.test").unwrap();

        server.get(path).await.assert_status_ok();

        let response = server
            .delete("/supplier")
            .json(&serde_json::json!({"userId": "u1", "supplierId": "s1"}))
            .await;
        response.assert_status_ok();

        server.get(path).await.assert_status_not_found();
        Ok(())
    }

    #[tokio::test]
    async fn supplier_delete_requires_identifiers() -> anyhow::Result<()> {
        let (_temp, server) = create_test_server().await?;

        let response = server
            .delete("/supplier")
            .json(&serde_json::json!({"userId": "u1"}))
            .await;
        response.assert_status_bad_request();

        let body: serde_json::Value = response.json();
        assert_eq!(body["name"], "missing_identifier");
        Ok(())
    }

    #[tokio::test]
    async fn product_delete_matches_substrings() -> anyhow::Result<()> {
        let (temp, server) = create_test_server().await?;

        let directory = temp.path().join("products/u1/s1");
        tokio::fs::create_dir_all(&directory).await?;
        for name in ["1700-a.png", "1701-prod42.png", "1702-prod423.png"] {
            tokio::fs::write(directory.join(name), b"img").await?;
        }

        let response = server
            .delete("/product")
            .json(&serde_json::json!({
                "userId": "u1",
                "supplierId": "s1",
                "productId": "prod42",
            }))
            .await;
        response.assert_status_ok();
        response.assert_json(&serde_json::json!({"success": true, "removed": 2}));

        assert!(directory.join("1700-a.png").exists());
        assert!(!directory.join("1701-prod42.png").exists());
        assert!(!directory.join("1702-prod423.png").exists());
        Ok(())
    }

    #[tokio::test]
    async fn product_delete_of_missing_directory_is_a_noop() -> anyhow::Result<()> {
        let (_temp, server) = create_test_server().await?;

        let response = server
            .delete("/product")
            .json(&serde_json::json!({
                "userId": "u1",
                "supplierId": "s1",
                "productId": "p1",
            }))
            .await;
        response.assert_status_ok();
        response.assert_json(&serde_json::json!({"success": true, "removed": 0}));
        Ok(())
    }

    #[tokio::test]
    async fn product_delete_requires_a_product_id() -> anyhow::Result<()> {
        let (_temp, server) = create_test_server().await?;

        let response = server
            .delete("/product")
            .json(&serde_json::json!({"userId": "u1", "supplierId": "s1"}))
            .await;
        response.assert_status_bad_request();

        let body: serde_json::Value = response.json();
        assert_eq!(body["name"], "missing_identifier");
        Ok(())
    }
}
