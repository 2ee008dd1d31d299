//! Read-only asset serving.

use axum::Router;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, HeaderValue, StatusCode, header};
use axum::routing::get;
use bytes::Bytes;
use snapcdn_storage::AssetStore;

use crate::handler::Result;
use crate::service::ServiceState;

/// Tracing target for asset serving.
const TRACING_TARGET: &str = "snapcdn_server::handler::assets";

/// Serves a stored asset by its root-relative path.
///
/// The store rejects traversal and hidden segments as not-found; nothing
/// outside the storage root is ever resolvable through this route.
#[tracing::instrument(skip(store))]
async fn fetch_asset(
    State(store): State<AssetStore>,
    Path(path): Path<String>,
) -> Result<(StatusCode, HeaderMap, Bytes)> {
    let bytes = store.fetch(&path).await?;

    let mut headers = HeaderMap::new();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static(content_type_for(&path)),
    );

    tracing::debug!(
        target: TRACING_TARGET,
        path = %path,
        size = bytes.len(),
        "asset served"
    );

    Ok((StatusCode::OK, headers, bytes))
}

/// Maps a file extension onto its image content type.
fn content_type_for(path: &str) -> &'static str {
    let extension = std::path::Path::new(path)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_lowercase);

    match extension.as_deref() {
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("avif") => "image/avif",
        Some("svg") => "image/svg+xml",
        Some("bmp") => "image/bmp",
        Some("ico") => "image/x-icon",
        _ => "application/octet-stream",
    }
}

/// Returns a [`Router`] with all asset serving routes.
///
/// [`Router`]: axum::routing::Router
pub fn routes() -> Router<ServiceState> {
    Router::new().route("/images/{*path}", get(fetch_asset))
}

#[cfg(test)]
mod tests {
    use axum_test::multipart::{MultipartForm, Part};

    use super::content_type_for;
    use crate::handler::test::create_test_server;

    #[test]
    fn content_types_follow_extensions() {
        assert_eq!(content_type_for("a/b/c.png"), "image/png");
        assert_eq!(content_type_for("x.JPG"), "image/jpeg");
        assert_eq!(content_type_for("x.jpeg"), "image/jpeg");
        assert_eq!(content_type_for("x.webp"), "image/webp");
        assert_eq!(content_type_for("no-extension"), "application/octet-stream");
    }

    #[tokio::test]
    async fn missing_assets_are_not_found() -> anyhow::Result<()> {
        let (_temp, server) = create_test_server().await?;

        let response = server.get("/images/avatars/u1/nope.png").await;
        response.assert_status_not_found();

        let body: serde_json::Value = response.json();
        assert_eq!(body["name"], "not_found");
        Ok(())
    }

    #[tokio::test]
    async fn hidden_paths_are_never_served() -> anyhow::Result<()> {
        let (temp, server) = create_test_server().await?;

        // Even a real file inside the staging directory stays invisible.
        let staged = temp.path().join(".staging/leftover.part");
        tokio::fs::write(&staged, b"partial").await?;

        let response = server.get("/images/.staging/leftover.part").await;
        response.assert_status_not_found();
        Ok(())
    }

    #[tokio::test]
    async fn served_assets_carry_their_content_type() -> anyhow::Result<()> {
        let (_temp, server) = create_test_server().await?;

        let form = MultipartForm::new()
            .add_text("userId", "u1")
            .add_part(
                "image",
                Part::bytes(b"png bytes".as_slice())
                    .file_name("pic.png")
                    .mime_type("image/png"),
            );
        let uploaded = server.post("/upload/avatar").multipart(form).await;
        uploaded.assert_status_ok();

        let body: serde_json::Value = uploaded.json();
        let file_url = body["fileUrl"].as_str().unwrap();
        let path = file_url.strip_prefix("https://cdn.example.test").unwrap();

        let response = server.get(path).await;
        response.assert_status_ok();
        assert_eq!(response.header("content-type"), "image/png");
        assert_eq!(response.as_bytes().as_ref(), b"png bytes");
        Ok(())
    }
}
