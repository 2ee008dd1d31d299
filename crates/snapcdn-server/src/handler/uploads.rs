//! Multipart upload handlers.
//!
//! Every upload route accepts the same form shape the original clients
//! send: an `image` file part plus identifier text fields (`userId`,
//! `supplierId`). The route determines the category and therefore which
//! identifiers are required.

use axum::extract::multipart::Field;
use axum::extract::{DefaultBodyLimit, Multipart, State};
use axum::routing::post;
use axum::{Json, Router};
use bytes::Bytes;
use snapcdn_core::namespace::{Category, Identifiers};
use snapcdn_storage::AssetStore;

use crate::handler::response::UploadResponse;
use crate::handler::{ErrorKind, Result};
use crate::service::ServiceState;

/// Tracing target for upload operations.
const TRACING_TARGET: &str = "snapcdn_server::handler::uploads";

/// Maximum file size: 25MB
const MAX_FILE_SIZE: usize = 25 * 1024 * 1024;

/// Collected multipart form: one file part plus identifier fields.
#[derive(Debug, Default)]
struct UploadForm {
    file: Option<(String, Bytes)>,
    user_id: Option<String>,
    supplier_id: Option<String>,
}

impl UploadForm {
    /// Drains the multipart stream into a form.
    ///
    /// The first part carrying a filename becomes the payload; extra file
    /// parts are ignored. Unknown text fields are ignored as well.
    async fn collect(multipart: &mut Multipart) -> Result<Self> {
        let mut form = Self::default();

        while let Some(field) = multipart.next_field().await.map_err(|err| {
            tracing::error!(target: TRACING_TARGET, error = %err, "failed to read multipart field");
            ErrorKind::BadRequest
                .with_message("Invalid multipart data")
                .with_context(format!("Failed to parse multipart form: {err}"))
        })? {
            if let Some(filename) = field.file_name() {
                let filename = filename.to_string();
                if form.file.is_some() {
                    tracing::debug!(
                        target: TRACING_TARGET,
                        filename = %filename,
                        "ignoring extra file field"
                    );
                    continue;
                }

                let data = read_file_field(field, &filename).await?;
                form.file = Some((filename, data));
                continue;
            }

            let name = field.name().unwrap_or_default().to_string();
            let value = field.text().await.map_err(|err| {
                tracing::error!(target: TRACING_TARGET, error = %err, field = %name, "failed to read form field");
                ErrorKind::BadRequest
                    .with_message("Invalid multipart data")
                    .with_context(format!("Could not read field '{name}': {err}"))
            })?;

            match name.as_str() {
                "userId" => form.user_id = Some(value),
                "supplierId" => form.supplier_id = Some(value),
                _ => {
                    tracing::debug!(
                        target: TRACING_TARGET,
                        field = %name,
                        "ignoring unknown form field"
                    );
                }
            }
        }

        Ok(form)
    }

    /// Builds the identifier set from the collected text fields.
    fn identifiers(&self) -> Identifiers {
        let mut identifiers = Identifiers::new();
        if let Some(user_id) = self.user_id.as_deref() {
            identifiers = identifiers.with_user(user_id);
        }
        if let Some(supplier_id) = self.supplier_id.as_deref() {
            identifiers = identifiers.with_supplier(supplier_id);
        }
        identifiers
    }

    /// Takes the file payload, failing if none was supplied.
    fn into_file(self) -> Result<(String, Bytes)> {
        self.file
            .ok_or_else(|| ErrorKind::MissingPayload.with_message("No file provided in multipart request"))
    }
}

/// Reads one file field with the size cap enforced per chunk.
async fn read_file_field(mut field: Field<'_>, filename: &str) -> Result<Bytes> {
    let mut data = Vec::new();

    while let Some(chunk) = field.chunk().await.map_err(|err| {
        tracing::error!(target: TRACING_TARGET, error = %err, filename = %filename, "failed to read file chunk");
        ErrorKind::BadRequest
            .with_message("Failed to read file data")
            .with_context(format!("Could not read file '{filename}': {err}"))
    })? {
        // Check size before adding chunk to prevent memory exhaustion
        if data.len() + chunk.len() > MAX_FILE_SIZE {
            return Err(ErrorKind::BadRequest
                .with_message("File too large")
                .with_context(format!(
                    "File '{filename}' exceeds maximum size of {} MB",
                    MAX_FILE_SIZE / (1024 * 1024)
                )));
        }
        data.extend_from_slice(&chunk);
    }

    Ok(Bytes::from(data))
}

/// Shared ingestion path for all upload routes.
async fn ingest_form(
    store: &AssetStore,
    multipart: &mut Multipart,
    category: Category,
) -> Result<Json<UploadResponse>> {
    let form = UploadForm::collect(multipart).await?;
    let identifiers = form.identifiers();
    let (filename, payload) = form.into_file()?;

    let location = store
        .ingest(payload, &filename, category, &identifiers)
        .await?;

    tracing::debug!(
        target: TRACING_TARGET,
        category = %category,
        url = %location.file_url,
        "upload completed"
    );

    Ok(Json(UploadResponse::from(location)))
}

/// Uploads a generic user image.
///
/// Form data:
/// - `image`: the file to upload
/// - `userId`: owning user
#[tracing::instrument(skip_all)]
async fn upload_generic(
    State(store): State<AssetStore>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>> {
    ingest_form(&store, &mut multipart, Category::Avatar).await
}

/// Uploads a user avatar.
///
/// Form data:
/// - `image`: the file to upload
/// - `userId`: owning user
#[tracing::instrument(skip_all)]
async fn upload_avatar(
    State(store): State<AssetStore>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>> {
    ingest_form(&store, &mut multipart, Category::Avatar).await
}

/// Uploads a supplier asset.
///
/// Form data:
/// - `image`: the file to upload
/// - `userId`: owning user
/// - `supplierId`: supplier below the user
#[tracing::instrument(skip_all)]
async fn upload_supplier(
    State(store): State<AssetStore>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>> {
    ingest_form(&store, &mut multipart, Category::Supplier).await
}

/// Uploads a product asset.
///
/// Form data:
/// - `image`: the file to upload
/// - `userId`: owning user
/// - `supplierId`: supplier below the user
#[tracing::instrument(skip_all)]
async fn upload_product(
    State(store): State<AssetStore>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>> {
    ingest_form(&store, &mut multipart, Category::Product).await
}

/// Returns a [`Router`] with all upload routes.
///
/// [`Router`]: axum::routing::Router
pub fn routes() -> Router<ServiceState> {
    Router::new()
        .route("/upload", post(upload_generic))
        .route("/upload/avatar", post(upload_avatar))
        .route("/upload/supplier", post(upload_supplier))
        .route("/upload/product", post(upload_product))
        // Multipart framing adds overhead on top of the file itself.
        .layer(DefaultBodyLimit::max(MAX_FILE_SIZE + 64 * 1024))
}
