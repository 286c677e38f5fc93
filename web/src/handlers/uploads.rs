//! Catalog image uploads.
//!
//! Admin-only multipart endpoint. Files are stored under the configured
//! uploads directory with a UUID name and served statically by the
//! router's `ServeDir`.

use crate::auth::RequireAdmin;
use crate::error::AppError;
use crate::state::AppState;
use axum::{
    Json,
    extract::{Multipart, State},
    http::StatusCode,
};
use serde::Serialize;
use uuid::Uuid;

/// Extensions accepted for catalog images.
const ALLOWED_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "webp", "gif"];

/// Response after a successful upload.
#[derive(Debug, Clone, Serialize)]
pub struct UploadResponse {
    /// Public path of the stored image.
    pub url: String,
}

/// Store a catalog image (admin).
///
/// The first multipart part carrying a filename is taken as the image.
/// Its extension must be on the allow-list and its size within the
/// configured cap.
///
/// # Endpoint
///
/// `POST /api/admin/uploads` (multipart/form-data)
pub async fn upload(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<UploadResponse>), AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::bad_request(format!("Malformed multipart body: {e}")))?
    {
        let Some(file_name) = field.file_name().map(ToOwned::to_owned) else {
            continue;
        };

        let extension = extension_of(&file_name)
            .ok_or_else(|| AppError::validation("File type is not allowed"))?;

        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::bad_request(format!("Failed to read upload: {e}")))?;

        if data.is_empty() {
            return Err(AppError::validation("Uploaded file is empty"));
        }
        if data.len() > state.uploads.max_bytes {
            return Err(AppError::payload_too_large(format!(
                "File exceeds the {} byte limit",
                state.uploads.max_bytes
            )));
        }

        let stored_name = format!("{}.{extension}", Uuid::new_v4());
        let path = std::path::Path::new(&state.uploads.dir).join(&stored_name);

        tokio::fs::create_dir_all(&state.uploads.dir)
            .await
            .map_err(|e| {
                AppError::internal("Failed to store upload").with_source(e.into())
            })?;
        tokio::fs::write(&path, &data).await.map_err(|e| {
            AppError::internal("Failed to store upload").with_source(e.into())
        })?;

        tracing::info!(
            file = %stored_name,
            bytes = data.len(),
            admin = %admin.user.id,
            "Image uploaded"
        );

        return Ok((
            StatusCode::CREATED,
            Json(UploadResponse {
                url: format!("/uploads/{stored_name}"),
            }),
        ));
    }

    Err(AppError::validation("No file in the request"))
}

/// Lower-cased extension, if it is on the allow-list.
fn extension_of(file_name: &str) -> Option<String> {
    let extension = std::path::Path::new(file_name)
        .extension()?
        .to_str()?
        .to_ascii_lowercase();
    ALLOWED_EXTENSIONS
        .contains(&extension.as_str())
        .then_some(extension)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allow_list_is_case_insensitive() {
        assert_eq!(extension_of("photo.PNG").as_deref(), Some("png"));
        assert_eq!(extension_of("photo.jpeg").as_deref(), Some("jpeg"));
    }

    #[test]
    fn disallowed_or_missing_extensions_fail() {
        assert!(extension_of("script.sh").is_none());
        assert!(extension_of("noextension").is_none());
        assert!(extension_of("archive.tar.gz").is_none());
    }
}
