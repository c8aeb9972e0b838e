//! Image upload validation and disk layout.
//!
//! Uploads are validated fully in memory before anything touches the disk,
//! so a rejected request leaves no partial files behind. Stored names are
//! uuid-v4 + original extension; paths in the database are relative to the
//! upload root.

use std::path::{Path, PathBuf};

use axum::body::Bytes;
use axum::extract::Multipart;
use uuid::Uuid;

use crate::errors::AppError;

pub const MAX_FILES: usize = 5;
pub const MAX_FILE_BYTES: usize = 5 * 1024 * 1024;

/// A validated upload, not yet written to disk.
pub struct PendingImage {
    pub original_name: String,
    pub mime_type: String,
    pub extension: &'static str,
    pub data: Bytes,
}

/// Metadata of an image written to disk, ready for row insertion.
pub struct StoredImage {
    pub file_path: String,
    pub file_name: String,
    pub file_size: i64,
    pub mime_type: String,
}

/// Drains the multipart stream, collecting every `images` field.
/// Rejects the whole request on the 6th file, an oversize file, or a
/// non-JPEG/PNG extension or declared MIME type.
pub async fn collect_images(multipart: &mut Multipart) -> Result<Vec<PendingImage>, AppError> {
    let mut images = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Некорректный запрос загрузки: {e}")))?
    {
        if field.name() != Some("images") {
            continue;
        }

        if images.len() == MAX_FILES {
            return Err(AppError::Validation(
                "Можно загрузить не более 5 изображений за раз".to_string(),
            ));
        }

        let original_name = field.file_name().unwrap_or_default().to_string();
        let mime_type = field.content_type().unwrap_or_default().to_string();
        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("Не удалось прочитать файл: {e}")))?;

        let extension = validate_file(&original_name, &mime_type, data.len())?;

        images.push(PendingImage {
            original_name,
            mime_type,
            extension,
            data,
        });
    }

    if images.is_empty() {
        return Err(AppError::Validation(
            "Нет файлов для загрузки".to_string(),
        ));
    }

    Ok(images)
}

/// Checks size, extension and declared MIME type. Returns the canonical
/// extension to use for the stored name.
fn validate_file(
    file_name: &str,
    mime_type: &str,
    size: usize,
) -> Result<&'static str, AppError> {
    if size > MAX_FILE_BYTES {
        return Err(AppError::Validation(
            "Файл слишком большой (максимум 5MB)".to_string(),
        ));
    }

    let extension = Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());
    let extension = match extension.as_deref() {
        Some("jpg") | Some("jpeg") => "jpg",
        Some("png") => "png",
        _ => {
            return Err(AppError::Validation(
                "Только изображения PNG и JPG разрешены".to_string(),
            ))
        }
    };

    match mime_type {
        "image/jpeg" | "image/jpg" | "image/png" => {}
        _ => {
            return Err(AppError::Validation(
                "Только изображения PNG и JPG разрешены".to_string(),
            ))
        }
    }

    Ok(extension)
}

/// Writes the validated uploads under `<upload_dir>/images/` with generated
/// unique names. Collision probability of the uuid names is treated as
/// negligible.
pub async fn persist_images(
    upload_dir: &Path,
    images: Vec<PendingImage>,
) -> Result<Vec<StoredImage>, std::io::Error> {
    let image_dir = upload_dir.join("images");
    tokio::fs::create_dir_all(&image_dir).await?;

    let mut stored = Vec::with_capacity(images.len());
    for image in images {
        let name = format!("{}.{}", Uuid::new_v4(), image.extension);
        tokio::fs::write(image_dir.join(&name), &image.data).await?;
        stored.push(StoredImage {
            file_path: format!("images/{name}"),
            file_name: image.original_name,
            file_size: image.data.len() as i64,
            mime_type: image.mime_type,
        });
    }
    Ok(stored)
}

/// Resolves a database-relative image path against the upload root.
pub fn media_path(upload_dir: &Path, file_path: &str) -> PathBuf {
    upload_dir.join(file_path)
}

/// Best-effort removal of a backing file. Missing files are not an error;
/// the row is the source of truth being cleaned up.
pub async fn remove_media_file(upload_dir: &Path, file_path: &str) {
    let path = media_path(upload_dir, file_path);
    if let Err(e) = tokio::fs::remove_file(&path).await {
        if e.kind() != std::io::ErrorKind::NotFound {
            tracing::warn!("Failed to remove media file {}: {e}", path.display());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_jpeg_and_png() {
        assert_eq!(validate_file("a.jpg", "image/jpeg", 100).unwrap(), "jpg");
        assert_eq!(validate_file("b.JPEG", "image/jpeg", 100).unwrap(), "jpg");
        assert_eq!(validate_file("c.PNG", "image/png", 100).unwrap(), "png");
    }

    #[test]
    fn rejects_oversize_file() {
        let err = validate_file("a.jpg", "image/jpeg", MAX_FILE_BYTES + 1);
        assert!(matches!(err, Err(AppError::Validation(_))));
    }

    #[test]
    fn exact_cap_is_allowed() {
        assert!(validate_file("a.jpg", "image/jpeg", MAX_FILE_BYTES).is_ok());
    }

    #[test]
    fn rejects_non_image_extension() {
        let err = validate_file("notes.pdf", "image/jpeg", 100);
        assert!(matches!(err, Err(AppError::Validation(_))));
    }

    #[test]
    fn rejects_missing_extension() {
        let err = validate_file("noext", "image/png", 100);
        assert!(matches!(err, Err(AppError::Validation(_))));
    }

    #[test]
    fn rejects_mismatched_mime_type() {
        let err = validate_file("a.png", "application/octet-stream", 100);
        assert!(matches!(err, Err(AppError::Validation(_))));
    }

    #[test]
    fn media_path_joins_relative_path() {
        let path = media_path(Path::new("uploads"), "images/x.png");
        assert_eq!(path, PathBuf::from("uploads/images/x.png"));
    }
}
