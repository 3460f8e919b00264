use axum::http::HeaderMap;
use std::collections::HashMap;

use crate::storage::ImageUpload;

/// Name of the repeated multipart part that carries image files.
pub const IMAGE_FIELD: &str = "images";

/// Text fields and image parts from a `multipart/form-data` body.
#[derive(Debug, Default)]
pub struct ListingForm {
    pub fields: HashMap<String, String>,
    pub images: Vec<ImageUpload>,
}

/// Parse multipart form data using multer.
pub async fn parse_listing_form(headers: &HeaderMap, body: bytes::Bytes) -> Result<ListingForm, String> {
    let boundary = headers
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .and_then(|ct| multer::parse_boundary(ct).ok())
        .ok_or_else(|| "Missing multipart boundary".to_string())?;

    let stream = futures_util::stream::once(async { Ok::<_, std::io::Error>(body) });
    let mut multipart = multer::Multipart::new(stream, boundary);

    let mut form = ListingForm::default();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| format!("Multipart error: {e}"))?
    {
        let name = field.name().unwrap_or("unknown").to_string();

        if name == IMAGE_FIELD {
            let filename = field.file_name().unwrap_or("image").to_string();
            let content_type = field
                .content_type()
                .map(|m| m.to_string())
                .unwrap_or_else(|| "application/octet-stream".to_string());
            let bytes = field
                .bytes()
                .await
                .map_err(|e| format!("Image read error: {e}"))?;
            form.images.push(ImageUpload {
                filename,
                content_type,
                bytes,
            });
        } else {
            let value = field
                .text()
                .await
                .map_err(|e| format!("Field read error: {e}"))?;
            form.fields.insert(name, value);
        }
    }

    Ok(form)
}
