//! Dish image uploads under `/upload`.
//!
//! The request is `multipart/form-data` with the image (PNG, JPEG, GIF, or
//! WebP) in a file field named `image`. It is re-encoded as WebP and
//! published to object storage; the response carries the public URL to store
//! on a dish.

use actix_multipart::{Multipart, MultipartError};
use actix_web::{post, web};
use futures_util::StreamExt;
use serde::{Deserialize, Serialize};
use tracing::debug;
use utoipa::ToSchema;

use crate::domain::Error;
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::AdminUser;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;

/// Largest accepted image.
pub const MAX_IMAGE_BYTES: usize = 10 * 1024 * 1024;

/// Form field holding the file.
pub const IMAGE_FIELD: &str = "image";

/// Multipart form accepted by the upload endpoint.
#[derive(Debug, ToSchema)]
pub struct ImageUploadForm {
    /// Image file.
    #[schema(value_type = String, format = Binary)]
    pub image: Vec<u8>,
}

/// Where the published image can be fetched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct UploadResponse {
    #[schema(example = "https://cdn.example.com/weekly/9f2c.webp")]
    pub url: String,
}

#[utoipa::path(
    post,
    path = "/upload/image",
    request_body(
        content = ImageUploadForm,
        content_type = "multipart/form-data",
        description = "Image file in the `image` field"
    ),
    responses(
        (status = 200, description = "Published", body = UploadResponse),
        (status = 400, description = "Missing, oversized, or undecodable image", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema),
        (status = 503, description = "Image storage is not configured", body = ErrorSchema)
    ),
    tags = ["uploads"],
    operation_id = "uploadImage"
)]
#[post("/image")]
pub async fn upload_image(
    state: web::Data<HttpState>,
    _admin: AdminUser,
    form: Multipart,
) -> ApiResult<web::Json<UploadResponse>> {
    let image = read_image_field(form).await?;
    let url = state.uploads.upload(image).await?;
    Ok(web::Json(UploadResponse { url }))
}

/// Bytes of the first `image` part. Other parts are skipped.
async fn read_image_field(mut form: Multipart) -> Result<Vec<u8>, Error> {
    while let Some(field) = form.next().await {
        let mut field = field.map_err(malformed)?;
        if field.name() != Some(IMAGE_FIELD) {
            debug!(field = ?field.name(), "skipping multipart field");
            continue;
        }
        let mut image = Vec::new();
        while let Some(chunk) = field.next().await {
            let chunk = chunk.map_err(malformed)?;
            if image.len() + chunk.len() > MAX_IMAGE_BYTES {
                return Err(Error::invalid_request(format!(
                    "image exceeds {MAX_IMAGE_BYTES} bytes"
                )));
            }
            image.extend_from_slice(&chunk);
        }
        return Ok(image);
    }
    Err(Error::invalid_request(format!(
        "multipart field `{IMAGE_FIELD}` is required"
    )))
}

fn malformed(err: MultipartError) -> Error {
    Error::invalid_request(format!("malformed multipart body: {err}"))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(web::scope("/upload").service(upload_image));
}
