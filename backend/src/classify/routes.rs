use actix_multipart::{Field, Multipart};
use actix_web::{http::header, web, HttpRequest, HttpResponse};
use futures::{StreamExt, TryStreamExt};
use log::{error, info};

use super::client::ClassifierClient;
use super::error::ClassifyError;
use super::models::{ClassificationRequest, MAX_BODY_BYTES};

const FILE_FIELD: &str = "file";

pub async fn classify_image(
    req: HttpRequest,
    payload: Multipart,
    classifier: web::Data<ClassifierClient>,
) -> Result<HttpResponse, ClassifyError> {
    let is_multipart = req
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with("multipart/form-data"));
    if !is_multipart {
        return Err(ClassifyError::missing_file());
    }

    let upload = read_upload(payload).await?;
    let result = classifier.classify(upload).await?;
    info!(
        "Classified upload as '{}' ({:.2})",
        result.suggested_label, result.confidence
    );
    Ok(HttpResponse::Ok().json(result))
}

/// Collects the first `file` part; other parts are drained and ignored.
async fn read_upload(mut payload: Multipart) -> Result<ClassificationRequest, ClassifyError> {
    let mut upload = ClassificationRequest::default();
    let mut found = false;

    while let Some(mut field) = payload.try_next().await.map_err(payload_error)? {
        if found || field.name() != Some(FILE_FIELD) {
            while let Some(chunk) = field.next().await {
                chunk.map_err(payload_error)?;
            }
            continue;
        }

        found = true;
        upload.content_type = field.content_type().map(|mime| mime.to_string());
        upload.file_name = field
            .content_disposition()
            .and_then(|cd| cd.get_filename())
            .map(str::to_string);
        let is_image = upload
            .content_type
            .as_deref()
            .is_some_and(|m| m.starts_with("image/"));
        upload.bytes = if is_image {
            read_field(&mut field).await?
        } else {
            read_field_head(&mut field).await?
        };
    }

    Ok(upload)
}

async fn read_field(field: &mut Field) -> Result<Vec<u8>, ClassifyError> {
    let mut data = Vec::new();
    while let Some(chunk) = field.next().await {
        let chunk = chunk.map_err(payload_error)?;
        if data.len() + chunk.len() > MAX_BODY_BYTES {
            return Err(ClassifyError::file_too_large());
        }
        data.extend_from_slice(&chunk);
    }
    Ok(data)
}

/// Keeps only the first non-empty chunk of a part that will be rejected
/// anyway, so validation can still tell "missing file" from "not an image".
async fn read_field_head(field: &mut Field) -> Result<Vec<u8>, ClassifyError> {
    let mut head = Vec::new();
    while let Some(chunk) = field.next().await {
        let chunk = chunk.map_err(payload_error)?;
        if head.is_empty() {
            head.extend_from_slice(&chunk);
        }
    }
    Ok(head)
}

fn payload_error(err: actix_multipart::MultipartError) -> ClassifyError {
    error!("Failed to read upload payload: {}", err);
    ClassifyError::Internal(format!("failed to read upload: {}", err))
}
