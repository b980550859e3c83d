use log::{debug, error, warn};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response};
use shared::ClassificationResult;
use std::time::Duration;

use super::error::ClassifyError;
use super::models::{ClassificationRequest, MAX_BODY_BYTES, REQUEST_TIMEOUT};

/// Forwards uploads to the external classification service.
///
/// Built once at startup and cloned into every worker; clones share the
/// underlying connection pool.
#[derive(Clone, Debug)]
pub struct ClassifierClient {
    http: Client,
    predict_url: String,
}

impl ClassifierClient {
    pub fn new(base_url: &str) -> Result<Self, ClassifyError> {
        Self::with_timeout(base_url, REQUEST_TIMEOUT)
    }

    pub fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self, ClassifyError> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ClassifyError::Internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            predict_url: format!("{}/predict", base_url.trim_end_matches('/')),
        })
    }

    pub fn predict_url(&self) -> &str {
        &self.predict_url
    }

    /// Validates the upload, then makes exactly one call to `/predict`.
    pub async fn classify(
        &self,
        request: ClassificationRequest,
    ) -> Result<ClassificationResult, ClassifyError> {
        let media_type = request.validate()?.to_string();
        let ClassificationRequest {
            bytes, file_name, ..
        } = request;

        let part = Part::bytes(bytes)
            .file_name(file_name.unwrap_or_else(|| "upload".to_string()))
            .mime_str(&media_type)
            .map_err(|_| ClassifyError::not_an_image())?;
        let form = Form::new().part("file", part);

        debug!("Forwarding {} upload to {}", media_type, self.predict_url);

        let response = self
            .http
            .post(&self.predict_url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| {
                error!("Classification request to {} failed: {}", self.predict_url, e);
                ClassifyError::from(e)
            })?;

        let status = response.status();
        if status.is_server_error() {
            error!("Classification service returned {}", status);
            return Err(ClassifyError::UpstreamUnavailable(
                "service reported an error".to_string(),
            ));
        }
        if status.is_client_error() {
            warn!("Classification service rejected the upload with {}", status);
            return Err(ClassifyError::InvalidInput(
                "rejected by classification service".to_string(),
            ));
        }
        if !status.is_success() {
            error!("Unexpected status {} from classification service", status);
            return Err(ClassifyError::UpstreamUnavailable(format!(
                "unexpected status {}",
                status.as_u16()
            )));
        }

        let body = read_limited(response).await?;
        parse_result(&body)
    }
}

async fn read_limited(mut response: Response) -> Result<Vec<u8>, ClassifyError> {
    if response
        .content_length()
        .is_some_and(|len| len > MAX_BODY_BYTES as u64)
    {
        return Err(ClassifyError::UpstreamUnavailable(
            "response too large".to_string(),
        ));
    }

    let mut body = Vec::new();
    while let Some(chunk) = response.chunk().await? {
        if body.len() + chunk.len() > MAX_BODY_BYTES {
            return Err(ClassifyError::UpstreamUnavailable(
                "response too large".to_string(),
            ));
        }
        body.extend_from_slice(&chunk);
    }
    Ok(body)
}

/// Empty and malformed bodies share one kind and differ only in message.
fn parse_result(body: &[u8]) -> Result<ClassificationResult, ClassifyError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        error!("Classification service returned an empty body");
        return Err(ClassifyError::UpstreamUnavailable(
            "empty response".to_string(),
        ));
    }
    serde_json::from_slice(body).map_err(|e| {
        error!("Unparseable classification response: {}", e);
        ClassifyError::UpstreamUnavailable(format!("malformed response: {}", e))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn predict_url_ignores_trailing_slash() {
        let client = ClassifierClient::new("http://localhost:8000/").unwrap();
        assert_eq!(client.predict_url(), "http://localhost:8000/predict");
    }

    #[test]
    fn parse_result_distinguishes_empty_from_malformed_by_message() {
        let empty = parse_result(b"  \n").unwrap_err();
        assert!(matches!(&empty, ClassifyError::UpstreamUnavailable(m) if m == "empty response"));

        let malformed = parse_result(b"<html>oops</html>").unwrap_err();
        assert!(matches!(&malformed, ClassifyError::UpstreamUnavailable(m) if m.starts_with("malformed")));

        let ok = parse_result(br#"{"suggestedLabel":"Organic","confidence":0.5}"#).unwrap();
        assert_eq!(ok.suggested_label, "Organic");
    }
}
