use async_trait::async_trait;
use aws_sdk_s3::Client;
use bytes::Bytes;

use super::ObjectStore;
use crate::error::RetrievalError;

/// S3-backed implementation of ObjectStore.
///
/// Fetches whole objects from S3 or S3-compatible storage (MinIO, GCS, etc.).
/// Originals are expected to be modest in size, so the body is buffered in
/// full rather than streamed.
#[derive(Clone)]
pub struct S3ObjectStore {
    client: Client,
    bucket: String,
}

impl S3ObjectStore {
    /// Create a new S3ObjectStore serving objects from the given bucket.
    pub fn new(client: Client, bucket: String) -> Self {
        Self { client, bucket }
    }

    /// Get the bucket name.
    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    fn object_url(&self, key: &str) -> String {
        format!("s3://{}/{}", self.bucket, key)
    }
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    async fn get_object(&self, key: &str) -> Result<Bytes, RetrievalError> {
        let resp = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| {
                // The typed service error knows about missing keys; so does
                // the raw HTTP status when the typed error is unavailable
                let service_says_missing = e
                    .as_service_error()
                    .map(|se| se.is_no_such_key())
                    .unwrap_or(false);
                let status_says_missing = e
                    .raw_response()
                    .map(|r| r.status().as_u16() == 404)
                    .unwrap_or(false);

                if service_says_missing || status_says_missing {
                    return RetrievalError::NotFound(self.object_url(key));
                }

                // S3-compatible services do not all report a missing key the
                // same way, so fall back to matching on the error string
                let err_str = e.to_string();
                if err_str.contains("NoSuchKey")
                    || err_str.contains("NotFound")
                    || err_str.contains("404")
                {
                    return RetrievalError::NotFound(self.object_url(key));
                }

                RetrievalError::Storage(err_str)
            })?;

        let data = resp
            .body
            .collect()
            .await
            .map_err(|e| RetrievalError::Connection(e.to_string()))?
            .into_bytes();

        if data.is_empty() {
            return Err(RetrievalError::EmptyBody(self.object_url(key)));
        }

        Ok(data)
    }
}

/// Create an S3 client for the given region, with an optional custom
/// endpoint for S3-compatible services (MinIO, LocalStack).
///
/// ```ignore
/// // MinIO running locally
/// let client = create_s3_client(Some("http://localhost:9000"), "us-east-1").await;
///
/// // AWS S3
/// let client = create_s3_client(None, "ap-northeast-2").await;
/// ```
pub async fn create_s3_client(endpoint_url: Option<&str>, region: &str) -> Client {
    let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest())
        .region(aws_config::Region::new(region.to_string()));

    if let Some(endpoint) = endpoint_url {
        loader = loader.endpoint_url(endpoint);
    }

    let sdk_config = loader.load().await;

    // S3-compatible services usually require path-style addressing
    let mut builder = aws_sdk_s3::config::Builder::from(&sdk_config);
    if endpoint_url.is_some() {
        builder = builder.force_path_style(true);
    }

    Client::from_conf(builder.build())
}
