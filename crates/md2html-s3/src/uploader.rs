//! Page upload to S3-compatible storage.

use std::error::Error;

use aws_sdk_s3::Client;
use aws_sdk_s3::config::Credentials;
use chrono::{Datelike, Local, NaiveDate};

/// Content type of every uploaded page.
const HTML_CONTENT_TYPE: &str = "text/html; charset=utf-8";

/// Provider name reported for the static credentials.
const CREDENTIALS_PROVIDER: &str = "md2html";

/// Connection and addressing settings for the upload target.
#[derive(Debug, Clone)]
pub struct S3Settings {
    /// Storage host, with or without an `http://`/`https://` prefix.
    pub endpoint: String,
    /// Storage port.
    pub port: u16,
    /// Bucket name.
    pub bucket: String,
    /// Access key ID.
    pub access_key: String,
    /// Secret access key.
    pub secret_key: String,
    /// Signing region.
    pub region: String,
    /// Connect over HTTPS instead of HTTP.
    pub use_ssl: bool,
    /// Public base URL of the bucket.
    pub base_url: String,
    /// Path appended to the base URL before the object key.
    pub path: String,
}

impl S3Settings {
    /// Endpoint URL handed to the SDK.
    ///
    /// Any scheme on the configured endpoint is replaced by the one `use_ssl`
    /// selects.
    #[must_use]
    pub fn endpoint_url(&self) -> String {
        let host = self
            .endpoint
            .strip_prefix("https://")
            .or_else(|| self.endpoint.strip_prefix("http://"))
            .unwrap_or(&self.endpoint)
            .trim_end_matches('/');
        let scheme = if self.use_ssl { "https" } else { "http" };
        format!("{scheme}://{host}:{}", self.port)
    }

    /// Public URL of an uploaded object.
    #[must_use]
    pub fn public_url(&self, key: &str) -> String {
        format!(
            "{}{}/{key}",
            self.base_url.trim_end_matches('/'),
            self.path.trim_end_matches('/')
        )
    }
}

/// A page stored by [`S3Uploader::upload`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedObject {
    /// Object key within the bucket.
    pub key: String,
    /// Public URL of the object.
    pub url: String,
}

/// Error returned by the uploader.
#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("S3 error: {0}")]
    S3(String),
    #[error("Invalid file name: {0:?}")]
    InvalidFileName(String),
}

/// Object key for a file uploaded on `date`: `YYYY/MM/<file name>`.
#[must_use]
pub fn object_key(file_name: &str, date: NaiveDate) -> String {
    format!("{:04}/{:02}/{file_name}", date.year(), date.month())
}

/// Uploads rendered pages to one bucket.
pub struct S3Uploader {
    settings: S3Settings,
    client: Client,
}

impl S3Uploader {
    /// Build the SDK client for the given settings.
    pub async fn connect(settings: S3Settings) -> Self {
        let credentials = Credentials::new(
            &settings.access_key,
            &settings.secret_key,
            None,
            None,
            CREDENTIALS_PROVIDER,
        );

        let sdk_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(aws_config::Region::new(settings.region.clone()))
            .endpoint_url(settings.endpoint_url())
            .credentials_provider(credentials)
            .load()
            .await;

        // Self-hosted stores address objects as endpoint/bucket/key
        let s3_config = aws_sdk_s3::config::Builder::from(&sdk_config)
            .force_path_style(true)
            .build();

        Self {
            settings,
            client: Client::from_conf(s3_config),
        }
    }

    /// Upload a page under today's `YYYY/MM/` prefix.
    ///
    /// # Errors
    ///
    /// Returns `UploadError::InvalidFileName` for an empty name or one with a
    /// path separator, and `UploadError::S3` when the request fails.
    pub async fn upload(
        &self,
        file_name: &str,
        content: Vec<u8>,
    ) -> Result<UploadedObject, UploadError> {
        if file_name.is_empty() || file_name.contains(['/', '\\']) {
            return Err(UploadError::InvalidFileName(file_name.to_owned()));
        }

        let key = object_key(file_name, Local::now().date_naive());

        self.client
            .put_object()
            .bucket(&self.settings.bucket)
            .key(&key)
            .body(content.into())
            .content_type(HTML_CONTENT_TYPE)
            .send()
            .await
            .map_err(|e| UploadError::S3(error_chain(&e)))?;

        tracing::info!(bucket = %self.settings.bucket, key = %key, "Uploaded");

        let url = self.settings.public_url(&key);
        Ok(UploadedObject { key, url })
    }
}

/// Walk the error source chain and join all messages.
fn error_chain(err: &dyn Error) -> String {
    let mut msgs = vec![err.to_string()];
    let mut source = err.source();
    while let Some(s) = source {
        msgs.push(s.to_string());
        source = s.source();
    }
    msgs.join(": ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn settings() -> S3Settings {
        S3Settings {
            endpoint: "minio.local".to_owned(),
            port: 9000,
            bucket: "docs".to_owned(),
            access_key: "key".to_owned(),
            secret_key: "secret".to_owned(),
            region: "us-east-1".to_owned(),
            use_ssl: false,
            base_url: "https://cdn.example.com".to_owned(),
            path: "/pages".to_owned(),
        }
    }

    #[test]
    fn test_endpoint_url_plain_host() {
        assert_eq!(settings().endpoint_url(), "http://minio.local:9000");
    }

    #[test]
    fn test_endpoint_url_strips_scheme() {
        let s = S3Settings {
            endpoint: "https://minio.local/".to_owned(),
            ..settings()
        };
        assert_eq!(s.endpoint_url(), "http://minio.local:9000");
    }

    #[test]
    fn test_endpoint_url_ssl() {
        let s = S3Settings {
            endpoint: "http://minio.local".to_owned(),
            use_ssl: true,
            port: 443,
            ..settings()
        };
        assert_eq!(s.endpoint_url(), "https://minio.local:443");
    }

    #[test]
    fn test_object_key_pads_month() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
        assert_eq!(object_key("notes.html", date), "2024/03/notes.html");
    }

    #[test]
    fn test_object_key_december() {
        let date = NaiveDate::from_ymd_opt(2025, 12, 31).unwrap();
        assert_eq!(object_key("a.html", date), "2025/12/a.html");
    }

    #[test]
    fn test_public_url() {
        assert_eq!(
            settings().public_url("2024/03/notes.html"),
            "https://cdn.example.com/pages/2024/03/notes.html"
        );
    }

    #[test]
    fn test_public_url_trims_trailing_slashes() {
        let s = S3Settings {
            base_url: "https://cdn.example.com/".to_owned(),
            path: "/pages/".to_owned(),
            ..settings()
        };
        assert_eq!(
            s.public_url("2024/03/notes.html"),
            "https://cdn.example.com/pages/2024/03/notes.html"
        );
    }

    #[test]
    fn test_public_url_empty_path() {
        let s = S3Settings {
            path: String::new(),
            ..settings()
        };
        assert_eq!(s.public_url("k.html"), "https://cdn.example.com/k.html");
    }

    #[test]
    fn test_error_chain_joins_sources() {
        #[derive(Debug, thiserror::Error)]
        #[error("outer")]
        struct Outer(#[source] std::io::Error);

        let err = Outer(std::io::Error::other("inner"));
        assert_eq!(error_chain(&err), "outer: inner");
    }
}
