//! S3-compatible object storage upload for md2html.
//!
//! Converted pages are stored under a `YYYY/MM/<file name>` key and served
//! from a public base URL. Works with MinIO and other S3-compatible stores via
//! path-style addressing.

mod uploader;

pub use uploader::{S3Settings, S3Uploader, UploadError, UploadedObject, object_key};
