//! Image upload adapters: WebP transcoding, the on-disk spool, and S3
//! object storage.

mod cap_std_upload_spool;
mod s3_object_storage;
mod webp_transcoder;

pub use cap_std_upload_spool::CapStdUploadSpool;
pub use s3_object_storage::{S3ObjectStorage, S3Settings};
pub use webp_transcoder::WebpTranscoder;
