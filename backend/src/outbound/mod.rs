//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **persistence**: PostgreSQL-backed repositories using Diesel ORM
//! - **security**: Argon2 password hashing and HS256 bearer tokens
//! - **mail**: SMTP delivery of verification codes
//! - **media**: WebP transcoding, the upload spool, and S3 object storage
//!
//! Adapters are thin translators that convert between domain types and
//! infrastructure-specific representations. They contain no business logic.

pub mod mail;
pub mod media;
pub mod persistence;
pub mod security;
