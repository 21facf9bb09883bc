//! Custom extractors for Axum handlers.
//!
//! Both extractors reject with [`AppError`](crate::errors::AppError) so every
//! malformed request is answered with the same JSON error body.

pub mod object_id_path;
pub mod validated_json;

pub use object_id_path::{ObjectIdPath, parse_object_id};
pub use validated_json::ValidatedJson;
