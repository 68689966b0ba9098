//! Business Services
//!
//! - `ImportService` - preview / apply / single-call bookmark import
//!
//! Services coordinate between the database layer and the pure import
//! pipeline, validating requests and shaping responses.

pub mod error;
pub mod import_service;

pub use error::ImportServiceError;
pub use import_service::{
    ApplyRequest, ApplyResponse, ImportEnvelope, ImportService, LegacyImportRequest,
    LegacyImportResponse, PreviewRequest, PreviewResponse, UploadedFile,
};
