pub mod bulk_upload;

pub use bulk_upload::{BulkUploadCommand, BulkUploadError, BulkUploadResponse};
