mod file_processor;
mod types;

pub use file_processor::{FileProcessor, DOCUMENT_EXTENSIONS};
pub use types::{DocumentForm, DocumentRequest, DocumentUpload, LocalFile, UploadStatus};
