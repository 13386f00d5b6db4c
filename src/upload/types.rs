use chrono::{Local, NaiveDate};
use std::path::PathBuf;

/// Outcome banner for the last operation of a panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadStatus {
    pub success: bool,
    pub message: String,
    pub details: Option<Vec<String>>,
}

impl UploadStatus {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            details: None,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: Vec<String>) -> Self {
        self.details = Some(details).filter(|d| !d.is_empty());
        self
    }
}

/// A file read into memory, ready to be sent as a multipart part.
#[derive(Debug, Clone)]
pub struct LocalFile {
    pub file_name: String,
    pub bytes: Vec<u8>,
    pub mime: &'static str,
}

/// The metadata fields of the document upload form.
#[derive(Debug, Clone)]
pub struct DocumentForm {
    pub file: Option<PathBuf>,
    pub client_name: String,
    pub document_type: String,
    pub date: String,
    pub folder: Option<String>,
}

/// A validated document form, everything the backend needs to name and
/// place the file.
#[derive(Debug, Clone)]
pub struct DocumentUpload {
    pub file: LocalFile,
    pub client_name: String,
    pub document_type: String,
    pub date: String,
    pub folder: String,
}

/// What a complete form hands to the file loader.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentRequest {
    pub path: PathBuf,
    pub client_name: String,
    pub document_type: String,
    pub date: String,
    pub folder: String,
}

pub const INCOMPLETE_FORM: &str = "Please fill in every field and select a file and a folder";

pub const INVALID_DATE: &str = "The date must be a valid YYYY-MM-DD date";

const DATE_FORMAT: &str = "%Y-%m-%d";

pub fn today() -> String {
    Local::now().format(DATE_FORMAT).to_string()
}

impl Default for DocumentForm {
    fn default() -> Self {
        Self {
            file: None,
            client_name: String::new(),
            document_type: String::new(),
            date: today(),
            folder: None,
        }
    }
}

impl DocumentForm {
    pub fn is_ready(&self) -> bool {
        self.file.is_some() && self.folder.is_some()
    }

    /// The date ends up in the remote file name, so only a calendar date
    /// in `YYYY-MM-DD` form is accepted.
    pub fn validate(&self) -> Result<DocumentRequest, String> {
        let client_name = self.client_name.trim();
        let document_type = self.document_type.trim();
        let date = self.date.trim();

        let (path, folder) = match (&self.file, &self.folder) {
            (Some(path), Some(folder))
                if !client_name.is_empty() && !document_type.is_empty() && !date.is_empty() =>
            {
                (path, folder)
            }
            _ => return Err(INCOMPLETE_FORM.to_string()),
        };

        let date = NaiveDate::parse_from_str(date, DATE_FORMAT)
            .map_err(|_| INVALID_DATE.to_string())?;

        Ok(DocumentRequest {
            path: path.clone(),
            client_name: client_name.to_string(),
            document_type: document_type.to_string(),
            date: date.format(DATE_FORMAT).to_string(),
            folder: folder.clone(),
        })
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

impl DocumentUpload {
    pub fn new(request: DocumentRequest, file: LocalFile) -> Self {
        Self {
            file,
            client_name: request.client_name,
            document_type: request.document_type,
            date: request.date,
            folder: request.folder,
        }
    }
}
