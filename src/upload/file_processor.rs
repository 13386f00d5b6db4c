use crate::error::{ApiError, ApiResult};
use crate::structure::StructureSpec;
use crate::upload::types::LocalFile;
use std::path::Path;

/// Extensions accepted by the document upload form.
pub const DOCUMENT_EXTENSIONS: [&str; 3] = ["pdf", "doc", "docx"];

/// Reads files picked in the UI and checks them before they are sent.
pub struct FileProcessor;

impl FileProcessor {
    fn extension(path: &Path) -> Option<String> {
        path.extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
    }

    pub fn is_supported_document(path: &Path) -> bool {
        Self::extension(path).map_or(false, |ext| DOCUMENT_EXTENSIONS.contains(&ext.as_str()))
    }

    pub fn is_structure_file(path: &Path) -> bool {
        Self::extension(path).as_deref() == Some("json")
    }

    pub fn mime_for(path: &Path) -> &'static str {
        match Self::extension(path).as_deref() {
            Some("pdf") => "application/pdf",
            Some("doc") => "application/msword",
            Some("docx") => {
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            }
            Some("json") => "application/json",
            Some("txt") => "text/plain",
            Some("csv") => "text/csv",
            Some("png") => "image/png",
            Some("jpg") | Some("jpeg") => "image/jpeg",
            Some("zip") => "application/zip",
            _ => "application/octet-stream",
        }
    }

    fn file_name(path: &Path) -> ApiResult<String> {
        path.file_name()
            .and_then(|n| n.to_str())
            .filter(|n| !n.is_empty())
            .map(str::to_string)
            .ok_or_else(|| ApiError::Unsupported("Invalid filename".to_string()))
    }

    /// Reads any file for a root upload.
    pub async fn load(path: &Path) -> ApiResult<LocalFile> {
        let file_name = Self::file_name(path)?;
        let bytes = tokio::fs::read(path).await?;
        tracing::debug!(file = %file_name, size = bytes.len(), "Loaded file");

        Ok(LocalFile {
            file_name,
            bytes,
            mime: Self::mime_for(path),
        })
    }

    pub async fn load_document(path: &Path) -> ApiResult<LocalFile> {
        if !Self::is_supported_document(path) {
            return Err(ApiError::Unsupported(
                "Only PDF and Word documents can be uploaded".to_string(),
            ));
        }
        Self::load(path).await
    }

    /// Loads a structure descriptor and makes sure it parses before it is
    /// sent anywhere.
    pub async fn load_structure(path: &Path) -> ApiResult<(LocalFile, StructureSpec)> {
        if !Self::is_structure_file(path) {
            return Err(ApiError::Unsupported(
                "The structure file must be a JSON file".to_string(),
            ));
        }

        let file = Self::load(path).await?;
        let text = std::str::from_utf8(&file.bytes)
            .map_err(|_| ApiError::Unsupported("The JSON file is not valid UTF-8".to_string()))?;
        let spec = StructureSpec::from_json(text)?;
        Ok((file, spec))
    }
}
