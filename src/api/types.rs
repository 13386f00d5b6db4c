use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UserInfo {
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthStatus {
    pub status: String,
    pub user: Option<UserInfo>,
    pub error: Option<String>,
}

impl AuthStatus {
    pub fn is_authenticated(&self) -> bool {
        self.status == "authenticated"
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthUrlResponse {
    pub status: String,
    pub auth_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FinishAuthResponse {
    pub status: String,
    pub message: Option<String>,
}

impl FinishAuthResponse {
    pub fn succeeded(&self) -> bool {
        self.status == "success"
    }
}

/// A remote Dropbox folder as listed by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Folder {
    pub id: String,
    pub name: String,
    pub path: String,
}

/// One page of `GET /folders`. The backend omits `cursor` on the last page.
#[derive(Debug, Clone, Deserialize)]
pub struct FolderPage {
    #[serde(default)]
    pub folders: Vec<Folder>,
    #[serde(default)]
    pub cursor: Option<String>,
    #[serde(default)]
    pub has_more: bool,
}

#[derive(Serialize)]
pub(super) struct CreateFolderRequest<'a> {
    #[serde(rename = "folderName")]
    pub folder_name: &'a str,
}

#[derive(Serialize)]
pub(super) struct FinishAuthRequest<'a> {
    pub code: &'a str,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreatedFolder {
    pub message: Option<String>,
    pub path: String,
    pub id: Option<String>,
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UploadResponse {
    pub message: Option<String>,
    pub filename: Option<String>,
    pub path: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StructureResponse {
    pub message: Option<String>,
    #[serde(default)]
    pub total_folders: usize,
    #[serde(default)]
    pub created_folders: Vec<String>,
    #[serde(default)]
    pub errors: Option<Vec<String>>,
}
