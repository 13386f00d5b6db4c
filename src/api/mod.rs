mod client;
mod types;

pub use client::ApiClient;
pub use types::{
    AuthStatus, AuthUrlResponse, CreatedFolder, FinishAuthResponse, Folder, FolderPage,
    StructureResponse, UploadResponse, UserInfo,
};
