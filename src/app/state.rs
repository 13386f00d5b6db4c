use super::tree_view::TreeView;
use crate::api::{
    AuthStatus, AuthUrlResponse, CreatedFolder, FinishAuthResponse, FolderPage,
    StructureResponse, UploadResponse, UserInfo,
};
use crate::error::ApiResult;
use crate::folders::FolderListing;
use crate::structure::{StructureBuilder, StructureSpec, TreeAction};
use crate::upload::{DocumentForm, DocumentRequest, UploadStatus};
use std::path::PathBuf;

/// Which structure upload a response belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StructureSource {
    Builder,
    File,
}

/// Results sent back from background requests.
#[derive(Debug)]
pub enum ApiEvent {
    AuthChecked(ApiResult<AuthStatus>),
    AuthUrl(ApiResult<AuthUrlResponse>),
    AuthFinished(ApiResult<FinishAuthResponse>),
    FoldersLoaded {
        continuation: bool,
        generation: u64,
        result: ApiResult<FolderPage>,
    },
    FolderCreated(ApiResult<CreatedFolder>),
    DocumentUploaded(ApiResult<UploadResponse>),
    RootUploaded(ApiResult<UploadResponse>),
    StructureCreated {
        source: StructureSource,
        result: ApiResult<StructureResponse>,
    },
}

/// Follow-up requests an event asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    CheckAuth,
    FetchAuthUrl,
    LoadFolders { continuation: bool },
}

#[derive(Debug, Default)]
pub struct LoginState {
    pub auth_url: Option<String>,
    pub show_code_input: bool,
    pub code: String,
    pub error: Option<String>,
    pub is_loading: bool,
    pub is_submitting: bool,
}

#[derive(Debug)]
pub enum AuthPhase {
    Checking,
    LoggedOut(LoginState),
    Authenticated(Option<UserInfo>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Document,
    Root,
    Builder,
    StructureFile,
}

/// A single-file picker with its own status banner.
#[derive(Debug, Default)]
pub struct FilePanel {
    pub file: Option<PathBuf>,
    pub status: Option<UploadStatus>,
    pub is_uploading: bool,
}

impl FilePanel {
    pub fn select(&mut self, file: Option<PathBuf>) {
        self.file = file;
        self.status = None;
    }
}

pub const DOCUMENT_UPLOADED: &str = "File uploaded to Dropbox";
pub const LOGIN_UNREACHABLE: &str = "Could not connect to the server. Please try again.";
pub const MISSING_CODE: &str = "Please enter the authorization code";
pub const INVALID_CODE: &str = "Invalid code. Please try again.";
pub const SESSION_NOT_VERIFIED: &str = "Could not verify the session. Please try again.";
pub const MISSING_STRUCTURE_FILE: &str = "Please select a JSON file";

pub struct AppState {
    pub auth: AuthPhase,
    pub tab: Tab,
    pub listing: FolderListing,
    pub show_new_folder: bool,
    pub new_folder_name: String,
    pub document: DocumentForm,
    pub document_status: Option<UploadStatus>,
    pub is_uploading_document: bool,
    pub root: FilePanel,
    pub structure_file: FilePanel,
    pub builder: StructureBuilder,
    pub tree_view: TreeView,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            auth: AuthPhase::Checking,
            tab: Tab::Document,
            listing: FolderListing::default(),
            show_new_folder: false,
            new_folder_name: String::new(),
            document: DocumentForm::default(),
            document_status: None,
            is_uploading_document: false,
            root: FilePanel::default(),
            structure_file: FilePanel::default(),
            builder: StructureBuilder::default(),
            tree_view: TreeView::default(),
        }
    }
}

impl AppState {
    pub fn login_mut(&mut self) -> Option<&mut LoginState> {
        match &mut self.auth {
            AuthPhase::LoggedOut(login) => Some(login),
            _ => None,
        }
    }

    /// Validates the pasted code and marks the login form busy.
    pub fn take_auth_code(&mut self) -> Option<String> {
        let login = self.login_mut()?;
        let code = login.code.trim().to_string();
        if code.is_empty() {
            login.error = Some(MISSING_CODE.to_string());
            return None;
        }
        login.error = None;
        login.is_submitting = true;
        Some(code)
    }

    pub fn take_new_folder_name(&mut self) -> Option<String> {
        let name = self.new_folder_name.trim().to_string();
        if name.is_empty() {
            return None;
        }
        self.listing.begin_load();
        Some(name)
    }

    pub fn begin_document_upload(&mut self) -> Option<DocumentRequest> {
        match self.document.validate() {
            Ok(request) => {
                self.is_uploading_document = true;
                self.document_status = None;
                Some(request)
            }
            Err(message) => {
                self.document_status = Some(UploadStatus::failure(message));
                None
            }
        }
    }

    pub fn begin_root_upload(&mut self) -> Option<PathBuf> {
        let path = self.root.file.clone()?;
        self.root.is_uploading = true;
        self.root.status = None;
        Some(path)
    }

    pub fn begin_structure_file_upload(&mut self) -> Option<PathBuf> {
        match self.structure_file.file.clone() {
            Some(path) => {
                self.structure_file.is_uploading = true;
                self.structure_file.status = None;
                Some(path)
            }
            None => {
                self.structure_file.status = Some(UploadStatus::failure(MISSING_STRUCTURE_FILE));
                None
            }
        }
    }

    pub fn begin_builder_create(&mut self) -> Option<StructureSpec> {
        if !self.builder.has_folders() || self.builder.is_creating {
            return None;
        }
        self.builder.is_creating = true;
        self.builder.status = None;
        Some(self.builder.spec())
    }

    /// Applies edits collected while drawing the tree, then forgets view
    /// state for folders that no longer exist.
    pub fn apply_tree_actions(&mut self, actions: Vec<TreeAction>) {
        if actions.is_empty() {
            return;
        }
        for action in actions {
            self.builder.apply(action);
        }
        self.tree_view.retain_existing(self.builder.tree());
    }

    pub fn reset_builder(&mut self) {
        self.builder.reset();
        self.tree_view.reset();
    }

    /// Folds a finished request into the view state.
    pub fn apply(&mut self, event: ApiEvent) -> Option<Command> {
        match event {
            ApiEvent::AuthChecked(Ok(status)) if status.is_authenticated() => {
                tracing::info!(user = ?status.user.as_ref().map(|u| &u.email), "Session active");
                self.auth = AuthPhase::Authenticated(status.user);
                Some(Command::LoadFolders {
                    continuation: false,
                })
            }
            ApiEvent::AuthChecked(result) => {
                match &result {
                    Ok(status) => {
                        tracing::info!(status = %status.status, reason = ?status.error, "Not authenticated")
                    }
                    Err(e) => tracing::warn!(error = %e, "Could not verify session"),
                }
                if let Some(login) = self.login_mut() {
                    login.is_submitting = false;
                    login.error = Some(SESSION_NOT_VERIFIED.to_string());
                    return None;
                }
                self.auth = AuthPhase::LoggedOut(LoginState {
                    is_loading: true,
                    ..LoginState::default()
                });
                Some(Command::FetchAuthUrl)
            }
            ApiEvent::AuthUrl(result) => {
                let login = self.login_mut()?;
                login.is_loading = false;
                match result {
                    Ok(response) if response.status == "authenticated" => {
                        return Some(Command::CheckAuth);
                    }
                    Ok(response) => login.auth_url = response.auth_url,
                    Err(e) => {
                        tracing::warn!(error = %e, "Could not fetch authorization URL");
                        login.error = Some(LOGIN_UNREACHABLE.to_string());
                    }
                }
                None
            }
            ApiEvent::AuthFinished(result) => {
                let login = self.login_mut()?;
                match result {
                    Ok(response) if response.succeeded() => return Some(Command::CheckAuth),
                    Ok(response) => {
                        tracing::warn!(message = ?response.message, "Authorization code rejected");
                        login.error = Some(INVALID_CODE.to_string());
                    }
                    Err(e) => login.error = Some(format!("Error processing the code: {}", e)),
                }
                login.is_submitting = false;
                None
            }
            ApiEvent::FoldersLoaded {
                continuation,
                generation,
                result,
            } => {
                match result {
                    Ok(page) => self.listing.apply_page(page, continuation, generation),
                    Err(e) => self.listing.apply_failure(&e, generation),
                }
                None
            }
            ApiEvent::FolderCreated(Ok(created)) => {
                tracing::info!(
                    name = %created.name,
                    path = %created.path,
                    id = ?created.id,
                    message = ?created.message,
                    "Folder created"
                );
                self.new_folder_name.clear();
                self.show_new_folder = false;
                Some(Command::LoadFolders {
                    continuation: false,
                })
            }
            ApiEvent::FolderCreated(Err(e)) => {
                tracing::warn!(error = %e, "Folder creation failed");
                self.listing.is_loading = false;
                self.listing.error = Some(format!("Could not create the folder: {}", e));
                None
            }
            ApiEvent::DocumentUploaded(result) => {
                self.is_uploading_document = false;
                let status = match result {
                    Ok(response) => {
                        self.document.reset();
                        UploadStatus::success(
                            response
                                .message
                                .unwrap_or_else(|| DOCUMENT_UPLOADED.to_string()),
                        )
                    }
                    Err(e) => UploadStatus::failure(format!("Error uploading file: {}", e)),
                };
                self.document_status = Some(status);
                None
            }
            ApiEvent::RootUploaded(result) => {
                self.root.is_uploading = false;
                let status = match result {
                    Ok(response) => {
                        tracing::info!(path = ?response.path, "Uploaded to root");
                        let picked = self.root.file.take();
                        let name = response
                            .filename
                            .or_else(|| {
                                picked
                                    .as_deref()
                                    .and_then(|p| p.file_name())
                                    .map(|n| n.to_string_lossy().to_string())
                            })
                            .unwrap_or_default();
                        UploadStatus::success(format!(
                            "File \"{}\" uploaded to the root folder",
                            name
                        ))
                    }
                    Err(e) => UploadStatus::failure(e.to_string()),
                };
                self.root.status = Some(status);
                None
            }
            ApiEvent::StructureCreated { source, result } => {
                let status = match result {
                    Ok(response) => {
                        if let Some(errors) = response.errors.as_ref().filter(|e| !e.is_empty()) {
                            tracing::warn!(?errors, "Some folders were not created");
                        }
                        let message = response.message.unwrap_or_else(|| {
                            format!("Structure created: {} folders", response.total_folders)
                        });
                        UploadStatus::success(message).with_details(response.created_folders)
                    }
                    Err(e) => UploadStatus::failure(format!("Error creating structure: {}", e)),
                };

                match source {
                    StructureSource::Builder => {
                        self.builder.is_creating = false;
                        self.builder.status = Some(status);
                    }
                    StructureSource::File => {
                        if status.success {
                            self.structure_file.file = None;
                        }
                        self.structure_file.is_uploading = false;
                        self.structure_file.status = Some(status);
                    }
                }
                None
            }
        }
    }
}
