mod state;
mod tree_view;
mod ui;

use crate::api::{ApiClient, StructureResponse, UploadResponse};
use crate::error::ApiResult;
use crate::structure::StructureSpec;
use crate::upload::{DocumentRequest, DocumentUpload, FileProcessor};
use eframe::{egui, App};
use state::{ApiEvent, AppState, Command, StructureSource};
use std::future::Future;
use std::path::PathBuf;
use std::sync::mpsc as std_mpsc;
use std::sync::Arc;
use tokio::runtime::Runtime;

/// The desktop front end. Requests run on the shared runtime and report back
/// through `events`, which is drained at the start of every frame.
pub struct DropboxUploader {
    api: ApiClient,
    runtime: Arc<Runtime>,
    ctx: egui::Context,
    sender: std_mpsc::Sender<ApiEvent>,
    events: std_mpsc::Receiver<ApiEvent>,
    state: AppState,
}

impl DropboxUploader {
    pub fn new(cc: &eframe::CreationContext<'_>, api: ApiClient, runtime: Arc<Runtime>) -> Self {
        tracing::info!("Initializing Dropbox File Manager");
        let (sender, events) = std_mpsc::channel();
        let mut app = Self {
            api,
            runtime,
            ctx: cc.egui_ctx.clone(),
            sender,
            events,
            state: AppState::default(),
        };
        app.dispatch(Command::CheckAuth);
        app
    }

    fn spawn<F>(&self, task: F)
    where
        F: Future<Output = ApiEvent> + Send + 'static,
    {
        let sender = self.sender.clone();
        let ctx = self.ctx.clone();
        self.runtime.spawn(async move {
            let event = task.await;
            if sender.send(event).is_err() {
                tracing::debug!("UI closed before a response arrived");
            }
            ctx.request_repaint();
        });
    }

    fn dispatch(&mut self, command: Command) {
        let api = self.api.clone();
        match command {
            Command::CheckAuth => {
                self.spawn(async move { ApiEvent::AuthChecked(api.auth_status().await) })
            }
            Command::FetchAuthUrl => {
                self.spawn(async move { ApiEvent::AuthUrl(api.auth_url().await) })
            }
            Command::LoadFolders { continuation } => self.load_folders(continuation),
        }
    }

    pub fn load_folders(&mut self, continuation: bool) {
        // read now so the page lines up with the list it extends
        let cursor = if continuation {
            match self.state.listing.next_cursor() {
                Some(cursor) => Some(cursor.to_string()),
                None => return,
            }
        } else {
            None
        };
        let generation = self.state.listing.begin_page(continuation);
        let api = self.api.clone();
        self.spawn(async move {
            ApiEvent::FoldersLoaded {
                continuation,
                generation,
                result: api.list_folders(cursor.as_deref()).await,
            }
        });
    }

    pub fn submit_auth_code(&mut self) {
        let Some(code) = self.state.take_auth_code() else {
            return;
        };
        let api = self.api.clone();
        self.spawn(async move { ApiEvent::AuthFinished(api.finish_auth(&code).await) });
    }

    pub fn open_auth_url(&mut self) {
        let Some(login) = self.state.login_mut() else {
            return;
        };
        if let Some(url) = &login.auth_url {
            if let Err(e) = open::that(url) {
                tracing::warn!(error = %e, "Failed to open browser");
                login.error = Some(format!("Failed to open the browser: {}", e));
            }
        }
    }

    pub fn create_folder(&mut self) {
        let Some(name) = self.state.take_new_folder_name() else {
            return;
        };
        let api = self.api.clone();
        self.spawn(async move { ApiEvent::FolderCreated(api.create_folder(&name).await) });
    }

    pub fn upload_document(&mut self) {
        let Some(request) = self.state.begin_document_upload() else {
            return;
        };
        let api = self.api.clone();
        self.spawn(async move { ApiEvent::DocumentUploaded(send_document(api, request).await) });
    }

    pub fn upload_to_root(&mut self) {
        let Some(path) = self.state.begin_root_upload() else {
            return;
        };
        let api = self.api.clone();
        self.spawn(async move {
            let result = match FileProcessor::load(&path).await {
                Ok(file) => api.upload_to_root(file).await,
                Err(e) => Err(e),
            };
            ApiEvent::RootUploaded(result)
        });
    }

    pub fn create_structure(&mut self) {
        let Some(spec) = self.state.begin_builder_create() else {
            return;
        };
        let api = self.api.clone();
        self.spawn(async move {
            ApiEvent::StructureCreated {
                source: StructureSource::Builder,
                result: send_structure(api, spec).await,
            }
        });
    }

    pub fn upload_structure_file(&mut self) {
        let Some(path) = self.state.begin_structure_file_upload() else {
            return;
        };
        let api = self.api.clone();
        self.spawn(async move {
            ApiEvent::StructureCreated {
                source: StructureSource::File,
                result: send_structure_file(api, path).await,
            }
        });
    }

    pub fn update_state(&mut self) {
        while let Ok(event) = self.events.try_recv() {
            if let Some(command) = self.state.apply(event) {
                self.dispatch(command);
            }
        }
    }
}

async fn send_document(
    api: ApiClient,
    request: DocumentRequest,
) -> ApiResult<UploadResponse> {
    let file = FileProcessor::load_document(&request.path).await?;
    api.upload_document(DocumentUpload::new(request, file)).await
}

async fn send_structure(
    api: ApiClient,
    spec: StructureSpec,
) -> ApiResult<StructureResponse> {
    tracing::info!(folders = spec.folder_count(), "Creating structure from editor");
    api.create_structure(&spec).await
}

async fn send_structure_file(
    api: ApiClient,
    path: PathBuf,
) -> ApiResult<StructureResponse> {
    let (file, spec) = FileProcessor::load_structure(&path).await?;
    tracing::info!(folders = spec.folder_count(), "Creating structure from file");
    api.upload_structure_file(file).await
}

impl App for DropboxUploader {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.update_state();
        self.render(ctx);
    }
}
