use super::tree::{FolderNode, StructureSpec};
use crate::error::ApiResult;
use crate::upload::UploadStatus;
use std::fs;
use std::path::Path;

pub const DOWNLOAD_FILE_NAME: &str = "folder-structure.json";

/// An edit requested from the tree view. Rendering collects these and the
/// builder applies them once the frame's borrows are released.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeAction {
    AddSubfolder(String),
    Delete(String),
    Rename { id: String, name: String },
}

/// Editor state behind the structure builder panel.
#[derive(Debug, Default)]
pub struct StructureBuilder {
    tree: FolderNode,
    pub status: Option<UploadStatus>,
    pub is_creating: bool,
}

impl StructureBuilder {
    pub fn tree(&self) -> &FolderNode {
        &self.tree
    }

    pub fn has_folders(&self) -> bool {
        !self.tree.folders.is_empty()
    }

    pub fn apply(&mut self, action: TreeAction) {
        self.tree = match action {
            TreeAction::AddSubfolder(parent_id) => self.tree.add_subfolder(&parent_id),
            TreeAction::Delete(id) => {
                if let Some(node) = self.tree.find(&id) {
                    tracing::debug!(
                        folder = %node.name,
                        removed = 1 + node.descendant_count(),
                        "Deleting folder"
                    );
                }
                self.tree.delete_folder(&id)
            }
            TreeAction::Rename { id, name } => {
                let name = name.trim();
                let unchanged = self.tree.find(&id).map_or(true, |node| node.name == name);
                if name.is_empty() || unchanged {
                    return;
                }
                self.tree.rename_folder(&id, name)
            }
        };
    }

    pub fn reset(&mut self) {
        tracing::info!("Resetting folder structure");
        *self = Self::default();
    }

    pub fn spec(&self) -> StructureSpec {
        self.tree.serialize()
    }

    /// Writes the structure as pretty JSON to `path`.
    pub fn download(&self, path: &Path) -> ApiResult<()> {
        let json = self.spec().to_json()?;
        fs::write(path, json)?;
        tracing::info!(path = %path.display(), "Saved folder structure");
        Ok(())
    }
}
