mod builder;
mod tree;

pub use builder::{StructureBuilder, TreeAction, DOWNLOAD_FILE_NAME};
pub use tree::{FolderNode, StructureSpec, ROOT_ID};
