use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Id of the top-level node. User-created nodes never use it.
pub const ROOT_ID: &str = "root";
pub const DEFAULT_ROOT_NAME: &str = "Root Folder";
pub const NEW_FOLDER_NAME: &str = "New Folder";

/// A node of the folder structure being edited.
///
/// Every editing operation borrows the current tree and returns a freshly
/// built one, so a tree handed to the renderer is never mutated underneath
/// it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FolderNode {
    pub id: String,
    pub name: String,
    pub folders: Vec<FolderNode>,
}

/// The transport shape of a folder tree: names only, no ids.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructureSpec {
    pub name: String,
    #[serde(default)]
    pub folders: Vec<StructureSpec>,
}

impl Default for FolderNode {
    fn default() -> Self {
        Self::root()
    }
}

impl FolderNode {
    pub fn root() -> Self {
        Self {
            id: ROOT_ID.to_string(),
            name: DEFAULT_ROOT_NAME.to_string(),
            folders: Vec::new(),
        }
    }

    fn placeholder() -> Self {
        Self {
            id: format!("folder-{}", Uuid::new_v4()),
            name: NEW_FOLDER_NAME.to_string(),
            folders: Vec::new(),
        }
    }

    pub fn is_root(&self) -> bool {
        self.id == ROOT_ID
    }

    /// Appends a placeholder child to the node with `parent_id`.
    /// Unknown ids leave the tree as it was.
    pub fn add_subfolder(&self, parent_id: &str) -> FolderNode {
        self.with_subfolder(parent_id, &Self::placeholder())
    }

    fn with_subfolder(&self, parent_id: &str, child: &FolderNode) -> FolderNode {
        let mut folders: Vec<FolderNode> = self
            .folders
            .iter()
            .map(|folder| folder.with_subfolder(parent_id, child))
            .collect();

        if self.id == parent_id {
            folders.push(child.clone());
        }

        FolderNode {
            id: self.id.clone(),
            name: self.name.clone(),
            folders,
        }
    }

    /// Removes the node with `id` and everything below it. The root stays.
    pub fn delete_folder(&self, id: &str) -> FolderNode {
        FolderNode {
            id: self.id.clone(),
            name: self.name.clone(),
            folders: self
                .folders
                .iter()
                .filter(|folder| folder.id != id)
                .map(|folder| folder.delete_folder(id))
                .collect(),
        }
    }

    pub fn rename_folder(&self, id: &str, new_name: &str) -> FolderNode {
        FolderNode {
            id: self.id.clone(),
            name: if self.id == id {
                new_name.to_string()
            } else {
                self.name.clone()
            },
            folders: self
                .folders
                .iter()
                .map(|folder| folder.rename_folder(id, new_name))
                .collect(),
        }
    }

    pub fn serialize(&self) -> StructureSpec {
        StructureSpec {
            name: self.name.clone(),
            folders: self.folders.iter().map(FolderNode::serialize).collect(),
        }
    }

    pub fn find(&self, id: &str) -> Option<&FolderNode> {
        if self.id == id {
            return Some(self);
        }
        self.folders.iter().find_map(|folder| folder.find(id))
    }

    /// Number of nodes below this one.
    pub fn descendant_count(&self) -> usize {
        self.folders
            .iter()
            .map(|folder| 1 + folder.descendant_count())
            .sum()
    }
}

impl StructureSpec {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// Number of folders the backend would create, this one included.
    pub fn folder_count(&self) -> usize {
        1 + self
            .folders
            .iter()
            .map(StructureSpec::folder_count)
            .sum::<usize>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample() -> FolderNode {
        let tree = FolderNode::root().add_subfolder(ROOT_ID).add_subfolder(ROOT_ID);
        let first = tree.folders[0].id.clone();
        let tree = tree.add_subfolder(&first).rename_folder(&first, "Clients");
        let second = tree.folders[1].id.clone();
        tree.rename_folder(&second, "Archive")
    }

    #[test]
    fn add_then_delete_restores_serialized_form() {
        let before = sample();
        let added = before.add_subfolder(ROOT_ID);
        let new_id = added.folders.last().unwrap().id.clone();
        assert_eq!(added.folders.len(), 3);

        let after = added.delete_folder(&new_id);
        assert_eq!(after.serialize(), before.serialize());
    }

    #[test]
    fn subfolder_goes_to_the_end_of_its_parent() {
        let tree = sample();
        let parent = tree.folders[0].id.clone();
        let tree = tree.add_subfolder(&parent);

        let parent = tree.find(&parent).unwrap();
        assert_eq!(parent.folders.len(), 2);
        assert_eq!(parent.folders[1].name, NEW_FOLDER_NAME);
        assert!(parent.folders[1].id.starts_with("folder-"));
    }

    #[test]
    fn unknown_parent_is_a_noop() {
        let tree = sample();
        assert_eq!(tree.add_subfolder("folder-missing"), tree);
    }

    #[test]
    fn new_ids_are_unique() {
        let tree = FolderNode::root().add_subfolder(ROOT_ID).add_subfolder(ROOT_ID);
        assert_ne!(tree.folders[0].id, tree.folders[1].id);
        assert_ne!(tree.folders[0].id, ROOT_ID);
    }

    #[test]
    fn rename_touches_only_the_target() {
        let tree = sample();
        let target = tree.folders[0].id.clone();
        let renamed = tree.rename_folder(&target, "Customers");

        assert_eq!(renamed.folders[0].name, "Customers");
        assert_eq!(renamed.folders[0].folders, tree.folders[0].folders);
        assert_eq!(renamed.folders[1], tree.folders[1]);
        assert_eq!(renamed.name, tree.name);
        // the previous tree is untouched
        assert_eq!(tree.folders[0].name, "Clients");
    }

    #[test]
    fn rename_root_by_sentinel() {
        let renamed = sample().rename_folder(ROOT_ID, "Company");
        assert_eq!(renamed.name, "Company");
        assert_eq!(renamed.folders.len(), 2);
    }

    #[test]
    fn sibling_names_may_repeat() {
        let tree = sample();
        let second = tree.folders[1].id.clone();
        let renamed = tree.rename_folder(&second, "Clients");
        assert_eq!(renamed.folders[0].name, renamed.folders[1].name);
    }

    #[test]
    fn delete_removes_whole_subtree() {
        let tree = sample();
        let target = tree.folders[0].id.clone();
        let child = tree.folders[0].folders[0].id.clone();
        assert_eq!(tree.descendant_count(), 3);

        let pruned = tree.delete_folder(&target);
        assert_eq!(pruned.folders.len(), 1);
        assert_eq!(pruned.folders[0].name, "Archive");
        assert!(pruned.find(&child).is_none());
        assert_eq!(pruned.descendant_count(), 1);
    }

    #[test]
    fn delete_nested_node() {
        let tree = sample();
        let child = tree.folders[0].folders[0].id.clone();
        let pruned = tree.delete_folder(&child);
        assert!(pruned.folders[0].folders.is_empty());
        assert_eq!(pruned.folders.len(), 2);
    }

    #[test]
    fn delete_unknown_or_root_is_a_noop() {
        let tree = sample();
        assert_eq!(tree.delete_folder("folder-missing"), tree);
        assert_eq!(tree.delete_folder(ROOT_ID), tree);
    }

    #[test]
    fn serialize_drops_ids() {
        let json = sample().serialize().to_json().unwrap();
        assert!(!json.contains("\"id\""));
        assert!(!json.contains("folder-"));

        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "name": "Root Folder",
                "folders": [
                    {"name": "Clients", "folders": [{"name": "New Folder", "folders": []}]},
                    {"name": "Archive", "folders": []}
                ]
            })
        );
    }

    #[test]
    fn spec_without_folders_field_parses() {
        let spec = StructureSpec::from_json(
            r#"{"name": "Root", "folders": [{"name": "Sub1"}, {"name": "Sub2", "folders": [{"name": "Deep"}]}]}"#,
        )
        .unwrap();
        assert_eq!(spec.folder_count(), 4);
        assert!(spec.folders[0].folders.is_empty());
    }

    #[test]
    fn spec_requires_a_name() {
        assert!(StructureSpec::from_json(r#"{"folders": []}"#).is_err());
    }
}
