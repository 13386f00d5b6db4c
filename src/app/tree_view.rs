use crate::structure::{FolderNode, TreeAction};
use crate::utils::color::{DROPBOX_BLUE, ERROR_RED, SUCCESS_GREEN};
use eframe::egui::{self, RichText};
use std::collections::HashSet;

const INDENT: f32 = 20.0;

#[derive(Debug)]
struct EditState {
    id: String,
    text: String,
    focus_requested: bool,
}

/// Interactive rendering of the structure tree.
///
/// Only view concerns live here (collapsed nodes and the inline rename
/// buffer). Edits come back as [`TreeAction`]s.
#[derive(Debug, Default)]
pub struct TreeView {
    collapsed: HashSet<String>,
    editing: Option<EditState>,
}

impl TreeView {
    pub fn reset(&mut self) {
        self.collapsed.clear();
        self.editing = None;
    }

    pub fn is_collapsed(&self, id: &str) -> bool {
        self.collapsed.contains(id)
    }

    pub fn toggle(&mut self, id: &str) {
        if !self.collapsed.remove(id) {
            self.collapsed.insert(id.to_string());
        }
    }

    /// Drops collapse flags and an open rename for ids `root` no longer has.
    pub fn retain_existing(&mut self, root: &FolderNode) {
        self.collapsed.retain(|id| root.find(id).is_some());
        if let Some(edit) = &self.editing {
            if root.find(&edit.id).is_none() {
                self.editing = None;
            }
        }
    }

    pub fn show(&mut self, ui: &mut egui::Ui, root: &FolderNode) -> Vec<TreeAction> {
        let mut actions = Vec::new();
        self.show_node(ui, root, 0, &mut actions);
        actions
    }

    fn show_node(
        &mut self,
        ui: &mut egui::Ui,
        node: &FolderNode,
        level: usize,
        actions: &mut Vec<TreeAction>,
    ) {
        let expanded = !self.is_collapsed(&node.id);

        ui.horizontal(|ui| {
            ui.add_space(level as f32 * INDENT);

            let toggle = match (node.folders.is_empty(), expanded) {
                (true, _) => " ",
                (false, true) => "▼",
                (false, false) => "▶",
            };
            if ui.small_button(toggle).clicked() && !node.folders.is_empty() {
                self.toggle(&node.id);
            }

            ui.label(RichText::new("📁").color(DROPBOX_BLUE));
            self.show_name(ui, node, actions);

            if ui
                .small_button(RichText::new("➕").color(SUCCESS_GREEN))
                .on_hover_text("Add subfolder")
                .clicked()
            {
                self.collapsed.remove(&node.id);
                actions.push(TreeAction::AddSubfolder(node.id.clone()));
            }

            if !node.is_root()
                && ui
                    .small_button(RichText::new("🗑").color(ERROR_RED))
                    .on_hover_text("Delete folder")
                    .clicked()
            {
                actions.push(TreeAction::Delete(node.id.clone()));
            }
        });

        if expanded {
            for child in &node.folders {
                self.show_node(ui, child, level + 1, actions);
            }
        }
    }

    fn show_name(&mut self, ui: &mut egui::Ui, node: &FolderNode, actions: &mut Vec<TreeAction>) {
        match &mut self.editing {
            Some(edit) if edit.id == node.id => {
                let response = ui.add(
                    egui::TextEdit::singleline(&mut edit.text).desired_width(180.0),
                );
                if !edit.focus_requested {
                    response.request_focus();
                    edit.focus_requested = true;
                }
                // Enter also drops focus from a single-line edit.
                if response.lost_focus() {
                    actions.push(TreeAction::Rename {
                        id: edit.id.clone(),
                        name: edit.text.clone(),
                    });
                    self.editing = None;
                }
            }
            _ => {
                let text = if node.is_root() {
                    RichText::new(&node.name).strong()
                } else {
                    RichText::new(&node.name)
                };
                let response = ui
                    .add(egui::Label::new(text).sense(egui::Sense::click()))
                    .on_hover_text("Double-click to rename");
                if response.double_clicked() {
                    self.editing = Some(EditState {
                        id: node.id.clone(),
                        text: node.name.clone(),
                        focus_requested: false,
                    });
                }
            }
        }
    }
}
