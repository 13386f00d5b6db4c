use super::state::{AuthPhase, FilePanel, Tab};
use super::DropboxUploader;
use crate::structure::{TreeAction, DOWNLOAD_FILE_NAME, ROOT_ID};
use crate::upload::{FileProcessor, UploadStatus, DOCUMENT_EXTENSIONS};
use crate::utils::color::{status_color, DROPBOX_BLUE, ERROR_RED, MUTED_GRAY};
use crate::utils::file_size::format_size;
use eframe::egui::{self, Color32, RichText};
use rfd::FileDialog;
use std::path::Path;

const JSON_EXTENSIONS: &[&str] = &["json"];

const EXAMPLE_STRUCTURE: &str = r#"{
  "name": "Root Folder",
  "folders": [
    { "name": "Subfolder1", "folders": [] },
    {
      "name": "Subfolder2",
      "folders": [{ "name": "NestedFolder", "folders": [] }]
    }
  ]
}"#;

impl DropboxUploader {
    pub fn render(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical()
                .auto_shrink([false; 2])
                .show(ui, |ui| {
                    ui.add_space(16.0);
                    ui.vertical_centered(|ui| {
                        ui.heading(RichText::new("Dropbox File Manager").color(DROPBOX_BLUE));
                    });
                    ui.add_space(12.0);

                    match &self.state.auth {
                        AuthPhase::Checking => {
                            ui.vertical_centered(|ui| {
                                ui.spinner();
                                ui.label("Checking session...");
                            });
                        }
                        AuthPhase::LoggedOut(_) => self.render_login(ui),
                        AuthPhase::Authenticated(user) => {
                            if let Some(user) = user {
                                ui.group(|ui| {
                                    ui.label(RichText::new(user.name.as_str()).strong());
                                    ui.label(
                                        RichText::new(user.email.as_str())
                                            .color(ui.visuals().text_color().gamma_multiply(0.7)),
                                    );
                                });
                                ui.add_space(10.0);
                            }
                            self.render_main(ui);
                        }
                    }
                    ui.add_space(20.0);
                });
        });
    }

    fn render_login(&mut self, ui: &mut egui::Ui) {
        let mut connect = false;
        let mut open_browser = false;
        let mut submit = false;

        let Some(login) = self.state.login_mut() else {
            return;
        };

        ui.group(|ui| {
            if !login.show_code_input {
                ui.label("To use this application you need to connect your Dropbox account.");
                ui.add_space(10.0);
                if let Some(error) = &login.error {
                    ui.colored_label(ERROR_RED, error.as_str());
                    ui.add_space(6.0);
                }
                ui.vertical_centered(|ui| {
                    if login.is_loading {
                        ui.spinner();
                    } else {
                        connect = ui
                            .add(egui::Button::new("Connect with Dropbox").min_size(egui::vec2(200.0, 36.0)))
                            .clicked();
                    }
                });
                return;
            }

            ui.label("1. Click the button to open Dropbox in your browser");
            ui.add_enabled_ui(login.auth_url.is_some(), |ui| {
                open_browser = ui.button("🌐 Open Dropbox").clicked();
            });
            ui.add_space(8.0);
            ui.label("2. Authorize the application and paste the code Dropbox gives you");
            ui.add_space(6.0);

            if let Some(error) = &login.error {
                ui.colored_label(ERROR_RED, error.as_str());
                ui.add_space(6.0);
            }

            ui.horizontal(|ui| {
                ui.label("Authorization code:");
                ui.add_enabled(
                    !login.is_submitting,
                    egui::TextEdit::singleline(&mut login.code).hint_text("Enter the code here"),
                );
            });
            ui.add_space(8.0);

            ui.horizontal(|ui| {
                ui.add_enabled_ui(!login.is_submitting, |ui| {
                    if ui.button("Cancel").clicked() {
                        login.show_code_input = false;
                        login.error = None;
                    }
                    let label = if login.is_submitting {
                        "Processing..."
                    } else {
                        "Confirm"
                    };
                    submit = ui.button(label).clicked();
                });
            });
        });

        if connect {
            login.show_code_input = true;
            login.error = None;
        }
        if open_browser {
            self.open_auth_url();
        }
        if submit {
            self.submit_auth_code();
        }
    }

    fn render_main(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.selectable_value(&mut self.state.tab, Tab::Document, "📄 Upload Document");
            ui.selectable_value(&mut self.state.tab, Tab::Root, "📤 Upload to Root");
            ui.selectable_value(&mut self.state.tab, Tab::Builder, "🗂 Structure Builder");
            ui.selectable_value(&mut self.state.tab, Tab::StructureFile, "📋 Structure from File");
        });
        ui.separator();
        ui.add_space(10.0);

        match self.state.tab {
            Tab::Document => self.render_document(ui),
            Tab::Root => self.render_root(ui),
            Tab::Builder => self.render_builder(ui),
            Tab::StructureFile => self.render_structure_file(ui),
        }
    }

    fn render_document(&mut self, ui: &mut egui::Ui) {
        ui.group(|ui| {
            ui.label(RichText::new("Document").strong());
            ui.horizontal(|ui| {
                if ui.button("📁 Select File").clicked() {
                    if let Some(path) = FileDialog::new()
                        .add_filter("PDF or Word", &DOCUMENT_EXTENSIONS)
                        .pick_file()
                    {
                        self.state.document.file = Some(path);
                        self.state.document_status = None;
                    }
                }
                if self.state.document.file.is_some() && ui.button("✖").clicked() {
                    self.state.document.file = None;
                }
            });
            if let Some(path) = &self.state.document.file {
                file_card(ui, path);
                if !FileProcessor::is_supported_document(path) {
                    ui.colored_label(ERROR_RED, "Only PDF and Word documents are accepted");
                }
            }

            if self.state.document.file.is_some() {
                ui.add_space(8.0);
                egui::Grid::new("document_fields")
                    .num_columns(2)
                    .spacing([12.0, 6.0])
                    .show(ui, |ui| {
                        ui.label("Client name");
                        ui.add(
                            egui::TextEdit::singleline(&mut self.state.document.client_name)
                                .hint_text("Enter the client name"),
                        );
                        ui.end_row();

                        ui.label("Document type");
                        ui.add(
                            egui::TextEdit::singleline(&mut self.state.document.document_type)
                                .hint_text("Enter the document type"),
                        );
                        ui.end_row();

                        ui.label("Date");
                        ui.add(
                            egui::TextEdit::singleline(&mut self.state.document.date)
                                .hint_text("YYYY-MM-DD"),
                        );
                        ui.end_row();
                    });
            }
        });

        ui.add_space(10.0);
        self.render_folder_selector(ui);
        ui.add_space(10.0);

        ui.vertical_centered(|ui| {
            let can_upload = !self.state.is_uploading_document && self.state.document.is_ready();
            let label = if self.state.is_uploading_document {
                "⏳ Uploading..."
            } else {
                "📤 Upload to Dropbox"
            };
            if ui
                .add_enabled(
                    can_upload,
                    egui::Button::new(label).min_size(egui::vec2(200.0, 40.0)),
                )
                .clicked()
            {
                self.upload_document();
            }
        });

        status_banner(ui, self.state.document_status.as_ref());
    }

    fn render_folder_selector(&mut self, ui: &mut egui::Ui) {
        let mut load_more = false;
        let mut create = false;

        ui.group(|ui| {
            ui.label(RichText::new("Destination folder").strong());
            ui.add_space(4.0);

            let listing = &self.state.listing;
            if listing.is_loading && listing.folders().is_empty() {
                ui.spinner();
            }

            egui::ScrollArea::vertical()
                .id_source("folder_list")
                .max_height(220.0)
                .show(ui, |ui| {
                    for folder in listing.folders() {
                        let selected =
                            self.state.document.folder.as_deref() == Some(folder.path.as_str());
                        if ui
                            .selectable_label(selected, format!("📁 {}", folder.name))
                            .on_hover_text(folder.path.as_str())
                            .clicked()
                        {
                            self.state.document.folder = Some(folder.path.clone());
                        }
                    }
                });

            if let Some(error) = &listing.error {
                ui.colored_label(ERROR_RED, error.as_str());
            }

            if listing.has_more() {
                let label = if listing.is_loading {
                    "Loading..."
                } else {
                    "Load more folders"
                };
                load_more = ui
                    .add_enabled(!listing.is_loading, egui::Button::new(label))
                    .clicked();
            }

            ui.separator();
            if self.state.show_new_folder {
                ui.horizontal(|ui| {
                    let response = ui.add(
                        egui::TextEdit::singleline(&mut self.state.new_folder_name)
                            .hint_text("Folder name"),
                    );
                    let entered =
                        response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
                    create = ui.button("✔").clicked() || entered;
                    if ui.button("✖").clicked() {
                        self.state.show_new_folder = false;
                        self.state.new_folder_name.clear();
                    }
                });
            } else if ui.button("➕ Create new folder").clicked() {
                self.state.show_new_folder = true;
            }
        });

        if load_more {
            self.load_folders(true);
        }
        if create {
            self.create_folder();
        }
    }

    fn render_root(&mut self, ui: &mut egui::Ui) {
        ui.label(
            RichText::new("The file is uploaded straight to the root of your Dropbox")
                .color(MUTED_GRAY),
        );
        ui.add_space(8.0);

        let mut upload = false;
        ui.group(|ui| {
            file_picker(ui, &mut self.state.root, None);
            if self.state.root.file.is_some() {
                ui.add_space(8.0);
                let label = if self.state.root.is_uploading {
                    "⏳ Uploading..."
                } else {
                    "📤 Upload to Root"
                };
                upload = ui
                    .add_enabled(!self.state.root.is_uploading, egui::Button::new(label))
                    .clicked();
            }
        });
        if upload {
            self.upload_to_root();
        }

        status_banner(ui, self.state.root.status.as_ref());
    }

    fn render_builder(&mut self, ui: &mut egui::Ui) {
        ui.group(|ui| {
            ui.set_min_width(ui.available_width());
            let actions = self.state.tree_view.show(ui, self.state.builder.tree());
            self.state.apply_tree_actions(actions);
            if !self.state.builder.has_folders() {
                ui.add_space(6.0);
                ui.label(RichText::new("Click ➕ to add folders").color(MUTED_GRAY));
            }
        });
        ui.add_space(10.0);

        let has_folders = self.state.builder.has_folders();
        let is_creating = self.state.builder.is_creating;
        let mut create = false;

        ui.horizontal_wrapped(|ui| {
            if ui.button("➕ Add Folder").clicked() {
                self.state
                    .apply_tree_actions(vec![TreeAction::AddSubfolder(ROOT_ID.to_string())]);
            }

            if ui
                .add_enabled(has_folders, egui::Button::new("💾 Download JSON"))
                .clicked()
            {
                if let Some(path) = FileDialog::new()
                    .add_filter("JSON", JSON_EXTENSIONS)
                    .set_file_name(DOWNLOAD_FILE_NAME)
                    .save_file()
                {
                    if let Err(e) = self.state.builder.download(&path) {
                        tracing::warn!(error = %e, "Failed to save structure");
                        self.state.builder.status = Some(UploadStatus::failure(format!(
                            "Could not save the file: {}",
                            e
                        )));
                    }
                }
            }

            let label = if is_creating {
                "⏳ Creating..."
            } else {
                "☁ Create in Dropbox"
            };
            create = ui
                .add_enabled(has_folders && !is_creating, egui::Button::new(label))
                .clicked();

            if ui.button("🗑 Clear All").clicked() {
                self.state.reset_builder();
            }
        });

        if create {
            self.create_structure();
        }

        status_banner(ui, self.state.builder.status.as_ref());

        ui.add_space(10.0);
        ui.collapsing("How to use", |ui| {
            ui.label("• Use ➕ to add subfolders");
            ui.label("• Double-click a name to rename it");
            ui.label("• Use 🗑 to delete a folder and everything inside it");
            ui.label("• Download the JSON or create the folders directly in Dropbox");
        });
    }

    fn render_structure_file(&mut self, ui: &mut egui::Ui) {
        let mut upload = false;
        ui.group(|ui| {
            file_picker(ui, &mut self.state.structure_file, Some(("JSON", JSON_EXTENSIONS)));
            if self.state.structure_file.file.is_some() {
                ui.add_space(8.0);
                let label = if self.state.structure_file.is_uploading {
                    "⏳ Creating structure..."
                } else {
                    "☁ Create Structure in Dropbox"
                };
                upload = ui
                    .add_enabled(
                        !self.state.structure_file.is_uploading,
                        egui::Button::new(label),
                    )
                    .clicked();
            }
        });
        if upload {
            self.upload_structure_file();
        }

        status_banner(ui, self.state.structure_file.status.as_ref());

        ui.add_space(10.0);
        ui.collapsing("Expected JSON format", |ui| {
            ui.code(EXAMPLE_STRUCTURE);
        });
    }
}

fn file_card(ui: &mut egui::Ui, path: &Path) {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();
    let size = std::fs::metadata(path)
        .map(|m| format_size(m.len()))
        .unwrap_or_default();
    ui.horizontal(|ui| {
        ui.label("📄");
        ui.label(RichText::new(name).strong());
        ui.label(RichText::new(size).color(MUTED_GRAY));
    });
}

fn file_picker(ui: &mut egui::Ui, panel: &mut FilePanel, filter: Option<(&str, &[&str])>) {
    ui.horizontal(|ui| {
        if ui.button("📁 Select File").clicked() {
            let dialog = match filter {
                Some((name, extensions)) => FileDialog::new().add_filter(name, extensions),
                None => FileDialog::new(),
            };
            if let Some(path) = dialog.pick_file() {
                panel.select(Some(path));
            }
        }
        if panel.file.is_some() && !panel.is_uploading && ui.button("✖").clicked() {
            panel.select(None);
        }
    });
    if let Some(path) = &panel.file {
        file_card(ui, path);
    }
}

fn status_banner(ui: &mut egui::Ui, status: Option<&UploadStatus>) {
    let Some(status) = status else {
        return;
    };
    ui.add_space(10.0);
    let color = status_color(status.success);
    egui::Frame::group(ui.style())
        .stroke(egui::Stroke::new(1.0, color))
        .fill(color.gamma_multiply(0.08))
        .show(ui, |ui| {
            ui.set_min_width(ui.available_width());
            let icon = if status.success { "✅" } else { "❌" };
            ui.colored_label(color, format!("{} {}", icon, status.message));
            if let Some(details) = &status.details {
                ui.add_space(4.0);
                ui.label(RichText::new("Created folders:").color(Color32::GRAY));
                for folder in details {
                    ui.label(format!("  • {}", folder));
                }
            }
        });
}
