use eframe::egui::Color32;

pub const DROPBOX_BLUE: Color32 = Color32::from_rgb(0, 97, 254);
pub const SUCCESS_GREEN: Color32 = Color32::from_rgb(0, 150, 60);
pub const ERROR_RED: Color32 = Color32::from_rgb(220, 50, 50);
pub const MUTED_GRAY: Color32 = Color32::from_rgb(150, 150, 150);

/// Banner colour for an operation outcome.
pub fn status_color(success: bool) -> Color32 {
    if success {
        SUCCESS_GREEN
    } else {
        ERROR_RED
    }
}
