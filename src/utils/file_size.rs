const KIB: f64 = 1024.0;
const MIB: f64 = KIB * 1024.0;

/// Human-readable size for the selected-file card.
pub fn format_size(bytes: u64) -> String {
    let size = bytes as f64;
    if size < KIB {
        format!("{} B", bytes)
    } else if size < MIB {
        format!("{:.2} KB", size / KIB)
    } else {
        format!("{:.2} MB", size / MIB)
    }
}
