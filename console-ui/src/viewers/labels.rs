const MAX_TITLE_CHARS: usize = 40;
const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];

/// Human-readable byte count: `512 B`, `1.5 KB`, `3.0 MB`.
pub fn format_size(bytes: u64) -> String {
    if bytes < 1024 {
        return format!("{bytes} B");
    }
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    format!("{value:.1} {}", UNITS[unit])
}

/// Shorten long filenames for the title bar, counting characters not bytes.
pub fn truncate_filename(name: &str) -> String {
    if name.chars().count() <= MAX_TITLE_CHARS {
        return name.to_string();
    }
    let head: String = name.chars().take(MAX_TITLE_CHARS - 1).collect();
    format!("{head}…")
}
