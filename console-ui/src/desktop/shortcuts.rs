/// Keyboard shortcuts understood by preview windows.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Shortcut {
    ZoomIn,
    ZoomOut,
    Rotate,
    Download,
    Close,
}

/// Map a `KeyboardEvent.key` value plus the Ctrl/Cmd state to a shortcut.
pub fn shortcut_for(key: &str, command: bool) -> Option<Shortcut> {
    match key {
        "Escape" => Some(Shortcut::Close),
        "+" | "=" if command => Some(Shortcut::ZoomIn),
        "-" if command => Some(Shortcut::ZoomOut),
        "r" | "R" if command => Some(Shortcut::Rotate),
        "d" | "D" if command => Some(Shortcut::Download),
        _ => None,
    }
}

pub fn shortcut_hint(shortcut: Shortcut) -> &'static str {
    match shortcut {
        Shortcut::ZoomIn => "Ctrl + +",
        Shortcut::ZoomOut => "Ctrl + -",
        Shortcut::Rotate => "Ctrl + R",
        Shortcut::Download => "Ctrl + D",
        Shortcut::Close => "Esc",
    }
}
