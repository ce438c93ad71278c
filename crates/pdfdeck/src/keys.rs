use eframe::egui::Key;

/// User actions, whether from the keyboard or the toolbar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Advance,
    Retreat,
    ToggleFullscreen,
    ExitFullscreen,
    ToggleSlideshow,
    Open,
    Quit,
}

/// Keyboard bindings. `F` matches either case; egui reports the key, not
/// the character.
pub const BINDINGS: [(Key, Command); 7] = [
    (Key::ArrowRight, Command::Advance),
    (Key::ArrowLeft, Command::Retreat),
    (Key::F, Command::ToggleFullscreen),
    (Key::Escape, Command::ExitFullscreen),
    (Key::Space, Command::ToggleSlideshow),
    (Key::O, Command::Open),
    (Key::Q, Command::Quit),
];

pub fn command_for(key: Key) -> Option<Command> {
    BINDINGS
        .iter()
        .find(|(bound, _)| *bound == key)
        .map(|(_, command)| *command)
}
