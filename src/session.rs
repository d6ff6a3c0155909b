//! the two parties of a dialog: the remote session looking at it and the host entity showing it

use std::{collections::BTreeMap, fmt, sync::Arc};

/// Per-host key/value configuration that templates and commands are resolved against.
pub type HostConfig = BTreeMap<String, String>;

pub type SessionRef = Arc<dyn DialogSession>;
pub type HostRef = Arc<dyn DialogHost>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum GameMode {
    #[default]
    Survival,
    Creative,
    Adventure,
    Spectator,
}

impl GameMode {
    /// Mode to switch to while a dialog is shown, if this one can't render dialogs.
    ///
    /// Creative clients open the (unimplemented) editing screen instead of the dialog.
    pub const fn dialog_fallback(self) -> Option<GameMode> {
        match self {
            Self::Creative => Some(Self::Adventure),
            _ => None,
        }
    }
}

impl fmt::Display for GameMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Survival => "survival",
            Self::Creative => "creative",
            Self::Adventure => "adventure",
            Self::Spectator => "spectator",
        };
        f.write_str(label)
    }
}

pub trait DialogSession: Send + Sync {
    fn name(&self) -> String;
    fn game_mode(&self) -> GameMode;
    fn set_game_mode(&self, mode: GameMode);
    fn play_sound(&self, identifier: &str);
}

pub trait DialogHost: Send + Sync {
    fn name(&self) -> String;
    fn config(&self) -> &HostConfig;
    fn name_tag(&self) -> String;
    fn set_name_tag(&self, tag: &str);
}
