use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};
use tracing::warn;

pub const SETTINGS_PATH: &str = "settings/dialog.ron";

/// Skin sent with every dialog: scales the host's portrait so it fits the dialog frame.
pub const DEFAULT_SKIN_DATA: &str = r#"{"picker_offsets":{"scale":[1.75,1.75,1.75],"translate":[0,0,0]},"portrait_offsets":{"scale":[1.75,1.75,1.75],"translate":[0,-50,0]}}"#;

#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DialogSettings {
    /// Ticks before a switched game mode is restored and presentation hooks fire.
    pub shim_delay_ticks: u32,
    /// Ticks between a click and the commands it triggers.
    pub command_delay_ticks: u32,
    pub scroll_speed_ticks: u32,
    pub ticks_per_second: f64,
    pub skin_data: String,
}

impl Default for DialogSettings {
    fn default() -> Self {
        Self {
            shim_delay_ticks: 5,
            command_delay_ticks: 10,
            scroll_speed_ticks: 2,
            ticks_per_second: 20.0,
            skin_data: DEFAULT_SKIN_DATA.to_string(),
        }
    }
}

impl DialogSettings {
    /// Reads [`SETTINGS_PATH`], falling back to defaults when it is missing or broken.
    pub fn load_or_default() -> Self {
        Self::load_from(Path::new(SETTINGS_PATH)).unwrap_or_else(|error| {
            warn!("{error}");
            Self::default()
        })
    }

    pub fn load_from(path: &Path) -> Result<Self, String> {
        let Some(content) = read_settings_source(path)? else {
            return Ok(Self::default());
        };

        Self::from_ron(&content).map_err(|error| {
            format!(
                "failed to parse '{}' as dialog settings RON: {}",
                path.display(),
                error
            )
        })
    }

    pub fn from_ron(content: &str) -> Result<Self, ron::error::SpannedError> {
        ron::from_str::<Self>(content)
    }
}

fn read_settings_source(path: &Path) -> Result<Option<String>, String> {
    if !path.exists() {
        return Ok(None);
    }

    fs::read_to_string(path)
        .map(Some)
        .map_err(|error| format!("failed to read '{}': {}", path.display(), error))
}
