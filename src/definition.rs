//! RON dialog definitions
//!
//! Pages are kept as untyped [`ron::Value`]s until the graph is built, so one broken page only
//! drops that page instead of failing the whole file.

use std::{fs, path::Path};

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::DialogError;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DialogDefinition {
    pub default_page: String,
    #[serde(default)]
    pub pages: Vec<ron::Value>,
}

impl DialogDefinition {
    pub fn from_ron_str(content: &str) -> Result<Self, DialogError> {
        Ok(ron::from_str::<Self>(content)?)
    }

    pub fn from_path(path: &Path) -> Result<Self, DialogError> {
        let content = fs::read_to_string(path)?;
        Self::from_ron_str(&content)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageRecord {
    pub key: String,
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub sound: SoundRecord,
    pub buttons: Vec<ButtonRecord>,
    #[serde(default)]
    pub close: CloseRecord,
    #[serde(default, deserialize_with = "present")]
    pub scroll_speed: Option<u32>,
}

impl PageRecord {
    pub fn from_value(value: ron::Value) -> Result<Self, String> {
        value.into_rust::<Self>().map_err(|error| error.to_string())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ButtonRecord {
    pub text: String,
    #[serde(default, deserialize_with = "present")]
    pub action: Option<String>,
    #[serde(default, deserialize_with = "present")]
    pub go: Option<String>,
    #[serde(default, deserialize_with = "present")]
    pub cmd: Option<Vec<String>>,
    #[serde(default)]
    pub sound: SoundRecord,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SoundRecord {
    pub enable: bool,
    pub identifier: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CloseRecord {
    #[serde(default, deserialize_with = "present")]
    pub go: Option<String>,
}

/// Best-effort `key` of a page record, for error messages about records that failed to parse.
pub fn record_key(value: &ron::Value) -> Option<String> {
    let ron::Value::Map(map) = value else {
        return None;
    };
    match map.get(&ron::Value::String("key".to_string())) {
        Some(ron::Value::String(key)) => Some(key.clone()),
        _ => None,
    }
}

// Untyped pages lose RON's `Some(..)` wrapping, so a written field simply means `Some`.
fn present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}
