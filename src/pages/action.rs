use crate::definition::ButtonRecord;

use super::types::SoundRef;

/// What a button does when clicked. Decided once when the button is built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ButtonAction {
    /// Free-form `action` value with no built-in meaning.
    Generic(String),
    Close,
    Goto(String),
    RunCommand(Vec<String>),
}

impl ButtonAction {
    /// Classifies a raw `action` field. `close` in any case means [`ButtonAction::Close`].
    pub fn from_raw(raw: &str) -> Self {
        if raw.eq_ignore_ascii_case("close") {
            Self::Close
        } else {
            Self::Generic(raw.to_string())
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Button {
    pub text: String,
    pub actions: Vec<ButtonAction>,
    pub sound: SoundRef,
}

impl Button {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            actions: vec![ButtonAction::Close],
            sound: SoundRef::default(),
        }
    }
}

impl From<ButtonRecord> for Button {
    fn from(record: ButtonRecord) -> Self {
        let mut actions = Vec::new();
        if let Some(raw) = record.action {
            actions.push(ButtonAction::from_raw(&raw));
        }
        if let Some(target) = record.go {
            actions.push(ButtonAction::Goto(target));
        }
        if let Some(lines) = record.cmd {
            actions.push(ButtonAction::RunCommand(lines));
        }
        if actions.is_empty() {
            actions.push(ButtonAction::Close);
        }

        Self {
            text: record.text,
            actions,
            sound: record.sound.into(),
        }
    }
}
