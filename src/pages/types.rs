use crate::definition::SoundRecord;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SoundRef {
    pub enabled: bool,
    pub identifier: String,
}

impl SoundRef {
    pub fn new(identifier: impl Into<String>) -> Self {
        Self {
            enabled: true,
            identifier: identifier.into(),
        }
    }

    pub fn is_playable(&self) -> bool {
        self.enabled && !self.identifier.is_empty()
    }
}

impl From<SoundRecord> for SoundRef {
    fn from(record: SoundRecord) -> Self {
        Self {
            enabled: record.enable,
            identifier: record.identifier,
        }
    }
}
