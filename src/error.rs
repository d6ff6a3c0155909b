use std::fmt;

#[derive(Debug)]
pub enum DialogError {
    Io(std::io::Error),
    Ron(ron::error::SpannedError),
    /// A single page record could not be built. The loader logs and skips it.
    InvalidPage {
        graph: String,
        key: Option<String>,
        reason: String,
    },
    /// The configured entry page is not among the loaded pages.
    MissingDefaultPage { graph: String, key: String },
    MissingPage { graph: String, key: String },
    GraphDropped { page: String },
    CursorOutOfRange { cursor: usize, len: usize },
}

impl fmt::Display for DialogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(error) => write!(f, "failed to read dialog definition: {error}"),
            Self::Ron(error) => write!(f, "failed to parse dialog RON: {error}"),
            Self::InvalidPage { graph, key, reason } => write!(
                f,
                "invalid page '{}.{}': {reason}",
                graph,
                key.as_deref().unwrap_or("?")
            ),
            Self::MissingDefaultPage { graph, key } => {
                write!(f, "default page '{key}' not found in dialog '{graph}'")
            }
            Self::MissingPage { graph, key } => {
                write!(f, "page '{key}' not found in dialog '{graph}'")
            }
            Self::GraphDropped { page } => {
                write!(f, "dialog owning page '{page}' is no longer loaded")
            }
            Self::CursorOutOfRange { cursor, len } => write!(
                f,
                "cursor {cursor} cannot be bigger than the text length {len}"
            ),
        }
    }
}

impl std::error::Error for DialogError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(error) => Some(error),
            Self::Ron(error) => Some(error),
            _ => None,
        }
    }
}

impl From<std::io::Error> for DialogError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<ron::error::SpannedError> for DialogError {
    fn from(value: ron::error::SpannedError) -> Self {
        Self::Ron(value)
    }
}
