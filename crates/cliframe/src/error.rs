use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Errors raised while reading options or dispatching a command.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Option '{0}' not found")]
    OptionNotFound(String),

    #[error("Missing required option '{0}'")]
    MissingRequiredOption(String),

    #[error("Option '{name}' cannot be converted to {expected}")]
    BadOptionType { name: String, expected: &'static str },

    #[error("Command '{0}' not found")]
    CommandNotFound(String),

    #[error("Command '{0}' has no handler")]
    CommandHasNotHandler(String),

    /// A handler failed with an error that is not one of the above.
    #[error(transparent)]
    Handler(anyhow::Error),

    /// Writing help or version text failed.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Discriminant of [`Error`] for matching without the payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    OptionNotFound,
    MissingRequiredOption,
    BadOptionType,
    CommandNotFound,
    CommandHasNotHandler,
    Handler,
    Io,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::OptionNotFound(_) => ErrorKind::OptionNotFound,
            Self::MissingRequiredOption(_) => ErrorKind::MissingRequiredOption,
            Self::BadOptionType { .. } => ErrorKind::BadOptionType,
            Self::CommandNotFound(_) => ErrorKind::CommandNotFound,
            Self::CommandHasNotHandler(_) => ErrorKind::CommandHasNotHandler,
            Self::Handler(_) => ErrorKind::Handler,
            Self::Io(_) => ErrorKind::Io,
        }
    }

    /// Whether the defaulted accessor may absorb this error.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::MissingRequiredOption(_) | Self::BadOptionType { .. }
        )
    }

    pub(crate) fn bad_type(name: &str, expected: &'static str) -> Self {
        Self::BadOptionType {
            name: name.to_string(),
            expected,
        }
    }

    /// Recover a framework error from a handler failure, wrapping anything else.
    pub(crate) fn from_handler(err: anyhow::Error) -> Self {
        match err.downcast::<Error>() {
            Ok(err) => err,
            Err(other) => Self::Handler(other),
        }
    }
}
