use serde::{Deserialize, Serialize};

pub type Error = anyhow::Error;
pub type Result<T> = std::result::Result<T, Error>;

/// Classifies an error that is returned from a public command so that callers (e.g. `main`) can
/// decide how to report it without string matching.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorType {
    /// The home directory or `config.json` could not be created or loaded.
    Config,
    /// A backend failed to read or write transaction data.
    Storage,
    /// The user supplied something we cannot act on (bad id, empty text, zero amount).
    Input,
}

serde_plain::derive_display_from_serialize!(ErrorType);
serde_plain::derive_fromstr_from_deserialize!(ErrorType);

impl ErrorType {
    /// The process exit code used when a command fails with this type of error.
    pub fn exit_code(&self) -> u8 {
        match self {
            ErrorType::Input => 2,
            ErrorType::Config | ErrorType::Storage => 1,
        }
    }
}

/// Tags the error of a `Result` with an `ErrorType`. The tag is attached as `anyhow` context, so
/// it can be recovered later with `Error::downcast_ref::<ErrorType>()`.
pub trait IntoResult<T> {
    fn pub_result(self, error_type: ErrorType) -> Result<T>;
}

impl<T, E> IntoResult<T> for std::result::Result<T, E>
where
    E: Into<Error>,
{
    fn pub_result(self, error_type: ErrorType) -> Result<T> {
        self.map_err(|e| e.into().context(error_type))
    }
}

/// Finds the `ErrorType` attached to `e`, if any.
pub fn error_type(e: &Error) -> Option<ErrorType> {
    e.downcast_ref::<ErrorType>().copied()
}

/// Renders the chain of messages in `e`, outermost first, leaving out the `ErrorType` tag.
pub fn describe(e: &Error) -> String {
    let tag = error_type(e).map(|t| t.to_string());
    e.chain()
        .map(|cause| cause.to_string())
        .filter(|message| Some(message) != tag.as_ref())
        .collect::<Vec<_>>()
        .join(": ")
}
