//! Command handlers for the money CLI.
//!
//! Each handler takes what it needs (usually a loaded `Config` and the date to treat as today)
//! and returns an `Out`. Errors are tagged with an `ErrorType` so `main` can pick an exit code.

mod add;
mod delete;
mod export;
mod import;
mod init;
mod list;
mod report;

use serde::Serialize;
use std::fmt::Debug;
use tracing::{debug, info};

pub use add::add;
pub use delete::delete;
pub use export::export;
pub use import::import;
pub use init::init;
pub use list::{list, summary, Listing};
pub use report::{report, ReportOutput};

/// The result of a command: a one-line message for the log, optional text for stdout, and the
/// structured result.
#[derive(Debug, Clone, Serialize)]
pub struct Out<T>
where
    T: Serialize + Clone + Debug,
{
    message: String,

    #[serde(skip)]
    text: Option<String>,

    structure: Option<T>,
}

impl<T, S> From<S> for Out<T>
where
    T: Debug + Clone + Serialize,
    S: Into<String>,
{
    fn from(value: S) -> Self {
        Out::new_message(value)
    }
}

impl<T> Out<T>
where
    T: Serialize + Clone + Debug,
{
    pub fn new<S>(message: S, structure: T) -> Self
    where
        S: Into<String>,
    {
        Self {
            message: message.into(),
            text: None,
            structure: Some(structure),
        }
    }

    pub fn new_message<S>(message: S) -> Self
    where
        S: Into<String>,
    {
        Self {
            message: message.into(),
            text: None,
            structure: None,
        }
    }

    /// Attaches human-readable output that `print` writes to stdout.
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    pub fn structure(&self) -> Option<&T> {
        self.structure.as_ref()
    }

    /// Logs the message. With `json`, writes the structure to stdout as JSON; otherwise writes the
    /// text, if there is any.
    pub fn print(&self, json: bool) {
        info!("{}", self.message);
        if json {
            match serde_json::to_string_pretty(self) {
                Ok(s) => println!("{s}"),
                Err(e) => tracing::error!("Unable to serialize command output: {e}"),
            }
            return;
        }
        if let Some(text) = self.text() {
            print!("{text}");
            if !text.ends_with('\n') {
                println!();
            }
        }
        if let Some(structure) = self.structure() {
            if let Ok(json) = serde_json::to_string_pretty(structure) {
                debug!("Command output:\n\n{json}\n\n");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_out_json_skips_text() {
        let out = Out::new("Added", vec![1, 2]).with_text("line\n");
        let json = serde_json::to_string(&out).unwrap();
        assert_eq!(json, r#"{"message":"Added","structure":[1,2]}"#);
        assert_eq!(out.text(), Some("line\n"));
    }

    #[test]
    fn test_out_from_str() {
        let out: Out<()> = "done".into();
        assert_eq!(out.message(), "done");
        assert!(out.structure().is_none());
    }
}
