//! Error types for template resolution and rendering.

use std::error::Error as _;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for template operations.
pub type TemplateResult<T> = Result<T, TemplateError>;

/// Where a named template definition came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateOrigin {
    /// Built-in fragment library entry.
    Builtin,
    /// Built-in default root body.
    DefaultRoot,
    /// A user-supplied override template file.
    File(PathBuf),
    /// Root body concatenated from several sources.
    Composed,
}

impl fmt::Display for TemplateOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TemplateOrigin::Builtin => write!(f, "built-in fragment library"),
            TemplateOrigin::DefaultRoot => write!(f, "built-in default template"),
            TemplateOrigin::File(path) => write!(f, "{}", path.display()),
            TemplateOrigin::Composed => write!(f, "composed root template"),
        }
    }
}

/// Errors that can occur during template operations.
#[derive(Error, Debug)]
pub enum TemplateError {
    #[error("Failed to read template file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Template parse error in '{name}' ({origin}): {message}")]
    Parse {
        name: String,
        origin: TemplateOrigin,
        message: String,
    },

    #[error("Root template '{name}' is defined more than once: {}", format_origins(.origins))]
    RootRedefinition {
        name: String,
        origins: Vec<TemplateOrigin>,
    },

    #[error("Template rendering failed for '{name}': {message}")]
    Render { name: String, message: String },
}

fn format_origins(origins: &[TemplateOrigin]) -> String {
    origins
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Flatten a tera error and its causes into one line.
pub(crate) fn describe(error: &tera::Error) -> String {
    let mut message = error.to_string();
    let mut source = std::error::Error::source(error);
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}
