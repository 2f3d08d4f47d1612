// src/errors.rs
use thiserror::Error;

/// Everything that can go wrong between picking a file and rendering a result.
///
/// The `Display` text of the workflow variants is the message shown to the
/// user; transport details are carried separately so they can be logged.
#[derive(Error, Debug)]
pub enum ClassifyError {
    #[error("Please select a valid image file")]
    InvalidFileType { mime_type: String },

    #[error("Please select an image before predicting")]
    NoFileSelected,

    #[error("A prediction is already in progress")]
    SubmissionInProgress,

    #[error("{0}")]
    ServerReported(String),

    #[error("The request timed out. Please try again later.")]
    Timeout { detail: String },

    #[error("Could not connect to API or there was an error processing the image.")]
    ConnectionOrServerError { detail: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to read file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("Failed to parse TOML config: {0}")]
    TomlParse(#[from] toml::de::Error),
}

impl ClassifyError {
    /// Diagnostic text for logs; falls back to the user-facing message.
    pub fn detail(&self) -> String {
        match self {
            ClassifyError::InvalidFileType { mime_type } => {
                format!("rejected candidate with type '{}'", mime_type)
            }
            ClassifyError::Timeout { detail }
            | ClassifyError::ConnectionOrServerError { detail } => detail.clone(),
            other => other.to_string(),
        }
    }

    /// Stable machine-readable name, used by the API layer.
    pub fn kind(&self) -> &'static str {
        match self {
            ClassifyError::InvalidFileType { .. } => "invalid_file_type",
            ClassifyError::NoFileSelected => "no_file_selected",
            ClassifyError::SubmissionInProgress => "submission_in_progress",
            ClassifyError::ServerReported(_) => "server_reported",
            ClassifyError::Timeout { .. } => "timeout",
            ClassifyError::ConnectionOrServerError { .. } => "connection_or_server_error",
            ClassifyError::Config(_) => "config",
            ClassifyError::FileRead(_) => "file_read",
            ClassifyError::TomlParse(_) => "toml_parse",
        }
    }
}

pub type Result<T> = std::result::Result<T, ClassifyError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeout_and_connection_messages_differ() {
        let timeout = ClassifyError::Timeout { detail: "deadline".into() };
        let connection = ClassifyError::ConnectionOrServerError { detail: "refused".into() };

        assert!(!timeout.to_string().is_empty());
        assert!(!connection.to_string().is_empty());
        assert_ne!(timeout.to_string(), connection.to_string());
    }

    #[test]
    fn test_detail_is_not_the_user_message() {
        let err = ClassifyError::ConnectionOrServerError { detail: "connection refused".into() };
        assert_eq!(err.detail(), "connection refused");
        assert!(!err.to_string().contains("refused"));
    }

    #[test]
    fn test_server_reported_passes_message_through() {
        let err = ClassifyError::ServerReported("Model not loaded".into());
        assert_eq!(err.to_string(), "Model not loaded");
        assert_eq!(err.kind(), "server_reported");
    }
}
