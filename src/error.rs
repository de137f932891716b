//! Error types for the stagetime CLI.
//!
//! Uses thiserror for derive macros and provides user-actionable error messages.

use crate::exit_codes;
use thiserror::Error;

/// Main error type for stagetime operations.
///
/// Per-invocation variants (`MalformedEncoding`, `InvalidIdentity`,
/// `TemplateExecution`) are collected alongside successful results by the
/// run renderer. `TemplateConfiguration` is the only variant that aborts a
/// whole request.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StageTimeError {
    /// User provided invalid arguments, input, or configuration.
    #[error("{0}")]
    UserError(String),

    /// A params, list-params, or workspaces entry does not have the expected shape.
    #[error("malformed {field} entry '{entry}': {reason}")]
    MalformedEncoding {
        /// Which encoding was being decoded (`params`, `listparams`, `workspaces`).
        field: &'static str,
        /// The offending entry as it appeared in the input.
        entry: String,
        /// What was wrong with it.
        reason: String,
    },

    /// The request identity cannot produce a manifest name.
    #[error("invalid run identity: {0}")]
    InvalidIdentity(String),

    /// The generic renderer was asked for a delimiter style it does not know.
    #[error("unknown delimiter style '{0}' (expected one of: curly, square)")]
    UnknownDelimiterStyle(String),

    /// A manifest or tracking template failed to parse.
    #[error("template configuration error: {0}")]
    TemplateConfiguration(String),

    /// A template referenced something the rendering context does not provide.
    #[error("template execution failed: {0}")]
    TemplateExecution(String),

    /// A rendered document could not be written to the output directory.
    #[error("cannot write document '{name}': {reason}")]
    UnwritableDocument {
        /// Document name.
        name: String,
        /// Why it was not written.
        reason: String,
    },

    /// Some documents of a request failed; the rest were emitted.
    #[error("{failed} of {total} document(s) failed to render")]
    PartialRender {
        /// Number of failed documents.
        failed: usize,
        /// Number of documents attempted.
        total: usize,
    },
}

impl StageTimeError {
    /// Returns the appropriate exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            StageTimeError::UserError(_) => exit_codes::USER_ERROR,
            StageTimeError::MalformedEncoding { .. } => exit_codes::RENDER_FAILURE,
            StageTimeError::InvalidIdentity(_) => exit_codes::RENDER_FAILURE,
            StageTimeError::UnknownDelimiterStyle(_) => exit_codes::RENDER_FAILURE,
            StageTimeError::TemplateConfiguration(_) => exit_codes::TEMPLATE_CONFIG_FAILURE,
            StageTimeError::TemplateExecution(_) => exit_codes::RENDER_FAILURE,
            StageTimeError::UnwritableDocument { .. } => exit_codes::RENDER_FAILURE,
            StageTimeError::PartialRender { .. } => exit_codes::RENDER_FAILURE,
        }
    }

    /// Short machine-readable tag, used in event logs and JSON output.
    pub fn kind(&self) -> &'static str {
        match self {
            StageTimeError::UserError(_) => "user_error",
            StageTimeError::MalformedEncoding { .. } => "malformed_encoding",
            StageTimeError::InvalidIdentity(_) => "invalid_identity",
            StageTimeError::UnknownDelimiterStyle(_) => "unknown_delimiter_style",
            StageTimeError::TemplateConfiguration(_) => "template_configuration",
            StageTimeError::TemplateExecution(_) => "template_execution",
            StageTimeError::UnwritableDocument { .. } => "unwritable_document",
            StageTimeError::PartialRender { .. } => "partial_render",
        }
    }

    /// Whether this error must abort the whole request rather than one invocation.
    pub fn is_fatal(&self) -> bool {
        matches!(self, StageTimeError::TemplateConfiguration(_))
    }
}

/// Result type alias for stagetime operations.
pub type Result<T> = std::result::Result<T, StageTimeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_error_has_correct_exit_code() {
        let err = StageTimeError::UserError("bad argument".to_string());
        assert_eq!(err.exit_code(), exit_codes::USER_ERROR);
    }

    #[test]
    fn per_invocation_errors_are_render_failures() {
        let malformed = StageTimeError::MalformedEncoding {
            field: "params",
            entry: "a".to_string(),
            reason: "missing '='".to_string(),
        };
        assert_eq!(malformed.exit_code(), exit_codes::RENDER_FAILURE);
        assert!(!malformed.is_fatal());

        let identity = StageTimeError::InvalidIdentity("commit too short".to_string());
        assert_eq!(identity.exit_code(), exit_codes::RENDER_FAILURE);

        let exec = StageTimeError::TemplateExecution("no field 'Foo'".to_string());
        assert_eq!(exec.exit_code(), exit_codes::RENDER_FAILURE);
        assert!(!exec.is_fatal());
    }

    #[test]
    fn template_configuration_is_fatal() {
        let err = StageTimeError::TemplateConfiguration("unclosed action".to_string());
        assert_eq!(err.exit_code(), exit_codes::TEMPLATE_CONFIG_FAILURE);
        assert!(err.is_fatal());
    }

    #[test]
    fn error_messages_are_descriptive() {
        let err = StageTimeError::MalformedEncoding {
            field: "workspaces",
            entry: "ws=pvc;short".to_string(),
            reason: "expected 3 ';'-separated fields, found 2".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "malformed workspaces entry 'ws=pvc;short': expected 3 ';'-separated fields, found 2"
        );

        let err = StageTimeError::UnknownDelimiterStyle("diamond".to_string());
        assert_eq!(
            err.to_string(),
            "unknown delimiter style 'diamond' (expected one of: curly, square)"
        );
        assert_eq!(err.kind(), "unknown_delimiter_style");

        let err = StageTimeError::UnwritableDocument {
            name: "st-1-build-180312a1b2".to_string(),
            reason: "already written".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "cannot write document 'st-1-build-180312a1b2': already written"
        );
        assert_eq!(err.kind(), "unwritable_document");
        assert_eq!(err.exit_code(), exit_codes::RENDER_FAILURE);

        let err = StageTimeError::PartialRender { failed: 1, total: 4 };
        assert_eq!(err.to_string(), "1 of 4 document(s) failed to render");
        assert_eq!(err.exit_code(), exit_codes::RENDER_FAILURE);
    }
}
