//! Error types for the page behaviours.
//!
//! None of these are fatal. Validation errors are shown to the user, draft
//! and config errors are logged and the behaviour falls back to defaults.

use miette::Diagnostic;

/// A note form that must not be submitted yet.
///
/// The display text is the exact message shown in the error toast.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq, Diagnostic)]
pub enum ValidationError {
    #[error("Please fill in both title and content fields")]
    #[diagnostic(code(notes_ui::validation::missing_field))]
    MissingField,

    #[error("Title must be at least {min} characters long")]
    #[diagnostic(code(notes_ui::validation::title_too_short))]
    TitleTooShort { min: usize },

    #[error("Content must be at least {min} characters long")]
    #[diagnostic(code(notes_ui::validation::content_too_short))]
    ContentTooShort { min: usize },
}

/// Failure reading or writing the local draft slot.
#[derive(thiserror::Error, Debug, Diagnostic)]
pub enum DraftError {
    /// Stored value exists but isn't a draft record.
    #[error("stored draft is malformed: {0}")]
    #[diagnostic(code(notes_ui::draft::malformed))]
    Malformed(#[from] serde_json::Error),

    /// The storage backend refused the operation (quota, privacy mode, ...).
    #[error("draft storage unavailable: {0}")]
    #[diagnostic(code(notes_ui::draft::storage))]
    Storage(String),
}

/// Invalid runtime configuration.
#[derive(thiserror::Error, Debug, Diagnostic)]
pub enum ConfigError {
    #[error("config is not valid JSON: {0}")]
    #[diagnostic(code(notes_ui::config::parse))]
    Parse(#[from] serde_json::Error),

    #[error("invalid config: {0}")]
    #[diagnostic(code(notes_ui::config::invalid), help("remove the field to use its default"))]
    Invalid(String),
}
