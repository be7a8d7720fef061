//! Error types for light map reading and writing.

use thiserror::Error;

/// Errors that can occur while reading or writing a light map.
#[derive(Error, Debug)]
pub enum FormatError {
    /// I/O error reading or writing a file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The document is not well-formed XML.
    #[error("malformed XML: {0}")]
    Xml(String),

    /// A required element is absent.
    #[error("missing required section: {0}")]
    MissingSection(String),

    /// A scalar could not be parsed as a number.
    #[error("invalid number {value:?} in {field}")]
    NumericField {
        /// Element or attribute the value came from.
        field: String,
        /// Offending text.
        value: String,
    },

    /// The companion document named by the primary could not be used.
    #[error("companion {name:?} unavailable: {reason}")]
    CompanionLookup {
        /// Companion map name.
        name: String,
        /// Why the lookup failed.
        reason: String,
    },

    /// A light reached the writer without a resolved position.
    #[error("light {0} has no position")]
    Unpositioned(usize),

    /// Export was asked to write zero lights.
    #[error("no lights to export")]
    EmptyInput,

    /// File extension is not a known light list format.
    #[error("unsupported file type: {0}")]
    UnsupportedFile(String),

    /// JSON light list could not be decoded.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Settings could not be decoded.
    #[error("settings error: {0}")]
    Settings(#[from] toml::de::Error),
}

impl FormatError {
    /// Create a missing-section error.
    pub fn missing(section: impl Into<String>) -> Self {
        Self::MissingSection(section.into())
    }

    /// Create a numeric-field error.
    pub fn numeric(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self::NumericField {
            field: field.into(),
            value: value.into(),
        }
    }

    /// Create a companion lookup error.
    pub fn companion(name: impl Into<String>, reason: impl ToString) -> Self {
        Self::CompanionLookup {
            name: name.into(),
            reason: reason.to_string(),
        }
    }

    /// True for structural problems (malformed XML or a missing section).
    pub fn is_structural(&self) -> bool {
        matches!(self, Self::Xml(_) | Self::MissingSection(_))
    }
}

impl From<quick_xml::Error> for FormatError {
    fn from(e: quick_xml::Error) -> Self {
        Self::Xml(e.to_string())
    }
}

impl From<quick_xml::events::attributes::AttrError> for FormatError {
    fn from(e: quick_xml::events::attributes::AttrError) -> Self {
        Self::Xml(e.to_string())
    }
}

/// Result type for light map operations.
pub type Result<T> = std::result::Result<T, FormatError>;
