//! Error types with error codes and fix suggestions
//!
//! Error code ranges:
//! - BIGMODEL-000-009: Binding errors (recoverable)
//! - BIGMODEL-010-019: Accessor errors
//! - BIGMODEL-020-029: Configuration / descriptor errors
//!
//! Malformed descriptors are not errors: they are [`Defect`]s and abort
//! binding with a panic.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, BindError>;

/// Trait for errors that provide fix suggestions
pub trait FixSuggestion {
    fn fix_suggestion(&self) -> Option<&str>;
}

/// Recoverable errors surfaced by binding, accessors and configuration.
#[derive(Error, Debug)]
pub enum BindError {
    // ─────────────────────────────────────────────────────────────
    // Binding errors (BIGMODEL-000 to BIGMODEL-009)
    // ─────────────────────────────────────────────────────────────
    #[error("[BIGMODEL-001] Bind target is a {kind}, not a record")]
    InvalidTarget { kind: String },

    #[error("[BIGMODEL-002] No factory for source '{source_name}'")]
    MissingFactory { source_name: String },

    // ─────────────────────────────────────────────────────────────
    // Accessor errors (BIGMODEL-010 to BIGMODEL-019)
    // ─────────────────────────────────────────────────────────────
    #[error("[BIGMODEL-010] Accessor<{type_name}> has not been bound")]
    Unbound { type_name: &'static str },

    #[error("[BIGMODEL-011] Field '{field}' not found in source '{source_name}'")]
    FieldNotFound { source_name: String, field: String },

    #[error("[BIGMODEL-012] Field '{field}' of source '{source_name}' is not a {expected}: {details}")]
    TypeMismatch {
        source_name: String,
        field: String,
        expected: &'static str,
        details: String,
    },

    #[error("[BIGMODEL-013] Source '{source_name}' is unavailable: {reason}")]
    SourceUnavailable { source_name: String, reason: String },

    // ─────────────────────────────────────────────────────────────
    // Configuration errors (BIGMODEL-020 to BIGMODEL-029)
    // ─────────────────────────────────────────────────────────────
    #[error("[BIGMODEL-020] Configuration error: {reason}")]
    ConfigError { reason: String },

    #[error("[BIGMODEL-021] Invalid model descriptor: {details}")]
    DescriptorError { details: String },

    #[error("[BIGMODEL-022] IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl BindError {
    /// Stable error code, e.g. `BIGMODEL-002`
    pub fn code(&self) -> &'static str {
        match self {
            BindError::InvalidTarget { .. } => "BIGMODEL-001",
            BindError::MissingFactory { .. } => "BIGMODEL-002",
            BindError::Unbound { .. } => "BIGMODEL-010",
            BindError::FieldNotFound { .. } => "BIGMODEL-011",
            BindError::TypeMismatch { .. } => "BIGMODEL-012",
            BindError::SourceUnavailable { .. } => "BIGMODEL-013",
            BindError::ConfigError { .. } => "BIGMODEL-020",
            BindError::DescriptorError { .. } => "BIGMODEL-021",
            BindError::Io(_) => "BIGMODEL-022",
        }
    }
}

impl FixSuggestion for BindError {
    fn fix_suggestion(&self) -> Option<&str> {
        match self {
            BindError::InvalidTarget { .. } => {
                Some("Bind a record whose fields are accessor slots")
            }
            BindError::MissingFactory { .. } => {
                Some("Register the source with with_source() or with_factory() before binding")
            }
            BindError::Unbound { .. } => Some("Call bind() on the model before reading its slots"),
            BindError::FieldNotFound { .. } => {
                Some("Check the slot's field tag matches a member of the source")
            }
            BindError::TypeMismatch { .. } => {
                Some("Declare the slot with the type the source actually holds")
            }
            BindError::SourceUnavailable { .. } => {
                Some("Check that the file or producer behind the source is readable")
            }
            BindError::ConfigError { .. } => Some("Check the registry config file syntax"),
            BindError::DescriptorError { .. } => {
                Some("Declare each slot as a mapping with a source or tag entry")
            }
            BindError::Io(_) => Some("Check file path and permissions"),
        }
    }
}

/// Descriptor defects. These are programming errors in the model
/// declaration; the binder panics with their message instead of returning.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Defect {
    #[error("invalid field {slot}: expected an accessor slot, found {found}")]
    InvalidSlotShape { slot: String, found: String },

    #[error("cannot find source for field {slot}")]
    MissingSourceTag { slot: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_carry_codes() {
        let err = BindError::MissingFactory {
            source_name: "A".into(),
        };
        assert_eq!(err.to_string(), "[BIGMODEL-002] No factory for source 'A'");
        assert_eq!(err.code(), "BIGMODEL-002");
    }

    #[test]
    fn every_error_has_a_suggestion() {
        let errors = [
            BindError::InvalidTarget { kind: "sequence".into() },
            BindError::MissingFactory { source_name: "A".into() },
            BindError::Unbound { type_name: "i64" },
            BindError::FieldNotFound {
                source_name: "A".into(),
                field: "UserId".into(),
            },
            BindError::TypeMismatch {
                source_name: "A".into(),
                field: "UserId".into(),
                expected: "i64",
                details: "invalid type".into(),
            },
            BindError::SourceUnavailable {
                source_name: "B".into(),
                reason: "user.json: not found".into(),
            },
            BindError::ConfigError { reason: "bad".into() },
            BindError::DescriptorError { details: "bad".into() },
            BindError::Io(std::io::Error::other("boom")),
        ];
        for err in &errors {
            assert!(err.fix_suggestion().is_some(), "no suggestion for {err}");
            assert!(err.to_string().contains(err.code()));
        }
    }

    #[test]
    fn defect_messages() {
        let defect = Defect::MissingSourceTag { slot: "ID".into() };
        assert_eq!(defect.to_string(), "cannot find source for field ID");

        let defect = Defect::InvalidSlotShape {
            slot: "Plain".into(),
            found: "i64".into(),
        };
        assert!(defect.to_string().starts_with("invalid field Plain"));
    }
}
