//! Error types for widget configuration and host input.

use std::fmt;

/// Errors raised while configuring widgets or decoding host-supplied data.
#[derive(Debug)]
pub enum Error {
    /// A configuration value makes the widget's math undefined (e.g. `max <= 0`).
    InvalidConfiguration {
        /// Name of the offending option.
        field: &'static str,
        /// What was wrong with it.
        reason: String,
    },
    /// Host input that could not be interpreted (e.g. an unparseable target date).
    InvalidInput {
        /// Name of the offending input.
        field: &'static str,
        /// What was wrong with it.
        reason: String,
    },
    /// Cell props that did not match the widget's expected shape.
    Props(serde_json::Error),
}

impl Error {
    pub(crate) fn invalid_configuration(field: &'static str, reason: impl Into<String>) -> Self {
        Error::InvalidConfiguration {
            field,
            reason: reason.into(),
        }
    }

    pub(crate) fn invalid_input(field: &'static str, reason: impl Into<String>) -> Self {
        Error::InvalidInput {
            field,
            reason: reason.into(),
        }
    }

    /// Returns `true` for [`Error::InvalidConfiguration`].
    pub fn is_invalid_configuration(&self) -> bool {
        matches!(self, Error::InvalidConfiguration { .. })
    }

    /// Returns `true` for [`Error::InvalidInput`].
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, Error::InvalidInput { .. })
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidConfiguration { field, reason } => {
                write!(f, "Invalid configuration for '{}': {}", field, reason)
            }
            Error::InvalidInput { field, reason } => {
                write!(f, "Invalid input for '{}': {}", field, reason)
            }
            Error::Props(e) => write!(f, "Invalid cell props: {}", e),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Props(e) => Some(e),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Props(err)
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        let err = Error::invalid_configuration("max", "must be greater than 0, got 0");
        assert_eq!(
            err.to_string(),
            "Invalid configuration for 'max': must be greater than 0, got 0"
        );
        assert!(err.is_invalid_configuration());
        assert!(!err.is_invalid_input());

        let err = Error::invalid_input("target_date", "unrecognised date 'soon'");
        assert_eq!(
            err.to_string(),
            "Invalid input for 'target_date': unrecognised date 'soon'"
        );
        assert!(err.is_invalid_input());
    }

    #[test]
    fn test_props_error_has_source() {
        use std::error::Error as _;

        let json_err = serde_json::from_str::<u32>("\"nope\"").unwrap_err();
        let err = Error::from(json_err);
        assert!(err.source().is_some());
        assert!(err.to_string().starts_with("Invalid cell props"));
    }
}
