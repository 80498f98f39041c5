//! Validated name newtypes for domain entities
//!
//! These newtypes ensure that names are valid by construction:
//! - Non-empty (except Description)
//! - Within length limits
//! - Trimmed of leading/trailing whitespace

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::DomainError;

/// Maximum length for short name fields (CharacterName, PathName, TechniqueName, Keyword, EffectName)
const MAX_NAME_LENGTH: usize = 200;

/// Maximum length for long-form text (Description, Definition)
const MAX_DESCRIPTION_LENGTH: usize = 5000;

macro_rules! define_name {
    ($(#[$meta:meta])* $name:ident, $label:literal, $max:expr) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Create a new validated value.
            ///
            /// # Errors
            ///
            /// Returns `DomainError::Validation` if the value is empty after
            /// trimming or exceeds the length limit.
            pub fn new(value: impl Into<String>) -> Result<Self, DomainError> {
                let value = value.into();
                let trimmed = value.trim();
                if trimmed.is_empty() {
                    return Err(DomainError::validation(concat!($label, " cannot be empty")));
                }
                if trimmed.len() > $max {
                    return Err(DomainError::validation(format!(
                        concat!($label, " cannot exceed {} characters"),
                        $max
                    )));
                }
                Ok(Self(trimmed.to_string()))
            }

            /// Returns the value as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl TryFrom<String> for $name {
            type Error = DomainError;

            fn try_from(s: String) -> Result<Self, Self::Error> {
                Self::new(s)
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> String {
                value.0
            }
        }
    };
}

define_name!(
    /// A validated character name (non-empty, <=200 chars, trimmed)
    CharacterName,
    "Character name",
    MAX_NAME_LENGTH
);

define_name!(
    /// The character's spiritual path, shown under the name (e.g. "Path of Gluttony")
    PathName,
    "Path",
    MAX_NAME_LENGTH
);

define_name!(
    /// A validated technique name
    TechniqueName,
    "Technique name",
    MAX_NAME_LENGTH
);

define_name!(
    /// Glossary keyword highlighted in technique text
    Keyword,
    "Keyword",
    MAX_NAME_LENGTH
);

define_name!(
    /// Name of a lingering effect on a character (e.g. "Grung Toxin")
    EffectName,
    "Effect name",
    MAX_NAME_LENGTH
);

define_name!(
    /// Glossary definition text (non-empty)
    Definition,
    "Definition",
    MAX_DESCRIPTION_LENGTH
);

// ============================================================================
// Description
// ============================================================================

/// Free text shown to the player (may be empty, <=5000 chars, trimmed)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Description(String);

impl Description {
    /// Create a new validated description.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if the description exceeds 5000 characters.
    pub fn new(description: impl Into<String>) -> Result<Self, DomainError> {
        let description = description.into();
        let trimmed = description.trim();
        if trimmed.len() > MAX_DESCRIPTION_LENGTH {
            return Err(DomainError::validation(format!(
                "Description cannot exceed {} characters",
                MAX_DESCRIPTION_LENGTH
            )));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn empty() -> Self {
        Self(String::new())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Description {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for Description {
    type Error = DomainError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<Description> for String {
    fn from(desc: Description) -> String {
        desc.0
    }
}
