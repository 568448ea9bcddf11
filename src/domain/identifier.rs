use std::fmt;
use std::str::FromStr;

use uuid::Uuid;

use super::error::ValidationError;

/// 128-bit unique token, canonical hyphenated form
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Identifier(Uuid);

impl Identifier {
    const CANONICAL_LEN: usize = 36;

    /// Generate a fresh random identifier
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse the canonical `8-4-4-4-12` textual form
    ///
    /// Simple, braced and URN encodings are rejected so that every stored id
    /// has exactly one spelling.
    pub fn parse(s: &str) -> Result<Self, ValidationError> {
        let s = s.trim();
        if s.len() != Self::CANONICAL_LEN {
            return Err(ValidationError::new("identifier", "malformed identifier"));
        }

        let uuid = Uuid::try_parse(s)
            .map_err(|_| ValidationError::new("identifier", "malformed identifier"))?;

        if uuid.is_nil() {
            return Err(ValidationError::new("identifier", "nil identifier"));
        }

        Ok(Self(uuid))
    }
}

impl FromStr for Identifier {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}
