//! 24-bit RGB colours used for option decoration.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error returned when text is not a `#RRGGBB` colour.
#[derive(Debug, Error, PartialEq)]
pub enum ColourParseError {
    #[error("colour must start with '#': {0:?}")]
    MissingHash(String),
    #[error("colour must have exactly six hex digits: {0:?}")]
    BadLength(String),
    #[error("invalid hex digits in colour: {0:?}")]
    BadDigits(String),
}

/// An opaque RGB colour, written as `#RRGGBB` in settings files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Colour {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Colour {
    /// Darkened cyan.
    pub const HIGHLIGHT: Colour = Colour::rgb(0, 178, 178);
    pub const LOCKED: Colour = Colour::rgb(95, 95, 95);
    /// Colour of an undecorated dialogue option.
    pub const IDLE: Colour = Colour::rgb(0, 0, 0);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Packs the colour as `0x00RRGGBB`.
    pub fn to_rgb_u32(self) -> u32 {
        (u32::from(self.r) << 16) | (u32::from(self.g) << 8) | u32::from(self.b)
    }
}

impl fmt::Display for Colour {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

impl FromStr for Colour {
    type Err = ColourParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s
            .strip_prefix('#')
            .ok_or_else(|| ColourParseError::MissingHash(s.to_string()))?;
        if digits.len() != 6 || !digits.is_ascii() {
            return Err(ColourParseError::BadLength(s.to_string()));
        }
        // from_str_radix alone would also accept a leading sign.
        if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(ColourParseError::BadDigits(s.to_string()));
        }
        let packed =
            u32::from_str_radix(digits, 16).map_err(|_| ColourParseError::BadDigits(s.to_string()))?;
        Ok(Self::rgb(
            ((packed >> 16) & 0xFF) as u8,
            ((packed >> 8) & 0xFF) as u8,
            (packed & 0xFF) as u8,
        ))
    }
}

impl TryFrom<String> for Colour {
    type Error = ColourParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Colour> for String {
    fn from(colour: Colour) -> Self {
        colour.to_string()
    }
}
