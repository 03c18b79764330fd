use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Straight-alpha RGBA color carried by every dot.
///
/// Layout code never looks inside; it only copies the value onto points.
/// Textual form is CSS-like hex (`#000`, `#FFFFFF`, `#11223344`) or one of
/// the few named colors the experiment pages use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ColorValue([u8; 4]);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unrecognized color `{0}`")]
pub struct ParseColorError(pub String);

impl ColorValue {
    pub const BLACK: Self = Self([0, 0, 0, 255]);
    pub const WHITE: Self = Self([255, 255, 255, 255]);
    pub const LIGHT_GREY: Self = Self([211, 211, 211, 255]);

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self([r, g, b, a])
    }

    pub const fn to_rgba(self) -> [u8; 4] {
        self.0
    }

    fn from_named(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "black" => Some(Self::BLACK),
            "white" => Some(Self::WHITE),
            "lightgrey" | "lightgray" => Some(Self::LIGHT_GREY),
            _ => None,
        }
    }

    fn from_hex(hex: &str) -> Option<Self> {
        if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }
        let byte = |s: &str| u8::from_str_radix(s, 16).ok();
        match hex.len() {
            3 => {
                let mut out = [0u8, 0, 0, 255];
                for (i, c) in hex.as_bytes().iter().enumerate() {
                    let nibble = (*c as char).to_digit(16)? as u8;
                    out[i] = nibble * 17;
                }
                Some(Self(out))
            }
            6 => Some(Self([
                byte(&hex[0..2])?,
                byte(&hex[2..4])?,
                byte(&hex[4..6])?,
                255,
            ])),
            8 => Some(Self([
                byte(&hex[0..2])?,
                byte(&hex[2..4])?,
                byte(&hex[4..6])?,
                byte(&hex[6..8])?,
            ])),
            _ => None,
        }
    }
}

impl FromStr for ColorValue {
    type Err = ParseColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let parsed = match trimmed.strip_prefix('#') {
            Some(hex) => Self::from_hex(hex),
            None => Self::from_named(trimmed),
        };
        parsed.ok_or_else(|| ParseColorError(s.to_string()))
    }
}

impl fmt::Display for ColorValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [r, g, b, a] = self.0;
        if a == 255 {
            write!(f, "#{r:02X}{g:02X}{b:02X}")
        } else {
            write!(f, "#{r:02X}{g:02X}{b:02X}{a:02X}")
        }
    }
}

impl TryFrom<String> for ColorValue {
    type Error = ParseColorError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ColorValue> for String {
    fn from(value: ColorValue) -> Self {
        value.to_string()
    }
}
