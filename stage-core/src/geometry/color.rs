use std::cell::OnceCell;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::presets::PresetTable;
use crate::{StageError, StageResult};

/// An RGBA color with byte channels.
///
/// The hex form is produced lazily on first read and cached until a channel
/// changes.
#[derive(Clone, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    rgba: [u8; 4],
    hex: OnceCell<String>,
}

impl Color {
    /// Opaque white.
    pub const WHITE: [u8; 4] = [255, 255, 255, 255];
    /// Opaque black.
    pub const BLACK: [u8; 4] = [0, 0, 0, 255];

    /// Create an opaque color.
    #[must_use]
    pub fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::rgba(r, g, b, 255)
    }

    /// Create a color with alpha.
    #[must_use]
    pub fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self::from_bytes([r, g, b, a])
    }

    /// Create from a byte array.
    #[must_use]
    pub fn from_bytes(rgba: [u8; 4]) -> Self {
        Self {
            rgba,
            hex: OnceCell::new(),
        }
    }

    /// Create from a slice of three (opaque) or four channel bytes.
    #[must_use]
    pub fn from_slice(bytes: &[u8]) -> Option<Self> {
        match *bytes {
            [r, g, b] => Some(Self::rgb(r, g, b)),
            [r, g, b, a, ..] => Some(Self::rgba(r, g, b, a)),
            _ => None,
        }
    }

    /// Create from channel numbers, clamping each into `0..=255`.
    #[must_use]
    pub fn from_numbers(channels: &[f64]) -> Option<Self> {
        let bytes: Vec<u8> = channels.iter().map(|c| clamp_channel(*c)).collect();
        Self::from_slice(&bytes)
    }

    /// Parse a named color or hex literal using the built-in preset table.
    ///
    /// # Errors
    ///
    /// Returns an error if the string is neither a known name nor valid hex.
    pub fn parse(literal: &str) -> StageResult<Self> {
        Self::resolve(literal, PresetTable::builtin())
    }

    /// Parse a named color or hex literal, resolving names through `table`.
    ///
    /// # Errors
    ///
    /// Returns an error if the string is neither a known name nor valid hex.
    pub fn resolve(literal: &str, table: &PresetTable) -> StageResult<Self> {
        let literal = literal.trim();
        if let Some(hex) = literal.strip_prefix('#') {
            return Self::from_hex(hex);
        }
        match table.color(literal) {
            Some(named) if named.trim().starts_with('#') => Self::from_hex(&named.trim()[1..]),
            _ => Err(StageError::Parse(format!("unknown color {literal:?}"))),
        }
    }

    fn from_hex(hex: &str) -> StageResult<Self> {
        let invalid = || StageError::Parse(format!("invalid hex color #{hex}"));
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid());
        }
        let nibble = |i: usize| u8::from_str_radix(&hex[i..=i], 16).map(|v| v * 17);
        let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16);
        let rgba = match hex.len() {
            3 => [nibble(0), nibble(1), nibble(2), Ok(255)],
            4 => [nibble(0), nibble(1), nibble(2), nibble(3)],
            6 => [byte(0), byte(2), byte(4), Ok(255)],
            8 => [byte(0), byte(2), byte(4), byte(6)],
            _ => return Err(invalid()),
        };
        let mut out = [0u8; 4];
        for (slot, channel) in out.iter_mut().zip(rgba) {
            *slot = channel.map_err(|_| invalid())?;
        }
        Ok(Self::from_bytes(out))
    }

    /// Channel bytes.
    #[must_use]
    pub const fn bytes(&self) -> [u8; 4] {
        self.rgba
    }

    /// Red channel.
    #[must_use]
    pub const fn r(&self) -> u8 {
        self.rgba[0]
    }

    /// Green channel.
    #[must_use]
    pub const fn g(&self) -> u8 {
        self.rgba[1]
    }

    /// Blue channel.
    #[must_use]
    pub const fn b(&self) -> u8 {
        self.rgba[2]
    }

    /// Alpha channel.
    #[must_use]
    pub const fn a(&self) -> u8 {
        self.rgba[3]
    }

    /// Replace one channel (0 = red .. 3 = alpha). Out-of-range indices are ignored.
    pub fn set_channel(&mut self, index: usize, value: u8) -> &mut Self {
        if let Some(slot) = self.rgba.get_mut(index) {
            *slot = value;
            self.hex = OnceCell::new();
        }
        self
    }

    /// Accumulate signed per-channel deltas, saturating at the byte limits.
    pub fn add(&mut self, delta: [i32; 4]) -> &mut Self {
        for (channel, d) in self.rgba.iter_mut().zip(delta) {
            *channel = u8::try_from((i32::from(*channel) + d).clamp(0, 255)).unwrap_or(u8::MAX);
        }
        self.hex = OnceCell::new();
        self
    }

    /// Hex form: `#rrggbb` when opaque, `#rrggbbaa` otherwise.
    #[must_use]
    pub fn hex(&self) -> &str {
        self.hex.get_or_init(|| {
            let [r, g, b, a] = self.rgba;
            if a == 255 {
                format!("#{r:02x}{g:02x}{b:02x}")
            } else {
                format!("#{r:02x}{g:02x}{b:02x}{a:02x}")
            }
        })
    }
}

pub(crate) fn clamp_channel(value: f64) -> u8 {
    // Clamped into byte range first, so the cast cannot truncate.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let byte = value.round().clamp(0.0, 255.0) as u8;
    byte
}

impl Default for Color {
    fn default() -> Self {
        Self::from_bytes(Self::BLACK)
    }
}

impl PartialEq for Color {
    fn eq(&self, other: &Self) -> bool {
        self.rgba == other.rgba
    }
}

impl Eq for Color {}

impl fmt::Debug for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Color").field(&self.hex()).finish()
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.hex())
    }
}

impl FromStr for Color {
    type Err = StageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Color {
    type Error = StageError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.hex().to_string()
    }
}

impl From<[u8; 4]> for Color {
    fn from(rgba: [u8; 4]) -> Self {
        Self::from_bytes(rgba)
    }
}
