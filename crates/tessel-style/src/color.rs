//! Color values: the 16-entry console palette and 24-bit RGB.

use crate::StyleError;

/// ANSI 16-color palette indices (0-15).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Ansi16 {
    Black = 0,
    Red = 1,
    Green = 2,
    Yellow = 3,
    Blue = 4,
    Magenta = 5,
    Cyan = 6,
    White = 7,
    BrightBlack = 8,
    BrightRed = 9,
    BrightGreen = 10,
    BrightYellow = 11,
    BrightBlue = 12,
    BrightMagenta = 13,
    BrightCyan = 14,
    BrightWhite = 15,
}

impl Ansi16 {
    /// Return the raw palette index (0–15).
    #[must_use]
    pub const fn as_u8(self) -> u8 {
        self as u8
    }

    /// Whether this is one of the bright (aixterm) entries.
    #[must_use]
    pub const fn is_bright(self) -> bool {
        self.as_u8() >= 8
    }

    /// SGR parameter selecting this color as foreground (30–37, 90–97).
    #[must_use]
    pub const fn fg_code(self) -> u8 {
        if self.is_bright() {
            90 + self.as_u8() - 8
        } else {
            30 + self.as_u8()
        }
    }

    /// SGR parameter selecting this color as background (40–47, 100–107).
    #[must_use]
    pub const fn bg_code(self) -> u8 {
        self.fg_code() + 10
    }

    /// Convert a `u8` index, returning `None` if out of range.
    #[must_use]
    pub const fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::Black),
            1 => Some(Self::Red),
            2 => Some(Self::Green),
            3 => Some(Self::Yellow),
            4 => Some(Self::Blue),
            5 => Some(Self::Magenta),
            6 => Some(Self::Cyan),
            7 => Some(Self::White),
            8 => Some(Self::BrightBlack),
            9 => Some(Self::BrightRed),
            10 => Some(Self::BrightGreen),
            11 => Some(Self::BrightYellow),
            12 => Some(Self::BrightBlue),
            13 => Some(Self::BrightMagenta),
            14 => Some(Self::BrightCyan),
            15 => Some(Self::BrightWhite),
            _ => None,
        }
    }
}

/// RGB color (opaque).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rgb {
    /// Red channel (0–255).
    pub r: u8,
    /// Green channel (0–255).
    pub g: u8,
    /// Blue channel (0–255).
    pub b: u8,
}

impl Rgb {
    /// Create a new RGB color.
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Decode a hex color.
    ///
    /// A leading `#` is optional. Short forms are widened by repeating
    /// digits: one digit is repeated six times (`"a"` → `"aaaaaa"`), two
    /// digits three times (`"3f"` → `"3f3f3f"`), and three digits are each
    /// doubled (`"f80"` → `"ff8800"`).
    ///
    /// # Errors
    ///
    /// [`StyleError::InvalidHexDigit`] if any character is not a hex digit,
    /// [`StyleError::InvalidHexLength`] for any length other than 1, 2, 3 or 6.
    pub fn from_hex(input: &str) -> Result<Self, StyleError> {
        let digits = input.strip_prefix('#').unwrap_or(input);
        if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(StyleError::InvalidHexDigit {
                input: input.to_owned(),
            });
        }

        let expanded: String = match digits.len() {
            1 => digits.repeat(6),
            2 => digits.repeat(3),
            3 => digits.chars().flat_map(|c| [c, c]).collect(),
            6 => digits.to_owned(),
            len => return Err(StyleError::InvalidHexLength { len }),
        };

        let channel = |i: usize| {
            u8::from_str_radix(&expanded[i..i + 2], 16).map_err(|_| StyleError::InvalidHexDigit {
                input: input.to_owned(),
            })
        };
        Ok(Self::new(channel(0)?, channel(2)?, channel(4)?))
    }
}

impl From<(u8, u8, u8)> for Rgb {
    fn from((r, g, b): (u8, u8, u8)) -> Self {
        Self::new(r, g, b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_codes() {
        assert_eq!(Ansi16::Black.fg_code(), 30);
        assert_eq!(Ansi16::White.fg_code(), 37);
        assert_eq!(Ansi16::BrightBlack.fg_code(), 90);
        assert_eq!(Ansi16::BrightWhite.fg_code(), 97);
        assert_eq!(Ansi16::Red.bg_code(), 41);
        assert_eq!(Ansi16::BrightCyan.bg_code(), 106);
    }

    #[test]
    fn ansi16_round_trip() {
        for i in 0..16 {
            assert_eq!(Ansi16::from_u8(i).map(Ansi16::as_u8), Some(i));
        }
        assert_eq!(Ansi16::from_u8(16), None);
    }

    #[test]
    fn hex_six_digits() {
        assert_eq!(Rgb::from_hex("#ff8000"), Ok(Rgb::new(255, 128, 0)));
        assert_eq!(Rgb::from_hex("0A0b0C"), Ok(Rgb::new(10, 11, 12)));
    }

    #[test]
    fn hex_short_forms_double_channels() {
        assert_eq!(Rgb::from_hex("f80"), Ok(Rgb::new(0xff, 0x88, 0x00)));
        assert_eq!(Rgb::from_hex("#3f"), Ok(Rgb::new(0x3f, 0x3f, 0x3f)));
        assert_eq!(Rgb::from_hex("a"), Ok(Rgb::new(0xaa, 0xaa, 0xaa)));
    }

    #[test]
    fn hex_rejects_bad_length() {
        assert_eq!(
            Rgb::from_hex("#abcd"),
            Err(StyleError::InvalidHexLength { len: 4 })
        );
        assert_eq!(Rgb::from_hex(""), Err(StyleError::InvalidHexLength { len: 0 }));
        assert_eq!(
            Rgb::from_hex("1234567"),
            Err(StyleError::InvalidHexLength { len: 7 })
        );
    }

    #[test]
    fn hex_rejects_non_hex() {
        assert!(matches!(
            Rgb::from_hex("#gg0000"),
            Err(StyleError::InvalidHexDigit { .. })
        ));
        assert!(matches!(
            Rgb::from_hex("é"),
            Err(StyleError::InvalidHexDigit { .. })
        ));
    }
}
