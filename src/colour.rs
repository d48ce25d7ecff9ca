/// A straight-alpha RGBA colour with 8 bits per channel
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub struct Colour {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Colour {
    /// Create a new opaque colour. r, g, and b range from 0 to 255
    pub const fn new_rgb(r: u8, g: u8, b: u8) -> Colour {
        Colour { r, g, b, a: 0xff }
    }

    /// Create a new colour with an explicit alpha channel. All channels range from 0 to 255
    pub const fn new_rgba(r: u8, g: u8, b: u8, a: u8) -> Colour {
        Colour { r, g, b, a }
    }

    /// Create a new colour from floating point channels ranging from 0.0 to 1.0
    pub fn new_rgba_f32(r: f32, g: f32, b: f32, a: f32) -> Colour {
        Colour {
            r: unit_to_byte(r),
            g: unit_to_byte(g),
            b: unit_to_byte(b),
            a: unit_to_byte(a),
        }
    }

    /// Parse a markup colour value: `#RRGGBB`, `#RRGGBBAA` or one of the named
    /// colours. Anything else yields opaque white.
    pub fn parse(value: &str) -> Colour {
        Colour::try_parse(value).unwrap_or(colours::WHITE)
    }

    /// Parse a markup colour value, returning `None` when it is not understood
    pub fn try_parse(value: &str) -> Option<Colour> {
        if let Some(hex) = value.strip_prefix('#') {
            return parse_hex(hex);
        }

        NAMED_COLOURS
            .iter()
            .find(|(name, _)| *name == value)
            .map(|&(_, colour)| colour)
    }

    /// Multiply every channel, alpha included, by `opacity`
    pub fn fade(self, opacity: f32) -> Colour {
        let scale = |c: u8| unit_to_byte(c as f32 / 255.0 * opacity);
        Colour {
            r: scale(self.r),
            g: scale(self.g),
            b: scale(self.b),
            a: scale(self.a),
        }
    }

    /// Pack as `0xRRGGBBAA`
    pub fn to_u32(self) -> u32 {
        u32::from_be_bytes([self.r, self.g, self.b, self.a])
    }
}

impl From<u32> for Colour {
    /// Unpack from `0xRRGGBBAA`
    fn from(rgba: u32) -> Self {
        let [r, g, b, a] = rgba.to_be_bytes();
        Colour { r, g, b, a }
    }
}

impl From<(u8, u8, u8)> for Colour {
    fn from(c: (u8, u8, u8)) -> Self {
        Colour::new_rgb(c.0, c.1, c.2)
    }
}

impl From<[u8; 4]> for Colour {
    fn from(c: [u8; 4]) -> Self {
        let [r, g, b, a] = c;
        Colour { r, g, b, a }
    }
}

fn unit_to_byte(v: f32) -> u8 {
    (v.clamp(0.0, 1.0) * 255.0).round() as u8
}

fn parse_hex(hex: &str) -> Option<Colour> {
    if (hex.len() != 6 && hex.len() != 8) || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }

    let byte = |i: usize| {
        hex.get(i..i + 2)
            .and_then(|pair| u8::from_str_radix(pair, 16).ok())
    };

    let r = byte(0)?;
    let g = byte(2)?;
    let b = byte(4)?;
    let a = if hex.len() == 8 { byte(6)? } else { 0xff };
    Some(Colour { r, g, b, a })
}

const NAMED_COLOURS: &[(&str, Colour)] = &[
    ("black", colours::BLACK),
    ("white", colours::WHITE),
    ("red", colours::RED),
    ("green", colours::GREEN),
    ("blue", colours::BLUE),
    ("yellow", colours::YELLOW),
    ("cyan", colours::CYAN),
    ("magenta", colours::MAGENTA),
    ("gray", colours::GREY),
    ("grey", colours::GREY),
    ("orange", Colour::new_rgb(0xff, 0xa5, 0x00)),
    ("purple", Colour::new_rgb(0x80, 0x00, 0x80)),
    ("pink", Colour::new_rgb(0xff, 0xc0, 0xcb)),
    ("brown", Colour::new_rgb(0xa5, 0x2a, 0x2a)),
    ("maroon", Colour::new_rgb(0x80, 0x00, 0x00)),
    ("olive", Colour::new_rgb(0x80, 0x80, 0x00)),
    ("navy", Colour::new_rgb(0x00, 0x00, 0x80)),
    ("teal", Colour::new_rgb(0x00, 0x80, 0x80)),
    ("silver", Colour::new_rgb(0xc0, 0xc0, 0xc0)),
    ("gold", Colour::new_rgb(0xff, 0xd7, 0x00)),
];

/// A list of pre-defined colour constants
pub mod colours {
    use super::*;

    pub const TRANSPARENT: Colour = Colour::new_rgba(0, 0, 0, 0);
    pub const BLACK: Colour = Colour::new_rgb(0, 0, 0);
    pub const WHITE: Colour = Colour::new_rgb(0xff, 0xff, 0xff);
    pub const GREY: Colour = Colour::new_rgb(0x80, 0x80, 0x80);
    pub const RED: Colour = Colour::new_rgb(0xff, 0, 0);
    pub const GREEN: Colour = Colour::new_rgb(0, 0xff, 0);
    pub const BLUE: Colour = Colour::new_rgb(0, 0, 0xff);
    pub const CYAN: Colour = Colour::new_rgb(0, 0xff, 0xff);
    pub const MAGENTA: Colour = Colour::new_rgb(0xff, 0, 0xff);
    pub const YELLOW: Colour = Colour::new_rgb(0xff, 0xff, 0);
}
