//! Deterministic nickname colors.
//!
//! Nicks that differ only by case or punctuation get the same color: the name
//! is normalized before hashing, the hash lands in `[0, 1529]`, and that value
//! walks a six-segment hue wheel (red, yellow, green, cyan, blue, magenta) at
//! 255 units per segment.

/// An RGB color with hex rendering
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NickColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

/// Color used for empty or missing sender names
pub const NEUTRAL: NickColor = NickColor { r: 0x99, g: 0x99, b: 0x99 };

impl NickColor {
    /// Six-hex-digit form, e.g. `#ffe100`
    pub fn hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Lowercase, collapse runs of non-alphanumeric characters to a single space,
/// and trim. Equal normalized forms mean the same person visually.
pub fn normalize(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut pending_space = false;
    for c in name.to_lowercase().chars() {
        if c.is_ascii_alphanumeric() {
            if pending_space && !out.is_empty() {
                out.push(' ');
            }
            pending_space = false;
            out.push(c);
        } else {
            pending_space = true;
        }
    }
    out
}

/// Stable color for a display name. Total: any input yields a color, the
/// empty string yields [`NEUTRAL`].
pub fn color_for(name: &str) -> NickColor {
    if name.is_empty() {
        return NEUTRAL;
    }
    wheel(hash(&normalize(name)))
}

/// Hash a normalized name into `[0, 1529]`.
///
/// The shift runs in 32-bit arithmetic with the shift count masked mod 32,
/// and the shifted value's magnitude feeds the accumulator. Normalized names
/// are pure ASCII, so bytes and characters coincide.
fn hash(normalized: &str) -> i64 {
    let mut h: i32 = 1;
    for (i, c) in normalized.bytes().enumerate() {
        let shifted = h.wrapping_shl(7 + i as u32);
        h = ((shifted.unsigned_abs() as i64 + c as i64) % 1530) as i32;
    }
    h as i64
}

/// Map `[0, 1529]` over the hue wheel: each 255-unit segment interpolates one
/// channel while the other two stay pinned at 0 or 255.
fn wheel(h: i64) -> NickColor {
    let (r, g, b) = match h {
        0..=254 => (255, h, 0),
        255..=509 => (255 - (h - 255), 255, 0),
        510..=764 => (0, 255, h - 510),
        765..=1019 => (0, 255 - (h - 765), 255),
        1020..=1274 => (h - 1020, 0, 255),
        _ => (255, 0, 255 - (h - 1275)),
    };
    NickColor { r: r as u8, g: g as u8, b: b as u8 }
}
