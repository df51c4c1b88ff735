use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid color {0:?}, expected #rrggbb")]
pub struct ColorParseError(pub String);

/// 24-bit sRGB color, serialized as `"#rrggbb"`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgb(pub u32);

impl Rgb {
    pub fn from_hex(s: &str) -> Result<Self, ColorParseError> {
        let digits = s.trim().trim_start_matches('#');
        if digits.len() != 6 {
            return Err(ColorParseError(s.to_string()));
        }
        u32::from_str_radix(digits, 16)
            .map(Rgb)
            .map_err(|_| ColorParseError(s.to_string()))
    }

    /// Normalized `[r, g, b, a]` for shader uniforms.
    pub fn to_rgba(self, alpha: f32) -> [f32; 4] {
        let r = ((self.0 >> 16) & 0xff) as f32 / 255.0;
        let g = ((self.0 >> 8) & 0xff) as f32 / 255.0;
        let b = (self.0 & 0xff) as f32 / 255.0;
        [r, g, b, alpha]
    }
}

impl TryFrom<String> for Rgb {
    type Error = ColorParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Rgb::from_hex(&value)
    }
}

impl From<Rgb> for String {
    fn from(c: Rgb) -> Self {
        format!("#{:06x}", c.0 & 0xff_ffff)
    }
}

/// Display material for point sets.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PointMaterial {
    /// World-space point size (attenuated by distance).
    pub size: f32,
    pub color: Rgb,
    pub opacity: f32,
}

impl Default for PointMaterial {
    fn default() -> Self {
        Self {
            size: 0.004,
            color: Rgb(0xffff88),
            opacity: 0.8,
        }
    }
}

/// Display material for line overlays.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LineMaterial {
    pub color: Rgb,
    pub opacity: f32,
}

impl Default for LineMaterial {
    fn default() -> Self {
        Self {
            color: Rgb(0x88ccff),
            opacity: 0.3,
        }
    }
}
