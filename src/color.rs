//! Placeholder values derived from a single base16 hex color.
//!
//! One `baseNN: "rrggbb"` entry expands into eleven token values (hex
//! channels, 0-255 channels, 0.0-1.0 channels, and two whole-color forms).
//! Derivation is pure and never fails: anything that is not exactly six ASCII
//! hex digits is treated as `000000`.

/// Value used in place of a malformed color.
pub const FALLBACK_HEX: &str = "000000";

/// Token-name suffixes produced for every base id, in emission order.
pub const SUFFIXES: [&str; 11] = [
    "hex-r", "hex-g", "hex-b", "rgb-r", "rgb-g", "rgb-b", "dec-r", "dec-g", "dec-b", "hex",
    "hex-bgr",
];

/// True when `hex` is exactly six ASCII hex digits (no leading `#`).
pub fn is_valid_hex(hex: &str) -> bool {
    hex.len() == 6 && hex.bytes().all(|b| b.is_ascii_hexdigit())
}

/// 8-bit RGB channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    /// Parse `rrggbb`; malformed input yields black.
    pub fn from_hex(hex: &str) -> Self {
        if !is_valid_hex(hex) {
            return Self::default();
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).unwrap_or(0);
        Self {
            r: channel(0),
            g: channel(2),
            b: channel(4),
        }
    }

    /// Channels scaled into `[0.0, 1.0]`.
    pub fn to_unit(self) -> [f64; 3] {
        [self.r, self.g, self.b].map(|c| f64::from(c) / 255.0)
    }
}

/// Fixed six-decimal rendering used for every `dec-*` token.
pub fn format_unit(value: f64) -> String {
    format!("{value:.6}")
}

/// The full set of values one color contributes to a template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorTokens {
    pub hex: String,
    pub hex_r: String,
    pub hex_g: String,
    pub hex_b: String,
    pub rgb: Rgb,
    pub dec_r: String,
    pub dec_g: String,
    pub dec_b: String,
}

impl ColorTokens {
    /// `bbggrr` form of the color.
    pub fn hex_bgr(&self) -> String {
        format!("{}{}{}", self.hex_b, self.hex_g, self.hex_r)
    }

    /// `(suffix, value)` pairs in [`SUFFIXES`] order.
    pub fn entries(&self) -> [(&'static str, String); 11] {
        [
            ("hex-r", self.hex_r.clone()),
            ("hex-g", self.hex_g.clone()),
            ("hex-b", self.hex_b.clone()),
            ("rgb-r", self.rgb.r.to_string()),
            ("rgb-g", self.rgb.g.to_string()),
            ("rgb-b", self.rgb.b.to_string()),
            ("dec-r", self.dec_r.clone()),
            ("dec-g", self.dec_g.clone()),
            ("dec-b", self.dec_b.clone()),
            ("hex", self.hex.clone()),
            ("hex-bgr", self.hex_bgr()),
        ]
    }

    /// `(base-id-suffix, value)` pairs ready to be looked up as `{{name}}`.
    pub fn named(&self, base_id: &str) -> impl Iterator<Item = (String, String)> {
        let base_id = base_id.to_string();
        self.entries()
            .into_iter()
            .map(move |(suffix, value)| (format!("{base_id}-{suffix}"), value))
    }
}

/// Derive every token value for one hex color.
///
/// Hex channel substrings keep the input's letter case.
pub fn derive(hex: &str) -> ColorTokens {
    let hex = if is_valid_hex(hex) { hex } else { FALLBACK_HEX };
    let rgb = Rgb::from_hex(hex);
    let [dec_r, dec_g, dec_b] = rgb.to_unit().map(format_unit);
    ColorTokens {
        hex: hex.to_string(),
        hex_r: hex[0..2].to_string(),
        hex_g: hex[2..4].to_string(),
        hex_b: hex[4..6].to_string(),
        rgb,
        dec_r,
        dec_g,
        dec_b,
    }
}
