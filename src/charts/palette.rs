//! Color choices shared by the interactive and static charts.
//!
//! Colors are plain RGB triples so chart artifacts stay independent of the
//! drawing backend.

use serde::Serialize;

pub type Rgb = [u8; 3];

/// Bar colors offered in the control panel (matplotlib "tab" palette).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum BarColor {
    #[default]
    Red,
    Green,
    Orange,
    Blue,
    Cyan,
}

impl BarColor {
    pub const ALL: [BarColor; 5] = [
        BarColor::Red,
        BarColor::Green,
        BarColor::Orange,
        BarColor::Blue,
        BarColor::Cyan,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            BarColor::Red => "tab:red",
            BarColor::Green => "tab:green",
            BarColor::Orange => "tab:orange",
            BarColor::Blue => "tab:blue",
            BarColor::Cyan => "tab:cyan",
        }
    }

    pub fn rgb(&self) -> Rgb {
        match self {
            BarColor::Red => [214, 39, 40],
            BarColor::Green => [44, 160, 44],
            BarColor::Orange => [255, 127, 14],
            BarColor::Blue => [31, 119, 180],
            BarColor::Cyan => [23, 190, 207],
        }
    }
}

/// Fallback marker color when the configured name is unknown.
pub const DEFAULT_MARKER_COLOR: Rgb = [255, 0, 0];

/// Resolve a named marker color (as accepted in `firedash.toml`).
pub fn named_color(name: &str) -> Option<Rgb> {
    let rgb = match name.trim().to_ascii_lowercase().as_str() {
        "red" => [255, 0, 0],
        "darkred" => [139, 0, 0],
        "orange" => [255, 165, 0],
        "yellow" => [255, 215, 0],
        "green" => [0, 128, 0],
        "blue" => [0, 0, 255],
        "purple" => [128, 0, 128],
        "black" => [0, 0, 0],
        hex if hex.starts_with('#') && hex.len() == 7 => {
            let channel = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
            [channel(1)?, channel(3)?, channel(5)?]
        }
        _ => return None,
    };
    Some(rgb)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_has_five_distinct_colors() {
        let mut colors: Vec<Rgb> = BarColor::ALL.iter().map(|c| c.rgb()).collect();
        colors.dedup();
        assert_eq!(colors.len(), 5);
        assert_eq!(BarColor::Blue.label(), "tab:blue");
    }

    #[test]
    fn resolves_names_and_hex() {
        assert_eq!(named_color("Red"), Some([255, 0, 0]));
        assert_eq!(named_color("#1f77b4"), Some([31, 119, 180]));
        assert_eq!(named_color("#zz0000"), None);
        assert_eq!(named_color("chartreuse-ish"), None);
    }

    #[test]
    fn non_ascii_hex_is_rejected() {
        // Seven bytes, but 'é' straddles the first channel boundary
        assert_eq!(named_color("#1é345"), None);
        assert_eq!(named_color("#ééé"), None);
    }
}
