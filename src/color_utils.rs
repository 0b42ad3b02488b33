// File: ./src/color_utils.rs

// Colors for parent-area headings and deadline urgency.
// No dependency on ratatui so it can be used from core logic and tests.

/// Ten-entry categorical palette; parent areas take colors in order of
/// appearance and wrap around.
pub const PARENT_AREA_PALETTE: [&str; 10] = [
    "#1f77b4", // blue
    "#ff7f0e", // orange
    "#2ca02c", // green
    "#9467bd", // purple
    "#d62728", // red
    "#8c564b", // brown
    "#e377c2", // pink
    "#7f7f7f", // gray
    "#bcbd22", // olive
    "#17becf", // cyan
];

/// Parse a hex color string like "#RRGGBB" or "RRGGBB" into u8 tuple.
pub fn parse_hex_to_u8(hex: &str) -> Option<(u8, u8, u8)> {
    let hex = hex.trim_start_matches('#');
    if hex.len() < 6 || !hex.is_ascii() {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some((r, g, b))
}

/// Color of the `index`-th parent area.
pub fn parent_area_rgb(index: usize) -> (u8, u8, u8) {
    let hex = PARENT_AREA_PALETTE[index % PARENT_AREA_PALETTE.len()];
    parse_hex_to_u8(hex).unwrap_or((255, 255, 255))
}

/// Countdown accent: red inside `urgent_days`, amber inside a month, green beyond.
pub fn urgency_rgb(days_left: Option<i64>, urgent_days: i64) -> (u8, u8, u8) {
    match days_left {
        Some(d) if d < urgent_days => (0xd6, 0x27, 0x28),
        Some(d) if d < 30 => (0xff, 0x7f, 0x0e),
        Some(_) => (0x2c, 0xa0, 0x2c),
        None => (0x7f, 0x7f, 0x7f),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_palette_cycles() {
        assert_eq!(parent_area_rgb(0), (0x1f, 0x77, 0xb4));
        assert_eq!(parent_area_rgb(10), parent_area_rgb(0));
        assert_eq!(parent_area_rgb(13), (0x94, 0x67, 0xbd));
    }

    #[test]
    fn test_parse_hex() {
        assert_eq!(parse_hex_to_u8("#17becf"), Some((0x17, 0xbe, 0xcf)));
        assert_eq!(parse_hex_to_u8("17BECF"), Some((0x17, 0xbe, 0xcf)));
        assert_eq!(parse_hex_to_u8("#fff"), None);
        assert_eq!(parse_hex_to_u8("zzzzzz"), None);
    }

    #[test]
    fn test_urgency_bands() {
        assert_eq!(urgency_rgb(Some(0), 7), (0xd6, 0x27, 0x28));
        assert_eq!(urgency_rgb(Some(10), 7), (0xff, 0x7f, 0x0e));
        assert_eq!(urgency_rgb(Some(90), 7), (0x2c, 0xa0, 0x2c));
        assert_eq!(urgency_rgb(None, 7), (0x7f, 0x7f, 0x7f));
    }
}
