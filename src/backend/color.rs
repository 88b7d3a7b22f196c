use ratatui::style::Color;

/// Converts a [`Color`] to an RGB triple. Returns `None` for [`Color::Reset`],
/// which leaves the choice to the stylesheet.
pub(super) fn to_rgb(color: Color) -> Option<(u8, u8, u8)> {
    let rgb = match color {
        Color::Reset => return None,
        Color::Rgb(r, g, b) => return Some((r, g, b)),
        Color::Black => 0x000000,
        Color::Red => 0x800000,
        Color::Green => 0x008000,
        Color::Yellow => 0x808000,
        Color::Blue => 0x000080,
        Color::Magenta => 0x800080,
        Color::Cyan => 0x008080,
        Color::Gray => 0xc0c0c0,
        Color::DarkGray => 0x808080,
        Color::LightRed => 0xff0000,
        Color::LightGreen => 0x00ff00,
        Color::LightYellow => 0xffff00,
        Color::LightBlue => 0x0000ff,
        Color::LightMagenta => 0xff00ff,
        Color::LightCyan => 0x00ffff,
        Color::White => 0xffffff,
        Color::Indexed(index) => indexed_to_rgb(index),
    };
    let [_, r, g, b] = u32::to_be_bytes(rgb);
    Some((r, g, b))
}

/// Converts an xterm palette index to a 24-bit RGB value.
fn indexed_to_rgb(index: u8) -> u32 {
    const SYSTEM: [u32; 16] = [
        0x000000, 0xcd0000, 0x00cd00, 0xcdcd00, 0x0000ee, 0xcd00cd, 0x00cdcd, 0xe5e5e5,
        0x7f7f7f, 0xff0000, 0x00ff00, 0xffff00, 0x5c5cff, 0xff00ff, 0x00ffff, 0xffffff,
    ];
    match index {
        0..=15 => SYSTEM[index as usize],
        16..=231 => {
            let level = |n: u8| if n == 0 { 0 } else { 55 + 40 * n as u32 };
            let cube = index - 16;
            level(cube / 36) << 16 | level(cube / 6 % 6) << 8 | level(cube % 6)
        }
        232..=255 => {
            let gray = 8 + 10 * (index - 232) as u32;
            gray << 16 | gray << 8 | gray
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn named_and_rgb_colors() {
        assert_eq!(to_rgb(Color::Reset), None);
        assert_eq!(to_rgb(Color::Rgb(1, 2, 3)), Some((1, 2, 3)));
        assert_eq!(to_rgb(Color::Green), Some((0, 128, 0)));
        assert_eq!(to_rgb(Color::DarkGray), Some((128, 128, 128)));
    }

    #[test]
    fn indexed_palette() {
        assert_eq!(to_rgb(Color::Indexed(1)), Some((205, 0, 0)));
        assert_eq!(to_rgb(Color::Indexed(16)), Some((0, 0, 0)));
        assert_eq!(to_rgb(Color::Indexed(68)), Some((0x5f, 0x87, 0xd7)));
        assert_eq!(to_rgb(Color::Indexed(231)), Some((255, 255, 255)));
        assert_eq!(to_rgb(Color::Indexed(244)), Some((0x80, 0x80, 0x80)));
    }
}
