use crate::app::rendering::FramePainter;

pub const GLYPH_WIDTH_PX: i32 = 3;
pub const GLYPH_HEIGHT_PX: i32 = 5;

const GLYPH_SPACING_PX: i32 = 1;

/// Draws `text` with a 3x5 pixel font, each glyph cell scaled by `scale`.
/// Lowercase letters render as uppercase; bytes without a glyph render as a
/// solid block. Clips at the frame edges.
pub fn draw_text(
    painter: &mut FramePainter<'_>,
    x: i32,
    y: i32,
    scale: i32,
    color: [u8; 4],
    text: &str,
) {
    if scale <= 0 {
        return;
    }
    let mut cursor_x = x;
    for byte in text.bytes() {
        let rows = glyph_rows(byte.to_ascii_uppercase());
        for (row, row_bits) in rows.iter().enumerate() {
            for col in 0..GLYPH_WIDTH_PX {
                if row_bits & (1 << (GLYPH_WIDTH_PX - 1 - col)) == 0 {
                    continue;
                }
                painter.fill_rect(
                    cursor_x + col * scale,
                    y + row as i32 * scale,
                    scale as u32,
                    scale as u32,
                    color,
                );
            }
        }
        cursor_x += (GLYPH_WIDTH_PX + GLYPH_SPACING_PX) * scale;
    }
}

/// Pixel size `draw_text` would cover, for centering.
pub fn measure_text(text: &str, scale: i32) -> (i32, i32) {
    let glyphs = text.len() as i32;
    if glyphs == 0 || scale <= 0 {
        return (0, 0);
    }
    let width = glyphs * (GLYPH_WIDTH_PX + GLYPH_SPACING_PX) * scale - GLYPH_SPACING_PX * scale;
    (width, GLYPH_HEIGHT_PX * scale)
}

fn glyph_rows(byte: u8) -> [u8; 5] {
    match byte {
        b' ' => [0b000, 0b000, 0b000, 0b000, 0b000],
        b'!' => [0b010, 0b010, 0b010, 0b000, 0b010],
        b'"' => [0b101, 0b101, 0b000, 0b000, 0b000],
        b'#' => [0b101, 0b111, 0b101, 0b111, 0b101],
        b'%' => [0b101, 0b001, 0b010, 0b100, 0b101],
        b'\'' => [0b010, 0b010, 0b000, 0b000, 0b000],
        b'(' => [0b001, 0b010, 0b010, 0b010, 0b001],
        b')' => [0b100, 0b010, 0b010, 0b010, 0b100],
        b'*' => [0b000, 0b101, 0b010, 0b101, 0b000],
        b'+' => [0b000, 0b010, 0b111, 0b010, 0b000],
        b',' => [0b000, 0b000, 0b000, 0b010, 0b100],
        b'-' => [0b000, 0b000, 0b111, 0b000, 0b000],
        b'.' => [0b000, 0b000, 0b000, 0b000, 0b010],
        b'/' => [0b001, 0b001, 0b010, 0b100, 0b100],
        b'0' => [0b111, 0b101, 0b101, 0b101, 0b111],
        b'1' => [0b010, 0b110, 0b010, 0b010, 0b111],
        b'2' => [0b110, 0b001, 0b010, 0b100, 0b111],
        b'3' => [0b111, 0b001, 0b011, 0b001, 0b111],
        b'4' => [0b101, 0b101, 0b111, 0b001, 0b001],
        b'5' => [0b111, 0b100, 0b110, 0b001, 0b110],
        b'6' => [0b011, 0b100, 0b110, 0b101, 0b010],
        b'7' => [0b111, 0b001, 0b010, 0b010, 0b010],
        b'8' => [0b010, 0b101, 0b010, 0b101, 0b010],
        b'9' => [0b010, 0b101, 0b011, 0b001, 0b110],
        b':' => [0b000, 0b010, 0b000, 0b010, 0b000],
        b';' => [0b000, 0b010, 0b000, 0b010, 0b100],
        b'<' => [0b001, 0b010, 0b100, 0b010, 0b001],
        b'=' => [0b000, 0b111, 0b000, 0b111, 0b000],
        b'>' => [0b100, 0b010, 0b001, 0b010, 0b100],
        b'?' => [0b110, 0b001, 0b010, 0b000, 0b010],
        b'A' => [0b010, 0b101, 0b111, 0b101, 0b101],
        b'B' => [0b110, 0b101, 0b110, 0b101, 0b110],
        b'C' => [0b011, 0b100, 0b100, 0b100, 0b011],
        b'D' => [0b110, 0b101, 0b101, 0b101, 0b110],
        b'E' => [0b111, 0b100, 0b110, 0b100, 0b111],
        b'F' => [0b111, 0b100, 0b110, 0b100, 0b100],
        b'G' => [0b011, 0b100, 0b101, 0b101, 0b011],
        b'H' => [0b101, 0b101, 0b111, 0b101, 0b101],
        b'I' => [0b111, 0b010, 0b010, 0b010, 0b111],
        b'J' => [0b001, 0b001, 0b001, 0b101, 0b010],
        b'K' => [0b101, 0b110, 0b100, 0b110, 0b101],
        b'L' => [0b100, 0b100, 0b100, 0b100, 0b111],
        b'M' => [0b101, 0b111, 0b111, 0b101, 0b101],
        b'N' => [0b110, 0b101, 0b101, 0b101, 0b101],
        b'O' => [0b010, 0b101, 0b101, 0b101, 0b010],
        b'P' => [0b110, 0b101, 0b110, 0b100, 0b100],
        b'Q' => [0b010, 0b101, 0b101, 0b010, 0b001],
        b'R' => [0b110, 0b101, 0b110, 0b101, 0b101],
        b'S' => [0b011, 0b100, 0b010, 0b001, 0b110],
        b'T' => [0b111, 0b010, 0b010, 0b010, 0b010],
        b'U' => [0b101, 0b101, 0b101, 0b101, 0b111],
        b'V' => [0b101, 0b101, 0b101, 0b101, 0b010],
        b'W' => [0b101, 0b101, 0b111, 0b111, 0b101],
        b'X' => [0b101, 0b101, 0b010, 0b101, 0b101],
        b'Y' => [0b101, 0b101, 0b010, 0b010, 0b010],
        b'Z' => [0b111, 0b001, 0b010, 0b100, 0b111],
        b'_' => [0b000, 0b000, 0b000, 0b000, 0b111],
        _ => [0b111, 0b111, 0b111, 0b111, 0b111],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn measure_accounts_for_spacing() {
        assert_eq!(measure_text("", 1), (0, 0));
        assert_eq!(measure_text("A", 1), (3, 5));
        assert_eq!(measure_text("AB", 1), (7, 5));
        assert_eq!(measure_text("AB", 2), (14, 10));
    }

    #[test]
    fn draw_clips_at_frame_edges() {
        let mut frame = vec![0u8; 8 * 8 * 4];
        let mut painter = FramePainter::new(&mut frame, 8, 8);
        draw_text(&mut painter, -2, -2, 1, [255, 255, 255, 255], "HELLO");
        draw_text(&mut painter, 6, 6, 3, [255, 255, 255, 255], "HI");
    }

    #[test]
    fn lowercase_draws_same_as_uppercase() {
        assert_eq!(glyph_rows(b'a'.to_ascii_uppercase()), glyph_rows(b'A'));
    }

    #[test]
    fn unknown_byte_gets_fallback_block() {
        assert_eq!(glyph_rows(b'~'), [0b111; 5]);
    }

    #[test]
    fn zero_scale_draws_nothing() {
        let mut frame = vec![0u8; 4 * 4 * 4];
        let mut painter = FramePainter::new(&mut frame, 4, 4);
        draw_text(&mut painter, 0, 0, 0, [255, 255, 255, 255], "X");
        assert!(frame.iter().all(|byte| *byte == 0));
    }
}
