//! Advance widths used to center text.
//!
//! Embedded fonts are shaped with rustybuzz and measured from their glyph advances.
//! The builtin Helvetica uses AFM values in 1/1000 em for ASCII 0x20..=0x7E
//! (index = (char as usize) - 32); other characters use a fallback width.

const HELVETICA: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // ' ' .. '/'
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556, // '0' .. '?'
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778, // '@' .. 'O'
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556, // 'P' .. '_'
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556, // '`' .. 'o'
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584, // 'p' .. '~'
];

const FALLBACK_WIDTH: u16 = 556;
const WIDE_WIDTH: u16 = 1000;

fn char_width(c: char) -> u16 {
    match c as u32 {
        0x20..=0x7E => HELVETICA[c as usize - 32],
        // Pictographs and CJK render roughly square.
        0x1F000.. | 0x2E80..=0x9FFF => WIDE_WIDTH,
        _ => FALLBACK_WIDTH,
    }
}

/// Width of `text` in em units (multiply by the font size for points).
pub fn text_width_em(text: &str) -> f32 {
    text.chars().map(|c| f32::from(char_width(c))).sum::<f32>() / 1000.0
}

/// Width of `text` in inches at `size_pt`.
pub fn text_width_in(text: &str, size_pt: f32) -> f32 {
    text_width_em(text) * size_pt / 72.0
}

/// Shaped width of `text` in inches at `size_pt`, from the face's own advances.
pub fn shaped_width_in(face: &rustybuzz::Face, text: &str, size_pt: f32) -> f32 {
    let mut buffer = rustybuzz::UnicodeBuffer::new();
    buffer.push_str(text);
    buffer.guess_segment_properties();

    let glyphs = rustybuzz::shape(face, &[], buffer);
    let scale = size_pt / face.units_per_em() as f32;
    let width_pt: f32 = glyphs
        .glyph_positions()
        .iter()
        .map(|p| p.x_advance as f32 * scale)
        .sum();
    width_pt / 72.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use printpdf::font::BuiltinFont;

    #[test]
    fn test_table_indexing() {
        assert_eq!(char_width(' '), 278);
        assert_eq!(char_width('0'), 556);
        assert_eq!(char_width('@'), 1015);
        assert_eq!(char_width('W'), 944);
        assert_eq!(char_width('i'), 222);
        assert_eq!(char_width('~'), 584);
    }

    #[test]
    fn test_width_scales_with_size() {
        let w12 = text_width_in("Sunday - Dec 29", 12.0);
        let w24 = text_width_in("Sunday - Dec 29", 24.0);
        assert!((w24 - 2.0 * w12).abs() < 1e-5);
        assert_eq!(text_width_em(""), 0.0);
    }

    #[test]
    fn test_non_ascii_fallbacks() {
        assert_eq!(char_width('é'), FALLBACK_WIDTH);
        assert_eq!(char_width('🎉'), WIDE_WIDTH);
    }

    #[test]
    fn test_shaped_width_uses_face_advances() {
        // Courier advances are 1229/2048 em for every glyph.
        let bytes = BuiltinFont::CourierBold.get_subset_font().bytes;
        let face = rustybuzz::Face::from_slice(&bytes, 0).unwrap();
        let width = shaped_width_in(&face, "Smith Family", 24.0);
        let expected = 12.0 * 1229.0 / 2048.0 * 24.0 / 72.0;
        assert!((width - expected).abs() < 1e-3, "width {}", width);
        assert_eq!(shaped_width_in(&face, "", 24.0), 0.0);
    }
}
