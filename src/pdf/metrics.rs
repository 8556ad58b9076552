//! Glyph advance widths for the two built-in fonts, from the Adobe
//! core-14 AFM files. Widths are thousandths of the point size.

use super::page::Font;

/// Widths for WinAnsi codes 32..=126 of Helvetica
#[rustfmt::skip]
const HELVETICA: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333,
    278, 278, 556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278,
    584, 584, 584, 556, 1015, 667, 667, 722, 722, 667, 611, 778, 722, 278,
    500, 667, 556, 833, 722, 778, 667, 778, 722, 667, 611, 722, 667, 944,
    667, 667, 611, 278, 278, 278, 469, 556, 333, 556, 556, 500, 556, 556,
    278, 556, 556, 222, 222, 500, 222, 833, 556, 556, 556, 556, 333, 500,
    278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584,
];

/// Widths for WinAnsi codes 32..=126 of Helvetica-Bold
#[rustfmt::skip]
const HELVETICA_BOLD: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333,
    278, 278, 556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333,
    584, 584, 584, 611, 975, 722, 722, 722, 722, 667, 611, 778, 722, 278,
    556, 722, 611, 833, 722, 778, 667, 778, 722, 667, 611, 722, 667, 944,
    667, 667, 611, 333, 278, 333, 584, 556, 333, 556, 611, 556, 611, 556,
    333, 611, 611, 278, 278, 556, 278, 889, 611, 611, 611, 611, 389, 556,
    333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584,
];

/// Advance of the bullet glyph (WinAnsi 0x95) in both fonts
const BULLET_WIDTH: u16 = 350;

/// Fallback for glyphs outside the table
const DEFAULT_WIDTH: u16 = 556;

fn glyph_width(font: Font, c: char) -> u16 {
    if let Some(index) = (c as u32).checked_sub(32) {
        if (index as usize) < 95 {
            return match font {
                Font::Helvetica => HELVETICA[index as usize],
                Font::HelveticaBold => HELVETICA_BOLD[index as usize],
            };
        }
    }
    if c == '\u{2022}' {
        return BULLET_WIDTH;
    }
    DEFAULT_WIDTH
}

/// Width of a string in points at the given size
pub fn text_width(font: Font, text: &str, size: f32) -> f32 {
    let units: u32 = text.chars().map(|c| u32::from(glyph_width(font, c))).sum();
    units as f32 * size / 1000.0
}
