use std::fs;
use std::path::Path;

/// One of the two built-in Type1 fonts the report uses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Font {
    Helvetica,
    HelveticaBold,
}

impl Font {
    /// Resource name in each page's font dictionary
    pub(crate) fn resource(&self) -> &'static str {
        match self {
            Font::Helvetica => "F1",
            Font::HelveticaBold => "F2",
        }
    }

    /// PostScript base font name
    pub(crate) fn base_name(&self) -> &'static str {
        match self {
            Font::Helvetica => "Helvetica",
            Font::HelveticaBold => "Helvetica-Bold",
        }
    }
}

/// RGB color with components in 0..=1
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self {
            r: r as f32 / 255.0,
            g: g as f32 / 255.0,
            b: b as f32 / 255.0,
        }
    }
}

/// A single drawing operation on a page
///
/// Coordinates are PDF points with the origin at the bottom-left corner;
/// text positions are baseline positions.
#[derive(Debug, Clone, PartialEq)]
pub enum Op {
    Text {
        x: f32,
        y: f32,
        font: Font,
        size: f32,
        color: Color,
        text: String,
    },
    Line {
        x1: f32,
        y1: f32,
        x2: f32,
        y2: f32,
        color: Color,
    },
    /// Placed cover logo; `w`/`h` are display points, the pixel data
    /// lives in the document-level [`LogoImage`]
    Image { x: f32, y: f32, w: f32, h: f32 },
}

/// A laid-out page: content from pass 1 plus decoration from pass 2
///
/// Pass 2 only ever appends to `decoration`; content is never touched
/// after layout.
#[derive(Debug, Clone, Default)]
pub struct RenderedPage {
    pub content: Vec<Op>,
    pub decoration: Vec<Op>,
}

/// JPEG cover logo embedded as a DCT-encoded image object
#[derive(Debug, Clone)]
pub struct LogoImage {
    pub data: Vec<u8>,
    pub pixel_width: u16,
    pub pixel_height: u16,
}

impl LogoImage {
    /// Loads a JPEG logo, returning `None` when the file is missing or
    /// not a parseable JPEG. A missing logo is never an error.
    pub fn load(path: &Path) -> Option<Self> {
        let data = fs::read(path).ok()?;
        let (pixel_width, pixel_height) = jpeg_dimensions(&data)?;
        Some(Self {
            data,
            pixel_width,
            pixel_height,
        })
    }
}

/// Reads the frame dimensions from a JPEG start-of-frame marker
fn jpeg_dimensions(data: &[u8]) -> Option<(u16, u16)> {
    if data.len() < 4 || data[0] != 0xFF || data[1] != 0xD8 {
        return None;
    }
    let mut i = 2;
    while i + 3 < data.len() {
        if data[i] != 0xFF {
            return None;
        }
        let marker = data[i + 1];
        match marker {
            // Markers without a length segment
            0x01 | 0xD0..=0xD8 => {
                i += 2;
                continue;
            }
            // SOF markers other than DHT/JPG/DAC carry the frame size
            0xC0..=0xCF if !matches!(marker, 0xC4 | 0xC8 | 0xCC) => {
                if i + 9 > data.len() {
                    return None;
                }
                let height = u16::from_be_bytes([data[i + 5], data[i + 6]]);
                let width = u16::from_be_bytes([data[i + 7], data[i + 8]]);
                return (width > 0 && height > 0).then_some((width, height));
            }
            _ => {
                let len = u16::from_be_bytes([data[i + 2], data[i + 3]]) as usize;
                i += 2 + len;
            }
        }
    }
    None
}
